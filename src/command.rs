use crate::error::CommandError;
use crate::session::Session;
use argh::FromArgs;

/// What a successful command hands back to the interpreter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Text to print; the interpreter appends the newline.
    Text(String),
    /// Farewell text. The session is over once this is printed.
    Exit(String),
}

impl Reply {
    pub fn text(&self) -> &str {
        match self {
            Reply::Text(s) | Reply::Exit(s) => s,
        }
    }
}

/// Commands known to the emulator.
///
/// Arguments are parsed with [`argh`] (`FromArgs`), so a wrong argument count
/// is rejected before the handler runs. Handlers only touch the staged tree
/// through [`Session::resolver`].
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Canonical name of the command, e.g. "ls" or "cd".
    fn name() -> &'static str;

    fn execute(self, session: &mut Session) -> Result<Reply, CommandError>;
}
