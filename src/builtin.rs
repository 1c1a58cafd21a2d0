use crate::command::{BuiltinCommand, Reply};
use crate::error::CommandError;
use crate::session::Session;
use argh::{EarlyExit, FromArgs};
use std::fs;
use std::io;
use std::path::Path;

pub const EMPTY_DIRECTORY: &str = "Empty directory";
pub const FAREWELL: &str = "Exiting emulator";

/// The fixed command table.
pub enum Builtin {
    Ls(Ls),
    Cd(Cd),
    Wc(Wc),
    Chown(Chown),
    Du(Du),
    History(History),
    Exit(Exit),
}

/// Result of looking up and parsing one command line.
pub enum Invocation {
    Run(Builtin),
    /// `--help` was requested; holds the generated usage text. A bare `help`
    /// is an ordinary operand.
    Help(String),
}

impl Builtin {
    pub const NAMES: [&'static str; 7] = ["ls", "cd", "wc", "chown", "du", "history", "exit"];

    /// Look up `name` and parse `args` for it.
    pub fn parse(name: &str, args: &[&str]) -> Result<Invocation, CommandError> {
        match name {
            "ls" => parse_as(args, Builtin::Ls),
            "cd" => parse_as(args, Builtin::Cd),
            "wc" => parse_as(args, Builtin::Wc),
            "chown" => parse_as(args, Builtin::Chown),
            "du" => parse_as(args, Builtin::Du),
            "history" => parse_as(args, Builtin::History),
            "exit" => parse_as(args, Builtin::Exit),
            _ => Err(CommandError::Unrecognized(name.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Ls(_) => Ls::name(),
            Builtin::Cd(_) => Cd::name(),
            Builtin::Wc(_) => Wc::name(),
            Builtin::Chown(_) => Chown::name(),
            Builtin::Du(_) => Du::name(),
            Builtin::History(_) => History::name(),
            Builtin::Exit(_) => Exit::name(),
        }
    }

    pub fn execute(self, session: &mut Session) -> Result<Reply, CommandError> {
        match self {
            Builtin::Ls(cmd) => cmd.execute(session),
            Builtin::Cd(cmd) => cmd.execute(session),
            Builtin::Wc(cmd) => cmd.execute(session),
            Builtin::Chown(cmd) => cmd.execute(session),
            Builtin::Du(cmd) => cmd.execute(session),
            Builtin::History(cmd) => cmd.execute(session),
            Builtin::Exit(cmd) => cmd.execute(session),
        }
    }
}

fn parse_as<T: BuiltinCommand>(
    args: &[&str],
    wrap: fn(T) -> Builtin,
) -> Result<Invocation, CommandError> {
    match T::from_args(&[T::name()], args) {
        Ok(cmd) => Ok(Invocation::Run(wrap(cmd))),
        Err(EarlyExit {
            output,
            status: Ok(()),
        }) => Ok(Invocation::Help(output.trim_end().to_string())),
        Err(EarlyExit { output, .. }) => {
            log::debug!("{}: {}", T::name(), output.trim_end());
            Err(CommandError::InvalidUsage(T::name().to_string()))
        }
    }
}

#[derive(FromArgs)]
/// List the entries of the current directory.
#[argh(help_triggers("--help"))]
pub struct Ls {}

impl BuiltinCommand for Ls {
    fn name() -> &'static str {
        "ls"
    }

    fn execute(self, session: &mut Session) -> Result<Reply, CommandError> {
        let resolver = session.resolver();
        let dir = resolver.current();
        if !resolver.probe(&dir).is_some_and(|m| m.is_dir()) {
            return Err(CommandError::DirectoryNotFound);
        }

        let mut names = fs::read_dir(&dir.location)?
            .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
            .collect::<io::Result<Vec<String>>>()?;
        if names.is_empty() {
            return Ok(Reply::Text(EMPTY_DIRECTORY.to_string()));
        }
        names.sort();
        Ok(Reply::Text(names.join("\n")))
    }
}

#[derive(FromArgs)]
/// Change the current directory inside the staged tree.
#[argh(help_triggers("--help"))]
pub struct Cd {
    #[argh(positional)]
    /// directory to switch to, relative to the current one; a leading `/` starts from the root.
    pub path: Option<String>,
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn execute(self, session: &mut Session) -> Result<Reply, CommandError> {
        let path = self.path.ok_or(CommandError::MissingDirectory)?;
        let resolver = session.resolver();
        let target = resolver.resolve(&path);
        if !resolver.probe(&target).is_some_and(|m| m.is_dir()) {
            return Err(CommandError::DirectoryNotFound);
        }
        let virtual_path = resolver
            .display_form(&target.location)
            .ok_or(CommandError::DirectoryNotFound)?;

        let message = if virtual_path.is_empty() {
            "Moved to /".to_string()
        } else {
            format!("Moved to {}", virtual_path)
        };
        session.set_current_dir(virtual_path);
        Ok(Reply::Text(message))
    }
}

#[derive(FromArgs)]
/// Count lines, words and bytes of a file.
#[argh(help_triggers("--help"))]
pub struct Wc {
    #[argh(positional)]
    /// file to count, relative to the current directory; a leading `/` starts from the root.
    pub file: Option<String>,
}

/// Line, word and byte counts of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counts {
    pub lines: usize,
    pub words: usize,
    pub bytes: usize,
}

impl Counts {
    /// Lines are newline characters, so a missing final newline is not a line.
    pub fn of(content: &[u8]) -> Self {
        Self {
            lines: content.iter().filter(|&&b| b == b'\n').count(),
            words: String::from_utf8_lossy(content).split_whitespace().count(),
            bytes: content.len(),
        }
    }
}

impl BuiltinCommand for Wc {
    fn name() -> &'static str {
        "wc"
    }

    fn execute(self, session: &mut Session) -> Result<Reply, CommandError> {
        let file = self.file.ok_or(CommandError::MissingFile)?;
        let resolver = session.resolver();
        let target = resolver.resolve(&file);
        if !resolver.probe(&target).is_some_and(|m| m.is_file()) {
            return Err(CommandError::FileNotFound);
        }

        let counts = Counts::of(&fs::read(&target.location)?);
        Ok(Reply::Text(format!(
            "{} {} {} {}",
            counts.lines, counts.words, counts.bytes, file
        )))
    }
}

#[derive(FromArgs)]
/// Pretend to change the owner of a file. Nothing is modified.
#[argh(help_triggers("--help"))]
pub struct Chown {
    #[argh(positional)]
    /// new owner name.
    pub owner: String,

    #[argh(positional)]
    /// file or directory whose owner changes; a leading `/` starts from the root.
    pub file: String,
}

impl BuiltinCommand for Chown {
    fn name() -> &'static str {
        "chown"
    }

    fn execute(self, session: &mut Session) -> Result<Reply, CommandError> {
        let resolver = session.resolver();
        if resolver.probe(&resolver.resolve(&self.file)).is_none() {
            return Err(CommandError::EntryNotFound);
        }
        Ok(Reply::Text(format!(
            "Owner of '{}' changed to '{}'",
            self.file, self.owner
        )))
    }
}

#[derive(FromArgs)]
/// Report the size in bytes of a file or directory tree.
#[argh(help_triggers("--help"))]
pub struct Du {
    #[argh(positional)]
    /// file or directory to measure; a leading `/` starts from the root. Defaults to the current directory.
    pub path: Option<String>,
}

impl BuiltinCommand for Du {
    fn name() -> &'static str {
        "du"
    }

    fn execute(self, session: &mut Session) -> Result<Reply, CommandError> {
        let label = self.path.as_deref().unwrap_or(".");
        let resolver = session.resolver();
        let target = resolver.resolve(label);
        let metadata = resolver.probe(&target).ok_or(CommandError::PathNotFound)?;

        let size = if metadata.is_dir() {
            disk_usage(&target.location)?
        } else {
            metadata.len()
        };
        Ok(Reply::Text(format!("{} {}", size, label)))
    }
}

/// Sum of regular-file sizes below `dir`. Symlinks are not followed.
fn disk_usage(dir: &Path) -> io::Result<u64> {
    let mut total = 0;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            total += disk_usage(&entry.path())?;
        } else if file_type.is_file() {
            total += entry.metadata()?.len();
        }
    }
    Ok(total)
}

#[derive(FromArgs)]
/// Show the command lines entered so far.
#[argh(help_triggers("--help"))]
pub struct History {}

impl BuiltinCommand for History {
    fn name() -> &'static str {
        "history"
    }

    fn execute(self, session: &mut Session) -> Result<Reply, CommandError> {
        Ok(Reply::Text(session.history().render()))
    }
}

#[derive(FromArgs)]
/// Leave the emulator and remove the staged tree.
#[argh(help_triggers("--help"))]
pub struct Exit {}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn execute(self, session: &mut Session) -> Result<Reply, CommandError> {
        if let Err(e) = session.teardown() {
            log::warn!("exit: could not remove staging directory: {}", e);
        }
        Ok(Reply::Exit(FAREWELL.to_string()))
    }
}
