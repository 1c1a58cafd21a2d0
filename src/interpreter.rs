use crate::audit::AuditLog;
use crate::builtin::{Builtin, Invocation};
use crate::command::Reply;
use crate::config::{Config, Prompt};
use crate::error::CommandError;
use crate::session::Session;
use crate::staging::StagingStore;
use anyhow::Context;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

/// Lifecycle of an interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Running,
    Terminated,
}

/// Line-oriented front end over a [`Session`].
///
/// Every non-blank line is written to the audit log, recorded in history and
/// dispatched through the command table. Command failures are printed and the
/// loop carries on; only `exit` ends it.
///
/// Example
/// ```no_run
/// use std::path::Path;
/// use vfs_shell::{AuditLog, Interpreter, Session, StagingStore};
///
/// let store = StagingStore::prepare(Path::new("vfs.tar"), StagingStore::default_root()).unwrap();
/// let mut sh = Interpreter::new(Session::new(store), AuditLog::disabled());
/// sh.execute_line("cd docs", &mut std::io::stdout()).unwrap();
/// ```
pub struct Interpreter {
    session: Session,
    log: AuditLog,
    state: State,
}

impl Interpreter {
    /// Stage the configured archive and open the audit log.
    ///
    /// If the log cannot be opened the freshly staged tree is removed again
    /// before the error is returned.
    pub fn launch(config: &Config) -> anyhow::Result<Self> {
        let staging = StagingStore::prepare(&config.archive, config.staging_root())
            .context("cannot stage virtual filesystem")?;
        let log = AuditLog::open(&config.log_file)
            .with_context(|| format!("cannot open log file {}", config.log_file.display()))?;
        Ok(Self::new(Session::new(staging), log))
    }

    pub fn new(session: Session, log: AuditLog) -> Self {
        Self {
            session,
            log,
            state: State::Running,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Run one command line and print its reply to `out`.
    ///
    /// Only errors writing to `out` are returned; command failures are
    /// rendered as text.
    pub fn execute_line(&mut self, line: &str, out: &mut dyn Write) -> io::Result<State> {
        if self.state == State::Terminated || line.trim().is_empty() {
            return Ok(self.state);
        }

        if let Err(e) = self.log.append(line) {
            log::warn!("failed to write audit log: {}", e);
        }
        self.session.record(line);

        let mut tokens = line.split_whitespace();
        let name = tokens.next().unwrap_or_default();
        let args: Vec<&str> = tokens.collect();

        match self.dispatch(name, &args) {
            Ok(Reply::Text(text)) => writeln!(out, "{}", text)?,
            Ok(Reply::Exit(text)) => {
                writeln!(out, "{}", text)?;
                self.state = State::Terminated;
            }
            Err(e) => {
                log::debug!("{:?} failed: {:?}", line, e);
                writeln!(out, "{}", e)?;
            }
        }
        Ok(self.state)
    }

    fn dispatch(&mut self, name: &str, args: &[&str]) -> Result<Reply, CommandError> {
        match Builtin::parse(name, args)? {
            Invocation::Run(cmd) => {
                log::debug!("running {}", cmd.name());
                cmd.execute(&mut self.session)
            }
            Invocation::Help(text) => Ok(Reply::Text(text)),
        }
    }

    /// Feed every line of `script` through [`Self::execute_line`], stopping
    /// early if one of them exits. Bytes that are not UTF-8 are replaced
    /// rather than aborting the script.
    pub fn run_script(
        &mut self,
        mut script: impl BufRead,
        out: &mut dyn Write,
    ) -> io::Result<State> {
        let mut buf = Vec::new();
        while self.state == State::Running {
            buf.clear();
            if script.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let line = String::from_utf8_lossy(&buf);
            self.execute_line(line.trim_end_matches(['\n', '\r']), out)?;
        }
        Ok(self.state)
    }

    /// Run the startup script at `path`. A script that cannot be opened is
    /// skipped with a warning and the session stays usable.
    pub fn run_startup_script(
        &mut self,
        path: &Path,
        out: &mut dyn Write,
    ) -> io::Result<State> {
        match File::open(path) {
            Ok(file) => self.run_script(BufReader::new(file), out),
            Err(e) => {
                log::warn!("skipping startup script {}: {}", path.display(), e);
                Ok(self.state)
            }
        }
    }

    /// Interactive loop on the terminal. Returns on `exit` or end of input.
    pub fn repl(&mut self, prompt: &Prompt) -> rustyline::Result<()> {
        let mut rl = DefaultEditor::new()?;
        let mut stdout = io::stdout();

        while self.state == State::Running {
            match rl.readline(&prompt.render(&self.session)) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        rl.add_history_entry(line.as_str())?;
                    }
                    self.execute_line(&line, &mut stdout)?;
                }
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => break,
                Err(err) => return Err(err),
            }
        }

        Ok(())
    }
}
