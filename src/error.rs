use std::io;
use thiserror::Error;

/// Failure of a single command.
///
/// The `Display` form of every variant is exactly what the user sees, so the
/// interpreter can print it verbatim.
#[derive(Debug, Error)]
pub enum CommandError {
    /// No command with this name exists.
    #[error("Error: command not recognized")]
    Unrecognized(String),

    /// The command exists but was invoked with the wrong arguments.
    #[error("Error: invalid usage of command '{0}'")]
    InvalidUsage(String),

    #[error("Error: no directory name given")]
    MissingDirectory,

    #[error("Error: no file name given")]
    MissingFile,

    #[error("Error: directory not found")]
    DirectoryNotFound,

    #[error("Error: file not found")]
    FileNotFound,

    #[error("Error: file or directory not found")]
    EntryNotFound,

    #[error("Error: path not found")]
    PathNotFound,

    /// Reading from the staged tree failed after the entry was located.
    #[error("Error: {0}")]
    Io(#[from] io::Error),
}

/// Coarse classification of a [`CommandError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Argument,
    NotFound,
    Unrecognized,
    Io,
}

impl CommandError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CommandError::Unrecognized(_) => ErrorKind::Unrecognized,
            CommandError::InvalidUsage(_)
            | CommandError::MissingDirectory
            | CommandError::MissingFile => ErrorKind::Argument,
            CommandError::DirectoryNotFound
            | CommandError::FileNotFound
            | CommandError::EntryNotFound
            | CommandError::PathNotFound => ErrorKind::NotFound,
            CommandError::Io(_) => ErrorKind::Io,
        }
    }
}
