//! A sandboxed shell emulator over a virtual filesystem.
//!
//! A tar archive is extracted into a private staging directory and explored
//! with a handful of commands (`ls`, `cd`, `wc`, `chown`, `du`, `history`,
//! `exit`). The current directory is tracked virtually, so the host process
//! never changes its own working directory and no command can reach outside
//! the staged tree.
//!
//! The main entry point is [`Interpreter`], which runs command lines against a
//! [`Session`] built from a [`StagingStore`] and records each line in an
//! [`AuditLog`].

pub mod audit;
mod builtin;
mod command;
pub mod config;
pub mod error;
pub mod history;
pub mod io_adapters;
mod interpreter;
pub mod resolver;
pub mod session;
pub mod staging;

#[cfg(test)]
mod test_utils;

pub use audit::AuditLog;
pub use builtin::{Builtin, Invocation};
pub use command::Reply;
pub use error::{CommandError, ErrorKind};
pub use interpreter::{Interpreter, State};
pub use session::Session;
pub use staging::{ArchiveError, StagingStore};
