use crate::session::Session;
use crate::staging::StagingStore;
use argh::FromArgs;
use std::env;
use std::path::PathBuf;

#[derive(FromArgs, Debug)]
/// Explore a tar archive through a sandboxed shell emulator.
#[argh(help_triggers("-h", "--help"))]
pub struct Config {
    #[argh(positional)]
    /// tar or tar.gz archive holding the virtual filesystem.
    pub archive: PathBuf,

    #[argh(positional)]
    /// script of commands to run before the interactive prompt.
    pub script: Option<PathBuf>,

    #[argh(option, default = "PathBuf::from(\"emulator.log\")")]
    /// file every executed command is appended to.
    pub log_file: PathBuf,

    #[argh(option)]
    /// where to extract the archive; replaced if it exists. Defaults to a fresh temp directory.
    pub staging_dir: Option<PathBuf>,

    #[argh(option, default = "default_user()")]
    /// user name shown in the prompt. Defaults to $USER.
    pub user: String,

    #[argh(option, default = "String::from(\"localhost\")")]
    /// host name shown in the prompt.
    pub host: String,
}

impl Config {
    pub fn staging_root(&self) -> PathBuf {
        self.staging_dir
            .clone()
            .unwrap_or_else(StagingStore::default_root)
    }

    pub fn prompt(&self) -> Prompt {
        Prompt {
            user: self.user.clone(),
            host: self.host.clone(),
        }
    }
}

fn default_user() -> String {
    env::var("USER")
        .or_else(|_| env::var("USERNAME"))
        .unwrap_or_else(|_| "user".to_string())
}

/// Identity shown in the interactive prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub user: String,
    pub host: String,
}

impl Prompt {
    /// `user@host:/current/dir$ `
    pub fn render(&self, session: &Session) -> String {
        format!("{}@{}:{}$ ", self.user, self.host, session.display_dir())
    }
}
