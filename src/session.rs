use crate::history::History;
use crate::resolver::Resolver;
use crate::staging::StagingStore;
use std::io;
use std::path::Path;

/// Mutable state of one interpreter session.
///
/// The session owns the staging directory: when it is dropped, the staged
/// tree is removed.
#[derive(Debug)]
pub struct Session {
    staging: StagingStore,
    current_dir: String,
    history: History,
}

impl Session {
    /// Start at the root of `staging` with an empty history.
    pub fn new(staging: StagingStore) -> Self {
        Self {
            staging,
            current_dir: String::new(),
            history: History::new(),
        }
    }

    /// Virtual current directory, empty for the root.
    pub fn current_dir(&self) -> &str {
        &self.current_dir
    }

    /// Current directory as shown in prompts: always starts with `/`.
    pub fn display_dir(&self) -> String {
        format!("/{}", self.current_dir)
    }

    pub fn staging_root(&self) -> &Path {
        self.staging.root()
    }

    /// Resolver anchored at the current directory.
    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(self.staging.root(), &self.current_dir)
    }

    /// Callers must have checked that `virtual_path` is an existing directory.
    pub(crate) fn set_current_dir(&mut self, virtual_path: String) {
        self.current_dir = virtual_path;
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn record(&mut self, line: &str) {
        self.history.push(line);
    }

    pub fn teardown(&self) -> io::Result<()> {
        self.staging.teardown()
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils::fixture_session;

    #[test]
    fn test_new_session_starts_at_root() {
        let (_tmp, session) = fixture_session();
        assert_eq!(session.current_dir(), "");
        assert_eq!(session.display_dir(), "/");
        assert!(session.history().is_empty());
        assert!(session.staging_root().join("testfile.txt").is_file());
    }

    #[test]
    fn test_drop_removes_staging() {
        let (_tmp, session) = fixture_session();
        let root = session.staging_root().to_path_buf();
        drop(session);
        assert!(!root.exists());
    }
}
