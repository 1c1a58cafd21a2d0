use std::fs::{self, Metadata};
use std::path::{Component, Path, PathBuf};

/// A user path mapped into the staging directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// Concrete location under the staging root.
    pub location: PathBuf,
    /// Path relative to the staging root, `/`-separated, empty for the root.
    pub virtual_path: String,
}

impl Resolved {
    /// Virtual path as shown to the user; the root is `/`.
    pub fn display(&self) -> &str {
        if self.virtual_path.is_empty() {
            "/"
        } else {
            &self.virtual_path
        }
    }
}

/// Maps virtual paths onto the staging directory and back.
///
/// Resolution is purely lexical: `.` is dropped, `..` pops one segment and
/// stops at the root, and a leading `/` restarts from the root. Nothing the
/// user types can name a location outside `root`.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    root: &'a Path,
    current: &'a str,
}

impl<'a> Resolver<'a> {
    pub fn new(root: &'a Path, current: &'a str) -> Self {
        Self { root, current }
    }

    /// The current directory itself.
    pub fn current(&self) -> Resolved {
        self.resolve(".")
    }

    pub fn resolve(&self, input: &str) -> Resolved {
        let mut segments: Vec<String> = if input.starts_with('/') {
            Vec::new()
        } else {
            self.current
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
                .collect()
        };

        for component in Path::new(input).components() {
            match component {
                Component::Normal(part) => segments.push(part.to_string_lossy().into_owned()),
                Component::ParentDir => {
                    segments.pop();
                }
                Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
            }
        }

        let location = segments
            .iter()
            .fold(self.root.to_path_buf(), |acc, s| acc.join(s));
        let resolved = Resolved {
            location,
            virtual_path: segments.join("/"),
        };
        log::debug!("resolved {:?} from {:?} to {:?}", input, self.current, resolved);
        resolved
    }

    /// Path of `location` relative to the staging root, or `None` when it
    /// lies outside.
    pub fn display_form(&self, location: &Path) -> Option<String> {
        let relative = location.strip_prefix(self.root).ok()?;
        let mut parts = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
                Component::CurDir => {}
                _ => return None,
            }
        }
        Some(parts.join("/"))
    }

    /// Metadata of the entry behind `resolved`, following symlinks.
    ///
    /// Returns `None` if the entry does not exist or if a symlink inside the
    /// staged tree leads out of it.
    pub fn probe(&self, resolved: &Resolved) -> Option<Metadata> {
        let real = fs::canonicalize(&resolved.location).ok()?;
        if !real.starts_with(self.root) {
            log::debug!("{} escapes the staging root", real.display());
            return None;
        }
        fs::metadata(&real).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> PathBuf {
        PathBuf::from("/stage")
    }

    #[test]
    fn test_resolve_relative_to_current() {
        let root = root();
        let r = Resolver::new(&root, "docs");
        let resolved = r.resolve("nested/deep.txt");
        assert_eq!(resolved.location, root.join("docs").join("nested").join("deep.txt"));
        assert_eq!(resolved.virtual_path, "docs/nested/deep.txt");
    }

    #[test]
    fn test_resolve_normalizes_dots() {
        let root = root();
        let r = Resolver::new(&root, "docs/nested");
        assert_eq!(r.resolve("./../notes.txt").virtual_path, "docs/notes.txt");
        assert_eq!(r.resolve("..").virtual_path, "docs");
        assert_eq!(r.resolve("../..").virtual_path, "");
        assert_eq!(r.resolve(".").virtual_path, "docs/nested");
    }

    #[test]
    fn test_parent_of_root_clamps() {
        let root = root();
        let r = Resolver::new(&root, "");
        let resolved = r.resolve("..");
        assert_eq!(resolved.location, root);
        assert_eq!(resolved.display(), "/");

        let r = Resolver::new(&root, "docs");
        let resolved = r.resolve("../../../etc/passwd");
        assert_eq!(resolved.virtual_path, "etc/passwd");
        assert!(resolved.location.starts_with(&root));
    }

    #[test]
    fn test_leading_slash_restarts_at_root() {
        let root = root();
        let r = Resolver::new(&root, "docs/nested");
        let resolved = r.resolve("/subdir");
        assert_eq!(resolved.virtual_path, "subdir");
        assert_eq!(resolved.location, root.join("subdir"));
        assert_eq!(r.resolve("/").virtual_path, "");
    }

    #[test]
    fn test_display_form() {
        let root = root();
        let r = Resolver::new(&root, "");
        assert_eq!(r.display_form(&root), Some(String::new()));
        assert_eq!(
            r.display_form(&root.join("docs").join("nested")),
            Some("docs/nested".to_string())
        );
        assert_eq!(r.display_form(Path::new("/elsewhere")), None);
    }

    #[test]
    fn test_probe_reports_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let root = fs::canonicalize(tmp.path()).unwrap();
        fs::create_dir(root.join("present")).unwrap();
        let r = Resolver::new(&root, "");

        assert!(r.probe(&r.resolve("present")).unwrap().is_dir());
        assert!(r.probe(&r.resolve("absent")).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_probe_rejects_symlink_out_of_root() {
        let outside = tempfile::tempdir().unwrap();
        fs::write(outside.path().join("secret.txt"), "s").unwrap();
        let tmp = tempfile::tempdir().unwrap();
        let root = fs::canonicalize(tmp.path()).unwrap();
        std::os::unix::fs::symlink(outside.path().join("secret.txt"), root.join("link")).unwrap();
        std::os::unix::fs::symlink("inner.txt", root.join("ok_link")).unwrap();
        fs::write(root.join("inner.txt"), "i").unwrap();

        let r = Resolver::new(&root, "");
        assert!(r.probe(&r.resolve("link")).is_none());
        assert!(r.probe(&r.resolve("ok_link")).unwrap().is_file());
    }
}
