use flate2::read::GzDecoder;
use std::env;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Failure to materialize the archive. Fatal at startup.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("archive {} does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("cannot read archive {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed archive {}: {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },

    #[error("cannot prepare staging directory {}: {source}", .path.display())]
    Staging {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Private directory holding the extracted archive.
///
/// The store owns the directory for its whole lifetime: dropping it removes
/// the tree, so a session that ends for any reason leaves nothing behind.
#[derive(Debug)]
pub struct StagingStore {
    root: PathBuf,
}

impl StagingStore {
    /// Extract `archive` into a fresh directory at `root`.
    ///
    /// Anything already at `root` is deleted first. Plain and gzip-compressed
    /// tar archives are accepted.
    pub fn prepare(archive: &Path, root: impl Into<PathBuf>) -> Result<Self, ArchiveError> {
        let root = root.into();
        let file = File::open(archive).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ArchiveError::NotFound(archive.to_path_buf()),
            _ => ArchiveError::Unreadable {
                path: archive.to_path_buf(),
                source: e,
            },
        })?;
        let len = file
            .metadata()
            .map_err(|e| ArchiveError::Unreadable {
                path: archive.to_path_buf(),
                source: e,
            })?
            .len();
        if len == 0 {
            return Err(ArchiveError::Malformed {
                path: archive.to_path_buf(),
                reason: "empty file".to_string(),
            });
        }

        let staging_err = |source: io::Error| ArchiveError::Staging {
            path: root.clone(),
            source,
        };
        if root.exists() {
            log::info!("removing stale staging directory {}", root.display());
            fs::remove_dir_all(&root).map_err(staging_err)?;
        }
        fs::create_dir_all(&root).map_err(staging_err)?;
        let root = fs::canonicalize(&root).map_err(staging_err)?;

        let store = StagingStore { root };
        if let Err(e) = unpack(file, &store.root) {
            // store drops here and takes the partial tree with it
            return Err(ArchiveError::Malformed {
                path: archive.to_path_buf(),
                reason: e.to_string(),
            });
        }
        log::info!(
            "staged {} into {}",
            archive.display(),
            store.root.display()
        );
        Ok(store)
    }

    /// A per-process location under the host temp directory.
    pub fn default_root() -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        env::temp_dir().join(format!("vfs_shell_{}_{}", std::process::id(), nanos))
    }

    /// Canonical absolute path of the staging directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Remove the staging directory. Safe to call repeatedly.
    pub fn teardown(&self) -> io::Result<()> {
        match fs::remove_dir_all(&self.root) {
            Ok(()) => {
                log::info!("removed staging directory {}", self.root.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

impl Drop for StagingStore {
    fn drop(&mut self) {
        if let Err(e) = self.teardown() {
            log::warn!(
                "failed to remove staging directory {}: {}",
                self.root.display(),
                e
            );
        }
    }
}

fn unpack(file: File, dest: &Path) -> io::Result<()> {
    let mut reader = BufReader::new(file);
    let compressed = reader.fill_buf()?.starts_with(&GZIP_MAGIC);
    if compressed {
        log::debug!("archive is gzip-compressed");
        unpack_tar(GzDecoder::new(reader), dest)
    } else {
        unpack_tar(reader, dest)
    }
}

fn unpack_tar<R: Read>(reader: R, dest: &Path) -> io::Result<()> {
    let mut archive = tar::Archive::new(reader);
    archive.set_preserve_permissions(false);
    archive.unpack(dest)
}
