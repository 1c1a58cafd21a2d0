//! Shared fixtures for unit tests: a small archive and a session staged from it.

use crate::session::Session;
use crate::staging::StagingStore;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Two lines, seven words, 33 bytes.
pub const FIXTURE_FILE_CONTENT: &str = "Hello World\nThis is a test file.\n";
pub const NOTES_CONTENT: &str = "alpha beta\n";
pub const DEEP_CONTENT: &str = "x\n";

/// Sum of every regular file in the fixture tree.
pub const FIXTURE_TOTAL_BYTES: u64 =
    (FIXTURE_FILE_CONTENT.len() + NOTES_CONTENT.len() + DEEP_CONTENT.len()) as u64;

/// Layout:
///
/// ```text
/// testfile.txt
/// subdir/
/// docs/notes.txt
/// docs/nested/deep.txt
/// ```
pub fn fixture_tar_bytes() -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    append_dir(&mut builder, "subdir");
    append_dir(&mut builder, "docs");
    append_dir(&mut builder, "docs/nested");
    append_file(&mut builder, "testfile.txt", FIXTURE_FILE_CONTENT);
    append_file(&mut builder, "docs/notes.txt", NOTES_CONTENT);
    append_file(&mut builder, "docs/nested/deep.txt", DEEP_CONTENT);
    builder.into_inner().unwrap()
}

fn append_dir(builder: &mut tar::Builder<Vec<u8>>, path: &str) {
    let mut header = tar::Header::new_gnu();
    header.set_entry_type(tar::EntryType::Directory);
    header.set_mode(0o755);
    header.set_size(0);
    builder.append_data(&mut header, path, std::io::empty()).unwrap();
}

fn append_file(builder: &mut tar::Builder<Vec<u8>>, path: &str, content: &str) {
    let mut header = tar::Header::new_gnu();
    header.set_entry_type(tar::EntryType::Regular);
    header.set_mode(0o644);
    header.set_size(content.len() as u64);
    builder
        .append_data(&mut header, path, content.as_bytes())
        .unwrap();
}

pub fn write_fixture_archive(dir: &Path) -> PathBuf {
    let path = dir.join("testvfs.tar");
    fs::write(&path, fixture_tar_bytes()).unwrap();
    path
}

pub fn write_fixture_archive_gz(dir: &Path) -> PathBuf {
    let path = dir.join("testvfs.tar.gz");
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&fixture_tar_bytes()).unwrap();
    fs::write(&path, encoder.finish().unwrap()).unwrap();
    path
}

/// A session staged from the fixture archive. Keep the `TempDir` alive for
/// as long as the session is used.
pub fn fixture_session() -> (TempDir, Session) {
    let tmp = tempfile::tempdir().unwrap();
    let archive = write_fixture_archive(tmp.path());
    let store = StagingStore::prepare(&archive, tmp.path().join("stage")).unwrap();
    (tmp, Session::new(store))
}
