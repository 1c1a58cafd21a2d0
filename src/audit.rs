use chrono::Local;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Append-only record of every executed command line.
///
/// Each entry is `<timestamp> - <line>` and is flushed immediately, so the
/// record survives even if the command that follows fails.
pub struct AuditLog {
    sink: Box<dyn Write>,
}

impl AuditLog {
    /// Append to the file at `path`, creating it if needed.
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::from_writer(file))
    }

    pub fn from_writer(sink: impl Write + 'static) -> Self {
        Self {
            sink: Box::new(sink),
        }
    }

    /// A log that discards everything.
    pub fn disabled() -> Self {
        Self::from_writer(io::sink())
    }

    pub fn append(&mut self, line: &str) -> io::Result<()> {
        writeln!(
            self.sink,
            "{} - {}",
            Local::now().format(TIMESTAMP_FORMAT),
            line
        )?;
        self.sink.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io_adapters::SharedBuffer;
    use regex::Regex;
    use std::fs;

    #[test]
    fn test_append_format() {
        let buf = SharedBuffer::new();
        let mut log = AuditLog::from_writer(buf.clone());
        log.append("cd subdir").unwrap();
        log.append("ls").unwrap();

        let re = Regex::new(r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}\.\d{6} - (.*)$").unwrap();
        let text = buf.contents();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(&re.captures(lines[0]).unwrap()[1], "cd subdir");
        assert_eq!(&re.captures(lines[1]).unwrap()[1], "ls");
    }

    #[test]
    fn test_open_appends_to_existing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("emulator.log");
        fs::write(&path, "earlier session\n").unwrap();

        let mut log = AuditLog::open(&path).unwrap();
        log.append("exit").unwrap();
        drop(log);

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("earlier session\n"));
        assert!(text.trim_end().ends_with(" - exit"));
    }
}
