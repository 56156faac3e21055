//! Append-only link log
//!
//! One observed href per line, UTF-8, no header and no escaping. The file is created
//! on the first append if it does not exist and is appended to otherwise.

use crate::LogWriteError;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Serialized writer for the link log
///
/// Each append is one critical section, so lines from concurrent extractions never
/// interleave. A failed write drops the file handle; the next append reopens it.
#[derive(Debug)]
pub struct LinkLog {
    path: PathBuf,
    file: Mutex<Option<File>>,
}

impl LinkLog {
    /// Creates a log writer for `path` without touching the filesystem
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file: Mutex::new(None),
        }
    }

    /// Returns the path of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one record as a single line
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The line was written
    /// * `Err(LogWriteError)` - The file could not be opened or written; the record is lost
    pub fn append(&self, href: &str) -> Result<(), LogWriteError> {
        let mut guard = self.file.lock().unwrap_or_else(PoisonError::into_inner);

        let mut file = match guard.take() {
            Some(file) => file,
            None => OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)
                .map_err(|source| self.write_error(source))?,
        };

        let line = format!("{}\n", href);
        file.write_all(line.as_bytes())
            .map_err(|source| self.write_error(source))?;

        *guard = Some(file);
        Ok(())
    }

    fn write_error(&self, source: std::io::Error) -> LogWriteError {
        LogWriteError {
            path: self.path.display().to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::tempdir;

    #[test]
    fn test_new_does_not_create_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("links.txt");
        let _log = LinkLog::new(&path);
        assert!(!path.exists());
    }

    #[test]
    fn test_append_creates_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("links.txt");
        let log = LinkLog::new(&path);

        log.append("https://example.com/about").unwrap();
        log.append("https://external.example").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "https://example.com/about\nhttps://external.example\n");
    }

    #[test]
    fn test_append_keeps_existing_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("links.txt");
        std::fs::write(&path, "previous-run\n").unwrap();

        let log = LinkLog::new(&path);
        log.append("/next").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "previous-run\n/next\n");
    }

    #[test]
    fn test_duplicates_are_recorded() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("links.txt");
        let log = LinkLog::new(&path);

        log.append("https://example.com/").unwrap();
        log.append("https://example.com/").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn test_unwritable_path_reports_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("links.txt");
        let log = LinkLog::new(&path);

        let err = log.append("/about").unwrap_err();
        assert!(err.path.ends_with("links.txt"));
    }

    #[test]
    fn test_recovers_once_path_becomes_writable() {
        let dir = tempdir().unwrap();
        let parent = dir.path().join("later");
        let path = parent.join("links.txt");
        let log = LinkLog::new(&path);

        assert!(log.append("/lost").is_err());
        std::fs::create_dir(&parent).unwrap();
        log.append("/kept").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "/kept\n");
    }

    #[test]
    fn test_concurrent_appends_do_not_interleave() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("links.txt");
        let log = Arc::new(LinkLog::new(&path));

        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let log = Arc::clone(&log);
                std::thread::spawn(move || {
                    for i in 0..50 {
                        log.append(&format!("https://example.com/{}/{}", worker, i))
                            .unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 400);
        assert!(lines
            .iter()
            .all(|line| line.starts_with("https://example.com/") && line.matches('/').count() == 4));
    }
}
