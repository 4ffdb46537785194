//! Size-rotated log files
//!
//! Log files are named `app_<YYYY-MM-DD_HH-MM-SS>.log`. Once the current
//! file reaches the configured size a fresh timestamped file is opened.

use crate::errors::{Result, ShipError};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// Log file writer that rotates by size
#[derive(Debug)]
pub struct RotatingFileWriter {
    dir: PathBuf,
    max_bytes: u64,
    file: File,
    path: PathBuf,
    written: u64,
}

impl RotatingFileWriter {
    /// Create `dir` if needed and open the first log file
    ///
    /// `max_bytes == 0` disables rotation.
    ///
    /// # Errors
    ///
    /// Returns `ShipError::Io` when the directory or file cannot be created.
    pub fn open(dir: impl AsRef<Path>, max_bytes: u64) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| ShipError::io("create_log_dir", &e))?;
        let (file, path) =
            open_new_log_file(&dir).map_err(|e| ShipError::io("open_log_file", &e))?;
        Ok(Self {
            dir,
            max_bytes,
            file,
            path,
            written: 0,
        })
    }

    /// Path of the file currently being written
    pub fn current_path(&self) -> &Path {
        &self.path
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;
        let (file, path) = open_new_log_file(&self.dir)?;
        self.file = file;
        self.path = path;
        self.written = 0;
        Ok(())
    }
}

impl Write for RotatingFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.file.write(buf)?;
        self.written += n as u64;
        if self.max_bytes > 0 && self.written >= self.max_bytes {
            self.rotate()?;
        }
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

/// Several files can be opened within the same second, so a counter
/// suffix keeps names unique.
fn open_new_log_file(dir: &Path) -> io::Result<(File, PathBuf)> {
    let stamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S").to_string();
    let mut candidate = dir.join(format!("app_{}.log", stamp));
    let mut counter = 1u32;
    loop {
        match File::options().write(true).create_new(true).open(&candidate) {
            Ok(file) => return Ok((file, candidate)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                candidate = dir.join(format!("app_{}_{}.log", stamp, counter));
                counter += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Shared handle to a rotating log file, usable as a tracing writer
#[derive(Debug, Clone)]
pub struct LogFile(Arc<Mutex<RotatingFileWriter>>);

impl LogFile {
    pub fn new(writer: RotatingFileWriter) -> Self {
        Self(Arc::new(Mutex::new(writer)))
    }

    /// Path of the file currently being written
    pub fn current_path(&self) -> Option<PathBuf> {
        self.0.lock().ok().map(|w| w.current_path().to_path_buf())
    }
}

impl Write for LogFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log file lock poisoned"))?
            .write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log file lock poisoned"))?
            .flush()
    }
}

impl<'a> MakeWriter<'a> for LogFile {
    type Writer = LogFile;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn log_files(dir: &Path) -> Vec<PathBuf> {
        let mut files: Vec<_> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| p.extension().map(|x| x == "log").unwrap_or(false))
            .collect();
        files.sort();
        files
    }

    #[test]
    fn test_open_creates_directory_and_file() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("logs");

        let writer = RotatingFileWriter::open(&dir, 0).unwrap();

        assert!(writer.current_path().exists());
        let name = writer.current_path().file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("app_"));
        assert!(name.ends_with(".log"));
    }

    #[test]
    fn test_no_rotation_when_disabled() {
        let temp_dir = TempDir::new().unwrap();
        let mut writer = RotatingFileWriter::open(temp_dir.path(), 0).unwrap();

        for _ in 0..50 {
            writer.write_all(b"0123456789\n").unwrap();
        }

        assert_eq!(log_files(temp_dir.path()).len(), 1);
    }

    #[test]
    fn test_rotates_after_size_limit() {
        let temp_dir = TempDir::new().unwrap();
        let mut writer = RotatingFileWriter::open(temp_dir.path(), 32).unwrap();
        let first = writer.current_path().to_path_buf();

        writer.write_all(&[b'a'; 40]).unwrap();
        writer.write_all(b"after rotation\n").unwrap();
        writer.flush().unwrap();

        assert_ne!(writer.current_path(), first.as_path());
        assert_eq!(log_files(temp_dir.path()).len(), 2);
        assert_eq!(fs::read(&first).unwrap().len(), 40);
        assert_eq!(
            fs::read_to_string(writer.current_path()).unwrap(),
            "after rotation\n"
        );
    }

    #[test]
    fn test_log_file_handle_shares_writer() {
        let temp_dir = TempDir::new().unwrap();
        let handle = LogFile::new(RotatingFileWriter::open(temp_dir.path(), 0).unwrap());
        let mut a = handle.clone();
        let mut b = handle.make_writer();

        a.write_all(b"one\n").unwrap();
        b.write_all(b"two\n").unwrap();
        a.flush().unwrap();

        let path = handle.current_path().unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "one\ntwo\n");
    }
}
