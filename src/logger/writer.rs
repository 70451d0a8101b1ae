//! Log writer module
//!
//! Thread-safe log output to files or stdout/stderr. Log files are opened in
//! append mode and can be reopened after rotation.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

/// Global log writer instance
static LOG_WRITER: OnceLock<LogWriter> = OnceLock::new();

/// Log output target
enum LogTarget {
    Stdout,
    Stderr,
    File { path: String, file: File },
}

impl LogTarget {
    fn open(path: Option<&str>, console: Self) -> io::Result<Self> {
        match path {
            Some(path) => Ok(Self::File {
                path: path.to_string(),
                file: open_log_file(path)?,
            }),
            None => Ok(console),
        }
    }

    fn write_line(&mut self, message: &str) {
        match self {
            Self::Stdout => println!("{message}"),
            Self::Stderr => eprintln!("{message}"),
            Self::File { file, .. } => {
                let _ = writeln!(file, "{message}");
            }
        }
    }

    fn reopen(&mut self) -> io::Result<()> {
        if let Self::File { path, file } = self {
            *file = open_log_file(path)?;
        }
        Ok(())
    }
}

/// Thread-safe log writer
pub struct LogWriter {
    access: Mutex<LogTarget>,
    error: Mutex<LogTarget>,
}

impl LogWriter {
    fn new(access_log_file: Option<&str>, error_log_file: Option<&str>) -> io::Result<Self> {
        Ok(Self {
            access: Mutex::new(LogTarget::open(access_log_file, LogTarget::Stdout)?),
            error: Mutex::new(LogTarget::open(error_log_file, LogTarget::Stderr)?),
        })
    }

    /// Write to access log (also used for info messages)
    pub fn write_access(&self, message: &str) {
        lock(&self.access).write_line(message);
    }

    /// Write to error log
    pub fn write_error(&self, message: &str) {
        lock(&self.error).write_line(message);
    }

    /// Reopen file targets, e.g. after logrotate moved them away
    pub fn reopen(&self) -> io::Result<()> {
        lock(&self.access).reopen()?;
        lock(&self.error).reopen()
    }
}

fn lock(target: &Mutex<LogTarget>) -> MutexGuard<'_, LogTarget> {
    target.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Open or create a log file for appending
fn open_log_file(path: &str) -> io::Result<File> {
    // Create parent directories if they don't exist
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

/// Initialize the global log writer
///
/// This should be called once at application startup.
/// Returns error if log files cannot be opened.
pub fn init(access_log_file: Option<&str>, error_log_file: Option<&str>) -> io::Result<()> {
    let writer = LogWriter::new(access_log_file, error_log_file)?;
    LOG_WRITER.set(writer).map_err(|_| {
        io::Error::new(
            io::ErrorKind::AlreadyExists,
            "Log writer already initialized",
        )
    })
}

/// The global log writer, if initialized
pub fn get() -> Option<&'static LogWriter> {
    LOG_WRITER.get()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_target_appends_and_reopens() {
        let path = std::env::temp_dir()
            .join(format!("export-edge-log-{}", std::process::id()))
            .join("access.log");
        let path_str = path.to_str().unwrap();
        let writer = LogWriter::new(Some(path_str), None).unwrap();

        writer.write_access("first");
        std::fs::remove_file(&path).unwrap();
        writer.reopen().unwrap();
        writer.write_access("second");

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "second\n");
        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }
}
