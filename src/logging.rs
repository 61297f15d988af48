use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;
use log::{Log, Metadata, Record};

use crate::config::CssVarOptions;

struct FileLogger {
    file: Mutex<std::fs::File>,
}

impl FileLogger {
    fn new(file_path: PathBuf) -> io::Result<Self> {
        // Create parent directories if they don't exist
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(file_path)?;

        Ok(FileLogger {
            file: Mutex::new(file),
        })
    }
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            if let Ok(mut file) = self.file.lock() {
                let _ = writeln!(
                    file,
                    "[{}] [{}] [{}] {}",
                    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                    record.level(),
                    record.target(),
                    record.args()
                );
                let _ = file.flush();
            }
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

/// Get the platform-specific log file path
fn default_log_file_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let data_dir = dirs::data_local_dir()
        .ok_or("Could not determine local data directory")?;

    Ok(data_dir.join("cssvar").join("cssvar.log"))
}

/// Initialize the logger to write to a single file, overwriting previous logs.
/// Uses `options.log_file` when set, otherwise a file in local app data.
pub fn init_logger(options: &CssVarOptions) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let log_file_path = match &options.log_file {
        Some(path) => path.clone(),
        None => default_log_file_path()?,
    };
    let logger = FileLogger::new(log_file_path.clone())?;

    log::set_boxed_logger(Box::new(logger))
        .map(|()| log::set_max_level(options.level_filter()))?;

    Ok(log_file_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_logger_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cssvar.log");

        let _logger = FileLogger::new(path.clone()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_file_logger_truncates_previous_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cssvar.log");
        fs::write(&path, "old content").unwrap();

        let logger = FileLogger::new(path.clone()).unwrap();
        logger.flush();

        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }
}
