//! Rolling File Logger
//!
//! Installs a global `tracing` subscriber that writes to `<dir>/<app>.log`.
//! When the live file would grow past its size limit it is shifted to
//! `<app>.log.1`, older files move up by one, and the oldest is dropped, so
//! the directory holds a fixed ring of log files.
//!
//! Records emitted through the `log` facade are bridged into the same
//! subscriber.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Size at which the live log file is rotated
pub const DEFAULT_MAX_BYTES: u64 = 5 * 1024 * 1024;
/// Number of rotated files kept next to the live one
pub const DEFAULT_MAX_FILES: usize = 3;

/// Errors raised while setting up the logger
#[derive(Debug)]
pub enum LoggerError {
    Io(io::Error),
    Init(String),
}

impl std::fmt::Display for LoggerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoggerError::Io(e) => write!(f, "Log file error: {}", e),
            LoggerError::Init(msg) => write!(f, "Logger init failed: {}", msg),
        }
    }
}

impl std::error::Error for LoggerError {}

impl From<io::Error> for LoggerError {
    fn from(e: io::Error) -> Self {
        LoggerError::Io(e)
    }
}

/// Initialize the global logger writing into `log_dir`.
///
/// The level comes from `RUST_LOG` and defaults to `info`.
pub fn init_logger(log_dir: PathBuf, app_name: &str) -> Result<(), LoggerError> {
    let file = RollingFile::open(&log_dir, app_name, DEFAULT_MAX_BYTES, DEFAULT_MAX_FILES)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(LocalTime)
        .with_ansi(false)
        .with_writer(file)
        .try_init()
        .map_err(|e| LoggerError::Init(e.to_string()))?;

    log::info!("logger initialized in {}", log_dir.display());
    Ok(())
}

/// Log an info line
pub fn info(msg: &str) {
    log::info!("{}", msg);
}

/// Log an error line
pub fn error(msg: &str) {
    log::error!("{}", msg);
}

/// Local wall-clock timestamps
struct LocalTime;

impl FormatTime for LocalTime {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

struct FileState {
    file: File,
    written: u64,
}

/// Size-bounded log file with numbered backups
pub struct RollingFile {
    path: PathBuf,
    max_bytes: u64,
    max_files: usize,
    state: Mutex<FileState>,
}

impl RollingFile {
    pub fn open(dir: &Path, app_name: &str, max_bytes: u64, max_files: usize) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.log", app_name));
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let written = file.metadata()?.len();

        Ok(Self {
            path,
            max_bytes,
            max_files,
            state: Mutex::new(FileState { file, written }),
        })
    }

    /// Path of the live log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn backup_path(&self, n: usize) -> PathBuf {
        PathBuf::from(format!("{}.{}", self.path.display(), n))
    }

    fn rotate(&self, state: &mut FileState) -> io::Result<()> {
        state.file.flush()?;

        if self.max_files > 0 {
            let oldest = self.backup_path(self.max_files);
            if oldest.exists() {
                fs::remove_file(&oldest)?;
            }
            for n in (1..self.max_files).rev() {
                let from = self.backup_path(n);
                if from.exists() {
                    fs::rename(&from, self.backup_path(n + 1))?;
                }
            }
            fs::rename(&self.path, self.backup_path(1))?;
        }

        state.file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)?;
        state.written = 0;
        Ok(())
    }

    fn write_record(&self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log file lock poisoned"))?;

        if state.written > 0 && state.written + buf.len() as u64 > self.max_bytes {
            self.rotate(&mut state)?;
        }

        state.file.write_all(buf)?;
        state.written += buf.len() as u64;
        Ok(buf.len())
    }

    fn flush_file(&self) -> io::Result<()> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log file lock poisoned"))?;
        state.file.flush()
    }
}

/// Per-event writer handed out to the fmt layer
pub struct RollingWriter<'a> {
    inner: &'a RollingFile,
}

impl Write for RollingWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write_record(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush_file()
    }
}

impl<'a> MakeWriter<'a> for RollingFile {
    type Writer = RollingWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        RollingWriter { inner: self }
    }
}
