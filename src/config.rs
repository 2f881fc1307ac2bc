//! Application configuration, read from the environment.

use std::path::PathBuf;

pub const DB_PATH_VAR: &str = "NISHIKI_DB_PATH";
pub const LOG_DIR_VAR: &str = "NISHIKI_LOG_DIR";
pub const DEFAULT_DB_PATH: &str = "nishiki.db";
pub const DEFAULT_APP_NAME: &str = "nishiki";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// SQLite file, or `:memory:`
    pub db_path: PathBuf,
    /// File logging is off when unset
    pub log_dir: Option<PathBuf>,
    pub app_name: String,
}

impl AppConfig {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            log_dir: None,
            app_name: DEFAULT_APP_NAME.to_string(),
        }
    }

    pub fn with_log_dir(mut self, log_dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(log_dir.into());
        self
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let present = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let config = Self::new(present(DB_PATH_VAR).unwrap_or_else(|| DEFAULT_DB_PATH.to_string()));
        match present(LOG_DIR_VAR) {
            Some(dir) => config.with_log_dir(dir),
            None => config,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DB_PATH)
    }
}
