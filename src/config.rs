//! Database configuration
//!
//! ```json
//! { "name": "myDB", "data_dir": "./data", "pretty": true, "log_level": "info" }
//! ```
//!
//! Only `name` is required. The backing file is `<data_dir>/<name>.json`;
//! `data_dir` defaults to the working directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::engine::{DbError, DbResult};
use crate::observability::Severity;

/// Configuration for one database instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbConfig {
    /// Database name; the backing file is `<name>.json`
    pub name: String,

    /// Directory holding the backing file (default: working directory)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Pretty-print the document with two-space indentation (default: true)
    #[serde(default = "default_pretty")]
    pub pretty: bool,

    /// Minimum log severity: trace, info, warn or error (default: info)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_pretty() -> bool {
    true
}
fn default_log_level() -> String {
    "info".to_string()
}

impl DbConfig {
    /// Configuration with defaults for everything but the name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_dir: default_data_dir(),
            pretty: default_pretty(),
            log_level: default_log_level(),
        }
    }

    /// Sets the data directory
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    /// Sets pretty printing
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Sets the minimum log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> DbResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| DbError::Config(format!("Failed to read config: {}", e)))?;

        let config: DbConfig = serde_json::from_str(&content)
            .map_err(|e| DbError::Config(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> DbResult<()> {
        if self.name.is_empty() {
            return Err(DbError::Config("name must not be empty".into()));
        }

        if self.name == "." || self.name == ".." || self.name.contains(['/', '\\']) {
            return Err(DbError::Config(format!(
                "Invalid name: '{}'. Must be a plain file stem.",
                self.name
            )));
        }

        match Severity::parse(&self.log_level) {
            Some(Severity::Fatal) | None => Err(DbError::Config(format!(
                "Invalid log_level: '{}'. Must be trace, info, warn or error.",
                self.log_level
            ))),
            Some(_) => Ok(()),
        }
    }

    /// Path of the backing file
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.json", self.name))
    }

    /// Configured minimum log severity (INFO if unparseable)
    pub fn log_severity(&self) -> Severity {
        Severity::parse(&self.log_level).unwrap_or(Severity::Info)
    }
}
