//! Configuration types.

use std::path::PathBuf;

use crate::error::ConfigError;

/// Which backend holds the preference store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// One JSON document per store.
    File,
    /// A `preferences` table in a local libSQL database.
    Sqlite,
}

impl std::str::FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" | "json" => Ok(Self::File),
            "sqlite" | "libsql" => Ok(Self::Sqlite),
            other => Err(ConfigError::InvalidValue {
                key: "COURSE_EXPLORER_STORE".to_string(),
                message: format!("unknown store backend '{other}' (expected file or sqlite)"),
            }),
        }
    }
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory holding the preference store.
    pub data_dir: PathBuf,
    /// Name of the preference store (file stem / store column).
    pub store_name: String,
    /// Storage backend.
    pub backend: StoreBackend,
    /// When set, logs are also written to a daily-rolling file here.
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            store_name: "settings".to_string(),
            backend: StoreBackend::File,
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Build config from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let data_dir = std::env::var("COURSE_EXPLORER_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let store_name = match std::env::var("COURSE_EXPLORER_STORE_NAME") {
            Ok(name) => validate_store_name(name.trim())?,
            Err(_) => defaults.store_name,
        };

        let backend = match std::env::var("COURSE_EXPLORER_STORE") {
            Ok(s) => s.parse()?,
            Err(_) => defaults.backend,
        };

        let log_dir = std::env::var("COURSE_EXPLORER_LOG_DIR")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            data_dir,
            store_name,
            backend,
            log_dir,
        })
    }

    /// Path of the JSON preference document.
    pub fn preferences_file(&self) -> PathBuf {
        self.data_dir
            .join(format!("{}.preferences.json", self.store_name))
    }

    /// Path of the libSQL database file.
    pub fn database_file(&self) -> PathBuf {
        self.data_dir.join(format!("{}.db", self.store_name))
    }
}

fn default_data_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".course-explorer")
}

fn validate_store_name(name: &str) -> Result<String, ConfigError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(name.to_string())
    } else {
        Err(ConfigError::InvalidValue {
            key: "COURSE_EXPLORER_STORE_NAME".to_string(),
            message: format!("'{name}' must be non-empty and use only [A-Za-z0-9_-]"),
        })
    }
}
