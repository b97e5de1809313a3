use serde::Deserialize;
use std::path::PathBuf;

/// Relative directory used when no storage root is configured.
pub const DEFAULT_STORAGE_ROOT: &str = "uploads";

/// Top-level settings document.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub storage: StorageSettings,
    pub log: LogSettings,
}

/// Media storage settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Root directory for stored media; relative paths resolve against the working directory.
    pub root: PathBuf,
    /// Create the root (and missing ancestors) at startup instead of failing.
    pub create: bool,
}

/// Logging settings, mapped onto `cadenza_logger::LoggerBuilder` by the binaries.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub level: String,
    /// Extra filter directives, e.g. `cadenza_media=debug`.
    pub directive: Option<String>,
    pub console: bool,
    /// Enables rolling file output in this directory.
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub max_files: usize,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self { root: PathBuf::from(DEFAULT_STORAGE_ROOT), create: true }
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            directive: None,
            console: true,
            dir: None,
            json: false,
            max_files: 7,
        }
    }
}
