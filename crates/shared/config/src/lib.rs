//! Settings shared by Cadenza binaries.
//!
//! The media core itself never reads configuration: binaries load [`Settings`] here and pass
//! the resolved values into the subsystems that need them.
//!
//! ```rust,no_run
//! use cadenza_config::load_settings;
//!
//! let settings = load_settings(Some("mediactl.toml")).unwrap();
//! println!("storage root: {}", settings.storage.root.display());
//! ```

mod loader;
mod settings;

pub use loader::{ENV_PREFIX, SettingsError, SettingsErrorExt, load_settings};
pub use settings::{DEFAULT_STORAGE_ROOT, LogSettings, Settings, StorageSettings};
