use crate::settings::Settings;
use config::{Config, Environment, File};
use std::borrow::Cow;
use std::path::Path;

/// Prefix of environment overrides; nesting uses `__` (`CADENZA__STORAGE__ROOT`).
pub const ENV_PREFIX: &str = "CADENZA";

#[cadenza_derive::cadenza_error]
pub enum SettingsError {
    #[error("Settings error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads [`Settings`] from an optional file, then applies environment overrides.
///
/// The file format follows its extension (`.toml`, `.yaml`, `.json`, ...). A missing file is
/// not an error: defaults plus the environment still produce a complete document. A file that
/// exists but does not parse, or values of the wrong type, are errors.
pub fn load_settings(path: Option<impl AsRef<Path>>) -> Result<Settings, SettingsError> {
    load_from(path.as_ref().map(AsRef::<Path>::as_ref), env_source())
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX).separator("__")
}

pub(crate) fn load_from(path: Option<&Path>, env: Environment) -> Result<Settings, SettingsError> {
    let mut builder = Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(File::from(path).required(false));
    }

    builder
        .add_source(env)
        .build()
        .context("Failed to assemble settings sources")?
        .try_deserialize::<Settings>()
        .context("Failed to deserialize settings")
}
