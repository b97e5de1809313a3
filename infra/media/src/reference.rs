use crate::error::MediaError;
use crate::sanitize::SanitizedPath;
use std::fmt;

/// Random bytes per generated name (128 bits).
const TOKEN_BYTES: usize = 16;

/// Length of the hex token at the start of every generated name.
pub const TOKEN_LEN: usize = TOKEN_BYTES * 2;

/// Storage name of a single upload: `<32 lowercase hex>[.<lowercased extension>]`.
///
/// Only the extension of the original filename survives; the rest of it never reaches the disk.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GeneratedName(String);

impl GeneratedName {
    /// Draws a fresh name from the OS CSPRNG.
    ///
    /// No check against existing files is made: 128 random bits make a repeat negligible.
    ///
    /// # Errors
    /// [`MediaError::StorageIo`] if the system entropy source fails.
    pub fn allocate(original: &SanitizedPath) -> Result<Self, MediaError> {
        let mut bytes = [0u8; TOKEN_BYTES];
        getrandom::fill(&mut bytes).map_err(|e| MediaError::StorageIo {
            source: std::io::Error::other(e.to_string()),
            context: Some("Entropy source unavailable while allocating a storage name".into()),
        })?;

        let mut name = hex::encode(bytes);
        if let Some(ext) = original.extension() {
            name.push('.');
            name.push_str(&ext);
        }
        Ok(Self(name))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn token(&self) -> &str {
        &self.0[..TOKEN_LEN]
    }

    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        self.0.get(TOKEN_LEN + 1..)
    }
}

impl fmt::Display for GeneratedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The opaque handle returned by a successful store: `<subdirectory>/<generated name>`.
///
/// Always `/`-separated regardless of the host OS, and always inside the storage root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StoredFileReference(String);

impl StoredFileReference {
    pub(crate) fn new(subdirectory: &SanitizedPath, name: &GeneratedName) -> Self {
        Self(format!("{subdirectory}/{name}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn subdirectory(&self) -> &str {
        self.0.rsplit_once('/').map_or("", |(dir, _)| dir)
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        self.0.rsplit_once('/').map_or(&self.0, |(_, name)| name)
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for StoredFileReference {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoredFileReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<StoredFileReference> for String {
    fn from(reference: StoredFileReference) -> Self {
        reference.0
    }
}

impl PartialEq<str> for StoredFileReference {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}
