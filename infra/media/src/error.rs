use std::borrow::Cow;
use std::io;

/// Failures of the media storage subsystem.
///
/// Only [`MediaError::StorageIo`] is worth retrying; every other variant means the caller
/// supplied something that will never be accepted.
#[cadenza_derive::cadenza_error]
pub enum MediaError {
    /// The upload carried no bytes.
    #[error("Empty payload{}: {message}", format_context(.context))]
    EmptyPayload { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A filename, subdirectory, or reference tried to leave the storage root or was unusable
    /// as a path (empty, absolute, `..`, NUL).
    #[error("Path traversal rejected{}: {message}", format_context(.context))]
    PathTraversal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Neither the declared type nor the extension matches the required media class.
    #[error("Unsupported media type{}: {message}", format_context(.context))]
    UnsupportedMediaType { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Any filesystem failure: permissions, disk full, vanished root, missing file on read.
    #[error("Storage I/O failure{}: {source}", format_context(.context))]
    StorageIo { source: io::Error, context: Option<Cow<'static, str>> },
}

impl MediaError {
    /// Whether repeating the whole logical operation may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::StorageIo { .. })
    }

    /// Whether this is an I/O failure caused by a missing file or directory.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::StorageIo { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }

    pub(crate) fn traversal(token: &str, reason: &'static str) -> Self {
        Self::PathTraversal { message: format!("{token:?}").into(), context: Some(reason.into()) }
    }
}
