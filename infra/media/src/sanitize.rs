//! Lexical cleaning of untrusted path tokens.
//!
//! Everything here is pure string logic: nothing touches the filesystem. The same rules apply
//! to upload filenames, subdirectory classifiers, and references handed back for deletion, so
//! a reference this crate issued always sanitizes to itself.

use crate::error::MediaError;
use std::fmt;

const SEPARATOR: char = '/';

/// A token that passed [`sanitize`]: relative, non-empty, `/`-separated, with no empty, `.`,
/// or `..` segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SanitizedPath(String);

impl SanitizedPath {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(SEPARATOR)
    }

    /// The last segment.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.0.rsplit(SEPARATOR).next().unwrap_or(&self.0)
    }

    /// Text after the final `.` of the last segment, lower-cased; `None` when absent or empty.
    #[must_use]
    pub fn extension(&self) -> Option<String> {
        extension_of(self.file_name())
    }
}

impl AsRef<str> for SanitizedPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SanitizedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Cleans one untrusted token.
///
/// * `\` is treated as a separator, runs of separators collapse, and `.` segments drop out.
/// * Any `..` in the token is rejected, even inside a segment like `a..b`. Nothing is ever
///   stripped and retried.
/// * Absolute paths (`/x`, `\x`, `C:...`), NUL bytes, and empty or whitespace-only tokens or
///   segments are rejected.
///
/// # Errors
/// Every rejection is [`MediaError::PathTraversal`].
pub fn sanitize(token: &str) -> Result<SanitizedPath, MediaError> {
    if token.trim().is_empty() {
        return Err(MediaError::traversal(token, "Name is empty"));
    }
    if token.contains('\0') {
        return Err(MediaError::traversal(token, "Name contains a NUL byte"));
    }
    if token.contains("..") {
        return Err(MediaError::traversal(token, "Name contains a '..' sequence"));
    }
    if token.starts_with(['/', '\\']) || has_drive_prefix(token) {
        return Err(MediaError::traversal(token, "Absolute paths are not allowed"));
    }

    let mut cleaned = String::with_capacity(token.len());
    for segment in token.split(['/', '\\']).filter(|s| !s.is_empty() && *s != ".") {
        if segment.trim().is_empty() {
            return Err(MediaError::traversal(token, "Name has a blank segment"));
        }
        if !cleaned.is_empty() {
            cleaned.push(SEPARATOR);
        }
        cleaned.push_str(segment);
    }

    if cleaned.is_empty() {
        return Err(MediaError::traversal(token, "Name has no usable segments"));
    }

    Ok(SanitizedPath(cleaned))
}

/// Extension of a bare file name: text after the final `.`, lower-cased, if non-empty.
pub(crate) fn extension_of(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    (!ext.is_empty()).then(|| ext.to_lowercase())
}

fn has_drive_prefix(token: &str) -> bool {
    let bytes = token.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}
