use crate::error::{MediaError, MediaErrorExt};
use crate::sanitize::SanitizedPath;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

/// The canonical, absolute directory every stored file lives under.
///
/// Established once at startup and never changed; it is the trust anchor every reference is
/// resolved against.
#[derive(Debug)]
pub struct StorageRoot {
    path: PathBuf,
}

impl StorageRoot {
    /// Resolves `path` (possibly relative) to a canonical directory.
    ///
    /// With `create`, the directory and any missing ancestors are created first. A root that
    /// cannot be created, does not exist, is not a directory, or is read-only is an
    /// unrecoverable startup error for the owning process.
    pub(crate) async fn establish(path: &Path, create: bool) -> Result<Self, MediaError> {
        if path.as_os_str().is_empty() {
            return Err(MediaError::StorageIo {
                source: io::Error::new(io::ErrorKind::InvalidInput, "empty storage root path"),
                context: None,
            });
        }

        if create {
            fs::create_dir_all(path)
                .await
                .context(format!("Failed to bootstrap storage root {}", path.display()))?;
        }

        let canonical = fs::canonicalize(path)
            .await
            .context(format!("Failed to resolve storage root {}", path.display()))?;

        let meta = fs::metadata(&canonical)
            .await
            .context(format!("Failed to inspect storage root {}", canonical.display()))?;

        if !meta.is_dir() {
            return Err(MediaError::StorageIo {
                source: io::Error::new(io::ErrorKind::NotADirectory, "storage root is not a directory"),
                context: Some(canonical.display().to_string().into()),
            });
        }
        if meta.permissions().readonly() {
            return Err(MediaError::StorageIo {
                source: io::Error::new(io::ErrorKind::PermissionDenied, "storage root is read-only"),
                context: Some(canonical.display().to_string().into()),
            });
        }

        info!(path = %canonical.display(), "Storage root established");
        Ok(Self { path: canonical })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Maps a sanitized relative path onto the disk and checks it stays physically inside the
    /// root.
    ///
    /// Sanitization already rules out lexical escapes; this catches symlinks. The nearest
    /// ancestor that exists on disk is canonicalized and must still sit under the root, so a
    /// subdirectory that is really a link to `/etc` is refused even though its name is clean.
    pub(crate) fn confine(&self, relative: &SanitizedPath) -> Result<PathBuf, MediaError> {
        let joined = relative.segments().fold(self.path.clone(), |mut acc, seg| {
            acc.push(seg);
            acc
        });

        let mut current = Some(joined.as_path());
        while let Some(candidate) = current {
            if candidate == self.path {
                return Ok(joined);
            }

            match std::fs::symlink_metadata(candidate) {
                Ok(_) => {
                    let canonical = match candidate.canonicalize() {
                        Ok(canonical) => canonical,
                        // A dangling link points nowhere we can vouch for.
                        Err(e) if e.kind() == io::ErrorKind::NotFound => {
                            return Err(self.escape(relative, "Dangling link inside storage root"));
                        },
                        Err(e) => {
                            return Err(MediaError::StorageIo {
                                source: e,
                                context: Some(format!("Failed to verify {relative}").into()),
                            });
                        },
                    };
                    return if canonical.starts_with(&self.path) {
                        Ok(joined)
                    } else {
                        Err(self.escape(relative, "Resolves outside the storage root"))
                    };
                },
                Err(e) if e.kind() == io::ErrorKind::NotFound => current = candidate.parent(),
                Err(e) => {
                    return Err(MediaError::StorageIo {
                        source: e,
                        context: Some(format!("Failed to verify {relative}").into()),
                    });
                },
            }
        }

        Err(self.escape(relative, "No ancestor inside the storage root"))
    }

    fn escape(&self, relative: &SanitizedPath, reason: &'static str) -> MediaError {
        warn!(root = %self.path.display(), path = %relative, reason, "Blocked storage escape");
        MediaError::traversal(relative.as_str(), reason)
    }
}
