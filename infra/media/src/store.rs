//! The media store handle: store, fetch, and delete uploads by reference.
//!
//! Every operation funnels its path input through [`sanitize`] and then through the root's
//! physical confinement check. The only shared state is the immutable root; concurrency is left
//! to the filesystem:
//! - each store writes a name nobody else can be writing (128 random bits),
//! - subdirectory creation treats "already exists" as success,
//! - bytes land under a hidden temp name and are renamed into place once synced.

use crate::builder::MediaStoreBuilder;
use crate::error::{MediaError, MediaErrorExt};
use crate::maintenance::{self, ORPHAN_AGE, PurgeReport};
use crate::payload::UploadPayload;
use crate::reference::{GeneratedName, StoredFileReference};
use crate::root::StorageRoot;
use crate::sanitize::sanitize;
use crate::validate::MediaKind;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::fs;
use tokio::io::{AsyncRead, AsyncWriteExt};
use tracing::{debug, warn};

/// A cheaply cloneable handle to the media storage subsystem.
///
/// # Example
///
/// ```rust
/// use cadenza_media::{MediaError, MediaKind, MediaStore, UploadPayload};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> Result<(), MediaError> {
///     # let tmp = tempfile::tempdir().unwrap();
///     # let root = tmp.path().join("uploads");
///     let store = MediaStore::builder().root(&root).open().await?;
///
///     let payload = UploadPayload::from_bytes(b"ID3...", "My Song.MP3", "audio/mpeg");
///     let reference = store.store_as(payload, "audio-files", MediaKind::Audio).await?;
///     assert!(reference.as_str().starts_with("audio-files/"));
///     assert!(reference.as_str().ends_with(".mp3"));
///
///     assert_eq!(store.read(reference.as_str()).await?, b"ID3...");
///
///     store.delete(reference.as_str()).await?;
///     store.delete(reference.as_str()).await?; // already gone: still Ok
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MediaStore {
    pub(crate) root: Arc<StorageRoot>,
}

impl MediaStore {
    #[must_use = "The store is not opened until you call .open()"]
    pub fn builder() -> MediaStoreBuilder {
        MediaStoreBuilder::new()
    }

    /// The canonical storage root.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// Stores an upload under `subdirectory` and returns its reference.
    ///
    /// Steps, each a hard precondition for the next:
    /// 1. reject an empty payload,
    /// 2. sanitize the original filename and the subdirectory,
    /// 3. allocate a random name carrying the original extension,
    /// 4. create the subdirectory if needed (racing creators are fine),
    /// 5. stream the bytes to a temp file, sync, and rename into place,
    /// 6. return `subdirectory/name`.
    ///
    /// # Errors
    ///
    /// * [`MediaError::EmptyPayload`] for a zero-length upload.
    /// * [`MediaError::PathTraversal`] for an unusable filename or subdirectory; nothing is
    ///   written in that case.
    /// * [`MediaError::StorageIo`] for filesystem failures, with the original filename in the
    ///   context.
    pub async fn store<R>(
        &self,
        payload: UploadPayload<R>,
        subdirectory: &str,
    ) -> Result<StoredFileReference, MediaError>
    where
        R: AsyncRead + Unpin,
    {
        self.store_checked(payload, subdirectory, None).await
    }

    /// Like [`MediaStore::store`], but the upload must belong to `kind`.
    ///
    /// # Errors
    ///
    /// Everything [`MediaStore::store`] returns, plus [`MediaError::UnsupportedMediaType`] when
    /// neither the declared type nor the extension matches `kind`. The check runs before any
    /// filesystem work.
    pub async fn store_as<R>(
        &self,
        payload: UploadPayload<R>,
        subdirectory: &str,
        kind: MediaKind,
    ) -> Result<StoredFileReference, MediaError>
    where
        R: AsyncRead + Unpin,
    {
        self.store_checked(payload, subdirectory, Some(kind)).await
    }

    async fn store_checked<R>(
        &self,
        payload: UploadPayload<R>,
        subdirectory: &str,
        required: Option<MediaKind>,
    ) -> Result<StoredFileReference, MediaError>
    where
        R: AsyncRead + Unpin,
    {
        let UploadPayload { mut reader, len, filename, content_type } = payload;

        if len == 0 {
            return Err(MediaError::EmptyPayload {
                message: format!("{filename:?}").into(),
                context: Some("Upload has no content".into()),
            });
        }

        let original = sanitize(&filename).inspect_err(|_| {
            warn!(filename = %filename, "Rejected upload filename");
        })?;
        let subdir = sanitize(subdirectory)?;

        if let Some(kind) = required
            && !kind.accepts(&content_type, original.as_str())
        {
            return Err(MediaError::UnsupportedMediaType {
                message: format!("{filename:?} declared as {content_type:?}").into(),
                context: Some(format!("expected {kind}").into()),
            });
        }

        let name = GeneratedName::allocate(&original)?;
        let dir = self.root.confine(&subdir)?;

        ensure_dir(&dir).await.context(format!("Storing {filename:?}: cannot prepare {subdir}"))?;

        let written = match commit(&mut reader, &dir, &name).await {
            Ok(written) => written,
            Err(CommitError::Empty) => {
                return Err(MediaError::EmptyPayload {
                    message: format!("{filename:?}").into(),
                    context: Some("Upload stream ended before any byte".into()),
                });
            },
            Err(CommitError::Io(source)) => {
                return Err(MediaError::StorageIo {
                    source,
                    context: Some(format!("Storing {filename:?} into {subdir}").into()),
                });
            },
        };

        let reference = StoredFileReference::new(&subdir, &name);
        debug!(reference = %reference, bytes = written, original = %filename, "Upload stored");
        Ok(reference)
    }

    /// Removes the file behind `reference`. Deleting something that is not there succeeds.
    ///
    /// The reference goes through the same sanitizer as upload filenames, so a tampered
    /// reference (`../../etc/passwd`) is refused before the filesystem is consulted.
    ///
    /// # Errors
    ///
    /// [`MediaError::PathTraversal`] for a tampered reference, [`MediaError::StorageIo`] for any
    /// removal failure other than "not found".
    pub async fn delete(&self, reference: &str) -> Result<(), MediaError> {
        let path = self.resolve(reference)?;

        match fs::remove_file(&path).await {
            Ok(()) => debug!(reference, "Stored file deleted"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(reference, "Stored file already absent");
            },
            Err(e) => {
                return Err(MediaError::StorageIo {
                    source: e,
                    context: Some(format!("Deleting {reference}").into()),
                });
            },
        }

        Ok(())
    }

    /// Reads the whole file behind `reference`.
    ///
    /// # Errors
    ///
    /// [`MediaError::PathTraversal`] for a tampered reference; [`MediaError::StorageIo`]
    /// otherwise, including a missing file (see [`MediaError::is_not_found`]).
    pub async fn read(&self, reference: &str) -> Result<Vec<u8>, MediaError> {
        let path = self.resolve(reference)?;
        fs::read(&path).await.context(format!("Reading {reference}"))
    }

    /// Opens the file behind `reference` for streaming reads.
    ///
    /// # Errors
    ///
    /// Same as [`MediaStore::read`].
    pub async fn open(&self, reference: &str) -> Result<fs::File, MediaError> {
        let path = self.resolve(reference)?;
        fs::File::open(&path).await.context(format!("Opening {reference}"))
    }

    /// Whether a file currently exists behind `reference`.
    ///
    /// # Errors
    ///
    /// [`MediaError::PathTraversal`] for a tampered reference; [`MediaError::StorageIo`] when
    /// existence cannot be determined.
    pub async fn exists(&self, reference: &str) -> Result<bool, MediaError> {
        let path = self.resolve(reference)?;
        fs::try_exists(&path).await.context(format!("Probing {reference}"))
    }

    /// Maps `reference` to its absolute path without touching the file itself.
    ///
    /// # Errors
    ///
    /// [`MediaError::PathTraversal`] when the reference is tampered or escapes through a link.
    pub fn resolve(&self, reference: &str) -> Result<PathBuf, MediaError> {
        let clean = sanitize(reference).inspect_err(|_| {
            warn!(reference, "Rejected stored file reference");
        })?;
        self.root.confine(&clean)
    }

    /// Removes temp files abandoned by writers that crashed mid-upload.
    pub async fn purge_orphans(&self) -> PurgeReport {
        self.purge_orphans_older_than(ORPHAN_AGE).await
    }

    /// [`MediaStore::purge_orphans`] with an explicit age threshold. In-flight uploads younger
    /// than `age` are left alone.
    pub async fn purge_orphans_older_than(&self, age: Duration) -> PurgeReport {
        maintenance::purge_orphans(self.root.path(), age).await
    }
}

enum CommitError {
    Empty,
    Io(io::Error),
}

impl From<io::Error> for CommitError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

/// Creates `dir` and its ancestors; a directory that already exists, or appears concurrently,
/// counts as success.
async fn ensure_dir(dir: &Path) -> io::Result<()> {
    match fs::create_dir_all(dir).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && dir.is_dir() => Ok(()),
        Err(e) => Err(e),
    }
}

/// Streams `reader` into `dir/name` through a hidden temp file. The temp file is removed again
/// on any failure, so no partial upload is ever visible under the final name.
async fn commit<R>(reader: &mut R, dir: &Path, name: &GeneratedName) -> Result<u64, CommitError>
where
    R: AsyncRead + Unpin,
{
    let target = dir.join(name.as_str());
    let temp = dir.join(maintenance::tmp_name(name.token()));

    let outcome = write_then_swap(reader, &temp, &target).await;
    if outcome.is_err() {
        if let Err(e) = fs::remove_file(&temp).await
            && e.kind() != io::ErrorKind::NotFound
        {
            warn!(path = %temp.display(), error = %e, "Failed to remove temp upload");
        }
    } else {
        sync_dir(dir).await;
    }

    outcome
}

async fn write_then_swap<R>(reader: &mut R, temp: &Path, target: &Path) -> Result<u64, CommitError>
where
    R: AsyncRead + Unpin,
{
    let mut file = fs::OpenOptions::new().create_new(true).write(true).open(temp).await?;
    let written = tokio::io::copy(reader, &mut file).await?;
    if written == 0 {
        return Err(CommitError::Empty);
    }
    file.flush().await?;
    file.sync_all().await?;
    drop(file);

    if let Err(e) = fs::rename(temp, target).await {
        // Some platforms refuse to rename over an existing target; only a name collision can
        // get here.
        if e.kind() != io::ErrorKind::AlreadyExists {
            return Err(e.into());
        }
        fs::remove_file(target).await?;
        fs::rename(temp, target).await?;
    }

    Ok(written)
}

async fn sync_dir(path: &Path) {
    match fs::File::open(path).await {
        Ok(dir) => {
            if let Err(e) = dir.sync_all().await {
                debug!(path = %path.display(), error = %e, "Directory sync failed");
            }
        },
        Err(e) => debug!(path = %path.display(), error = %e, "Directory open failed"),
    }
}
