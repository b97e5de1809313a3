use crate::error::MediaError;
use crate::maintenance::ORPHAN_AGE;
use crate::root::StorageRoot;
use crate::store::MediaStore;
use private::Sealed;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone)]
struct OpenOptions {
    create: bool,
    purge_orphans: bool,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self { create: true, purge_orphans: true }
    }
}

#[derive(Debug, Default)]
pub struct NoRoot;
#[derive(Debug)]
pub struct WithRoot(PathBuf);

mod private {
    pub(super) trait Sealed {}
}
impl Sealed for NoRoot {}
impl Sealed for WithRoot {}

/// Type-state builder for [`MediaStore`]; [`MediaStoreBuilder::open`] exists only once a root
/// has been given.
#[allow(private_bounds)]
#[derive(Debug, Default)]
pub struct MediaStoreBuilder<S: Sealed = NoRoot> {
    state: S,
    options: OpenOptions,
}

#[allow(private_bounds)]
impl<S: Sealed> MediaStoreBuilder<S> {
    /// Create the root and missing ancestors when absent (default `true`).
    #[must_use = "The store is not opened until you call .open()"]
    pub const fn create(mut self, enable: bool) -> Self {
        self.options.create = enable;
        self
    }

    /// Sweep abandoned temp files left by crashed writers while opening (default `true`).
    #[must_use = "The store is not opened until you call .open()"]
    pub const fn purge_orphans(mut self, enable: bool) -> Self {
        self.options.purge_orphans = enable;
        self
    }
}

impl MediaStoreBuilder<NoRoot> {
    #[must_use = "The store is not opened until you call .open()"]
    pub fn new() -> Self {
        Self::default()
    }

    /// The storage root, as configured; relative paths resolve against the working directory.
    #[must_use = "The store is not opened until you call .open()"]
    pub fn root(self, path: impl Into<PathBuf>) -> MediaStoreBuilder<WithRoot> {
        MediaStoreBuilder { state: WithRoot(path.into()), options: self.options }
    }
}

impl MediaStoreBuilder<WithRoot> {
    /// Establishes the storage root and returns a shareable handle.
    ///
    /// # Errors
    ///
    /// [`MediaError::StorageIo`] when the root cannot be created or resolved, is not a
    /// directory, or is read-only. Callers should treat this as fatal: a process without a
    /// usable root must not serve requests.
    pub async fn open(self) -> Result<MediaStore, MediaError> {
        let root = StorageRoot::establish(&self.state.0, self.options.create).await?;
        let store = MediaStore { root: Arc::new(root) };

        if self.options.purge_orphans {
            store.purge_orphans_older_than(ORPHAN_AGE).await;
        }

        Ok(store)
    }
}
