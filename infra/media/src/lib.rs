//! Sandboxed storage for uploaded media.
//!
//! Takes an untrusted byte stream plus an attacker-controlled filename and turns it into a
//! safely named file under a single storage root, addressable afterwards only through the
//! opaque reference it hands back.
//!
//! # Guarantees
//!
//! - **Traversal-proof**: filenames, subdirectories, and references pass one lexical sanitizer
//!   (`..` is rejected, never stripped) and a physical check against symlink escapes.
//! - **Collision-free names**: each upload gets 128 random bits plus its lower-cased original
//!   extension; nothing else of the client's filename reaches the disk.
//! - **No partial files**: bytes are streamed to a hidden temp file, synced, and renamed into
//!   place. Temp files orphaned by a crash are swept on startup.
//! - **Lock-free concurrency**: the only shared state is the immutable root; racing directory
//!   creation is success, not failure.
//!
//! # Layout
//!
//! 1. **[`MediaStore`]**: the cloneable handle; store, read, delete.
//! 2. **[`MediaStoreBuilder`]**: type-state builder that establishes the [`StorageRoot`].
//! 3. **[`sanitize`]** / **[`GeneratedName`]** / **[`MediaKind`]**: the pure building blocks,
//!    usable on their own.
//!
//! # Example
//!
//! ```rust
//! use cadenza_media::{MediaError, MediaStore, UploadPayload, is_image};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), MediaError> {
//!     # let tmp = tempfile::tempdir().unwrap();
//!     # let root = tmp.path().join("media");
//!     let store = MediaStore::builder().root(&root).open().await?;
//!
//!     assert!(is_image("image/png", "cover.png"));
//!     let cover = UploadPayload::from_bytes(b"\x89PNG", "cover.png", "image/png");
//!     let reference = store.store(cover, "images").await?;
//!
//!     // images/<32 hex chars>.png
//!     assert_eq!(reference.subdirectory(), "images");
//!     assert_eq!(reference.file_name().len(), 32 + ".png".len());
//!     Ok(())
//! }
//! ```

mod builder;
mod error;
mod maintenance;
mod payload;
mod reference;
mod root;
mod sanitize;
mod store;
mod validate;

pub use builder::MediaStoreBuilder;
pub use error::{MediaError, MediaErrorExt};
pub use maintenance::PurgeReport;
pub use payload::UploadPayload;
pub use reference::{GeneratedName, StoredFileReference, TOKEN_LEN};
pub use root::StorageRoot;
pub use sanitize::{SanitizedPath, sanitize};
pub use store::MediaStore;
pub use validate::{GENERIC_BINARY, MediaKind, classify, is_audio, is_image};
