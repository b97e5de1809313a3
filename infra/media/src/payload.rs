use std::fmt;
use tokio::io::AsyncRead;

/// One upload, consumed by a single store call.
///
/// The filename and content type come straight from the client and are treated as hostile.
/// The declared length only serves to reject empty uploads up front.
pub struct UploadPayload<R> {
    pub(crate) reader: R,
    pub(crate) len: u64,
    pub(crate) filename: String,
    pub(crate) content_type: String,
}

impl<R: AsyncRead + Unpin> UploadPayload<R> {
    pub fn new(
        reader: R,
        len: u64,
        filename: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Self { reader, len, filename: filename.into(), content_type: content_type.into() }
    }
}

impl<'a> UploadPayload<&'a [u8]> {
    /// Wraps an in-memory upload; the length is taken from the slice.
    pub fn from_bytes(
        bytes: &'a [u8],
        filename: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Self::new(bytes, bytes.len() as u64, filename, content_type)
    }
}

impl<R> UploadPayload<R> {
    #[must_use]
    pub const fn len(&self) -> u64 {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    #[must_use]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }
}

impl<R> fmt::Debug for UploadPayload<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadPayload")
            .field("len", &self.len)
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}
