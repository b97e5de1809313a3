//! Upload classification from the declared content type and the filename extension.
//!
//! Both inputs are client-supplied and unreliable, so a class matches when *either* one
//! matches its allow-list. Generic binary (`application/octet-stream`) defers to the extension:
//! it satisfies a class on its own only when the filename has no extension at all, in which case
//! it satisfies both classes. No bytes are inspected; this is a boundary heuristic, not a
//! content guarantee.

use crate::sanitize::extension_of;
use std::fmt;

pub const GENERIC_BINARY: &str = "application/octet-stream";

const IMAGE_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "image/gif", "image/webp"];
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

const AUDIO_TYPES: &[&str] = &[
    "audio/mpeg",
    "audio/mp3",
    "audio/wav",
    "audio/x-wav",
    "audio/flac",
    "audio/x-flac",
    "audio/midi",
    "audio/x-midi",
];
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "flac", "midi", "mid"];

/// A media class with its own allow-lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Audio,
}

impl MediaKind {
    pub const ALL: [Self; 2] = [Self::Image, Self::Audio];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Audio => "audio",
        }
    }

    const fn content_types(self) -> &'static [&'static str] {
        match self {
            Self::Image => IMAGE_TYPES,
            Self::Audio => AUDIO_TYPES,
        }
    }

    const fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Image => IMAGE_EXTENSIONS,
            Self::Audio => AUDIO_EXTENSIONS,
        }
    }

    /// Whether an upload with this declared type and filename belongs to the class.
    #[must_use]
    pub fn accepts(self, content_type: &str, filename: &str) -> bool {
        let content_type = essence(content_type);
        let extension = extension_of(last_segment(filename));

        if self.content_types().contains(&content_type.as_str()) {
            return true;
        }

        match extension {
            Some(ext) => self.extensions().contains(&ext.as_str()),
            None => content_type == GENERIC_BINARY,
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "image" => Ok(Self::Image),
            "audio" => Ok(Self::Audio),
            other => Err(format!("unknown media kind '{other}' (expected image or audio)")),
        }
    }
}

#[must_use]
pub fn is_image(content_type: &str, filename: &str) -> bool {
    MediaKind::Image.accepts(content_type, filename)
}

#[must_use]
pub fn is_audio(content_type: &str, filename: &str) -> bool {
    MediaKind::Audio.accepts(content_type, filename)
}

/// First class that accepts the upload, images before audio.
#[must_use]
pub fn classify(content_type: &str, filename: &str) -> Option<MediaKind> {
    MediaKind::ALL.into_iter().find(|kind| kind.accepts(content_type, filename))
}

/// `Audio/MPEG; charset=binary` -> `audio/mpeg`.
fn essence(content_type: &str) -> String {
    content_type.split(';').next().unwrap_or_default().trim().to_ascii_lowercase()
}

fn last_segment(filename: &str) -> &str {
    filename.rsplit(['/', '\\']).next().unwrap_or(filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_image_with_matching_extension() {
        assert!(is_image("image/png", "x.png"));
    }

    #[test]
    fn generic_binary_defers_to_a_present_extension() {
        assert!(!is_image("application/octet-stream", "x.exe"));
        assert!(!is_audio("application/octet-stream", "x.exe"));
        assert!(is_audio("application/octet-stream", "x.mp3"));
        assert!(!is_image("application/octet-stream", "x.mp3"));
    }

    #[test]
    fn generic_binary_without_extension_passes_both() {
        assert!(is_image(GENERIC_BINARY, "blob"));
        assert!(is_audio(GENERIC_BINARY, "blob"));
        assert_eq!(classify(GENERIC_BINARY, "blob"), Some(MediaKind::Image));
    }

    #[test]
    fn type_alone_suffices() {
        assert!(is_audio("audio/mpeg", "track"));
        assert!(is_audio("audio/x-midi", "track.txt"));
        assert!(is_image("image/webp", "cover.bin"));
    }

    #[test]
    fn extension_alone_suffices() {
        assert!(is_audio("text/plain", "song.mp3"));
        assert!(is_audio("", "SONG.MID"));
        assert!(is_image("text/html", "photo.JPEG"));
    }

    #[test]
    fn declared_type_is_normalized() {
        assert!(is_audio("Audio/MPEG; charset=binary", "track"));
        assert!(is_image("  IMAGE/GIF ", "anim"));
    }

    #[test]
    fn neither_matches() {
        assert!(!is_image("text/plain", "notes.txt"));
        assert!(!is_audio("video/mp4", "clip.mp4"));
        assert_eq!(classify("text/plain", "notes.txt"), None);
    }

    #[test]
    fn classes_do_not_leak_into_each_other() {
        assert!(!is_audio("image/png", "x.png"));
        assert!(!is_image("audio/flac", "x.flac"));
        assert_eq!(classify("audio/flac", "x.flac"), Some(MediaKind::Audio));
    }

    #[test]
    fn path_prefixes_do_not_confuse_extension() {
        assert!(is_audio("text/plain", "C:\\Music\\set.v1\\intro.wav"));
        assert!(!is_image("text/plain", "covers.png/readme"));
    }

    #[test]
    fn kind_parses_from_text() {
        assert_eq!("Image".parse::<MediaKind>(), Ok(MediaKind::Image));
        assert_eq!(" audio ".parse::<MediaKind>(), Ok(MediaKind::Audio));
        assert!("video".parse::<MediaKind>().is_err());
    }
}
