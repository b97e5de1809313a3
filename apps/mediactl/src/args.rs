//! # CLI Argument Definitions

use cadenza_media::{GENERIC_BINARY, MediaKind};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "mediactl")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Store, delete, and classify media in a Cadenza storage root")]
pub(crate) struct Cli {
    /// Settings file (.toml, .yaml, .json); missing files fall back to defaults
    #[arg(long, global = true, value_name = "FILE")]
    pub(crate) config: Option<PathBuf>,

    /// Storage root, overriding the settings file and environment
    #[arg(long, global = true, value_name = "DIR")]
    pub(crate) root: Option<PathBuf>,

    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Store a file and print its reference
    Store {
        /// File to upload
        file: PathBuf,
        /// Subdirectory under the storage root (e.g. images, audio-files)
        #[arg(long, value_name = "DIR")]
        subdir: String,
        /// Declared content type
        #[arg(long, value_name = "MIME", default_value = GENERIC_BINARY)]
        content_type: String,
        /// Refuse the upload unless it classifies as this kind
        #[arg(long)]
        kind: Option<MediaKind>,
        /// Original filename to report instead of the file's own name
        #[arg(long, value_name = "ORIGINAL")]
        name: Option<String>,
    },
    /// Delete a stored file by reference; deleting a missing file succeeds
    Delete {
        reference: String,
    },
    /// Print the media kind (image, audio, none) of a content type and filename
    Classify {
        content_type: String,
        filename: String,
    },
    /// Remove temp files left behind by interrupted uploads
    Purge {},
}
