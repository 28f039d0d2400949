//! retouch-core: the shared vocabulary of the Retouch editor.
//!
//! Design rules:
//! - Artifacts are immutable once created; cloning shares the byte buffer.
//! - Coordinates stored here are always in the artifact's natural pixels.
//! - Nothing in this crate talks to the network or holds UI state.

use std::path::PathBuf;
use thiserror::Error;

pub mod artifact;
pub mod inline;
pub mod selection;
pub mod tab;

pub use artifact::{Artifact, ImageMime};
pub use inline::{decode_inline, encode_inline};
pub use selection::{CropRect, Hotspot};
pub use tab::Tab;

/// Errors raised while turning user input into artifacts.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{name} is not a supported image (expected PNG, JPEG or WebP)")]
    UnsupportedFormat { name: String },

    #[error("{name} is empty")]
    EmptyImage { name: String },

    #[error("invalid image payload: {reason}")]
    InvalidPayload { reason: String },
}
