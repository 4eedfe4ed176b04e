//! Error types for loading fonts.
//!
//! Parsing an atlas never fails: a bitmap without metadata falls back to a
//! uniform grid (or an empty glyph table). Only getting hold of the bitmap
//! itself can go wrong.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for font loading.
pub type FontResult<T> = Result<T, FontError>;

/// Errors that can occur while loading a font bitmap or its config.
#[derive(Debug, Error)]
pub enum FontError {
    /// The font file could not be read.
    #[error("failed to read font file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The bitmap could not be decoded.
    #[error("failed to decode font bitmap: {0}")]
    Image(#[from] image::ImageError),

    /// The JSON font config is malformed.
    #[error("invalid font config: {0}")]
    Config(#[from] serde_json::Error),
}
