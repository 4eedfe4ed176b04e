//! Bitmap fonts whose glyph metrics are embedded in the atlas pixels.
//!
//! A [`Font`] decodes its layout once from the bitmap, then measures text and
//! drives per-glyph blits against any [`DrawTarget`].

pub mod config;
pub mod error;
pub mod font;
pub mod renderer;
pub mod text;

pub use config::{FontConfig, TextStyle};
pub use error::{FontError, FontResult};
pub use font::Font;
pub use font::atlas::{AtlasSource, FontAtlas, GlyphEntry, GlyphTable, KeyKind, Spacing};
pub use font::pixels::{PixelBuffer, PixelBufferMut};
pub use renderer::DrawTarget;
pub use renderer::mesh::{QuadBatch, TextVertex};
