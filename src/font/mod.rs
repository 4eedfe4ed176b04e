pub mod atlas;
pub mod parser;
pub mod pixels;

use std::path::Path;

use glam::{IVec2, Vec2};
use image::RgbaImage;

use crate::config::{FontConfig, TextStyle};
use crate::error::{FontError, FontResult};
use crate::renderer::{DrawTarget, draw_rotated_text, draw_text};
use crate::text::metrics;

use atlas::{AtlasSource, FontAtlas, KeyKind, Spacing};

// ── Font ─────────────────────────────────────────────────────────────────────

/// A bitmap font: the atlas image plus the glyph layout parsed out of it.
///
/// The layout is decoded once, here, and never changes afterwards. The image
/// doubles as the texture handed to the [`DrawTarget`] primitives; it is
/// owned by the font and released with it. `Font` is not `Clone`; share it
/// by reference.
///
/// ```compile_fail
/// fn needs_clone<T: Clone>() {}
/// needs_clone::<bitfont::Font>();
/// ```
///
/// Text is raw bytes for [`KeyKind::Ascii`] fonts (`0x20..0x80` are
/// printable) and UTF-8 for [`KeyKind::Unicode`] fonts.
#[derive(Debug)]
pub struct Font {
    texture: RgbaImage,
    atlas: FontAtlas,
}

impl Font {
    /// Parse the metadata embedded in `image`. Never fails; check
    /// [`source`](Self::source) to see whether a metadata block was found.
    pub fn from_image(image: RgbaImage, kind: KeyKind) -> Self {
        let atlas = parser::parse(&image, kind);
        Self { texture: image, atlas }
    }

    /// Decode a PNG from memory and parse it.
    pub fn from_png_bytes(bytes: &[u8], kind: KeyKind) -> FontResult<Self> {
        let image = image::load_from_memory(bytes)?.to_rgba8();
        Ok(Self::from_image(image, kind))
    }

    /// Read and decode a PNG file, then parse it.
    pub fn open(path: impl AsRef<Path>, kind: KeyKind) -> FontResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| FontError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_png_bytes(&bytes, kind)
    }

    /// Load the bitmap named by `config`. The config's style is not stored;
    /// pass it to the draw calls.
    pub fn from_config(config: &FontConfig) -> FontResult<Self> {
        Self::open(&config.path, config.kind)
    }

    pub fn atlas(&self) -> &FontAtlas {
        &self.atlas
    }

    pub fn texture(&self) -> &RgbaImage {
        &self.texture
    }

    pub fn kind(&self) -> KeyKind {
        self.atlas.kind()
    }

    pub fn source(&self) -> AtlasSource {
        self.atlas.source()
    }

    /// `false` for a Unicode bitmap without a metadata block.
    pub fn is_usable(&self) -> bool {
        self.atlas.source() != AtlasSource::Invalid
    }

    pub fn cell_size(&self) -> Vec2 {
        self.atlas.cell_size()
    }

    // ── Metrics ──────────────────────────────────────────────────────────────

    /// Monospace bounding box of `text` in pixels.
    pub fn text_size(&self, text: impl AsRef<[u8]>) -> IVec2 {
        metrics::text_size(&self.atlas, text.as_ref())
    }

    /// Proportional bounding box of `text` in pixels.
    pub fn text_size_prop(&self, text: impl AsRef<[u8]>) -> IVec2 {
        metrics::text_size_prop(&self.atlas, text.as_ref())
    }

    // ── Drawing ──────────────────────────────────────────────────────────────

    pub fn draw_string<T: DrawTarget + ?Sized>(
        &self,
        target: &mut T,
        pos: Vec2,
        text: impl AsRef<[u8]>,
        style: &TextStyle,
    ) {
        draw_text(target, &self.texture, &self.atlas, pos, text.as_ref(), Spacing::Monospace, style);
    }

    pub fn draw_string_prop<T: DrawTarget + ?Sized>(
        &self,
        target: &mut T,
        pos: Vec2,
        text: impl AsRef<[u8]>,
        style: &TextStyle,
    ) {
        draw_text(target, &self.texture, &self.atlas, pos, text.as_ref(), Spacing::Proportional, style);
    }

    /// Monospace text rotated by `angle` radians around `pos`, pivoting on
    /// `center` within the text block.
    pub fn draw_rotated_string<T: DrawTarget + ?Sized>(
        &self,
        target: &mut T,
        pos: Vec2,
        text: impl AsRef<[u8]>,
        angle: f32,
        center: Vec2,
        style: &TextStyle,
    ) {
        draw_rotated_text(
            target,
            &self.texture,
            &self.atlas,
            pos,
            text.as_ref(),
            Spacing::Monospace,
            angle,
            center,
            style,
        );
    }

    pub fn draw_rotated_string_prop<T: DrawTarget + ?Sized>(
        &self,
        target: &mut T,
        pos: Vec2,
        text: impl AsRef<[u8]>,
        angle: f32,
        center: Vec2,
        style: &TextStyle,
    ) {
        draw_rotated_text(
            target,
            &self.texture,
            &self.atlas,
            pos,
            text.as_ref(),
            Spacing::Proportional,
            angle,
            center,
            style,
        );
    }
}
