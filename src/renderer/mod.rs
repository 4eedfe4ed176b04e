pub mod mesh;

use glam::Vec2;
use image::{Rgba, RgbaImage};

use crate::config::TextStyle;
use crate::font::atlas::{FontAtlas, Spacing};
use crate::text::layout::{Flow, layout};

// ── DrawTarget ────────────────────────────────────────────────────────────────

/// The 2D blit primitives text drawing is built on.
///
/// Both copy the `source_pos`/`source_size` rectangle of `texture`, scaled by
/// `scale` and multiplied by `tint`.
pub trait DrawTarget {
    /// Draw the source rectangle with its top-left corner at `pos`.
    fn draw_partial_decal(
        &mut self,
        texture: &RgbaImage,
        pos: Vec2,
        source_pos: Vec2,
        source_size: Vec2,
        scale: Vec2,
        tint: Rgba<u8>,
    );

    /// Draw the source rectangle rotated by `angle` radians about `pos`.
    ///
    /// `center` is the point of the source rectangle (in unscaled source
    /// pixels, relative to its top-left) that lands on `pos`, so each corner
    /// ends up at `pos + rotate((corner - center) * scale, angle)`.
    #[allow(clippy::too_many_arguments)]
    fn draw_partial_rotated_decal(
        &mut self,
        texture: &RgbaImage,
        pos: Vec2,
        angle: f32,
        center: Vec2,
        source_pos: Vec2,
        source_size: Vec2,
        scale: Vec2,
        tint: Rgba<u8>,
    );
}

// ── draw_text ─────────────────────────────────────────────────────────────────

/// Draw `text` with its first line's top-left at `pos`.
pub fn draw_text<T: DrawTarget + ?Sized>(
    target: &mut T,
    texture: &RgbaImage,
    atlas: &FontAtlas,
    pos: Vec2,
    text: &[u8],
    spacing: Spacing,
    style: &TextStyle,
) {
    let scale = style.scale();
    let tint = style.tint();

    for placed in layout(atlas, text, spacing, Flow::Screen { scale }) {
        target.draw_partial_decal(
            texture,
            pos + placed.offset,
            placed.glyph.atlas_offset.as_vec2(),
            placed.glyph.atlas_size.as_vec2(),
            scale,
            tint,
        );
    }
}

/// Draw `text` rotated by `angle` radians around `pos`.
///
/// `center` is the pivot inside the text block, in unscaled pixels. Each
/// glyph is passed to the rotated primitive with its pen position as the
/// primitive's center argument, which is why the pen runs in -x and lines
/// step in -y: the primitive subtracts its center from the glyph corners.
#[allow(clippy::too_many_arguments)]
pub fn draw_rotated_text<T: DrawTarget + ?Sized>(
    target: &mut T,
    texture: &RgbaImage,
    atlas: &FontAtlas,
    pos: Vec2,
    text: &[u8],
    spacing: Spacing,
    angle: f32,
    center: Vec2,
    style: &TextStyle,
) {
    let scale = style.scale();
    let tint = style.tint();

    for placed in layout(atlas, text, spacing, Flow::Pivot { center }) {
        target.draw_partial_rotated_decal(
            texture,
            pos,
            angle,
            placed.offset,
            placed.glyph.atlas_offset.as_vec2(),
            placed.glyph.atlas_size.as_vec2(),
            scale,
            tint,
        );
    }
}
