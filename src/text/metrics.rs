// ── Text metrics ─────────────────────────────────────────────────────────────
//
// Bounding box of multi-line text. Line count is always `newlines + 1`, so
// the empty string still measures one line high.

use glam::IVec2;

use super::{Codepoints, NEWLINE};
use crate::font::atlas::{FontAtlas, Spacing};

/// Size of `text` when every glyph takes one cell.
///
/// `(longest line in glyphs, line count) * cell size`, truncated to whole
/// pixels.
pub fn text_size(atlas: &FontAtlas, text: &[u8]) -> IVec2 {
    let cells = extent(atlas, text, |_| 1);
    (cells.as_vec2() * atlas.cell_size()).as_ivec2()
}

/// Size of `text` when every glyph advances by its own width.
///
/// Width is the widest line in pixels; a codepoint the font lacks adds 0.
/// Height is `line count * cell height`. Both saturate at `i32::MAX`.
pub fn text_size_prop(atlas: &FontAtlas, text: &[u8]) -> IVec2 {
    let table = atlas.table(Spacing::Proportional);
    let size = extent(atlas, text, |cp| table.lookup(cp).advance);
    IVec2::new(size.x, size.y.saturating_mul(atlas.cell_height() as i32))
}

/// Running maximum of a `(column, row)` cursor that starts at `(0, 1)`.
///
/// Advances come straight from bitmap pixels, so the cursor saturates.
fn extent(atlas: &FontAtlas, text: &[u8], mut step: impl FnMut(u32) -> i32) -> IVec2 {
    let mut pos = IVec2::new(0, 1);
    let mut size = pos;

    for cp in Codepoints::new(text, atlas.kind()) {
        if cp == NEWLINE {
            pos.x = 0;
            pos.y = pos.y.saturating_add(1);
        } else {
            pos.x = pos.x.saturating_add(step(cp));
        }
        size = size.max(pos);
    }

    size
}
