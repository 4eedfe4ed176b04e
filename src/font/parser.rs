// =============================================================================
// PARSER.RS — Glyph metadata embedded in atlas pixels
//
// Two block layouts exist, each a run of pixels holding one packed u32 apiece:
//
//   ASCII    (bottom row)     "FONT" version x_offset width[0..96]
//   Unicode  (any low row)    "CFON" version count x_offset cell_w cell_h
//                             followed by (width, codepoint) × count,
//                             wrapping onto the rows below
//
// Parsing never fails. An ASCII bitmap without a block is read as a plain
// 16×6 grid; a Unicode bitmap without one yields an atlas with no glyphs.
// =============================================================================

use glam::{IVec2, Vec2};
use log::{debug, warn};

use super::atlas::{AtlasSource, FontAtlas, GlyphEntry, GlyphTable, KeyKind};
use super::pixels::{PixelBuffer, PixelBufferMut, pack};

/// Tag in the first pixel of an ASCII metadata block.
pub const ASCII_SIGNATURE: u32 = pack(*b"FONT");
/// Tag in the first pixel of a Unicode metadata block.
pub const UNICODE_SIGNATURE: u32 = pack(*b"CFON");
/// Version written by the embedders in this module.
pub const FORMAT_VERSION: u32 = 1;

/// Glyph columns of an ASCII atlas.
pub const GRID_COLUMNS: u32 = 16;
/// Glyph rows of an ASCII atlas.
pub const GRID_ROWS: u32 = 6;

/// Pixels before the first (width, codepoint) pair of a Unicode block.
const UNICODE_HEADER_LEN: u64 = 6;
/// Pixels before the first width of an ASCII block.
const ASCII_HEADER_LEN: u32 = 3;

// ── Entry point ──────────────────────────────────────────────────────────────

/// Parse `buf` with the layout selected by `kind`.
pub fn parse<B: PixelBuffer + ?Sized>(buf: &B, kind: KeyKind) -> FontAtlas {
    match kind {
        KeyKind::Ascii => parse_ascii(buf),
        KeyKind::Unicode => parse_unicode(buf),
    }
}

// ── ASCII ────────────────────────────────────────────────────────────────────

/// Build the 96-glyph ASCII atlas, falling back to a uniform grid when the
/// bottom row does not start with [`ASCII_SIGNATURE`].
pub fn parse_ascii<B: PixelBuffer + ?Sized>(buf: &B) -> FontAtlas {
    let (w, h) = (buf.width(), buf.height());
    let bounds = IVec2::new(clamp_i32(w as i64), clamp_i32(h as i64));
    let cell_w = w / GRID_COLUMNS;

    let data_row = h
        .checked_sub(1)
        .filter(|&row| buf.try_pixel(0, row) == Some(ASCII_SIGNATURE));

    let (cell_h, x_offset, widths, source) = match data_row {
        Some(row) => {
            let version = buf.try_pixel(1, row).unwrap_or(0);
            let x_offset = buf.try_pixel(2, row).unwrap_or(0);
            if w < ASCII_HEADER_LEN + KeyKind::ASCII_SLOTS as u32 {
                warn!("font block truncated: {w}px row cannot hold 96 glyph widths");
            }
            // Missing widths read as zero.
            let widths: Vec<u32> = (0..KeyKind::ASCII_SLOTS as u32)
                .map(|i| buf.try_pixel(ASCII_HEADER_LEN + i, row).unwrap_or(0))
                .collect();
            ((h - 1) / GRID_ROWS, x_offset, Some(widths), AtlasSource::Embedded { version })
        }
        None => (h / GRID_ROWS, 0, None, AtlasSource::UniformGrid),
    };

    let mut mono = GlyphTable::new(KeyKind::Ascii);
    let mut prop = GlyphTable::new(KeyKind::Ascii);
    let glyph_h = cell_h.saturating_sub(1) as i64;

    for i in 0..KeyKind::ASCII_SLOTS as u32 {
        let codepoint = KeyKind::ASCII_FIRST + i;
        let x = (i % GRID_COLUMNS) as i64 * cell_w as i64 + x_offset as i64;
        let y = (i / GRID_COLUMNS) as i64 * cell_h as i64;
        let width = widths.as_ref().map_or(cell_w, |ws| ws[i as usize]);

        mono.insert(entry(codepoint, (x, y), (cell_w as i64, glyph_h), bounds));
        prop.insert(entry(codepoint, (x, y), (width as i64, glyph_h), bounds));
    }

    debug!("parsed ASCII font atlas {w}x{h}: cell {cell_w}x{cell_h}, {source:?}");

    FontAtlas {
        cell_size: Vec2::new(cell_w as f32, cell_h as f32),
        mono,
        prop,
        source,
    }
}

// ── Unicode ──────────────────────────────────────────────────────────────────

/// Lowest row (scanning upward) whose first pixel is `signature`.
pub fn find_signature_row<B: PixelBuffer + ?Sized>(buf: &B, signature: u32) -> Option<u32> {
    if buf.width() == 0 {
        return None;
    }
    (0..buf.height()).rev().find(|&row| buf.pixel(0, row) == signature)
}

/// Pixel `index` positions past the start of `row`, wrapping onto later rows.
fn raster<B: PixelBuffer + ?Sized>(buf: &B, row: u32, index: u64) -> Option<u32> {
    let w = buf.width() as u64;
    if w == 0 {
        return None;
    }
    let x = u32::try_from(index % w).ok()?;
    let y = u32::try_from(row as u64 + index / w).ok()?;
    buf.try_pixel(x, y)
}

/// Build the codepoint-keyed atlas from a [`UNICODE_SIGNATURE`] block.
///
/// Without a valid block the atlas is [`AtlasSource::Invalid`] and a warning
/// is logged.
pub fn parse_unicode<B: PixelBuffer + ?Sized>(buf: &B) -> FontAtlas {
    let Some(row) = find_signature_row(buf, UNICODE_SIGNATURE) else {
        warn!("bitmap is not a valid custom font: no CFON block found");
        return FontAtlas::invalid(KeyKind::Unicode);
    };

    let header: Option<[u32; 5]> = (1..UNICODE_HEADER_LEN)
        .map(|i| raster(buf, row, i))
        .collect::<Option<Vec<u32>>>()
        .and_then(|fields| fields.try_into().ok());
    let Some([version, count, x_offset, cell_w, cell_h]) = header else {
        warn!("custom font block on row {row} is truncated");
        return FontAtlas::invalid(KeyKind::Unicode);
    };

    let (w, h) = (buf.width(), buf.height());
    if cell_w == 0 || cell_w > w {
        warn!("custom font block declares unusable cell width {cell_w} for a {w}px bitmap");
        return FontAtlas::invalid(KeyKind::Unicode);
    }
    if cell_h == 0 || cell_h > h {
        warn!("custom font block declares unusable cell height {cell_h} for a {h}px bitmap");
        return FontAtlas::invalid(KeyKind::Unicode);
    }

    let bounds = IVec2::new(clamp_i32(w as i64), clamp_i32(h as i64));
    let cells_per_row = (w / cell_w) as u64;
    let glyph_h = cell_h.saturating_sub(1) as i64;

    let mut mono = GlyphTable::new(KeyKind::Unicode);
    let mut prop = GlyphTable::new(KeyKind::Unicode);

    for i in 0..count as u64 {
        let pair = UNICODE_HEADER_LEN + i * 2;
        let (Some(width), Some(codepoint)) = (raster(buf, row, pair), raster(buf, row, pair + 1)) else {
            warn!("custom font block ends after {i} of {count} glyphs");
            break;
        };

        let x = (i % cells_per_row) as i64 * cell_w as i64 + x_offset as i64;
        let y = (i / cells_per_row) as i64 * cell_h as i64;

        mono.insert(entry(codepoint, (x, y), (cell_w as i64, glyph_h), bounds));
        prop.insert(entry(codepoint, (x, y), (width as i64, glyph_h), bounds));
    }

    debug!(
        "parsed custom font atlas {w}x{h}: v{version}, {} glyphs, cell {cell_w}x{cell_h}",
        prop.len()
    );

    FontAtlas {
        cell_size: Vec2::new(cell_w as f32, cell_h as f32),
        mono,
        prop,
        source: AtlasSource::Embedded { version },
    }
}

// ── Entry construction ───────────────────────────────────────────────────────

fn clamp_i32(v: i64) -> i32 {
    v.clamp(0, i32::MAX as i64) as i32
}

/// Glyph whose atlas rectangle is clipped to `bounds`. The advance keeps the
/// encoded width.
fn entry(codepoint: u32, (x, y): (i64, i64), (w, h): (i64, i64), bounds: IVec2) -> GlyphEntry {
    let (bw, bh) = (bounds.x as i64, bounds.y as i64);
    let x0 = x.clamp(0, bw);
    let y0 = y.clamp(0, bh);
    let x1 = (x + w.max(0)).clamp(x0, bw);
    let y1 = (y + h.max(0)).clamp(y0, bh);

    GlyphEntry {
        codepoint,
        atlas_offset: IVec2::new(x0 as i32, y0 as i32),
        atlas_size: IVec2::new((x1 - x0) as i32, (y1 - y0) as i32),
        advance: clamp_i32(w),
    }
}

// ── Embedding ────────────────────────────────────────────────────────────────

/// Rows needed below the glyph grid to hold a Unicode block for `glyphs`
/// glyphs in a bitmap `width` pixels wide.
pub fn unicode_block_rows(width: u32, glyphs: usize) -> u32 {
    if width == 0 {
        return 0;
    }
    let pixels = UNICODE_HEADER_LEN + glyphs as u64 * 2;
    pixels.div_ceil(width as u64) as u32
}

/// Write an ASCII block into the bottom row of `buf`.
///
/// Returns `false` without writing when the row is too narrow for the tag,
/// header and all 96 widths.
pub fn embed_ascii_metadata<B: PixelBufferMut + ?Sized>(
    buf: &mut B,
    x_offset: u32,
    widths: &[u32; KeyKind::ASCII_SLOTS],
) -> bool {
    let needed = ASCII_HEADER_LEN + KeyKind::ASCII_SLOTS as u32;
    let Some(row) = buf.height().checked_sub(1) else {
        return false;
    };
    if buf.width() < needed {
        return false;
    }

    buf.set_pixel(0, row, ASCII_SIGNATURE);
    buf.set_pixel(1, row, FORMAT_VERSION);
    buf.set_pixel(2, row, x_offset);
    for (i, &width) in widths.iter().enumerate() {
        buf.set_pixel(ASCII_HEADER_LEN + i as u32, row, width);
    }
    true
}

/// Cell geometry and glyph list of a Unicode block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnicodeMetadata {
    pub x_offset: u32,
    pub cell_width: u32,
    pub cell_height: u32,
    /// `(width, codepoint)` per glyph, in grid order.
    pub glyphs: Vec<(u32, u32)>,
}

/// Write a Unicode block starting at column 0 of `row`, wrapping onto the
/// rows below.
///
/// Returns `false` without writing when the block would run past the
/// bottom of the bitmap.
pub fn embed_unicode_metadata<B: PixelBufferMut + ?Sized>(
    buf: &mut B,
    row: u32,
    meta: &UnicodeMetadata,
) -> bool {
    let w = buf.width() as u64;
    let available = (buf.height() as u64).saturating_sub(row as u64) * w;
    let needed = UNICODE_HEADER_LEN + meta.glyphs.len() as u64 * 2;
    if w == 0 || needed > available {
        return false;
    }

    let header = [
        UNICODE_SIGNATURE,
        FORMAT_VERSION,
        meta.glyphs.len() as u32,
        meta.x_offset,
        meta.cell_width,
        meta.cell_height,
    ];
    let pairs = meta.glyphs.iter().flat_map(|&(width, cp)| [width, cp]);

    for (index, value) in header.into_iter().chain(pairs).enumerate() {
        let index = index as u64;
        buf.set_pixel((index % w) as u32, row + (index / w) as u32, value);
    }
    true
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};

    use super::*;
    use crate::font::atlas::Spacing;

    #[test]
    fn signatures_match_tag_bytes() {
        assert_eq!(ASCII_SIGNATURE.to_le_bytes(), *b"FONT");
        assert_eq!(UNICODE_SIGNATURE.to_le_bytes(), *b"CFON");
    }

    #[test]
    fn block_rows_round_up() {
        assert_eq!(unicode_block_rows(16, 0), 1);
        assert_eq!(unicode_block_rows(16, 5), 1);
        assert_eq!(unicode_block_rows(16, 6), 2);
        assert_eq!(unicode_block_rows(0, 6), 0);
    }

    #[test]
    fn signature_search_prefers_lowest_row() {
        let mut img = RgbaImage::new(4, 5);
        img.put_pixel(0, 1, Rgba(*b"CFON"));
        img.put_pixel(0, 3, Rgba(*b"CFON"));
        assert_eq!(find_signature_row(&img, UNICODE_SIGNATURE), Some(3));
        assert_eq!(find_signature_row(&img, ASCII_SIGNATURE), None);
    }

    #[test]
    fn raster_wraps_across_rows() {
        let mut img = RgbaImage::new(3, 3);
        img.set_pixel(1, 2, 42);
        assert_eq!(raster(&img, 1, 4), Some(42));
        assert_eq!(raster(&img, 1, 6), None);
    }

    #[test]
    fn entry_is_clipped_to_bitmap() {
        let g = entry(65, (30, 10), (8, 20), IVec2::new(32, 16));
        assert_eq!(g.atlas_offset, IVec2::new(30, 10));
        assert_eq!(g.atlas_size, IVec2::new(2, 6));
        assert_eq!(g.advance, 8);

        let g = entry(65, (-4, 0), (8, 4), IVec2::new(32, 16));
        assert_eq!(g.atlas_offset, IVec2::ZERO);
        assert_eq!(g.atlas_size, IVec2::new(4, 4));
    }

    #[test]
    fn empty_bitmap_parses_without_panicking() {
        let img = RgbaImage::new(0, 0);
        let ascii = parse_ascii(&img);
        assert_eq!(ascii.source(), AtlasSource::UniformGrid);
        assert_eq!(ascii.glyph(65, Spacing::Monospace).atlas_size, IVec2::ZERO);
        assert_eq!(parse_unicode(&img).source(), AtlasSource::Invalid);
    }

    #[test]
    fn zero_cell_width_invalidates_unicode_block() {
        let mut img = RgbaImage::new(8, 2);
        let meta = UnicodeMetadata { x_offset: 0, cell_width: 0, cell_height: 1, glyphs: vec![] };
        assert!(embed_unicode_metadata(&mut img, 1, &meta));
        assert_eq!(parse_unicode(&img).source(), AtlasSource::Invalid);
    }

    #[test]
    fn zero_cell_height_invalidates_unicode_block() {
        let mut img = RgbaImage::new(8, 2);
        let meta = UnicodeMetadata { x_offset: 0, cell_width: 4, cell_height: 0, glyphs: vec![(3, 0x41)] };
        assert!(embed_unicode_metadata(&mut img, 1, &meta));
        assert_eq!(parse_unicode(&img).source(), AtlasSource::Invalid);
    }

    #[test]
    fn cell_taller_than_bitmap_invalidates_unicode_block() {
        let mut img = RgbaImage::new(8, 2);
        let meta = UnicodeMetadata { x_offset: 0, cell_width: 4, cell_height: 0xFF00_0010, glyphs: vec![] };
        assert!(embed_unicode_metadata(&mut img, 1, &meta));
        let atlas = parse_unicode(&img);
        assert_eq!(atlas.source(), AtlasSource::Invalid);
        assert!(atlas.table(Spacing::Proportional).is_empty());
    }

    #[test]
    fn truncated_glyph_list_keeps_complete_pairs() {
        // 8 wide, 1 data row: header (6) + one full pair (2) fits; declare 3.
        let mut img = RgbaImage::new(8, 9);
        let row = 8;
        for (i, v) in [UNICODE_SIGNATURE, 1, 3, 0, 4, 4, 3, 0x41].into_iter().enumerate() {
            img.set_pixel(i as u32, row, v);
        }
        let atlas = parse_unicode(&img);
        assert_eq!(atlas.table(Spacing::Proportional).len(), 1);
        assert_eq!(atlas.glyph(0x41, Spacing::Proportional).advance, 3);
    }
}
