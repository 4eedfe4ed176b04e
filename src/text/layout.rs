use glam::Vec2;

use super::{Codepoints, NEWLINE};
use crate::font::atlas::{FontAtlas, GlyphEntry, Spacing};

// ── Flow ─────────────────────────────────────────────────────────────────────

/// Direction rules for walking the pen across a string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Flow {
    /// Screen space. The pen starts at (0, 0) and moves +x by
    /// `advance * scale.x`; a newline returns to x = 0 and moves
    /// `cell_height * scale.y` down.
    Screen { scale: Vec2 },
    /// Offsets handed to the rotated primitive, which draws each glyph at
    /// `-offset` relative to its anchor. The pen starts at `center`, moves
    /// -x by the unscaled advance; a newline returns to `center.x` and
    /// moves `cell_height` in -y.
    Pivot { center: Vec2 },
}

// ── GlyphPlacement ───────────────────────────────────────────────────────────

/// One glyph to draw and the pen position it is drawn at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphPlacement {
    pub glyph: GlyphEntry,
    pub offset: Vec2,
}

// ── Layout ───────────────────────────────────────────────────────────────────

/// Iterator yielding a [`GlyphPlacement`] per non-newline codepoint.
///
/// Missing codepoints still yield a (zero-sized) placement so that a bad
/// character never cuts the rest of the string short.
#[derive(Debug, Clone)]
pub struct Layout<'a> {
    codepoints: Codepoints<'a>,
    atlas: &'a FontAtlas,
    spacing: Spacing,
    flow: Flow,
    cursor: Vec2,
}

/// Lay `text` out against `atlas`.
pub fn layout<'a>(atlas: &'a FontAtlas, text: &'a [u8], spacing: Spacing, flow: Flow) -> Layout<'a> {
    let cursor = match flow {
        Flow::Screen { .. } => Vec2::ZERO,
        Flow::Pivot { center } => center,
    };
    Layout {
        codepoints: Codepoints::new(text, atlas.kind()),
        atlas,
        spacing,
        flow,
        cursor,
    }
}

impl Iterator for Layout<'_> {
    type Item = GlyphPlacement;

    fn next(&mut self) -> Option<GlyphPlacement> {
        loop {
            let cp = self.codepoints.next()?;
            let cell_h = self.atlas.cell_height();

            if cp == NEWLINE {
                match self.flow {
                    Flow::Screen { scale } => {
                        self.cursor.x = 0.0;
                        self.cursor.y += cell_h * scale.y;
                    }
                    Flow::Pivot { center } => {
                        self.cursor.x = center.x;
                        self.cursor.y -= cell_h;
                    }
                }
                continue;
            }

            let placement = GlyphPlacement {
                glyph: self.atlas.glyph(cp, self.spacing),
                offset: self.cursor,
            };

            let advance = self.atlas.advance(cp, self.spacing);
            match self.flow {
                Flow::Screen { scale } => self.cursor.x += advance * scale.x,
                Flow::Pivot { .. } => self.cursor.x -= advance,
            }

            return Some(placement);
        }
    }
}
