use std::collections::HashMap;

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

// ── GlyphEntry ───────────────────────────────────────────────────────────────

/// One rasterised character: where it sits in the atlas and how far it
/// pushes the pen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GlyphEntry {
    /// Unicode scalar (or byte value) this glyph represents.
    pub codepoint: u32,
    /// Top-left pixel of the glyph region in the atlas.
    pub atlas_offset: IVec2,
    /// Pixel size of the glyph region.
    pub atlas_size: IVec2,
    /// Horizontal pen advance in pixels.
    pub advance: i32,
}

impl GlyphEntry {
    /// The zero-sized stand-in returned for codepoints the table lacks.
    /// Drawing it has no visual effect.
    pub const fn missing(codepoint: u32) -> Self {
        Self {
            codepoint,
            atlas_offset: IVec2::ZERO,
            atlas_size: IVec2::ZERO,
            advance: 0,
        }
    }
}

// ── KeyKind ──────────────────────────────────────────────────────────────────

/// How glyphs are keyed, which also selects the table's storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyKind {
    /// The 96 printable ASCII bytes `0x20..0x80`, stored densely at `byte - 32`.
    Ascii,
    /// Arbitrary codepoints, stored in a hash map.
    Unicode,
}

impl KeyKind {
    /// First byte covered by the ASCII range.
    pub const ASCII_FIRST: u32 = 32;
    /// Number of slots in the ASCII range.
    pub const ASCII_SLOTS: usize = 96;
}

// ── Spacing ──────────────────────────────────────────────────────────────────

/// Pen advance rule used for metrics and drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Spacing {
    /// Every glyph occupies one fixed-width cell.
    Monospace,
    /// Every glyph advances by its own measured width.
    Proportional,
}

// ── GlyphTable ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Storage {
    Dense(Vec<Option<GlyphEntry>>),
    Sparse(HashMap<u32, GlyphEntry>),
}

/// Codepoint → glyph lookup with storage chosen by [`KeyKind`].
///
/// Keys are unique: the first entry inserted for a codepoint wins.
#[derive(Debug, Clone)]
pub struct GlyphTable {
    storage: Storage,
}

impl GlyphTable {
    pub fn new(kind: KeyKind) -> Self {
        let storage = match kind {
            KeyKind::Ascii => Storage::Dense(vec![None; KeyKind::ASCII_SLOTS]),
            KeyKind::Unicode => Storage::Sparse(HashMap::new()),
        };
        Self { storage }
    }

    pub fn kind(&self) -> KeyKind {
        match self.storage {
            Storage::Dense(_) => KeyKind::Ascii,
            Storage::Sparse(_) => KeyKind::Unicode,
        }
    }

    fn dense_slot(codepoint: u32) -> Option<usize> {
        let slot = codepoint.checked_sub(KeyKind::ASCII_FIRST)? as usize;
        (slot < KeyKind::ASCII_SLOTS).then_some(slot)
    }

    /// Insert `entry` under its codepoint. Returns `false` when the key is
    /// already taken or falls outside a dense table's range.
    pub fn insert(&mut self, entry: GlyphEntry) -> bool {
        match &mut self.storage {
            Storage::Dense(slots) => match Self::dense_slot(entry.codepoint) {
                Some(i) if slots[i].is_none() => {
                    slots[i] = Some(entry);
                    true
                }
                _ => false,
            },
            Storage::Sparse(map) => match map.entry(entry.codepoint) {
                std::collections::hash_map::Entry::Occupied(_) => false,
                std::collections::hash_map::Entry::Vacant(v) => {
                    v.insert(entry);
                    true
                }
            },
        }
    }

    pub fn get(&self, codepoint: u32) -> Option<&GlyphEntry> {
        match &self.storage {
            Storage::Dense(slots) => Self::dense_slot(codepoint).and_then(|i| slots[i].as_ref()),
            Storage::Sparse(map) => map.get(&codepoint),
        }
    }

    /// Like [`get`](Self::get), but a missing key yields [`GlyphEntry::missing`].
    pub fn lookup(&self, codepoint: u32) -> GlyphEntry {
        self.get(codepoint)
            .copied()
            .unwrap_or(GlyphEntry::missing(codepoint))
    }

    pub fn len(&self) -> usize {
        match &self.storage {
            Storage::Dense(slots) => slots.iter().flatten().count(),
            Storage::Sparse(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All entries. Dense tables iterate in key order; sparse ones in no
    /// particular order.
    pub fn iter(&self) -> Box<dyn Iterator<Item = &GlyphEntry> + '_> {
        match &self.storage {
            Storage::Dense(slots) => Box::new(slots.iter().flatten()),
            Storage::Sparse(map) => Box::new(map.values()),
        }
    }
}

// ── AtlasSource ──────────────────────────────────────────────────────────────

/// Where an atlas's layout came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtlasSource {
    /// A signature block was found and decoded.
    Embedded { version: u32 },
    /// No signature; the bitmap was assumed to be a uniform 16×6 grid.
    UniformGrid,
    /// No usable metadata. The atlas has no glyphs.
    Invalid,
}

// ── FontAtlas ────────────────────────────────────────────────────────────────

/// Immutable glyph layout of one font bitmap.
///
/// Both tables share glyph positions; they differ only in each entry's width
/// and advance (the cell width vs. the glyph's measured width).
#[derive(Debug, Clone)]
pub struct FontAtlas {
    pub(crate) cell_size: Vec2,
    pub(crate) mono: GlyphTable,
    pub(crate) prop: GlyphTable,
    pub(crate) source: AtlasSource,
}

impl FontAtlas {
    /// An atlas without glyphs, used when a bitmap carries no usable block.
    pub fn invalid(kind: KeyKind) -> Self {
        Self {
            cell_size: Vec2::ZERO,
            mono: GlyphTable::new(kind),
            prop: GlyphTable::new(kind),
            source: AtlasSource::Invalid,
        }
    }

    pub fn kind(&self) -> KeyKind {
        self.mono.kind()
    }

    /// Cell width × cell height in pixels.
    pub fn cell_size(&self) -> Vec2 {
        self.cell_size
    }

    pub fn cell_width(&self) -> f32 {
        self.cell_size.x
    }

    pub fn cell_height(&self) -> f32 {
        self.cell_size.y
    }

    pub fn source(&self) -> AtlasSource {
        self.source
    }

    pub fn has_embedded_metadata(&self) -> bool {
        matches!(self.source, AtlasSource::Embedded { .. })
    }

    pub fn table(&self, spacing: Spacing) -> &GlyphTable {
        match spacing {
            Spacing::Monospace => &self.mono,
            Spacing::Proportional => &self.prop,
        }
    }

    /// Glyph for `codepoint`, or a zero-sized entry if absent.
    pub fn glyph(&self, codepoint: u32, spacing: Spacing) -> GlyphEntry {
        self.table(spacing).lookup(codepoint)
    }

    /// Pen advance for `codepoint` in pixels, before scaling.
    ///
    /// Monospace always advances one cell, even over a missing glyph;
    /// proportional advances by the glyph's width (0 when missing).
    pub fn advance(&self, codepoint: u32, spacing: Spacing) -> f32 {
        match spacing {
            Spacing::Monospace => self.cell_size.x,
            Spacing::Proportional => self.prop.lookup(codepoint).advance as f32,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
