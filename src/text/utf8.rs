// ── Best-effort UTF-8 decoding ───────────────────────────────────────────────
//
// The lead byte alone picks the sequence length; continuation bytes are not
// checked. Malformed input decodes to some codepoint rather than an error,
// which then simply misses the glyph table.

/// Decode the codepoint starting at `*cursor` and move `*cursor` past it.
///
/// Lead byte `1111xxxx` reads 4 bytes, `1110xxxx` 3, `110xxxxx` 2, anything
/// else is taken as a codepoint by itself. A sequence cut short by the end
/// of `bytes` is padded with zero bits. Returns 0 without moving when
/// `*cursor` is already at the end.
pub fn decode_at(bytes: &[u8], cursor: &mut usize) -> u32 {
    let Some(&lead) = bytes.get(*cursor) else {
        return 0;
    };

    let (len, mut codepoint) = match lead {
        b if b & 0xF0 == 0xF0 => (4, (b & 0x07) as u32),
        b if b & 0xE0 == 0xE0 => (3, (b & 0x0F) as u32),
        b if b & 0xC0 == 0xC0 => (2, (b & 0x1F) as u32),
        b => (1, b as u32),
    };

    for k in 1..len {
        let cont = bytes.get(*cursor + k).copied().unwrap_or(0);
        codepoint = (codepoint << 6) | (cont & 0x3F) as u32;
    }

    *cursor = (*cursor + len).min(bytes.len());
    codepoint
}

/// Iterator over the codepoints of a UTF-8 byte string.
#[derive(Debug, Clone)]
pub struct Utf8Codepoints<'a> {
    bytes: &'a [u8],
    cursor: usize,
}

impl<'a> Utf8Codepoints<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, cursor: 0 }
    }
}

impl Iterator for Utf8Codepoints<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        (self.cursor < self.bytes.len()).then(|| decode_at(self.bytes, &mut self.cursor))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
