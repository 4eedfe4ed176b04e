pub mod layout;
pub mod metrics;
pub mod utf8;

use crate::font::atlas::KeyKind;

use utf8::Utf8Codepoints;

/// Codepoint that ends a line.
pub const NEWLINE: u32 = b'\n' as u32;

/// Codepoints of `text` as a font of the given [`KeyKind`] reads them: one
/// per byte for ASCII fonts, UTF-8 decoded for Unicode fonts.
#[derive(Debug, Clone)]
pub enum Codepoints<'a> {
    Bytes(std::slice::Iter<'a, u8>),
    Utf8(Utf8Codepoints<'a>),
}

impl<'a> Codepoints<'a> {
    pub fn new(text: &'a [u8], kind: KeyKind) -> Self {
        match kind {
            KeyKind::Ascii => Self::Bytes(text.iter()),
            KeyKind::Unicode => Self::Utf8(Utf8Codepoints::new(text)),
        }
    }
}

impl Iterator for Codepoints<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        match self {
            Self::Bytes(bytes) => bytes.next().map(|&b| b as u32),
            Self::Utf8(chars) => chars.next(),
        }
    }
}
