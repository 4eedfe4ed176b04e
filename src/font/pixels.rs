// ── Pixel buffers ─────────────────────────────────────────────────────────────
//
// The atlas metadata lives inside ordinary pixels: each field is one pixel
// whose four channels hold a little-endian u32 (`r | g<<8 | b<<16 | a<<24`).
// The parser only needs row/col → u32 reads, so it works on this trait rather
// than on any particular image or texture type.

use image::{Rgba, RgbaImage};

/// Read-only view of a bitmap as packed 32-bit pixel values.
pub trait PixelBuffer {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Packed value of the pixel at (`x`, `y`). Callers stay in bounds.
    fn pixel(&self, x: u32, y: u32) -> u32;

    /// Total pixel count, as used for raster-order indexing.
    fn pixel_count(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    /// Pixel at (`x`, `y`), or `None` outside the bitmap.
    fn try_pixel(&self, x: u32, y: u32) -> Option<u32> {
        (x < self.width() && y < self.height()).then(|| self.pixel(x, y))
    }
}

/// Writable pixel buffer, used to embed metadata blocks.
pub trait PixelBufferMut: PixelBuffer {
    fn set_pixel(&mut self, x: u32, y: u32, value: u32);
}

/// Pack four channel bytes into a pixel value.
#[inline]
pub const fn pack(channels: [u8; 4]) -> u32 {
    u32::from_le_bytes(channels)
}

/// Split a pixel value back into its RGBA channels.
#[inline]
pub const fn unpack(value: u32) -> [u8; 4] {
    value.to_le_bytes()
}

impl PixelBuffer for RgbaImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn pixel(&self, x: u32, y: u32) -> u32 {
        pack(self.get_pixel(x, y).0)
    }
}

impl PixelBufferMut for RgbaImage {
    fn set_pixel(&mut self, x: u32, y: u32, value: u32) {
        self.put_pixel(x, y, Rgba(unpack(value)));
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
