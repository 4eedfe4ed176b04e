use glam::Vec2;
use image::{Rgba, RgbaImage};

use super::DrawTarget;

// ── TextVertex ────────────────────────────────────────────────────────────────

/// A single vertex produced by [`QuadBatch`].
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TextVertex {
    /// Screen-space position in pixels.
    pub position: [f32; 2],
    /// Normalised atlas texture coordinates in `[0, 1]`.
    pub tex_coords: [f32; 2],
    /// Tint in linear `[0, 1]` RGBA.
    pub color: [f32; 4],
}

// ── QuadBatch ─────────────────────────────────────────────────────────────────

/// [`DrawTarget`] that turns every blit into a textured quad, ready for a
/// vertex + index buffer upload.
///
/// # Layout
/// Each blit produces **4 vertices** and **6 indices**
/// (two counter-clockwise triangles, Y-axis pointing down):
///
/// ```text
/// 0──1
/// │ /│
/// 2──3
/// triangles: (0,1,2) and (1,3,2)
/// ```
///
/// Blits of a zero-area source rectangle (missing glyphs) produce nothing.
#[derive(Debug, Default, Clone)]
pub struct QuadBatch {
    pub vertices: Vec<TextVertex>,
    pub indices: Vec<u32>,
}

impl QuadBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all quads, keeping the allocations for the next frame.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Vertex data as raw bytes for a GPU buffer upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index data as raw bytes for a GPU buffer upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Push one quad. `corners` are in reading order: TL, TR, BL, BR.
    fn push_quad(
        &mut self,
        corners: [Vec2; 4],
        texture: &RgbaImage,
        source_pos: Vec2,
        source_size: Vec2,
        tint: Rgba<u8>,
    ) {
        let (tw, th) = texture.dimensions();
        let tex = Vec2::new(tw.max(1) as f32, th.max(1) as f32);
        let uv0 = source_pos / tex;
        let uv1 = (source_pos + source_size) / tex;
        let uvs = [
            [uv0.x, uv0.y],
            [uv1.x, uv0.y],
            [uv0.x, uv1.y],
            [uv1.x, uv1.y],
        ];
        let color = tint.0.map(|c| c as f32 / 255.0);

        let base = self.vertices.len() as u32;
        for (corner, tex_coords) in corners.into_iter().zip(uvs) {
            self.vertices.push(TextVertex { position: corner.to_array(), tex_coords, color });
        }
        // Two CCW triangles (Y-down): TL-TR-BL, TR-BR-BL.
        self.indices.extend_from_slice(&[base, base + 1, base + 2, base + 1, base + 3, base + 2]);
    }
}

fn is_degenerate(size: Vec2) -> bool {
    size.x <= 0.0 || size.y <= 0.0
}

/// Corners of a `size` rectangle in reading order, relative to its top-left.
fn local_corners(size: Vec2) -> [Vec2; 4] {
    [Vec2::ZERO, Vec2::new(size.x, 0.0), Vec2::new(0.0, size.y), size]
}

impl DrawTarget for QuadBatch {
    fn draw_partial_decal(
        &mut self,
        texture: &RgbaImage,
        pos: Vec2,
        source_pos: Vec2,
        source_size: Vec2,
        scale: Vec2,
        tint: Rgba<u8>,
    ) {
        if is_degenerate(source_size) {
            return;
        }
        let corners = local_corners(source_size).map(|c| pos + c * scale);
        self.push_quad(corners, texture, source_pos, source_size, tint);
    }

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
    ) {
        if is_degenerate(source_size) {
            return;
        }
        let rotation = Vec2::from_angle(angle);
        let corners = local_corners(source_size).map(|c| pos + rotation.rotate((c - center) * scale));
        self.push_quad(corners, texture, source_pos, source_size, tint);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    fn texture() -> RgbaImage {
        RgbaImage::new(64, 32)
    }

    fn assert_close(a: [f32; 2], b: [f32; 2]) {
        assert!(
            (a[0] - b[0]).abs() < 1e-4 && (a[1] - b[1]).abs() < 1e-4,
            "expected {b:?}, got {a:?}"
        );
    }

    #[test]
    fn decal_emits_scaled_quad() {
        let mut batch = QuadBatch::new();
        batch.draw_partial_decal(
            &texture(),
            Vec2::new(10.0, 20.0),
            Vec2::new(8.0, 0.0),
            Vec2::new(8.0, 16.0),
            Vec2::splat(2.0),
            WHITE,
        );
        assert_eq!(batch.quad_count(), 1);
        assert_close(batch.vertices[0].position, [10.0, 20.0]);
        assert_close(batch.vertices[3].position, [26.0, 52.0]);
        assert_eq!(batch.indices, vec![0, 1, 2, 1, 3, 2]);
    }

    #[test]
    fn uvs_are_normalised_by_texture_size() {
        let mut batch = QuadBatch::new();
        batch.draw_partial_decal(
            &texture(),
            Vec2::ZERO,
            Vec2::new(8.0, 0.0),
            Vec2::new(8.0, 16.0),
            Vec2::ONE,
            WHITE,
        );
        assert_close(batch.vertices[0].tex_coords, [0.125, 0.0]);
        assert_close(batch.vertices[3].tex_coords, [0.25, 0.5]);
    }

    #[test]
    fn tint_is_normalised() {
        let mut batch = QuadBatch::new();
        batch.draw_partial_decal(
            &texture(),
            Vec2::ZERO,
            Vec2::ZERO,
            Vec2::ONE,
            Vec2::ONE,
            Rgba([255, 0, 51, 255]),
        );
        assert_eq!(batch.vertices[0].color, [1.0, 0.0, 0.2, 1.0]);
    }

    #[test]
    fn zero_sized_source_is_skipped() {
        let mut batch = QuadBatch::new();
        batch.draw_partial_decal(&texture(), Vec2::ZERO, Vec2::ZERO, Vec2::ZERO, Vec2::ONE, WHITE);
        batch.draw_partial_rotated_decal(
            &texture(),
            Vec2::ZERO,
            1.0,
            Vec2::ZERO,
            Vec2::ZERO,
            Vec2::new(4.0, 0.0),
            Vec2::ONE,
            WHITE,
        );
        assert!(batch.is_empty());
        assert!(batch.indices.is_empty());
    }

    #[test]
    fn rotated_decal_subtracts_center_before_rotating() {
        // Quarter turn: (x, y) -> (-y, x).
        let mut batch = QuadBatch::new();
        batch.draw_partial_rotated_decal(
            &texture(),
            Vec2::new(100.0, 100.0),
            std::f32::consts::FRAC_PI_2,
            Vec2::new(-8.0, 0.0),
            Vec2::ZERO,
            Vec2::new(8.0, 16.0),
            Vec2::ONE,
            WHITE,
        );
        // TL local = (0,0) - (-8,0) = (8,0) -> (0,8)
        assert_close(batch.vertices[0].position, [100.0, 108.0]);
        // BR local = (8,16) + (8,0) = (16,16) -> (-16,16)
        assert_close(batch.vertices[3].position, [84.0, 116.0]);
    }

    #[test]
    fn second_quad_indices_offset_by_4() {
        let mut batch = QuadBatch::new();
        for _ in 0..2 {
            batch.draw_partial_decal(&texture(), Vec2::ZERO, Vec2::ZERO, Vec2::ONE, Vec2::ONE, WHITE);
        }
        assert_eq!(&batch.indices[6..], &[4, 5, 6, 5, 7, 6]);
        assert_eq!(batch.vertex_bytes().len(), 8 * std::mem::size_of::<TextVertex>());
        assert_eq!(batch.index_bytes().len(), 12 * 4);
        batch.clear();
        assert_eq!(batch.quad_count(), 0);
    }
}
