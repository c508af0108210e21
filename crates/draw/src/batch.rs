//! Immediate-mode vertex batching.
//!
//! A [`DrawBatch`] accumulates colored lines and quads into CPU-side vertex
//! buffers each frame; the host uploads and submits them. Lines and
//! triangles are kept in separate streams because they are drawn with
//! different primitive topologies.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Vertex format shared by HUD and debug geometry.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct HudVertex {
    /// Position in the host's current transform space.
    pub position: [f32; 3],
    /// UV coordinates into the bound texture.
    pub uv: [f32; 2],
    /// Vertex color (RGBA).
    pub color: [f32; 4],
}

/// UV used by untextured geometry; the host keeps a white pixel there.
pub const WHITE_UV: [f32; 2] = [0.0, 0.0];

/// Accumulates immediate-mode geometry for one frame.
#[derive(Default)]
pub struct DrawBatch {
    tri_vertices: Vec<HudVertex>,
    tri_indices: Vec<u32>,
    line_vertices: Vec<HudVertex>,
}

impl DrawBatch {
    /// Create an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all accumulated geometry, keeping allocations for the next frame.
    pub fn clear(&mut self) {
        self.tri_vertices.clear();
        self.tri_indices.clear();
        self.line_vertices.clear();
    }

    /// Whether the batch holds no geometry.
    pub fn is_empty(&self) -> bool {
        self.tri_vertices.is_empty() && self.line_vertices.is_empty()
    }

    /// Append a line segment.
    pub fn line(&mut self, a: Vec3, b: Vec3, color: [f32; 4]) {
        self.line_vertices.push(HudVertex {
            position: a.to_array(),
            uv: WHITE_UV,
            color,
        });
        self.line_vertices.push(HudVertex {
            position: b.to_array(),
            uv: WHITE_UV,
            color,
        });
    }

    /// Append the 12 edges of an axis-aligned box.
    pub fn box_edges(&mut self, min: Vec3, max: Vec3, color: [f32; 4]) {
        let corners = [
            Vec3::new(min.x, min.y, min.z),
            Vec3::new(max.x, min.y, min.z),
            Vec3::new(max.x, min.y, max.z),
            Vec3::new(min.x, min.y, max.z),
            Vec3::new(min.x, max.y, min.z),
            Vec3::new(max.x, max.y, min.z),
            Vec3::new(max.x, max.y, max.z),
            Vec3::new(min.x, max.y, max.z),
        ];
        const EDGES: [(usize, usize); 12] = [
            (0, 1),
            (1, 2),
            (2, 3),
            (3, 0),
            (4, 5),
            (5, 6),
            (6, 7),
            (7, 4),
            (0, 4),
            (1, 5),
            (2, 6),
            (3, 7),
        ];
        for (a, b) in EDGES {
            self.line(corners[a], corners[b], color);
        }
    }

    /// Append a solid quad from four corners in winding order.
    pub fn quad(&mut self, corners: [Vec3; 4], color: [f32; 4]) {
        self.textured_quad(corners, WHITE_UV, WHITE_UV, color);
    }

    /// Append a textured quad; `uv_min`/`uv_max` map onto corners 0 and 2.
    pub fn textured_quad(
        &mut self,
        corners: [Vec3; 4],
        uv_min: [f32; 2],
        uv_max: [f32; 2],
        color: [f32; 4],
    ) {
        let base = self.tri_vertices.len() as u32;
        let uvs = [
            [uv_min[0], uv_min[1]],
            [uv_max[0], uv_min[1]],
            [uv_max[0], uv_max[1]],
            [uv_min[0], uv_max[1]],
        ];
        for (corner, uv) in corners.into_iter().zip(uvs) {
            self.tri_vertices.push(HudVertex {
                position: corner.to_array(),
                uv,
                color,
            });
        }
        self.tri_indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    /// Triangle-list vertices accumulated so far.
    pub fn tri_vertices(&self) -> &[HudVertex] {
        &self.tri_vertices
    }

    /// Triangle-list indices accumulated so far.
    pub fn tri_indices(&self) -> &[u32] {
        &self.tri_indices
    }

    /// Line-list vertices accumulated so far.
    pub fn line_vertices(&self) -> &[HudVertex] {
        &self.line_vertices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_appends_two_vertices() {
        let mut batch = DrawBatch::new();
        batch.line(Vec3::ZERO, Vec3::ONE, [1.0; 4]);
        assert_eq!(batch.line_vertices().len(), 2);
        assert!(batch.tri_vertices().is_empty());
    }

    #[test]
    fn test_box_edges_appends_twelve_lines() {
        let mut batch = DrawBatch::new();
        batch.box_edges(Vec3::ZERO, Vec3::ONE, [1.0; 4]);
        assert_eq!(batch.line_vertices().len(), 24);
    }

    #[test]
    fn test_quad_appends_four_vertices_six_indices() {
        let mut batch = DrawBatch::new();
        batch.quad(
            [
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            [1.0; 4],
        );
        assert_eq!(batch.tri_vertices().len(), 4);
        assert_eq!(batch.tri_indices(), &[0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn test_clear_empties_all_streams() {
        let mut batch = DrawBatch::new();
        batch.line(Vec3::ZERO, Vec3::ONE, [1.0; 4]);
        batch.quad([Vec3::ZERO; 4], [1.0; 4]);
        assert!(!batch.is_empty());
        batch.clear();
        assert!(batch.is_empty());
    }
}
