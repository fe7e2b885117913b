//! CPU-side mesh data and primitive generation
//!
//! Meshes are plain vertex/index blobs; GPU upload happens through
//! [`RenderDevice::create_mesh`](super::RenderDevice::create_mesh), which
//! hands back an opaque handle for draw calls.

use crate::foundation::math::constants::TAU;

/// Primitive assembly mode for a mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveTopology {
    /// Vertex triples form triangles
    Triangles,
    /// Vertex pairs form lines
    Lines,
}

/// Vertex and index data for one mesh
///
/// The vertex layout is three floats per vertex (position only); surface
/// color comes from a per-draw uniform.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    /// Interleaved vertex attributes (x, y, z per vertex)
    pub vertices: Vec<f32>,
    /// Optional index list; unindexed meshes draw the vertices in order
    pub indices: Option<Vec<u32>>,
    /// Primitive assembly mode
    pub topology: PrimitiveTopology,
}

/// Number of floats per vertex in [`MeshData::vertices`]
pub const FLOATS_PER_VERTEX: usize = 3;

impl MeshData {
    /// Number of vertices in the mesh
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / FLOATS_PER_VERTEX
    }

    /// Number of indices, or 0 for unindexed meshes
    pub fn index_count(&self) -> usize {
        self.indices.as_ref().map_or(0, Vec::len)
    }
}

/// Generators for the primitive meshes the scene bootstrap uses
pub struct MeshFactory;

impl MeshFactory {
    /// Square-based pyramid, apex up, unit-sized around the origin
    pub fn pyramid() -> MeshData {
        let vertices = vec![
            0.0, 0.5, 0.0, // 0: apex
            -0.5, -0.5, 0.5, // 1: front-left
            0.5, -0.5, 0.5, // 2: front-right
            0.5, -0.5, -0.5, // 3: back-right
            -0.5, -0.5, -0.5, // 4: back-left
        ];
        // Sides wind counter-clockwise seen from outside; base faces down
        let indices = vec![
            0, 1, 2, // front
            0, 2, 3, // right
            0, 3, 4, // back
            0, 4, 1, // left
            1, 4, 3, // base
            1, 3, 2,
        ];
        MeshData {
            vertices,
            indices: Some(indices),
            topology: PrimitiveTopology::Triangles,
        }
    }

    /// Axis-aligned unit cube centered at the origin
    pub fn cube() -> MeshData {
        let vertices = vec![
            -0.5, -0.5, 0.5, // 0: front bottom-left
            0.5, -0.5, 0.5, // 1: front bottom-right
            0.5, 0.5, 0.5, // 2: front top-right
            -0.5, 0.5, 0.5, // 3: front top-left
            -0.5, -0.5, -0.5, // 4: back bottom-left
            0.5, -0.5, -0.5, // 5: back bottom-right
            0.5, 0.5, -0.5, // 6: back top-right
            -0.5, 0.5, -0.5, // 7: back top-left
        ];
        let indices = vec![
            0, 1, 2, 0, 2, 3, // front (+Z)
            5, 4, 7, 5, 7, 6, // back (-Z)
            4, 0, 3, 4, 3, 7, // left (-X)
            1, 5, 6, 1, 6, 2, // right (+X)
            3, 2, 6, 3, 6, 7, // top (+Y)
            4, 5, 1, 4, 1, 0, // bottom (-Y)
        ];
        MeshData {
            vertices,
            indices: Some(indices),
            topology: PrimitiveTopology::Triangles,
        }
    }

    /// Capped cylinder along the Y axis, radius 0.5, height 1.0
    pub fn cylinder(segments: u32) -> MeshData {
        let segments = segments.max(3);
        let radius = 0.5;
        let half_height = 0.5;

        let mut vertices = Vec::new();
        let mut indices = Vec::new();

        // Ring vertices: bottom ring first, then top ring
        for &y in &[-half_height, half_height] {
            for i in 0..segments {
                let angle = i as f32 / segments as f32 * TAU;
                vertices.extend_from_slice(&[radius * angle.cos(), y, radius * angle.sin()]);
            }
        }
        // Cap centers
        let bottom_center = (vertices.len() / FLOATS_PER_VERTEX) as u32;
        vertices.extend_from_slice(&[0.0, -half_height, 0.0]);
        let top_center = bottom_center + 1;
        vertices.extend_from_slice(&[0.0, half_height, 0.0]);

        for i in 0..segments {
            let next = (i + 1) % segments;
            let (b0, b1) = (i, next);
            let (t0, t1) = (segments + i, segments + next);

            // Side quad as two triangles, wound outward
            indices.extend_from_slice(&[b0, t0, b1]);
            indices.extend_from_slice(&[b1, t0, t1]);
            // Bottom cap faces down, top cap faces up
            indices.extend_from_slice(&[bottom_center, b0, b1]);
            indices.extend_from_slice(&[top_center, t1, t0]);
        }

        MeshData {
            vertices,
            indices: Some(indices),
            topology: PrimitiveTopology::Triangles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_indices_in_bounds(mesh: &MeshData) {
        let count = mesh.vertex_count() as u32;
        for &index in mesh.indices.as_ref().unwrap() {
            assert!(index < count, "index {} out of {} vertices", index, count);
        }
    }

    #[test]
    fn pyramid_has_five_vertices_and_six_faces() {
        let mesh = MeshFactory::pyramid();
        assert_eq!(mesh.vertex_count(), 5);
        assert_eq!(mesh.index_count(), 18);
        assert_indices_in_bounds(&mesh);
    }

    #[test]
    fn cube_has_eight_vertices_and_twelve_faces() {
        let mesh = MeshFactory::cube();
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.index_count(), 36);
        assert_indices_in_bounds(&mesh);
    }

    #[test]
    fn cylinder_counts_scale_with_segments() {
        let mesh = MeshFactory::cylinder(24);
        // Two rings plus two cap centers
        assert_eq!(mesh.vertex_count(), 24 * 2 + 2);
        // Per segment: two side triangles plus one triangle per cap
        assert_eq!(mesh.index_count(), 24 * 4 * 3);
        assert_indices_in_bounds(&mesh);
    }

    #[test]
    fn cylinder_clamps_degenerate_segment_counts() {
        let mesh = MeshFactory::cylinder(1);
        assert_eq!(mesh.vertex_count(), 3 * 2 + 2);
    }
}
