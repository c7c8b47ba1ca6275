use glam::Vec3;
use nimbus_core::constants::{SHADER_MAX_INDEXES, SHADER_MAX_VERTEXES};
use nimbus_core::SkyError;

/// One sky vertex as uploaded: world position plus a half-float texture
/// coordinate pair (16 bytes, no padding).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SkyVertex {
    pub position: [f32; 3],
    pub tex_coords: [u16; 2],
}

impl SkyVertex {
    pub fn new(position: Vec3, tex_coords: [u16; 2]) -> Self {
        Self {
            position: position.to_array(),
            tex_coords,
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }
}

/// Triangle source the clip pass reads: indexed triangles with world-space
/// positions.
pub trait SurfaceTriangles {
    fn triangle_count(&self) -> usize;

    /// Corners of triangle `index`, `index < triangle_count()`.
    fn triangle(&self, index: usize) -> [Vec3; 3];
}

/// Shared vertex/index buffer with hard capacities.
///
/// Only one writer fills it per frame. Pushing past either capacity fails
/// rather than truncating; whatever was pushed before the failure stays
/// but must not be drawn.
#[derive(Debug, Clone)]
pub struct TessBuffer {
    vertices: Vec<SkyVertex>,
    indices: Vec<u32>,
    max_vertices: usize,
    max_indices: usize,
}

impl Default for TessBuffer {
    fn default() -> Self {
        Self::new(SHADER_MAX_VERTEXES, SHADER_MAX_INDEXES)
    }
}

impl TessBuffer {
    /// Allocate both lists up front; nothing grows past these sizes.
    pub fn new(max_vertices: usize, max_indices: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(max_vertices),
            indices: Vec::with_capacity(max_indices),
            max_vertices,
            max_indices,
        }
    }

    /// Drop all vertices and indices, keeping the allocations.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    /// Append a vertex and return its index.
    pub fn push_vertex(&mut self, vertex: SkyVertex) -> Result<u32, SkyError> {
        if self.vertices.len() >= self.max_vertices {
            return Err(SkyError::VertexOverflow {
                capacity: self.max_vertices,
            });
        }
        let index = self.vertices.len() as u32;
        self.vertices.push(vertex);
        Ok(index)
    }

    /// Append one triangle's three indices. Every index must name a vertex
    /// already in the buffer.
    pub fn push_triangle(&mut self, tri: [u32; 3]) -> Result<(), SkyError> {
        if self.indices.len() + 3 > self.max_indices {
            return Err(SkyError::IndexOverflow {
                capacity: self.max_indices,
            });
        }
        if let Some(&index) = tri.iter().find(|&&i| i as usize >= self.vertices.len()) {
            return Err(SkyError::IndexOutOfRange {
                index,
                vertices: self.vertices.len(),
            });
        }
        self.indices.extend_from_slice(&tri);
        Ok(())
    }

    pub fn vertices(&self) -> &[SkyVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_indices(&self) -> usize {
        self.indices.len()
    }

    pub fn max_vertices(&self) -> usize {
        self.max_vertices
    }

    pub fn max_indices(&self) -> usize {
        self.max_indices
    }

    /// Vertex data as raw bytes for upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index data as raw bytes for upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

impl SurfaceTriangles for TessBuffer {
    fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    fn triangle(&self, index: usize) -> [Vec3; 3] {
        let base = index * 3;
        [
            self.vertices[self.indices[base] as usize].position(),
            self.vertices[self.indices[base + 1] as usize].position(),
            self.vertices[self.indices[base + 2] as usize].position(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex(x: f32) -> SkyVertex {
        SkyVertex::new(Vec3::new(x, 0.0, 0.0), [0, 0])
    }

    #[test]
    fn test_vertex_layout() {
        assert_eq!(std::mem::size_of::<SkyVertex>(), 16);
        let v = SkyVertex::new(Vec3::new(1.0, 2.0, 3.0), [0x3C00, 0x4000]);
        let bytes: &[u8] = bytemuck::bytes_of(&v);
        assert_eq!(&bytes[0..4], &1.0f32.to_ne_bytes());
        assert_eq!(&bytes[12..14], &0x3C00u16.to_ne_bytes());
    }

    #[test]
    fn test_default_capacities() {
        let tess = TessBuffer::default();
        assert_eq!(tess.max_vertices(), 1000);
        assert_eq!(tess.max_indices(), 6000);
        assert_eq!(tess.num_vertices(), 0);
    }

    #[test]
    fn test_push_returns_indices() {
        let mut tess = TessBuffer::new(4, 6);
        assert_eq!(tess.push_vertex(vertex(0.0)), Ok(0));
        assert_eq!(tess.push_vertex(vertex(1.0)), Ok(1));
        assert_eq!(tess.push_vertex(vertex(2.0)), Ok(2));
        tess.push_triangle([0, 1, 2]).expect("fits");
        assert_eq!(tess.num_indices(), 3);
        assert_eq!(tess.index_bytes().len(), 12);
        assert_eq!(tess.vertex_bytes().len(), 48);
    }

    #[test]
    fn test_vertex_capacity_is_hard() {
        let mut tess = TessBuffer::new(2, 6);
        tess.push_vertex(vertex(0.0)).expect("fits");
        tess.push_vertex(vertex(1.0)).expect("fits");
        assert_eq!(
            tess.push_vertex(vertex(2.0)),
            Err(SkyError::VertexOverflow { capacity: 2 })
        );
        assert_eq!(tess.num_vertices(), 2);
    }

    #[test]
    fn test_index_capacity_is_hard() {
        let mut tess = TessBuffer::new(8, 5);
        for x in [0.0, 1.0, 2.0] {
            tess.push_vertex(vertex(x)).expect("fits");
        }
        assert_eq!(tess.push_triangle([0, 1, 2]), Ok(()));
        assert_eq!(
            tess.push_triangle([0, 1, 2]),
            Err(SkyError::IndexOverflow { capacity: 5 })
        );
        assert_eq!(tess.num_indices(), 3);
    }

    #[test]
    fn test_triangle_indices_must_exist() {
        let mut tess = TessBuffer::new(4, 6);
        tess.push_vertex(vertex(0.0)).expect("fits");
        tess.push_vertex(vertex(1.0)).expect("fits");
        assert_eq!(
            tess.push_triangle([0, 1, 2]),
            Err(SkyError::IndexOutOfRange {
                index: 2,
                vertices: 2
            })
        );
        assert_eq!(tess.num_indices(), 0);
        assert_eq!(tess.triangle_count(), 0);
        tess.push_vertex(vertex(2.0)).expect("fits");
        assert_eq!(tess.push_triangle([0, 1, 2]), Ok(()));
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut tess = TessBuffer::new(2, 3);
        tess.push_vertex(vertex(0.0)).expect("fits");
        tess.push_triangle([0, 0, 0]).expect("fits");
        tess.clear();
        assert_eq!(tess.num_vertices(), 0);
        assert_eq!(tess.num_indices(), 0);
        assert_eq!(tess.max_vertices(), 2);
    }

    #[test]
    fn test_surface_triangles_from_indices() {
        let mut tess = TessBuffer::default();
        for x in [0.0, 1.0, 2.0, 3.0] {
            tess.push_vertex(vertex(x)).expect("fits");
        }
        tess.push_triangle([0, 1, 2]).expect("fits");
        tess.push_triangle([3, 2, 1]).expect("fits");
        assert_eq!(tess.triangle_count(), 2);
        let tri = tess.triangle(1);
        assert_eq!(tri[0], Vec3::new(3.0, 0.0, 0.0));
        assert_eq!(tri[2], Vec3::new(1.0, 0.0, 0.0));
    }
}
