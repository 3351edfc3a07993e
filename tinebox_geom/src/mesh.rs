// Triangle mesh buffers.
//
// Flat arrays: positions and normals interleave as [x, y, z, x, y, z, ...]
// with three indices per triangle. Every vertex of a facet carries the same
// normal — the STL writer reads the first vertex's normal as the facet
// normal, so emitters must pass the true face normal, not a smoothed one.

/// Mesh geometry output: flat arrays ready for the STL writer.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    /// Vertex positions as flat [x, y, z, x, y, z, ...].
    pub vertices: Vec<f32>,
    /// Per-vertex normals, same layout as `vertices`.
    pub normals: Vec<f32>,
    /// Triangle indices (3 per triangle).
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn vertex(&self, index: u32) -> [f32; 3] {
        let i = index as usize * 3;
        [self.vertices[i], self.vertices[i + 1], self.vertices[i + 2]]
    }

    pub fn normal(&self, index: u32) -> [f32; 3] {
        let i = index as usize * 3;
        [self.normals[i], self.normals[i + 1], self.normals[i + 2]]
    }

    /// Append another mesh's triangles (shell union by concatenation).
    pub fn append(&mut self, other: &MeshData) {
        let base = (self.vertices.len() / 3) as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.normals.extend_from_slice(&other.normals);
        self.indices.extend(other.indices.iter().map(|&i| i + base));
    }
}

/// Emit a single triangle. Corners are expected CCW when viewed from the
/// side the normal points toward.
pub fn emit_tri(mesh: &mut MeshData, c0: [f32; 3], c1: [f32; 3], c2: [f32; 3], normal: [f32; 3]) {
    let base_idx = (mesh.vertices.len() / 3) as u32;
    for &corner in &[c0, c1, c2] {
        mesh.vertices.extend_from_slice(&corner);
        mesh.normals.extend_from_slice(&normal);
    }
    mesh.indices.push(base_idx);
    mesh.indices.push(base_idx + 1);
    mesh.indices.push(base_idx + 2);
}

/// Emit a single quad (2 triangles) into the mesh data.
/// Corners are expected in CCW order when viewed from the front.
pub fn emit_quad(
    mesh: &mut MeshData,
    c0: [f32; 3],
    c1: [f32; 3],
    c2: [f32; 3],
    c3: [f32; 3],
    normal: [f32; 3],
) {
    let base_idx = (mesh.vertices.len() / 3) as u32;

    for &corner in &[c0, c1, c2, c3] {
        mesh.vertices.extend_from_slice(&corner);
        mesh.normals.extend_from_slice(&normal);
    }

    // 2 triangles: 0-1-2, 0-2-3
    mesh.indices.push(base_idx);
    mesh.indices.push(base_idx + 1);
    mesh.indices.push(base_idx + 2);
    mesh.indices.push(base_idx);
    mesh.indices.push(base_idx + 2);
    mesh.indices.push(base_idx + 3);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quad_emits_two_triangles_sharing_vertices() {
        let mut mesh = MeshData::default();
        emit_quad(
            &mut mesh,
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
        );
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.vertices.len(), 12, "4 vertices, not 6");
        assert_eq!(mesh.normal(0), [0.0, 0.0, 1.0]);
        assert_eq!(mesh.normal(3), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_append_rebases_indices() {
        let mut a = MeshData::default();
        emit_tri(
            &mut a,
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
        );
        let mut b = MeshData::default();
        emit_tri(
            &mut b,
            [5.0, 0.0, 0.0],
            [6.0, 0.0, 0.0],
            [5.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
        );
        a.append(&b);
        assert_eq!(a.triangle_count(), 2);
        assert_eq!(a.indices[3..], [3, 4, 5]);
        assert_eq!(a.vertex(3), [5.0, 0.0, 0.0]);
    }
}
