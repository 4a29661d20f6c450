use crate::normals::compute_normals;

/// Parallel vertex buffers plus a `u32` triangle list.
///
/// `positions`, `colors` and `uvs` always have the same length. `indices`
/// holds `resolution² * 6` entries, every one a valid vertex index.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshBuffers {
    pub positions: Vec<[f32; 3]>,
    pub colors: Vec<[f32; 4]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl MeshBuffers {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    pub fn heights(&self) -> impl Iterator<Item = f32> + '_ {
        self.positions.iter().map(|p| p[1])
    }

    pub fn compute_normals(&self) -> Vec<[f32; 3]> {
        compute_normals(&self.positions, &self.indices)
    }
}
