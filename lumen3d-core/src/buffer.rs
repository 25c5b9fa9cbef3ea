/// Scratch storage for the shading kernel and the per-mesh buffers it
/// publishes each frame.
///
/// Both are allocated once when a scene is set up and reused for every
/// frame afterwards; the kernel only ever writes into existing storage.
use std::ops::Index;

use rayon::prelude::*;
use rayon::slice::ChunksMut as ParChunksMut;

use crate::error::ShadingError;
use crate::geometry::Mesh;

/// Flat `mesh_capacity x stride` region, one row per mesh
#[derive(Debug, Clone)]
pub struct ShadingScratch {
    values: Vec<f32>,
    mesh_capacity: usize,
    stride: usize,
}

impl ShadingScratch {
    pub fn new(mesh_capacity: usize, stride: usize) -> Self {
        Self {
            values: vec![0.0; mesh_capacity * stride],
            mesh_capacity,
            stride,
        }
    }

    /// Size a scratch region for a fixed set of meshes
    pub fn for_meshes(meshes: &[Mesh]) -> Self {
        Self::new(meshes.len(), max_triangles(meshes))
    }

    pub fn mesh_capacity(&self) -> usize {
        self.mesh_capacity
    }

    /// Triangles per mesh row
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Fail unless every mesh has its own row wide enough for its triangles
    pub fn check_fits(&self, meshes: &[Mesh]) -> Result<(), ShadingError> {
        let max = max_triangles(meshes);
        if meshes.len() > self.mesh_capacity || max > self.stride {
            return Err(ShadingError::ScratchTooSmall {
                capacity_meshes: self.mesh_capacity,
                stride: self.stride,
                meshes: meshes.len(),
                max_triangles: max,
            });
        }
        Ok(())
    }

    /// The first `len` values of a mesh's row
    pub(crate) fn row(&self, mesh: usize, len: usize) -> &[f32] {
        let start = mesh * self.stride;
        &self.values[start..start + len]
    }

    /// Mutable rows for the first `meshes` meshes, one disjoint slice each.
    ///
    /// Returns `None` when rows are zero-width, in which case there is
    /// nothing to write.
    pub(crate) fn rows_mut(&mut self, meshes: usize) -> Option<std::slice::ChunksMut<'_, f32>> {
        if self.stride == 0 {
            return None;
        }
        Some(self.values[..meshes * self.stride].chunks_mut(self.stride))
    }

    /// Parallel counterpart of [`rows_mut`](Self::rows_mut)
    pub(crate) fn par_rows_mut(&mut self, meshes: usize) -> Option<ParChunksMut<'_, f32>> {
        if self.stride == 0 {
            return None;
        }
        Some(self.values[..meshes * self.stride].par_chunks_mut(self.stride))
    }
}

/// Per-mesh shading values published for one frame, indexed like the mesh
/// list. Each buffer's length equals its mesh's triangle count.
#[derive(Debug, Clone, Default)]
pub struct ShadingBuffers {
    per_mesh: Vec<Vec<f32>>,
}

impl ShadingBuffers {
    pub fn for_meshes(meshes: &[Mesh]) -> Self {
        Self {
            per_mesh: meshes.iter().map(|m| vec![0.0; m.triangle_count()]).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.per_mesh.len()
    }

    pub fn is_empty(&self) -> bool {
        self.per_mesh.is_empty()
    }

    pub fn get(&self, mesh: usize) -> Option<&[f32]> {
        self.per_mesh.get(mesh).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = &[f32]> {
        self.per_mesh.iter().map(Vec::as_slice)
    }

    pub fn check_shape(&self, meshes: &[Mesh]) -> Result<(), ShadingError> {
        if self.per_mesh.len() != meshes.len() {
            return Err(ShadingError::OutputMeshCountMismatch {
                expected: meshes.len(),
                actual: self.per_mesh.len(),
            });
        }
        for (mesh, (buffer, source)) in self.per_mesh.iter().zip(meshes).enumerate() {
            if buffer.len() != source.triangle_count() {
                return Err(ShadingError::OutputShapeMismatch {
                    mesh,
                    expected: source.triangle_count(),
                    actual: buffer.len(),
                });
            }
        }
        Ok(())
    }

    /// Copy each mesh's row out of the scratch region. Shapes must already
    /// have been checked.
    pub(crate) fn publish(&mut self, scratch: &ShadingScratch) {
        for (mesh, buffer) in self.per_mesh.iter_mut().enumerate() {
            let len = buffer.len();
            buffer.copy_from_slice(scratch.row(mesh, len));
        }
    }
}

impl Index<usize> for ShadingBuffers {
    type Output = [f32];

    fn index(&self, mesh: usize) -> &[f32] {
        &self.per_mesh[mesh]
    }
}

fn max_triangles(meshes: &[Mesh]) -> usize {
    meshes.iter().map(Mesh::triangle_count).max().unwrap_or(0)
}
