/// Errors reported by the shading kernel and scene API
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShadingError {
    #[error("{meshes} meshes but {transforms} transforms")]
    TransformCountMismatch { meshes: usize, transforms: usize },

    #[error(
        "scratch holds {capacity_meshes} meshes x {stride} triangles, \
         frame needs {meshes} meshes x {max_triangles} triangles"
    )]
    ScratchTooSmall {
        capacity_meshes: usize,
        stride: usize,
        meshes: usize,
        max_triangles: usize,
    },

    #[error("output buffer for mesh {mesh} holds {actual} values, mesh has {expected} triangles")]
    OutputShapeMismatch {
        mesh: usize,
        expected: usize,
        actual: usize,
    },

    #[error("output holds {actual} mesh buffers, frame has {expected} meshes")]
    OutputMeshCountMismatch { expected: usize, actual: usize },

    #[error("invalid {name}: {value} (must be finite and non-negative)")]
    InvalidConfig { name: &'static str, value: f32 },

    #[error("mesh index {index} out of range ({count} meshes)")]
    MeshIndexOutOfRange { index: usize, count: usize },

    #[error("light index {index} out of range ({count} lights)")]
    LightIndexOutOfRange { index: usize, count: usize },

    #[error("failed to build shading thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
