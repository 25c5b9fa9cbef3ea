/// Lumen3D Core Library - CPU scene transform and diffuse lighting kernel
///
/// Every frame the kernel re-derives world-space triangles from each mesh's
/// transform, extracts face normals and centroids, and accumulates ambient +
/// diffuse point-light shading into one value per triangle. Meshes are
/// shaded either across a thread pool or serially with identical results.

pub mod buffer;
pub mod error;
pub mod geometry;
pub mod lighting;
pub mod scene;
pub mod scheduler;
pub mod transform;

// Re-export commonly used types
pub use buffer::{ShadingBuffers, ShadingScratch};
pub use error::ShadingError;
pub use geometry::{Aabb, Mesh, Triangle};
pub use lighting::{LightingConfig, PointLight};
pub use scene::{Scene, SceneBuilder};
pub use scheduler::{ExecutionMode, FrameInputs, ShadingScheduler};
pub use transform::{MeshTransform, RotationState, Transform};
