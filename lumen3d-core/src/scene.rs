/// Scene aggregate: meshes, their transforms, lights, and the buffers the
/// shading kernel writes each frame
use log::{debug, warn};
use nalgebra::{Point3, Vector3};

use crate::buffer::{ShadingBuffers, ShadingScratch};
use crate::error::ShadingError;
use crate::geometry::{Aabb, Mesh};
use crate::lighting::{LightingConfig, PointLight};
use crate::scheduler::{ExecutionMode, FrameInputs, ShadingScheduler};
use crate::transform::{MeshTransform, Transform};

/// Triangle totals above this are logged as heavy
pub const HIGH_POLY_WARNING: usize = 10_000;
/// Triangle totals above this are logged as critical
pub const HIGH_POLY_CRITICAL: usize = 20_000;

/// Collects meshes and lights before the shading buffers are sized
#[derive(Debug, Default)]
pub struct SceneBuilder {
    meshes: Vec<Mesh>,
    transforms: Vec<MeshTransform>,
    lights: Vec<PointLight>,
    config: LightingConfig,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: LightingConfig) -> Self {
        self.config = config;
        self
    }

    /// Add a mesh with its initial placement, returning its index
    pub fn add_mesh(&mut self, mesh: Mesh, transform: MeshTransform) -> usize {
        self.meshes.push(mesh);
        self.transforms.push(transform);
        self.meshes.len() - 1
    }

    pub fn add_light(&mut self, light: PointLight) -> usize {
        self.lights.push(light);
        self.lights.len() - 1
    }

    /// Freeze the mesh list and allocate the shading buffers for it
    pub fn build(self) -> Scene {
        let triangles: usize = self.meshes.iter().map(Mesh::triangle_count).sum();
        debug!(
            "scene built: {} meshes, {} triangles, {} lights",
            self.meshes.len(),
            triangles,
            self.lights.len()
        );
        if triangles > HIGH_POLY_CRITICAL {
            warn!("very high poly count ({triangles} triangles), expect slow frames");
        } else if triangles > HIGH_POLY_WARNING {
            warn!("high poly count ({triangles} triangles)");
        }

        let scratch = ShadingScratch::for_meshes(&self.meshes);
        let shading = ShadingBuffers::for_meshes(&self.meshes);
        Scene {
            meshes: self.meshes,
            transforms: self.transforms,
            lights: self.lights,
            config: self.config,
            scratch,
            shading,
            selected: 0,
            non_finite_reported: 0,
        }
    }
}

/// A loaded scene. The mesh list is fixed; transforms, lights and the
/// lighting config may change between frames.
#[derive(Debug)]
pub struct Scene {
    meshes: Vec<Mesh>,
    transforms: Vec<MeshTransform>,
    lights: Vec<PointLight>,
    config: LightingConfig,
    scratch: ShadingScratch,
    shading: ShadingBuffers,
    selected: usize,
    non_finite_reported: usize,
}

impl Scene {
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(Mesh::triangle_count).sum()
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn transforms(&self) -> &[MeshTransform] {
        &self.transforms
    }

    pub fn lights(&self) -> &[PointLight] {
        &self.lights
    }

    pub fn config(&self) -> LightingConfig {
        self.config
    }

    pub fn set_config(&mut self, config: LightingConfig) {
        self.config = config;
    }

    pub fn transform(&self, index: usize) -> Result<&MeshTransform, ShadingError> {
        let count = self.transforms.len();
        self.transforms
            .get(index)
            .ok_or(ShadingError::MeshIndexOutOfRange { index, count })
    }

    pub fn transform_mut(&mut self, index: usize) -> Result<&mut MeshTransform, ShadingError> {
        let count = self.transforms.len();
        self.transforms
            .get_mut(index)
            .ok_or(ShadingError::MeshIndexOutOfRange { index, count })
    }

    pub fn set_mesh_transform(
        &mut self,
        index: usize,
        transform: MeshTransform,
    ) -> Result<(), ShadingError> {
        *self.transform_mut(index)? = transform;
        Ok(())
    }

    pub fn add_light(&mut self, light: PointLight) -> usize {
        self.lights.push(light);
        self.lights.len() - 1
    }

    pub fn light_mut(&mut self, index: usize) -> Result<&mut PointLight, ShadingError> {
        let count = self.lights.len();
        self.lights
            .get_mut(index)
            .ok_or(ShadingError::LightIndexOutOfRange { index, count })
    }

    pub fn set_light_position(
        &mut self,
        index: usize,
        position: Point3<f32>,
    ) -> Result<(), ShadingError> {
        self.light_mut(index)?.position = position;
        Ok(())
    }

    /// Currently selected mesh, if the scene has any
    pub fn selected(&self) -> Option<usize> {
        (!self.meshes.is_empty()).then_some(self.selected)
    }

    /// Select a mesh directly, e.g. from a picking buffer lookup
    pub fn select(&mut self, index: usize) -> Result<(), ShadingError> {
        if index >= self.meshes.len() {
            return Err(ShadingError::MeshIndexOutOfRange {
                index,
                count: self.meshes.len(),
            });
        }
        self.selected = index;
        Ok(())
    }

    /// Advance the selection, wrapping past the last mesh
    pub fn select_next(&mut self) -> Option<usize> {
        let count = self.meshes.len();
        if count == 0 {
            return None;
        }
        self.selected = (self.selected + 1) % count;
        Some(self.selected)
    }

    /// Step the selection back, wrapping before the first mesh
    pub fn select_previous(&mut self) -> Option<usize> {
        let count = self.meshes.len();
        if count == 0 {
            return None;
        }
        self.selected = (self.selected + count - 1) % count;
        Some(self.selected)
    }

    /// Move the selected mesh by `delta` in world space
    pub fn nudge_selected(&mut self, delta: Vector3<f32>) -> Option<usize> {
        let index = self.selected()?;
        self.transforms[index].position += delta;
        Some(index)
    }

    /// World-space bounding box of a mesh under its current transform
    pub fn world_bounds(&self, index: usize) -> Result<Aabb, ShadingError> {
        let mesh = self
            .meshes
            .get(index)
            .ok_or(ShadingError::MeshIndexOutOfRange {
                index,
                count: self.meshes.len(),
            })?;
        Ok(Transform::bounds_to_world(&mesh.bounds(), &self.transforms[index]))
    }

    /// Number of mesh transforms and lights holding NaN or infinite values
    pub fn non_finite_count(&self) -> usize {
        let transforms = self.transforms.iter().filter(|t| !t.is_finite()).count();
        let lights = self.lights.iter().filter(|l| !l.is_finite()).count();
        transforms + lights
    }

    /// Run the shading kernel for the current transforms and lights.
    /// Returns the number of triangles shaded.
    ///
    /// Non-finite transforms and lights are shaded as-is (affected faces get
    /// ambient only). A warning is logged whenever their number changes.
    pub fn shade(
        &mut self,
        scheduler: &ShadingScheduler,
        mode: ExecutionMode,
    ) -> Result<usize, ShadingError> {
        let non_finite = self.non_finite_count();
        if non_finite != self.non_finite_reported {
            if non_finite > 0 {
                warn!(
                    "{non_finite} mesh transforms or lights are non-finite, \
                     affected faces shade as ambient"
                );
            }
            self.non_finite_reported = non_finite;
        }

        let frame = FrameInputs {
            meshes: &self.meshes,
            transforms: &self.transforms,
            lights: &self.lights,
            config: self.config,
        };
        scheduler.shade(mode, &frame, &mut self.scratch, &mut self.shading)
    }

    /// Shading published by the last [`shade`](Self::shade) call
    pub fn shading(&self) -> &ShadingBuffers {
        &self.shading
    }
}
