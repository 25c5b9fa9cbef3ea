/// Per-frame shading kernel and its two execution strategies.
///
/// Work is partitioned by mesh: every mesh owns one row of the scratch
/// region, so parallel partitions never share output and need no locking.
/// Both strategies run the same per-mesh routine and produce the same
/// values. Publishing into [`ShadingBuffers`] happens serially after every
/// partition has joined.
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::buffer::{ShadingBuffers, ShadingScratch};
use crate::error::ShadingError;
use crate::geometry::Mesh;
use crate::lighting::{diffuse, face_frame, LightingConfig, PointLight};
use crate::transform::{MeshTransform, Transform};

/// How the kernel spreads meshes over threads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// One task per mesh on the scheduler's thread pool
    #[default]
    Parallel,
    /// Meshes in index order on the calling thread
    Serial,
}

impl ExecutionMode {
    pub fn label(&self) -> &'static str {
        match self {
            ExecutionMode::Parallel => "CPU (Parallel)",
            ExecutionMode::Serial => "CPU (Serial)",
        }
    }
}

/// Everything the kernel reads for one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameInputs<'a> {
    pub meshes: &'a [Mesh],
    pub transforms: &'a [MeshTransform],
    pub lights: &'a [PointLight],
    pub config: LightingConfig,
}

impl<'a> FrameInputs<'a> {
    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(Mesh::triangle_count).sum()
    }

    fn validate(
        &self,
        scratch: &ShadingScratch,
        output: &ShadingBuffers,
    ) -> Result<(), ShadingError> {
        if self.transforms.len() != self.meshes.len() {
            return Err(ShadingError::TransformCountMismatch {
                meshes: self.meshes.len(),
                transforms: self.transforms.len(),
            });
        }
        scratch.check_fits(self.meshes)?;
        output.check_shape(self.meshes)
    }
}

/// Drives the shading kernel over a fixed-size worker pool
pub struct ShadingScheduler {
    pool: ThreadPool,
}

impl ShadingScheduler {
    /// Build a scheduler with `threads` workers (0 picks rayon's default)
    pub fn new(threads: usize) -> Result<Self, ShadingError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("lumen3d-shade-{i}"))
            .build()?;
        log::info!("shading pool ready with {} threads", pool.current_num_threads());
        Ok(Self { pool })
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Recompute every triangle's shading and publish it into `output`.
    ///
    /// Blocks until all writes are complete. Shape mismatches are reported
    /// before anything is written. Returns the number of triangles shaded.
    pub fn shade(
        &self,
        mode: ExecutionMode,
        frame: &FrameInputs<'_>,
        scratch: &mut ShadingScratch,
        output: &mut ShadingBuffers,
    ) -> Result<usize, ShadingError> {
        frame.validate(scratch, output)?;

        match mode {
            ExecutionMode::Parallel => self.shade_parallel(frame, scratch),
            ExecutionMode::Serial => shade_serial(frame, scratch),
        }

        output.publish(scratch);
        Ok(frame.triangle_count())
    }

    fn shade_parallel(&self, frame: &FrameInputs<'_>, scratch: &mut ShadingScratch) {
        let Some(rows) = scratch.par_rows_mut(frame.meshes.len()) else {
            return;
        };
        self.pool.install(|| {
            rows.zip(frame.meshes.par_iter())
                .zip(frame.transforms.par_iter())
                .for_each(|((row, mesh), transform)| {
                    shade_mesh(mesh, transform, frame.lights, &frame.config, row);
                });
        });
    }
}

fn shade_serial(frame: &FrameInputs<'_>, scratch: &mut ShadingScratch) {
    let Some(rows) = scratch.rows_mut(frame.meshes.len()) else {
        return;
    };
    for ((row, mesh), transform) in rows.zip(frame.meshes).zip(frame.transforms) {
        shade_mesh(mesh, transform, frame.lights, &frame.config, row);
    }
}

/// Shade one mesh into the front of its scratch row
#[inline]
pub fn shade_mesh(
    mesh: &Mesh,
    transform: &MeshTransform,
    lights: &[PointLight],
    config: &LightingConfig,
    row: &mut [f32],
) {
    if mesh.is_empty() {
        return;
    }

    let rotation = transform.rotation_matrix();
    for (triangle, out) in mesh.triangles().iter().zip(row.iter_mut()) {
        let world = Transform::to_world(triangle, &transform.pivot, &rotation, &transform.position);
        *out = diffuse(&face_frame(&world), lights, config);
    }
}
