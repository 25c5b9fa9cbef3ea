/// Headless frame loop around the Lumen3D shading kernel.
///
/// Stands in for the interactive viewer: each frame it moves the selected
/// object, orbits the first light, spins the meshes, and re-shades the
/// scene. Rasterization and input are left to the presenter.
use std::time::{Duration, Instant};

use log::info;
use nalgebra::{Point3, Vector3};

use lumen3d_core::{
    ExecutionMode, LightingConfig, Mesh, MeshTransform, PointLight, RotationState, Scene,
    SceneBuilder, ShadingError, ShadingScheduler,
};

pub mod cli;

/// Spacing between cubes in the demo grid
const GRID_SPACING: f32 = 3.0;
/// Radius of the first light's orbit
const LIGHT_ORBIT_RADIUS: f32 = 6.0;
/// Height of the demo lights above the floor
const LIGHT_HEIGHT: f32 = 10.0;
/// Frames the nudged object travels before turning around
const NUDGE_SWING_FRAMES: u64 = 60;

/// Per-run settings for the frame loop
#[derive(Debug, Clone)]
pub struct ViewerSettings {
    pub mode: ExecutionMode,
    pub frames: u64,
    pub move_speed: f32,
    pub select_every: u64,
    pub report_every: u64,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::Parallel,
            frames: 300,
            move_speed: 0.05,
            select_every: 60,
            report_every: 100,
        }
    }
}

/// Build the demo scene: a floor quad, a `grid x grid` field of cubes and
/// `lights` point lights overhead
pub fn demo_scene(grid: usize, lights: usize, config: LightingConfig) -> Scene {
    let mut builder = SceneBuilder::new().with_config(config);

    let extent = grid.max(1) as f32 * GRID_SPACING;
    builder.add_mesh(
        Mesh::quad(extent + GRID_SPACING),
        MeshTransform::at(Vector3::new(0.0, -1.0, 0.0)),
    );

    let offset = (grid as f32 - 1.0) * GRID_SPACING / 2.0;
    for row in 0..grid {
        for col in 0..grid {
            let position = Vector3::new(
                col as f32 * GRID_SPACING - offset,
                0.0,
                row as f32 * GRID_SPACING - offset,
            );
            let rotation = RotationState::new(0.0, 0.25 * (row + col) as f32, 0.0);
            builder.add_mesh(
                Mesh::cube(1.5),
                MeshTransform::new(position, Point3::origin(), rotation),
            );
        }
    }

    for i in 0..lights {
        let angle = i as f32 * std::f32::consts::TAU / lights as f32;
        builder.add_light(PointLight::new(
            LIGHT_ORBIT_RADIUS * angle.cos(),
            LIGHT_HEIGHT,
            LIGHT_ORBIT_RADIUS * angle.sin(),
        ));
    }

    builder.build()
}

/// Totals reported when the loop ends
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub mode: ExecutionMode,
    pub frames: u64,
    pub triangles: usize,
    pub elapsed: Duration,
    pub average_fps: f32,
}

/// Main application struct for headless rendering
pub struct ViewerApp {
    scene: Scene,
    scheduler: ShadingScheduler,
    settings: ViewerSettings,
    frame_count: u64,
    fps_samples: Vec<f32>,
    last_report: Instant,
    frames_since_report: u64,
}

impl ViewerApp {
    pub fn new(scene: Scene, scheduler: ShadingScheduler, settings: ViewerSettings) -> Self {
        Self {
            scene,
            scheduler,
            settings,
            frame_count: 0,
            fps_samples: Vec::new(),
            last_report: Instant::now(),
            frames_since_report: 0,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scheduler(&self) -> &ShadingScheduler {
        &self.scheduler
    }

    pub fn run(&mut self) -> Result<RunSummary, ShadingError> {
        info!(
            "rendering {} frames of {} meshes ({} triangles), mode {}",
            self.settings.frames,
            self.scene.mesh_count(),
            self.scene.triangle_count(),
            self.settings.mode.label()
        );

        let start = Instant::now();
        self.last_report = start;
        while self.frame_count < self.settings.frames {
            self.update()?;
            self.render()?;
            self.frame_count += 1;
            self.frames_since_report += 1;
            self.report_fps();
        }
        let elapsed = start.elapsed();

        let average_fps = if self.fps_samples.is_empty() {
            self.frame_count as f32 / elapsed.as_secs_f32().max(f32::EPSILON)
        } else {
            self.fps_samples.iter().sum::<f32>() / self.fps_samples.len() as f32
        };

        Ok(RunSummary {
            mode: self.settings.mode,
            frames: self.frame_count,
            triangles: self.scene.triangle_count(),
            elapsed,
            average_fps,
        })
    }

    fn update(&mut self) -> Result<(), ShadingError> {
        let frame = self.frame_count;

        if self.settings.select_every > 0 && frame > 0 && frame % self.settings.select_every == 0 {
            if let Some(index) = self.scene.select_next() {
                let size = self.scene.world_bounds(index)?.size();
                info!(
                    "selected object {index}, box size: {:.2} x {:.2} x {:.2}",
                    size.x, size.y, size.z
                );
            }
        }

        // Swing the selected object back and forth along X
        let direction = if (frame / NUDGE_SWING_FRAMES) % 2 == 0 { 1.0 } else { -1.0 };
        self.scene
            .nudge_selected(Vector3::new(direction * self.settings.move_speed, 0.0, 0.0));

        // Orbit the first light around the scene centre
        if !self.scene.lights().is_empty() {
            let angle = frame as f32 * 0.02;
            self.scene.set_light_position(
                0,
                Point3::new(
                    LIGHT_ORBIT_RADIUS * angle.cos(),
                    LIGHT_HEIGHT,
                    LIGHT_ORBIT_RADIUS * angle.sin(),
                ),
            )?;
        }

        // Continuous slow rotation for demo effect, floor stays put
        for index in 1..self.scene.mesh_count() {
            self.scene.transform_mut(index)?.rotation.rotate(0.0, 0.015, 0.0);
        }

        Ok(())
    }

    fn render(&mut self) -> Result<(), ShadingError> {
        self.scene.shade(&self.scheduler, self.settings.mode)?;
        Ok(())
    }

    fn report_fps(&mut self) {
        if self.settings.report_every == 0 || self.frame_count % self.settings.report_every != 0 {
            return;
        }
        let now = Instant::now();
        let window = (now - self.last_report).as_secs_f32().max(f32::EPSILON);
        let fps = self.frames_since_report as f32 / window;
        self.fps_samples.push(fps);
        info!("frame {}: {:.1} fps", self.frame_count, fps);
        self.last_report = now;
        self.frames_since_report = 0;
    }

    /// Re-shade the current state in both modes and return the largest
    /// per-triangle difference
    pub fn compare_modes(&mut self) -> Result<f32, ShadingError> {
        self.scene.shade(&self.scheduler, ExecutionMode::Parallel)?;
        let parallel: Vec<Vec<f32>> = self.scene.shading().iter().map(<[f32]>::to_vec).collect();
        self.scene.shade(&self.scheduler, ExecutionMode::Serial)?;

        let mut max_difference = 0.0f32;
        for (p, s) in parallel.iter().zip(self.scene.shading().iter()) {
            for (a, b) in p.iter().zip(s) {
                max_difference = max_difference.max((a - b).abs());
            }
        }
        Ok(max_difference)
    }
}
