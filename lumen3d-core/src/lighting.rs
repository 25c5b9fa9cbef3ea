/// Face normals and ambient + diffuse point-light shading
use nalgebra::{Point3, Vector3};

use crate::error::ShadingError;

/// Cross products no longer than this are treated as degenerate faces
pub const NORMAL_EPSILON: f32 = 1e-9;

/// Added to light distances so a light sitting on a centroid stays finite
pub const DISTANCE_EPSILON: f32 = 1e-9;

/// Normal used for faces with no usable area
pub const WORLD_UP: Vector3<f32> = Vector3::new(0.0, 1.0, 0.0);

/// A point light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Point3<f32>,
}

impl PointLight {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Point3::new(x, y, z),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.position.iter().all(|c| c.is_finite())
    }
}

/// Lighting tunables passed to every kernel call.
///
/// Values are only set through [`LightingConfig::new`], so a config that
/// reaches the kernel is always finite and non-negative:
///
/// ```compile_fail
/// let config = lumen3d_core::LightingConfig { ambient: -0.5, intensity: 0.0 };
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingConfig {
    ambient: f32,
    intensity: f32,
}

impl LightingConfig {
    pub fn new(ambient: f32, intensity: f32) -> Result<Self, ShadingError> {
        for (name, value) in [("ambient", ambient), ("intensity", intensity)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ShadingError::InvalidConfig { name, value });
            }
        }
        Ok(Self { ambient, intensity })
    }

    /// Baseline shading applied to every face
    pub fn ambient(&self) -> f32 {
        self.ambient
    }

    /// Scale applied to the summed diffuse term
    pub fn intensity(&self) -> f32 {
        self.intensity
    }
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            ambient: 0.1,
            intensity: 0.9,
        }
    }
}

/// Centroid and unit normal of a world-space triangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceFrame {
    pub centroid: Point3<f32>,
    pub normal: Vector3<f32>,
}

/// Extract centroid and face normal, falling back to [`WORLD_UP`] for
/// degenerate (or non-finite) faces.
#[inline]
pub fn face_frame(vertices: &[Point3<f32>; 3]) -> FaceFrame {
    let [v0, v1, v2] = vertices;
    let centroid = Point3::from((v0.coords + v1.coords + v2.coords) / 3.0);

    let cross = (v1 - v0).cross(&(v2 - v0));
    let length = cross.norm();
    let normal = if length > NORMAL_EPSILON {
        cross / length
    } else {
        WORLD_UP
    };

    FaceFrame { centroid, normal }
}

/// Sum the forward-facing light contributions for one face and map them to
/// a shading value in `[ambient, 1]`.
#[inline]
pub fn diffuse(face: &FaceFrame, lights: &[PointLight], config: &LightingConfig) -> f32 {
    let mut sum = 0.0f32;
    for light in lights {
        let to_light = light.position - face.centroid;
        let distance = to_light.norm() + DISTANCE_EPSILON;
        let dot = face.normal.dot(&(to_light / distance));
        if dot > 0.0 {
            sum += dot;
        }
    }
    (config.ambient + sum * config.intensity).min(1.0)
}
