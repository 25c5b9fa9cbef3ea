/// Rotation composition and local-to-world vertex transforms
use nalgebra::{Matrix3, Point3, Rotation3, Vector3};

use crate::geometry::{Aabb, Triangle};

/// Rotation state around three axes (in radians)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationState {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

/// Per-mesh placement in the world.
///
/// Vertices rotate about `pivot` (local space) and are then offset by
/// `position`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshTransform {
    pub position: Vector3<f32>,
    pub pivot: Point3<f32>,
    pub rotation: RotationState,
}

impl MeshTransform {
    pub fn new(position: Vector3<f32>, pivot: Point3<f32>, rotation: RotationState) -> Self {
        Self {
            position,
            pivot,
            rotation,
        }
    }

    pub fn at(position: Vector3<f32>) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn is_finite(&self) -> bool {
        self.position.iter().all(|c| c.is_finite())
            && self.pivot.iter().all(|c| c.is_finite())
            && self.rotation.is_finite()
    }

    pub fn rotation_matrix(&self) -> Matrix3<f32> {
        Transform::rotation_matrix(&self.rotation)
    }
}

impl Default for MeshTransform {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            pivot: Point3::origin(),
            rotation: RotationState::zero(),
        }
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Create a rotation matrix from a rotation state
    pub fn rotation_matrix(rotation: &RotationState) -> Matrix3<f32> {
        let rx = Rotation3::from_axis_angle(&Vector3::x_axis(), rotation.x);
        let ry = Rotation3::from_axis_angle(&Vector3::y_axis(), rotation.y);
        let rz = Rotation3::from_axis_angle(&Vector3::z_axis(), rotation.z);

        // Apply rotations in order: Z, Y, X
        (rz * ry * rx).into_inner()
    }

    /// Map one local-space vertex into world space
    #[inline]
    pub fn point_to_world(
        point: &Point3<f32>,
        pivot: &Point3<f32>,
        rotation: &Matrix3<f32>,
        position: &Vector3<f32>,
    ) -> Point3<f32> {
        *pivot + rotation * (*point - *pivot) + *position
    }

    /// Map a local-space triangle into world space.
    ///
    /// Row-vector form: `(v - pivot) * R^T + pivot + position`.
    #[inline]
    pub fn to_world(
        triangle: &Triangle,
        pivot: &Point3<f32>,
        rotation: &Matrix3<f32>,
        position: &Vector3<f32>,
    ) -> [Point3<f32>; 3] {
        let [v0, v1, v2] = &triangle.vertices;
        [
            Self::point_to_world(v0, pivot, rotation, position),
            Self::point_to_world(v1, pivot, rotation, position),
            Self::point_to_world(v2, pivot, rotation, position),
        ]
    }

    /// World-space box enclosing a local box under a mesh transform
    pub fn bounds_to_world(bounds: &Aabb, transform: &MeshTransform) -> Aabb {
        if bounds.is_empty() {
            return *bounds;
        }
        let rotation = transform.rotation_matrix();
        let mut world = Aabb::empty();
        for corner in &bounds.corners() {
            world.extend(&Self::point_to_world(
                corner,
                &transform.pivot,
                &rotation,
                &transform.position,
            ));
        }
        world
    }
}
