/// Geometry primitives for the shading kernel
use nalgebra::{Point3, Vector3};

/// A triangle face defined by three local-space vertices
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [Point3<f32>; 3],
}

impl Triangle {
    pub fn new(v0: Point3<f32>, v1: Point3<f32>, v2: Point3<f32>) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Convenience constructor from raw coordinate triples
    pub fn from_coords(v0: [f32; 3], v1: [f32; 3], v2: [f32; 3]) -> Self {
        Self::new(Point3::from(v0), Point3::from(v1), Point3::from(v2))
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Aabb {
    pub fn new(min: Point3<f32>, max: Point3<f32>) -> Self {
        Self { min, max }
    }

    /// An inverted box that any `extend` call will replace
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
            max: Point3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
        }
    }

    pub fn from_points<'a, I>(points: I) -> Self
    where
        I: IntoIterator<Item = &'a Point3<f32>>,
    {
        let mut aabb = Self::empty();
        for point in points {
            aabb.extend(point);
        }
        aabb
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn extend(&mut self, point: &Point3<f32>) {
        self.min = self.min.inf(point);
        self.max = self.max.sup(point);
    }

    /// Width, height and depth of the box (zero for an empty box)
    pub fn size(&self) -> Vector3<f32> {
        if self.is_empty() {
            return Vector3::zeros();
        }
        self.max - self.min
    }

    pub fn center(&self) -> Point3<f32> {
        nalgebra::center(&self.min, &self.max)
    }

    /// The eight corners, min corner first
    pub fn corners(&self) -> [Point3<f32>; 8] {
        let (min, max) = (self.min, self.max);
        [
            Point3::new(min.x, min.y, min.z),
            Point3::new(max.x, min.y, min.z),
            Point3::new(min.x, max.y, min.z),
            Point3::new(max.x, max.y, min.z),
            Point3::new(min.x, min.y, max.z),
            Point3::new(max.x, min.y, max.z),
            Point3::new(min.x, max.y, max.z),
            Point3::new(max.x, max.y, max.z),
        ]
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

/// A 3D mesh composed of triangles.
///
/// Triangle order is the mesh's identity for picking and for the published
/// shading buffer, so triangles can only be appended.
#[derive(Debug, Clone)]
pub struct Mesh {
    triangles: Vec<Triangle>,
    bounds: Aabb,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
            bounds: Aabb::empty(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
            bounds: Aabb::empty(),
        }
    }

    pub fn from_triangles(triangles: Vec<Triangle>) -> Self {
        let bounds = Aabb::from_points(triangles.iter().flat_map(|t| t.vertices.iter()));
        Self { triangles, bounds }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        for vertex in &triangle.vertices {
            self.bounds.extend(vertex);
        }
        self.triangles.push(triangle);
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Local-space bounding box
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// A single upward-facing quad in the XZ plane, centred on the origin
    pub fn quad(size: f32) -> Self {
        let half = size / 2.0;
        Self::from_triangles(vec![
            Triangle::from_coords([-half, 0.0, -half], [-half, 0.0, half], [half, 0.0, half]),
            Triangle::from_coords([-half, 0.0, -half], [half, 0.0, half], [half, 0.0, -half]),
        ])
    }

    /// An axis-aligned cube centred on the origin, wound counter-clockwise
    /// when seen from outside
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;
        let mut mesh = Self::with_capacity(12);

        // Front face (+Z)
        mesh.add_triangle(Triangle::from_coords([-h, -h, h], [h, -h, h], [h, h, h]));
        mesh.add_triangle(Triangle::from_coords([-h, -h, h], [h, h, h], [-h, h, h]));

        // Back face (-Z)
        mesh.add_triangle(Triangle::from_coords([-h, -h, -h], [-h, h, -h], [h, h, -h]));
        mesh.add_triangle(Triangle::from_coords([-h, -h, -h], [h, h, -h], [h, -h, -h]));

        // Top face (+Y)
        mesh.add_triangle(Triangle::from_coords([-h, h, -h], [-h, h, h], [h, h, h]));
        mesh.add_triangle(Triangle::from_coords([-h, h, -h], [h, h, h], [h, h, -h]));

        // Bottom face (-Y)
        mesh.add_triangle(Triangle::from_coords([-h, -h, -h], [h, -h, -h], [h, -h, h]));
        mesh.add_triangle(Triangle::from_coords([-h, -h, -h], [h, -h, h], [-h, -h, h]));

        // Right face (+X)
        mesh.add_triangle(Triangle::from_coords([h, -h, -h], [h, h, -h], [h, h, h]));
        mesh.add_triangle(Triangle::from_coords([h, -h, -h], [h, h, h], [h, -h, h]));

        // Left face (-X)
        mesh.add_triangle(Triangle::from_coords([-h, -h, -h], [-h, -h, h], [-h, h, h]));
        mesh.add_triangle(Triangle::from_coords([-h, -h, -h], [-h, h, h], [-h, h, -h]));

        mesh
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}
