/// Integration tests for the per-frame shading kernel.
/// Each test builds a small scene, runs the kernel through the public API
/// and checks the published per-triangle shading.
use approx::assert_relative_eq;
use lumen3d_core::*;
use nalgebra::{Point3, Vector3};

const TOLERANCE: f32 = 1e-5;

/// A spread of rotated, offset meshes with a few lights scattered around
fn busy_scene(config: LightingConfig) -> Scene {
    let mut builder = SceneBuilder::new().with_config(config);
    for i in 0..24 {
        let t = i as f32;
        let mesh = match i % 3 {
            0 => Mesh::cube(1.0 + 0.1 * t),
            1 => Mesh::quad(2.0),
            _ => Mesh::new(),
        };
        let transform = MeshTransform::new(
            Vector3::new((t * 1.7).sin() * 8.0, (t * 0.3).cos() * 2.0, (t * 2.3).cos() * 8.0),
            Point3::new(0.1 * t, 0.0, -0.05 * t),
            RotationState::new(t * 0.4, t * -0.7, t * 1.3),
        );
        builder.add_mesh(mesh, transform);
    }
    builder.add_light(PointLight::new(0.0, 10.0, 0.0));
    builder.add_light(PointLight::new(-6.0, 1.0, 4.0));
    builder.add_light(PointLight::new(5.0, -3.0, -5.0));
    builder.build()
}

/// One upward-facing triangle centred on the origin
fn single_triangle(light: Option<PointLight>) -> Scene {
    let mut builder = SceneBuilder::new().with_config(LightingConfig::new(0.1, 0.9).unwrap());
    builder.add_mesh(
        Mesh::from_triangles(vec![Triangle::from_coords(
            [-1.0, 0.0, -1.0],
            [0.0, 0.0, 2.0],
            [1.0, 0.0, -1.0],
        )]),
        MeshTransform::default(),
    );
    if let Some(light) = light {
        builder.add_light(light);
    }
    builder.build()
}

fn shade_once(scene: &mut Scene, mode: ExecutionMode) -> Vec<Vec<f32>> {
    let scheduler = ShadingScheduler::new(4).expect("thread pool");
    scene.shade(&scheduler, mode).expect("kernel run");
    scene.shading().iter().map(<[f32]>::to_vec).collect()
}

#[test]
fn shading_stays_in_unit_range() {
    // Large intensity to push sums well past 1
    let mut scene = busy_scene(LightingConfig::new(0.05, 5.0).unwrap());
    for buffer in shade_once(&mut scene, ExecutionMode::Parallel) {
        for value in buffer {
            assert!((0.0..=1.0).contains(&value), "shading {value} out of range");
        }
    }
}

#[test]
fn parallel_and_serial_agree() {
    let mut scene = busy_scene(LightingConfig::default());
    let parallel = shade_once(&mut scene, ExecutionMode::Parallel);
    let serial = shade_once(&mut scene, ExecutionMode::Serial);

    assert_eq!(parallel.len(), serial.len());
    for (mesh, (p, s)) in parallel.iter().zip(&serial).enumerate() {
        assert_eq!(p.len(), scene.meshes()[mesh].triangle_count());
        assert_eq!(p.len(), s.len());
        for (a, b) in p.iter().zip(s) {
            assert!((a - b).abs() < TOLERANCE, "mesh {mesh}: {a} vs {b}");
        }
    }
}

#[test]
fn repeated_runs_are_identical() {
    let mut scene = busy_scene(LightingConfig::default());
    let first = shade_once(&mut scene, ExecutionMode::Parallel);
    let second = shade_once(&mut scene, ExecutionMode::Parallel);
    assert_eq!(first, second);
}

#[test]
fn moving_a_mesh_back_restores_its_shading() {
    let mut scene = busy_scene(LightingConfig::default());
    let before = shade_once(&mut scene, ExecutionMode::Serial);

    scene.select(3).unwrap();
    scene.nudge_selected(Vector3::new(0.0, 50.0, 0.0));
    let moved = shade_once(&mut scene, ExecutionMode::Serial);
    assert_ne!(before[3], moved[3]);
    assert_eq!(before[0], moved[0]);

    scene.nudge_selected(Vector3::new(0.0, -50.0, 0.0));
    let after = shade_once(&mut scene, ExecutionMode::Serial);
    for (a, b) in before[3].iter().zip(&after[3]) {
        assert_relative_eq!(*a, *b, epsilon = TOLERANCE);
    }
}

#[test]
fn no_lights_gives_exact_ambient() {
    let config = LightingConfig::new(0.25, 0.9).unwrap();
    let mut builder = SceneBuilder::new().with_config(config);
    builder.add_mesh(Mesh::cube(2.0), MeshTransform::default());
    builder.add_mesh(Mesh::quad(1.0), MeshTransform::at(Vector3::new(0.0, 3.0, 0.0)));
    let mut scene = builder.build();

    for mode in [ExecutionMode::Parallel, ExecutionMode::Serial] {
        for buffer in shade_once(&mut scene, mode) {
            assert!(buffer.iter().all(|&v| v == 0.25));
        }
    }
}

#[test]
fn degenerate_triangle_is_finite() {
    let mut builder = SceneBuilder::new();
    builder.add_mesh(
        Mesh::from_triangles(vec![Triangle::from_coords(
            [1.0, 2.0, 3.0],
            [1.0, 2.0, 3.0],
            [1.0, 2.0, 3.0],
        )]),
        MeshTransform::default(),
    );
    builder.add_light(PointLight::new(1.0, 12.0, 3.0));
    let mut scene = builder.build();

    let shading = shade_once(&mut scene, ExecutionMode::Serial);
    let value = shading[0][0];
    assert!(value.is_finite());
    assert!((0.0..=1.0).contains(&value));
    // World-up fallback faces the light straight on
    assert_relative_eq!(value, 1.0, epsilon = TOLERANCE);
}

#[test]
fn light_behind_face_contributes_nothing() {
    let mut scene = single_triangle(Some(PointLight::new(0.0, -10.0, 0.0)));
    let shading = shade_once(&mut scene, ExecutionMode::Parallel);
    assert_eq!(shading[0][0], 0.1);
}

#[test]
fn light_on_centroid_is_guarded() {
    let mut scene = single_triangle(None);
    // Centroid of the single triangle is the origin
    scene.add_light(PointLight::new(0.0, 0.0, 0.0));
    let shading = shade_once(&mut scene, ExecutionMode::Serial);
    let value = shading[0][0];
    assert!(value.is_finite());
    assert!((0.1..=1.0).contains(&value));
}

#[test]
fn light_straight_above_saturates() {
    let mut scene = single_triangle(Some(PointLight::new(0.0, 10.0, 0.0)));
    let shading = shade_once(&mut scene, ExecutionMode::Parallel);
    assert_relative_eq!(shading[0][0], 1.0, epsilon = TOLERANCE);
}

#[test]
fn rotating_face_away_from_light_drops_to_ambient() {
    let mut scene = single_triangle(Some(PointLight::new(0.0, 10.0, 0.0)));
    let mut flipped = *scene.transform(0).unwrap();
    flipped.rotation = RotationState::new(std::f32::consts::PI, 0.0, 0.0);
    scene.set_mesh_transform(0, flipped).unwrap();

    let shading = shade_once(&mut scene, ExecutionMode::Serial);
    assert_eq!(shading[0][0], 0.1);
}

#[test]
fn non_finite_transform_shades_as_ambient() {
    let mut scene = single_triangle(Some(PointLight::new(0.0, 10.0, 0.0)));
    let broken = MeshTransform::at(Vector3::new(f32::NAN, 0.0, 0.0));
    scene.set_mesh_transform(0, broken).unwrap();

    let shading = shade_once(&mut scene, ExecutionMode::Parallel);
    assert_eq!(shading[0][0], 0.1);
}

#[test]
fn undersized_buffers_are_rejected() {
    let meshes = vec![Mesh::cube(1.0), Mesh::quad(1.0)];
    let transforms = vec![MeshTransform::default(); 2];
    let frame = FrameInputs {
        meshes: &meshes,
        transforms: &transforms,
        lights: &[],
        config: LightingConfig::default(),
    };
    let scheduler = ShadingScheduler::new(1).unwrap();

    let mut small = ShadingScratch::new(2, 4);
    let mut output = ShadingBuffers::for_meshes(&meshes);
    assert!(matches!(
        scheduler.shade(ExecutionMode::Parallel, &frame, &mut small, &mut output),
        Err(ShadingError::ScratchTooSmall { .. })
    ));

    let mut scratch = ShadingScratch::for_meshes(&meshes);
    let mut wrong_shape = ShadingBuffers::for_meshes(&meshes[..1]);
    assert!(matches!(
        scheduler.shade(ExecutionMode::Serial, &frame, &mut scratch, &mut wrong_shape),
        Err(ShadingError::OutputMeshCountMismatch { expected: 2, actual: 1 })
    ));
}

#[test]
fn rejected_config_never_reaches_the_scene() {
    assert!(matches!(
        LightingConfig::new(-0.5, 0.0),
        Err(ShadingError::InvalidConfig { name: "ambient", .. })
    ));
    assert!(LightingConfig::new(f32::NAN, 0.9).is_err());

    // The last accepted config stays in effect
    let mut scene = single_triangle(None);
    scene.set_config(LightingConfig::new(0.0, 0.0).unwrap());
    let shading = shade_once(&mut scene, ExecutionMode::Serial);
    assert_eq!(shading[0][0], 0.0);
    assert_eq!(scene.config().ambient(), 0.0);
}
