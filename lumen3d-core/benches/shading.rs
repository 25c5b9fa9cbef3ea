/// Benchmarks for the per-frame shading kernel in both execution modes
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lumen3d_core::{
    ExecutionMode, LightingConfig, Mesh, MeshTransform, PointLight, RotationState, Scene,
    SceneBuilder, ShadingScheduler,
};
use nalgebra::{Point3, Vector3};

/// A `side x side` grid of cubes with a few lights overhead
fn cube_grid(side: usize, lights: usize) -> Scene {
    let mut builder = SceneBuilder::new().with_config(LightingConfig::default());
    for row in 0..side {
        for col in 0..side {
            let position = Vector3::new(col as f32 * 3.0, 0.0, row as f32 * 3.0);
            let rotation = RotationState::new(0.1 * row as f32, 0.2 * col as f32, 0.0);
            builder.add_mesh(
                Mesh::cube(2.0),
                MeshTransform::new(position, Point3::origin(), rotation),
            );
        }
    }
    for i in 0..lights {
        builder.add_light(PointLight::new(i as f32 * 4.0, 10.0, i as f32 * 2.0));
    }
    builder.build()
}

fn bench_shading_modes(c: &mut Criterion) {
    let mut group = c.benchmark_group("shade_frame");
    let scheduler = ShadingScheduler::new(0).expect("thread pool");

    for &side in &[4, 16, 48] {
        for mode in [ExecutionMode::Parallel, ExecutionMode::Serial] {
            let mut scene = cube_grid(side, 3);
            let name = match mode {
                ExecutionMode::Parallel => "parallel",
                ExecutionMode::Serial => "serial",
            };
            group.bench_with_input(BenchmarkId::new(name, side * side), &side, |b, _| {
                b.iter(|| black_box(scene.shade(&scheduler, mode).expect("kernel run")));
            });
        }
    }
    group.finish();
}

fn bench_light_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("shade_lights");
    let scheduler = ShadingScheduler::new(0).expect("thread pool");

    for &lights in &[0, 1, 8, 32] {
        let mut scene = cube_grid(16, lights);
        group.bench_with_input(BenchmarkId::from_parameter(lights), &lights, |b, _| {
            b.iter(|| {
                black_box(
                    scene
                        .shade(&scheduler, ExecutionMode::Parallel)
                        .expect("kernel run"),
                )
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_shading_modes, bench_light_count);
criterion_main!(benches);
