/// Lumen3D Viewer - headless shading demo
///
/// Builds a grid of cubes over a floor, then runs the shading kernel once
/// per frame while the selected object moves and the first light orbits.
/// Prints a statistics summary at the end.
use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Builder, Env};

use lumen3d_core::{ExecutionMode, ShadingScheduler};
use lumen3d_viewer::cli::Cli;
use lumen3d_viewer::{demo_scene, ViewerApp, ViewerSettings};

fn main() {
    Builder::from_env(Env::default().default_filter_or("info")).init();
    if let Err(err) = run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.lighting().context("invalid lighting configuration")?;
    let mode = ExecutionMode::from(cli.mode);

    let scene = demo_scene(cli.grid, cli.lights, config);
    println!(
        "Mesh info: {} meshes, {} triangles, {} lights",
        scene.mesh_count(),
        scene.triangle_count(),
        scene.lights().len()
    );

    let scheduler = ShadingScheduler::new(cli.threads).context("failed to start shading pool")?;
    let settings = ViewerSettings {
        mode,
        frames: cli.frames,
        move_speed: cli.move_speed,
        select_every: cli.select_every,
        report_every: cli.report_every,
    };

    let mut app = ViewerApp::new(scene, scheduler, settings);
    let summary = app.run().context("frame loop failed")?;

    println!("{}", "=".repeat(60));
    println!("Final Statistics");
    println!("{}", "=".repeat(60));
    println!("  Total frames:     {}", summary.frames);
    println!("  Triangles/frame:  {}", summary.triangles);
    println!("  Total time:       {:.2}s", summary.elapsed.as_secs_f32());
    println!("  Average FPS:      {:.2}", summary.average_fps);
    println!("  Rendering mode:   {}", summary.mode.label());
    if summary.mode == ExecutionMode::Parallel {
        println!("  Worker threads:   {}", app.scheduler().threads());
    }

    if cli.compare {
        let difference = app.compare_modes().context("mode comparison failed")?;
        println!("  Max mode delta:   {difference:e}");
    }
    println!("{}", "=".repeat(60));

    Ok(())
}
