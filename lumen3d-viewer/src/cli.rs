// cli.rs - Command-line interface configuration
use clap::{Parser, ValueEnum};
use lumen3d_core::{ExecutionMode, LightingConfig, ShadingError};

#[derive(Parser, Debug, Clone)]
#[command(name = "lumen3d-viewer")]
#[command(about = "Headless CPU scene viewer driving the Lumen3D shading kernel", long_about = None)]
pub struct Cli {
    /// Number of frames to render before exiting
    #[arg(long, default_value_t = 300)]
    pub frames: u64,

    /// Shading execution strategy
    #[arg(long, value_enum, default_value_t = ModeArg::Parallel)]
    pub mode: ModeArg,

    /// Worker threads for parallel shading (0 = one per core)
    #[arg(long, default_value_t = 0)]
    pub threads: usize,

    /// Baseline shading applied to every face
    #[arg(long, default_value_t = 0.1, allow_negative_numbers = true)]
    pub ambient: f32,

    /// Scale applied to the summed diffuse term
    #[arg(long, default_value_t = 0.9, allow_negative_numbers = true)]
    pub intensity: f32,

    /// Cubes per side of the demo grid
    #[arg(long, default_value_t = 8)]
    pub grid: usize,

    /// Number of point lights in the demo scene
    #[arg(long, default_value_t = 1)]
    pub lights: usize,

    /// Distance the selected object moves per frame
    #[arg(long, default_value_t = 0.05)]
    pub move_speed: f32,

    /// Frames between selection changes (0 keeps the first object)
    #[arg(long, default_value_t = 60)]
    pub select_every: u64,

    /// Frames between FPS reports
    #[arg(long, default_value_t = 100)]
    pub report_every: u64,

    /// Re-shade the last frame in the other mode and report the largest difference
    #[arg(long)]
    pub compare: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    Parallel,
    Serial,
}

impl From<ModeArg> for ExecutionMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Parallel => ExecutionMode::Parallel,
            ModeArg::Serial => ExecutionMode::Serial,
        }
    }
}

impl Cli {
    pub fn lighting(&self) -> Result<LightingConfig, ShadingError> {
        LightingConfig::new(self.ambient, self.intensity)
    }
}
