use clap::{Parser, ValueEnum};
use log::LevelFilter;
use portalpath::RenderMode;

/// Custom enum for log levels that can be used with clap's ValueEnum
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convert our custom LogLevel enum to log crate's LevelFilter
impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Light transport selectable from the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Mode {
    Unlit,
    Lit,
}

impl From<Mode> for RenderMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Unlit => RenderMode::Unlit,
            Mode::Lit => RenderMode::Lit,
        }
    }
}

/// Command line arguments structure using clap derive macros
#[derive(Parser)]
#[command(name = "portalpath")]
#[command(about = "Progressive path tracer for portal-linked planes")]
pub struct Args {
    /// Set the logging level (defaults to "info")
    #[arg(long, default_value = "info", help = "Set the logging level")]
    pub debug_level: LogLevel,

    /// Scene description (JSON); the built-in default scene when omitted
    #[arg(long, help = "Scene description file (JSON)")]
    pub scene: Option<String>,

    /// Image width in pixels
    #[arg(long, default_value = "800", help = "Image width in pixels")]
    pub width: u32,

    /// Image height in pixels
    #[arg(long, default_value = "600", help = "Image height in pixels")]
    pub height: u32,

    /// Number of progressive frames to accumulate
    #[arg(long, short = 'f', default_value = "64", help = "Number of progressive frames to accumulate")]
    pub frames: u32,

    /// Number of samples per pixel in each frame
    #[arg(long, short = 's', default_value = "1", help = "Number of samples per pixel in each frame")]
    pub samples_per_pixel: u32,

    /// Light transport mode (overrides the scene's setting)
    #[arg(long, value_enum, help = "Light transport mode (overrides the scene's setting)")]
    pub mode: Option<Mode>,

    /// Sample pixel centres only
    #[arg(long, help = "Disable antialiasing jitter")]
    pub no_antialiasing: bool,

    /// Path length limit for lit rendering (overrides the scene's setting)
    #[arg(long, help = "Maximum bounces in lit mode (overrides the scene's setting)")]
    pub max_bounces: Option<u32>,

    /// Portal crossings per ray segment (overrides the scene's setting)
    #[arg(long, help = "Maximum portal traversals per ray segment (overrides the scene's setting)")]
    pub max_portal_traversals: Option<u32>,

    /// Seed for reproducible renders
    #[arg(long, help = "Seed for reproducible renders (random when omitted)")]
    pub seed: Option<u64>,

    /// Send image to TEV for real-time visualization
    #[arg(long, help = "Send image to TEV after every frame")]
    pub tev: bool,

    /// TEV client IP address and port (automatically enables --tev)
    #[arg(long, help = "TEV client IP address and port (automatically enables --tev)")]
    pub tev_address: Option<String>,

    /// Output file path (.png for 8-bit with gamma correction, .exr for HDR linear)
    #[arg(short, long, default_value = "output.png", help = "Output file path (.png for 8-bit with gamma correction, .exr for HDR linear)")]
    pub output: String,
}
