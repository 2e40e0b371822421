use std::path::PathBuf;

use clap::{ Parser, ValueEnum };
use log::LevelFilter;

use crate::consts::{ CANVAS_WIDTH, CANVAS_HEIGHT, OUT_FILE };

#[derive(Copy, Clone, Debug, PartialEq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

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

/// Command line arguments.
#[derive(Parser, Debug)]
#[clap(name = "kite-tracer", version)]
#[clap(about = "Renders kite meshes and procedural surfaces to a PNG")]
pub struct Args {
    /// Scene description (JSON). The built-in demo scene is used if omitted.
    #[clap(short, long)]
    pub scene: Option<PathBuf>,

    /// Image width in pixels
    #[clap(long, default_value_t = CANVAS_WIDTH)]
    pub width: u32,

    /// Image height in pixels
    #[clap(long, default_value_t = CANVAS_HEIGHT)]
    pub height: u32,

    /// Output PNG path
    #[clap(short, long, default_value = OUT_FILE)]
    pub output: PathBuf,

    /// Image texture for the demo scene's parallelepiped
    #[clap(short, long)]
    pub texture: Option<PathBuf>,

    /// Set the logging level
    #[clap(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

#[test]
fn default_arguments() {
    let args = Args::parse_from(["kite-tracer"]);

    assert_eq!(args.scene, None);
    assert_eq!((args.width, args.height), (CANVAS_WIDTH, CANVAS_HEIGHT));
    assert_eq!(args.output, PathBuf::from(OUT_FILE));
    assert_eq!(args.log_level, LogLevel::Info);
}

#[test]
fn parse_all_arguments() {
    let args = Args::parse_from([
        "kite-tracer",
        "--scene", "scenes/demo.json",
        "--width", "64",
        "--height", "48",
        "--output", "small.png",
        "--texture", "brick.png",
        "--log-level", "debug",
    ]);

    assert_eq!(args.scene, Some(PathBuf::from("scenes/demo.json")));
    assert_eq!((args.width, args.height), (64, 48));
    assert_eq!(args.output, PathBuf::from("small.png"));
    assert_eq!(args.texture, Some(PathBuf::from("brick.png")));
    assert_eq!(LevelFilter::from(args.log_level), LevelFilter::Debug);
}
