//! AR face filter application for webcams and image directories.

use anyhow::{bail, Context, Result};
use ar_face_filters::{app::ArApp, config::Config};
use clap::Parser;
use log::info;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Camera index to use
    #[arg(long)]
    cam: Option<i32>,

    /// Capture resolution, e.g. 1280x720
    #[arg(short, long, value_parser = parse_resolution)]
    resolution: Option<(u32, u32)>,

    /// Read frames from a directory of images instead of the camera
    #[arg(short, long)]
    input_dir: Option<PathBuf>,

    /// Write processed frames as PNG files instead of opening a window
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    /// Print the example configuration and exit
    #[arg(long)]
    print_config: bool,
}

fn parse_resolution(value: &str) -> std::result::Result<(u32, u32), String> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{value}'"))?;
    let width: u32 = width.trim().parse().map_err(|e| format!("invalid width: {e}"))?;
    let height: u32 = height.trim().parse().map_err(|e| format!("invalid height: {e}"))?;
    if width == 0 || height == 0 {
        return Err(format!("resolution must be positive, got '{value}'"));
    }
    Ok((width, height))
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.print_config {
        print!("{}", ar_face_filters::config::EXAMPLE_CONFIG);
        return Ok(());
    }

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    info!("AR Face Filters");

    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            Config::from_file(path).with_context(|| format!("loading {}", path.display()))?
        }
        None => Config::example()?,
    };

    // Command line overrides
    if let Some(cam) = args.cam {
        config.source.camera = cam;
    }
    if args.resolution.is_some() {
        config.source.resolution = args.resolution;
    }
    if args.input_dir.is_some() {
        config.source.input_dir = args.input_dir;
    }
    if args.output_dir.is_some() {
        config.source.output_dir = args.output_dir;
    }

    if config.filters.is_empty() {
        bail!("No filters configured");
    }

    let mut app = ArApp::from_config(&config)?;
    let frames = app.run()?;
    info!("Processed {frames} frames");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resolution() {
        assert_eq!(parse_resolution("1280x720"), Ok((1280, 720)));
        assert_eq!(parse_resolution("640X480"), Ok((640, 480)));
        assert!(parse_resolution("640").is_err());
        assert!(parse_resolution("0x480").is_err());
        assert!(parse_resolution("axb").is_err());
    }

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from(["ar-face-filters", "--cam", "1", "-r", "320x240", "--debug"]);
        assert_eq!(args.cam, Some(1));
        assert_eq!(args.resolution, Some((320, 240)));
        assert!(args.debug);
        assert!(!args.print_config);
    }
}
