use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "crt-arcade",
    author,
    version,
    about = "Arcade demo scene composited through a CRT shader"
)]
pub struct Cli {
    /// Window size in physical pixels (e.g. `960x720`).
    #[arg(
        long,
        value_name = "WIDTHxHEIGHT",
        default_value = "960x720",
        value_parser = parse_size
    )]
    pub size: (u32, u32),

    /// Optional FPS cap; by default redraws follow vsync pacing.
    #[arg(long, value_name = "FPS")]
    pub fps: Option<f32>,

    /// Run a still image through the filter instead of the animated scene.
    #[arg(long, value_name = "PATH")]
    pub image: Option<PathBuf>,
}

pub fn parse() -> Cli {
    Cli::parse()
}

fn parse_size(value: &str) -> Result<(u32, u32), String> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got `{value}`"))?;
    let width: u32 = width
        .trim()
        .parse()
        .map_err(|_| format!("invalid width in `{value}`"))?;
    let height: u32 = height
        .trim()
        .parse()
        .map_err(|_| format!("invalid height in `{value}`"))?;
    if width == 0 || height == 0 {
        return Err(format!("size must be non-zero, got `{value}`"));
    }
    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_sizes() {
        assert_eq!(parse_size("960x720"), Ok((960, 720)));
        assert_eq!(parse_size("256X256"), Ok((256, 256)));
        assert_eq!(parse_size(" 640 x 480 "), Ok((640, 480)));
    }

    #[test]
    fn rejects_malformed_sizes() {
        assert!(parse_size("960").is_err());
        assert!(parse_size("0x720").is_err());
        assert!(parse_size("960xabc").is_err());
    }
}
