//! Command lines of the programs and the bits they share

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, ValueEnum};
use image::Rgb;
use log::info;
use simplelog::{Config, LevelFilter, SimpleLogger};

use crate::color::Saturation;
use crate::eeprom::EpdType;
use crate::linux::HardwareConfig;
use crate::transform::{self, Pipeline};

/// Flags every program takes
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Print debug messages
    #[arg(short, long)]
    pub verbose: bool,

    #[command(flatten)]
    pub hardware: HardwareConfig,
}

/// Side of the display the buttons are on
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Orientation {
    ButtonsLeft,
    ButtonsUp,
    ButtonsRight,
    ButtonsDown,
}

impl Orientation {
    /// Counter-clockwise rotation that puts the picture upright
    pub fn degrees(self) -> f32 {
        match self {
            Orientation::ButtonsLeft => 0.0,
            Orientation::ButtonsUp => 90.0,
            Orientation::ButtonsRight => 180.0,
            Orientation::ButtonsDown => 270.0,
        }
    }
}

/// Optional preparation before the image is scaled to the panel
#[derive(Debug, Clone, Default, Args)]
pub struct PrepareArgs {
    /// Rotate counter-clockwise by this many degrees
    #[arg(long, allow_negative_numbers = true, value_parser = parse_degrees)]
    pub rotate: Option<f32>,

    /// Rotate to match how the display is mounted
    #[arg(long, value_enum, conflicts_with = "rotate")]
    pub orientation: Option<Orientation>,

    /// Remove this many pixels from every side
    #[arg(long)]
    pub crop: Option<u32>,
}

impl PrepareArgs {
    /// Pipeline with the requested rotation and crop, in that order
    pub fn pipeline(&self) -> Pipeline {
        let mut pipeline = Pipeline::new();
        let degrees = self.orientation.map(Orientation::degrees).or(self.rotate);
        if let Some(degrees) = degrees {
            pipeline = pipeline.rotate(degrees);
        }
        if let Some(border) = self.crop {
            pipeline = pipeline.crop(border);
        }
        pipeline
    }
}

/// Rotate an image, stretch it to the panel and show it
#[derive(Debug, Parser)]
#[command(name = "inky-image", version, about)]
pub struct ImageArgs {
    /// Image file to show
    pub image: PathBuf,

    /// Counter-clockwise rotation in degrees
    #[arg(default_value_t = 0.0, allow_negative_numbers = true, value_parser = parse_degrees)]
    pub rotation: f32,

    /// Colour saturation, 0.0 to 1.0 [default: 0.5]
    #[arg(allow_negative_numbers = true)]
    pub saturation: Option<f32>,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl ImageArgs {
    pub fn pipeline(&self) -> Pipeline {
        Pipeline::new().rotate(self.rotation)
    }
}

/// Scale an image until it covers the whole panel and show it
#[derive(Debug, Parser)]
#[command(name = "inky-fit", version, about)]
pub struct FitArgs {
    /// Image file to show
    pub image: PathBuf,

    /// Colour saturation, 0.0 to 1.0 [default: 0.5]
    #[arg(allow_negative_numbers = true)]
    pub saturation: Option<f32>,

    #[command(flatten)]
    pub prepare: PrepareArgs,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl FitArgs {
    pub fn pipeline(&self) -> Pipeline {
        self.prepare.pipeline().fit()
    }
}

/// Show a whole image on the panel, padding the rest
#[derive(Debug, Parser)]
#[command(name = "inky-pad", version, about)]
pub struct PadArgs {
    /// Image file to show
    pub image: PathBuf,

    /// Colour saturation, 0.0 to 1.0 [default: 0.5]
    #[arg(allow_negative_numbers = true)]
    pub saturation: Option<f32>,

    /// Padding colour, RRGGBB or white/black
    #[arg(long, default_value = "white", value_parser = parse_rgb)]
    pub color: Rgb<u8>,

    #[command(flatten)]
    pub prepare: PrepareArgs,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl PadArgs {
    pub fn pipeline(&self) -> Pipeline {
        self.prepare.pipeline().pad(self.color)
    }
}

/// Print what the display EEPROM says about the attached board
#[derive(Debug, Parser)]
#[command(name = "inky-identify", version, about)]
pub struct IdentifyArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

/// Drive every pixel to the clean colour to get rid of ghosting
#[derive(Debug, Parser)]
#[command(name = "inky-clean", version, about)]
pub struct CleanArgs {
    /// Number of clean refreshes
    #[arg(long, default_value_t = 2)]
    pub cycles: u32,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Draw one vertical stripe per panel colour
#[derive(Debug, Parser)]
#[command(name = "inky-palette", version, about)]
pub struct PaletteArgs {
    /// Colour saturation, 0.0 to 1.0. Without it the panel colours are
    /// drawn directly, with it the blended palette goes through dithering
    #[arg(allow_negative_numbers = true)]
    pub saturation: Option<f32>,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Log to the terminal, `verbose` adds the debug messages
pub fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    SimpleLogger::init(level, Config::default()).context("setting up logging")
}

/// Saturation from an optional command line value
pub fn saturation(value: Option<f32>) -> Result<Saturation> {
    match value {
        Some(value) => Saturation::new(value).context("bad saturation"),
        None => Ok(Saturation::default()),
    }
}

/// Load `path`, run it through `pipeline` and put it on the attached panel.
///
/// The panel is sent to deep sleep afterwards.
pub fn show_file(
    hardware: &HardwareConfig,
    path: &Path,
    pipeline: &Pipeline,
    saturation: Saturation,
) -> Result<()> {
    let image =
        transform::open(path).with_context(|| format!("loading {}", path.display()))?;

    let mut inky = hardware.auto()?;
    let image = pipeline.apply(image, inky.resolution())?;
    inky.set_image(&image, saturation)?;
    inky.show().context("refreshing the display")?;
    inky.sleep()?;
    info!("done");
    Ok(())
}

/// Print the EEPROM record, returns whether there was one
pub fn report_eeprom<W: Write>(eeprom: Option<&EpdType>, out: &mut W) -> io::Result<bool> {
    match eeprom {
        Some(epd) => {
            writeln!(
                out,
                "Found: {}",
                epd.variant_name().unwrap_or("unknown display variant")
            )?;
            writeln!(out, "{}", epd)?;
            Ok(true)
        }
        None => {
            writeln!(out, "No display EEPROM detected.")?;
            Ok(false)
        }
    }
}

/// Angle in degrees, anything but NaN and infinity
pub fn parse_degrees(s: &str) -> core::result::Result<f32, String> {
    let degrees = s
        .trim()
        .parse::<f32>()
        .map_err(|_| format!("expected an angle in degrees, got {:?}", s))?;
    if !degrees.is_finite() {
        return Err(format!("rotation must be finite, got {}", degrees));
    }
    Ok(degrees)
}

/// Parse `RRGGBB` (optionally prefixed with `#`) or a basic color name
pub fn parse_rgb(s: &str) -> core::result::Result<Rgb<u8>, String> {
    let s = s.trim();
    match s.to_ascii_lowercase().as_str() {
        "white" => return Ok(Rgb([255, 255, 255])),
        "black" => return Ok(Rgb([0, 0, 0])),
        _ => {}
    }

    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(format!("expected RRGGBB, got {:?}", s));
    }
    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| format!("bad hex color {:?}", s))
    };
    Ok(Rgb([channel(0)?, channel(2)?, channel(4)?]))
}
