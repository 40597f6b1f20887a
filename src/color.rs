//! B/W/G/B/R/Y/O palette of the 7-colour panels
//!
//! The panels can only show seven inks (plus a "clean" state). The RGB value
//! a pixel is matched against is a blend between the measured, saturated ink
//! color and the idealised, desaturated one; `saturation` picks the mix.

use epd_waveshare::color::OctColor;
use image::imageops::ColorMap;
use image::Rgb;
use log::warn;

use crate::error::{Error, Result};

/// Number of palette entries, one per panel color
pub const PALETTE_LEN: usize = 8;

/// Panel colors in palette order
pub const PANEL_COLORS: [OctColor; PALETTE_LEN] = [
    OctColor::Black,
    OctColor::White,
    OctColor::Green,
    OctColor::Blue,
    OctColor::Red,
    OctColor::Yellow,
    OctColor::Orange,
    OctColor::HiZ,
];

/// Measured ink colors
pub const SATURATED: [[u8; 3]; PALETTE_LEN] = [
    [57, 48, 57],
    [255, 255, 255],
    [58, 91, 70],
    [61, 59, 94],
    [156, 72, 75],
    [208, 190, 71],
    [177, 106, 73],
    [255, 255, 255],
];

/// Idealised ink colors
pub const DESATURATED: [[u8; 3]; PALETTE_LEN] = [
    [0, 0, 0],
    [255, 255, 255],
    [0, 255, 0],
    [0, 0, 255],
    [255, 0, 0],
    [255, 255, 0],
    [255, 140, 0],
    [255, 255, 255],
];

/// Saturation used when the caller gives none
pub const DEFAULT_SATURATION: f32 = 0.5;

/// Blend factor between [`DESATURATED`] (0.0) and [`SATURATED`] (1.0)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Saturation(f32);

impl Saturation {
    /// Out of range values are clamped into `0.0..=1.0`.
    pub fn new(value: f32) -> Result<Self> {
        if !value.is_finite() {
            return Err(Error::InvalidSaturation(value));
        }
        let clamped = value.clamp(0.0, 1.0);
        if clamped != value {
            warn!("saturation {} out of range, using {}", value, clamped);
        }
        Ok(Saturation(clamped))
    }

    pub fn value(self) -> f32 {
        self.0
    }
}

impl Default for Saturation {
    fn default() -> Self {
        Saturation(DEFAULT_SATURATION)
    }
}

impl core::str::FromStr for Saturation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let value = s
            .trim()
            .parse::<f32>()
            .map_err(|_| Error::ParseSaturation(s.to_string()))?;
        Saturation::new(value)
    }
}

/// Palette the dithering matches against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: [Rgb<u8>; PALETTE_LEN],
}

impl Palette {
    /// Mix the saturated and desaturated inks.
    ///
    /// The clean entry stays white whatever the saturation.
    pub fn blend(saturation: Saturation) -> Self {
        let s = saturation.value();
        let mut colors = [Rgb([255, 255, 255]); PALETTE_LEN];
        for (i, color) in colors.iter_mut().take(PALETTE_LEN - 1).enumerate() {
            for c in 0..3 {
                let mixed =
                    f32::from(SATURATED[i][c]) * s + f32::from(DESATURATED[i][c]) * (1.0 - s);
                // truncated, not rounded
                color.0[c] = mixed as u8;
            }
        }
        Palette { colors }
    }

    pub fn colors(&self) -> &[Rgb<u8>; PALETTE_LEN] {
        &self.colors
    }

    /// Panel color for a palette index
    pub fn panel_color(index: usize) -> OctColor {
        PANEL_COLORS.get(index).copied().unwrap_or(OctColor::White)
    }
}

impl ColorMap for Palette {
    type Color = Rgb<u8>;

    fn index_of(&self, color: &Rgb<u8>) -> usize {
        let mut best = 0;
        let mut best_distance = u32::MAX;
        for (i, entry) in self.colors.iter().enumerate() {
            let distance = entry
                .0
                .iter()
                .zip(color.0.iter())
                .map(|(&a, &b)| {
                    let d = i32::from(a) - i32::from(b);
                    (d * d) as u32
                })
                .sum::<u32>();
            // strictly smaller, the first of equal entries wins
            if distance < best_distance {
                best = i;
                best_distance = distance;
            }
        }
        best
    }

    fn map_color(&self, color: &mut Rgb<u8>) {
        *color = self.colors[self.index_of(color)];
    }
}
