//! Frame buffers for the Impression panels
//!
//! A [`Frame`] wraps the `epd-waveshare` display buffer of the attached model
//! and can be drawn on with embedded-graphics or filled from an RGB image.

use core::convert::Infallible;

use embedded_graphics_core::prelude::*;
use epd_waveshare::color::OctColor;
use epd_waveshare::epd5in65f::Display5in65f;
use epd_waveshare::epd7in3f::Display7in3f;
use image::{imageops, Luma, RgbImage};
use log::debug;

use crate::color::{Palette, Saturation};
use crate::error::{Error, Result};
use crate::model::Model;

/// Background every new frame starts with
pub const DEFAULT_BACKGROUND_COLOR: OctColor = OctColor::White;

/// Full size buffer of one of the supported panels
///
/// The buffers are boxed, the 7.3" one alone is close to 200kB.
pub enum Frame {
    Impression5in7(Box<Display5in65f>),
    Impression7in3(Box<Display7in3f>),
}

impl Frame {
    /// Create a frame for `model` filled with [`DEFAULT_BACKGROUND_COLOR`]
    pub fn new(model: Model) -> Self {
        let mut frame = match model {
            Model::Impression5in7 => Frame::Impression5in7(Box::default()),
            Model::Impression7in3 => Frame::Impression7in3(Box::default()),
        };
        frame.fill(DEFAULT_BACKGROUND_COLOR);
        frame
    }

    pub fn model(&self) -> Model {
        match self {
            Frame::Impression5in7(_) => Model::Impression5in7,
            Frame::Impression7in3(_) => Model::Impression7in3,
        }
    }

    /// get internal buffer to use it (to draw in epd)
    pub fn buffer(&self) -> &[u8] {
        match self {
            Frame::Impression5in7(display) => display.buffer(),
            Frame::Impression7in3(display) => display.buffer(),
        }
    }

    /// Paint every pixel with `color`
    pub fn fill(&mut self, color: OctColor) {
        let _ = self.clear(color);
    }

    /// Quantize `image` to the panel colors and copy it into the frame.
    ///
    /// The image must already have the panel's resolution.
    pub fn draw_image(&mut self, image: &RgbImage, saturation: Saturation) -> Result<()> {
        let expected = self.model().resolution();
        if image.dimensions() != expected {
            return Err(Error::ResolutionMismatch {
                expected,
                actual: image.dimensions(),
            });
        }

        debug!("dithering with saturation {}", saturation.value());
        let palette = Palette::blend(saturation);
        let mut dithered = image.clone();
        imageops::dither(&mut dithered, &palette);
        let indexed = imageops::index_colors(&dithered, &palette);

        let pixels = indexed.enumerate_pixels().map(|(x, y, &Luma([index]))| {
            Pixel(
                Point::new(x as i32, y as i32),
                Palette::panel_color(usize::from(index)),
            )
        });
        let _ = self.draw_iter(pixels);
        Ok(())
    }
}

/// For use with embedded_grahics
impl DrawTarget for Frame {
    type Color = OctColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> core::result::Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        match self {
            Frame::Impression5in7(display) => display.draw_iter(pixels),
            Frame::Impression7in3(display) => display.draw_iter(pixels),
        }
    }
}

/// For use with embedded_grahics
impl OriginDimensions for Frame {
    fn size(&self) -> Size {
        let (width, height) = self.model().resolution();
        Size::new(width, height)
    }
}
