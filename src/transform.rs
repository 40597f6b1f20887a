//! Getting an arbitrary picture into the shape of the panel
//!
//! All resampling is left to `image` / `imageproc`; this module only decides
//! which of their operations run and in what order.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};
use log::debug;

use crate::error::{Error, Result};

/// Filter used whenever an image gets scaled (bicubic)
pub const FILTER: FilterType = FilterType::CatmullRom;

/// Fill for the corners uncovered by a rotation
const ROTATE_FILL: Rgb<u8> = Rgb([0, 0, 0]);

/// Load an image from disk as 8 bit RGB
pub fn open<P: AsRef<Path>>(path: P) -> Result<RgbImage> {
    let path = path.as_ref();
    let image = image::open(path)?;
    debug!(
        "loaded {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );
    Ok(image.to_rgb8())
}

/// Rotate counter-clockwise by `degrees`, keeping the canvas size.
pub fn rotate(image: &RgbImage, degrees: f32) -> Result<RgbImage> {
    if !degrees.is_finite() {
        return Err(Error::InvalidRotation(degrees));
    }
    let degrees = degrees.rem_euclid(360.0);
    let square = image.width() == image.height();

    let rotated = if degrees == 0.0 {
        image.clone()
    } else if degrees == 180.0 {
        imageops::rotate180(image)
    } else if degrees == 90.0 && square {
        imageops::rotate270(image)
    } else if degrees == 270.0 && square {
        imageops::rotate90(image)
    } else {
        // imageproc turns clockwise for positive angles
        rotate_about_center(
            image,
            -degrees.to_radians(),
            Interpolation::Nearest,
            ROTATE_FILL,
        )
    };
    Ok(rotated)
}

/// Remove `border` pixels from every side.
pub fn crop(image: &RgbImage, border: u32) -> Result<RgbImage> {
    let (width, height) = image.dimensions();
    match border.checked_mul(2) {
        Some(twice) if twice < width && twice < height => {
            let (w, h) = (width - twice, height - twice);
            Ok(imageops::crop_imm(image, border, border, w, h).to_image())
        }
        _ => Err(Error::InvalidCrop {
            border,
            width,
            height,
        }),
    }
}

/// Scale and crop around the centre to exactly `width` x `height`.
pub fn fit(image: &RgbImage, width: u32, height: u32) -> RgbImage {
    DynamicImage::ImageRgb8(image.clone())
        .resize_to_fill(width, height, FILTER)
        .to_rgb8()
}

/// Scale to fit inside `width` x `height` and centre on a `color` canvas.
pub fn pad(image: &RgbImage, width: u32, height: u32, color: Rgb<u8>) -> RgbImage {
    let scaled = DynamicImage::ImageRgb8(image.clone())
        .resize(width, height, FILTER)
        .to_rgb8();

    let mut canvas = RgbImage::from_pixel(width, height, color);
    let x = (width - scaled.width()) / 2;
    let y = (height - scaled.height()) / 2;
    imageops::overlay(&mut canvas, &scaled, i64::from(x), i64::from(y));
    canvas
}

/// Stretch to exactly `width` x `height`.
pub fn resize(image: &RgbImage, width: u32, height: u32) -> RgbImage {
    if image.dimensions() == (width, height) {
        return image.clone();
    }
    imageops::resize(image, width, height, FILTER)
}

/// A single operation of a [`Pipeline`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Counter-clockwise, in degrees
    Rotate(f32),
    /// Border removed from every side, in pixels
    Crop(u32),
    /// Scale and centre-crop to the target size
    Fit,
    /// Scale into the target size, pad with the color
    Pad(Rgb<u8>),
}

/// Ordered list of steps, always finished by a resize to the target size
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pipeline {
    steps: Vec<Step>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rotate(mut self, degrees: f32) -> Self {
        self.steps.push(Step::Rotate(degrees));
        self
    }

    pub fn crop(mut self, border: u32) -> Self {
        self.steps.push(Step::Crop(border));
        self
    }

    pub fn fit(mut self) -> Self {
        self.steps.push(Step::Fit);
        self
    }

    pub fn pad(mut self, color: Rgb<u8>) -> Self {
        self.steps.push(Step::Pad(color));
        self
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Run every step in order, then resize to `resolution`.
    pub fn apply(&self, image: RgbImage, resolution: (u32, u32)) -> Result<RgbImage> {
        let (width, height) = resolution;
        let mut image = image;
        for step in &self.steps {
            debug!("{:?} on {}x{}", step, image.width(), image.height());
            image = match *step {
                Step::Rotate(degrees) => rotate(&image, degrees)?,
                Step::Crop(border) => crop(&image, border)?,
                Step::Fit => fit(&image, width, height),
                Step::Pad(color) => pad(&image, width, height, color),
            };
        }
        Ok(resize(&image, width, height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb<u8> = Rgb([255, 0, 0]);
    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

    // 3x3 white image with a red dot in the middle of the right edge
    fn marker() -> RgbImage {
        let mut image = RgbImage::from_pixel(3, 3, WHITE);
        image.put_pixel(2, 1, RED);
        image
    }

    #[test]
    fn rotate_zero_is_identity() {
        assert_eq!(rotate(&marker(), 0.0).unwrap(), marker());
        assert_eq!(rotate(&marker(), 360.0).unwrap(), marker());
    }

    #[test]
    fn rotate_counter_clockwise() {
        let rotated = rotate(&marker(), 90.0).unwrap();
        assert_eq!(rotated.get_pixel(1, 0), &RED);
        assert_eq!(rotated.get_pixel(2, 1), &WHITE);

        let rotated = rotate(&marker(), -90.0).unwrap();
        assert_eq!(rotated.get_pixel(1, 2), &RED);

        let rotated = rotate(&marker(), 180.0).unwrap();
        assert_eq!(rotated.get_pixel(0, 1), &RED);
    }

    #[test]
    fn rotate_keeps_canvas() {
        let image = RgbImage::from_pixel(40, 20, WHITE);
        for degrees in [45.0, 90.0, 270.0, 33.3] {
            assert_eq!(rotate(&image, degrees).unwrap().dimensions(), (40, 20));
        }
        // corners turned out of view are filled black
        let rotated = rotate(&image, 45.0).unwrap();
        assert_eq!(rotated.get_pixel(0, 0), &BLACK);
        assert_eq!(rotated.get_pixel(20, 10), &WHITE);
    }

    #[test]
    fn rotate_rejects_non_finite_angles() {
        let image = RgbImage::from_pixel(40, 20, WHITE);
        for degrees in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            assert!(matches!(
                rotate(&image, degrees),
                Err(Error::InvalidRotation(_))
            ));
        }
        assert!(matches!(
            Pipeline::new().rotate(f32::NAN).apply(image, (40, 20)),
            Err(Error::InvalidRotation(_))
        ));
    }

    #[test]
    fn crop_border() {
        let cropped = crop(&marker(), 1).unwrap();
        assert_eq!(cropped.dimensions(), (1, 1));
        assert_eq!(cropped.get_pixel(0, 0), &WHITE);

        assert_eq!(crop(&marker(), 0).unwrap(), marker());
    }

    #[test]
    fn crop_too_much() {
        assert!(matches!(
            crop(&marker(), 2),
            Err(Error::InvalidCrop {
                border: 2,
                width: 3,
                height: 3
            })
        ));
        assert!(crop(&marker(), u32::MAX).is_err());
    }

    #[test]
    fn fit_fills_target() {
        let image = RgbImage::from_pixel(100, 50, RED);
        let fitted = fit(&image, 60, 45);
        assert_eq!(fitted.dimensions(), (60, 45));
        assert_eq!(fitted.get_pixel(0, 0), &RED);
        assert_eq!(fitted.get_pixel(59, 44), &RED);
    }

    #[test]
    fn pad_centres_image() {
        let image = RgbImage::from_pixel(100, 50, RED);
        let padded = pad(&image, 60, 60, WHITE);
        assert_eq!(padded.dimensions(), (60, 60));
        // scaled to 60x30, 15 rows of padding above and below
        assert_eq!(padded.get_pixel(30, 0), &WHITE);
        assert_eq!(padded.get_pixel(30, 14), &WHITE);
        assert_eq!(padded.get_pixel(30, 30), &RED);
        assert_eq!(padded.get_pixel(30, 59), &WHITE);
    }

    #[test]
    fn resize_exact() {
        let image = RgbImage::from_pixel(10, 10, RED);
        assert_eq!(resize(&image, 6, 4).dimensions(), (6, 4));
        assert_eq!(resize(&image, 10, 10), image);
    }

    #[test]
    fn pipeline_runs_in_order() {
        let pipeline = Pipeline::new().rotate(90.0).crop(1).fit();
        assert_eq!(
            pipeline.steps(),
            &[Step::Rotate(90.0), Step::Crop(1), Step::Fit]
        );

        let image = RgbImage::from_pixel(30, 20, RED);
        let out = pipeline.apply(image, (12, 8)).unwrap();
        assert_eq!(out.dimensions(), (12, 8));
    }

    #[test]
    fn pipeline_always_resizes() {
        let image = RgbImage::from_pixel(30, 20, RED);
        let out = Pipeline::new().apply(image, (16, 16)).unwrap();
        assert_eq!(out.dimensions(), (16, 16));
    }

    #[test]
    fn pipeline_propagates_errors() {
        let image = RgbImage::from_pixel(4, 4, RED);
        assert!(Pipeline::new().crop(5).apply(image, (4, 4)).is_err());
    }
}
