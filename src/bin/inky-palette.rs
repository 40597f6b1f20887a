//! Draw one vertical stripe per panel colour

use anyhow::{Context, Result};
use clap::Parser;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use image::RgbImage;
use inky_impression::cli::{self, PaletteArgs};
use inky_impression::color::{Palette, Saturation};

fn main() -> Result<()> {
    let args = PaletteArgs::parse();
    cli::init_logging(args.common.verbose)?;
    let saturation = args.saturation.map(Saturation::new).transpose()?;

    let mut inky = args.common.hardware.auto()?;
    let (width, height) = inky.resolution();
    let colors = Palette::blend(saturation.unwrap_or_default());
    // clean is left out, it shows as a washed out white
    let count = (colors.colors().len() - 1) as u32;
    let stripe = width / count;

    match saturation {
        Some(saturation) => {
            let image = RgbImage::from_fn(width, height, |x, _| {
                let index = (x / stripe).min(count - 1) as usize;
                colors.colors()[index]
            });
            inky.set_image(&image, saturation)?;
        }
        None => {
            for index in 0..count {
                let stripe_width = if index == count - 1 {
                    width - stripe * index
                } else {
                    stripe
                };
                let _ = Rectangle::new(
                    Point::new((stripe * index) as i32, 0),
                    Size::new(stripe_width, height),
                )
                .into_styled(PrimitiveStyle::with_fill(Palette::panel_color(
                    index as usize,
                )))
                .draw(inky.frame_mut());
            }
        }
    }

    inky.show().context("refreshing the display")?;
    inky.sleep()?;
    Ok(())
}
