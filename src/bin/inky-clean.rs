//! Drive every pixel to the clean colour to get rid of ghosting

use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use epd_waveshare::color::OctColor;
use inky_impression::cli::{self, CleanArgs};
use log::info;

const PAUSE: Duration = Duration::from_secs(1);

fn main() -> Result<()> {
    let args = CleanArgs::parse();
    cli::init_logging(args.common.verbose)?;

    let mut inky = args.common.hardware.auto()?;
    for cycle in 1..=args.cycles {
        info!("cleaning, cycle {} of {}", cycle, args.cycles);
        inky.fill(OctColor::HiZ);
        inky.show().context("refreshing the display")?;
        if cycle < args.cycles {
            thread::sleep(PAUSE);
        }
    }
    inky.sleep()?;
    Ok(())
}
