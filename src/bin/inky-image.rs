//! Rotate an image, stretch it to the panel and show it

use anyhow::Result;
use clap::Parser;
use inky_impression::cli::{self, ImageArgs};

fn main() -> Result<()> {
    let args = ImageArgs::parse();
    cli::init_logging(args.common.verbose)?;
    let saturation = cli::saturation(args.saturation)?;

    cli::show_file(
        &args.common.hardware,
        &args.image,
        &args.pipeline(),
        saturation,
    )
}
