//! Scale an image until it covers the whole panel, cutting off what sticks out

use anyhow::Result;
use clap::Parser;
use inky_impression::cli::{self, FitArgs};

fn main() -> Result<()> {
    let args = FitArgs::parse();
    cli::init_logging(args.common.verbose)?;
    let saturation = cli::saturation(args.saturation)?;

    cli::show_file(
        &args.common.hardware,
        &args.image,
        &args.pipeline(),
        saturation,
    )
}
