//! Scale an image to fit on the panel and pad the rest

use anyhow::Result;
use clap::Parser;
use inky_impression::cli::{self, PadArgs};

fn main() -> Result<()> {
    let args = PadArgs::parse();
    cli::init_logging(args.common.verbose)?;
    let saturation = cli::saturation(args.saturation)?;

    cli::show_file(
        &args.common.hardware,
        &args.image,
        &args.pipeline(),
        saturation,
    )
}
