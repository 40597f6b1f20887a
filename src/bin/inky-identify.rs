//! Print what the display EEPROM says about the attached board

use std::io;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use inky_impression::cli::{self, IdentifyArgs};

fn main() -> Result<ExitCode> {
    let args = IdentifyArgs::parse();
    cli::init_logging(args.common.verbose)?;

    let eeprom = args.common.hardware.read_eeprom()?;
    if cli::report_eeprom(eeprom.as_ref(), &mut io::stdout().lock())? {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
