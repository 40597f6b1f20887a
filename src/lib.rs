//! Show pictures on Pimoroni Inky Impression 7-colour e-paper displays
//!
//! The panel protocol is handled by the [`epd-waveshare`] drivers, this crate
//! adds what an Impression HAT needs on top: identification through the
//! on-board EEPROM, fitting images to the panel and the Inky palette with its
//! saturation control.
//!
//! [`epd-waveshare`]: https://docs.rs/epd-waveshare
//!
//! # Requirements
//!
//! ### SPI
//!
//! - MISO is not connected/available
//! - SPI_MODE_0 is used (CPHL = 0, CPOL = 0)
//! - 8 bits per word, MSB first
//! - 3MHz on the HAT, the UC8159 gets unreliable much above that
//!
//! ### I2C
//!
//! - The identification EEPROM answers on address `0x50`
//!
//! # Examples
//!
//! ```ignore
//! use inky_impression::prelude::*;
//!
//! let mut inky = Inky::new(Model::Impression5in7, spi, busy, dc, rst, delay)?;
//!
//! let image = transform::open("picture.jpg")?;
//! let image = Pipeline::new().fit().apply(image, inky.resolution())?;
//!
//! inky.set_image(&image, Saturation::default())?;
//! inky.show()?;
//! inky.sleep()?;
//! ```
//!
//! With the `linux-dev` feature the pins of the HAT are opened for you:
//!
//! ```ignore
//! let mut inky = HardwareConfig::default().auto()?;
//! ```

pub mod color;
pub mod eeprom;
mod error;
pub mod graphics;
pub mod inky;
pub mod model;
pub mod transform;

#[cfg(feature = "linux-dev")]
pub mod cli;
#[cfg(feature = "linux-dev")]
pub mod linux;

pub use crate::error::{Error, Result};

pub mod prelude {
    pub use crate::color::{Palette, Saturation};
    pub use crate::eeprom::{read_eeprom, EpdType};
    pub use crate::graphics::Frame;
    pub use crate::inky::Inky;
    pub use crate::model::Model;
    pub use crate::transform::{self, Pipeline};
    pub use crate::SPI_MODE;
    pub use crate::{Error, Result};

    pub use epd_waveshare::color::OctColor;

    #[cfg(feature = "linux-dev")]
    pub use crate::linux::{HardwareConfig, LinuxInky};
}

use embedded_hal::spi::{Mode, Phase, Polarity};

/// SPI mode -
/// For more infos see [Requirements: SPI](index.html#spi)
pub const SPI_MODE: Mode = Mode {
    phase: Phase::CaptureOnFirstTransition,
    polarity: Polarity::IdleLow,
};
