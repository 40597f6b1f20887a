//! Wiring for a Raspberry Pi with the Impression on its 40 pin header
//!
//! Pins are BCM numbers on `/dev/gpiochip0`. Every value can be overridden on
//! the command line or through `INKY_*` environment variables.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use embedded_hal::spi::{Mode, Phase, Polarity};
use linux_embedded_hal::{
    gpio_cdev::{Chip, LineRequestFlags},
    spidev::{SpiModeFlags, SpidevOptions},
    CdevPin, Delay, I2cdev, SpidevDevice,
};
use log::{debug, warn};

use crate::eeprom::{self, EpdType};
use crate::inky::Inky;
use crate::model::{self, Model};
use crate::SPI_MODE;

/// SPI device, chip select CE0
pub const SPI_DEVICE: &str = "/dev/spidev0.0";
/// SPI clock the UC8159 is happy with
pub const SPI_SPEED_HZ: u32 = 3_000_000;
pub const GPIO_CHIP: &str = "/dev/gpiochip0";
/// Busy line, low while the controller works
pub const BUSY_PIN: u32 = 17;
/// Data/Command line, high for data, low for commands
pub const DC_PIN: u32 = 22;
pub const RESET_PIN: u32 = 27;
/// I2C bus of the identification EEPROM
pub const I2C_BUS: &str = "/dev/i2c-1";

/// Inky on a Raspberry Pi
pub type LinuxInky = Inky<SpidevDevice, CdevPin, CdevPin, CdevPin, Delay>;

/// Where the display is connected
#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct HardwareConfig {
    /// SPI device of the panel controller
    #[arg(long, env = "INKY_SPI", default_value = SPI_DEVICE)]
    pub spi: PathBuf,

    /// SPI clock in Hz
    #[arg(long, env = "INKY_SPI_SPEED", default_value_t = SPI_SPEED_HZ)]
    pub spi_speed: u32,

    /// GPIO character device
    #[arg(long, env = "INKY_GPIOCHIP", default_value = GPIO_CHIP)]
    pub gpiochip: PathBuf,

    /// GPIO line of the busy signal
    #[arg(long, env = "INKY_BUSY_PIN", default_value_t = BUSY_PIN)]
    pub busy_pin: u32,

    /// GPIO line of the data/command signal
    #[arg(long, env = "INKY_DC_PIN", default_value_t = DC_PIN)]
    pub dc_pin: u32,

    /// GPIO line of the reset signal
    #[arg(long, env = "INKY_RESET_PIN", default_value_t = RESET_PIN)]
    pub reset_pin: u32,

    /// I2C bus of the identification EEPROM
    #[arg(long, env = "INKY_I2C", default_value = I2C_BUS)]
    pub i2c: PathBuf,

    /// Display type to use when the board has no EEPROM
    /// (impression-5.7 or impression-7.3)
    #[arg(long = "type", env = "INKY_TYPE")]
    pub display_type: Option<Model>,
}

impl Default for HardwareConfig {
    fn default() -> Self {
        HardwareConfig {
            spi: PathBuf::from(SPI_DEVICE),
            spi_speed: SPI_SPEED_HZ,
            gpiochip: PathBuf::from(GPIO_CHIP),
            busy_pin: BUSY_PIN,
            dc_pin: DC_PIN,
            reset_pin: RESET_PIN,
            i2c: PathBuf::from(I2C_BUS),
            display_type: None,
        }
    }
}

impl HardwareConfig {
    /// Open the I2C bus the EEPROM sits on
    pub fn open_eeprom(&self) -> Result<I2cdev> {
        I2cdev::new(&self.i2c).with_context(|| format!("opening I2C bus {}", self.i2c.display()))
    }

    /// Read the identification EEPROM.
    ///
    /// A bus that can not be opened counts as "no EEPROM".
    pub fn read_eeprom(&self) -> Result<Option<EpdType>> {
        let mut i2c = match self.open_eeprom() {
            Ok(i2c) => i2c,
            Err(err) => {
                debug!("{:#}", err);
                return Ok(None);
            }
        };
        Ok(eeprom::read_eeprom(&mut i2c)?)
    }

    /// Open SPI and GPIO and initialise a `model` panel
    pub fn open_display(&self, model: Model) -> Result<LinuxInky> {
        let mut spi = SpidevDevice::open(&self.spi)
            .with_context(|| format!("opening SPI device {}", self.spi.display()))?;
        let options = SpidevOptions::new()
            .bits_per_word(8)
            .max_speed_hz(self.spi_speed)
            .mode(mode_flags(SPI_MODE))
            .build();
        spi.configure(&options).context("configuring SPI")?;

        let mut chip = Chip::new(&self.gpiochip)
            .with_context(|| format!("opening GPIO chip {}", self.gpiochip.display()))?;
        let busy = request_pin(
            &mut chip,
            self.busy_pin,
            LineRequestFlags::INPUT,
            0,
            "inky-busy",
        )?;
        let dc = request_pin(
            &mut chip,
            self.dc_pin,
            LineRequestFlags::OUTPUT,
            0,
            "inky-dc",
        )?;
        let rst = request_pin(
            &mut chip,
            self.reset_pin,
            LineRequestFlags::OUTPUT,
            1,
            "inky-reset",
        )?;

        Inky::new(model, spi, busy, dc, rst, Delay)
            .with_context(|| format!("initialising {}", model))
    }

    /// Find out which panel is attached and open it
    pub fn auto(&self) -> Result<LinuxInky> {
        let eeprom = self.read_eeprom()?;
        if eeprom.is_none() && self.display_type.is_none() {
            warn!("no EEPROM on {}, pass --type", self.i2c.display());
        }
        let model = model::detect(eeprom.as_ref(), self.display_type)?;
        self.open_display(model)
    }
}

/// spidev flags for an embedded-hal SPI mode
fn mode_flags(mode: Mode) -> SpiModeFlags {
    let mut flags = SpiModeFlags::empty();
    if mode.polarity == Polarity::IdleHigh {
        flags |= SpiModeFlags::SPI_CPOL;
    }
    if mode.phase == Phase::CaptureOnSecondTransition {
        flags |= SpiModeFlags::SPI_CPHA;
    }
    flags
}

fn request_pin(
    chip: &mut Chip,
    offset: u32,
    flags: LineRequestFlags,
    default: u8,
    consumer: &str,
) -> Result<CdevPin> {
    let handle = chip
        .get_line(offset)
        .with_context(|| format!("getting GPIO line {}", offset))?
        .request(flags, default, consumer)
        .with_context(|| format!("requesting GPIO line {}", offset))?;
    CdevPin::new(handle).with_context(|| format!("creating pin for GPIO line {}", offset))
}
