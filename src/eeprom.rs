//! Identification EEPROM found on Inky boards
//!
//! Every Inky HAT carries a small 24C32 EEPROM on the I2C bus. The first
//! 29 bytes describe the attached panel:
//!
//! | offset | size | content                                  |
//! |--------|------|------------------------------------------|
//! | 0      | 2    | width, little endian                     |
//! | 2      | 2    | height, little endian                    |
//! | 4      | 1    | color code                               |
//! | 5      | 1    | pcb variant (version * 10)               |
//! | 6      | 1    | display variant                          |
//! | 7      | 22   | length prefixed write timestamp (ASCII)  |

use core::fmt;

use embedded_hal::i2c::{Error as _, I2c};
use log::debug;

use crate::error::{Error, Result};

/// I2C address of the EEPROM
pub const EEPROM_ADDRESS: u8 = 0x50;
/// Length of the identification record
pub const EEPROM_LEN: usize = 29;

/// Longest timestamp the record can hold
const WRITE_TIME_MAX: usize = 21;

const COLOR_NAMES: [Option<&str>; 6] = [
    None,
    Some("black"),
    Some("red"),
    Some("yellow"),
    None,
    Some("7colour"),
];

const DISPLAY_VARIANTS: [Option<&str>; 21] = [
    None,
    Some("Red pHAT (High-Temp)"),
    Some("Yellow wHAT"),
    Some("Black wHAT"),
    Some("Black pHAT"),
    Some("Yellow pHAT"),
    Some("Red wHAT"),
    Some("Red wHAT (High-Temp)"),
    Some("Red wHAT"),
    None,
    Some("Black pHAT (SSD1608)"),
    Some("Red pHAT (SSD1608)"),
    Some("Yellow pHAT (SSD1608)"),
    None,
    Some("7-Colour (UC8159)"),
    Some("7-Colour 640x400 (UC8159)"),
    Some("7-Colour 640x400 (UC8159)"),
    Some("Black wHAT (SSD1683)"),
    Some("Red wHAT (SSD1683)"),
    Some("Yellow wHAT (SSD1683)"),
    Some("7-Colour 800x480 (AC073TC1A)"),
];

/// Decoded identification record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpdType {
    pub width: u16,
    pub height: u16,
    pub color: u8,
    pub pcb_variant: u8,
    pub display_variant: u8,
    pub write_time: String,
}

impl EpdType {
    /// Unpack the raw record. Bytes past [`EEPROM_LEN`] are ignored.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < EEPROM_LEN {
            return Err(Error::ShortEeprom(data.len()));
        }

        let time_len = usize::from(data[7]).min(WRITE_TIME_MAX);
        let write_time = String::from_utf8_lossy(&data[8..8 + time_len]).into_owned();

        Ok(EpdType {
            width: u16::from_le_bytes([data[0], data[1]]),
            height: u16::from_le_bytes([data[2], data[3]]),
            color: data[4],
            pcb_variant: data[5],
            display_variant: data[6],
            write_time,
        })
    }

    /// Name of the color code, if it is a known one
    pub fn color_name(&self) -> Option<&'static str> {
        COLOR_NAMES.get(usize::from(self.color)).copied().flatten()
    }

    /// Name of the display variant, if it is a known one
    pub fn variant_name(&self) -> Option<&'static str> {
        DISPLAY_VARIANTS
            .get(usize::from(self.display_variant))
            .copied()
            .flatten()
    }
}

impl fmt::Display for EpdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Display: {}x{}", self.width, self.height)?;
        writeln!(f, "Color: {}", self.color_name().unwrap_or("None"))?;
        writeln!(f, "PCB Variant: {:.1}", f64::from(self.pcb_variant) / 10.0)?;
        writeln!(
            f,
            "Display Variant: {}",
            self.variant_name().unwrap_or("None")
        )?;
        write!(f, "Time: {}", self.write_time)
    }
}

/// Read the identification record.
///
/// A missing or silent EEPROM is not an error, it just means the board can not
/// tell us what it is: `Ok(None)` is returned for any bus failure.
pub fn read_eeprom<I2C: I2c>(i2c: &mut I2C) -> Result<Option<EpdType>> {
    let mut buffer = [0u8; EEPROM_LEN];

    // two byte memory address, start at the beginning
    if let Err(err) = i2c.write_read(EEPROM_ADDRESS, &[0x00, 0x00], &mut buffer) {
        debug!("no EEPROM at {:#04x}: {:?}", EEPROM_ADDRESS, err.kind());
        return Ok(None);
    }

    let epd = EpdType::from_bytes(&buffer)?;
    debug!("EEPROM record: {:?}", epd);
    Ok(Some(epd))
}
