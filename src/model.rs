//! Supported panels and how to tell which one is attached

use core::fmt;
use core::str::FromStr;

use epd_waveshare::{epd5in65f, epd7in3f};
use log::{info, warn};

use crate::eeprom::EpdType;
use crate::error::{Error, Result};

/// Display variant id of the 5.7" Impression
pub const VARIANT_5IN7: u8 = 14;
/// Display variant ids of the 4" Impression
pub const VARIANTS_4IN: [u8; 2] = [15, 16];
/// Display variant id of the 7.3" Impression
pub const VARIANT_7IN3: u8 = 20;

/// Inky Impression models this crate can drive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Model {
    /// 5.7" 600x448, UC8159 controller
    Impression5in7,
    /// 7.3" 800x480, AC073TC1A controller
    Impression7in3,
}

impl Model {
    /// Map an EEPROM display variant to a model
    pub fn from_variant(variant: u8) -> Result<Self> {
        match variant {
            VARIANT_5IN7 => Ok(Model::Impression5in7),
            VARIANT_7IN3 => Ok(Model::Impression7in3),
            v if VARIANTS_4IN.contains(&v) => Err(Error::UnsupportedDisplay(
                "7-Colour 640x400 (UC8159) has no panel driver".into(),
            )),
            v => Err(Error::UnsupportedDisplay(format!(
                "display variant {} is not a 7-colour Impression",
                v
            ))),
        }
    }

    /// Width and height in pixels
    pub fn resolution(self) -> (u32, u32) {
        match self {
            Model::Impression5in7 => (epd5in65f::WIDTH, epd5in65f::HEIGHT),
            Model::Impression7in3 => (epd7in3f::WIDTH, epd7in3f::HEIGHT),
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Model::Impression5in7 => f.write_str("impression-5.7"),
            Model::Impression7in3 => f.write_str("impression-7.3"),
        }
    }
}

impl FromStr for Model {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "impression-5.7" | "5.7" | "7colour" | "uc8159" => Ok(Model::Impression5in7),
            "impression-7.3" | "7.3" | "ac073tc1a" => Ok(Model::Impression7in3),
            other => Err(Error::UnsupportedDisplay(format!(
                "unknown display type {:?}, expected impression-5.7 or impression-7.3",
                other
            ))),
        }
    }
}

/// Pick the model to drive.
///
/// The EEPROM wins over a manually given type, the manual type is only
/// used when the board has no (readable) EEPROM.
pub fn detect(eeprom: Option<&EpdType>, manual: Option<Model>) -> Result<Model> {
    match (eeprom, manual) {
        (Some(epd), manual) => {
            info!(
                "Detected {}",
                epd.variant_name().unwrap_or("unknown display variant")
            );
            let model = Model::from_variant(epd.display_variant)?;
            if let Some(manual) = manual.filter(|m| *m != model) {
                warn!("ignoring display type {}, EEPROM says {}", manual, model);
            }
            Ok(model)
        }
        (None, Some(manual)) => {
            info!("No EEPROM detected, using display type {}", manual);
            Ok(manual)
        }
        (None, None) => Err(Error::NoEeprom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn epd(display_variant: u8) -> EpdType {
        EpdType {
            width: 600,
            height: 448,
            color: 5,
            pcb_variant: 12,
            display_variant,
            write_time: String::new(),
        }
    }

    #[test]
    fn model_sizes() {
        assert_eq!(Model::Impression5in7.resolution(), (600, 448));
        assert_eq!(Model::Impression7in3.resolution(), (800, 480));
    }

    #[test]
    fn variants() {
        assert_eq!(Model::from_variant(14).unwrap(), Model::Impression5in7);
        assert_eq!(Model::from_variant(20).unwrap(), Model::Impression7in3);
        assert!(matches!(
            Model::from_variant(15),
            Err(Error::UnsupportedDisplay(_))
        ));
        assert!(matches!(
            Model::from_variant(3),
            Err(Error::UnsupportedDisplay(_))
        ));
    }

    #[test]
    fn parse_type() {
        assert_eq!("impression-5.7".parse::<Model>().unwrap(), Model::Impression5in7);
        assert_eq!("7COLOUR".parse::<Model>().unwrap(), Model::Impression5in7);
        assert_eq!(" 7.3 ".parse::<Model>().unwrap(), Model::Impression7in3);
        assert!("phat".parse::<Model>().is_err());
        assert_eq!(
            Model::Impression7in3.to_string().parse::<Model>().unwrap(),
            Model::Impression7in3
        );
    }

    #[test]
    fn eeprom_wins() {
        let record = epd(VARIANT_7IN3);
        assert_eq!(
            detect(Some(&record), Some(Model::Impression5in7)).unwrap(),
            Model::Impression7in3
        );
        assert_eq!(detect(Some(&record), None).unwrap(), Model::Impression7in3);
    }

    #[test]
    fn manual_without_eeprom() {
        assert_eq!(
            detect(None, Some(Model::Impression5in7)).unwrap(),
            Model::Impression5in7
        );
    }

    #[test]
    fn nothing_to_go_on() {
        assert!(matches!(detect(None, None), Err(Error::NoEeprom)));
    }

    #[test]
    fn unsupported_eeprom_is_an_error() {
        let record = epd(VARIANTS_4IN[0]);
        assert!(matches!(
            detect(Some(&record), Some(Model::Impression5in7)),
            Err(Error::UnsupportedDisplay(_))
        ));
    }
}
