use embedded_hal::spi;
use thiserror::Error;

/// Inky error type
#[derive(Debug, Error)]
pub enum Error {
    /// Encountered an SPI error while talking to the panel controller
    #[error("SPI transfer failed: {0:?}")]
    SpiError(spi::ErrorKind),

    /// Decoding or resampling the source image failed
    #[error("image processing failed: {0}")]
    ImageError(#[from] image::ImageError),

    /// Neither the EEPROM nor the caller told us which panel is attached
    #[error("no display EEPROM detected, pass the display type manually")]
    NoEeprom,

    /// The EEPROM record is shorter than the fixed layout
    #[error("EEPROM record too short: got {0} bytes, need {len}", len = crate::eeprom::EEPROM_LEN)]
    ShortEeprom(usize),

    /// The attached panel has no driver
    #[error("unsupported display: {0}")]
    UnsupportedDisplay(String),

    /// Saturation was NaN or infinite
    #[error("invalid saturation {0}, expected a value between 0.0 and 1.0")]
    InvalidSaturation(f32),

    /// Saturation text that is not a number
    #[error("invalid saturation {0:?}, expected a value between 0.0 and 1.0")]
    ParseSaturation(String),

    /// Rotation was NaN or infinite
    #[error("invalid rotation {0}, expected a finite angle in degrees")]
    InvalidRotation(f32),

    /// Cropping would leave nothing of the image
    #[error("cannot crop {border}px from every side of a {width}x{height} image")]
    InvalidCrop { border: u32, width: u32, height: u32 },

    /// The image handed to the frame does not match the panel
    #[error("image is {actual:?} but the display is {expected:?}")]
    ResolutionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
}

impl Error {
    pub(crate) fn spi<E: spi::Error>(err: E) -> Self {
        Error::SpiError(err.kind())
    }
}

/// Result alias used throughout the crate
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bus_errors_keep_their_kind() {
        let err = Error::spi(spi::ErrorKind::ModeFault);
        assert!(matches!(err, Error::SpiError(spi::ErrorKind::ModeFault)));
    }

    #[test]
    fn messages() {
        assert_eq!(
            Error::ShortEeprom(3).to_string(),
            "EEPROM record too short: got 3 bytes, need 29"
        );
        assert_eq!(
            Error::ResolutionMismatch {
                expected: (600, 448),
                actual: (10, 10)
            }
            .to_string(),
            "image is (10, 10) but the display is (600, 448)"
        );
        assert_eq!(
            Error::ParseSaturation("grey".into()).to_string(),
            "invalid saturation \"grey\", expected a value between 0.0 and 1.0"
        );
    }
}
