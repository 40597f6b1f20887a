//! Driver facade for the Impression panels
//!
//! The refresh protocol itself is the job of the `epd-waveshare` drivers;
//! [`Inky`] owns the bus, picks the right driver for the model and keeps the
//! frame that gets sent on [`Inky::show`].

use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiDevice,
};
use epd_waveshare::color::OctColor;
use epd_waveshare::epd5in65f::Epd5in65f;
use epd_waveshare::epd7in3f::Epd7in3f;
use epd_waveshare::prelude::WaveshareDisplay;
use image::RgbImage;
use log::{debug, info};

use crate::color::Saturation;
use crate::error::{Error, Result};
use crate::graphics::Frame;
use crate::model::Model;

enum Panel<SPI, BUSY, DC, RST, DELAY> {
    Impression5in7(Epd5in65f<SPI, BUSY, DC, RST, DELAY>),
    Impression7in3(Epd7in3f<SPI, BUSY, DC, RST, DELAY>),
}

/// An Inky Impression connected over SPI
pub struct Inky<SPI, BUSY, DC, RST, DELAY> {
    spi: SPI,
    delay: DELAY,
    panel: Panel<SPI, BUSY, DC, RST, DELAY>,
    frame: Frame,
}

impl<SPI, BUSY, DC, RST, DELAY> Inky<SPI, BUSY, DC, RST, DELAY>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    /// Creates a new driver and initialises the panel controller
    pub fn new(
        model: Model,
        mut spi: SPI,
        busy: BUSY,
        dc: DC,
        rst: RST,
        mut delay: DELAY,
    ) -> Result<Self> {
        debug!("initialising {}", model);
        let panel = match model {
            Model::Impression5in7 => Panel::Impression5in7(
                Epd5in65f::new(&mut spi, busy, dc, rst, &mut delay, None).map_err(Error::spi)?,
            ),
            Model::Impression7in3 => Panel::Impression7in3(
                Epd7in3f::new(&mut spi, busy, dc, rst, &mut delay, None).map_err(Error::spi)?,
            ),
        };

        Ok(Inky {
            spi,
            delay,
            panel,
            frame: Frame::new(model),
        })
    }

    pub fn model(&self) -> Model {
        self.frame.model()
    }

    /// Width and height of the panel
    pub fn resolution(&self) -> (u32, u32) {
        self.model().resolution()
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Frame to draw on with embedded-graphics
    pub fn frame_mut(&mut self) -> &mut Frame {
        &mut self.frame
    }

    /// Replace the frame content with `image`, see [`Frame::draw_image`]
    pub fn set_image(&mut self, image: &RgbImage, saturation: Saturation) -> Result<()> {
        self.frame.draw_image(image, saturation)
    }

    /// Paint the whole frame with one color
    pub fn fill(&mut self, color: OctColor) {
        self.frame.fill(color);
    }

    /// Transfer the frame and refresh the panel.
    ///
    /// Blocks until the refresh is done, which takes tens of seconds.
    pub fn show(&mut self) -> Result<()> {
        info!("refreshing {}", self.model());
        let buffer = self.frame.buffer();
        match &mut self.panel {
            Panel::Impression5in7(epd) => {
                epd.update_and_display_frame(&mut self.spi, buffer, &mut self.delay)
            }
            Panel::Impression7in3(epd) => {
                epd.update_and_display_frame(&mut self.spi, buffer, &mut self.delay)
            }
        }
        .map_err(Error::spi)
    }

    /// Let the controller enter deep-sleep mode.
    ///
    /// [`Inky::wake_up`] has to be called before the next [`Inky::show`].
    pub fn sleep(&mut self) -> Result<()> {
        debug!("putting {} to sleep", self.model());
        match &mut self.panel {
            Panel::Impression5in7(epd) => epd.sleep(&mut self.spi, &mut self.delay),
            Panel::Impression7in3(epd) => epd.sleep(&mut self.spi, &mut self.delay),
        }
        .map_err(Error::spi)
    }

    /// Reset and reinitialise the controller after [`Inky::sleep`]
    pub fn wake_up(&mut self) -> Result<()> {
        match &mut self.panel {
            Panel::Impression5in7(epd) => epd.wake_up(&mut self.spi, &mut self.delay),
            Panel::Impression7in3(epd) => epd.wake_up(&mut self.spi, &mut self.delay),
        }
        .map_err(Error::spi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::spi::Operation;
    use image::Rgb;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records every byte written
    #[derive(Clone, Default)]
    struct RecordingSpi(Rc<RefCell<Vec<u8>>>);

    impl embedded_hal::spi::ErrorType for RecordingSpi {
        type Error = Infallible;
    }

    impl SpiDevice for RecordingSpi {
        fn transaction(
            &mut self,
            operations: &mut [Operation<'_, u8>],
        ) -> core::result::Result<(), Infallible> {
            for op in operations {
                if let Operation::Write(data) = op {
                    self.0.borrow_mut().extend_from_slice(data);
                }
            }
            Ok(())
        }
    }

    /// Busy line that flips on every read so that both
    /// "wait for high" and "wait for low" loops end
    #[derive(Default)]
    struct TogglingPin(bool);

    impl embedded_hal::digital::ErrorType for TogglingPin {
        type Error = Infallible;
    }

    impl InputPin for TogglingPin {
        fn is_high(&mut self) -> core::result::Result<bool, Infallible> {
            self.0 = !self.0;
            Ok(self.0)
        }

        fn is_low(&mut self) -> core::result::Result<bool, Infallible> {
            self.is_high().map(|high| !high)
        }
    }

    struct NoopPin;

    impl embedded_hal::digital::ErrorType for NoopPin {
        type Error = Infallible;
    }

    impl OutputPin for NoopPin {
        fn set_low(&mut self) -> core::result::Result<(), Infallible> {
            Ok(())
        }

        fn set_high(&mut self) -> core::result::Result<(), Infallible> {
            Ok(())
        }
    }

    struct NoopDelay;

    impl DelayNs for NoopDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    fn connect(
        model: Model,
    ) -> (
        Inky<RecordingSpi, TogglingPin, NoopPin, NoopPin, NoopDelay>,
        Rc<RefCell<Vec<u8>>>,
    ) {
        let spi = RecordingSpi::default();
        let written = spi.0.clone();
        let inky = Inky::new(
            model,
            spi,
            TogglingPin::default(),
            NoopPin,
            NoopPin,
            NoopDelay,
        )
        .unwrap();
        (inky, written)
    }

    #[test]
    fn new_initialises_controller() {
        for model in [Model::Impression5in7, Model::Impression7in3] {
            let (inky, written) = connect(model);
            assert_eq!(inky.model(), model);
            assert_eq!(inky.resolution(), model.resolution());
            assert!(!written.borrow().is_empty());
        }
    }

    #[test]
    fn show_sends_frame() {
        let (mut inky, written) = connect(Model::Impression5in7);
        let (width, height) = inky.resolution();

        let mut image = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));
        for x in 0..width {
            image.put_pixel(x, 0, Rgb([255, 0, 0]));
        }
        inky.set_image(&image, Saturation::new(0.0).unwrap()).unwrap();

        written.borrow_mut().clear();
        inky.show().unwrap();

        let written = written.borrow();
        let frame = inky.frame().buffer();
        assert!(written.len() > frame.len());
        assert!(written.windows(frame.len()).any(|w| w == frame));
        assert_eq!(
            frame[0],
            OctColor::colors_byte(OctColor::Red, OctColor::Red)
        );
    }

    #[test]
    fn fill_then_show() {
        let (mut inky, written) = connect(Model::Impression7in3);
        inky.fill(OctColor::HiZ);
        written.borrow_mut().clear();
        inky.show().unwrap();

        let clean = OctColor::colors_byte(OctColor::HiZ, OctColor::HiZ);
        let run = written.borrow().iter().filter(|&&b| b == clean).count();
        assert!(run >= inky.frame().buffer().len());
    }

    #[test]
    fn sleep_and_wake_up() {
        let (mut inky, _written) = connect(Model::Impression5in7);
        inky.sleep().unwrap();
        inky.wake_up().unwrap();
        inky.show().unwrap();
    }
}
