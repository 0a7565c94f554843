use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::mono_font::ascii::{FONT_6X10, FONT_10X20};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::{Point as GfxPoint, Primitive, Size};
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use embedded_graphics::Drawable;
use esp_hal::Blocking;
use esp_hal::i2c::master::I2c;
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::{I2CDisplayInterface, Ssd1306};

use power_stand::domain::error::OutputError;
use power_stand::domain::ports::{DisplaySink, Point, Rect, TextSize};

type Display<'a> = Ssd1306<
    I2CInterface<I2c<'a, Blocking>>,
    DisplaySize128x64,
    BufferedGraphicsMode<DisplaySize128x64>,
>;

/// 128x64 SSD1306 panel on I2C
pub struct OledPanel<'a> {
    display: Display<'a>,
}

impl<'a> OledPanel<'a> {
    pub fn new(i2c: I2c<'a, Blocking>) -> Result<Self, OutputError> {
        let interface = I2CDisplayInterface::new(i2c);
        let mut display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();
        display.init().map_err(|_| OutputError::DriverError)?;
        Ok(Self { display })
    }
}

fn point(position: Point) -> GfxPoint {
    GfxPoint::new(position.x, position.y)
}

impl DisplaySink for OledPanel<'_> {
    fn clear_region(&mut self, region: Rect) -> Result<(), OutputError> {
        Rectangle::new(point(region.origin), Size::new(region.width, region.height))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::Off))
            .draw(&mut self.display)
            .map_err(|_| OutputError::DriverError)
    }

    fn draw_text(&mut self, text: &str, position: Point, size: TextSize) -> Result<(), OutputError> {
        let font = match size {
            TextSize::Normal => &FONT_6X10,
            TextSize::Large => &FONT_10X20,
        };
        let style = MonoTextStyle::new(font, BinaryColor::On);
        Text::with_baseline(text, point(position), style, Baseline::Top)
            .draw(&mut self.display)
            .map(|_| ())
            .map_err(|_| OutputError::DriverError)
    }

    fn flush(&mut self) -> Result<(), OutputError> {
        self.display.flush().map_err(|_| OutputError::DriverError)
    }
}

/// The panel, or nothing when it did not answer at boot
pub enum StatusPanel<'a> {
    Oled(OledPanel<'a>),
    Missing,
}

impl DisplaySink for StatusPanel<'_> {
    fn clear_region(&mut self, region: Rect) -> Result<(), OutputError> {
        match self {
            StatusPanel::Oled(panel) => panel.clear_region(region),
            StatusPanel::Missing => Ok(()),
        }
    }

    fn draw_text(&mut self, text: &str, position: Point, size: TextSize) -> Result<(), OutputError> {
        match self {
            StatusPanel::Oled(panel) => panel.draw_text(text, position, size),
            StatusPanel::Missing => Ok(()),
        }
    }

    fn flush(&mut self) -> Result<(), OutputError> {
        match self {
            StatusPanel::Oled(panel) => panel.flush(),
            StatusPanel::Missing => Ok(()),
        }
    }
}
