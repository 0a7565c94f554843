use esp_hal::gpio::interconnect::PeripheralOutput;
use esp_hal::peripherals::RMT;
use esp_hal::rmt::Rmt;
use esp_hal::time::Rate;
use esp_hal_smartled::{SmartLedsAdapter, buffer_size, smart_led_buffer};
use smart_leds::SmartLedsWrite;
use static_cell::make_static;

use power_stand::color::{BLACK, Rgb};
use power_stand::domain::error::OutputError;
use power_stand::domain::ports::LedSink;

/// Pixels on the stand strip
pub const LED_COUNT: usize = 30;

/// WS2812 strip driven by the RMT peripheral
pub struct EspLedStrip<'a> {
    adapter: SmartLedsAdapter<'a, { buffer_size(LED_COUNT) }>,
    pixels: [Rgb; LED_COUNT],
}

impl<'a> EspLedStrip<'a> {
    pub fn new<O>(rmt: RMT<'a>, pin: O) -> Result<Self, OutputError>
    where
        O: PeripheralOutput<'a>,
    {
        let rmt = Rmt::new(rmt, Rate::from_mhz(80)).map_err(|_| OutputError::DriverError)?;
        let rmt_buffer = make_static!(smart_led_buffer!(LED_COUNT));
        let adapter = SmartLedsAdapter::new(rmt.channel0, pin, rmt_buffer);

        Ok(Self {
            adapter,
            pixels: [BLACK; LED_COUNT],
        })
    }
}

impl LedSink for EspLedStrip<'_> {
    fn len(&self) -> usize {
        LED_COUNT
    }

    fn write(&mut self, index: usize, color: Rgb) {
        if let Some(pixel) = self.pixels.get_mut(index) {
            *pixel = color;
        }
    }

    fn flush(&mut self) -> Result<(), OutputError> {
        let pixels = self.pixels;
        critical_section::with(|_| self.adapter.write(pixels.iter().copied()))
            .map_err(|_| OutputError::DriverError)
    }
}
