use core::fmt::Write;

use embassy_time::{Duration, Ticker};
use heapless::String;
use log::debug;

use crate::config::{DEVICE, DISPLAY};
use crate::domain::error::OutputError;
use crate::domain::ports::{DisplaySink, Point, Rect, TextSize};
use crate::infrastructure::context::DeviceContext;

/// Width of one glyph of the normal font
const GLYPH_WIDTH: u32 = 8;

const LABEL_Y: i32 = 0;
const TIME_POSITION: Point = Point::new(28, 16);
const TIME_REGION: Rect = Rect::new(28, 12, 72, 24);
const DATE_POSITION: Point = Point::new(16, 48);
const DATE_REGION: Rect = Rect::new(16, 48, 96, 8);
const NETWORK_POSITION: Point = Point::new(16, 56);
const NETWORK_REGION: Rect = Rect::new(16, 56, 96, 8);

/// Renders the status panel once a second
pub struct StatusDisplay<'a, P> {
    context: &'a DeviceContext,
    panel: P,
}

impl<'a, P: DisplaySink> StatusDisplay<'a, P> {
    pub fn new(context: &'a DeviceContext, panel: P) -> Self {
        Self { context, panel }
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    /// Boot screen with name, model and firmware version
    pub fn splash(&mut self) -> Result<(), OutputError> {
        let mut version: String<24> = String::new();
        let _ = write!(version, "v{}", DEVICE.sw_version);

        self.panel
            .clear_region(Rect::new(0, 0, DISPLAY.width, 64))?;
        self.panel
            .draw_text(DEVICE.manufacturer, Point::new(38, 4), TextSize::Normal)?;
        self.panel
            .draw_text(DEVICE.model, Point::new(38, 16), TextSize::Normal)?;
        self.panel
            .draw_text(&version, Point::new(38, 28), TextSize::Normal)?;
        self.panel
            .draw_text("STARTING ...", Point::new(16, 40), TextSize::Normal)?;
        self.panel.flush()
    }

    /// Redraw label, clock, date and network line
    pub fn refresh(&mut self) -> Result<(), OutputError> {
        let lines = self.context.status.lines();
        let (time, date) = self.context.clock.display_strings();

        self.panel
            .clear_region(Rect::new(0, LABEL_Y, DISPLAY.width, GLYPH_WIDTH))?;
        self.panel.draw_text(
            &lines.label,
            Point::new(centered_x(lines.label.len()), LABEL_Y),
            TextSize::Normal,
        )?;

        self.panel.clear_region(TIME_REGION)?;
        self.panel
            .draw_text(&time, TIME_POSITION, TextSize::Large)?;

        self.panel.clear_region(DATE_REGION)?;
        self.panel
            .draw_text(&date, DATE_POSITION, TextSize::Normal)?;

        self.panel.clear_region(NETWORK_REGION)?;
        self.panel
            .draw_text(&lines.network, NETWORK_POSITION, TextSize::Normal)?;

        self.panel.flush()
    }

    pub async fn run(&mut self) {
        let mut ticker = Ticker::every(Duration::from_millis(DISPLAY.refresh_ms));
        loop {
            if let Err(e) = self.refresh() {
                debug!("display: refresh failed: {}", e);
            }
            ticker.next().await;
        }
    }
}

/// X offset that centers `chars` normal glyphs on the panel
pub fn centered_x(chars: usize) -> i32 {
    let text_width = (chars as u32).saturating_mul(GLYPH_WIDTH);
    (DISPLAY.width.saturating_sub(text_width) / 2) as i32
}
