//! Interruptible LED effects
//!
//! Every effect renders one frame as a sequence of LED flushes separated by
//! cooperative waits. Before each flush the effect checks its
//! [`FrameGuard`]; once the light state moved on, the rest of the frame is
//! dropped and [`Interrupted`] bubbles up to the engine.

mod breathing;
mod engine;
mod flash;
mod rainbow;
mod static_color;
mod watercolor;

pub use breathing::render as breathing;
pub use engine::{EffectEngine, FrameReport};
pub use flash::render as flash;
pub use rainbow::render as rainbow;
pub use static_color::render as static_color;
pub use watercolor::{palette as watercolor_palette, render as watercolor};

use embedded_hal_async::delay::DelayNs;
use log::debug;

use crate::color::Rgb;
use crate::domain::ports::LedSink;

/// Tells an effect whether the frame it renders is still wanted
pub trait FrameGuard {
    fn is_current(&self) -> bool;
}

/// The frame was abandoned because the light state changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interrupted;

pub type FrameResult = Result<(), Interrupted>;

/// LED output of a single frame
pub struct Canvas<'a, L, D, G> {
    leds: &'a mut L,
    delay: &'a mut D,
    guard: &'a G,
}

impl<'a, L, D, G> Canvas<'a, L, D, G>
where
    L: LedSink,
    D: DelayNs,
    G: FrameGuard,
{
    pub fn new(leds: &'a mut L, delay: &'a mut D, guard: &'a G) -> Self {
        Self { leds, delay, guard }
    }

    pub fn len(&self) -> usize {
        self.leds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leds.is_empty()
    }

    pub fn set(&mut self, index: usize, color: Rgb) {
        self.leds.write(index, color);
    }

    pub fn fill(&mut self, color: Rgb) {
        self.leds.fill(color);
    }

    /// Push the buffer to the strip unless the frame was superseded
    pub fn show(&mut self) -> FrameResult {
        if !self.guard.is_current() {
            return Err(Interrupted);
        }
        if let Err(e) = self.leds.flush() {
            debug!("effect: LED flush failed: {}", e);
        }
        Ok(())
    }

    pub async fn wait_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms).await;
    }
}
