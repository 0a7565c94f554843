use embedded_hal_async::delay::DelayNs;

use super::{Canvas, FrameGuard, FrameResult};
use crate::color::{scale_brightness, wheel};
use crate::config::EFFECTS;
use crate::domain::ports::LedSink;

/// Wheel position of pixel `index` at animation step `step`
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn wheel_position(index: usize, len: usize, step: u32) -> u8 {
    ((index * 256 / len + step as usize) & 0xFF) as u8
}

/// The whole hue wheel scrolled once across the strip
pub async fn render<L, D, G>(canvas: &mut Canvas<'_, L, D, G>, brightness: f32) -> FrameResult
where
    L: LedSink,
    D: DelayNs,
    G: FrameGuard,
{
    let len = canvas.len();
    for step in 0..EFFECTS.rainbow_steps {
        for index in 0..len {
            let color = wheel(wheel_position(index, len, step));
            canvas.set(index, scale_brightness(color, brightness));
        }
        canvas.show()?;
        canvas.wait_ms(EFFECTS.base_tick_ms).await;
    }
    Ok(())
}
