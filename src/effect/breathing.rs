use core::f32::consts::PI;

use embedded_hal_async::delay::DelayNs;

use super::{Canvas, FrameGuard, FrameResult};
use crate::color::{Rgb, scale_brightness};
use crate::config::EFFECTS;
use crate::domain::ports::LedSink;

/// Sine-modulated level of one breathing step, `0..=255`
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub(crate) fn level(step: u32, steps: u32, brightness: f32) -> u8 {
    let phase = 2.0 * PI * step as f32 / steps as f32;
    (brightness * 0.5 * (1.0 + libm::sinf(phase)) * 255.0) as u8
}

/// One full inhale and exhale of `color`
pub async fn render<L, D, G>(
    canvas: &mut Canvas<'_, L, D, G>,
    color: Rgb,
    brightness: f32,
) -> FrameResult
where
    L: LedSink,
    D: DelayNs,
    G: FrameGuard,
{
    let steps = EFFECTS.breathing_steps;
    let step_ms = EFFECTS.breathing_duration_ms / steps;

    for step in 0..steps {
        let level = level(step, steps, brightness);
        canvas.fill(scale_brightness(color, f32::from(level) / 255.0));
        canvas.show()?;
        canvas.wait_ms(step_ms).await;
    }
    Ok(())
}
