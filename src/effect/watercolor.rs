use embedded_hal_async::delay::DelayNs;

use super::{Canvas, FrameGuard, FrameResult};
use crate::color::{Rgb, WHITE, lerp_colors, scale_brightness};
use crate::config::EFFECTS;
use crate::domain::ports::LedSink;

const CYAN: Rgb = Rgb { r: 0, g: 255, b: 255 };
const MAGENTA: Rgb = Rgb { r: 255, g: 0, b: 255 };
const YELLOW: Rgb = Rgb { r: 255, g: 255, b: 0 };

const BASE_PALETTE: [Rgb; 6] = [WHITE, CYAN, WHITE, MAGENTA, WHITE, YELLOW];

const PALETTE_SIZE: usize = BASE_PALETTE.len() * EFFECTS.watercolor_repeat;

/// Base palette with every entry repeated
pub fn palette() -> [Rgb; PALETTE_SIZE] {
    core::array::from_fn(|i| BASE_PALETTE[i / EFFECTS.watercolor_repeat])
}

/// Palette index for pixel `index` at step `step`.
///
/// Walks the palette forward and then back, so the pattern mirrors every
/// `PALETTE_SIZE` pixels.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss
)]
pub(crate) fn palette_index(index: usize, step: i32) -> usize {
    let size = PALETTE_SIZE as i32;
    let position = (index as i32 + step).rem_euclid(size * 2);
    if position >= size {
        (size - 1 - (position - size)) as usize
    } else {
        position as usize
    }
}

/// CMY watercolor wash drifting across the strip
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss
)]
pub async fn render<L, D, G>(canvas: &mut Canvas<'_, L, D, G>, brightness: f32) -> FrameResult
where
    L: LedSink,
    D: DelayNs,
    G: FrameGuard,
{
    let len = canvas.len();
    if len == 0 {
        canvas.wait_ms(EFFECTS.watercolor_step_ms).await;
        return Ok(());
    }

    let colors = palette();
    let span = len as i32 * 2;

    for step in -span..span {
        let ratio = step.unsigned_abs() as f32 / span as f32;
        for index in 0..len {
            let current = palette_index(index, step);
            let next = (current + 1) % PALETTE_SIZE;
            let color = lerp_colors(colors[current], colors[next], ratio);
            canvas.set(index, scale_brightness(color, brightness));
        }
        canvas.show()?;
        canvas.wait_ms(EFFECTS.watercolor_step_ms).await;
    }
    Ok(())
}
