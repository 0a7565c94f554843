use embedded_hal_async::delay::DelayNs;

use super::{Canvas, FrameGuard, FrameResult};
use crate::color::{BLACK, Rgb, scale_brightness};
use crate::config::EFFECTS;
use crate::domain::ports::LedSink;

/// A burst of short flashes
///
/// `next_color` is asked once per flash, so a fixed color gives the
/// `flashing` effect and a random one gives `random_flash`.
pub async fn render<L, D, G, F>(
    canvas: &mut Canvas<'_, L, D, G>,
    brightness: f32,
    mut next_color: F,
) -> FrameResult
where
    L: LedSink,
    D: DelayNs,
    G: FrameGuard,
    F: FnMut() -> Rgb,
{
    for _ in 0..EFFECTS.flash_count {
        canvas.fill(scale_brightness(next_color(), brightness));
        canvas.show()?;
        canvas.wait_ms(EFFECTS.flash_on_ms).await;

        canvas.fill(BLACK);
        canvas.show()?;
        canvas.wait_ms(EFFECTS.flash_off_ms).await;
    }
    Ok(())
}
