use embedded_hal_async::delay::DelayNs;

use super::{Canvas, FrameGuard, FrameResult};
use crate::color::{Rgb, scale_brightness};
use crate::domain::ports::LedSink;

/// Fill the strip with one color and hold it for `hold_ms`
pub async fn render<L, D, G>(
    canvas: &mut Canvas<'_, L, D, G>,
    color: Rgb,
    brightness: f32,
    hold_ms: u32,
) -> FrameResult
where
    L: LedSink,
    D: DelayNs,
    G: FrameGuard,
{
    canvas.fill(scale_brightness(color, brightness));
    canvas.show()?;
    canvas.wait_ms(hold_ms).await;
    Ok(())
}
