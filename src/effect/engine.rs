//! Effect engine
//!
//! Reads the light state once per frame, picks the effect for the current
//! mode and renders one frame of it. A frame always waits at least once, so
//! the engine never starves the other tasks.

use embedded_hal_async::delay::DelayNs;
use log::{info, warn};

use super::{Canvas, FrameResult};
use crate::color::{BLACK, Rgb};
use crate::config::EFFECTS;
use crate::domain::entity::Mode;
use crate::domain::ports::{LedSink, RandomSource};
use crate::infrastructure::context::DeviceContext;

/// Outcome of one rendered frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    /// Mode the frame was rendered for, `Off` while brightness is zero
    pub mode: Mode,
    /// The frame was cut short by a state change
    pub interrupted: bool,
}

pub struct EffectEngine<'a, L, D, R> {
    context: &'a DeviceContext,
    leds: L,
    delay: D,
    rng: R,
    last_applied_mode: Option<Mode>,
}

impl<'a, L, D, R> EffectEngine<'a, L, D, R>
where
    L: LedSink,
    D: DelayNs,
    R: RandomSource,
{
    pub fn new(context: &'a DeviceContext, leds: L, delay: D, rng: R) -> Self {
        Self {
            context,
            leds,
            delay,
            rng,
            last_applied_mode: None,
        }
    }

    pub fn leds(&self) -> &L {
        &self.leds
    }

    /// Mode of the last rendered frame
    pub fn last_applied_mode(&self) -> Option<&Mode> {
        self.last_applied_mode.as_ref()
    }

    pub async fn run(&mut self) {
        loop {
            self.render_frame().await;
        }
    }

    /// Render exactly one frame of the current effect
    pub async fn render_frame(&mut self) -> FrameReport {
        let light = &self.context.light;
        let (state, generation) = light.snapshot();
        let mode = if state.is_on() {
            state.mode.clone()
        } else {
            Mode::Off
        };

        if self.last_applied_mode.as_ref() != Some(&mode) {
            match &mode {
                Mode::Unknown(name) => warn!("effect: unknown effect {}, strip blanked", name),
                _ => info!("effect: switching to {}", mode.as_str()),
            }
            self.context.status.set_label(mode.label());
            self.last_applied_mode = Some(mode.clone());
        }

        let guard = light.token(generation);
        let rng = &mut self.rng;
        let mut canvas = Canvas::new(&mut self.leds, &mut self.delay, &guard);
        let brightness = state.brightness;

        let result: FrameResult = match &mode {
            Mode::Off => {
                super::static_color(&mut canvas, BLACK, 0.0, EFFECTS.base_tick_ms).await
            }
            Mode::Unknown(_) => {
                super::static_color(&mut canvas, BLACK, 0.0, EFFECTS.idle_frame_ms).await
            }
            Mode::Static => {
                super::static_color(&mut canvas, state.rgb, brightness, EFFECTS.idle_frame_ms)
                    .await
            }
            Mode::Breathing => super::breathing(&mut canvas, state.rgb, brightness).await,
            Mode::Flashing => super::flash(&mut canvas, brightness, || state.rgb).await,
            Mode::RandomFlash => {
                super::flash(&mut canvas, brightness, || random_color(&mut *rng)).await
            }
            Mode::Rainbow => super::rainbow(&mut canvas, brightness).await,
            Mode::Watercolor => super::watercolor(&mut canvas, brightness).await,
        };

        FrameReport {
            mode,
            interrupted: result.is_err(),
        }
    }
}

/// Three independent uniform channel draws
pub(crate) fn random_color(rng: &mut impl RandomSource) -> Rgb {
    Rgb {
        r: rng.next_u8(),
        g: rng.next_u8(),
        b: rng.next_u8(),
    }
}
