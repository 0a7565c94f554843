//! Integration tests for the effect engine and the effect renderers.

mod common;

use common::{CounterRng, MockDelay, RecordingStrip, context, context_with};
use embassy_futures::block_on;
use power_stand::color::{BLACK, Rgb};
use power_stand::controllers::CommandRouter;
use power_stand::domain::entity::{DeviceState, Mode};
use power_stand::effect::{Canvas, EffectEngine, FrameGuard, watercolor_palette};

const STRIP_LEN: usize = 10;

struct Always;

impl FrameGuard for Always {
    fn is_current(&self) -> bool {
        true
    }
}

fn state(mode: Mode) -> DeviceState {
    let mut state = DeviceState::new();
    state.mode = mode;
    state.rgb = Rgb { r: 10, g: 20, b: 30 };
    state
}

// -----------------------------------------------------------------------------
// Frame shapes
// -----------------------------------------------------------------------------

#[test]
fn static_frame_is_one_flush() {
    let context = context_with(state(Mode::Static));
    let mut engine = EffectEngine::new(
        &context,
        RecordingStrip::new(STRIP_LEN),
        MockDelay::new(),
        CounterRng(0),
    );

    let report = block_on(engine.render_frame());

    assert_eq!(report.mode, Mode::Static);
    assert!(!report.interrupted);
    assert_eq!(engine.leds().flushes.len(), 1);
    assert_eq!(
        engine.leds().last_flush().unwrap(),
        &[Rgb { r: 10, g: 20, b: 30 }; STRIP_LEN]
    );
}

#[test]
fn static_frame_applies_brightness() {
    let mut initial = state(Mode::Static);
    initial.brightness = 0.5;
    let context = context_with(initial);
    let mut engine = EffectEngine::new(
        &context,
        RecordingStrip::new(STRIP_LEN),
        MockDelay::new(),
        CounterRng(0),
    );

    block_on(engine.render_frame());

    assert_eq!(
        engine.leds().last_flush().unwrap(),
        &[Rgb { r: 5, g: 10, b: 15 }; STRIP_LEN]
    );
}

#[test]
fn zero_brightness_renders_off() {
    let mut initial = state(Mode::Rainbow);
    initial.brightness = 0.0;
    let context = context_with(initial);
    let mut engine = EffectEngine::new(
        &context,
        RecordingStrip::new(STRIP_LEN),
        MockDelay::new(),
        CounterRng(0),
    );

    let report = block_on(engine.render_frame());

    assert_eq!(report.mode, Mode::Off);
    assert_eq!(engine.leds().last_flush().unwrap(), &[BLACK; STRIP_LEN]);
    assert_eq!(context.status.lines().label.as_str(), "Light Off");
}

#[test]
fn rainbow_frame_walks_the_whole_wheel() {
    let context = context();
    let mut engine = EffectEngine::new(
        &context,
        RecordingStrip::new(STRIP_LEN),
        MockDelay::new(),
        CounterRng(0),
    );

    let report = block_on(engine.render_frame());

    assert_eq!(report.mode, Mode::Rainbow);
    assert_eq!(engine.leds().flushes.len(), 255);
    assert_eq!(context.status.lines().label.as_str(), "Rainbow");
}

#[test]
fn breathing_frame_has_hundred_steps() {
    let context = context_with(state(Mode::Breathing));
    let mut engine = EffectEngine::new(
        &context,
        RecordingStrip::new(STRIP_LEN),
        MockDelay::new(),
        CounterRng(0),
    );

    block_on(engine.render_frame());

    let flushes = &engine.leds().flushes;
    assert_eq!(flushes.len(), 100);
    // sin(0) is the midpoint, sin(pi/2) the peak
    assert_eq!(flushes[0][0], Rgb { r: 4, g: 9, b: 14 });
    assert_eq!(flushes[25][0], Rgb { r: 10, g: 20, b: 30 });
}

#[test]
fn flashing_frame_alternates_color_and_black() {
    let context = context_with(state(Mode::Flashing));
    let mut engine = EffectEngine::new(
        &context,
        RecordingStrip::new(STRIP_LEN),
        MockDelay::new(),
        CounterRng(0),
    );

    block_on(engine.render_frame());

    let flushes = &engine.leds().flushes;
    assert_eq!(flushes.len(), 10);
    for (i, frame) in flushes.iter().enumerate() {
        let expected = if i % 2 == 0 {
            Rgb { r: 10, g: 20, b: 30 }
        } else {
            BLACK
        };
        assert_eq!(frame[0], expected);
    }
}

#[test]
fn random_flash_draws_a_color_per_flash() {
    let context = context_with(state(Mode::RandomFlash));
    let mut engine = EffectEngine::new(
        &context,
        RecordingStrip::new(STRIP_LEN),
        MockDelay::new(),
        CounterRng(0),
    );

    block_on(engine.render_frame());

    let flushes = &engine.leds().flushes;
    assert_eq!(flushes[0][0], Rgb { r: 1, g: 2, b: 3 });
    assert_eq!(flushes[1][0], BLACK);
    assert_eq!(flushes[2][0], Rgb { r: 4, g: 5, b: 6 });
}

#[test]
fn watercolor_frame_spans_four_strip_lengths() {
    let context = context_with(state(Mode::Watercolor));
    let mut engine = EffectEngine::new(
        &context,
        RecordingStrip::new(STRIP_LEN),
        MockDelay::new(),
        CounterRng(0),
    );

    block_on(engine.render_frame());

    assert_eq!(engine.leds().flushes.len(), STRIP_LEN * 4);
}

#[test]
fn watercolor_palette_repeats_each_color() {
    let palette = watercolor_palette();
    assert_eq!(palette.len(), 36);
    assert_eq!(palette[0], Rgb { r: 255, g: 255, b: 255 });
    assert_eq!(palette[5], Rgb { r: 255, g: 255, b: 255 });
    assert_eq!(palette[6], Rgb { r: 0, g: 255, b: 255 });
    assert_eq!(palette[35], Rgb { r: 255, g: 255, b: 0 });
}

#[test]
fn unknown_effect_blanks_the_strip() {
    let context = context();
    CommandRouter::new(&context)
        .handle(&common::topic("/effect"), b"pulse99")
        .unwrap();
    let mut engine = EffectEngine::new(
        &context,
        RecordingStrip::new(STRIP_LEN),
        MockDelay::new(),
        CounterRng(0),
    );

    let report = block_on(engine.render_frame());

    assert!(matches!(report.mode, Mode::Unknown(_)));
    assert_eq!(engine.leds().last_flush().unwrap(), &[BLACK; STRIP_LEN]);
    assert_eq!(context.status.lines().label.as_str(), "Unknown");
}

// -----------------------------------------------------------------------------
// Interruption
// -----------------------------------------------------------------------------

#[test]
fn rgb_command_interrupts_rainbow_within_one_flush() {
    let context = context();
    let ctx = &context;
    let delay = MockDelay::with_hook(3, move || {
        CommandRouter::new(ctx)
            .handle(&common::topic("/rgb"), b"10,20,30")
            .unwrap();
    });
    let mut engine =
        EffectEngine::new(&context, RecordingStrip::new(STRIP_LEN), delay, CounterRng(0));

    let report = block_on(engine.render_frame());
    assert_eq!(report.mode, Mode::Rainbow);
    assert!(report.interrupted);
    assert_eq!(engine.leds().flushes.len(), 3);

    let report = block_on(engine.render_frame());
    assert_eq!(report.mode, Mode::Static);
    assert_eq!(engine.leds().flushes.len(), 4);
    assert_eq!(
        engine.leds().last_flush().unwrap(),
        &[Rgb { r: 10, g: 20, b: 30 }; STRIP_LEN]
    );
    assert_eq!(engine.last_applied_mode(), Some(&Mode::Static));
}

#[test]
fn off_command_interrupts_flashing() {
    let context = context_with(state(Mode::Flashing));
    let ctx = &context;
    let delay = MockDelay::with_hook(1, move || {
        CommandRouter::new(ctx)
            .handle(&common::topic("/set"), b"OFF")
            .unwrap();
    });
    let mut engine =
        EffectEngine::new(&context, RecordingStrip::new(STRIP_LEN), delay, CounterRng(0));

    let report = block_on(engine.render_frame());
    assert!(report.interrupted);
    assert_eq!(engine.leds().flushes.len(), 1);

    let report = block_on(engine.render_frame());
    assert_eq!(report.mode, Mode::Off);
    assert_eq!(engine.leds().last_flush().unwrap(), &[BLACK; STRIP_LEN]);
}

#[test]
fn brightness_change_does_not_interrupt() {
    let context = context_with(state(Mode::Breathing));
    let ctx = &context;
    let delay = MockDelay::with_hook(10, move || {
        CommandRouter::new(ctx)
            .handle(&common::topic("/brightness"), b"50")
            .unwrap();
    });
    let mut engine =
        EffectEngine::new(&context, RecordingStrip::new(STRIP_LEN), delay, CounterRng(0));

    let report = block_on(engine.render_frame());

    assert!(!report.interrupted);
    assert_eq!(engine.leds().flushes.len(), 100);
}

#[test]
fn stale_guard_stops_before_the_first_flush() {
    let context = context();
    let generation = context.light.generation();
    context.light.update(|state| state.mode = Mode::Static);
    let guard = context.light.token(generation);

    let mut strip = RecordingStrip::new(STRIP_LEN);
    let mut delay = MockDelay::new();
    let mut canvas = Canvas::new(&mut strip, &mut delay, &guard);

    assert!(block_on(power_stand::effect::rainbow(&mut canvas, 1.0)).is_err());
    assert!(strip.flushes.is_empty());
}

#[test]
fn current_guard_lets_static_render() {
    let mut strip = RecordingStrip::new(3);
    let mut delay = MockDelay::new();
    let mut canvas = Canvas::new(&mut strip, &mut delay, &Always);

    let result = block_on(power_stand::effect::static_color(
        &mut canvas,
        Rgb { r: 200, g: 100, b: 50 },
        0.5,
        20,
    ));

    assert!(result.is_ok());
    assert_eq!(delay.waits_ms, vec![20]);
    assert_eq!(strip.flushes, vec![vec![Rgb { r: 100, g: 50, b: 25 }; 3]]);
}
