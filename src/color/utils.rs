use core::fmt::Write;

use heapless::String;

use crate::color::Rgb;

/// Maximum length of a `r,g,b` triple
pub const RGB_STRING_SIZE: usize = 11;

/// Map a position on the 0..=255 wheel to a color.
///
/// The colors are a transition from red to green to blue and back to red.
pub fn wheel(pos: u8) -> Rgb {
    match pos {
        0..85 => Rgb {
            r: pos * 3,
            g: 255 - pos * 3,
            b: 0,
        },
        85..170 => {
            let pos = pos - 85;
            Rgb {
                r: 255 - pos * 3,
                g: 0,
                b: pos * 3,
            }
        }
        _ => {
            let pos = pos - 170;
            Rgb {
                r: 0,
                g: pos * 3,
                b: 255 - pos * 3,
            }
        }
    }
}

/// Scale every channel by `brightness`, truncating toward zero.
///
/// Brightness is clamped to `0.0..=1.0`.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn scale_brightness(color: Rgb, brightness: f32) -> Rgb {
    let brightness = brightness.clamp(0.0, 1.0);
    let scale = |c: u8| (f32::from(c) * brightness) as u8;
    Rgb {
        r: scale(color.r),
        g: scale(color.g),
        b: scale(color.b),
    }
}

/// Linear interpolation between two colors
///
/// # Arguments
/// * `a` - Start color (ratio 0.0)
/// * `b` - End color (ratio 1.0)
/// * `ratio` - Position between the colors, clamped to `0.0..=1.0`
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn lerp_colors(a: Rgb, b: Rgb, ratio: f32) -> Rgb {
    let ratio = ratio.clamp(0.0, 1.0);
    let lerp = |from: u8, to: u8| {
        let from = f32::from(from);
        (from + ratio * (f32::from(to) - from)) as u8
    };
    Rgb {
        r: lerp(a.r, b.r),
        g: lerp(a.g, b.g),
        b: lerp(a.b, b.b),
    }
}

/// Parse a `r,g,b` triple of decimal bytes.
///
/// Whitespace around each component is ignored.
pub fn parse_rgb(value: &str) -> Option<Rgb> {
    let mut parts = value.split(',');
    let mut next = || parts.next()?.trim().parse::<u8>().ok();
    let color = Rgb {
        r: next()?,
        g: next()?,
        b: next()?,
    };
    if parts.next().is_some() {
        return None;
    }
    Some(color)
}

/// Format a color as a `r,g,b` triple.
pub fn format_rgb(color: Rgb) -> String<RGB_STRING_SIZE> {
    let mut out = String::new();
    let _ = write!(out, "{},{},{}", color.r, color.g, color.b);
    out
}
