use super::Rgb;

/// Values below this are read as mireds, the rest as Kelvin.
///
/// A heuristic: 1000 mireds is 1000 K, so both readings meet here.
pub const MIREDS_THRESHOLD: u32 = 1000;

/// Convert a color temperature command value to an RGB color.
///
/// Values under [`MIREDS_THRESHOLD`] are mireds (`1e6 / value` Kelvin),
/// larger values are Kelvin. Returns `None` for zero.
pub fn color_temperature_to_rgb(value: u32) -> Option<Rgb> {
    if value == 0 {
        return None;
    }
    let kelvin = if value < MIREDS_THRESHOLD {
        1_000_000.0 / f64::from(value)
    } else {
        f64::from(value)
    };
    Some(kelvin_to_rgb(kelvin))
}

/// Convert a Kelvin temperature to an RGB color
///
/// Every channel is clamped to `0..=255` and truncated.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn kelvin_to_rgb(kelvin: f64) -> Rgb {
    let temp = kelvin / 100.0;

    let red = if temp <= 66.0 {
        255.0
    } else {
        329.698_727_446 * libm::pow(temp - 60.0, -0.133_204_759_2)
    };

    let green = if temp <= 66.0 {
        99.470_802_586_1 * libm::log(temp) - 161.119_568_166_1
    } else {
        288.122_169_528_3 * libm::pow(temp - 60.0, -0.075_514_849_2)
    };

    let blue = if temp >= 66.0 {
        255.0
    } else if temp <= 19.0 {
        0.0
    } else {
        138.517_731_223_1 * libm::log(temp - 10.0) - 305.044_792_730_7
    };

    let channel = |value: f64| value.clamp(0.0, 255.0) as u8;

    Rgb {
        r: channel(red),
        g: channel(green),
        b: channel(blue),
    }
}
