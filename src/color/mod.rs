mod kelvin;
mod utils;

use smart_leds::RGB8;

pub use kelvin::{color_temperature_to_rgb, kelvin_to_rgb};
pub use utils::{format_rgb, lerp_colors, parse_rgb, scale_brightness, wheel};

pub type Rgb = RGB8;

pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
pub const WHITE: Rgb = Rgb {
    r: 255,
    g: 255,
    b: 255,
};
