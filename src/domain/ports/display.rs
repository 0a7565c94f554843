use crate::domain::error::OutputError;

/// Point on the display, top-left origin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Rectangle on the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub origin: Point,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            origin: Point::new(x, y),
            width,
            height,
        }
    }
}

/// Font size for [`DisplaySink::draw_text`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSize {
    /// 8 px cell
    Normal,
    /// Large digits for the clock
    Large,
}

/// Monochrome status panel
pub trait DisplaySink {
    fn clear_region(&mut self, region: Rect) -> Result<(), OutputError>;

    fn draw_text(&mut self, text: &str, position: Point, size: TextSize) -> Result<(), OutputError>;

    fn flush(&mut self) -> Result<(), OutputError>;
}
