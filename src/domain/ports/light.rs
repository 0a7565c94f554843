use crate::color::Rgb;
use crate::domain::error::OutputError;

/// Addressable LED strip
///
/// Writes land in a pixel buffer; nothing is shown until [`LedSink::flush`].
pub trait LedSink {
    /// Number of pixels on the strip
    fn len(&self) -> usize;

    /// Set one pixel in the buffer, out of range indexes are ignored
    fn write(&mut self, index: usize, color: Rgb);

    /// Push the buffer to the strip
    fn flush(&mut self) -> Result<(), OutputError>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Set every pixel in the buffer
    fn fill(&mut self, color: Rgb) {
        for index in 0..self.len() {
            self.write(index, color);
        }
    }
}

/// Source of uniformly distributed random numbers
pub trait RandomSource {
    fn next_u32(&mut self) -> u32;

    /// Uniform byte
    #[allow(clippy::cast_possible_truncation)]
    fn next_u8(&mut self) -> u8 {
        (self.next_u32() >> 24) as u8
    }
}
