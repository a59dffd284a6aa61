// src/pixels.rs
//! Pixel buffer and marker types shared by the coordinator and the echo worker.
//!
//! ## Layout
//!
//! A pixel buffer is `width * height * 4` bytes, RGBA per pixel, row-major.
//! Row order is whatever the backend's readback produces:
//!
//! - 2D canvas: first row is the top of the surface
//! - WebGL2: first row is the bottom of the surface
//!
//! ## Marker
//!
//! Before a buffer leaves the coordinator, one of the first two bytes is
//! overwritten with [`SENTINEL`]. Which one is decided by the [`Marker`],
//! which flips on every drawn frame.

use std::fmt;

/// Owned RGBA pixel storage. Moving the box is a zero-copy transfer.
pub type PixelBuffer = Box<[u8]>;

/// Bytes per RGBA pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// Byte value written at the marker offset.
pub const SENTINEL: u8 = 255;

/// Length in bytes of a buffer for a `width` x `height` surface.
pub fn buffer_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * BYTES_PER_PIXEL
}

/// Allocates a zeroed buffer for a `width` x `height` surface.
pub fn allocate(width: u32, height: u32) -> PixelBuffer {
    vec![0u8; buffer_len(width, height)].into_boxed_slice()
}

/// Single-bit round-trip token. Its value is also the byte offset of the sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Marker {
    #[default]
    Zero,
    One,
}

impl Marker {
    /// The other marker value.
    pub fn toggled(self) -> Self {
        match self {
            Marker::Zero => Marker::One,
            Marker::One => Marker::Zero,
        }
    }

    /// Byte offset the sentinel is written to.
    pub fn offset(self) -> usize {
        match self {
            Marker::Zero => 0,
            Marker::One => 1,
        }
    }

    /// True if a scanned sentinel location designates this marker.
    pub fn matches(self, pixel_location: Option<usize>) -> bool {
        pixel_location == Some(self.offset())
    }

    /// Writes the sentinel at this marker's offset.
    ///
    /// Buffers shorter than two bytes cannot carry a marker; they are left untouched.
    pub fn stamp(self, pixels: &mut [u8]) {
        if let Some(byte) = pixels.get_mut(self.offset()) {
            *byte = SENTINEL;
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.offset())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_len_matches_rgba_layout() {
        assert_eq!(buffer_len(1920, 1080), 8_294_400);
        assert_eq!(buffer_len(0, 1080), 0);
        assert_eq!(allocate(2, 3).len(), 24);
    }

    #[test]
    fn marker_toggles_between_both_offsets() {
        assert_eq!(Marker::Zero.toggled(), Marker::One);
        assert_eq!(Marker::One.toggled(), Marker::Zero);
        assert_eq!(Marker::Zero.offset(), 0);
        assert_eq!(Marker::One.offset(), 1);
    }

    #[test]
    fn stamp_writes_only_the_marker_offset() {
        let mut pixels = [0u8; 8];
        Marker::One.stamp(&mut pixels);
        assert_eq!(pixels, [0, SENTINEL, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn matches_requires_exact_location() {
        assert!(Marker::One.matches(Some(1)));
        assert!(!Marker::One.matches(Some(0)));
        assert!(!Marker::Zero.matches(None));
    }
}
