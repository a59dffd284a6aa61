// src/backend/webgl2.rs
//! Software WebGL2 drawing buffer.
//!
//! The buffer is stored top row first, as it appears on screen. Readback
//! follows `readPixels` semantics and returns rows bottom-up.

use super::{check_readback_len, BackendError, GraphicsKey, RenderBackend};
use crate::config::PowerPreference;
use crate::pixels::{self, BYTES_PER_PIXEL};
use log::trace;

pub struct Webgl2Context {
    width: u32,
    height: u32,
    drawing_buffer: Vec<u8>,
    power_preference: PowerPreference,
}

impl Webgl2Context {
    pub fn new(width: u32, height: u32, power_preference: PowerPreference) -> Self {
        Self {
            width,
            height,
            drawing_buffer: vec![0u8; pixels::buffer_len(width, height)],
            power_preference,
        }
    }

    pub fn power_preference(&self) -> PowerPreference {
        self.power_preference
    }

    /// Clear color for `frame`. Channels stay below 200 so a cleared buffer
    /// never contains the sentinel value in its color bytes.
    fn clear_color(frame: u64) -> [u8; 4] {
        let r = (frame * 3 % 200) as u8;
        let g = (frame * 5 % 200) as u8;
        let b = (frame * 7 % 200) as u8;
        [r, g, b, 0xFF]
    }
}

impl RenderBackend for Webgl2Context {
    fn kind(&self) -> GraphicsKey {
        GraphicsKey::Webgl2
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        if (width, height) != (self.width, self.height) {
            self.width = width;
            self.height = height;
            self.drawing_buffer = vec![0u8; pixels::buffer_len(width, height)];
        } else {
            self.drawing_buffer.fill(0);
        }
    }

    /// Clears the top half of the drawing buffer to a frame-dependent color,
    /// leaving the bottom half transparent black.
    fn draw(&mut self, frame: u64) {
        let color = Self::clear_color(frame);
        let stride = self.width as usize * BYTES_PER_PIXEL;
        if stride == 0 {
            return;
        }
        let top_rows = (self.height as usize).div_ceil(2);
        for row in self.drawing_buffer.chunks_exact_mut(stride).take(top_rows) {
            for px in row.chunks_exact_mut(BYTES_PER_PIXEL) {
                px.copy_from_slice(&color);
            }
        }
        trace!("Webgl2Context: cleared frame {} to {:?}", frame, color);
    }

    fn read_pixels(&mut self, dst: &mut [u8]) -> Result<(), BackendError> {
        check_readback_len(self.drawing_buffer.len(), dst)?;
        let stride = self.width as usize * BYTES_PER_PIXEL;
        if stride == 0 {
            return Ok(());
        }
        for (dst_row, src_row) in dst
            .chunks_exact_mut(stride)
            .zip(self.drawing_buffer.chunks_exact(stride).rev())
        {
            dst_row.copy_from_slice(src_row);
        }
        Ok(())
    }
}
