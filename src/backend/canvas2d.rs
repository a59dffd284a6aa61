// src/backend/canvas2d.rs
//! Software 2D canvas: a top-left origin RGBA surface.

use super::{check_readback_len, BackendError, GraphicsKey, RenderBackend};
use crate::pixels::{self, BYTES_PER_PIXEL};
use log::trace;

const STRIPE_WIDTH_PX: u32 = 16;
const STRIPE_RGBA: [u8; 4] = [0x20, 0x80, 0xC0, 0xFF];

pub struct Canvas2dContext {
    width: u32,
    height: u32,
    surface: Vec<u8>,
    will_read_frequently: bool,
}

impl Canvas2dContext {
    pub fn new(width: u32, height: u32, will_read_frequently: bool) -> Self {
        Self {
            width,
            height,
            surface: vec![0u8; pixels::buffer_len(width, height)],
            will_read_frequently,
        }
    }

    pub fn will_read_frequently(&self) -> bool {
        self.will_read_frequently
    }
}

impl RenderBackend for Canvas2dContext {
    fn kind(&self) -> GraphicsKey {
        GraphicsKey::Canvas2d
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        if (width, height) != (self.width, self.height) {
            self.width = width;
            self.height = height;
            self.surface = vec![0u8; pixels::buffer_len(width, height)];
        } else {
            self.surface.fill(0);
        }
    }

    /// Paints a vertical stripe that sweeps left to right, one pixel per frame.
    fn draw(&mut self, frame: u64) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let x0 = (frame % self.width as u64) as u32;
        let x1 = (x0 + STRIPE_WIDTH_PX).min(self.width);
        let stride = self.width as usize * BYTES_PER_PIXEL;

        for row in self.surface.chunks_exact_mut(stride) {
            let start = x0 as usize * BYTES_PER_PIXEL;
            let end = x1 as usize * BYTES_PER_PIXEL;
            for px in row[start..end].chunks_exact_mut(BYTES_PER_PIXEL) {
                px.copy_from_slice(&STRIPE_RGBA);
            }
        }
        trace!("Canvas2dContext: drew frame {} (stripe at x={})", frame, x0);
    }

    fn read_pixels(&mut self, dst: &mut [u8]) -> Result<(), BackendError> {
        check_readback_len(self.surface.len(), dst)?;
        dst.copy_from_slice(&self.surface);
        Ok(())
    }
}
