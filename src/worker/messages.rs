// src/worker/messages.rs
//! Message types exchanged between the coordinator and the echo worker.
//!
//! Buffers always travel by ownership transfer of a `PixelBuffer`. Whether
//! the sender keeps its own copy is decided by `use_transferables` on the
//! sending side, not by the channel.

use crate::pixels::PixelBuffer;
use std::fmt;

/// Coordinator → worker.
pub struct WorkerRequest {
    pub pixels: PixelBuffer,
    /// When true the worker moves the buffer back instead of copying it.
    pub use_transferables: bool,
}

/// Worker → coordinator.
pub struct WorkerReply {
    /// Offset of the first sentinel byte, `None` if the buffer had none.
    pub pixel_location: Option<usize>,
    pub pixels: PixelBuffer,
}

// Buffers run to tens of megabytes; Debug prints their length only.

impl fmt::Debug for WorkerRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerRequest")
            .field("pixels_len", &self.pixels.len())
            .field("use_transferables", &self.use_transferables)
            .finish()
    }
}

impl fmt::Debug for WorkerReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerReply")
            .field("pixel_location", &self.pixel_location)
            .field("pixels_len", &self.pixels.len())
            .finish()
    }
}
