// src/backend/mod.rs
//! Rendering backends: a software "2D canvas" surface and a software "WebGL2"
//! drawing buffer, both of which can be drawn into and read back in full.
//!
//! - `RenderBackend`: draw + readback primitives of one surface
//! - `ContextProvider`: acquires the context for the selected backend, sized
//!   to the current resolution; acquisition may fail
//! - `Surfaces`: the default provider, one lazily created context per backend

pub mod canvas2d;
pub mod surfaces;
pub mod webgl2;

pub use canvas2d::Canvas2dContext;
pub use surfaces::Surfaces;
pub use webgl2::Webgl2Context;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Which drawing surface the coordinator renders into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum GraphicsKey {
    #[default]
    #[serde(rename = "2d")]
    Canvas2d,
    #[serde(rename = "webgl2")]
    Webgl2,
}

impl GraphicsKey {
    pub fn name(self) -> &'static str {
        match self {
            GraphicsKey::Canvas2d => "2d",
            GraphicsKey::Webgl2 => "webgl2",
        }
    }
}

impl fmt::Display for GraphicsKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GraphicsKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "2d" => Ok(GraphicsKey::Canvas2d),
            "webgl2" => Ok(GraphicsKey::Webgl2),
            other => Err(format!("unknown graphics backend '{}'", other)),
        }
    }
}

/// Errors raised by rendering backends.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The environment cannot provide a context for this backend.
    #[error("{0} context not available")]
    ContextUnavailable(GraphicsKey),
    /// Readback destination does not match the surface size.
    #[error("readback buffer is {actual} bytes, surface needs {expected}")]
    BufferSizeMismatch { expected: usize, actual: usize },
}

/// Draw and readback primitives of a single drawing surface.
pub trait RenderBackend {
    fn kind(&self) -> GraphicsKey;

    /// Current surface size in pixels.
    fn dimensions(&self) -> (u32, u32);

    /// Sets the surface size. Like assigning a canvas's width and height,
    /// this always clears the surface, even when the size is unchanged.
    fn resize(&mut self, width: u32, height: u32);

    /// Renders frame number `frame` into the surface.
    fn draw(&mut self, frame: u64);

    /// Copies the whole surface into `dst`, which must be exactly
    /// `width * height * 4` bytes.
    fn read_pixels(&mut self, dst: &mut [u8]) -> Result<(), BackendError>;
}

/// Hands out the drawing context for a backend, sized to `width` x `height`.
pub trait ContextProvider {
    fn context(
        &mut self,
        kind: GraphicsKey,
        width: u32,
        height: u32,
    ) -> Result<&mut dyn RenderBackend, BackendError>;
}

pub(crate) fn check_readback_len(expected: usize, dst: &[u8]) -> Result<(), BackendError> {
    if dst.len() != expected {
        return Err(BackendError::BufferSizeMismatch {
            expected,
            actual: dst.len(),
        });
    }
    Ok(())
}
