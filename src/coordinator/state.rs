// src/coordinator/state.rs
//! Loop state record threaded through the step functions.

use crate::backend::GraphicsKey;
use crate::config::PlaybackConfig;
use crate::pixels::{self, Marker, PixelBuffer};
use crate::resolution::ResolutionKey;
use std::fmt;

/// User-selected options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Options {
    pub graphics: GraphicsKey,
    pub resolution: ResolutionKey,
    pub use_workers: bool,
    pub use_transferables: bool,
}

impl Options {
    pub fn from_config(playback: &PlaybackConfig) -> Self {
        Self {
            graphics: playback.graphics,
            resolution: playback.resolution,
            use_workers: playback.use_workers,
            use_transferables: playback.use_transferables,
        }
    }

    /// Transfer only applies while frames are shipped to the worker.
    pub fn transfers(&self) -> bool {
        self.use_workers && self.use_transferables
    }
}

/// A single option change from the control surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionChange {
    Graphics(GraphicsKey),
    Resolution(ResolutionKey),
    UseWorkers(bool),
    UseTransferables(bool),
}

/// Worker hand-off phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No request outstanding; the coordinator may draw.
    #[default]
    Idle,
    /// A buffer stamped with `marker` was sent and its reply has not arrived.
    AwaitingReply { marker: Marker },
}

/// Everything the frame loop knows.
///
/// `pixels` is `None` while a transferred buffer is owned by the worker.
#[derive(Default)]
pub struct LoopState {
    pub options: Options,
    pub pixels: Option<PixelBuffer>,
    /// Marker stamped into the most recently drawn frame.
    pub marker: Marker,
    pub playing: bool,
    pub phase: Phase,
    /// An animation frame is pending with the scheduler.
    pub frame_scheduled: bool,
    /// A frame fired while a reply was outstanding and is waiting for it.
    pub frame_deferred: bool,
    pub frames_drawn: u64,
}

impl LoopState {
    /// Paused state with a zeroed buffer for the selected resolution.
    pub fn new(options: Options) -> Self {
        let (width, height) = options.resolution.dimensions();
        Self {
            options,
            pixels: Some(pixels::allocate(width, height)),
            ..Self::default()
        }
    }

    pub fn is_awaiting_reply(&self) -> bool {
        matches!(self.phase, Phase::AwaitingReply { .. })
    }

    /// One-line description for status output.
    pub fn summary(&self) -> String {
        format!(
            "{} | {} in {} | workers {} | transfer {} | marker {} | {} frames | {}",
            if self.playing { "playing" } else { "paused" },
            self.options.graphics,
            self.options.resolution,
            on_off(self.options.use_workers),
            on_off(self.options.transfers()),
            self.marker,
            self.frames_drawn,
            match self.phase {
                Phase::Idle => "idle",
                Phase::AwaitingReply { .. } => "awaiting reply",
            }
        )
    }
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

impl fmt::Debug for LoopState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoopState")
            .field("options", &self.options)
            .field("pixels_len", &self.pixels.as_ref().map(|p| p.len()))
            .field("marker", &self.marker)
            .field("playing", &self.playing)
            .field("phase", &self.phase)
            .field("frame_scheduled", &self.frame_scheduled)
            .field("frame_deferred", &self.frame_deferred)
            .field("frames_drawn", &self.frames_drawn)
            .finish()
    }
}
