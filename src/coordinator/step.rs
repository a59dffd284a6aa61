// src/coordinator/step.rs
//! Frame loop transitions.
//!
//! Each function takes the current `LoopState` by value and returns the next
//! one together with the effects the runtime must carry out. Nothing here
//! touches a scheduler or a channel, so every transition can be driven
//! directly from tests.
//!
//! Hand-off state machine:
//!
//! ```text
//! Idle --on_frame(workers on)--> AwaitingReply { marker }
//! AwaitingReply --on_reply(location == marker, playing)--> Idle + RequestFrame
//! AwaitingReply --on_reply(mismatch or paused)--> Idle
//! any --stop_loop--> (not scheduled)
//! ```

use super::state::{LoopState, OptionChange, Phase};
use crate::backend::{BackendError, ContextProvider};
use crate::fps::FrameMeter;
use crate::pixels;
use crate::worker::{WorkerReply, WorkerRequest};
use log::*;
use thiserror::Error;

/// Side effects requested by a transition, applied in order.
#[derive(Debug)]
pub enum LoopEffect {
    /// Schedule a callback for the next display refresh.
    RequestFrame,
    /// Cancel the pending display-refresh callback.
    CancelFrame,
    /// Send a buffer to the echo worker.
    Dispatch(WorkerRequest),
}

/// Result of a transition.
#[derive(Debug)]
pub struct Step {
    pub state: LoopState,
    pub effects: Vec<LoopEffect>,
}

impl Step {
    fn new(state: LoopState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }

    fn push(&mut self, effect: LoopEffect) {
        self.effects.push(effect);
    }

    /// Requests a frame unless one is already pending.
    fn schedule(&mut self) {
        if !self.state.frame_scheduled {
            self.state.frame_scheduled = true;
            self.push(LoopEffect::RequestFrame);
        }
    }

    fn cancel(&mut self) {
        if self.state.frame_scheduled {
            self.state.frame_scheduled = false;
            self.push(LoopEffect::CancelFrame);
        }
    }

    fn restart(&mut self) {
        self.cancel();
        self.schedule();
    }
}

/// A draw that could not complete. The state is handed back so the loop
/// is never lost along with the frame.
#[derive(Error, Debug)]
#[error("frame aborted: {error}")]
pub struct FrameFailure {
    pub state: LoopState,
    #[source]
    pub error: BackendError,
}

fn log_playing(state: &LoopState) {
    info!(
        "Playing {} in {}...",
        state.options.graphics, state.options.resolution
    );
}

/// Starts scheduling frames. Starting an already playing loop is ignored.
pub fn start_loop(state: LoopState) -> Step {
    let mut step = Step::new(state);
    if step.state.playing {
        warn!("start_loop: Already playing, ignoring");
        return step;
    }
    log_playing(&step.state);
    step.state.playing = true;
    step.schedule();
    step
}

/// Cancels the pending frame. An outstanding worker round trip is left alone;
/// its reply will find the loop paused.
pub fn stop_loop(state: LoopState) -> Step {
    let mut step = Step::new(state);
    if !step.state.playing {
        debug!("stop_loop: Already paused");
        return step;
    }
    info!("Paused");
    step.state.playing = false;
    step.state.frame_deferred = false;
    step.cancel();
    step
}

/// Play/pause button.
pub fn toggle_play(state: LoopState) -> Step {
    if state.playing {
        stop_loop(state)
    } else {
        start_loop(state)
    }
}

/// Applies an option immediately. While playing, the pending frame is
/// replaced by a fresh one.
pub fn on_option_changed(state: LoopState, change: OptionChange) -> Step {
    let mut step = Step::new(state);
    let options = &mut step.state.options;

    match change {
        OptionChange::Graphics(graphics) => options.graphics = graphics,
        OptionChange::Resolution(resolution) => {
            options.resolution = resolution;
            let (width, height) = resolution.dimensions();
            step.state.pixels = Some(pixels::allocate(width, height));
            debug!(
                "on_option_changed: Reallocated pixel buffer for {} ({} bytes)",
                resolution,
                resolution.buffer_len()
            );
        }
        OptionChange::UseWorkers(use_workers) => {
            options.use_workers = use_workers;
            if !use_workers && options.use_transferables {
                debug!("on_option_changed: Transfer has no effect while workers are off");
            }
        }
        OptionChange::UseTransferables(use_transferables) => {
            options.use_transferables = use_transferables;
        }
    }

    if step.state.playing {
        step.restart();
        log_playing(&step.state);
    }
    step
}

/// Draws one frame, reads it back and stamps the next marker. With workers
/// on, the buffer is dispatched and no frame is scheduled until the reply.
///
/// A frame that fires while a reply is outstanding does not draw; it is
/// deferred until the reply arrives.
pub fn on_frame(
    state: LoopState,
    contexts: &mut dyn ContextProvider,
    meter: &mut dyn FrameMeter,
) -> Result<Step, FrameFailure> {
    let mut step = Step::new(state);
    step.state.frame_scheduled = false;

    if !step.state.playing {
        debug!("on_frame: Fired while paused, ignoring");
        return Ok(step);
    }
    if step.state.is_awaiting_reply() {
        debug!("on_frame: Reply outstanding, deferring frame");
        step.state.frame_deferred = true;
        return Ok(step);
    }

    meter.frame();

    let options = step.state.options;
    let (width, height) = options.resolution.dimensions();
    let backend = match contexts.context(options.graphics, width, height) {
        Ok(backend) => backend,
        Err(error) => {
            return Err(FrameFailure {
                state: step.state,
                error,
            })
        }
    };

    trace!(
        "on_frame: Drawing frame {} on {} at {:?}",
        step.state.frames_drawn,
        backend.kind(),
        backend.dimensions()
    );
    backend.draw(step.state.frames_drawn);

    let required = pixels::buffer_len(width, height);
    let mut pixels = match step.state.pixels.take() {
        Some(pixels) if pixels.len() == required => pixels,
        Some(stale) => {
            debug!(
                "on_frame: Buffer is {} bytes, {} needs {}; reallocating",
                stale.len(),
                options.resolution,
                required
            );
            pixels::allocate(width, height)
        }
        None => pixels::allocate(width, height),
    };

    if let Err(error) = backend.read_pixels(&mut pixels) {
        step.state.pixels = Some(pixels);
        return Err(FrameFailure {
            state: step.state,
            error,
        });
    }

    let marker = step.state.marker.toggled();
    marker.stamp(&mut pixels);
    step.state.marker = marker;
    step.state.frames_drawn += 1;
    trace!("on_frame: Frame {} stamped marker {}", step.state.frames_drawn, marker);

    if options.use_workers {
        let use_transferables = options.transfers();
        let outgoing = if use_transferables {
            pixels
        } else {
            let copy = pixels.clone();
            step.state.pixels = Some(pixels);
            copy
        };
        step.state.phase = Phase::AwaitingReply { marker };
        step.push(LoopEffect::Dispatch(WorkerRequest {
            pixels: outgoing,
            use_transferables,
        }));
    } else {
        step.state.pixels = Some(pixels);
        step.schedule();
    }

    Ok(step)
}

/// Accepts the worker's buffer and schedules the next frame only if the
/// reply carries this coordinator's marker and the loop is still playing.
/// A frame deferred during the round trip resumes under the same rule.
pub fn on_reply(state: LoopState, reply: WorkerReply) -> Step {
    let mut step = Step::new(state);
    let WorkerReply {
        pixel_location,
        pixels,
    } = reply;

    step.state.pixels = Some(pixels);
    step.state.phase = Phase::Idle;
    let deferred = std::mem::take(&mut step.state.frame_deferred);
    let in_sync = step.state.marker.matches(pixel_location);

    if !step.state.playing {
        debug!("on_reply: Loop paused, not scheduling");
        return step;
    }

    if in_sync {
        if deferred {
            debug!("on_reply: Resuming deferred frame");
        } else {
            trace!("on_reply: Marker {} confirmed", step.state.marker);
        }
        step.schedule();
    } else {
        debug!(
            "on_reply: Stale reply (location {:?}, marker {}); cycle ends{}",
            pixel_location,
            step.state.marker,
            if deferred { ", deferred frame dropped" } else { "" }
        );
    }
    step
}
