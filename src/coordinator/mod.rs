// src/coordinator/mod.rs
//! Frame loop and worker synchronization.
//!
//! - `state`: the `LoopState` record and option types
//! - `step`: pure transitions (`start_loop`, `stop_loop`, `on_frame`, `on_reply`, ...)
//! - `frames`: single-slot animation frame scheduler
//! - `runtime`: event loop applying transitions to the scheduler and worker

pub mod frames;
pub mod runtime;
pub mod state;
pub mod step;

pub use frames::{AnimationFrames, FrameHandle};
pub use runtime::{Coordinator, CoordinatorStatus, LoopEvent, WorkerPort};
pub use state::{LoopState, OptionChange, Options, Phase};
pub use step::{
    on_frame, on_option_changed, on_reply, start_loop, stop_loop, toggle_play, FrameFailure,
    LoopEffect, Step,
};
