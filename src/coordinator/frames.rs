// src/coordinator/frames.rs
//! Animation frame scheduling with `requestAnimationFrame` semantics.
//!
//! At most one callback is pending. `fire` is called on each display refresh
//! and hands out the pending handle, if any.

use log::{trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

#[derive(Debug, Default)]
pub struct AnimationFrames {
    next_id: u64,
    pending: Option<FrameHandle>,
}

impl AnimationFrames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules a callback for the next refresh. A still-pending callback
    /// is replaced, never duplicated.
    pub fn request(&mut self) {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        if let Some(replaced) = self.pending.replace(handle) {
            warn!("AnimationFrames: {:?} replaced pending {:?}", handle, replaced);
        } else {
            trace!("AnimationFrames: Requested {:?}", handle);
        }
    }

    /// Cancels whatever is pending.
    pub fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            trace!("AnimationFrames: Cancelled {:?}", handle);
        }
    }

    /// Display refresh: takes the pending callback.
    pub fn fire(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
