// src/vsync.rs
//! Vsync actor that emits display-refresh ticks at a fixed rate.
//!
//! The coordinator runs its pending animation frame on each tick, which
//! gives `requestAnimationFrame`-style pacing without a real display.

use anyhow::{Context, Result};
use log::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// One display refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VsyncTick;

/// Vsync actor that sends refresh ticks at a fixed rate.
pub struct VsyncActor {
    stop: Arc<AtomicBool>,
    thread_handle: Option<JoinHandle<()>>,
}

impl VsyncActor {
    /// Starts the tick thread.
    ///
    /// # Arguments
    ///
    /// * `tick_tx` - Channel the ticks are sent on, converted into `T`
    /// * `target_fps` - Refresh rate (e.g., 60). Zero is treated as 1.
    pub fn spawn<T>(tick_tx: Sender<T>, target_fps: u32) -> Result<Self>
    where
        T: From<VsyncTick> + Send + 'static,
    {
        let target_fps = target_fps.max(1);
        let frame_duration = Duration::from_secs_f64(1.0 / target_fps as f64);
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);

        let thread_handle = thread::Builder::new()
            .name("vsync".to_string())
            .spawn(move || {
                info!("VsyncActor: Ticking at {} Hz", target_fps);
                while !thread_stop.load(Ordering::Relaxed) {
                    thread::sleep(frame_duration);

                    if tick_tx.send(T::from(VsyncTick)).is_err() {
                        info!("VsyncActor: Coordinator channel closed, exiting");
                        break;
                    }
                }
                debug!("VsyncActor: Stopped");
            })
            .context("Failed to spawn vsync thread")?;

        debug!("VsyncActor: Spawned");
        Ok(Self {
            stop,
            thread_handle: Some(thread_handle),
        })
    }
}

impl Drop for VsyncActor {
    fn drop(&mut self) {
        debug!("VsyncActor dropped");
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.thread_handle.take() {
            if let Err(e) = handle.join() {
                error!("VsyncActor: Tick thread panicked: {:?}", e);
            }
        }
    }
}
