// src/coordinator/runtime.rs
//! Coordinator event loop.
//!
//! Owns the loop state, the drawing contexts, the FPS meter and the worker
//! port. All inputs arrive on one unified channel as `LoopEvent`s; each event
//! runs one transition from `step` and applies the resulting effects.

use super::frames::AnimationFrames;
use super::state::LoopState;
use super::step::{self, FrameFailure, LoopEffect, Step};
use crate::backend::ContextProvider;
use crate::control::ControlCommand;
use crate::fps::FrameMeter;
use crate::vsync::VsyncTick;
use crate::worker::{EchoWorkerHandle, WorkerReply, WorkerRequest};
use anyhow::{anyhow, Result};
use log::*;
use std::sync::mpsc::{Receiver, SendError, Sender};

/// All event types the coordinator can receive.
#[derive(Debug)]
pub enum LoopEvent {
    /// Display refresh from the vsync actor.
    Vsync,
    /// Echo worker reply.
    WorkerReply(WorkerReply),
    /// Play/pause and option changes.
    Control(ControlCommand),
}

impl From<VsyncTick> for LoopEvent {
    fn from(_: VsyncTick) -> Self {
        LoopEvent::Vsync
    }
}

impl From<WorkerReply> for LoopEvent {
    fn from(reply: WorkerReply) -> Self {
        LoopEvent::WorkerReply(reply)
    }
}

impl From<ControlCommand> for LoopEvent {
    fn from(command: ControlCommand) -> Self {
        LoopEvent::Control(command)
    }
}

/// Represents the status of the coordinator after processing an event.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CoordinatorStatus {
    Running,
    Shutdown,
}

/// Where dispatched buffers go.
pub trait WorkerPort {
    fn post(&self, request: WorkerRequest) -> Result<(), SendError<WorkerRequest>>;
}

impl WorkerPort for EchoWorkerHandle {
    fn post(&self, request: WorkerRequest) -> Result<(), SendError<WorkerRequest>> {
        EchoWorkerHandle::post(self, request)
    }
}

impl WorkerPort for Sender<WorkerRequest> {
    fn post(&self, request: WorkerRequest) -> Result<(), SendError<WorkerRequest>> {
        self.send(request)
    }
}

pub struct Coordinator<C, M, W> {
    state: LoopState,
    frames: AnimationFrames,
    contexts: C,
    meter: M,
    worker: W,
}

impl<C, M, W> Coordinator<C, M, W>
where
    C: ContextProvider,
    M: FrameMeter,
    W: WorkerPort,
{
    pub fn new(state: LoopState, contexts: C, meter: M, worker: W) -> Self {
        Self {
            state,
            frames: AnimationFrames::new(),
            contexts,
            meter,
            worker,
        }
    }

    pub fn state(&self) -> &LoopState {
        &self.state
    }

    pub fn frames(&self) -> &AnimationFrames {
        &self.frames
    }

    pub fn meter(&self) -> &M {
        &self.meter
    }

    /// Handles one event.
    ///
    /// A failed draw is returned as an error after the loop state has been
    /// restored; no frame is rescheduled for it.
    pub fn process_event(&mut self, event: LoopEvent) -> Result<CoordinatorStatus> {
        let state = std::mem::take(&mut self.state);

        let step = match event {
            LoopEvent::Vsync => {
                let Some(handle) = self.frames.fire() else {
                    self.state = state;
                    return Ok(CoordinatorStatus::Running);
                };
                trace!("Coordinator: Running {:?}", handle);
                match step::on_frame(state, &mut self.contexts, &mut self.meter) {
                    Ok(step) => step,
                    Err(FrameFailure { state, error }) => {
                        self.state = state;
                        error!("Coordinator: Frame aborted: {}", error);
                        return Err(anyhow::Error::new(error).context("Frame aborted"));
                    }
                }
            }
            LoopEvent::WorkerReply(reply) => {
                trace!("Coordinator: {:?}", reply);
                step::on_reply(state, reply)
            }
            LoopEvent::Control(command) => match command {
                ControlCommand::TogglePlay => step::toggle_play(state),
                ControlCommand::Play => step::start_loop(state),
                ControlCommand::Pause => step::stop_loop(state),
                ControlCommand::SetOption(change) => step::on_option_changed(state, change),
                ControlCommand::Status => {
                    info!("Status: {}", state.summary());
                    self.state = state;
                    return Ok(CoordinatorStatus::Running);
                }
                ControlCommand::Quit => {
                    info!("Coordinator: Quit requested");
                    self.state = state;
                    return Ok(CoordinatorStatus::Shutdown);
                }
            },
        };

        self.apply(step)?;
        Ok(CoordinatorStatus::Running)
    }

    fn apply(&mut self, step: Step) -> Result<()> {
        let Step { state, effects } = step;
        self.state = state;

        for effect in effects {
            match effect {
                LoopEffect::RequestFrame => {
                    self.frames.request();
                }
                LoopEffect::CancelFrame => {
                    self.frames.cancel_pending();
                }
                LoopEffect::Dispatch(request) => {
                    trace!("Coordinator: Dispatching {:?}", request);
                    if let Err(SendError(request)) = self.worker.post(request) {
                        error!("Coordinator: Echo worker is gone; loop suspended");
                        // Take the buffer back.
                        self.state.pixels.get_or_insert(request.pixels);
                        return Err(anyhow!("Echo worker unavailable"));
                    }
                }
            }
        }
        Ok(())
    }

    /// Handles `first` and then drains everything already queued behind it.
    ///
    /// Control commands and worker replies run in arrival order. Any number
    /// of `Vsync` ticks in the batch collapse into one refresh, fired last.
    pub fn process_batch(
        &mut self,
        first: LoopEvent,
        events: &Receiver<LoopEvent>,
    ) -> Result<CoordinatorStatus> {
        let mut vsync_ticks = 0usize;
        let mut next = Some(first);

        while let Some(event) = next.take().or_else(|| events.try_recv().ok()) {
            match event {
                LoopEvent::Vsync => vsync_ticks += 1,
                event => {
                    if self.process_event(event)? == CoordinatorStatus::Shutdown {
                        return Ok(CoordinatorStatus::Shutdown);
                    }
                }
            }
        }

        if vsync_ticks == 0 {
            return Ok(CoordinatorStatus::Running);
        }
        if vsync_ticks > 1 {
            trace!("Coordinator: Coalesced {} vsync ticks", vsync_ticks);
        }
        self.process_event(LoopEvent::Vsync)
    }

    /// Runs until `Quit` or until every sender is gone.
    pub fn run(&mut self, events: Receiver<LoopEvent>) {
        info!("Coordinator: Event loop started");
        while let Ok(event) = events.recv() {
            match self.process_batch(event, &events) {
                Ok(CoordinatorStatus::Running) => {}
                Ok(CoordinatorStatus::Shutdown) => break,
                Err(e) => error!("Coordinator: {:#}", e),
            }
        }
        info!(
            "Coordinator: Event loop stopped after {} frames",
            self.state.frames_drawn
        );
    }
}
