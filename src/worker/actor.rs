// src/worker/actor.rs
//! EchoWorker - Dedicated thread that locates the marker in a pixel buffer.
//!
//! Simple work queue pattern: receives (pixels, transfer flag), scans for the
//! sentinel byte, returns (location, pixels).
//!
//! Threading model:
//! - Owns nothing between requests; every request is handled independently
//! - Requests and replies are FIFO per direction
//! - Exits when the request channel closes or the reply receiver is gone

use super::messages::{WorkerReply, WorkerRequest};
use crate::pixels::SENTINEL;
use anyhow::{Context, Result};
use log::*;
use std::sync::mpsc::{channel, Receiver, SendError, Sender};
use std::thread::{self, JoinHandle};

/// Offset of the first byte equal to the sentinel, scanning from index 0.
///
/// Any earlier pixel byte that happens to be 255 is reported instead of the
/// marker; callers treat that as a marker mismatch.
pub fn find_sentinel(pixels: &[u8]) -> Option<usize> {
    pixels.iter().position(|&byte| byte == SENTINEL)
}

/// Stateless marker scan and echo.
pub struct EchoWorker;

impl EchoWorker {
    /// Handles one request. The reply carries the received buffer itself when
    /// transfer is enabled and a fresh copy of it otherwise.
    pub fn on_buffer(request: WorkerRequest) -> WorkerReply {
        let WorkerRequest {
            pixels,
            use_transferables,
        } = request;

        let pixel_location = find_sentinel(&pixels);
        let pixels = if use_transferables {
            pixels
        } else {
            pixels.clone()
        };

        WorkerReply {
            pixel_location,
            pixels,
        }
    }

    fn run<T>(request_rx: Receiver<WorkerRequest>, reply_tx: Sender<T>)
    where
        T: From<WorkerReply>,
    {
        info!("EchoWorker: Thread started");

        loop {
            match request_rx.recv() {
                Ok(request) => {
                    trace!("EchoWorker: Received {:?}", request);
                    let reply = Self::on_buffer(request);
                    trace!("EchoWorker: Replying {:?}", reply);

                    if reply_tx.send(T::from(reply)).is_err() {
                        warn!("EchoWorker: Failed to send reply (coordinator closed)");
                        break;
                    }
                }
                Err(_) => {
                    info!("EchoWorker: Request channel closed, exiting");
                    break;
                }
            }
        }

        info!("EchoWorker: Thread stopped");
    }
}

/// Handle to a running echo worker thread.
///
/// Dropping the handle closes the request channel and joins the thread.
pub struct EchoWorkerHandle {
    request_tx: Option<Sender<WorkerRequest>>,
    thread_handle: Option<JoinHandle<()>>,
}

impl EchoWorkerHandle {
    /// Queues a request. Never blocks.
    pub fn post(&self, request: WorkerRequest) -> Result<(), SendError<WorkerRequest>> {
        match &self.request_tx {
            Some(tx) => tx.send(request),
            None => Err(SendError(request)),
        }
    }
}

impl Drop for EchoWorkerHandle {
    fn drop(&mut self) {
        debug!("EchoWorkerHandle dropped");
        self.request_tx.take();
        if let Some(handle) = self.thread_handle.take() {
            if let Err(e) = handle.join() {
                error!("EchoWorker thread panicked: {:?}", e);
            }
        }
    }
}

/// Spawn the echo worker thread. Replies are converted into `T` and sent on
/// `reply_tx`, so the worker can feed any event channel.
pub fn spawn_echo_worker<T>(reply_tx: Sender<T>) -> Result<EchoWorkerHandle>
where
    T: From<WorkerReply> + Send + 'static,
{
    let (request_tx, request_rx) = channel();

    let thread_handle = thread::Builder::new()
        .name("echo-worker".to_string())
        .spawn(move || EchoWorker::run(request_rx, reply_tx))
        .context("Failed to spawn echo worker thread")?;

    info!("spawn_echo_worker: Echo worker spawned");

    Ok(EchoWorkerHandle {
        request_tx: Some(request_tx),
        thread_handle: Some(thread_handle),
    })
}
