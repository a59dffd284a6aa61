// src/worker/mod.rs
//! Background echo worker: finds the marker in a pixel buffer and sends the
//! buffer back together with the marker's location.

pub mod actor;
pub mod messages;

pub use actor::{find_sentinel, spawn_echo_worker, EchoWorker, EchoWorkerHandle};
pub use messages::{WorkerReply, WorkerRequest};

#[cfg(test)]
mod tests;
