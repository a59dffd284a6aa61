//! readback-bench library crate.
//!
//! Draw → readback → optional worker round trip, looped as an animation.
//! The binary is a thin wrapper; integration tests drive these modules directly.

/// Rendering backends and context acquisition.
pub mod backend;
/// Configuration management.
pub mod config;
/// Line-based control commands and the console input actor.
pub mod control;
/// Frame loop state machine and event loop.
pub mod coordinator;
/// Frames-per-second measurement.
pub mod fps;
/// Pixel buffer and marker types.
pub mod pixels;
/// Resolution presets.
pub mod resolution;
/// Display refresh ticks.
pub mod vsync;
/// Echo worker thread.
pub mod worker;
