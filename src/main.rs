// src/main.rs

//! Main entry point for `readback-bench`.

use anyhow::Context;
use log::info;
use readback_bench::backend::Surfaces;
use readback_bench::config::CONFIG;
use readback_bench::control::{ConsoleInputActor, ControlCommand};
use readback_bench::coordinator::{Coordinator, LoopEvent, LoopState, Options};
use readback_bench::fps::FpsMeter;
use readback_bench::vsync::VsyncActor;
use readback_bench::worker::spawn_echo_worker;
use std::io::BufReader;
use std::sync::mpsc;
use std::time::Duration;

fn main() -> anyhow::Result<()> {
    // RUST_LOG overrides the "info" default.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    info!("Starting readback-bench...");

    let options = Options::from_config(&CONFIG.playback);
    info!("Initial options: {:?}", options);

    // 1. Unified coordinator channel (vsync, worker replies, control input)
    let (event_tx, event_rx) = mpsc::channel::<LoopEvent>();

    // 2. Echo worker
    let worker = spawn_echo_worker(event_tx.clone()).context("Failed to spawn echo worker")?;

    // 3. Vsync clock
    let _vsync_actor = VsyncActor::spawn(event_tx.clone(), CONFIG.performance.target_fps)
        .context("Failed to spawn VsyncActor")?;

    // 4. Console control input
    let _console_actor = ConsoleInputActor::spawn(BufReader::new(std::io::stdin()), event_tx.clone())
        .context("Failed to spawn ConsoleInputActor")?;
    info!("Commands: toggle | play | pause | graphics <2d|webgl2> | resolution <1080p|4k|8k|16k> | workers <on|off> | transfer <on|off> | status | quit");

    if CONFIG.playback.autoplay {
        event_tx
            .send(ControlCommand::Play.into())
            .context("Failed to queue autoplay")?;
    }
    drop(event_tx);

    // 5. Coordinator runs on the main thread until quit
    let meter = FpsMeter::new(
        CONFIG.performance.fps_meter_target,
        Duration::from_millis(CONFIG.performance.fps_report_interval_ms),
    );
    let mut coordinator = Coordinator::new(
        LoopState::new(options),
        Surfaces::new(CONFIG.graphics.clone()),
        meter,
        worker,
    );
    coordinator.run(event_rx);

    info!(
        "readback-bench exited successfully after {} frames.",
        coordinator.meter().total_frames()
    );
    Ok(())
}
