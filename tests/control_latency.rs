//! Control commands stay responsive while a live vsync clock drives slow
//! high-resolution frames.

use readback_bench::backend::{GraphicsKey, Surfaces};
use readback_bench::config::GraphicsConfig;
use readback_bench::control::ControlCommand;
use readback_bench::coordinator::{Coordinator, LoopEvent, LoopState, Options};
use readback_bench::fps::FpsMeter;
use readback_bench::resolution::ResolutionKey;
use readback_bench::vsync::VsyncActor;
use readback_bench::worker::WorkerRequest;
use std::sync::mpsc::channel;
use std::time::{Duration, Instant};
use test_log::test;

const EVENT_TIMEOUT: Duration = Duration::from_secs(10);

#[test]
fn pause_is_not_queued_behind_vsync_backlog() -> anyhow::Result<()> {
    let (event_tx, event_rx) = channel::<LoopEvent>();
    let (worker_tx, _worker_rx) = channel::<WorkerRequest>();
    let mut coordinator = Coordinator::new(
        LoopState::new(Options {
            graphics: GraphicsKey::Canvas2d,
            resolution: ResolutionKey::Uhd4k,
            use_workers: false,
            use_transferables: false,
        }),
        Surfaces::new(GraphicsConfig::default()),
        FpsMeter::new(120, Duration::ZERO),
        worker_tx,
    );
    let vsync = VsyncActor::spawn(event_tx.clone(), 240)?;

    coordinator.process_event(ControlCommand::Play.into())?;
    let started = Instant::now();
    while started.elapsed() < Duration::from_millis(500) {
        let event = event_rx.recv_timeout(EVENT_TIMEOUT)?;
        coordinator.process_batch(event, &event_rx)?;
    }

    event_tx.send(ControlCommand::Pause.into()).unwrap();
    let drawn_before_pause = coordinator.state().frames_drawn;
    while coordinator.state().playing {
        let event = event_rx.recv_timeout(EVENT_TIMEOUT)?;
        coordinator.process_batch(event, &event_rx)?;
    }

    assert!(
        coordinator.state().frames_drawn - drawn_before_pause <= 1,
        "{} frames drawn after pause was queued",
        coordinator.state().frames_drawn - drawn_before_pause
    );
    assert!(!coordinator.frames().is_pending());

    drop(vsync);
    Ok(())
}
