//! Coordinator ↔ echo worker round trips over real threads and channels.
//!
//! Vsync is driven by hand so each test controls exactly when frames fire;
//! worker replies arrive on the same unified channel the binary uses.

use readback_bench::backend::{GraphicsKey, Surfaces};
use readback_bench::config::GraphicsConfig;
use readback_bench::control::ControlCommand;
use readback_bench::coordinator::{
    Coordinator, LoopEvent, LoopState, OptionChange, Options, Phase,
};
use readback_bench::fps::FpsMeter;
use readback_bench::pixels::Marker;
use readback_bench::resolution::ResolutionKey;
use readback_bench::worker::{spawn_echo_worker, EchoWorkerHandle};
use std::sync::mpsc::{channel, Receiver};
use std::time::Duration;
use test_log::test;

const REPLY_TIMEOUT: Duration = Duration::from_secs(10);

type Bench = Coordinator<Surfaces, FpsMeter, EchoWorkerHandle>;

fn bench(options: Options) -> (Bench, Receiver<LoopEvent>) {
    let (event_tx, event_rx) = channel::<LoopEvent>();
    let worker = spawn_echo_worker(event_tx).expect("worker spawns");
    let coordinator = Coordinator::new(
        LoopState::new(options),
        Surfaces::new(GraphicsConfig::default()),
        FpsMeter::new(120, Duration::ZERO),
        worker,
    );
    (coordinator, event_rx)
}

fn options(graphics: GraphicsKey, use_transferables: bool) -> Options {
    Options {
        graphics,
        resolution: ResolutionKey::FullHd,
        use_workers: true,
        use_transferables,
    }
}

/// Fires one frame and processes the worker's reply.
fn cycle(coordinator: &mut Bench, events: &Receiver<LoopEvent>) -> anyhow::Result<()> {
    coordinator.process_event(LoopEvent::Vsync)?;
    let reply = events.recv_timeout(REPLY_TIMEOUT)?;
    assert!(matches!(reply, LoopEvent::WorkerReply(_)));
    coordinator.process_event(reply)?;
    Ok(())
}

#[test]
fn transfer_round_trips_keep_the_loop_running() -> anyhow::Result<()> {
    let (mut coordinator, events) = bench(options(GraphicsKey::Canvas2d, true));
    coordinator.process_event(ControlCommand::Play.into())?;

    let mut markers = Vec::new();
    for _ in 0..4 {
        cycle(&mut coordinator, &events)?;
        assert!(coordinator.frames().is_pending());
        assert_eq!(
            coordinator.state().pixels.as_ref().map(|p| p.len()),
            Some(8_294_400)
        );
        markers.push(coordinator.state().marker);
    }

    assert_eq!(
        markers,
        vec![Marker::One, Marker::Zero, Marker::One, Marker::Zero]
    );
    assert_eq!(coordinator.meter().total_frames(), 4);
    Ok(())
}

#[test]
fn copy_round_trips_with_webgl2() -> anyhow::Result<()> {
    let (mut coordinator, events) = bench(options(GraphicsKey::Webgl2, false));
    coordinator.process_event(ControlCommand::TogglePlay.into())?;

    for _ in 0..3 {
        coordinator.process_event(LoopEvent::Vsync)?;
        // Copy mode: the coordinator keeps a valid buffer while waiting.
        assert!(coordinator.state().pixels.is_some());
        assert!(coordinator.state().is_awaiting_reply());

        let reply = events.recv_timeout(REPLY_TIMEOUT)?;
        coordinator.process_event(reply)?;
        assert!(coordinator.frames().is_pending());
    }
    assert_eq!(coordinator.state().frames_drawn, 3);
    Ok(())
}

#[test]
fn pause_during_round_trip_stops_the_loop() -> anyhow::Result<()> {
    let (mut coordinator, events) = bench(options(GraphicsKey::Canvas2d, true));
    coordinator.process_event(ControlCommand::Play.into())?;

    coordinator.process_event(LoopEvent::Vsync)?;
    coordinator.process_event(ControlCommand::Pause.into())?;

    let reply = events.recv_timeout(REPLY_TIMEOUT)?;
    coordinator.process_event(reply)?;

    assert!(!coordinator.frames().is_pending());
    assert_eq!(coordinator.state().phase, Phase::Idle);
    assert!(coordinator.state().pixels.is_some());

    // Resuming draws again from where it left off.
    coordinator.process_event(ControlCommand::Play.into())?;
    cycle(&mut coordinator, &events)?;
    assert_eq!(coordinator.state().frames_drawn, 2);
    Ok(())
}

#[test]
fn resolution_change_mid_flight_resumes_at_new_size() -> anyhow::Result<()> {
    let (mut coordinator, events) = bench(options(GraphicsKey::Canvas2d, true));
    coordinator.process_event(ControlCommand::Play.into())?;

    coordinator.process_event(LoopEvent::Vsync)?;
    coordinator.process_event(
        ControlCommand::SetOption(OptionChange::Resolution(ResolutionKey::Uhd4k)).into(),
    )?;
    // Restart frame fires before the reply and waits for it.
    coordinator.process_event(LoopEvent::Vsync)?;
    assert!(coordinator.state().frame_deferred);

    let reply = events.recv_timeout(REPLY_TIMEOUT)?;
    coordinator.process_event(reply)?;
    assert!(coordinator.frames().is_pending());

    cycle(&mut coordinator, &events)?;
    assert_eq!(
        coordinator.state().pixels.as_ref().map(|p| p.len()),
        Some(ResolutionKey::Uhd4k.buffer_len())
    );
    assert!(coordinator.frames().is_pending());
    Ok(())
}

#[test]
fn unavailable_backend_is_reported_and_not_retried() -> anyhow::Result<()> {
    let (event_tx, _event_rx) = channel::<LoopEvent>();
    let worker = spawn_echo_worker(event_tx)?;
    let mut coordinator = Coordinator::new(
        LoopState::new(options(GraphicsKey::Webgl2, true)),
        Surfaces::new(GraphicsConfig {
            unavailable: vec![GraphicsKey::Webgl2],
            ..GraphicsConfig::default()
        }),
        FpsMeter::new(120, Duration::ZERO),
        worker,
    );

    coordinator.process_event(ControlCommand::Play.into())?;
    let err = coordinator.process_event(LoopEvent::Vsync).unwrap_err();
    assert!(format!("{:#}", err).contains("webgl2 context not available"));
    assert!(!coordinator.frames().is_pending());

    // Switching to the 2D backend recovers.
    coordinator.process_event(
        ControlCommand::SetOption(OptionChange::Graphics(GraphicsKey::Canvas2d)).into(),
    )?;
    coordinator.process_event(LoopEvent::Vsync)?;
    assert!(coordinator.state().is_awaiting_reply());
    Ok(())
}
