// src/worker/tests.rs

use super::*;
use crate::pixels::{Marker, SENTINEL};
use std::sync::mpsc::channel;
use std::time::Duration;
use test_log::test;

fn buffer_with_sentinel_at(len: usize, offset: usize) -> Box<[u8]> {
    let mut pixels = vec![7u8; len].into_boxed_slice();
    pixels[offset] = SENTINEL;
    pixels
}

#[test]
fn finds_the_sentinel_at_every_offset() {
    for offset in [0, 1, 2, 63, 4095] {
        let pixels = buffer_with_sentinel_at(4096, offset);
        assert_eq!(find_sentinel(&pixels), Some(offset), "offset {}", offset);
    }
}

#[test]
fn reports_first_sentinel_when_several_exist() {
    let mut pixels = buffer_with_sentinel_at(16, 9);
    pixels[3] = SENTINEL;
    assert_eq!(find_sentinel(&pixels), Some(3));
}

#[test]
fn missing_sentinel_yields_none() {
    assert_eq!(find_sentinel(&[0u8; 32]), None);
    assert_eq!(find_sentinel(&[]), None);
}

#[test]
fn bright_pixel_before_marker_is_reported_instead_of_marker() {
    // First pixel's red channel is fully saturated; marker One sits after it.
    let mut pixels = vec![0u8; 16].into_boxed_slice();
    pixels[0] = 255;
    Marker::One.stamp(&mut pixels);

    let reply = EchoWorker::on_buffer(WorkerRequest {
        pixels,
        use_transferables: true,
    });
    assert_eq!(reply.pixel_location, Some(0));
    assert!(!Marker::One.matches(reply.pixel_location));
}

#[test]
fn transfer_mode_echoes_the_same_allocation() {
    let pixels = buffer_with_sentinel_at(64, 1);
    let sent_ptr = pixels.as_ptr();

    let reply = EchoWorker::on_buffer(WorkerRequest {
        pixels,
        use_transferables: true,
    });

    assert_eq!(reply.pixel_location, Some(1));
    assert_eq!(reply.pixels.as_ptr(), sent_ptr);
}

#[test]
fn copy_mode_echoes_an_equal_copy() {
    let pixels = buffer_with_sentinel_at(64, 0);
    let expected = pixels.clone();

    let reply = EchoWorker::on_buffer(WorkerRequest {
        pixels,
        use_transferables: false,
    });

    assert_eq!(reply.pixel_location, Some(0));
    assert_eq!(reply.pixels, expected);
}

#[test]
fn spawned_worker_replies_in_request_order() {
    let (reply_tx, reply_rx) = channel::<WorkerReply>();
    let worker = spawn_echo_worker(reply_tx).unwrap();

    for offset in [1, 0, 1] {
        worker
            .post(WorkerRequest {
                pixels: buffer_with_sentinel_at(32, offset),
                use_transferables: offset == 1,
            })
            .unwrap();
    }

    let locations: Vec<_> = (0..3)
        .map(|_| {
            reply_rx
                .recv_timeout(Duration::from_secs(5))
                .unwrap()
                .pixel_location
        })
        .collect();
    assert_eq!(locations, vec![Some(1), Some(0), Some(1)]);

    drop(worker);
    assert!(reply_rx.recv_timeout(Duration::from_secs(5)).is_err());
}

#[test]
fn worker_debug_output_omits_pixel_contents() {
    let request = WorkerRequest {
        pixels: vec![0u8; 8].into_boxed_slice(),
        use_transferables: true,
    };
    assert_eq!(
        format!("{:?}", request),
        "WorkerRequest { pixels_len: 8, use_transferables: true }"
    );
}
