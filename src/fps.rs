// src/fps.rs
//! Frames-per-second measurement.

use log::info;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

const WINDOW: Duration = Duration::from_secs(1);

/// Records that a frame was drawn.
pub trait FrameMeter {
    fn frame(&mut self);
}

/// Sliding one-second window of frame timestamps.
pub struct FpsMeter {
    frames: VecDeque<Instant>,
    target_fps: u32,
    report_interval: Option<Duration>,
    last_report: Option<Instant>,
    total_frames: u64,
}

impl FpsMeter {
    /// `target_fps` bounds the window's capacity; a zero `report_interval`
    /// disables periodic logging.
    pub fn new(target_fps: u32, report_interval: Duration) -> Self {
        Self {
            frames: VecDeque::with_capacity(target_fps.max(1) as usize * 2),
            target_fps,
            report_interval: (!report_interval.is_zero()).then_some(report_interval),
            last_report: None,
            total_frames: 0,
        }
    }

    /// Records a frame drawn at `now`.
    pub fn frame_at(&mut self, now: Instant) {
        self.total_frames += 1;
        self.frames.push_back(now);
        while let Some(&oldest) = self.frames.front() {
            if now.duration_since(oldest) >= WINDOW {
                self.frames.pop_front();
            } else {
                break;
            }
        }

        let Some(interval) = self.report_interval else {
            return;
        };
        match self.last_report {
            Some(last) if now.duration_since(last) < interval => {}
            Some(_) => {
                info!("FPS: {} (target {})", self.fps(), self.target_fps);
                self.last_report = Some(now);
            }
            None => self.last_report = Some(now),
        }
    }

    /// Frames drawn during the last second.
    pub fn fps(&self) -> usize {
        self.frames.len()
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }
}

impl FrameMeter for FpsMeter {
    fn frame(&mut self) {
        self.frame_at(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_frames_inside_the_window() {
        let mut meter = FpsMeter::new(120, Duration::ZERO);
        let start = Instant::now();
        for i in 0..30 {
            meter.frame_at(start + Duration::from_millis(i * 10));
        }
        assert_eq!(meter.fps(), 30);
        assert_eq!(meter.total_frames(), 30);
    }

    #[test]
    fn drops_frames_older_than_one_second() {
        let mut meter = FpsMeter::new(60, Duration::ZERO);
        let start = Instant::now();
        meter.frame_at(start);
        meter.frame_at(start + Duration::from_millis(500));
        meter.frame_at(start + Duration::from_millis(1200));
        assert_eq!(meter.fps(), 2);
        assert_eq!(meter.total_frames(), 3);
    }
}
