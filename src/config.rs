// src/config.rs

//! Defines the configuration structures for `readback-bench`.
//!
//! The configuration is deserialized from a JSON file whose path is taken
//! from the `READBACK_BENCH_CONFIG` environment variable. Every section
//! carries `#[serde(default)]`, so a file only needs the keys it overrides.

use crate::backend::GraphicsKey;
use crate::resolution::ResolutionKey;
use anyhow::{Context, Result};
use log::{info, warn};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable naming the JSON config file.
pub const CONFIG_PATH_ENV: &str = "READBACK_BENCH_CONFIG";

/// Process-wide configuration, loaded on first access.
pub static CONFIG: Lazy<Config> = Lazy::new(Config::load_from_env);

// --- Root ---

/// Represents the complete configuration of the benchmark.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Initial option selection and autoplay.
    pub playback: PlaybackConfig,
    /// Frame pacing and FPS reporting.
    pub performance: PerformanceConfig,
    /// Rendering context settings.
    pub graphics: GraphicsConfig,
}

impl Config {
    /// Parses a config from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Failed to parse config JSON")
    }

    /// Reads and parses the config file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json(&text)
    }

    /// Loads from `READBACK_BENCH_CONFIG`, falling back to defaults if the
    /// variable is unset or the file cannot be used.
    pub fn load_from_env() -> Self {
        let Some(path) = std::env::var_os(CONFIG_PATH_ENV) else {
            info!("Config: {} not set, using defaults", CONFIG_PATH_ENV);
            return Self::default();
        };

        match Self::load(Path::new(&path)) {
            Ok(config) => {
                info!("Config: Loaded {}", Path::new(&path).display());
                config
            }
            Err(e) => {
                warn!("Config: {:#}. Using defaults.", e);
                Self::default()
            }
        }
    }
}

// --- Playback Configuration ---

/// Initial values of the user-selectable options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlaybackConfig {
    pub graphics: GraphicsKey,
    pub resolution: ResolutionKey,
    /// Ship each frame's pixels to the echo worker.
    pub use_workers: bool,
    /// Move buffers to and from the worker instead of copying them.
    pub use_transferables: bool,
    /// Start the loop without waiting for a `play` command.
    pub autoplay: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        PlaybackConfig {
            graphics: GraphicsKey::Canvas2d,
            resolution: ResolutionKey::FullHd,
            use_workers: true,
            use_transferables: true,
            autoplay: false,
        }
    }
}

// --- Frame pacing ---

/// Defines settings related to frame pacing and measurement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PerformanceConfig {
    /// Display refresh rate the vsync clock ticks at.
    pub target_fps: u32,
    /// Highest rate the FPS meter expects to measure.
    pub fps_meter_target: u32,
    /// How often the measured FPS is logged. 0 disables reporting.
    pub fps_report_interval_ms: u64,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        PerformanceConfig {
            target_fps: 60,
            fps_meter_target: 120,
            fps_report_interval_ms: 1000,
        }
    }
}

// --- Graphics Configuration ---

/// WebGL context power preference hint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PowerPreference {
    Default,
    #[default]
    HighPerformance,
    LowPower,
}

/// Settings applied when rendering contexts are created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GraphicsConfig {
    /// Backends whose context acquisition fails, to reproduce environments
    /// without 2D or WebGL2 support.
    pub unavailable: Vec<GraphicsKey>,
    pub webgl_power_preference: PowerPreference,
    pub canvas_will_read_frequently: bool,
}

impl Default for GraphicsConfig {
    fn default() -> Self {
        GraphicsConfig {
            unavailable: Vec::new(),
            webgl_power_preference: PowerPreference::HighPerformance,
            canvas_will_read_frequently: true,
        }
    }
}
