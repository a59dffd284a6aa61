// src/resolution.rs
//! Named resolution presets.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A selectable surface resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ResolutionKey {
    #[default]
    #[serde(rename = "1080p")]
    FullHd,
    #[serde(rename = "4k")]
    Uhd4k,
    #[serde(rename = "8k")]
    Uhd8k,
    #[serde(rename = "16k")]
    Uhd16k,
}

impl ResolutionKey {
    /// Every preset, smallest first.
    pub const ALL: [ResolutionKey; 4] = [
        ResolutionKey::FullHd,
        ResolutionKey::Uhd4k,
        ResolutionKey::Uhd8k,
        ResolutionKey::Uhd16k,
    ];

    /// `(width, height)` in physical pixels.
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            ResolutionKey::FullHd => (1920, 1080),
            ResolutionKey::Uhd4k => (3840, 2160),
            ResolutionKey::Uhd8k => (7680, 4320),
            ResolutionKey::Uhd16k => (15360, 8640),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ResolutionKey::FullHd => "1080p",
            ResolutionKey::Uhd4k => "4k",
            ResolutionKey::Uhd8k => "8k",
            ResolutionKey::Uhd16k => "16k",
        }
    }

    /// Byte length of an RGBA buffer at this resolution.
    pub fn buffer_len(self) -> usize {
        let (width, height) = self.dimensions();
        crate::pixels::buffer_len(width, height)
    }
}

impl fmt::Display for ResolutionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ResolutionKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResolutionKey::ALL
            .into_iter()
            .find(|key| key.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown resolution '{}'", s))
    }
}
