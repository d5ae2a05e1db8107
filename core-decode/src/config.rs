//! # Decode Configuration
//!
//! Configuration types for the probe and read services.

use crate::error::{Mp3Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What the scanner does when a frame reports a different channel count or
/// sample rate than the first frame of the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatChangePolicy {
    /// Skip the frame without counting it and keep the first frame's format.
    #[default]
    KeepFirst,
    /// Fail the call with [`Mp3Error::FormatChanged`].
    Reject,
}

/// Decoder configuration.
///
/// Controls how far the frame scanner searches for audio, how metadata is
/// skipped, and how sample-accurate seeking trades accuracy for speed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeConfig {
    /// Maximum number of consecutive bytes stepped over while looking for a
    /// frame header.
    ///
    /// Before the first frame is found, exhausting this bound means the source
    /// holds no audio. After that it ends the stream.
    ///
    /// Default: 128 KiB.
    #[serde(default = "default_max_skip_bytes")]
    pub max_skip_bytes: u64,

    /// Whether a leading ID3v2 tag is skipped by its declared size.
    ///
    /// Default: true.
    #[serde(default = "default_skip_id3v2")]
    pub skip_id3v2: bool,

    /// Handling of frames whose format differs from the first frame.
    ///
    /// Default: [`FormatChangePolicy::KeepFirst`].
    #[serde(default)]
    pub format_change: FormatChangePolicy,

    /// Whether encoder delay and padding from a LAME header are trimmed.
    ///
    /// Default: true.
    #[serde(default = "default_gapless")]
    pub gapless: bool,

    /// Number of frames decoded ahead of a read's start position.
    ///
    /// `None` decodes every frame from the beginning of the stream. `Some(n)`
    /// only measures frames lying further than `n` frames before the start.
    ///
    /// Default: `None`.
    #[serde(default)]
    pub seek_preroll_frames: Option<u32>,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            max_skip_bytes: default_max_skip_bytes(),
            skip_id3v2: default_skip_id3v2(),
            format_change: FormatChangePolicy::default(),
            gapless: default_gapless(),
            seek_preroll_frames: None,
        }
    }
}

impl DecodeConfig {
    /// Configuration that fails on any stream format change.
    pub fn strict() -> Self {
        Self {
            format_change: FormatChangePolicy::Reject,
            ..Default::default()
        }
    }

    /// Configuration that measures frames far ahead of a read's start instead
    /// of decoding them.
    pub fn fast_seek() -> Self {
        Self {
            seek_preroll_frames: Some(2),
            ..Default::default()
        }
    }

    /// Parse a configuration from a JSON document.
    ///
    /// Missing fields take their default values.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Mp3Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&json)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.max_skip_bytes == 0 {
            return Err(Mp3Error::Config("max_skip_bytes must be > 0".to_string()));
        }

        if self.seek_preroll_frames == Some(0) {
            return Err(Mp3Error::Config(
                "seek_preroll_frames must be > 0 when set".to_string(),
            ));
        }

        Ok(())
    }
}

// ============================================================================
// Default Functions (for serde)
// ============================================================================

fn default_max_skip_bytes() -> u64 {
    128 * 1024 // 128 KiB
}

fn default_skip_id3v2() -> bool {
    true
}

fn default_gapless() -> bool {
    true
}
