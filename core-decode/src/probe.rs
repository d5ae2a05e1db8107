//! # Probe Service
//!
//! Measures a stream's total length and format with a full count-only pass.

use crate::error::{Mp3Error, Result};
use crate::scanner::{FrameScanner, ScanCursor, ScanMode, ScanStep};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Length and format of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamInfo {
    /// Samples per channel across every frame of the stream.
    pub total_samples: u64,
    pub channels: u16,
    pub sample_rate: u32,
}

impl StreamInfo {
    /// Playback duration implied by the sample count.
    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.total_samples as f64 / self.sample_rate as f64)
    }
}

/// Scan every frame of the scanner's source without synthesizing PCM.
///
/// Channel count and sample rate come from the first frame.
pub fn probe_stream(scanner: &mut FrameScanner<'_>) -> Result<StreamInfo> {
    let mut cursor = ScanCursor::new();
    let mut total_samples = 0u64;
    let mut frames = 0u64;

    loop {
        match scanner.next_frame(&mut cursor, ScanMode::CountOnly)? {
            ScanStep::Frame(frame) => {
                total_samples += frame.samples as u64;
                frames += 1;
            }
            ScanStep::End => break,
        }
    }

    let format = cursor.format().ok_or(Mp3Error::NoAudioFrames)?;
    debug!(frames, total_samples, "Probe scan complete");

    Ok(StreamInfo {
        total_samples,
        channels: format.channels,
        sample_rate: format.sample_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DecodeConfig;
    use crate::scanner::tests::{frames, RampEngine, MONO_HEADER, STEREO_HEADER};
    use crate::source::{ByteSource, SourceInput};

    fn probe_bytes(data: &[u8]) -> Result<StreamInfo> {
        let source = ByteSource::open(SourceInput::from(data))?;
        let mut scanner = FrameScanner::new(source, Box::new(RampEngine::new()), DecodeConfig::default());
        probe_stream(&mut scanner)
    }

    #[test]
    fn test_probe_sums_frames() {
        let info = probe_bytes(&frames(STEREO_HEADER, 5)).unwrap();
        assert_eq!(info.total_samples, 5 * 1152);
        assert_eq!(info.channels, 2);
        assert_eq!(info.sample_rate, 44100);
    }

    #[test]
    fn test_probe_mono() {
        let info = probe_bytes(&frames(MONO_HEADER, 1)).unwrap();
        assert_eq!(info.total_samples, 1152);
        assert_eq!(info.channels, 1);
    }

    #[test]
    fn test_probe_invalid_input() {
        let err = probe_bytes(b"definitely not an mp3 file").unwrap_err();
        assert!(matches!(err, Mp3Error::NoAudioFrames));
    }

    #[test]
    fn test_duration() {
        let info = StreamInfo {
            total_samples: 88200,
            channels: 2,
            sample_rate: 44100,
        };
        assert_eq!(info.duration(), Duration::from_secs(2));
    }
}
