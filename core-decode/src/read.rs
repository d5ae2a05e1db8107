//! # Read Service
//!
//! Decodes a window of samples into an [`OutputRegion`].
//!
//! Frames are decoded from the start of the stream so that the bit reservoir
//! and overlap state match a linear decode exactly. Samples before the
//! window start are discarded. With [`DecodeConfig::seek_preroll_frames`] set,
//! frames far enough before the start are only measured, and the engine
//! resumes decoding a few frames ahead of the window.
//!
//! [`DecodeConfig::seek_preroll_frames`]: crate::config::DecodeConfig::seek_preroll_frames

use crate::engine::MAX_SAMPLES_PER_FRAME;
use crate::error::{Mp3Error, Result};
use crate::output::OutputRegion;
use crate::scanner::{FrameScanner, ScanCursor, ScanMode, ScanStep};
use tracing::{debug, trace};

/// Window of samples to decode, in samples per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReadWindow {
    /// Samples to skip from the start of the stream.
    pub start: u64,
    /// Samples to produce, or `None` to read to the end of the stream.
    ///
    /// `Some(0)` produces no samples.
    pub length: Option<u64>,
}

impl ReadWindow {
    /// The whole stream.
    pub const ALL: ReadWindow = ReadWindow {
        start: 0,
        length: None,
    };

    pub fn new(start: u64, length: Option<u64>) -> Self {
        Self { start, length }
    }

    /// From `start` to the end of the stream.
    pub fn from_start(start: u64) -> Self {
        Self {
            start,
            length: None,
        }
    }

    pub fn with_length(self, length: u64) -> Self {
        Self {
            length: Some(length),
            ..self
        }
    }
}

/// Outcome of a read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadResult {
    /// Samples per channel written to the destination.
    pub samples_written: u64,
    pub channels: u16,
    pub sample_rate: u32,
}

/// Decode `window` from the scanner's source into `region`.
///
/// Writing stops at the window length, at the region's capacity, or at the
/// end of the stream, whichever comes first. Only whole sample frames are
/// written.
///
/// # Errors
///
/// [`Mp3Error::InvalidArgument`] if the region is shaped for a different
/// channel count than the stream. Scanner errors are propagated.
pub fn read_stream<R: OutputRegion>(
    scanner: &mut FrameScanner<'_>,
    window: ReadWindow,
    region: &mut R,
) -> Result<ReadResult> {
    let preroll = scanner.config().seek_preroll_frames;
    let mut cursor = ScanCursor::new();
    let mut seen = 0u64;
    let mut written = 0u64;
    let mut limit: Option<u64> = None;
    let mut measured_frames = 0u64;

    loop {
        let mode = match preroll {
            Some(frames) if measurable(seen, frames, window.start) => ScanMode::CountOnly,
            _ => ScanMode::Decode,
        };

        let frame = match scanner.next_frame(&mut cursor, mode)? {
            ScanStep::Frame(frame) => frame,
            ScanStep::End => break,
        };
        if mode == ScanMode::CountOnly {
            measured_frames += 1;
        }

        let channels = frame.channels as usize;
        let limit = match limit {
            Some(limit) => limit,
            None => {
                region.check_channels(frame.channels)?;
                let capacity = (region.capacity_values() / channels) as u64;
                let wanted = window.length.unwrap_or(u64::MAX);
                if capacity < wanted && window.length.is_some() {
                    debug!(capacity, requested = wanted, "Destination smaller than requested length");
                }
                *limit.insert(wanted.min(capacity))
            }
        };
        if written >= limit {
            break;
        }

        let frame_start = seen;
        seen += frame.samples as u64;
        if seen <= window.start {
            continue;
        }

        let skip = window.start.saturating_sub(frame_start) as usize;
        let take = ((frame.samples - skip) as u64).min(limit - written) as usize;
        let values = frame
            .pcm
            .get(skip * channels..(skip + take) * channels)
            .ok_or_else(|| Mp3Error::Engine("frame PCM shorter than its sample count".to_string()))?;

        trace!(frame_start, skip, take, "Copying frame samples");
        region.write_values(written as usize * channels, values);
        written += take as u64;

        if written >= limit {
            break;
        }
    }

    let format = cursor.format().ok_or(Mp3Error::NoAudioFrames)?;
    if measured_frames > 0 {
        debug!(measured_frames, "Measured frames ahead of read start");
    }

    Ok(ReadResult {
        samples_written: written,
        channels: format.channels,
        sample_rate: format.sample_rate,
    })
}

/// Whether the frame beginning at `seen` lies more than `preroll` frames
/// before `start`.
fn measurable(seen: u64, preroll: u32, start: u64) -> bool {
    let margin = (u64::from(preroll) + 1) * MAX_SAMPLES_PER_FRAME as u64;
    seen.saturating_add(margin) <= start
}
