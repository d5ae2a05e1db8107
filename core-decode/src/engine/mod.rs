//! # Frame Decode Engine
//!
//! The seam between frame scanning and frame synthesis. The scanner drives an
//! engine one frame at a time; the engine finds a frame at the start of the
//! bytes it is given and optionally produces that frame's PCM.

pub mod header;

#[cfg(feature = "decoder-mp3")]
mod sample_converter;
#[cfg(feature = "decoder-mp3")]
mod symphonia;

pub use header::{sync_frame, ChannelMode, FrameHeader, MpegVersion};
pub use header::{HEADER_BYTES, MAX_FRAME_BYTES, MAX_SAMPLES_PER_FRAME};

#[cfg(feature = "decoder-mp3")]
pub use self::symphonia::{SymphoniaEngine, SymphoniaEngineFactory};

use crate::error::Result;

/// One attempt to decode the frame starting at `data[0]`.
#[derive(Debug, Clone, Copy)]
pub struct FrameRequest<'d> {
    /// Bytes from the current scan position onwards.
    pub data: &'d [u8],
    /// `data` runs to the end of the source.
    pub at_end: bool,
    /// Require the bytes after the frame to start another compatible header.
    pub verify_next: bool,
    /// Produce PCM for the frame. When `false` only the frame is measured.
    pub synthesize: bool,
}

/// What the engine found at the start of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameInfo {
    /// Bytes consumed by the frame.
    pub frame_bytes: usize,
    /// Samples per channel.
    pub samples: usize,
    pub channels: u16,
    pub sample_rate: u32,
}

/// Incremental MP3 frame decoder.
///
/// Implementations keep inter-frame state (the bit reservoir and overlap
/// buffers) between calls until [`FrameEngine::reset`].
pub trait FrameEngine {
    /// Decode the frame at the start of `request.data`.
    ///
    /// Returns `Ok(None)` when no frame starts there. A frame whose payload is
    /// damaged is still reported, with silence as its PCM.
    fn next_frame(&mut self, request: FrameRequest<'_>) -> Result<Option<FrameInfo>>;

    /// Interleaved PCM of the last frame returned by [`FrameEngine::next_frame`].
    ///
    /// Holds exactly `samples * channels` values after a synthesized frame and
    /// is empty after a measured one.
    fn pcm(&self) -> &[f32];

    /// Discard inter-frame state.
    fn reset(&mut self);
}

/// Creates one engine per probe or read call.
pub trait EngineFactory: Send + Sync {
    fn create(&self) -> Result<Box<dyn FrameEngine>>;
}

impl<F> EngineFactory for F
where
    F: Fn() -> Result<Box<dyn FrameEngine>> + Send + Sync,
{
    fn create(&self) -> Result<Box<dyn FrameEngine>> {
        self()
    }
}
