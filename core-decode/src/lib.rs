//! # MP3 Decode Module
//!
//! Sample-accurate probing and windowed decoding of MPEG audio Layer III
//! streams.
//!
//! ## Overview
//!
//! This module handles:
//! - Source normalization (file paths, memory buffers, memory maps)
//! - Frame scanning with resynchronisation, ID3v2 skipping and gapless trimming
//! - Probing total length and format
//! - Reading an arbitrary window of samples into caller or decoder storage
//! - Frame synthesis through Symphonia (optional, feature-gated)
//!
//! ## Example
//!
//! ```rust,ignore
//! use core_decode::{Destination, Mp3Decoder, ReadWindow};
//!
//! let decoder = Mp3Decoder::new();
//! let info = decoder.probe("track.mp3")?;
//! let output = decoder.read("track.mp3", ReadWindow::new(44100, Some(1024)), Destination::Allocate)?;
//! ```

pub mod config;
pub mod decoder;
pub mod engine;
pub mod error;
pub mod output;
pub mod probe;
pub mod read;
pub mod scanner;
pub mod source;

pub use config::{DecodeConfig, FormatChangePolicy};
pub use decoder::{Mp3Decoder, ReadOutput};
pub use engine::{EngineFactory, FrameEngine, FrameInfo, FrameRequest};
pub use error::{Mp3Error, Result};
pub use output::{
    crop_to_samples, Destination, InterleavedMut, OutputRegion, Pcm, PcmAllocator, PcmBuffer,
    ZeroedAllocator,
};
pub use probe::StreamInfo;
pub use read::{ReadResult, ReadWindow};
pub use scanner::{DecodedFrame, FrameScanner, ScanCursor, ScanMode, ScanStep, StreamFormat};
pub use source::{ByteSource, SourceInput};

#[cfg(feature = "decoder-mp3")]
pub use decoder::{probe, read};
#[cfg(feature = "decoder-mp3")]
pub use engine::{SymphoniaEngine, SymphoniaEngineFactory};

// Re-exported so callers can build mapped sources without a direct dependency
pub use memmap2::Mmap;
pub use bytes::Bytes;
