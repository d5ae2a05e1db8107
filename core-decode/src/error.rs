//! # Decode Error Types
//!
//! Error taxonomy shared by every probe and read operation.

use thiserror::Error;

/// Errors that can occur while probing or reading an MP3 source.
#[derive(Error, Debug)]
pub enum Mp3Error {
    // ========================================================================
    // Argument Errors
    // ========================================================================
    /// A source or destination argument cannot be used as given.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Decoder configuration is invalid or could not be parsed.
    #[error("Invalid configuration: {0}")]
    Config(String),

    // ========================================================================
    // Source Errors
    // ========================================================================
    /// The source could not be opened or read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // ========================================================================
    // Decoding Errors
    // ========================================================================
    /// No valid MP3 frame was found anywhere in the source.
    #[error("No valid MP3 audio frames found")]
    NoAudioFrames,

    /// A frame changed the stream format while the reject policy was active.
    #[error(
        "Stream format changed at byte {offset}: {channels} ch @ {sample_rate} Hz, \
         expected {expected_channels} ch @ {expected_sample_rate} Hz"
    )]
    FormatChanged {
        offset: u64,
        channels: u16,
        sample_rate: u32,
        expected_channels: u16,
        expected_sample_rate: u32,
    },

    /// The frame decode engine failed in a way that cannot be recovered.
    #[error("Decode engine error: {0}")]
    Engine(String),
}

impl Mp3Error {
    /// Returns `true` if the source is not valid audio.
    ///
    /// Callers use this to separate "this file is not an MP3" from argument
    /// and I/O failures.
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            Mp3Error::NoAudioFrames | Mp3Error::FormatChanged { .. } | Mp3Error::Engine(_)
        )
    }

    /// Returns `true` if the source could not be opened or read.
    pub fn is_io_error(&self) -> bool {
        matches!(self, Mp3Error::Io(_))
    }

    /// Returns `true` if the caller passed an unusable argument or configuration.
    pub fn is_argument_error(&self) -> bool {
        matches!(self, Mp3Error::InvalidArgument(_) | Mp3Error::Config(_))
    }
}

/// Result type for decode operations.
pub type Result<T> = std::result::Result<T, Mp3Error>;
