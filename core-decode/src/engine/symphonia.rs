//! # Symphonia Frame Engine
//!
//! Frame engine backed by Symphonia's MPEG audio codec. Frames are located
//! with the local header parser and handed to the codec one packet at a time,
//! so the scanner keeps full control over byte positions.

use super::sample_converter::SampleConverter;
use super::{sync_frame, EngineFactory, FrameEngine, FrameHeader, FrameInfo, FrameRequest};
use crate::error::{Mp3Error, Result};
use symphonia::core::audio::Channels;
use symphonia::core::codecs::{CodecParameters, Decoder, DecoderOptions, CODEC_TYPE_MP3};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::Packet;
use tracing::{debug, error, trace, warn};

/// Stream format a codec instance was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CodecFormat {
    sample_rate: u32,
    channels: u16,
}

/// MP3 frame engine using Symphonia for synthesis.
///
/// The codec is created lazily on the first synthesized frame and rebuilt
/// when a frame arrives with a different sample rate or channel count.
pub struct SymphoniaEngine {
    decoder: Option<Box<dyn Decoder>>,
    format: Option<CodecFormat>,
    pcm: Vec<f32>,
    /// Timestamp of the next packet, in samples.
    next_ts: u64,
}

impl SymphoniaEngine {
    pub fn new() -> Self {
        Self {
            decoder: None,
            format: None,
            pcm: Vec::new(),
            next_ts: 0,
        }
    }

    fn synthesize(&mut self, header: &FrameHeader, frame: &[u8]) -> Result<()> {
        let format = CodecFormat {
            sample_rate: header.sample_rate,
            channels: header.channels(),
        };
        if self.format != Some(format) || self.decoder.is_none() {
            self.decoder = Some(make_decoder(header)?);
            self.format = Some(format);
        }

        let decoder = match self.decoder.as_mut() {
            Some(decoder) => decoder,
            None => return Err(Mp3Error::Engine("MP3 codec unavailable".to_string())),
        };

        let spf = header.samples_per_frame();
        let packet = Packet::new_from_slice(0, self.next_ts, spf as u64, frame);
        self.next_ts += spf as u64;

        match decoder.decode(&packet) {
            Ok(decoded) => {
                SampleConverter::interleave_into(&decoded, &mut self.pcm);
            }
            Err(SymphoniaError::DecodeError(reason)) => {
                warn!("Frame failed to decode, substituting silence: {}", reason);
            }
            Err(SymphoniaError::IoError(e)) => {
                warn!("Frame payload truncated, substituting silence: {}", e);
            }
            Err(e) => {
                error!("Fatal decode error: {}", e);
                return Err(Mp3Error::Engine(format!("Failed to decode frame: {}", e)));
            }
        }

        // Every frame contributes exactly one frame's worth of samples
        let expected = spf * format.channels as usize;
        if self.pcm.len() != expected {
            trace!(got = self.pcm.len(), expected, "Adjusting frame PCM length");
            self.pcm.resize(expected, 0.0);
        }

        Ok(())
    }
}

impl Default for SymphoniaEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameEngine for SymphoniaEngine {
    fn next_frame(&mut self, request: FrameRequest<'_>) -> Result<Option<FrameInfo>> {
        self.pcm.clear();

        let header = match sync_frame(&request) {
            Some(header) => header,
            None => return Ok(None),
        };

        let info = FrameInfo {
            frame_bytes: header.frame_bytes(),
            samples: header.samples_per_frame(),
            channels: header.channels(),
            sample_rate: header.sample_rate,
        };

        if request.synthesize {
            self.synthesize(&header, &request.data[..info.frame_bytes])?;
        }

        Ok(Some(info))
    }

    fn pcm(&self) -> &[f32] {
        &self.pcm
    }

    fn reset(&mut self) {
        if let Some(decoder) = self.decoder.as_mut() {
            decoder.reset();
        }
        self.pcm.clear();
    }
}

fn make_decoder(header: &FrameHeader) -> Result<Box<dyn Decoder>> {
    let channels = match header.channels() {
        1 => Channels::FRONT_LEFT,
        _ => Channels::FRONT_LEFT | Channels::FRONT_RIGHT,
    };

    let mut params = CodecParameters::new();
    params
        .for_codec(CODEC_TYPE_MP3)
        .with_sample_rate(header.sample_rate)
        .with_channels(channels)
        .with_max_frames_per_packet(header.samples_per_frame() as u64);

    debug!(
        sample_rate = header.sample_rate,
        channels = header.channels(),
        "Creating MP3 codec"
    );

    symphonia::default::get_codecs()
        .make(&params, &DecoderOptions::default())
        .map_err(|e| {
            error!("Failed to create decoder: {}", e);
            Mp3Error::Engine(format!("Failed to create MP3 codec: {}", e))
        })
}

/// Factory producing a fresh [`SymphoniaEngine`] per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct SymphoniaEngineFactory;

impl EngineFactory for SymphoniaEngineFactory {
    fn create(&self) -> Result<Box<dyn FrameEngine>> {
        Ok(Box::new(SymphoniaEngine::new()))
    }
}
