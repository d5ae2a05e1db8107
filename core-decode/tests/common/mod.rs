//! Shared fixtures: synthetic MP3 streams and a deterministic test engine.

#![allow(dead_code)]

use core_decode::engine::sync_frame;
use core_decode::{EngineFactory, FrameEngine, FrameInfo, FrameRequest, Result};
use std::io::Write;
use std::sync::Arc;

/// MPEG-1 Layer III, 128 kbps, 44100 Hz, stereo, no CRC.
pub const STEREO_HEADER: [u8; 4] = [0xFF, 0xFB, 0x90, 0x00];
/// Same as [`STEREO_HEADER`] in mono.
pub const MONO_HEADER: [u8; 4] = [0xFF, 0xFB, 0x90, 0xC0];
/// MPEG-2 Layer III, 64 kbps, 22050 Hz, mono: 208 bytes, 576 samples.
pub const MPEG2_MONO_HEADER: [u8; 4] = [0xFF, 0xF3, 0x80, 0xC0];

pub const FRAME_BYTES: usize = 417;
pub const SAMPLES_PER_FRAME: u64 = 1152;

/// `count` silent frames. Zeroed side information and main data decode to
/// digital silence.
pub fn silent_frames(header: [u8; 4], count: usize) -> Vec<u8> {
    let frame_bytes = frame_len(header);
    let mut data = Vec::with_capacity(count * frame_bytes);
    for _ in 0..count {
        let start = data.len();
        data.resize(start + frame_bytes, 0);
        data[start..start + 4].copy_from_slice(&header);
    }
    data
}

fn frame_len(header: [u8; 4]) -> usize {
    match header {
        MPEG2_MONO_HEADER => 72_000 * 64 / 22050,
        _ => FRAME_BYTES,
    }
}

/// ID3v2.4 tag with `body` zero bytes of payload.
pub fn id3v2_tag(body: usize) -> Vec<u8> {
    let size = body as u32;
    let mut tag = vec![
        b'I',
        b'D',
        b'3',
        4,
        0,
        0,
        ((size >> 21) & 0x7F) as u8,
        ((size >> 14) & 0x7F) as u8,
        ((size >> 7) & 0x7F) as u8,
        (size & 0x7F) as u8,
    ];
    tag.resize(10 + body, 0);
    tag
}

/// Info tag frame carrying a frame count and LAME encoder delay/padding.
pub fn lame_info_frame(frames: u32, encoder_delay: u16, encoder_padding: u16) -> Vec<u8> {
    let mut frame = silent_frames(STEREO_HEADER, 1);
    let pos = 4 + 32;
    frame[pos..pos + 4].copy_from_slice(b"Info");
    frame[pos + 4..pos + 8].copy_from_slice(&1u32.to_be_bytes());
    frame[pos + 8..pos + 12].copy_from_slice(&frames.to_be_bytes());
    let ext = pos + 12;
    frame[ext..ext + 9].copy_from_slice(b"LAME3.100");
    let d = ext + 21;
    frame[d] = (encoder_delay >> 4) as u8;
    frame[d + 1] = (((encoder_delay & 0x0F) << 4) | (encoder_padding >> 8)) as u8;
    frame[d + 2] = (encoder_padding & 0xFF) as u8;
    frame
}

pub fn write_temp(data: &[u8]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("create temp file");
    file.write_all(data).expect("write temp file");
    file.flush().expect("flush temp file");
    file
}

/// Engine that parses real frame headers but synthesizes a ramp of the
/// global sample index (negated on the second channel).
pub struct RampEngine {
    next_index: u64,
    pcm: Vec<f32>,
}

impl RampEngine {
    pub fn new() -> Self {
        Self {
            next_index: 0,
            pcm: Vec::new(),
        }
    }
}

impl FrameEngine for RampEngine {
    fn next_frame(&mut self, request: FrameRequest<'_>) -> Result<Option<FrameInfo>> {
        self.pcm.clear();
        let header = match sync_frame(&request) {
            Some(header) => header,
            None => return Ok(None),
        };

        let samples = header.samples_per_frame();
        let channels = header.channels();
        if request.synthesize {
            for i in 0..samples as u64 {
                let value = (self.next_index + i) as f32;
                self.pcm.push(value);
                if channels == 2 {
                    self.pcm.push(-value);
                }
            }
        }
        self.next_index += samples as u64;

        Ok(Some(FrameInfo {
            frame_bytes: header.frame_bytes(),
            samples,
            channels,
            sample_rate: header.sample_rate,
        }))
    }

    fn pcm(&self) -> &[f32] {
        &self.pcm
    }

    fn reset(&mut self) {
        self.pcm.clear();
    }
}

pub struct RampFactory;

impl EngineFactory for RampFactory {
    fn create(&self) -> Result<Box<dyn FrameEngine>> {
        Ok(Box::new(RampEngine::new()))
    }
}

pub fn ramp_factory() -> Arc<dyn EngineFactory> {
    Arc::new(RampFactory)
}
