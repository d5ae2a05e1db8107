//! # MPEG Audio Layer III Frame Headers
//!
//! Parses the 4-byte frame header to find frame boundaries and per-frame
//! sample counts without touching the audio payload.

use super::FrameRequest;

/// Size of a frame header in bytes.
pub const HEADER_BYTES: usize = 4;

/// Largest possible Layer III frame (MPEG-1, 320 kbps, 32 kHz, padded).
pub const MAX_FRAME_BYTES: usize = 1441;

/// Largest per-channel sample count of a Layer III frame (MPEG-1).
pub const MAX_SAMPLES_PER_FRAME: usize = 1152;

const BITRATES_MPEG1_KBPS: [u32; 15] = [
    0, 32, 40, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320,
];
const BITRATES_MPEG2_KBPS: [u32; 15] = [
    0, 8, 16, 24, 32, 40, 48, 56, 64, 80, 96, 112, 128, 144, 160,
];

/// MPEG audio version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MpegVersion {
    Mpeg1,
    Mpeg2,
    Mpeg25,
}

impl MpegVersion {
    fn sample_rates(self) -> [u32; 3] {
        match self {
            MpegVersion::Mpeg1 => [44100, 48000, 32000],
            MpegVersion::Mpeg2 => [22050, 24000, 16000],
            MpegVersion::Mpeg25 => [11025, 12000, 8000],
        }
    }
}

/// Channel mode field of the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelMode {
    Stereo,
    JointStereo,
    DualChannel,
    Mono,
}

/// Decoded Layer III frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub version: MpegVersion,
    pub bitrate_kbps: u32,
    pub sample_rate: u32,
    pub padding: bool,
    /// A 16-bit CRC follows the header.
    pub crc_protected: bool,
    pub channel_mode: ChannelMode,
}

impl FrameHeader {
    /// Parse a header from the first four bytes of `bytes`.
    ///
    /// Returns `None` for anything that is not a Layer III header with a
    /// fixed bitrate, including free-format and reserved field values.
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        let b = bytes.get(..HEADER_BYTES)?;

        if b[0] != 0xFF || b[1] & 0xE0 != 0xE0 {
            return None;
        }

        let version = match (b[1] >> 3) & 0b11 {
            0b00 => MpegVersion::Mpeg25,
            0b10 => MpegVersion::Mpeg2,
            0b11 => MpegVersion::Mpeg1,
            _ => return None,
        };

        // Layer III only
        if (b[1] >> 1) & 0b11 != 0b01 {
            return None;
        }
        let crc_protected = b[1] & 0x01 == 0;

        let bitrate_index = (b[2] >> 4) as usize;
        if bitrate_index == 0 || bitrate_index == 15 {
            return None;
        }
        let bitrate_kbps = match version {
            MpegVersion::Mpeg1 => BITRATES_MPEG1_KBPS[bitrate_index],
            MpegVersion::Mpeg2 | MpegVersion::Mpeg25 => BITRATES_MPEG2_KBPS[bitrate_index],
        };

        let rate_index = ((b[2] >> 2) & 0b11) as usize;
        if rate_index == 3 {
            return None;
        }
        let sample_rate = version.sample_rates()[rate_index];
        let padding = (b[2] >> 1) & 0x01 == 1;

        let channel_mode = match b[3] >> 6 {
            0b00 => ChannelMode::Stereo,
            0b01 => ChannelMode::JointStereo,
            0b10 => ChannelMode::DualChannel,
            _ => ChannelMode::Mono,
        };

        // Reserved emphasis value
        if b[3] & 0b11 == 0b10 {
            return None;
        }

        Some(Self {
            version,
            bitrate_kbps,
            sample_rate,
            padding,
            crc_protected,
            channel_mode,
        })
    }

    /// Total frame length in bytes, header included.
    pub fn frame_bytes(&self) -> usize {
        let coefficient = match self.version {
            MpegVersion::Mpeg1 => 144_000,
            MpegVersion::Mpeg2 | MpegVersion::Mpeg25 => 72_000,
        };
        (coefficient * self.bitrate_kbps / self.sample_rate) as usize + usize::from(self.padding)
    }

    /// Samples per channel carried by the frame.
    pub fn samples_per_frame(&self) -> usize {
        match self.version {
            MpegVersion::Mpeg1 => 1152,
            MpegVersion::Mpeg2 | MpegVersion::Mpeg25 => 576,
        }
    }

    pub fn channels(&self) -> u16 {
        match self.channel_mode {
            ChannelMode::Mono => 1,
            _ => 2,
        }
    }

    /// Length of the side information block that follows the header (and CRC).
    pub fn side_info_bytes(&self) -> usize {
        match (self.version, self.channel_mode) {
            (MpegVersion::Mpeg1, ChannelMode::Mono) => 17,
            (MpegVersion::Mpeg1, _) => 32,
            (_, ChannelMode::Mono) => 9,
            _ => 17,
        }
    }

    /// Offset of the first byte after the side information.
    pub fn side_info_end(&self) -> usize {
        HEADER_BYTES + if self.crc_protected { 2 } else { 0 } + self.side_info_bytes()
    }

    /// Whether `other` could be the next frame of the same stream.
    pub fn is_compatible(&self, other: &FrameHeader) -> bool {
        self.version == other.version && self.sample_rate == other.sample_rate
    }
}

/// Locate a complete frame at the start of the request window.
///
/// The frame must fit entirely inside the window. When the request asks for
/// verification and the window extends past the frame, the following bytes
/// must also start a compatible header.
pub fn sync_frame(request: &FrameRequest<'_>) -> Option<FrameHeader> {
    let header = FrameHeader::parse(request.data)?;
    let frame_bytes = header.frame_bytes();
    if frame_bytes > request.data.len() {
        return None;
    }

    if request.verify_next {
        match request.data.get(frame_bytes..) {
            Some(next) if next.len() >= HEADER_BYTES => {
                let next = FrameHeader::parse(next)?;
                if !header.is_compatible(&next) {
                    return None;
                }
            }
            // Window ends inside the next header: only acceptable at end of input
            _ => {
                if !request.at_end {
                    return None;
                }
            }
        }
    }

    Some(header)
}
