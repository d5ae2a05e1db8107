//! Xing/Info tag and LAME gapless header parsing.
//!
//! Encoders write the tag into the first frame of the stream in place of
//! audio. The frame itself is never played back.

use crate::engine::FrameHeader;

const FLAG_FRAMES: u32 = 0x1;
const FLAG_BYTES: u32 = 0x2;
const FLAG_TOC: u32 = 0x4;
const FLAG_VBR_SCALE: u32 = 0x8;

/// Offset of the delay/padding field from the start of the LAME extension.
const LAME_DELAY_OFFSET: usize = 21;

/// Decoder delay inherent to Layer III synthesis, added to the encoder delay.
const DECODER_DELAY: u32 = 529;

/// Contents of a Xing/Info tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct VbrTag {
    /// Audio frames following the tag frame.
    pub frames: Option<u32>,
    /// Samples to drop from the start of the decoded stream.
    pub delay: u32,
    /// Samples to drop from the end of the decoded stream.
    pub padding: u32,
}

impl VbrTag {
    /// Range of raw sample positions that remain after gapless trimming.
    pub(crate) fn trim_window(&self, samples_per_frame: u64) -> TrimWindow {
        let end = self.frames.map(|frames| {
            (u64::from(frames) * samples_per_frame).saturating_sub(u64::from(self.padding))
        });
        TrimWindow {
            start: u64::from(self.delay),
            end,
        }
    }
}

/// Half-open range `[start, end)` of raw sample positions to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TrimWindow {
    pub start: u64,
    pub end: Option<u64>,
}

impl TrimWindow {
    /// Portion `[lo, hi)` of a frame covering raw positions
    /// `[frame_start, frame_start + samples)` that lies inside the window.
    pub(crate) fn clip(&self, frame_start: u64, samples: usize) -> (usize, usize) {
        let frame_end = frame_start + samples as u64;
        let keep_start = self.start.max(frame_start);
        let keep_end = self.end.map_or(frame_end, |end| end.min(frame_end));
        if keep_start >= keep_end {
            return (0, 0);
        }
        (
            (keep_start - frame_start) as usize,
            (keep_end - frame_start) as usize,
        )
    }
}

/// Parse a Xing/Info tag from a complete frame.
pub(crate) fn parse_vbr_tag(frame: &[u8]) -> Option<VbrTag> {
    let header = FrameHeader::parse(frame)?;
    let tag = frame.get(header.side_info_end()..)?;
    if tag.len() < 8 || !(tag.starts_with(b"Xing") || tag.starts_with(b"Info")) {
        return None;
    }

    let flags = read_u32(tag, 4)?;
    let mut pos = 8;

    let frames = if flags & FLAG_FRAMES != 0 {
        let frames = read_u32(tag, pos)?;
        pos += 4;
        Some(frames)
    } else {
        None
    };
    if flags & FLAG_BYTES != 0 {
        pos += 4;
    }
    if flags & FLAG_TOC != 0 {
        pos += 100;
    }
    if flags & FLAG_VBR_SCALE != 0 {
        pos += 4;
    }

    let (delay, padding) = match tag.get(pos..pos + LAME_DELAY_OFFSET + 3) {
        // A LAME extension starts with a non-empty encoder version string
        Some(ext) if ext[0] != 0 => {
            let d = &ext[LAME_DELAY_OFFSET..];
            let encoder_delay = (u32::from(d[0]) << 4) | (u32::from(d[1]) >> 4);
            let encoder_padding = ((u32::from(d[1]) & 0x0F) << 8) | u32::from(d[2]);
            (
                encoder_delay + DECODER_DELAY,
                encoder_padding.saturating_sub(DECODER_DELAY),
            )
        }
        _ => (0, 0),
    };

    Some(VbrTag {
        frames,
        delay,
        padding,
    })
}

fn read_u32(data: &[u8], pos: usize) -> Option<u32> {
    let bytes = data.get(pos..pos + 4)?;
    Some(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}
