//! # Frame Scanner
//!
//! Walks a byte source frame by frame, driving a [`FrameEngine`] and
//! reporting each frame's sample count, format, byte advance and PCM.
//!
//! All scan state lives in an explicit [`ScanCursor`] owned by the caller,
//! so a fresh cursor always means a fresh pass from byte zero.
//!
//! ## Synchronisation
//!
//! - A leading ID3v2 tag is stepped over by its declared size.
//! - Trailing ID3v1 and APE tags are cut from the end of input, so the last
//!   frame ends exactly at end of input.
//! - Until the first frame is found, and after any skipped bytes, a frame is
//!   only accepted when the next header confirms it.
//! - Bytes that start no frame are skipped one at a time, up to
//!   [`DecodeConfig::max_skip_bytes`] consecutive bytes.
//! - A Xing/Info tag in the first frame is consumed without producing
//!   samples; its LAME delay and padding trim the decoded stream.

mod id3;
mod vbr_tag;

use crate::config::{DecodeConfig, FormatChangePolicy};
use crate::engine::{FrameEngine, FrameRequest, HEADER_BYTES, MAX_FRAME_BYTES};
use crate::error::{Mp3Error, Result};
use crate::source::ByteSource;
use id3::{
    ape_tag_len, id3v2_tag_len, is_id3v1_extended, is_id3v1_tag, APE_FOOTER_BYTES,
    ID3V1_EXTENDED_BYTES, ID3V1_TAG_BYTES, ID3V2_HEADER_BYTES,
};
use tracing::{debug, error, trace, warn};
use vbr_tag::{parse_vbr_tag, TrimWindow};

/// Bytes handed to the engine per attempt: a maximal frame plus the
/// following header, twice over so resync checks never straddle a refill.
pub(crate) const SCAN_WINDOW_BYTES: usize = 2 * (MAX_FRAME_BYTES + HEADER_BYTES);

/// Whether frames are synthesized or only measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// Produce PCM for each frame.
    Decode,
    /// Report sample counts without producing PCM.
    CountOnly,
}

/// Channel count and sample rate of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamFormat {
    pub channels: u16,
    pub sample_rate: u32,
}

/// Position and state of one pass over a source.
#[derive(Debug, Clone, Default)]
pub struct ScanCursor {
    /// Offset of the next byte to examine.
    pub byte_offset: u64,
    /// Samples per channel reported so far.
    pub samples_emitted: u64,
    /// Samples per channel decoded so far, before gapless trimming.
    raw_samples: u64,
    /// End of audio data, before any trailing tags.
    end: u64,
    format: Option<StreamFormat>,
    trim: Option<TrimWindow>,
    skipped_run: u64,
    started: bool,
    last_mode: Option<ScanMode>,
}

impl ScanCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Format fixed by the first frame, once one has been found.
    pub fn format(&self) -> Option<StreamFormat> {
        self.format
    }
}

/// One decoded (or measured) frame.
#[derive(Debug, Clone, Copy)]
pub struct DecodedFrame<'s> {
    /// Samples per channel, after gapless trimming.
    pub samples: usize,
    pub channels: u16,
    pub sample_rate: u32,
    /// Bytes the frame occupied in the source.
    pub byte_advance: usize,
    /// Interleaved PCM, `samples * channels` values. Empty for measured frames.
    pub pcm: &'s [f32],
}

/// Result of one scanner step.
#[derive(Debug)]
pub enum ScanStep<'s> {
    Frame(DecodedFrame<'s>),
    End,
}

/// Frame scanner over one byte source, owned for the duration of a call.
pub struct FrameScanner<'a> {
    source: ByteSource<'a>,
    engine: Box<dyn FrameEngine>,
    config: DecodeConfig,
}

impl<'a> FrameScanner<'a> {
    pub fn new(source: ByteSource<'a>, engine: Box<dyn FrameEngine>, config: DecodeConfig) -> Self {
        Self {
            source,
            engine,
            config,
        }
    }

    pub fn config(&self) -> &DecodeConfig {
        &self.config
    }

    pub fn source_len(&self) -> u64 {
        self.source.length_bytes()
    }

    /// Advance to the next frame that contributes samples.
    ///
    /// # Errors
    ///
    /// - [`Mp3Error::NoAudioFrames`] if the source ends, or the skip bound is
    ///   exhausted, before any frame was found
    /// - [`Mp3Error::FormatChanged`] under [`FormatChangePolicy::Reject`]
    /// - I/O and engine failures are propagated
    pub fn next_frame(&mut self, cursor: &mut ScanCursor, mode: ScanMode) -> Result<ScanStep<'_>> {
        if !cursor.started {
            cursor.started = true;
            if self.config.skip_id3v2 {
                self.skip_leading_tags(cursor)?;
            }
            cursor.end = self.audio_end(cursor.byte_offset)?;
        }

        // Measured frames leave the engine without reservoir history
        if mode == ScanMode::Decode && cursor.last_mode == Some(ScanMode::CountOnly) {
            trace!(offset = cursor.byte_offset, "Resetting engine after measured frames");
            self.engine.reset();
        }
        cursor.last_mode = Some(mode);

        let total = cursor.end;

        loop {
            if cursor.byte_offset >= total {
                return end_of_input(cursor);
            }

            let wanted = (total - cursor.byte_offset).min(SCAN_WINDOW_BYTES as u64) as usize;
            let data = self.source.read_at(cursor.byte_offset, wanted)?;
            let at_end = cursor.byte_offset + data.len() as u64 >= total;
            let request = FrameRequest {
                data,
                at_end,
                verify_next: cursor.format.is_none() || cursor.skipped_run > 0,
                synthesize: mode == ScanMode::Decode,
            };

            let info = match self.engine.next_frame(request)? {
                Some(info) => info,
                None => {
                    cursor.byte_offset += 1;
                    cursor.skipped_run += 1;
                    if cursor.skipped_run > self.config.max_skip_bytes {
                        return skip_bound_exhausted(cursor, total);
                    }
                    continue;
                }
            };

            let frame_offset = cursor.byte_offset;
            if cursor.skipped_run > 0 {
                if cursor.format.is_some() {
                    warn!(
                        skipped = cursor.skipped_run,
                        offset = frame_offset,
                        "Resynchronised after skipping bytes"
                    );
                } else {
                    debug!(skipped = cursor.skipped_run, "Skipped leading non-audio bytes");
                }
                cursor.skipped_run = 0;
            }
            cursor.byte_offset += info.frame_bytes as u64;

            let format = StreamFormat {
                channels: info.channels,
                sample_rate: info.sample_rate,
            };
            match cursor.format {
                None => {
                    cursor.format = Some(format);
                    debug!(
                        offset = frame_offset,
                        channels = format.channels,
                        sample_rate = format.sample_rate,
                        "Found first audio frame"
                    );

                    let frame = &data[..info.frame_bytes.min(data.len())];
                    if let Some(tag) = parse_vbr_tag(frame) {
                        debug!(
                            frames = ?tag.frames,
                            delay = tag.delay,
                            padding = tag.padding,
                            "Consumed Xing/Info tag frame"
                        );
                        if self.config.gapless && (tag.delay > 0 || tag.padding > 0) {
                            cursor.trim = Some(tag.trim_window(info.samples as u64));
                        }
                        continue;
                    }
                }
                Some(expected) if expected != format => match self.config.format_change {
                    FormatChangePolicy::Reject => {
                        error!(
                            offset = frame_offset,
                            channels = format.channels,
                            sample_rate = format.sample_rate,
                            "Stream format changed"
                        );
                        return Err(Mp3Error::FormatChanged {
                            offset: frame_offset,
                            channels: format.channels,
                            sample_rate: format.sample_rate,
                            expected_channels: expected.channels,
                            expected_sample_rate: expected.sample_rate,
                        });
                    }
                    FormatChangePolicy::KeepFirst => {
                        warn!(
                            offset = frame_offset,
                            channels = format.channels,
                            sample_rate = format.sample_rate,
                            "Skipping frame with changed format"
                        );
                        continue;
                    }
                },
                Some(_) => {}
            }

            let raw_start = cursor.raw_samples;
            cursor.raw_samples += info.samples as u64;
            let (lo, hi) = match cursor.trim {
                Some(trim) => trim.clip(raw_start, info.samples),
                None => (0, info.samples),
            };
            if lo >= hi {
                trace!(offset = frame_offset, "Frame trimmed entirely");
                continue;
            }

            cursor.samples_emitted += (hi - lo) as u64;

            let channels = info.channels as usize;
            let pcm = self.engine.pcm();
            let pcm = match pcm.get(lo * channels..hi * channels) {
                Some(pcm) if mode == ScanMode::Decode => pcm,
                _ => &[],
            };

            return Ok(ScanStep::Frame(DecodedFrame {
                samples: hi - lo,
                channels: info.channels,
                sample_rate: info.sample_rate,
                byte_advance: info.frame_bytes,
                pcm,
            }));
        }
    }

    fn skip_leading_tags(&mut self, cursor: &mut ScanCursor) -> Result<()> {
        loop {
            let header = self.source.read_at(cursor.byte_offset, ID3V2_HEADER_BYTES)?;
            match id3v2_tag_len(header) {
                Some(len) => {
                    debug!(offset = cursor.byte_offset, bytes = len, "Skipping ID3v2 tag");
                    cursor.byte_offset += len;
                }
                None => return Ok(()),
            }
        }
    }

    /// Offset where audio data ends, with trailing ID3v1 and APE tags cut.
    /// Never earlier than `start`.
    fn audio_end(&mut self, start: u64) -> Result<u64> {
        let mut end = self.source.length_bytes();

        if end.saturating_sub(start) >= ID3V1_TAG_BYTES
            && is_id3v1_tag(self.source.read_at(end - ID3V1_TAG_BYTES, 3)?)
        {
            debug!(offset = end - ID3V1_TAG_BYTES, "Ignoring trailing ID3v1 tag");
            end -= ID3V1_TAG_BYTES;
            if end.saturating_sub(start) >= ID3V1_EXTENDED_BYTES
                && is_id3v1_extended(self.source.read_at(end - ID3V1_EXTENDED_BYTES, 4)?)
            {
                end -= ID3V1_EXTENDED_BYTES;
            }
        }

        if end.saturating_sub(start) >= APE_FOOTER_BYTES {
            let footer = self
                .source
                .read_at(end - APE_FOOTER_BYTES, APE_FOOTER_BYTES as usize)?;
            if let Some(len) = ape_tag_len(footer).filter(|len| *len <= end - start) {
                debug!(offset = end - len, bytes = len, "Ignoring trailing APE tag");
                end -= len;
            }
        }

        Ok(end)
    }
}

fn end_of_input<'s>(cursor: &ScanCursor) -> Result<ScanStep<'s>> {
    if cursor.format.is_none() {
        error!("Source ended before any audio frame");
        return Err(Mp3Error::NoAudioFrames);
    }
    trace!(samples = cursor.samples_emitted, "End of stream");
    Ok(ScanStep::End)
}

fn skip_bound_exhausted<'s>(cursor: &mut ScanCursor, total: u64) -> Result<ScanStep<'s>> {
    if cursor.format.is_none() {
        error!(
            skipped = cursor.skipped_run,
            "No frame header within skip bound"
        );
        return Err(Mp3Error::NoAudioFrames);
    }
    warn!(
        offset = cursor.byte_offset,
        skipped = cursor.skipped_run,
        "Lost frame sync, ending stream"
    );
    cursor.byte_offset = total;
    Ok(ScanStep::End)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::engine::{sync_frame, FrameInfo};
    use crate::source::SourceInput;

    pub(crate) const STEREO_HEADER: [u8; 4] = [0xFF, 0xFB, 0x90, 0x00];
    pub(crate) const MONO_HEADER: [u8; 4] = [0xFF, 0xFB, 0x90, 0xC0];
    pub(crate) const FRAME_BYTES: usize = 417;

    /// Engine whose PCM is a ramp of the global per-channel sample index, so
    /// tests can check exactly which samples land where.
    pub(crate) struct RampEngine {
        next_index: u64,
        pcm: Vec<f32>,
        pub resets: usize,
    }

    impl RampEngine {
        pub(crate) fn new() -> Self {
            Self {
                next_index: 0,
                pcm: Vec::new(),
                resets: 0,
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
            let channels = header.channels() as usize;
            if request.synthesize {
                for i in 0..samples {
                    let value = (self.next_index + i as u64) as f32;
                    for c in 0..channels {
                        self.pcm.push(if c == 0 { value } else { -value });
                    }
                }
            }
            self.next_index += samples as u64;
            Ok(Some(FrameInfo {
                frame_bytes: header.frame_bytes(),
                samples,
                channels: header.channels(),
                sample_rate: header.sample_rate,
            }))
        }

        fn pcm(&self) -> &[f32] {
            &self.pcm
        }

        fn reset(&mut self) {
            self.resets += 1;
            self.pcm.clear();
        }
    }

    pub(crate) fn frames(header: [u8; 4], count: usize) -> Vec<u8> {
        let mut data = Vec::with_capacity(count * FRAME_BYTES);
        for _ in 0..count {
            let start = data.len();
            data.resize(start + FRAME_BYTES, 0);
            data[start..start + 4].copy_from_slice(&header);
        }
        data
    }

    fn scanner(data: &[u8], config: DecodeConfig) -> FrameScanner<'_> {
        let source = ByteSource::open(SourceInput::from(data)).unwrap();
        FrameScanner::new(source, Box::new(RampEngine::new()), config)
    }

    fn collect(scanner: &mut FrameScanner<'_>, mode: ScanMode) -> Result<Vec<(usize, u16, Vec<f32>)>> {
        let mut cursor = ScanCursor::new();
        let mut out = Vec::new();
        loop {
            match scanner.next_frame(&mut cursor, mode)? {
                ScanStep::Frame(frame) => {
                    out.push((frame.samples, frame.channels, frame.pcm.to_vec()))
                }
                ScanStep::End => return Ok(out),
            }
        }
    }

    #[test]
    fn test_scans_every_frame() {
        let data = frames(STEREO_HEADER, 3);
        let mut scanner = scanner(&data, DecodeConfig::default());

        let frames = collect(&mut scanner, ScanMode::Decode).unwrap();
        assert_eq!(frames.len(), 3);
        assert!(frames.iter().all(|(samples, channels, pcm)| {
            *samples == 1152 && *channels == 2 && pcm.len() == 2304
        }));
        assert_eq!(frames[1].2[0], 1152.0);
        assert_eq!(frames[1].2[1], -1152.0);
    }

    #[test]
    fn test_count_only_produces_no_pcm() {
        let data = frames(MONO_HEADER, 2);
        let mut scanner = scanner(&data, DecodeConfig::default());

        let frames = collect(&mut scanner, ScanMode::CountOnly).unwrap();
        assert_eq!(frames.len(), 2);
        assert!(frames.iter().all(|(_, _, pcm)| pcm.is_empty()));
    }

    #[test]
    fn test_skips_id3v2_and_leading_garbage() {
        let mut data = vec![b'I', b'D', b'3', 4, 0, 0, 0, 0, 0, 20];
        data.extend_from_slice(&[0xAB; 20]);
        data.extend_from_slice(&[0x00, 0xFF, 0x12]);
        data.extend_from_slice(&frames(STEREO_HEADER, 2));

        let mut scanner = scanner(&data, DecodeConfig::default());
        let mut cursor = ScanCursor::new();
        match scanner.next_frame(&mut cursor, ScanMode::CountOnly).unwrap() {
            ScanStep::Frame(frame) => assert_eq!(frame.byte_advance, FRAME_BYTES),
            ScanStep::End => panic!("expected a frame"),
        }
        assert_eq!(cursor.byte_offset, 30 + 3 + FRAME_BYTES as u64);
    }

    #[test]
    fn test_no_frames_is_error() {
        let data = vec![0u8; 5000];
        let mut scanner = scanner(&data, DecodeConfig::default());
        let err = collect(&mut scanner, ScanMode::Decode).unwrap_err();
        assert!(matches!(err, Mp3Error::NoAudioFrames));
    }

    #[test]
    fn test_empty_source_is_no_frames() {
        let mut scanner = scanner(&[], DecodeConfig::default());
        let err = collect(&mut scanner, ScanMode::CountOnly).unwrap_err();
        assert!(matches!(err, Mp3Error::NoAudioFrames));
    }

    #[test]
    fn test_skip_bound_before_first_frame() {
        let mut data = vec![0u8; 300];
        data.extend_from_slice(&frames(STEREO_HEADER, 2));

        let config = DecodeConfig {
            max_skip_bytes: 100,
            ..Default::default()
        };
        let mut bounded = scanner(&data, config);
        assert!(matches!(
            collect(&mut bounded, ScanMode::CountOnly).unwrap_err(),
            Mp3Error::NoAudioFrames
        ));

        let mut unbounded = scanner(&data, DecodeConfig::default());
        assert_eq!(collect(&mut unbounded, ScanMode::CountOnly).unwrap().len(), 2);
    }

    #[test]
    fn test_skip_bound_after_sync_ends_stream() {
        let mut data = frames(STEREO_HEADER, 2);
        data.extend_from_slice(&vec![0u8; 500]);
        data.extend_from_slice(&frames(STEREO_HEADER, 2));

        let config = DecodeConfig {
            max_skip_bytes: 100,
            ..Default::default()
        };
        let mut scanner = scanner(&data, config);
        assert_eq!(collect(&mut scanner, ScanMode::CountOnly).unwrap().len(), 2);
    }

    #[test]
    fn test_resyncs_across_garbage() {
        let mut data = frames(STEREO_HEADER, 2);
        data.extend_from_slice(&[0x11; 37]);
        data.extend_from_slice(&frames(STEREO_HEADER, 2));

        let mut scanner = scanner(&data, DecodeConfig::default());
        assert_eq!(collect(&mut scanner, ScanMode::CountOnly).unwrap().len(), 4);
    }

    #[test]
    fn test_truncated_final_frame_is_dropped() {
        let mut data = frames(STEREO_HEADER, 3);
        data.truncate(FRAME_BYTES * 2 + 200);

        let mut scanner = scanner(&data, DecodeConfig::default());
        assert_eq!(collect(&mut scanner, ScanMode::CountOnly).unwrap().len(), 2);
    }

    #[test]
    fn test_format_change_keep_first_skips_frames() {
        let mut data = frames(STEREO_HEADER, 2);
        data.extend_from_slice(&frames(MONO_HEADER, 1));
        data.extend_from_slice(&frames(STEREO_HEADER, 1));

        let mut scanner = scanner(&data, DecodeConfig::default());
        let frames = collect(&mut scanner, ScanMode::Decode).unwrap();
        assert_eq!(frames.len(), 3);
        assert!(frames.iter().all(|(_, channels, _)| *channels == 2));
    }

    #[test]
    fn test_format_change_reject_fails() {
        let mut data = frames(STEREO_HEADER, 2);
        data.extend_from_slice(&frames(MONO_HEADER, 1));

        let mut scanner = scanner(&data, DecodeConfig::strict());
        match collect(&mut scanner, ScanMode::Decode).unwrap_err() {
            Mp3Error::FormatChanged {
                offset,
                channels,
                expected_channels,
                ..
            } => {
                assert_eq!(offset, 2 * FRAME_BYTES as u64);
                assert_eq!(channels, 1);
                assert_eq!(expected_channels, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    fn info_frame(frames: u32, delay: u16, padding: u16) -> Vec<u8> {
        let mut frame = vec![0u8; FRAME_BYTES];
        frame[..4].copy_from_slice(&STEREO_HEADER);
        let pos = 36;
        frame[pos..pos + 4].copy_from_slice(b"Info");
        frame[pos + 4..pos + 8].copy_from_slice(&1u32.to_be_bytes());
        frame[pos + 8..pos + 12].copy_from_slice(&frames.to_be_bytes());
        let ext = pos + 12;
        frame[ext..ext + 9].copy_from_slice(b"LAME3.100");
        let d = ext + 21;
        frame[d] = (delay >> 4) as u8;
        frame[d + 1] = (((delay & 0x0F) << 4) | (padding >> 8)) as u8;
        frame[d + 2] = (padding & 0xFF) as u8;
        frame
    }

    #[test]
    fn test_gapless_trimming_from_lame_header() {
        // 1105 + 1000 samples trimmed from 3 frames of 1152
        let mut data = info_frame(3, 576, 1529);
        data.extend_from_slice(&frames(STEREO_HEADER, 3));

        let mut scanner = scanner(&data, DecodeConfig::default());
        let frames = collect(&mut scanner, ScanMode::Decode).unwrap();
        let total: usize = frames.iter().map(|(samples, _, _)| samples).sum();
        assert_eq!(total, 3 * 1152 - 1105 - 1000);

        // The engine also synthesized the tag frame, so the ramp starts one frame later
        assert_eq!(frames[0].2[0], (1152 + 1105) as f32);
        assert_eq!(frames[0].2.len(), frames[0].0 * 2);
    }

    #[test]
    fn test_gapless_disabled_keeps_all_samples() {
        let mut data = info_frame(3, 576, 1529);
        data.extend_from_slice(&frames(STEREO_HEADER, 3));

        let config = DecodeConfig {
            gapless: false,
            ..Default::default()
        };
        let mut scanner = scanner(&data, config);
        let frames = collect(&mut scanner, ScanMode::CountOnly).unwrap();
        // The tag frame itself never counts
        assert_eq!(frames.len(), 3);
    }

    #[test]
    fn test_engine_reset_when_switching_to_decode() {
        let data = frames(STEREO_HEADER, 3);
        let source = ByteSource::open(SourceInput::from(&data)).unwrap();
        let mut scanner = FrameScanner::new(source, Box::new(RampEngine::new()), DecodeConfig::default());
        let mut cursor = ScanCursor::new();

        assert!(matches!(
            scanner.next_frame(&mut cursor, ScanMode::CountOnly).unwrap(),
            ScanStep::Frame(_)
        ));
        match scanner.next_frame(&mut cursor, ScanMode::Decode).unwrap() {
            ScanStep::Frame(frame) => assert_eq!(frame.pcm.len(), 2304),
            ScanStep::End => panic!("expected a frame"),
        }
        assert_eq!(cursor.samples_emitted, 2304);
    }

    fn id3v1_tag() -> Vec<u8> {
        let mut tag = vec![0u8; 128];
        tag[..3].copy_from_slice(b"TAG");
        tag
    }

    #[test]
    fn test_single_frame_before_id3v1_tag() {
        let mut data = frames(STEREO_HEADER, 1);
        data.extend_from_slice(&id3v1_tag());

        let mut scanner = scanner(&data, DecodeConfig::default());
        assert_eq!(scanner.source_len(), FRAME_BYTES as u64 + 128);
        let frames = collect(&mut scanner, ScanMode::CountOnly).unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].0, 1152);
    }

    #[test]
    fn test_info_frame_before_id3v1_tag_has_no_samples() {
        let mut data = info_frame(0, 576, 0);
        data.extend_from_slice(&id3v1_tag());

        let mut scanner = scanner(&data, DecodeConfig::default());
        let mut cursor = ScanCursor::new();
        assert!(matches!(
            scanner.next_frame(&mut cursor, ScanMode::CountOnly).unwrap(),
            ScanStep::End
        ));
        assert_eq!(cursor.samples_emitted, 0);
        assert_eq!(
            cursor.format(),
            Some(StreamFormat {
                channels: 2,
                sample_rate: 44100
            })
        );
    }

    #[test]
    fn test_single_frame_before_ape_and_id3v1_tags() {
        let mut data = frames(MONO_HEADER, 1);
        let mut ape = vec![0u8; 40];
        let mut footer = b"APETAGEX".to_vec();
        footer.extend_from_slice(&2000u32.to_le_bytes());
        footer.extend_from_slice(&(40u32 + 32).to_le_bytes());
        footer.resize(32, 0);
        ape.extend_from_slice(&footer);
        data.extend_from_slice(&ape);
        data.extend_from_slice(&id3v1_tag());

        let mut scanner = scanner(&data, DecodeConfig::default());
        let frames = collect(&mut scanner, ScanMode::Decode).unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].2.len(), 1152);
    }

    #[test]
    fn test_tag_only_source_has_no_audio_frames() {
        let data = id3v1_tag();
        let mut scanner = scanner(&data, DecodeConfig::default());
        assert!(matches!(
            collect(&mut scanner, ScanMode::CountOnly),
            Err(Mp3Error::NoAudioFrames)
        ));
    }
}
