//! # MP3 Decoder
//!
//! Public entry points for probing and reading. Every call resolves its own
//! byte source, creates its own frame engine and releases both before
//! returning, so one [`Mp3Decoder`] may serve any number of calls.

use crate::config::DecodeConfig;
use crate::engine::EngineFactory;
use crate::error::{Mp3Error, Result};
use crate::output::{
    crop_to_samples, Destination, OutputRegion, Pcm, PcmAllocator, PcmBuffer, ZeroedAllocator,
};
use crate::probe::{probe_stream, StreamInfo};
use crate::read::{read_stream, ReadWindow};
use crate::scanner::FrameScanner;
use crate::source::{ByteSource, SourceInput};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// PCM returned from a read together with its sample count and format.
#[derive(Debug)]
pub struct ReadOutput<P> {
    /// Destination storage cropped to exactly the written samples.
    pub pcm: P,
    /// Samples per channel written.
    pub samples_written: u64,
    pub channels: u16,
    pub sample_rate: u32,
}

impl<P> ReadOutput<P> {
    pub fn map<Q>(self, f: impl FnOnce(P) -> Q) -> ReadOutput<Q> {
        ReadOutput {
            pcm: f(self.pcm),
            samples_written: self.samples_written,
            channels: self.channels,
            sample_rate: self.sample_rate,
        }
    }

    /// Split into the PCM view and its sample rate.
    pub fn into_parts(self) -> (P, u32) {
        (self.pcm, self.sample_rate)
    }
}

/// Probes and reads MP3 sources.
#[derive(Clone)]
pub struct Mp3Decoder {
    config: DecodeConfig,
    engines: Arc<dyn EngineFactory>,
    allocator: Arc<dyn PcmAllocator>,
}

impl Mp3Decoder {
    /// Decoder using the Symphonia engine and default configuration.
    #[cfg(feature = "decoder-mp3")]
    pub fn new() -> Self {
        Self::from_engine_factory(Arc::new(crate::engine::SymphoniaEngineFactory))
    }

    /// Decoder using engines from `factory`.
    pub fn from_engine_factory(factory: Arc<dyn EngineFactory>) -> Self {
        Self {
            config: DecodeConfig::default(),
            engines: factory,
            allocator: Arc::new(ZeroedAllocator),
        }
    }

    /// Replace the configuration after validating it.
    pub fn with_config(mut self, config: DecodeConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn with_engine_factory(mut self, factory: Arc<dyn EngineFactory>) -> Self {
        self.engines = factory;
        self
    }

    /// Replace the allocator used for [`Destination::Allocate`].
    pub fn with_allocator(mut self, allocator: Arc<dyn PcmAllocator>) -> Self {
        self.allocator = allocator;
        self
    }

    pub fn config(&self) -> &DecodeConfig {
        &self.config
    }

    fn open_scanner<'s>(&self, input: SourceInput<'s>) -> Result<FrameScanner<'s>> {
        let source = ByteSource::open(input)?;
        debug!(kind = source.kind(), bytes = source.length_bytes(), "Opened source");
        let engine = self.engines.create()?;
        Ok(FrameScanner::new(source, engine, self.config.clone()))
    }

    /// Total length and format of a stream.
    ///
    /// # Errors
    ///
    /// - [`Mp3Error::InvalidArgument`] for an empty path
    /// - [`Mp3Error::Io`] if the source cannot be opened or read
    /// - [`Mp3Error::NoAudioFrames`] if the source contains no MP3 frame
    #[instrument(skip(self, input))]
    pub fn probe<'s>(&self, input: impl Into<SourceInput<'s>>) -> Result<StreamInfo> {
        let mut scanner = self.open_scanner(input.into())?;
        let info = probe_stream(&mut scanner)?;
        info!(
            total_samples = info.total_samples,
            channels = info.channels,
            sample_rate = info.sample_rate,
            "Probed stream"
        );
        Ok(info)
    }

    /// Decode `window` into `destination`.
    ///
    /// The returned PCM has the representation of `destination`, cropped to
    /// exactly the samples written. With [`Destination::Allocate`] the stream
    /// is probed first to size the allocation.
    ///
    /// # Errors
    ///
    /// As [`Mp3Decoder::probe`], plus [`Mp3Error::InvalidArgument`] for a
    /// destination whose shape cannot hold the stream's channels.
    #[instrument(skip(self, input, destination), fields(start = window.start, length = ?window.length))]
    pub fn read<'s, 'd>(
        &self,
        input: impl Into<SourceInput<'s>>,
        window: ReadWindow,
        destination: Destination<'d>,
    ) -> Result<ReadOutput<Pcm<'d>>> {
        let input = input.into();
        match destination {
            Destination::Allocate => Ok(self.read_allocated(input, window)?.map(Pcm::Owned)),
            Destination::Interleaved(region) => {
                Ok(self.read_into(input, window, region)?.map(Pcm::Interleaved))
            }
            Destination::Samples(region) => {
                Ok(self.read_into(input, window, region)?.map(Pcm::Samples))
            }
            Destination::Raw(region) => Ok(self.read_into(input, window, region)?.map(Pcm::Raw)),
        }
    }

    /// Decode `window` into caller storage of any [`OutputRegion`] type.
    #[instrument(skip(self, input, region), fields(start = window.start, length = ?window.length))]
    pub fn read_into<'s, R: OutputRegion>(
        &self,
        input: impl Into<SourceInput<'s>>,
        window: ReadWindow,
        region: R,
    ) -> Result<ReadOutput<R>> {
        region.validate_shape()?;

        let mut region = region;
        let result = {
            let mut scanner = self.open_scanner(input.into())?;
            read_stream(&mut scanner, window, &mut region)?
        };

        let pcm = crop_to_samples(region, result.samples_written, result.channels);
        info!(
            samples = result.samples_written,
            channels = result.channels,
            sample_rate = result.sample_rate,
            "Read samples"
        );

        Ok(ReadOutput {
            pcm,
            samples_written: result.samples_written,
            channels: result.channels,
            sample_rate: result.sample_rate,
        })
    }

    fn read_allocated(&self, input: SourceInput<'_>, window: ReadWindow) -> Result<ReadOutput<PcmBuffer>> {
        let info = self.probe(input.clone())?;
        let available = info.total_samples.saturating_sub(window.start);
        let samples = window.length.map_or(available, |length| length.min(available));

        let frames = usize::try_from(samples)
            .ok()
            .filter(|frames| frames.checked_mul(info.channels as usize).is_some())
            .ok_or_else(|| {
                Mp3Error::InvalidArgument(format!(
                    "{} samples of {} channels do not fit in memory",
                    samples, info.channels
                ))
            })?;

        debug!(frames, channels = info.channels, "Allocating PCM buffer");
        let buffer = self.allocator.allocate(frames, info.channels);
        self.read_into(input, window, buffer)
    }
}

#[cfg(feature = "decoder-mp3")]
impl Default for Mp3Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Mp3Decoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mp3Decoder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Probe `input` with the default decoder.
#[cfg(feature = "decoder-mp3")]
pub fn probe<'s>(input: impl Into<SourceInput<'s>>) -> Result<StreamInfo> {
    Mp3Decoder::new().probe(input)
}

/// Read `window` from `input` into `destination` with the default decoder.
#[cfg(feature = "decoder-mp3")]
pub fn read<'s, 'd>(
    input: impl Into<SourceInput<'s>>,
    window: ReadWindow,
    destination: Destination<'d>,
) -> Result<ReadOutput<Pcm<'d>>> {
    Mp3Decoder::new().read(input, window, destination)
}
