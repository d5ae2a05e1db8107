//! # Output Binder
//!
//! Destination storage for decoded PCM and the cropping applied once a read
//! finishes.
//!
//! PCM is always 32-bit float, interleaved by channel. A destination is either
//! allocated by the decoder or supplied by the caller in one of several
//! representations; all of them expose the same writable region through
//! [`OutputRegion`], and the value returned from a read has the same
//! representation as the destination that was passed in.

use crate::error::{Mp3Error, Result};

/// Size of one PCM value in bytes.
pub const SAMPLE_BYTES: usize = std::mem::size_of::<f32>();

/// Writable storage for interleaved f32 PCM.
pub trait OutputRegion {
    /// Size of one storage element in bytes.
    fn element_stride(&self) -> usize;

    /// Writable length in bytes.
    fn byte_len(&self) -> usize;

    /// Copy interleaved `values` into the region starting at value index
    /// `value_offset`. The caller keeps writes within [`capacity_values`].
    ///
    /// [`capacity_values`]: OutputRegion::capacity_values
    fn write_values(&mut self, value_offset: usize, values: &[f32]);

    /// Restrict the region to its first `elements` storage elements.
    fn crop_elements(self, elements: usize) -> Self
    where
        Self: Sized;

    /// Channel count the storage is shaped for, if it carries one.
    fn shape_channels(&self) -> Option<u16> {
        None
    }

    /// Number of whole f32 values the region can hold.
    fn capacity_values(&self) -> usize {
        self.byte_len() / SAMPLE_BYTES
    }

    /// Check the region's shape on its own, before any decoding.
    fn validate_shape(&self) -> Result<()> {
        Ok(())
    }

    /// Check the region against the stream's channel count.
    fn check_channels(&self, channels: u16) -> Result<()> {
        match self.shape_channels() {
            Some(shape) if shape != channels => Err(Mp3Error::InvalidArgument(format!(
                "destination is shaped for {} channels but the stream has {}",
                shape, channels
            ))),
            _ => Ok(()),
        }
    }
}

/// Crop `region` to exactly `samples` samples of `channels` channels.
///
/// The element count is the byte length of the written PCM divided by the
/// region's element stride. When the region is already that size it is
/// returned as is.
pub fn crop_to_samples<R: OutputRegion>(region: R, samples: u64, channels: u16) -> R {
    let bytes = (samples as usize)
        .saturating_mul(channels as usize)
        .saturating_mul(SAMPLE_BYTES);
    if bytes >= region.byte_len() {
        return region;
    }
    let elements = bytes / region.element_stride();
    region.crop_elements(elements)
}

impl OutputRegion for &mut [f32] {
    fn element_stride(&self) -> usize {
        SAMPLE_BYTES
    }

    fn byte_len(&self) -> usize {
        self.len() * SAMPLE_BYTES
    }

    fn write_values(&mut self, value_offset: usize, values: &[f32]) {
        self[value_offset..value_offset + values.len()].copy_from_slice(values);
    }

    fn crop_elements(self, elements: usize) -> Self {
        &mut self[..elements]
    }
}

/// Raw byte storage receives native-endian f32 values.
impl OutputRegion for &mut [u8] {
    fn element_stride(&self) -> usize {
        1
    }

    fn byte_len(&self) -> usize {
        self.len()
    }

    fn write_values(&mut self, value_offset: usize, values: &[f32]) {
        let start = value_offset * SAMPLE_BYTES;
        let target = &mut self[start..start + values.len() * SAMPLE_BYTES];
        for (chunk, value) in target.chunks_exact_mut(SAMPLE_BYTES).zip(values) {
            chunk.copy_from_slice(&value.to_ne_bytes());
        }
    }

    fn crop_elements(self, elements: usize) -> Self {
        &mut self[..elements]
    }
}

/// Caller storage shaped as frames of `channels` interleaved values.
#[derive(Debug)]
pub struct InterleavedMut<'a> {
    data: &'a mut [f32],
    channels: u16,
}

impl<'a> InterleavedMut<'a> {
    pub fn new(data: &'a mut [f32], channels: u16) -> Self {
        Self { data, channels }
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Number of whole sample frames.
    pub fn frames(&self) -> usize {
        match self.channels {
            0 => 0,
            channels => self.data.len() / channels as usize,
        }
    }

    pub fn as_slice(&self) -> &[f32] {
        &*self.data
    }

    pub fn into_inner(self) -> &'a mut [f32] {
        self.data
    }
}

impl OutputRegion for InterleavedMut<'_> {
    fn element_stride(&self) -> usize {
        SAMPLE_BYTES
    }

    fn byte_len(&self) -> usize {
        self.data.len() * SAMPLE_BYTES
    }

    fn write_values(&mut self, value_offset: usize, values: &[f32]) {
        self.data[value_offset..value_offset + values.len()].copy_from_slice(values);
    }

    fn crop_elements(self, elements: usize) -> Self {
        Self {
            data: &mut self.data[..elements],
            channels: self.channels,
        }
    }

    fn shape_channels(&self) -> Option<u16> {
        Some(self.channels)
    }

    fn validate_shape(&self) -> Result<()> {
        if self.channels == 0 {
            return Err(Mp3Error::InvalidArgument(
                "interleaved destination must have at least one channel".to_string(),
            ));
        }
        if self.data.len() % self.channels as usize != 0 {
            return Err(Mp3Error::InvalidArgument(format!(
                "interleaved destination of {} values is not a whole number of {}-channel frames",
                self.data.len(),
                self.channels
            )));
        }
        Ok(())
    }
}

/// Decoder-allocated PCM.
#[derive(Debug, Clone, PartialEq)]
pub struct PcmBuffer {
    samples: Vec<f32>,
    channels: u16,
}

impl PcmBuffer {
    pub fn new(samples: Vec<f32>, channels: u16) -> Self {
        Self { samples, channels }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Number of whole sample frames.
    pub fn frames(&self) -> usize {
        match self.channels {
            0 => 0,
            channels => self.samples.len() / channels as usize,
        }
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.samples
    }
}

impl OutputRegion for PcmBuffer {
    fn element_stride(&self) -> usize {
        SAMPLE_BYTES
    }

    fn byte_len(&self) -> usize {
        self.samples.len() * SAMPLE_BYTES
    }

    fn write_values(&mut self, value_offset: usize, values: &[f32]) {
        self.samples[value_offset..value_offset + values.len()].copy_from_slice(values);
    }

    fn crop_elements(mut self, elements: usize) -> Self {
        self.samples.truncate(elements);
        self
    }

    fn shape_channels(&self) -> Option<u16> {
        Some(self.channels)
    }
}

/// Where a read writes its PCM.
#[derive(Debug)]
pub enum Destination<'a> {
    /// Let the decoder allocate storage sized from the request or a probe.
    Allocate,
    /// Caller storage shaped as frames of a fixed channel count.
    Interleaved(InterleavedMut<'a>),
    /// Flat caller storage of f32 values.
    Samples(&'a mut [f32]),
    /// Raw caller memory; values are stored as native-endian f32.
    Raw(&'a mut [u8]),
}

impl<'a> Destination<'a> {
    pub fn interleaved(data: &'a mut [f32], channels: u16) -> Self {
        Destination::Interleaved(InterleavedMut::new(data, channels))
    }
}

impl<'a> From<&'a mut [f32]> for Destination<'a> {
    fn from(data: &'a mut [f32]) -> Self {
        Destination::Samples(data)
    }
}

impl<'a> From<&'a mut [u8]> for Destination<'a> {
    fn from(data: &'a mut [u8]) -> Self {
        Destination::Raw(data)
    }
}

impl<'a> From<InterleavedMut<'a>> for Destination<'a> {
    fn from(region: InterleavedMut<'a>) -> Self {
        Destination::Interleaved(region)
    }
}

/// PCM returned from a read, in the representation of its [`Destination`].
#[derive(Debug)]
pub enum Pcm<'a> {
    Owned(PcmBuffer),
    Interleaved(InterleavedMut<'a>),
    Samples(&'a mut [f32]),
    Raw(&'a mut [u8]),
}

impl Pcm<'_> {
    /// Length of the returned region in bytes.
    pub fn byte_len(&self) -> usize {
        match self {
            Pcm::Owned(buffer) => buffer.byte_len(),
            Pcm::Interleaved(region) => region.byte_len(),
            Pcm::Samples(data) => data.len() * SAMPLE_BYTES,
            Pcm::Raw(data) => data.len(),
        }
    }

    /// Borrow the values when the representation holds f32 directly.
    pub fn as_f32(&self) -> Option<&[f32]> {
        match self {
            Pcm::Owned(buffer) => Some(buffer.samples()),
            Pcm::Interleaved(region) => Some(region.as_slice()),
            Pcm::Samples(data) => Some(&data[..]),
            Pcm::Raw(_) => None,
        }
    }

    /// Copy the values out, decoding raw bytes as native-endian f32.
    pub fn to_vec(&self) -> Vec<f32> {
        match self {
            Pcm::Raw(data) => data
                .chunks_exact(SAMPLE_BYTES)
                .map(|chunk| f32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
                .collect(),
            other => other.as_f32().map(<[f32]>::to_vec).unwrap_or_default(),
        }
    }
}

/// Allocates PCM storage for reads that do not supply a destination.
#[cfg_attr(test, mockall::automock)]
pub trait PcmAllocator: Send + Sync {
    /// Storage for `frames` sample frames of `channels` interleaved values.
    fn allocate(&self, frames: usize, channels: u16) -> PcmBuffer;
}

/// Allocates zero-filled vectors.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroedAllocator;

impl PcmAllocator for ZeroedAllocator {
    fn allocate(&self, frames: usize, channels: u16) -> PcmBuffer {
        PcmBuffer::new(vec![0.0; frames * channels as usize], channels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crop_is_identity_when_full() {
        let mut storage = vec![0.5f32; 8];
        let ptr = storage.as_ptr();
        let region: &mut [f32] = &mut storage;

        let cropped = crop_to_samples(region, 4, 2);
        assert_eq!(cropped.len(), 8);
        assert_eq!(cropped.as_ptr(), ptr);
    }

    #[test]
    fn test_crop_shrinks_each_representation() {
        let mut floats = vec![0.0f32; 10];
        let cropped = crop_to_samples(&mut floats[..], 3, 2);
        assert_eq!(cropped.len(), 6);

        let mut bytes = vec![0u8; 40];
        let cropped = crop_to_samples(&mut bytes[..], 3, 2);
        assert_eq!(cropped.len(), 24);

        let mut shaped = vec![0.0f32; 10];
        let cropped = crop_to_samples(InterleavedMut::new(&mut shaped, 2), 3, 2);
        assert_eq!(cropped.frames(), 3);
        assert_eq!(cropped.channels(), 2);

        let buffer = PcmBuffer::new(vec![0.0; 10], 1);
        assert_eq!(crop_to_samples(buffer, 4, 1).samples().len(), 4);
    }

    #[test]
    fn test_raw_bytes_hold_native_endian_floats() {
        let mut bytes = vec![0u8; 12];
        {
            let mut region: &mut [u8] = &mut bytes;
            region.write_values(1, &[1.5, -2.0]);
            assert_eq!(region.capacity_values(), 3);
        }
        assert_eq!(&bytes[..4], &[0, 0, 0, 0]);
        assert_eq!(&bytes[4..8], &1.5f32.to_ne_bytes());
        assert_eq!(&bytes[8..12], &(-2.0f32).to_ne_bytes());

        let pcm = Pcm::Raw(&mut bytes);
        assert_eq!(pcm.to_vec(), vec![0.0, 1.5, -2.0]);
        assert!(pcm.as_f32().is_none());
    }

    #[test]
    fn test_raw_capacity_ignores_partial_values() {
        let mut bytes = vec![0u8; 11];
        let region: &mut [u8] = &mut bytes;
        assert_eq!(region.capacity_values(), 2);
    }

    #[test]
    fn test_interleaved_shape_validation() {
        let mut data = vec![0.0f32; 6];
        assert!(InterleavedMut::new(&mut data, 2).validate_shape().is_ok());
        assert!(InterleavedMut::new(&mut data, 0).validate_shape().is_err());
        assert!(InterleavedMut::new(&mut data, 4).validate_shape().is_err());

        let region = InterleavedMut::new(&mut data, 2);
        assert!(region.check_channels(2).is_ok());
        let err = region.check_channels(1).unwrap_err();
        assert!(err.is_argument_error());
    }

    #[test]
    fn test_flat_regions_accept_any_channel_count() {
        let mut data = vec![0.0f32; 5];
        let region: &mut [f32] = &mut data;
        assert!(region.validate_shape().is_ok());
        assert!(region.check_channels(2).is_ok());
    }

    #[test]
    fn test_zeroed_allocator() {
        let buffer = ZeroedAllocator.allocate(3, 2);
        assert_eq!(buffer.samples(), &[0.0; 6]);
        assert_eq!(buffer.frames(), 3);
    }

    #[test]
    fn test_mock_allocator_is_called_with_frames() {
        let mut allocator = MockPcmAllocator::new();
        allocator
            .expect_allocate()
            .withf(|frames, channels| *frames == 10 && *channels == 2)
            .times(1)
            .returning(|frames, channels| PcmBuffer::new(vec![1.0; frames * channels as usize], channels));

        let buffer = allocator.allocate(10, 2);
        assert_eq!(buffer.samples().len(), 20);
    }
}
