//! # Sample Format Converter
//!
//! Converts decoded audio buffers into interleaved f32.

use symphonia::core::audio::{AudioBuffer, AudioBufferRef, Signal};
use symphonia::core::conv::IntoSample;
use symphonia::core::sample::Sample;

/// Normalizes Symphonia output to interleaved f32 in the range [-1.0, 1.0].
///
/// The MP3 codec produces planar f32, but every buffer variant is handled so
/// the engine does not depend on that.
pub(crate) struct SampleConverter;

impl SampleConverter {
    /// Append `buffer` to `out` as interleaved f32 (LRLR... for stereo).
    pub(crate) fn interleave_into(buffer: &AudioBufferRef<'_>, out: &mut Vec<f32>) {
        match buffer {
            AudioBufferRef::F32(buf) => Self::interleave_f32_planes(&**buf, out),
            AudioBufferRef::F64(buf) => {
                Self::convert_and_interleave(&**buf, |sample: f64| sample.into_sample(), out)
            }
            AudioBufferRef::S32(buf) => {
                Self::convert_and_interleave(&**buf, |sample: i32| sample.into_sample(), out)
            }
            AudioBufferRef::S16(buf) => {
                Self::convert_and_interleave(&**buf, |sample: i16| sample.into_sample(), out)
            }
            AudioBufferRef::S24(buf) => {
                Self::convert_and_interleave(&**buf, |sample| IntoSample::into_sample(sample), out)
            }
            AudioBufferRef::S8(buf) => {
                Self::convert_and_interleave(&**buf, |sample: i8| sample.into_sample(), out)
            }
            AudioBufferRef::U32(buf) => {
                Self::convert_and_interleave(&**buf, |sample: u32| sample.into_sample(), out)
            }
            AudioBufferRef::U16(buf) => {
                Self::convert_and_interleave(&**buf, |sample: u16| sample.into_sample(), out)
            }
            AudioBufferRef::U24(buf) => {
                Self::convert_and_interleave(&**buf, |sample| IntoSample::into_sample(sample), out)
            }
            AudioBufferRef::U8(buf) => {
                Self::convert_and_interleave(&**buf, |sample: u8| sample.into_sample(), out)
            }
        }
    }

    fn interleave_f32_planes(buf: &AudioBuffer<f32>, out: &mut Vec<f32>) {
        let num_channels = buf.spec().channels.count();
        let num_frames = buf.frames();
        out.reserve(num_frames * num_channels);

        for frame_idx in 0..num_frames {
            for chan_idx in 0..num_channels {
                out.push(buf.chan(chan_idx)[frame_idx]);
            }
        }
    }

    fn convert_and_interleave<T>(buf: &AudioBuffer<T>, convert: fn(T) -> f32, out: &mut Vec<f32>)
    where
        T: Sample + Copy,
    {
        let num_channels = buf.spec().channels.count();
        let num_frames = buf.frames();
        out.reserve(num_frames * num_channels);

        for frame_idx in 0..num_frames {
            for chan_idx in 0..num_channels {
                out.push(convert(buf.chan(chan_idx)[frame_idx]));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use symphonia::core::audio::{Channels, SignalSpec};

    #[test]
    fn test_interleaves_planar_stereo() {
        let spec = SignalSpec::new(44100, Channels::FRONT_LEFT | Channels::FRONT_RIGHT);
        let mut buf = AudioBuffer::<f32>::new(4, spec);
        buf.render_reserved(Some(3));
        {
            let (left, right) = buf.chan_pair_mut(0, 1);
            left.copy_from_slice(&[0.1, 0.2, 0.3]);
            right.copy_from_slice(&[-0.1, -0.2, -0.3]);
        }

        let mut out = vec![9.0];
        SampleConverter::interleave_into(&AudioBufferRef::F32(std::borrow::Cow::Borrowed(&buf)), &mut out);

        assert_eq!(out, vec![9.0, 0.1, -0.1, 0.2, -0.2, 0.3, -0.3]);
    }

    #[test]
    fn test_converts_integer_samples() {
        let spec = SignalSpec::new(8000, Channels::FRONT_LEFT);
        let mut buf = AudioBuffer::<i16>::new(2, spec);
        buf.render_reserved(Some(2));
        buf.chan_mut(0).copy_from_slice(&[0, i16::MIN]);

        let mut out = Vec::new();
        SampleConverter::interleave_into(&AudioBufferRef::S16(std::borrow::Cow::Borrowed(&buf)), &mut out);

        assert_eq!(out.len(), 2);
        assert_eq!(out[0], 0.0);
        assert_eq!(out[1], -1.0);
    }
}
