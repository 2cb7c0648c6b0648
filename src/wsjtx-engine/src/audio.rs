// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Host audio buffers in the two supported sample encodings.
//!
//! The boundary only speaks 32-bit float; a buffer is converted once, at
//! task execution, into that single representation.

const I16_SCALE: f32 = 32_768.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    Float32,
    Int16,
}

/// Tagged sample buffer as handed over by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioBuffer {
    Float32(Vec<f32>),
    Int16(Vec<i16>),
}

impl AudioBuffer {
    pub fn format(&self) -> SampleFormat {
        match self {
            AudioBuffer::Float32(_) => SampleFormat::Float32,
            AudioBuffer::Int16(_) => SampleFormat::Int16,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            AudioBuffer::Float32(v) => v.len(),
            AudioBuffer::Int16(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The representation the boundary expects.
    pub fn into_f32(self) -> Vec<f32> {
        match self {
            AudioBuffer::Float32(v) => v,
            AudioBuffer::Int16(v) => v.iter().map(|&s| s as f32 / I16_SCALE).collect(),
        }
    }

    /// Remap into `target`; converting to the current format is a no-op.
    pub fn convert(self, target: SampleFormat) -> AudioBuffer {
        match (self, target) {
            (buf @ AudioBuffer::Float32(_), SampleFormat::Float32) => buf,
            (buf @ AudioBuffer::Int16(_), SampleFormat::Int16) => buf,
            (AudioBuffer::Int16(v), SampleFormat::Float32) => {
                AudioBuffer::Float32(v.iter().map(|&s| s as f32 / I16_SCALE).collect())
            }
            (AudioBuffer::Float32(v), SampleFormat::Int16) => {
                AudioBuffer::Int16(v.iter().map(|&s| f32_to_i16(s)).collect())
            }
        }
    }
}

/// Clamp to [-1, 1] before scaling to the fixed-point target.
fn f32_to_i16(sample: f32) -> i16 {
    let scaled = (sample.clamp(-1.0, 1.0) * I16_SCALE).round();
    scaled.clamp(-I16_SCALE, I16_SCALE - 1.0) as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_format_conversion_is_identity() {
        let float = AudioBuffer::Float32(vec![0.25, -0.5, 0.75]);
        assert_eq!(float.clone().convert(SampleFormat::Float32), float);

        let int = AudioBuffer::Int16(vec![100, -200, 300]);
        assert_eq!(int.clone().convert(SampleFormat::Int16), int);
    }

    #[test]
    fn out_of_range_floats_are_clamped() {
        let buf = AudioBuffer::Float32(vec![2.0, -3.0, 1.0, -1.0]);
        assert_eq!(
            buf.convert(SampleFormat::Int16),
            AudioBuffer::Int16(vec![32_767, -32_768, 32_767, -32_768])
        );
    }

    #[test]
    fn round_trip_error_is_below_one_lsb() {
        let source: Vec<f32> = (0..1000).map(|i| (i as f32 / 500.0) - 1.0).collect();
        let round_tripped = AudioBuffer::Float32(source.clone())
            .convert(SampleFormat::Int16)
            .convert(SampleFormat::Float32);
        let AudioBuffer::Float32(result) = round_tripped else {
            panic!("expected float buffer");
        };
        for (a, b) in source.iter().zip(result.iter()) {
            assert!((a - b).abs() < 1.0 / I16_SCALE, "{a} vs {b}");
        }
    }

    #[test]
    fn int16_widening_matches_boundary_scaling() {
        let buf = AudioBuffer::Int16(vec![i16::MIN, 0, i16::MAX]);
        let AudioBuffer::Float32(v) = buf.convert(SampleFormat::Float32) else {
            panic!("expected float buffer");
        };
        assert_eq!(v[0], -1.0);
        assert_eq!(v[1], 0.0);
        // Positive full scale lands exactly one LSB shy of 1.0.
        assert_eq!(v[2], 32_767.0 / I16_SCALE);
    }

    #[test]
    fn into_f32_is_a_move_for_float_buffers() {
        let samples = vec![0.1f32, 0.2, 0.3];
        assert_eq!(AudioBuffer::Float32(samples.clone()).into_f32(), samples);
        assert_eq!(AudioBuffer::Int16(vec![0]).into_f32(), vec![0.0]);
    }
}
