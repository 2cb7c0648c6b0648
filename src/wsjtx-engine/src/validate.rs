// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Synchronous argument validation at the host edge.

use wsjtx_abi::Mode;

use crate::audio::AudioBuffer;
use crate::error::ValidationError;

pub const MAX_FREQUENCY_HZ: i32 = 30_000_000;
pub const MIN_THREADS: i32 = 1;
pub const MAX_THREADS: i32 = 16;
pub const MAX_MESSAGE_LEN: usize = 22;

pub fn mode(raw: i32) -> Result<Mode, ValidationError> {
    Mode::from_raw(raw).ok_or(ValidationError::InvalidMode(raw))
}

pub fn frequency(raw: i32) -> Result<i32, ValidationError> {
    if (0..=MAX_FREQUENCY_HZ).contains(&raw) {
        Ok(raw)
    } else {
        Err(ValidationError::InvalidFrequency(raw))
    }
}

pub fn threads(raw: i32) -> Result<i32, ValidationError> {
    if (MIN_THREADS..=MAX_THREADS).contains(&raw) {
        Ok(raw)
    } else {
        Err(ValidationError::InvalidThreads(raw))
    }
}

pub fn message(text: &str) -> Result<(), ValidationError> {
    if text.is_empty() || text.len() > MAX_MESSAGE_LEN || text.contains('\0') {
        Err(ValidationError::InvalidMessage)
    } else {
        Ok(())
    }
}

pub fn audio(buffer: &AudioBuffer) -> Result<(), ValidationError> {
    if buffer.is_empty() {
        Err(ValidationError::InvalidAudioData)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_bounds() {
        assert_eq!(mode(0), Ok(Mode::Ft8));
        assert_eq!(mode(8), Ok(Mode::Wspr));
        assert_eq!(mode(-1), Err(ValidationError::InvalidMode(-1)));
        assert_eq!(mode(9), Err(ValidationError::InvalidMode(9)));
    }

    #[test]
    fn frequency_bounds() {
        assert_eq!(frequency(0), Ok(0));
        assert_eq!(frequency(MAX_FREQUENCY_HZ), Ok(MAX_FREQUENCY_HZ));
        assert!(frequency(-1).is_err());
        assert!(frequency(MAX_FREQUENCY_HZ + 1).is_err());
    }

    #[test]
    fn thread_bounds() {
        assert_eq!(threads(1), Ok(1));
        assert_eq!(threads(16), Ok(16));
        assert!(threads(0).is_err());
        assert!(threads(17).is_err());
    }

    #[test]
    fn message_bounds() {
        assert!(message("CQ TEST K1ABC FN20").is_ok());
        assert!(message("A").is_ok());
        assert_eq!(message(""), Err(ValidationError::InvalidMessage));
        assert_eq!(
            message(&"X".repeat(MAX_MESSAGE_LEN + 1)),
            Err(ValidationError::InvalidMessage)
        );
        assert_eq!(message("CQ\0DX"), Err(ValidationError::InvalidMessage));
    }

    #[test]
    fn audio_must_be_non_empty() {
        assert!(audio(&AudioBuffer::Float32(vec![0.0])).is_ok());
        assert!(audio(&AudioBuffer::Int16(vec![1])).is_ok());
        assert_eq!(
            audio(&AudioBuffer::Float32(Vec::new())),
            Err(ValidationError::InvalidAudioData)
        );
        assert_eq!(
            audio(&AudioBuffer::Int16(Vec::new())),
            Err(ValidationError::InvalidAudioData)
        );
    }
}
