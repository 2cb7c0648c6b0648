// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

use thiserror::Error;
use wsjtx_loader::BoundaryError;

/// Argument errors, raised synchronously before any work is scheduled.
/// The boundary is never reached for a rejected request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid mode value: {0}")]
    InvalidMode(i32),

    #[error("Invalid frequency value: {0}")]
    InvalidFrequency(i32),

    #[error("Thread count must be between 1 and 16, got {0}")]
    InvalidThreads(i32),

    #[error("Message must be 1-22 characters long")]
    InvalidMessage,

    #[error("Audio data must be a non-empty sample buffer")]
    InvalidAudioData,

    #[error("Encoding not supported for mode {0}")]
    UnsupportedMode(&'static str),
}

impl ValidationError {
    /// Stable machine-readable name for the host side.
    pub fn name(&self) -> &'static str {
        match self {
            ValidationError::InvalidMode(_) => "INVALID_MODE",
            ValidationError::InvalidFrequency(_) => "INVALID_FREQUENCY",
            ValidationError::InvalidThreads(_) => "INVALID_THREADS",
            ValidationError::InvalidMessage => "INVALID_MESSAGE",
            ValidationError::InvalidAudioData => "INVALID_AUDIO_DATA",
            ValidationError::UnsupportedMode(_) => "UNSUPPORTED_MODE",
        }
    }
}

/// Failure of a scheduled background task, delivered through the same
/// channel as its success value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    /// Non-zero status from a boundary call, carrying the named code.
    #[error(transparent)]
    Boundary(#[from] BoundaryError),

    /// The task itself fell over (panic, runtime shutdown); mapped
    /// generically so the host process never crashes.
    #[error("Background task failed: {0}")]
    Runtime(String),
}
