// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

use std::fmt;

/// Status codes returned by every fallible bridge call.
///
/// Zero is success; the set is closed, anything the bridge cannot classify
/// comes back as [`ErrorCode::Internal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ErrorCode {
    Ok = 0,
    InvalidHandle = -1,
    InvalidMode = -2,
    InvalidParam = -3,
    NullPointer = -4,
    BufferTooSmall = -5,
    DecodeFailed = -10,
    EncodeFailed = -11,
    OutOfMemory = -12,
    ThreadError = -13,
    NotInitialized = -20,
    AlreadyInitialized = -21,
    Internal = -99,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 13] = [
        ErrorCode::Ok,
        ErrorCode::InvalidHandle,
        ErrorCode::InvalidMode,
        ErrorCode::InvalidParam,
        ErrorCode::NullPointer,
        ErrorCode::BufferTooSmall,
        ErrorCode::DecodeFailed,
        ErrorCode::EncodeFailed,
        ErrorCode::OutOfMemory,
        ErrorCode::ThreadError,
        ErrorCode::NotInitialized,
        ErrorCode::AlreadyInitialized,
        ErrorCode::Internal,
    ];

    pub fn from_raw(raw: i32) -> Option<ErrorCode> {
        Self::ALL.iter().copied().find(|c| *c as i32 == raw)
    }

    pub fn is_ok(self) -> bool {
        self == ErrorCode::Ok
    }

    /// Human-readable description, same strings the bridge's
    /// `wsjtx_error_string` returns.
    pub fn description(self) -> &'static str {
        match self {
            ErrorCode::Ok => "Success",
            ErrorCode::InvalidHandle => "Invalid handle",
            ErrorCode::InvalidMode => "Invalid mode",
            ErrorCode::InvalidParam => "Invalid parameter",
            ErrorCode::NullPointer => "Null pointer",
            ErrorCode::BufferTooSmall => "Buffer too small",
            ErrorCode::DecodeFailed => "Decode failed",
            ErrorCode::EncodeFailed => "Encode failed",
            ErrorCode::OutOfMemory => "Out of memory",
            ErrorCode::ThreadError => "Thread error",
            ErrorCode::NotInitialized => "Not initialized",
            ErrorCode::AlreadyInitialized => "Already initialized",
            ErrorCode::Internal => "Internal error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description(), *self as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_round_trip() {
        for code in ErrorCode::ALL {
            assert_eq!(ErrorCode::from_raw(code as i32), Some(code));
        }
    }

    #[test]
    fn unknown_raw_is_rejected() {
        assert_eq!(ErrorCode::from_raw(1), None);
        assert_eq!(ErrorCode::from_raw(-6), None);
        assert_eq!(ErrorCode::from_raw(-100), None);
    }

    #[test]
    fn zero_is_success() {
        assert!(ErrorCode::Ok.is_ok());
        assert!(!ErrorCode::Internal.is_ok());
        assert_eq!(ErrorCode::Ok as i32, 0);
    }

    #[test]
    fn display_carries_code() {
        assert_eq!(
            ErrorCode::BufferTooSmall.to_string(),
            "Buffer too small (-5)"
        );
    }
}
