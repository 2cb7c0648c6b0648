// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

use libc::{c_char, c_float, c_int};
use std::ffi::CStr;

/// Capacity of the embedded message text buffer, terminating NUL included.
pub const MESSAGE_TEXT_CAP: usize = 80;

/// One decoded message as it crosses the C boundary.
///
/// Fixed layout, no heap pointers: the text lives in an embedded buffer so
/// neither side ever frees memory the other allocated.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct RawMessage {
    pub hh: c_int,
    pub min: c_int,
    pub sec: c_int,
    pub snr: c_int,
    pub sync: c_float,
    pub dt: c_float,
    pub freq: c_int,
    pub text: [c_char; MESSAGE_TEXT_CAP],
}

impl RawMessage {
    pub fn zeroed() -> Self {
        RawMessage {
            hh: 0,
            min: 0,
            sec: 0,
            snr: 0,
            sync: 0.0,
            dt: 0.0,
            freq: 0,
            text: [0; MESSAGE_TEXT_CAP],
        }
    }

    /// Read the embedded text up to its NUL terminator.
    pub fn text(&self) -> String {
        // The writing side always terminates, but guard the read anyway.
        let bytes: &[u8] =
            unsafe { std::slice::from_raw_parts(self.text.as_ptr().cast(), MESSAGE_TEXT_CAP) };
        match bytes.iter().position(|&b| b == 0) {
            Some(_) => unsafe { CStr::from_ptr(self.text.as_ptr()) }
                .to_string_lossy()
                .into_owned(),
            None => String::from_utf8_lossy(bytes).into_owned(),
        }
    }

    /// Copy `text` into the embedded buffer, truncating to fit and always
    /// writing the terminating NUL.
    pub fn set_text(&mut self, text: &str) {
        let bytes = text.as_bytes();
        let n = bytes.len().min(MESSAGE_TEXT_CAP - 1);
        for (dst, src) in self.text.iter_mut().zip(bytes.iter().take(n)) {
            *dst = *src as c_char;
        }
        self.text[n] = 0;
    }
}

impl std::fmt::Debug for RawMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawMessage")
            .field("hh", &self.hh)
            .field("min", &self.min)
            .field("sec", &self.sec)
            .field("snr", &self.snr)
            .field("sync", &self.sync)
            .field("dt", &self.dt)
            .field("freq", &self.freq)
            .field("text", &self.text())
            .finish()
    }
}
