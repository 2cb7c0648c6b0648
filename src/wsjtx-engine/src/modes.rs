// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Static per-mode capability table.
//!
//! Authoritative for the host-facing queries, independent of whatever the
//! bridge's own `get_sample_rate` reports.

use wsjtx_abi::Mode;

/// Sample rate reported for mode values outside the closed set.
pub const FALLBACK_SAMPLE_RATE: u32 = 12_000;
/// Transmission duration reported for mode values outside the closed set.
pub const FALLBACK_DURATION_S: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeInfo {
    pub sample_rate: u32,
    pub duration_s: f64,
    pub encoding: bool,
    pub decoding: bool,
}

pub fn mode_info(mode: Mode) -> ModeInfo {
    let (sample_rate, duration_s, encoding, decoding) = match mode {
        Mode::Ft8 => (48_000, 12.64, true, true),
        Mode::Ft4 => (48_000, 6.0, true, true),
        Mode::Jt4 => (11_025, 47.1, false, true),
        Mode::Jt65 => (11_025, 46.8, false, true),
        Mode::Jt9 => (12_000, 49.0, false, true),
        Mode::Fst4 => (12_000, 60.0, false, true),
        Mode::Q65 => (12_000, 60.0, false, true),
        Mode::Fst4w => (12_000, 120.0, false, true),
        Mode::Wspr => (12_000, 110.6, false, true),
    };
    ModeInfo {
        sample_rate,
        duration_s,
        encoding,
        decoding,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_ftx_modes_encode() {
        for mode in Mode::ALL {
            let info = mode_info(mode);
            assert_eq!(info.encoding, matches!(mode, Mode::Ft8 | Mode::Ft4));
            assert!(info.decoding);
        }
    }

    #[test]
    fn declared_constants() {
        assert_eq!(mode_info(Mode::Ft8).sample_rate, 48_000);
        assert_eq!(mode_info(Mode::Ft8).duration_s, 12.64);
        assert_eq!(mode_info(Mode::Wspr).duration_s, 110.6);
        assert_eq!(mode_info(Mode::Jt65).sample_rate, 11_025);
    }
}
