// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Reference MFSK modem backing the bridge.
//!
//! Deterministic single-signal modulator/demodulator at 12 kHz: a 4-symbol
//! sync preamble, one length symbol, the payload characters and a mod-42
//! checksum, each symbol one tone out of a 50 Hz grid. Goertzel detection
//! with a coarse time-offset search. This stands in for the wsjtx DSP and
//! exercises the full boundary contract; it is not an FT8 implementation.

use std::f32::consts::TAU;

pub const SAMPLE_RATE: u32 = 12_000;
/// 40 ms symbols: 25 Hz Goertzel bins, tones land exactly on every other bin.
pub const SYMBOL_LEN: usize = 480;

const BASE_FREQ_HZ: f32 = 500.0;
const TONE_SPACING_HZ: f32 = 50.0;
const AMPLITUDE: f32 = 0.5;

/// FTx message alphabet; a symbol index is a position in this table.
const CHARSET: &[u8] = b" 0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ+-./?";
const NUM_DATA_TONES: usize = 42;
const SYNC_TONE: usize = NUM_DATA_TONES;
const SYNC_SYMBOLS: usize = 4;

/// Minimum decodable transmission: sync + length + one char + checksum.
const MIN_SYMBOLS: usize = SYNC_SYMBOLS + 3;
/// Offset search granularity, 1/8 symbol.
const SCAN_STEP: usize = SYMBOL_LEN / 8;
/// Sync power must beat the mean data-tone power by this factor.
const SYNC_THRESHOLD: f32 = 4.0;

#[derive(Debug, Clone)]
pub struct DecodedFrame {
    pub text: String,
    pub snr_db: i32,
    pub sync: f32,
    pub dt_s: f32,
    pub freq_hz: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModemError {
    /// Message contains a character outside the alphabet, or is empty.
    InvalidText,
}

fn tone_freq(index: usize) -> f32 {
    BASE_FREQ_HZ + index as f32 * TONE_SPACING_HZ
}

fn char_index(c: u8) -> Option<usize> {
    CHARSET.iter().position(|&x| x == c)
}

fn symbol_sequence(text: &str) -> Result<Vec<usize>, ModemError> {
    let bytes = text.as_bytes();
    if bytes.is_empty() || bytes.len() >= NUM_DATA_TONES {
        return Err(ModemError::InvalidText);
    }
    let mut symbols = Vec::with_capacity(SYNC_SYMBOLS + bytes.len() + 2);
    symbols.extend(std::iter::repeat(SYNC_TONE).take(SYNC_SYMBOLS));
    symbols.push(bytes.len());
    let mut checksum = bytes.len();
    for &b in bytes {
        let idx = char_index(b).ok_or(ModemError::InvalidText)?;
        checksum += idx;
        symbols.push(idx);
    }
    symbols.push(checksum % NUM_DATA_TONES);
    Ok(symbols)
}

/// Modulate `text` into a phase-continuous tone sequence.
pub fn encode(text: &str) -> Result<Vec<f32>, ModemError> {
    let symbols = symbol_sequence(text)?;
    let mut samples = Vec::with_capacity(symbols.len() * SYMBOL_LEN);
    let mut phase = 0.0f32;
    for &sym in &symbols {
        let step = TAU * tone_freq(sym) / SAMPLE_RATE as f32;
        for _ in 0..SYMBOL_LEN {
            samples.push(AMPLITUDE * phase.sin());
            phase += step;
            if phase > TAU {
                phase -= TAU;
            }
        }
    }
    Ok(samples)
}

/// Goertzel power of one tone over a block.
fn goertzel(block: &[f32], freq_hz: f32) -> f32 {
    let w = TAU * freq_hz / SAMPLE_RATE as f32;
    let coeff = 2.0 * w.cos();
    let mut s_prev = 0.0f32;
    let mut s_prev2 = 0.0f32;
    for &x in block {
        let s = x + coeff * s_prev - s_prev2;
        s_prev2 = s_prev;
        s_prev = s;
    }
    s_prev * s_prev + s_prev2 * s_prev2 - coeff * s_prev * s_prev2
}

fn data_tone_powers(block: &[f32]) -> Vec<f32> {
    (0..NUM_DATA_TONES)
        .map(|k| goertzel(block, tone_freq(k)))
        .collect()
}

fn strongest_data_tone(block: &[f32]) -> (usize, f32, f32) {
    let powers = data_tone_powers(block);
    let mut best = 0;
    for (k, &p) in powers.iter().enumerate() {
        if p > powers[best] {
            best = k;
        }
    }
    let rest: f32 = powers
        .iter()
        .enumerate()
        .filter(|(k, _)| *k != best)
        .map(|(_, &p)| p)
        .sum();
    let noise = rest / (NUM_DATA_TONES - 1) as f32;
    (best, powers[best], noise)
}

fn sync_score(samples: &[f32], offset: usize) -> f32 {
    let mut score = 0.0;
    for i in 0..SYNC_SYMBOLS {
        let start = offset + i * SYMBOL_LEN;
        score += goertzel(&samples[start..start + SYMBOL_LEN], tone_freq(SYNC_TONE));
    }
    score
}

/// Demodulate the strongest transmission in `samples`, if any.
///
/// Noise or a failed checksum yields `None`; only malformed input is an
/// error at the boundary, not an undecodable signal.
pub fn decode(samples: &[f32]) -> Option<DecodedFrame> {
    if samples.len() < MIN_SYMBOLS * SYMBOL_LEN {
        return None;
    }

    let scan_end = samples.len() - MIN_SYMBOLS * SYMBOL_LEN;
    let mut best_offset = 0;
    let mut best_score = f32::MIN;
    let mut offset = 0;
    while offset <= scan_end {
        let score = sync_score(samples, offset);
        if score > best_score {
            best_score = score;
            best_offset = offset;
        }
        offset += SCAN_STEP;
    }

    // Reject noise: the sync tone must dominate the data grid.
    let first_sync = &samples[best_offset..best_offset + SYMBOL_LEN];
    let sync_power = goertzel(first_sync, tone_freq(SYNC_TONE));
    let mean_data = data_tone_powers(first_sync).iter().sum::<f32>() / NUM_DATA_TONES as f32;
    if sync_power <= SYNC_THRESHOLD * mean_data.max(f32::EPSILON) {
        return None;
    }

    let symbol_at = |index: usize| -> Option<&[f32]> {
        let start = best_offset + (SYNC_SYMBOLS + index) * SYMBOL_LEN;
        samples.get(start..start + SYMBOL_LEN)
    };

    let (len, len_power, len_noise) = strongest_data_tone(symbol_at(0)?);
    if len == 0 || len >= NUM_DATA_TONES - 1 {
        return None;
    }

    let mut text = String::with_capacity(len);
    let mut checksum = len;
    for i in 0..len {
        let (idx, _, _) = strongest_data_tone(symbol_at(1 + i)?);
        checksum += idx;
        text.push(CHARSET[idx] as char);
    }
    let (check_sym, _, _) = strongest_data_tone(symbol_at(1 + len)?);
    if check_sym != checksum % NUM_DATA_TONES {
        return None;
    }

    let snr_db = (10.0 * (len_power / len_noise.max(f32::EPSILON)).log10())
        .round()
        .clamp(-30.0, 40.0) as i32;
    let sync = (sync_power / (sync_power + mean_data * NUM_DATA_TONES as f32)).clamp(0.0, 1.0);

    Some(DecodedFrame {
        text,
        snr_db,
        sync,
        dt_s: best_offset as f32 / SAMPLE_RATE as f32,
        freq_hz: BASE_FREQ_HZ as i32,
    })
}
