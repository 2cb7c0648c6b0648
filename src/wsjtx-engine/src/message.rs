// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

use serde::{Deserialize, Serialize};
use wsjtx_abi::RawMessage;

/// One decoded message as handed to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedMessage {
    pub text: String,
    /// Signal-to-noise ratio in dB.
    pub snr: i32,
    /// Sync quality metric as reported by the decoder.
    pub sync: f32,
    /// Time offset of the signal within the decoded slot, seconds.
    pub delta_time: f32,
    /// Audio frequency offset, Hz.
    pub delta_frequency: i32,
    /// UTC seconds since midnight of the decode.
    pub timestamp: u32,
}

impl From<RawMessage> for DecodedMessage {
    fn from(raw: RawMessage) -> Self {
        DecodedMessage {
            text: raw.text(),
            snr: raw.snr,
            sync: raw.sync,
            delta_time: raw.dt,
            delta_frequency: raw.freq,
            timestamp: (raw.hh * 3_600 + raw.min * 60 + raw.sec).max(0) as u32,
        }
    }
}

/// Result of a completed encode task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodeOutput {
    pub audio_data: Vec<f32>,
    /// The message actually transmitted; echoes the input verbatim, the
    /// boundary performs no normalization.
    pub message_sent: String,
    /// Host-facing sample rate of the mode, from the capability table.
    pub sample_rate: u32,
}
