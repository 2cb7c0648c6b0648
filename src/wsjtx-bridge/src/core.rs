// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Per-instance compute state behind the opaque handle: the reference modem
//! plus the FIFO queue of decoded messages.

use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};

use wsjtx_abi::{Mode, RawMessage};

use crate::modem::{self, ModemError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreError {
    EncodeFailed,
}

/// One compute-library instance. Owned exclusively by its creator and only
/// ever touched by one boundary call at a time; the queue grows without
/// bound until drained.
pub struct WsjtxCore {
    queue: VecDeque<RawMessage>,
}

impl WsjtxCore {
    pub fn new() -> Self {
        WsjtxCore {
            queue: VecDeque::new(),
        }
    }

    /// Every mode runs the reference modem at 12 kHz.
    pub fn sample_rate(_mode: Mode) -> i32 {
        modem::SAMPLE_RATE as i32
    }

    /// Output ceiling for encode, one receive slot of audio per mode.
    pub fn max_samples(mode: Mode) -> i32 {
        let slot_seconds = match mode {
            Mode::Ft8 => 15,
            Mode::Ft4 => 7,
            Mode::Jt4 => 60,
            Mode::Jt65 => 60,
            Mode::Jt9 => 60,
            Mode::Fst4 => 60,
            Mode::Q65 => 60,
            Mode::Fst4w => 120,
            Mode::Wspr => 120,
        };
        slot_seconds * modem::SAMPLE_RATE as i32
    }

    /// Demodulate `samples`; decoded messages go to the queue, not to the
    /// caller. An undecodable buffer is success with nothing queued.
    ///
    /// The thread hint is accepted for the boundary contract; the reference
    /// modem is single-signal and has no internal parallelism to fan out.
    pub fn decode(&mut self, _mode: Mode, samples: &[f32], _frequency: i32, _threads: i32) {
        if let Some(frame) = modem::decode(samples) {
            let (hh, min, sec) = utc_time_of_day();
            let mut msg = RawMessage::zeroed();
            msg.hh = hh;
            msg.min = min;
            msg.sec = sec;
            msg.snr = frame.snr_db;
            msg.sync = frame.sync;
            msg.dt = frame.dt_s;
            msg.freq = frame.freq_hz;
            msg.set_text(&frame.text);
            self.queue.push_back(msg);
        }
    }

    /// Modulate `text`. Text the modem cannot represent is an encode
    /// failure, not a parameter error; parameter checks belong to the
    /// boundary layer.
    pub fn encode(&mut self, _mode: Mode, _frequency: i32, text: &str) -> Result<Vec<f32>, CoreError> {
        modem::encode(text).map_err(|e| match e {
            ModemError::InvalidText => CoreError::EncodeFailed,
        })
    }

    pub fn pull(&mut self) -> Option<RawMessage> {
        self.queue.pop_front()
    }
}

fn utc_time_of_day() -> (i32, i32, i32) {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let day = (secs % 86_400) as i32;
    (day / 3_600, (day % 3_600) / 60, day % 60)
}
