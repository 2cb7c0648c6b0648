// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Per-instance host façade over one bridge handle.

use std::ffi::CString;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::info;
use wsjtx_loader::{BoundaryError, BridgeInstance, BridgeModule, LoadError};

use crate::audio::{AudioBuffer, SampleFormat};
use crate::error::{TaskError, ValidationError};
use crate::message::{DecodedMessage, EncodeOutput};
use crate::modes::{mode_info, FALLBACK_DURATION_S, FALLBACK_SAMPLE_RATE};
use crate::task::{self, TaskHandle, TaskKind};
use crate::validate;

/// The one shared mutable resource per instance: the bridge handle behind
/// its serialization lock. Tasks hold an `Arc`, so destroy runs only after
/// the last in-flight task has finished with the handle.
struct Session {
    bridge: Mutex<BridgeInstance>,
}

impl Session {
    fn bridge(&self) -> MutexGuard<'_, BridgeInstance> {
        self.bridge.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Host-facing wsjtx instance.
///
/// Arguments are validated synchronously before any work is scheduled;
/// decode/encode/convert run on the blocking pool and resolve through their
/// task handles. Mode, frequency and thread arguments arrive as raw host
/// integers and are checked at this edge.
#[derive(Clone)]
pub struct Wsjtx {
    session: Arc<Session>,
}

impl Wsjtx {
    /// Load the bridge from the running module's directory and create the
    /// compute instance. Load and link failures are fatal and synchronous.
    pub fn new() -> Result<Self, LoadError> {
        Self::with_module(BridgeModule::load()?)
    }

    /// Build on an already-loaded (or statically linked) bridge module.
    pub fn with_module(module: BridgeModule) -> Result<Self, LoadError> {
        let bridge = module.create_instance()?;
        info!("wsjtx instance ready");
        Ok(Wsjtx {
            session: Arc::new(Session {
                bridge: Mutex::new(bridge),
            }),
        })
    }

    /// Schedule a decode of `audio`. Completion only signals that the
    /// samples were processed; decoded messages accumulate in the instance
    /// queue for [`Wsjtx::pull_messages`].
    pub fn decode(
        &self,
        mode: i32,
        audio: AudioBuffer,
        frequency: i32,
        threads: i32,
    ) -> Result<TaskHandle<()>, ValidationError> {
        let mode = validate::mode(mode)?;
        let frequency = validate::frequency(frequency)?;
        let threads = validate::threads(threads)?;
        validate::audio(&audio)?;

        let session = Arc::clone(&self.session);
        Ok(task::spawn(TaskKind::Decode, move || {
            // Branch once into the representation the boundary expects.
            let samples = audio.into_f32();
            session.bridge().decode(mode, &samples, frequency, threads)?;
            Ok(())
        }))
    }

    /// Schedule an encode of `message`, resolving to the generated audio
    /// and the message actually sent.
    pub fn encode(
        &self,
        mode: i32,
        message: &str,
        frequency: i32,
        threads: i32,
    ) -> Result<TaskHandle<EncodeOutput>, ValidationError> {
        let mode = validate::mode(mode)?;
        let frequency = validate::frequency(frequency)?;
        // Validated for interface symmetry; the boundary encode call takes
        // no thread hint.
        validate::threads(threads)?;
        validate::message(message)?;
        let info = mode_info(mode);
        if !info.encoding {
            return Err(ValidationError::UnsupportedMode(mode.name()));
        }

        let text = message.to_owned();
        let session = Arc::clone(&self.session);
        Ok(task::spawn(TaskKind::Encode, move || {
            let c_text =
                CString::new(text.as_str()).map_err(|e| TaskError::Runtime(e.to_string()))?;
            let audio_data = session.bridge().encode(mode, &c_text, frequency)?;
            Ok(EncodeOutput {
                audio_data,
                message_sent: text,
                sample_rate: info.sample_rate,
            })
        }))
    }

    /// Schedule a pure sample-format remap of `audio`; never touches the
    /// bridge handle.
    pub fn convert_audio_format(
        &self,
        audio: AudioBuffer,
        target: SampleFormat,
    ) -> TaskHandle<AudioBuffer> {
        task::spawn(TaskKind::Convert, move || Ok(audio.convert(target)))
    }

    /// Drain the decoded-message queue into one ordered collection.
    /// Synchronous, non-blocking beyond current queue depth, destructive.
    pub fn pull_messages(&self) -> Result<Vec<DecodedMessage>, BoundaryError> {
        let mut bridge = self.session.bridge();
        let mut messages = Vec::new();
        while let Some(raw) = bridge.pull_message()? {
            messages.push(DecodedMessage::from(raw));
        }
        Ok(messages)
    }

    /// Whether the capability table allows encoding for `mode`.
    pub fn is_encoding_supported(&self, mode: i32) -> bool {
        wsjtx_abi::Mode::from_raw(mode)
            .map(|m| mode_info(m).encoding)
            .unwrap_or(false)
    }

    /// Whether the capability table allows decoding for `mode`.
    pub fn is_decoding_supported(&self, mode: i32) -> bool {
        wsjtx_abi::Mode::from_raw(mode)
            .map(|m| mode_info(m).decoding)
            .unwrap_or(false)
    }

    /// Host-facing sample rate of `mode`, from the capability table.
    pub fn sample_rate(&self, mode: i32) -> u32 {
        wsjtx_abi::Mode::from_raw(mode)
            .map(|m| mode_info(m).sample_rate)
            .unwrap_or(FALLBACK_SAMPLE_RATE)
    }

    /// Transmission duration of `mode` in seconds, from the capability
    /// table.
    pub fn transmission_duration(&self, mode: i32) -> f64 {
        wsjtx_abi::Mode::from_raw(mode)
            .map(|m| mode_info(m).duration_s)
            .unwrap_or(FALLBACK_DURATION_S)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    use libc::{c_char, c_float, c_int, c_void};
    use wsjtx_abi::{FunctionTable, Mode, RawHandle, RawMessage};

    fn linked() -> Wsjtx {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        Wsjtx::with_module(BridgeModule::linked(wsjtx_bridge::function_table()))
            .expect("instance")
    }

    // Stub boundary that records whether any compute entry point was hit.
    static BOUNDARY_TOUCHED: AtomicBool = AtomicBool::new(false);

    fn touch() {
        BOUNDARY_TOUCHED.store(true, Ordering::SeqCst);
    }

    extern "C" fn stub_create() -> RawHandle {
        RawHandle(1usize as *mut c_void)
    }
    unsafe extern "C" fn stub_destroy(_handle: RawHandle) {}
    unsafe extern "C" fn stub_decode(
        _handle: RawHandle,
        _mode: c_int,
        _samples: *const c_float,
        _count: c_int,
        _frequency: c_int,
        _threads: c_int,
    ) -> c_int {
        touch();
        0
    }
    unsafe extern "C" fn stub_pull(_handle: RawHandle, _msg: *mut RawMessage) -> c_int {
        touch();
        0
    }
    unsafe extern "C" fn stub_encode(
        _handle: RawHandle,
        _mode: c_int,
        _text: *const c_char,
        _frequency: c_int,
        _out: *mut c_float,
        _count: *mut c_int,
    ) -> c_int {
        touch();
        0
    }
    extern "C" fn stub_sample_rate(_mode: c_int) -> c_int {
        touch();
        12_000
    }
    extern "C" fn stub_max_samples(_mode: c_int) -> c_int {
        touch();
        4
    }

    fn stubbed() -> Wsjtx {
        let table = FunctionTable {
            create: stub_create,
            destroy: stub_destroy,
            decode: stub_decode,
            pull_message: stub_pull,
            encode: stub_encode,
            get_sample_rate: stub_sample_rate,
            get_max_samples: stub_max_samples,
        };
        Wsjtx::with_module(BridgeModule::linked(table)).expect("instance")
    }

    fn some_audio() -> AudioBuffer {
        AudioBuffer::Float32(vec![0.0; 64])
    }

    #[tokio::test]
    async fn invalid_inputs_never_reach_the_boundary() {
        let wsjtx = stubbed();

        let err = wsjtx
            .decode(-1, some_audio(), 1000, 4)
            .expect_err("mode rejected");
        assert_eq!(err.name(), "INVALID_MODE");

        let err = wsjtx
            .decode(0, AudioBuffer::Float32(Vec::new()), 1000, 4)
            .expect_err("audio rejected");
        assert_eq!(err.name(), "INVALID_AUDIO_DATA");

        let err = wsjtx
            .decode(0, some_audio(), -5, 4)
            .expect_err("frequency rejected");
        assert_eq!(err.name(), "INVALID_FREQUENCY");
        assert!(wsjtx.decode(0, some_audio(), 30_000_001, 4).is_err());

        assert_eq!(
            wsjtx
                .decode(0, some_audio(), 1000, 0)
                .expect_err("threads rejected")
                .name(),
            "INVALID_THREADS"
        );
        assert!(wsjtx.decode(0, some_audio(), 1000, 17).is_err());

        let err = wsjtx.encode(0, "", 1000, 4).expect_err("empty message");
        assert_eq!(err.name(), "INVALID_MESSAGE");
        assert!(wsjtx.encode(0, &"X".repeat(23), 1000, 4).is_err());

        let err = wsjtx
            .encode(Mode::Wspr as i32, "CQ DX", 1000, 4)
            .expect_err("wspr cannot encode");
        assert_eq!(err.name(), "UNSUPPORTED_MODE");

        assert!(!BOUNDARY_TOUCHED.load(Ordering::SeqCst));
    }

    #[test]
    fn capability_table_is_authoritative() {
        // The stub reports 12 kHz for everything; the façade must answer
        // from its own table without touching the boundary.
        let wsjtx = stubbed();

        assert_eq!(wsjtx.sample_rate(Mode::Ft8 as i32), 48_000);
        assert_eq!(wsjtx.sample_rate(Mode::Jt65 as i32), 11_025);
        assert_eq!(wsjtx.sample_rate(-1), FALLBACK_SAMPLE_RATE);

        assert_eq!(wsjtx.transmission_duration(Mode::Ft8 as i32), 12.64);
        assert_eq!(wsjtx.transmission_duration(Mode::Wspr as i32), 110.6);
        assert_eq!(wsjtx.transmission_duration(99), FALLBACK_DURATION_S);

        assert!(wsjtx.is_encoding_supported(Mode::Ft8 as i32));
        assert!(wsjtx.is_encoding_supported(Mode::Ft4 as i32));
        assert!(!wsjtx.is_encoding_supported(Mode::Wspr as i32));
        assert!(!wsjtx.is_encoding_supported(-1));

        for mode in Mode::ALL {
            assert!(wsjtx.is_decoding_supported(mode as i32));
        }
        assert!(!wsjtx.is_decoding_supported(9));

        assert!(!BOUNDARY_TOUCHED.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn encode_then_decode_round_trip() {
        let wsjtx = linked();

        let out = wsjtx
            .encode(Mode::Ft8 as i32, "CQ TEST K1ABC FN20", 1000, 4)
            .expect("validated")
            .await
            .expect("encoded");
        assert_eq!(out.message_sent, "CQ TEST K1ABC FN20");
        assert_eq!(out.sample_rate, 48_000);
        assert!(!out.audio_data.is_empty());

        wsjtx
            .decode(Mode::Ft8 as i32, AudioBuffer::Float32(out.audio_data), 1000, 4)
            .expect("validated")
            .await
            .expect("decoded");

        let messages = wsjtx.pull_messages().expect("drain");
        assert!(messages.iter().any(|m| m.text == "CQ TEST K1ABC FN20"));
    }

    #[tokio::test]
    async fn int16_audio_decodes_too() {
        let wsjtx = linked();

        let out = wsjtx
            .encode(Mode::Ft8 as i32, "K1ABC W9XYZ EN50", 1500, 1)
            .expect("validated")
            .await
            .expect("encoded");

        let int16 = wsjtx
            .convert_audio_format(AudioBuffer::Float32(out.audio_data), SampleFormat::Int16)
            .await
            .expect("converted");
        assert_eq!(int16.format(), SampleFormat::Int16);

        wsjtx
            .decode(Mode::Ft8 as i32, int16, 1500, 1)
            .expect("validated")
            .await
            .expect("decoded");

        let messages = wsjtx.pull_messages().expect("drain");
        assert!(messages.iter().any(|m| m.text == "K1ABC W9XYZ EN50"));
    }

    #[tokio::test]
    async fn drained_stays_drained() {
        let wsjtx = linked();
        assert!(wsjtx.pull_messages().expect("first drain").is_empty());
        assert!(wsjtx.pull_messages().expect("second drain").is_empty());
    }

    #[tokio::test]
    async fn drain_preserves_fifo_order() {
        let wsjtx = linked();
        for text in ["CQ DX K1ABC", "K1ABC W9XYZ"] {
            let out = wsjtx
                .encode(Mode::Ft8 as i32, text, 1000, 1)
                .expect("validated")
                .await
                .expect("encoded");
            wsjtx
                .decode(Mode::Ft8 as i32, AudioBuffer::Float32(out.audio_data), 1000, 1)
                .expect("validated")
                .await
                .expect("decoded");
        }

        let messages = wsjtx.pull_messages().expect("drain");
        let texts: Vec<&str> = messages.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["CQ DX K1ABC", "K1ABC W9XYZ"]);
    }

    #[tokio::test]
    async fn convert_to_current_format_is_identity() {
        let wsjtx = linked();
        let buf = AudioBuffer::Int16(vec![5, -5, 10]);
        let out = wsjtx
            .convert_audio_format(buf.clone(), SampleFormat::Int16)
            .await
            .expect("converted");
        assert_eq!(out, buf);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn teardown_waits_for_in_flight_tasks() {
        for _ in 0..8 {
            let wsjtx = linked();
            let task = wsjtx
                .encode(Mode::Ft8 as i32, "CQ STRESS TEST", 1000, 1)
                .expect("validated");
            drop(wsjtx);
            let out = task.await.expect("task survives teardown");
            assert!(!out.audio_data.is_empty());
        }
    }
}
