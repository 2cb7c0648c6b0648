// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! C-ABI bridge library for WSJT-X style digital modes.
//!
//! Builds as a `cdylib` for cross-toolchain loading and as an `rlib` for
//! hosts whose ABI already matches. Every export is total: status codes
//! instead of panics, a blanket `catch_unwind` mapping anything
//! unclassifiable to `Internal`, and no allocation ever changes owner
//! across the boundary.

mod core;
mod modem;

use std::ffi::c_void;
use std::panic::{catch_unwind, AssertUnwindSafe};

use libc::{c_char, c_float, c_int};
use wsjtx_abi::{ErrorCode, FunctionTable, Mode, RawHandle, RawMessage};

use crate::core::{CoreError, WsjtxCore};

fn status(code: ErrorCode) -> c_int {
    code as c_int
}

fn core_status(err: CoreError) -> c_int {
    match err {
        CoreError::EncodeFailed => status(ErrorCode::EncodeFailed),
    }
}

/// Create one compute-library instance. Returns a null handle on failure;
/// the handle must be released with [`wsjtx_destroy`] exactly once.
#[no_mangle]
pub extern "C" fn wsjtx_create() -> RawHandle {
    match catch_unwind(|| Box::new(WsjtxCore::new())) {
        Ok(core) => RawHandle(Box::into_raw(core).cast::<c_void>()),
        Err(_) => RawHandle::null(),
    }
}

/// Destroy an instance created by [`wsjtx_create`]. A null handle is a no-op.
///
/// # Safety
/// `handle` must come from `wsjtx_create` and must not be used afterwards.
#[no_mangle]
pub unsafe extern "C" fn wsjtx_destroy(handle: RawHandle) {
    if handle.is_null() {
        return;
    }
    let core = Box::from_raw(handle.0.cast::<WsjtxCore>());
    // Never unwind across the boundary, even out of a destructor.
    let _ = catch_unwind(AssertUnwindSafe(move || drop(core)));
}

/// Demodulate `samples`; decoded messages are queued on the instance and
/// retrieved via [`wsjtx_pull_message`].
///
/// # Safety
/// `handle` must be a live instance and `samples` valid for `sample_count`
/// reads.
#[no_mangle]
pub unsafe extern "C" fn wsjtx_decode(
    handle: RawHandle,
    mode: c_int,
    samples: *const c_float,
    sample_count: c_int,
    frequency: c_int,
    num_threads: c_int,
) -> c_int {
    if handle.is_null() {
        return status(ErrorCode::InvalidHandle);
    }
    if samples.is_null() || sample_count <= 0 {
        return status(ErrorCode::InvalidParam);
    }
    let Some(mode) = Mode::from_raw(mode) else {
        return status(ErrorCode::InvalidMode);
    };
    let threads = num_threads.max(1);

    let core = &mut *handle.0.cast::<WsjtxCore>();
    let samples = std::slice::from_raw_parts(samples, sample_count as usize);
    match catch_unwind(AssertUnwindSafe(|| {
        core.decode(mode, samples, frequency, threads)
    })) {
        Ok(()) => status(ErrorCode::Ok),
        Err(_) => status(ErrorCode::Internal),
    }
}

/// Pop one decoded message into `message`.
///
/// Returns 1 when a message was written, 0 when the queue is empty, a
/// negative status on error.
///
/// # Safety
/// `handle` must be a live instance and `message` writable.
#[no_mangle]
pub unsafe extern "C" fn wsjtx_pull_message(handle: RawHandle, message: *mut RawMessage) -> c_int {
    if handle.is_null() || message.is_null() {
        return status(ErrorCode::InvalidHandle);
    }
    let core = &mut *handle.0.cast::<WsjtxCore>();
    match catch_unwind(AssertUnwindSafe(|| core.pull())) {
        Ok(Some(msg)) => {
            *message = msg;
            1
        }
        Ok(None) => 0,
        Err(_) => status(ErrorCode::Internal),
    }
}

/// Modulate `message` into `output_samples`.
///
/// `output_sample_count` carries the buffer capacity in and the written
/// sample count out. An undersized buffer yields `BufferTooSmall` with no
/// partial writes.
///
/// # Safety
/// `handle` must be a live instance, `message` NUL-terminated,
/// `output_samples` valid for `*output_sample_count` writes.
#[no_mangle]
pub unsafe extern "C" fn wsjtx_encode(
    handle: RawHandle,
    mode: c_int,
    message: *const c_char,
    frequency: c_int,
    output_samples: *mut c_float,
    output_sample_count: *mut c_int,
) -> c_int {
    if handle.is_null() {
        return status(ErrorCode::InvalidHandle);
    }
    if message.is_null() || output_samples.is_null() || output_sample_count.is_null() {
        return status(ErrorCode::NullPointer);
    }
    let capacity = *output_sample_count;
    if capacity <= 0 {
        return status(ErrorCode::InvalidParam);
    }
    let Some(mode) = Mode::from_raw(mode) else {
        return status(ErrorCode::InvalidMode);
    };
    let Ok(text) = std::ffi::CStr::from_ptr(message).to_str() else {
        return status(ErrorCode::InvalidParam);
    };

    let core = &mut *handle.0.cast::<WsjtxCore>();
    let result = match catch_unwind(AssertUnwindSafe(|| core.encode(mode, frequency, text))) {
        Ok(result) => result,
        Err(_) => return status(ErrorCode::Internal),
    };
    match result {
        Ok(audio) => {
            if audio.len() > capacity as usize {
                return status(ErrorCode::BufferTooSmall);
            }
            std::ptr::copy_nonoverlapping(audio.as_ptr(), output_samples, audio.len());
            *output_sample_count = audio.len() as c_int;
            status(ErrorCode::Ok)
        }
        Err(err) => core_status(err),
    }
}

/// Sample rate the bridge expects for `mode`, or a negative status for an
/// unknown mode.
#[no_mangle]
pub extern "C" fn wsjtx_get_sample_rate(mode: c_int) -> c_int {
    match Mode::from_raw(mode) {
        Some(mode) => WsjtxCore::sample_rate(mode),
        None => status(ErrorCode::InvalidMode),
    }
}

/// Largest sample count encode can produce for `mode`, or a negative status
/// for an unknown mode.
#[no_mangle]
pub extern "C" fn wsjtx_get_max_samples(mode: c_int) -> c_int {
    match Mode::from_raw(mode) {
        Some(mode) => WsjtxCore::max_samples(mode),
        None => status(ErrorCode::InvalidMode),
    }
}

/// Static description of a status code; never NULL, never freed by the
/// caller.
#[no_mangle]
pub extern "C" fn wsjtx_error_string(error_code: c_int) -> *const c_char {
    let text: &'static [u8] = match ErrorCode::from_raw(error_code) {
        Some(ErrorCode::Ok) => b"Success\0",
        Some(ErrorCode::InvalidHandle) => b"Invalid handle\0",
        Some(ErrorCode::InvalidMode) => b"Invalid mode\0",
        Some(ErrorCode::InvalidParam) => b"Invalid parameter\0",
        Some(ErrorCode::NullPointer) => b"Null pointer\0",
        Some(ErrorCode::BufferTooSmall) => b"Buffer too small\0",
        Some(ErrorCode::DecodeFailed) => b"Decode failed\0",
        Some(ErrorCode::EncodeFailed) => b"Encode failed\0",
        Some(ErrorCode::OutOfMemory) => b"Out of memory\0",
        Some(ErrorCode::ThreadError) => b"Thread error\0",
        Some(ErrorCode::NotInitialized) => b"Not initialized\0",
        Some(ErrorCode::AlreadyInitialized) => b"Already initialized\0",
        Some(ErrorCode::Internal) => b"Internal error\0",
        None => b"Unknown error\0",
    };
    text.as_ptr().cast::<c_char>()
}

/// Function table over this build's own exports, for hosts that link the
/// bridge statically instead of resolving it at runtime.
pub fn function_table() -> FunctionTable {
    FunctionTable {
        create: wsjtx_create,
        destroy: wsjtx_destroy,
        decode: wsjtx_decode,
        pull_message: wsjtx_pull_message,
        encode: wsjtx_encode,
        get_sample_rate: wsjtx_get_sample_rate,
        get_max_samples: wsjtx_get_max_samples,
    }
}
