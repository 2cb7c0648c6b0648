// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Pure-C contract shared between the wsjtx bridge library and its callers.
//!
//! Everything crossing the boundary is a primitive, an opaque pointer or a
//! naturally-aligned POD struct. Heap allocations never change owner across
//! the boundary: buffers are caller-allocated (pointer + capacity) and the
//! only callee-owned allocation is the opaque instance handle with its
//! explicit create/destroy pair.

mod error;
mod message;
mod mode;
mod table;

pub use error::ErrorCode;
pub use message::{RawMessage, MESSAGE_TEXT_CAP};
pub use mode::Mode;
pub use table::{
    ownership, CreateFn, DecodeFn, DestroyFn, EncodeFn, FunctionTable, GetMaxSamplesFn,
    GetSampleRateFn, Operation, Ownership, PullMessageFn, RawHandle,
};

/// Exported symbol names of the bridge library.
///
/// The loader resolves exactly these seven; `wsjtx_error_string` is exported
/// too but callers translate codes locally via [`ErrorCode::description`].
pub mod symbols {
    pub const CREATE: &[u8] = b"wsjtx_create";
    pub const DESTROY: &[u8] = b"wsjtx_destroy";
    pub const DECODE: &[u8] = b"wsjtx_decode";
    pub const PULL_MESSAGE: &[u8] = b"wsjtx_pull_message";
    pub const ENCODE: &[u8] = b"wsjtx_encode";
    pub const GET_SAMPLE_RATE: &[u8] = b"wsjtx_get_sample_rate";
    pub const GET_MAX_SAMPLES: &[u8] = b"wsjtx_get_max_samples";
}
