// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

use libc::{c_char, c_float, c_int, c_void};

use crate::RawMessage;

/// Opaque compute-library instance handle.
///
/// Pointer-sized, never dereferenced on this side, passed by value. The
/// owner must serialize boundary calls against one handle and call destroy
/// exactly once; under that invariant it is safe to move between threads.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawHandle(pub *mut c_void);

unsafe impl Send for RawHandle {}

impl RawHandle {
    pub fn null() -> Self {
        RawHandle(std::ptr::null_mut())
    }

    pub fn is_null(self) -> bool {
        self.0.is_null()
    }
}

pub type CreateFn = unsafe extern "C" fn() -> RawHandle;
pub type DestroyFn = unsafe extern "C" fn(RawHandle);
pub type DecodeFn = unsafe extern "C" fn(
    RawHandle,
    c_int,          // mode
    *const c_float, // samples
    c_int,          // sample count
    c_int,          // frequency (Hz)
    c_int,          // thread hint for the compute library
) -> c_int;
pub type PullMessageFn = unsafe extern "C" fn(RawHandle, *mut RawMessage) -> c_int;
pub type EncodeFn = unsafe extern "C" fn(
    RawHandle,
    c_int,          // mode
    *const c_char,  // message text
    c_int,          // frequency (Hz)
    *mut c_float,   // output buffer
    *mut c_int,     // in: capacity, out: samples written
) -> c_int;
pub type GetSampleRateFn = unsafe extern "C" fn(c_int) -> c_int;
pub type GetMaxSamplesFn = unsafe extern "C" fn(c_int) -> c_int;

/// Resolved bridge entry points.
///
/// Validity is all-or-nothing: a table only exists after every symbol
/// resolved, so a populated table is a loaded bridge.
#[derive(Clone, Copy)]
pub struct FunctionTable {
    pub create: CreateFn,
    pub destroy: DestroyFn,
    pub decode: DecodeFn,
    pub pull_message: PullMessageFn,
    pub encode: EncodeFn,
    pub get_sample_rate: GetSampleRateFn,
    pub get_max_samples: GetMaxSamplesFn,
}

impl std::fmt::Debug for FunctionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FunctionTable { .. }")
    }
}

/// Boundary operations, for the ownership contract below.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Destroy,
    Decode,
    PullMessage,
    Encode,
    GetSampleRate,
    GetMaxSamples,
}

/// Who owns an escaping allocation of a boundary operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// Caller allocates and frees; callee only writes within the stated
    /// capacity.
    CallerOwned,
    /// Allocation lives behind the opaque handle; released by destroy.
    HandleOwned,
}

/// The memory-ownership contract of each operation.
///
/// Machine-checkable form of the "no transferred ownership" rule: no buffer
/// is ever allocated on one side of the boundary and freed on the other.
pub const fn ownership(op: Operation) -> Ownership {
    match op {
        Operation::Create | Operation::Destroy => Ownership::HandleOwned,
        Operation::Decode
        | Operation::PullMessage
        | Operation::Encode
        | Operation::GetSampleRate
        | Operation::GetMaxSamples => Ownership::CallerOwned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_null_checks() {
        assert!(RawHandle::null().is_null());
        let x = 1u8;
        assert!(!RawHandle(&x as *const u8 as *mut c_void).is_null());
    }

    #[test]
    fn only_the_handle_transfers_ownership() {
        let caller_owned = [
            Operation::Decode,
            Operation::PullMessage,
            Operation::Encode,
            Operation::GetSampleRate,
            Operation::GetMaxSamples,
        ];
        for op in caller_owned {
            assert_eq!(ownership(op), Ownership::CallerOwned);
        }
        assert_eq!(ownership(Operation::Create), Ownership::HandleOwned);
        assert_eq!(ownership(Operation::Destroy), Ownership::HandleOwned);
    }
}
