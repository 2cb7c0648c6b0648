// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Host-facing façade over the wsjtx bridge: synchronous argument
//! validation, background decode/encode/convert tasks and destructive
//! drains of the decoded-message queue.
//!
//! The host side is assumed single-threaded and cooperative; CPU-bound
//! boundary calls run on the tokio blocking pool, one call per task, with a
//! per-instance lock serializing access to the opaque handle.

mod audio;
mod error;
mod instance;
mod message;
mod modes;
mod task;
mod validate;

pub use audio::{AudioBuffer, SampleFormat};
pub use error::{TaskError, ValidationError};
pub use instance::Wsjtx;
pub use message::{DecodedMessage, EncodeOutput};
pub use modes::{mode_info, ModeInfo, FALLBACK_DURATION_S, FALLBACK_SAMPLE_RATE};
pub use task::{TaskHandle, TaskKind};

pub use wsjtx_abi::{ErrorCode, Mode};
pub use wsjtx_loader::{BoundaryError, BridgeModule, LoadError};
