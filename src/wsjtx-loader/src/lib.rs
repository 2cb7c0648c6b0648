// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Locates and loads the wsjtx bridge library, resolves its exports into a
//! function table and owns the per-instance opaque handle.
//!
//! The bridge must sit in the same directory as the running module, named
//! deterministically per platform; the loader never depends on
//! externally-set search-path variables. Symbol resolution is
//! all-or-nothing: either every entry point resolves or the load fails and
//! the library is released.

mod search_path;

use std::ffi::CStr;
use std::path::{Path, PathBuf};

use libloading::{Library, Symbol};
use thiserror::Error;
use tracing::{debug, info, warn};
use wsjtx_abi::{symbols, ErrorCode, FunctionTable, Mode, RawHandle, RawMessage};

use crate::search_path::SearchPathGuard;

#[cfg(windows)]
const BRIDGE_FILENAME: &str = "wsjtx_bridge.dll";
#[cfg(target_os = "macos")]
const BRIDGE_FILENAME: &str = "libwsjtx_bridge.dylib";
#[cfg(all(unix, not(target_os = "macos")))]
const BRIDGE_FILENAME: &str = "libwsjtx_bridge.so";

/// Platform-specific file name of the bridge shared library.
pub fn bridge_filename() -> &'static str {
    BRIDGE_FILENAME
}

/// Directory containing the currently executing module.
pub fn module_dir() -> Result<PathBuf, LoadError> {
    let exe = std::env::current_exe().map_err(|e| LoadError::ModuleDir(e.to_string()))?;
    let dir = exe
        .parent()
        .ok_or_else(|| LoadError::ModuleDir(format!("{:?} has no parent directory", exe)))?;
    Ok(dir.to_path_buf())
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to load bridge library {path:?}: {source}")]
    Load {
        path: PathBuf,
        source: libloading::Error,
    },

    #[error("Bridge library is missing symbol {name}: {source}")]
    MissingSymbol {
        name: String,
        source: libloading::Error,
    },

    #[error("Bridge create() returned a null instance handle")]
    NullInstance,

    #[error("Failed to locate the running module directory: {0}")]
    ModuleDir(String),
}

/// A non-zero status from a boundary call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{op} failed: {code}")]
pub struct BoundaryError {
    pub op: &'static str,
    pub code: ErrorCode,
}

impl BoundaryError {
    fn from_raw(op: &'static str, raw: i32) -> Self {
        let code = ErrorCode::from_raw(raw).unwrap_or(ErrorCode::Internal);
        BoundaryError { op, code }
    }

    /// For queries whose success is a positive value; a non-positive result
    /// that is not a valid error status must not map to `Ok`.
    fn from_query(op: &'static str, raw: i32) -> Self {
        match ErrorCode::from_raw(raw) {
            Some(code) if code != ErrorCode::Ok => BoundaryError { op, code },
            _ => BoundaryError {
                op,
                code: ErrorCode::Internal,
            },
        }
    }
}

fn check(op: &'static str, raw: i32) -> Result<(), BoundaryError> {
    if raw == ErrorCode::Ok as i32 {
        Ok(())
    } else {
        Err(BoundaryError::from_raw(op, raw))
    }
}

/// A loaded (or statically linked) bridge with a fully resolved table.
///
/// Existence of a `BridgeModule` is the Ready state of the load machine;
/// failed loads are terminal and only the error escapes.
#[derive(Debug)]
pub struct BridgeModule {
    table: FunctionTable,
    _library: Option<Library>,
}

impl BridgeModule {
    /// Load the bridge from the directory of the running module.
    pub fn load() -> Result<Self, LoadError> {
        Self::load_from(&module_dir()?)
    }

    /// Load the bridge from `dir`, extending the loader search path to the
    /// same directory for the duration so transitive dependencies resolve
    /// without a system-wide install.
    pub fn load_from(dir: &Path) -> Result<Self, LoadError> {
        let path = dir.join(BRIDGE_FILENAME);
        info!("Loading bridge library {:?}", path);

        let _guard = SearchPathGuard::extend(dir);
        let library = unsafe { Library::new(&path) }.map_err(|source| {
            warn!("Bridge load failed for {:?}: {}", path, source);
            LoadError::Load {
                path: path.clone(),
                source,
            }
        })?;
        let table = unsafe { resolve_table(&library) }?;

        info!("Bridge library ready: {:?}", path);
        Ok(BridgeModule {
            table,
            _library: Some(library),
        })
    }

    /// Wrap an already-linked bridge, for builds where host and bridge share
    /// a toolchain and the C ABI detour is unnecessary.
    pub fn linked(table: FunctionTable) -> Self {
        BridgeModule {
            table,
            _library: None,
        }
    }

    pub fn table(&self) -> &FunctionTable {
        &self.table
    }

    /// Create the compute-library instance this module was loaded for.
    ///
    /// A null handle releases the library before the error propagates.
    pub fn create_instance(self) -> Result<BridgeInstance, LoadError> {
        let handle = unsafe { (self.table.create)() };
        if handle.is_null() {
            return Err(LoadError::NullInstance);
        }
        debug!("Bridge instance created");
        Ok(BridgeInstance {
            handle,
            module: self,
        })
    }
}

/// Resolve every required export; any miss invalidates the whole load.
unsafe fn resolve_table(library: &Library) -> Result<FunctionTable, LoadError> {
    unsafe fn resolve<T: Copy>(
        library: &Library,
        name: &'static [u8],
    ) -> Result<T, LoadError> {
        let symbol: Symbol<'_, T> = library.get(name).map_err(|source| LoadError::MissingSymbol {
            name: String::from_utf8_lossy(name).into_owned(),
            source,
        })?;
        debug!("Resolved symbol {}", String::from_utf8_lossy(name));
        Ok(*symbol)
    }

    Ok(FunctionTable {
        create: resolve(library, symbols::CREATE)?,
        destroy: resolve(library, symbols::DESTROY)?,
        decode: resolve(library, symbols::DECODE)?,
        pull_message: resolve(library, symbols::PULL_MESSAGE)?,
        encode: resolve(library, symbols::ENCODE)?,
        get_sample_rate: resolve(library, symbols::GET_SAMPLE_RATE)?,
        get_max_samples: resolve(library, symbols::GET_MAX_SAMPLES)?,
    })
}

/// One compute-library instance behind the boundary.
///
/// Owns exactly one handle; `&mut self` on every boundary call keeps calls
/// against the handle serialized, and `Drop` destroys it on all exit paths.
pub struct BridgeInstance {
    handle: RawHandle,
    module: BridgeModule,
}

impl BridgeInstance {
    pub fn table(&self) -> &FunctionTable {
        &self.module.table
    }

    /// Feed samples to the compute library; decoded messages accumulate in
    /// the instance queue.
    pub fn decode(
        &mut self,
        mode: Mode,
        samples: &[f32],
        frequency: i32,
        threads: i32,
    ) -> Result<(), BoundaryError> {
        let raw = unsafe {
            (self.table().decode)(
                self.handle,
                mode as i32,
                samples.as_ptr(),
                samples.len() as i32,
                frequency,
                threads,
            )
        };
        check("decode", raw)
    }

    /// Encode `text`, sizing the output from `get_max_samples` and trimming
    /// to the actual written count.
    pub fn encode(
        &mut self,
        mode: Mode,
        text: &CStr,
        frequency: i32,
    ) -> Result<Vec<f32>, BoundaryError> {
        let max = self.max_samples(mode)?;
        let mut buf = vec![0f32; max as usize];
        let mut count = max;
        let raw = unsafe {
            (self.table().encode)(
                self.handle,
                mode as i32,
                text.as_ptr(),
                frequency,
                buf.as_mut_ptr(),
                &mut count,
            )
        };
        check("encode", raw)?;
        buf.truncate(count as usize);
        Ok(buf)
    }

    /// Pop one decoded message, `None` when the queue is empty.
    pub fn pull_message(&mut self) -> Result<Option<RawMessage>, BoundaryError> {
        let mut msg = RawMessage::zeroed();
        let raw = unsafe { (self.table().pull_message)(self.handle, &mut msg) };
        match raw {
            1 => Ok(Some(msg)),
            0 => Ok(None),
            other => Err(BoundaryError::from_raw("pull_message", other)),
        }
    }

    /// Sample rate the bridge expects for `mode`.
    pub fn sample_rate(&self, mode: Mode) -> Result<i32, BoundaryError> {
        let raw = unsafe { (self.table().get_sample_rate)(mode as i32) };
        if raw > 0 {
            Ok(raw)
        } else {
            Err(BoundaryError::from_query("get_sample_rate", raw))
        }
    }

    /// Encode output ceiling for `mode`.
    pub fn max_samples(&self, mode: Mode) -> Result<i32, BoundaryError> {
        let raw = unsafe { (self.table().get_max_samples)(mode as i32) };
        if raw > 0 {
            Ok(raw)
        } else {
            Err(BoundaryError::from_query("get_max_samples", raw))
        }
    }
}

impl Drop for BridgeInstance {
    fn drop(&mut self) {
        debug!("Destroying bridge instance");
        unsafe { (self.table().destroy)(self.handle) };
    }
}
