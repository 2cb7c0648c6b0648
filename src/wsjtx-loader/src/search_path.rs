// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Scoped extension of the dynamic-loader search path.
//!
//! The bridge is loaded by absolute path, but its own transitive shared
//! libraries resolve through the platform search path. The guard prepends
//! the bridge directory for the duration of the load and restores the
//! previous state on every exit path, so no globally mutated state outlives
//! a load attempt.

use std::ffi::OsString;
use std::path::Path;

use tracing::debug;

#[cfg(windows)]
const SEARCH_PATH_VAR: &str = "PATH";
#[cfg(target_os = "macos")]
const SEARCH_PATH_VAR: &str = "DYLD_FALLBACK_LIBRARY_PATH";
#[cfg(all(unix, not(target_os = "macos")))]
const SEARCH_PATH_VAR: &str = "LD_LIBRARY_PATH";

#[cfg(windows)]
const PATH_SEPARATOR: &str = ";";
#[cfg(not(windows))]
const PATH_SEPARATOR: &str = ":";

// Serializes every test that touches the process-global search path,
// including loader tests that reach it through `load_from`.
#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

pub struct SearchPathGuard {
    previous: Option<OsString>,
}

impl SearchPathGuard {
    /// Prepend `dir` to the loader search path until the guard drops.
    pub fn extend(dir: &Path) -> Self {
        let previous = std::env::var_os(SEARCH_PATH_VAR);
        let mut extended = dir.as_os_str().to_os_string();
        if let Some(prev) = &previous {
            if !prev.is_empty() {
                extended.push(PATH_SEPARATOR);
                extended.push(prev);
            }
        }
        debug!("Extending {} with {:?}", SEARCH_PATH_VAR, dir);
        std::env::set_var(SEARCH_PATH_VAR, &extended);
        SearchPathGuard { previous }
    }
}

impl Drop for SearchPathGuard {
    fn drop(&mut self) {
        match self.previous.take() {
            Some(prev) => std::env::set_var(SEARCH_PATH_VAR, prev),
            None => std::env::remove_var(SEARCH_PATH_VAR),
        }
        debug!("Restored {}", SEARCH_PATH_VAR);
    }
}
