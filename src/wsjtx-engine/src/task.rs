// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! One-shot background tasks on the tokio blocking pool.
//!
//! A task captures its inputs at creation, runs exactly one compute-bound
//! closure off the host thread and delivers success or error through the
//! returned handle. No cancellation: a scheduled task runs to completion.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::TaskError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Decode,
    Encode,
    Convert,
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TaskKind::Decode => "decode",
            TaskKind::Encode => "encode",
            TaskKind::Convert => "convert",
        })
    }
}

/// Completion handle of a scheduled task; a future resolving to the task
/// result once the pool thread finishes.
#[derive(Debug)]
pub struct TaskHandle<T> {
    kind: TaskKind,
    inner: JoinHandle<Result<T, TaskError>>,
}

impl<T> TaskHandle<T> {
    pub fn kind(&self) -> TaskKind {
        self.kind
    }
}

impl<T> Future for TaskHandle<T> {
    type Output = Result<T, TaskError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.inner).poll(cx).map(|joined| match joined {
            Ok(result) => result,
            // A panicking task is coerced to a generic error instead of
            // propagating; the host process must never crash.
            Err(join_err) => Err(TaskError::Runtime(join_err.to_string())),
        })
    }
}

pub(crate) fn spawn<T, F>(kind: TaskKind, work: F) -> TaskHandle<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, TaskError> + Send + 'static,
{
    debug!(%kind, "Task created");
    let inner = tokio::task::spawn_blocking(move || {
        debug!(%kind, "Task running");
        let result = work();
        match &result {
            Ok(_) => debug!(%kind, "Task completed"),
            Err(err) => warn!(%kind, "Task failed: {err}"),
        }
        result
    });
    TaskHandle { kind, inner }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn completes_with_value() {
        let handle = spawn(TaskKind::Convert, || Ok(41 + 1));
        assert_eq!(handle.kind(), TaskKind::Convert);
        assert_eq!(handle.await.expect("success"), 42);
    }

    #[tokio::test]
    async fn task_error_is_delivered() {
        let handle = spawn::<(), _>(TaskKind::Decode, || {
            Err(TaskError::Runtime("boom".into()))
        });
        match handle.await {
            Err(TaskError::Runtime(msg)) => assert_eq!(msg, "boom"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn panic_maps_to_generic_runtime_error() {
        let handle = spawn::<(), _>(TaskKind::Encode, || panic!("unexpected native fault"));
        assert!(matches!(handle.await, Err(TaskError::Runtime(_))));
    }
}
