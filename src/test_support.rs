// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Fixtures shared by the unit tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::errors::ExecutionError;
use crate::task::{shared, task_fn, SharedTask};

/// Ordered record of what ran, shared between tasks.
pub(crate) type Log = Arc<Mutex<Vec<String>>>;

pub(crate) fn new_log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

pub(crate) fn joined(log: &Log) -> String {
    log.lock().unwrap().join(",")
}

pub(crate) fn record(log: &Log, entry: impl Into<String>) {
    log.lock().unwrap().push(entry.into());
}

pub(crate) fn append(log: &Log, id: &'static str) -> SharedTask {
    let log = Arc::clone(log);
    shared(
        task_fn(move |_ctx| {
            let log = Arc::clone(&log);
            async move {
                record(&log, id);
                Ok(())
            }
        })
        .named(id),
    )
}

pub(crate) fn sleep_then_append(log: &Log, id: &'static str, millis: u64) -> SharedTask {
    let log = Arc::clone(log);
    shared(
        task_fn(move |_ctx| {
            let log = Arc::clone(&log);
            async move {
                tokio::time::sleep(Duration::from_millis(millis)).await;
                record(&log, id);
                Ok(())
            }
        })
        .named(id),
    )
}

pub(crate) fn failing(message: &'static str) -> SharedTask {
    shared(task_fn(move |_ctx| async move { Err(ExecutionError::msg(message)) }).named("failing"))
}

pub(crate) fn panicking(message: &'static str) -> SharedTask {
    shared(task_fn(move |_ctx| async move { panic!("{message}") }).named("panicking"))
}

pub(crate) fn noop() -> SharedTask {
    shared(task_fn(|_ctx| async { Ok(()) }).named("noop"))
}

/// Sleeps far longer than any test is willing to wait.
pub(crate) fn stalled() -> SharedTask {
    shared(
        task_fn(|_ctx| async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        })
        .named("stalled"),
    )
}
