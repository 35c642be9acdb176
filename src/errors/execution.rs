// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors surfaced by a single `execute` call.

use std::backtrace::Backtrace;
use std::sync::Arc;
use thiserror::Error;

/// Result type every task and executor returns.
pub type TaskResult = Result<(), ExecutionError>;

/// Why a context stopped accepting work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CancellationError {
    #[error("execution cancelled")]
    Cancelled,
    #[error("execution deadline exceeded")]
    DeadlineExceeded,
}

/// Terminal failure of a run.
///
/// Errors produced by tasks travel through the executors verbatim; the engine
/// only adds the `Panicked` and `Cancelled` variants.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// The error a task returned.
    #[error(transparent)]
    Task(#[from] anyhow::Error),

    /// A task (or middleware wrapping it) panicked and the engine recovered.
    #[error("task {task} panicked: {message}\n{stack}")]
    Panicked {
        task: String,
        message: String,
        stack: Arc<Backtrace>,
    },

    /// The context was cancelled or its deadline passed.
    #[error(transparent)]
    Cancelled(#[from] CancellationError),
}

impl ExecutionError {
    /// Wraps any displayable message as a task failure.
    pub fn msg<M>(message: M) -> Self
    where
        M: std::fmt::Display + std::fmt::Debug + Send + Sync + 'static,
    {
        Self::Task(anyhow::Error::msg(message))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled(_))
    }

    pub fn is_panic(&self) -> bool {
        matches!(self, Self::Panicked { .. })
    }
}
