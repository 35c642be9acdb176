// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for executor lifecycle and task events.
//!
//! This module contains message types for logging events related to:
//! * Run lifecycle (start, completion, failure, cancellation)
//! * Graph node dispatch and completion
//! * Panics recovered at the task boundary

use crate::errors::CancellationError;
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// Run started.
///
/// # Log Level
/// `debug!` - Executors nest, so one line per run would be noisy at `info`
///
/// # Example
/// ```
/// use taskgraph::observability::messages::engine::ExecutionStarted;
///
/// let msg = ExecutionStarted {
///     executor: "graph",
///     task_count: 5,
/// };
///
/// tracing::debug!("{}", msg);
/// ```
pub struct ExecutionStarted<'a> {
    pub executor: &'a str,
    pub task_count: usize,
}

impl Display for ExecutionStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting {} execution of {} tasks",
            self.executor, self.task_count
        )
    }
}

impl StructuredLog for ExecutionStarted<'_> {
    fn log(&self) {
        tracing::debug!(
            executor = self.executor,
            task_count = self.task_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "execution",
            span_name = name,
            executor = self.executor,
            task_count = self.task_count,
        )
    }
}

/// Run completed successfully.
///
/// # Log Level
/// `debug!`
pub struct ExecutionCompleted<'a> {
    pub executor: &'a str,
    pub task_count: usize,
    pub duration: Duration,
}

impl Display for ExecutionCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} execution completed: {} tasks in {:?}",
            self.executor, self.task_count, self.duration
        )
    }
}

impl StructuredLog for ExecutionCompleted<'_> {
    fn log(&self) {
        tracing::debug!(
            executor = self.executor,
            task_count = self.task_count,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "execution_completed",
            span_name = name,
            executor = self.executor,
            task_count = self.task_count,
            duration = ?self.duration,
        )
    }
}

/// Run failed with a task error.
///
/// # Log Level
/// `warn!` - The error is returned to the caller, who decides how bad it is
pub struct ExecutionFailed<'a> {
    pub executor: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for ExecutionFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{} execution failed: {}", self.executor, self.error)
    }
}

impl StructuredLog for ExecutionFailed<'_> {
    fn log(&self) {
        tracing::warn!(
            executor = self.executor,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "execution_failed",
            span_name = name,
            executor = self.executor,
            error = %self.error,
        )
    }
}

/// Run stopped because the context was cancelled or timed out.
///
/// # Log Level
/// `info!`
pub struct ExecutionCancelled<'a> {
    pub executor: &'a str,
    pub reason: CancellationError,
    pub in_flight: usize,
}

impl Display for ExecutionCancelled<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} execution stopped ({}), {} tasks left running",
            self.executor, self.reason, self.in_flight
        )
    }
}

impl StructuredLog for ExecutionCancelled<'_> {
    fn log(&self) {
        tracing::info!(
            executor = self.executor,
            reason = %self.reason,
            in_flight = self.in_flight,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "execution_cancelled",
            span_name = name,
            executor = self.executor,
            reason = %self.reason,
            in_flight = self.in_flight,
        )
    }
}

/// Graph node handed to the runtime.
///
/// # Log Level
/// `trace!` - One per node per run
pub struct NodeDispatched<'a> {
    pub node: &'a str,
    pub in_flight: usize,
}

impl Display for NodeDispatched<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Dispatched node '{}' ({} in flight)", self.node, self.in_flight)
    }
}

impl StructuredLog for NodeDispatched<'_> {
    fn log(&self) {
        tracing::trace!(node = self.node, in_flight = self.in_flight, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::trace_span!("node", span_name = name, node = self.node)
    }
}

/// Graph node finished successfully and released its successors.
///
/// # Log Level
/// `trace!`
pub struct NodeCompleted<'a> {
    pub node: &'a str,
    pub released: usize,
    pub remaining: usize,
}

impl Display for NodeCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Node '{}' done, released {} nodes, {} remaining",
            self.node, self.released, self.remaining
        )
    }
}

impl StructuredLog for NodeCompleted<'_> {
    fn log(&self) {
        tracing::trace!(
            node = self.node,
            released = self.released,
            remaining = self.remaining,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::trace_span!(
            "node_completed",
            span_name = name,
            node = self.node,
            remaining = self.remaining,
        )
    }
}

/// A panic was caught at the task boundary.
///
/// # Log Level
/// `error!` - A panic is a bug in the task, not an expected failure
///
/// # Example
/// ```
/// use taskgraph::observability::messages::engine::TaskPanicked;
///
/// let msg = TaskPanicked {
///     task: "'compile' (BuildStep)",
///     message: "index out of bounds",
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct TaskPanicked<'a> {
    pub task: &'a str,
    pub message: &'a str,
}

impl Display for TaskPanicked<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Task {} panicked: {}", self.task, self.message)
    }
}

impl StructuredLog for TaskPanicked<'_> {
    fn log(&self) {
        tracing::error!(task = self.task, panic = self.message, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "task_panicked",
            span_name = name,
            task = self.task,
            panic = self.message,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_render() {
        let started = ExecutionStarted { executor: "serial", task_count: 3 };
        assert_eq!(started.to_string(), "Starting serial execution of 3 tasks");

        let cancelled = ExecutionCancelled {
            executor: "graph",
            reason: CancellationError::DeadlineExceeded,
            in_flight: 2,
        };
        assert_eq!(
            cancelled.to_string(),
            "graph execution stopped (execution deadline exceeded), 2 tasks left running"
        );
    }
}
