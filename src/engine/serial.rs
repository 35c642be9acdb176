// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::time::Instant;

use crate::context::ExecutionContext;
use crate::engine::{invoke, prepare};
use crate::errors::TaskResult;
use crate::observability::messages::engine::{
    ExecutionCancelled, ExecutionCompleted, ExecutionFailed, ExecutionStarted,
};
use crate::observability::messages::StructuredLog;
use crate::task::{SharedTask, Task};

const EXECUTOR: &str = "serial";

/// Runs its children one at a time, in order, stopping at the first failure.
///
/// The context is checked before each child; once it is cancelled no further
/// child starts. Everything runs on the caller's task.
///
/// ```rust
/// use taskgraph::context::ExecutionContext;
/// use taskgraph::serial;
/// use taskgraph::task::{task_fn, Task};
///
/// # #[tokio::main]
/// # async fn main() {
/// let steps = serial![
///     task_fn(|_ctx: ExecutionContext| async { Ok(()) }),
///     task_fn(|_ctx: ExecutionContext| async { Ok(()) }),
/// ];
/// assert!(steps.execute(&ExecutionContext::new()).await.is_ok());
/// # }
/// ```
pub struct Serial {
    children: Vec<SharedTask>,
}

impl Serial {
    pub fn new(children: Vec<SharedTask>) -> Self {
        Self { children }
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

#[async_trait]
impl Task for Serial {
    async fn execute(&self, ctx: &ExecutionContext) -> TaskResult {
        let started = Instant::now();
        ExecutionStarted {
            executor: EXECUTOR,
            task_count: self.children.len(),
        }
        .log();

        let chain = ctx.middleware();
        for child in &self.children {
            if let Some(reason) = ctx.err() {
                ExecutionCancelled {
                    executor: EXECUTOR,
                    reason,
                    in_flight: 0,
                }
                .log();
                return Err(reason.into());
            }

            if let Err(error) = invoke(prepare(chain, child), ctx.clone(), child.describe()).await {
                ExecutionFailed {
                    executor: EXECUTOR,
                    error: &error,
                }
                .log();
                return Err(error);
            }
        }

        ExecutionCompleted {
            executor: EXECUTOR,
            task_count: self.children.len(),
            duration: started.elapsed(),
        }
        .log();
        Ok(())
    }

    fn describe(&self) -> String {
        format!("serial of {} tasks", self.children.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{CancellationError, ExecutionError};
    use crate::test_support::{append, failing, joined, new_log, noop, panicking, stalled};
    use std::time::Duration;

    #[tokio::test]
    async fn test_empty() {
        let empty = Serial::new(vec![]);
        assert!(empty.is_empty());
        assert!(empty.execute(&ExecutionContext::new()).await.is_ok());
    }

    #[tokio::test]
    async fn test_runs_in_order() {
        let log = new_log();
        let serial = Serial::new(vec![append(&log, "1"), append(&log, "2"), append(&log, "3")]);
        assert_eq!(serial.len(), 3);
        assert!(!serial.is_empty());

        serial.execute(&ExecutionContext::new()).await.unwrap();

        assert_eq!(joined(&log), "1,2,3");
    }

    #[tokio::test]
    async fn test_error_stops_later_children() {
        let log = new_log();
        let serial = Serial::new(vec![failing("error"), append(&log, "2")]);

        let err = serial.execute(&ExecutionContext::new()).await.unwrap_err();

        assert_eq!(err.to_string(), "error");
        assert_eq!(joined(&log), "");
    }

    #[tokio::test]
    async fn test_panic_is_recovered() {
        let log = new_log();
        let serial = Serial::new(vec![append(&log, "1"), panicking("panic"), append(&log, "3")]);

        let err = serial.execute(&ExecutionContext::new()).await.unwrap_err();

        assert!(matches!(err, ExecutionError::Panicked { .. }));
        assert_eq!(joined(&log), "1");
    }

    #[tokio::test]
    async fn test_cancelled_context_starts_nothing() {
        let (ctx, cancel) = ExecutionContext::new().with_cancel();
        cancel.cancel();
        let serial = Serial::new(vec![stalled()]);

        let result = tokio::time::timeout(Duration::from_secs(1), serial.execute(&ctx))
            .await
            .expect("serial should return promptly");

        assert!(matches!(
            result,
            Err(ExecutionError::Cancelled(CancellationError::Cancelled))
        ));
    }

    #[tokio::test]
    async fn test_cancellation_between_children() {
        let log = new_log();
        let (ctx, cancel) = ExecutionContext::new().with_cancel();
        let cancel_after_first = crate::task::shared(crate::task::task_fn(move |_ctx| {
            let cancel = cancel.clone();
            async move {
                cancel.cancel();
                Ok(())
            }
        }));
        let serial = Serial::new(vec![cancel_after_first, append(&log, "never"), noop()]);

        let err = serial.execute(&ctx).await.unwrap_err();

        assert!(err.is_cancelled());
        assert_eq!(joined(&log), "");
    }
}
