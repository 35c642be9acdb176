// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::time::Instant;
use tokio::sync::mpsc;

use crate::context::ExecutionContext;
use crate::engine::{invoke, prepare};
use crate::errors::TaskResult;
use crate::observability::messages::engine::{
    ExecutionCancelled, ExecutionCompleted, ExecutionFailed, ExecutionStarted,
};
use crate::observability::messages::StructuredLog;
use crate::task::{SharedTask, Task};

const EXECUTOR: &str = "parallel";

/// Runs every child concurrently, one tokio task each, and waits for all of
/// them.
///
/// The first failure observed ends the run. Cancellation ends it too, without
/// waiting for children still running; those are left to finish on their own
/// and their results are dropped.
pub struct Parallel {
    children: Vec<SharedTask>,
}

impl Parallel {
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
impl Task for Parallel {
    async fn execute(&self, ctx: &ExecutionContext) -> TaskResult {
        if self.children.is_empty() {
            return Ok(());
        }
        if let Some(reason) = ctx.err() {
            ExecutionCancelled {
                executor: EXECUTOR,
                reason,
                in_flight: 0,
            }
            .log();
            return Err(reason.into());
        }

        let started = Instant::now();
        ExecutionStarted {
            executor: EXECUTOR,
            task_count: self.children.len(),
        }
        .log();

        let chain = ctx.middleware();
        let (tx, mut rx) = mpsc::unbounded_channel::<TaskResult>();
        for child in &self.children {
            let f = prepare(chain, child);
            let tx = tx.clone();
            let child_ctx = ctx.clone();
            let description = child.describe();
            tokio::spawn(async move {
                // The receiver is gone once the run has ended early.
                let _ = tx.send(invoke(f, child_ctx, description).await);
            });
        }
        drop(tx);

        let mut remaining = self.children.len();
        while remaining > 0 {
            tokio::select! {
                biased;
                reason = ctx.cancelled() => {
                    ExecutionCancelled {
                        executor: EXECUTOR,
                        reason,
                        in_flight: remaining,
                    }
                    .log();
                    return Err(reason.into());
                }
                Some(result) = rx.recv() => {
                    remaining -= 1;
                    if let Err(error) = result {
                        ExecutionFailed {
                            executor: EXECUTOR,
                            error: &error,
                        }
                        .log();
                        return Err(error);
                    }
                }
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
        format!("parallel of {} tasks", self.children.len())
    }
}
