// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Composable async task execution: run units of work serially, in parallel,
//! or as a dependency graph, with middleware wrapped around every invocation.

pub mod config;        // YAML graphs + task registry
pub mod context;       // cancellation, deadlines, middleware
pub mod engine;        // serial and parallel executors
pub mod errors;        // error handling
pub mod graph;         // dependency graph builder + executor
pub mod middleware;
pub mod observability;
pub mod task;          // the unit-of-work abstraction
pub mod utils;

#[cfg(test)]
mod test_support;

pub use context::ExecutionContext;
pub use engine::{Parallel, Serial};
pub use errors::{BuildError, CancellationError, ExecutionError, TaskResult};
pub use graph::{Graph, GraphBuilder};
pub use middleware::{Middleware, MiddlewareChain};
pub use task::{SharedTask, Task};

/// Build a [`Serial`] from any number of tasks.
#[macro_export]
macro_rules! serial {
    ($($task:expr),* $(,)?) => {
        $crate::engine::Serial::new(vec![$($crate::task::shared($task)),*])
    };
}

/// Build a [`Parallel`] from any number of tasks.
#[macro_export]
macro_rules! parallel {
    ($($task:expr),* $(,)?) => {
        $crate::engine::Parallel::new(vec![$($crate::task::shared($task)),*])
    };
}
