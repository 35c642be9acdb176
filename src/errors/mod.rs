// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod execution;
mod graph;

pub use config::ConfigError;
pub use execution::{CancellationError, ExecutionError, TaskResult};
pub use graph::BuildError;
