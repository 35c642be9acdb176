// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::BuildError;
use thiserror::Error;

/// Errors raised while turning a graph configuration file into a [`Graph`](crate::graph::Graph).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read graph config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse graph config: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A node names a task kind the registry does not know.
    #[error("node '{node}' uses unregistered task '{task}'")]
    UnknownTask { node: String, task: String },

    #[error(transparent)]
    Build(#[from] BuildError),
}
