// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Errors raised while building a [`Graph`](crate::graph::Graph).
///
/// A graph that fails any of these checks is never constructed, so the
/// scheduler only ever sees acyclic, fully resolved structures.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Following references from some node leads back to that node.
    #[error("cycle detected in graph: {}", .cycle.join(" -> "))]
    CycleDetected {
        /// The nodes on the cycle, first node repeated at the end
        cycle: Vec<String>,
    },

    /// A node resolves to the same referenced node more than once.
    #[error("node '{node}' references '{reference}' more than once")]
    DuplicateReference { node: String, reference: String },

    /// A resolved reference index points outside the node table.
    #[error("node '{node}' references unknown node index {index}")]
    UnknownReference { node: String, index: usize },

    /// A reference matched no node name and is not a valid pattern either.
    #[error("reference '{pattern}' of node '{node}' is not a valid pattern: {source}")]
    PatternCompileFailed {
        node: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
