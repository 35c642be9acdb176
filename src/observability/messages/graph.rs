// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for graph construction and validation.

use crate::errors::BuildError;
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Graph validated and built.
///
/// # Log Level
/// `debug!`
pub struct GraphBuilt {
    pub node_count: usize,
    pub edge_count: usize,
}

impl Display for GraphBuilt {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Built graph with {} nodes and {} references",
            self.node_count, self.edge_count
        )
    }
}

impl StructuredLog for GraphBuilt {
    fn log(&self) {
        tracing::debug!(
            node_count = self.node_count,
            edge_count = self.edge_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "graph_built",
            span_name = name,
            node_count = self.node_count,
            edge_count = self.edge_count,
        )
    }
}

/// Graph rejected by the builder.
///
/// # Log Level
/// `warn!`
pub struct GraphBuildFailed<'a> {
    pub error: &'a BuildError,
}

impl Display for GraphBuildFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Graph build failed: {}", self.error)
    }
}

impl StructuredLog for GraphBuildFailed<'_> {
    fn log(&self) {
        tracing::warn!(error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("graph_build_failed", span_name = name, error = %self.error)
    }
}

/// A reference was treated as a pattern and matched no node.
///
/// Legal, but usually a typo in a node name.
///
/// # Log Level
/// `debug!`
pub struct PatternMatchedNothing<'a> {
    pub node: &'a str,
    pub pattern: &'a str,
}

impl Display for PatternMatchedNothing<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Reference '{}' of node '{}' matched no node",
            self.pattern, self.node
        )
    }
}

impl StructuredLog for PatternMatchedNothing<'_> {
    fn log(&self) {
        tracing::debug!(node = self.node, pattern = self.pattern, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "pattern_matched_nothing",
            span_name = name,
            node = self.node,
            pattern = self.pattern,
        )
    }
}
