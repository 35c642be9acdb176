// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! Log output from the engine goes through the message types in
//! [`messages`], each implementing `Display` for the human-readable line and
//! [`StructuredLog`](messages::StructuredLog) for the fields attached to it.
//!
//! ```rust
//! use taskgraph::observability::messages::StructuredLog;
//! use taskgraph::observability::messages::graph::GraphBuilt;
//!
//! GraphBuilt { node_count: 4, edge_count: 3 }.log();
//! ```

pub mod messages;

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Install a `fmt` subscriber filtered by `RUST_LOG`.
///
/// Safe to call more than once; only the first call installs anything.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
