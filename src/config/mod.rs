// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Declarative graph configuration.
//!
//! A YAML file names each node and the task kind it runs; the kinds are looked
//! up in a [`TaskRegistry`] populated by the host program.
//!
//! ```yaml
//! timeout_ms: 5000
//! nodes:
//!   - name: fetch
//!     task: http_fetch
//!     references: [parse]
//!   - name: parse
//!     task: parser
//!   - name: report
//!     task: reporter
//!     after: [parse]
//! ```

mod loader;
mod registry;

pub use loader::{load_config, load_graph, GraphConfig, NodeConfig};
pub use registry::TaskRegistry;
