// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Messages are organized by subsystem:
//!
//! * `engine` - executor lifecycle, task dispatch and panics
//! * `graph` - graph construction and validation

pub mod engine;
pub mod graph;

use tracing::Span;

/// A log message that knows its own level and fields.
pub trait StructuredLog {
    /// Emit the message as an event.
    fn log(&self);

    /// A span carrying the message's fields, for instrumenting the work it describes.
    fn span(&self, name: &str) -> Span;
}
