// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Composite executors.
//!
//! [`Serial`] and [`Parallel`] run fixed lists of tasks; the dependency-graph
//! executor lives in [`graph`](crate::graph). All three read the middleware
//! chain from the context once per run, wrap each child with it, and invoke
//! the result through the same panic boundary.

mod invoke;
pub mod parallel;
pub mod serial;


pub(crate) use invoke::{invoke, prepare};
pub use parallel::Parallel;
pub use serial::Serial;
