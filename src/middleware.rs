// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Middleware: cross-cutting behaviour wrapped around every task.
//!
//! A [`MiddlewareChain`] composes by folding left to right, so the last layer
//! in the chain is the outermost wrapper. For a chain `[a, b]`, entering a
//! task runs `b` first, then `a`, then the task itself.
//!
//! ```rust
//! use std::sync::Arc;
//! use taskgraph::context::ExecutionContext;
//! use taskgraph::middleware::{middleware_fn, MiddlewareChain};
//!
//! let timing = middleware_fn(|ctx: ExecutionContext, next| async move {
//!     let started = std::time::Instant::now();
//!     let result = next(ctx).await;
//!     tracing::debug!(elapsed = ?started.elapsed(), "task finished");
//!     result
//! });
//!
//! let ctx = ExecutionContext::new().with_middleware(MiddlewareChain::new(vec![Arc::new(timing)]));
//! assert_eq!(ctx.middleware().len(), 1);
//! ```

use futures::future::FutureExt;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::context::ExecutionContext;
use crate::errors::TaskResult;
use crate::task::TaskFn;

pub trait Middleware: Send + Sync {
    /// Wrap `next` into a new task function.
    fn apply(&self, next: TaskFn) -> TaskFn;
}

/// Adapter turning an `async fn(ctx, next)` closure into [`Middleware`].
pub struct FnMiddleware<F>(Arc<F>);

/// Wrap `f` as middleware. `f` receives the context and the wrapped task
/// function and decides if, when and how to call it.
pub fn middleware_fn<F, Fut>(f: F) -> FnMiddleware<F>
where
    F: Fn(ExecutionContext, TaskFn) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = TaskResult> + Send + 'static,
{
    FnMiddleware(Arc::new(f))
}

impl<F, Fut> Middleware for FnMiddleware<F>
where
    F: Fn(ExecutionContext, TaskFn) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = TaskResult> + Send + 'static,
{
    fn apply(&self, next: TaskFn) -> TaskFn {
        let f = Arc::clone(&self.0);
        Arc::new(move |ctx: ExecutionContext| f(ctx, Arc::clone(&next)).boxed())
    }
}

/// Ordered list of middleware layers. Cloning is cheap.
#[derive(Clone, Default)]
pub struct MiddlewareChain(Arc<Vec<Arc<dyn Middleware>>>);

impl MiddlewareChain {
    pub fn new(layers: Vec<Arc<dyn Middleware>>) -> Self {
        Self(Arc::new(layers))
    }

    /// The chain with no layers; applying it is the identity.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A new chain with `layer` appended as the outermost wrapper.
    pub fn with<M: Middleware + 'static>(&self, layer: M) -> Self {
        let mut layers = (*self.0).clone();
        layers.push(Arc::new(layer));
        Self::new(layers)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Compose every layer around `f`, first layer innermost.
    pub fn apply(&self, f: TaskFn) -> TaskFn {
        self.0.iter().fold(f, |wrapped, layer| layer.apply(wrapped))
    }
}

impl fmt::Debug for MiddlewareChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiddlewareChain")
            .field("layers", &self.0.len())
            .finish()
    }
}
