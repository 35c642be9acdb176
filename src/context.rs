// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The ambient state every task runs under.
//!
//! An [`ExecutionContext`] carries the cancellation signal (a
//! [`CancellationToken`] plus an optional deadline), the middleware chain the
//! executors apply to their children, and typed values supplied by the caller.
//! Every `with_*` method derives a new context and leaves its parent
//! untouched, so a context can be shared freely between concurrent branches.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

use crate::errors::CancellationError;
use crate::middleware::MiddlewareChain;

type Values = HashMap<TypeId, Arc<dyn Any + Send + Sync>>;

#[derive(Clone, Default)]
pub struct ExecutionContext {
    token: CancellationToken,
    deadline: Option<Instant>,
    middleware: MiddlewareChain,
    values: Arc<Values>,
}

impl ExecutionContext {
    /// A fresh context: never cancelled, no deadline, no middleware.
    pub fn new() -> Self {
        Self::default()
    }

    /// A context cancelled whenever `token` is.
    pub fn from_token(token: CancellationToken) -> Self {
        Self {
            token,
            ..Self::default()
        }
    }

    /// Attach `chain` as the middleware applied to every task run under the
    /// derived context.
    pub fn with_middleware(&self, chain: MiddlewareChain) -> Self {
        Self {
            middleware: chain,
            ..self.clone()
        }
    }

    /// The attached middleware chain, empty when none was attached.
    pub fn middleware(&self) -> &MiddlewareChain {
        &self.middleware
    }

    /// Derive a context that expires at `deadline`, or at the parent's
    /// deadline if that is earlier.
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(current) => current.min(deadline),
            None => deadline,
        };
        Self {
            deadline: Some(deadline),
            ..self.clone()
        }
    }

    pub fn with_timeout(&self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Derive a context that can be cancelled independently of its parent.
    ///
    /// Cancelling the returned token cancels the derived context only;
    /// cancelling the parent still cancels both.
    pub fn with_cancel(&self) -> (Self, CancellationToken) {
        let token = self.token.child_token();
        let ctx = Self {
            token: token.clone(),
            ..self.clone()
        };
        (ctx, token)
    }

    /// Attach a caller value, keyed by its type. A later value of the same
    /// type shadows the earlier one in the derived context.
    pub fn with_value<T: Any + Send + Sync>(&self, value: T) -> Self {
        let mut values = (*self.values).clone();
        values.insert(TypeId::of::<T>(), Arc::new(value));
        Self {
            values: Arc::new(values),
            ..self.clone()
        }
    }

    pub fn value<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.values
            .get(&TypeId::of::<T>())
            .and_then(|value| value.downcast_ref::<T>())
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Why this context is done, or `None` while it still accepts work.
    pub fn err(&self) -> Option<CancellationError> {
        if self.token.is_cancelled() {
            return Some(CancellationError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(CancellationError::DeadlineExceeded),
            _ => None,
        }
    }

    /// Resolves once the context is cancelled or its deadline passes.
    pub async fn cancelled(&self) -> CancellationError {
        match self.deadline {
            Some(deadline) => tokio::select! {
                biased;
                _ = self.token.cancelled() => CancellationError::Cancelled,
                _ = tokio::time::sleep_until(deadline) => CancellationError::DeadlineExceeded,
            },
            None => {
                self.token.cancelled().await;
                CancellationError::Cancelled
            }
        }
    }
}

impl fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("cancelled", &self.token.is_cancelled())
            .field("deadline", &self.deadline)
            .field("middleware", &self.middleware)
            .field("values", &self.values.len())
            .finish()
    }
}
