// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The unit-of-work abstraction.
//!
//! Anything the engine runs is a [`Task`]: a type with one async `execute`
//! operation. Closures become tasks through [`task_fn`], and the executors in
//! [`engine`](crate::engine) and [`graph`](crate::graph) are tasks themselves,
//! so composition shapes nest freely.
//!
//! ```rust
//! use taskgraph::context::ExecutionContext;
//! use taskgraph::task::{task_fn, Task};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let hello = task_fn(|_ctx: ExecutionContext| async {
//!     println!("hello");
//!     Ok(())
//! });
//!
//! hello.execute(&ExecutionContext::new()).await.unwrap();
//! # }
//! ```

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};
use std::future::Future;
use std::sync::Arc;

use crate::context::ExecutionContext;
use crate::errors::TaskResult;

/// Shared handle to a task, as stored by every executor.
pub type SharedTask = Arc<dyn Task>;

/// The function shape of a task, the form middleware wraps.
pub type TaskFn = Arc<dyn Fn(ExecutionContext) -> BoxFuture<'static, TaskResult> + Send + Sync>;

#[async_trait]
pub trait Task: Send + Sync {
    /// Run the work under `ctx`.
    ///
    /// Long-running bodies should watch [`ExecutionContext::cancelled`]; the
    /// engine never aborts a task that has already started.
    async fn execute(&self, ctx: &ExecutionContext) -> TaskResult;

    /// Human-readable identity used in panic reports and logs.
    fn describe(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }
}

#[async_trait]
impl<T: Task + ?Sized> Task for Arc<T> {
    async fn execute(&self, ctx: &ExecutionContext) -> TaskResult {
        (**self).execute(ctx).await
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Adapter turning a closure into a [`Task`].
pub struct FnTask<F> {
    f: F,
    name: Option<String>,
}

impl<F> FnTask<F> {
    /// Give the task a name for panic reports and logs.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Wrap `f` as a task.
pub fn task_fn<F, Fut>(f: F) -> FnTask<F>
where
    F: Fn(ExecutionContext) -> Fut + Send + Sync,
    Fut: Future<Output = TaskResult> + Send,
{
    FnTask { f, name: None }
}

#[async_trait]
impl<F, Fut> Task for FnTask<F>
where
    F: Fn(ExecutionContext) -> Fut + Send + Sync,
    Fut: Future<Output = TaskResult> + Send,
{
    async fn execute(&self, ctx: &ExecutionContext) -> TaskResult {
        (self.f)(ctx.clone()).await
    }

    fn describe(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => std::any::type_name::<F>().to_string(),
        }
    }
}

/// Box `task` into a [`SharedTask`].
pub fn shared<T: Task + 'static>(task: T) -> SharedTask {
    Arc::new(task)
}

/// The function form of `task`, ready to be wrapped by a middleware chain.
pub fn into_task_fn(task: SharedTask) -> TaskFn {
    Arc::new(move |ctx: ExecutionContext| {
        let task = Arc::clone(&task);
        async move { task.execute(&ctx).await }.boxed()
    })
}
