// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The boundary every executor calls tasks through.

use futures::FutureExt;
use std::any::Any;
use std::backtrace::Backtrace;
use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Once};

use crate::context::ExecutionContext;
use crate::errors::{ExecutionError, TaskResult};
use crate::middleware::MiddlewareChain;
use crate::observability::messages::engine::TaskPanicked;
use crate::observability::messages::StructuredLog;
use crate::task::{into_task_fn, SharedTask, TaskFn};

thread_local! {
    /// Stack of the most recent panic on this thread, taken by `invoke`.
    static PANIC_STACK: RefCell<Option<Backtrace>> = const { RefCell::new(None) };
}

static PANIC_HOOK: Once = Once::new();

/// Chain a hook in front of the current one that records the stack while the
/// panicking frames still exist.
fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            PANIC_STACK.with(|stack| *stack.borrow_mut() = Some(Backtrace::force_capture()));
            previous(info);
        }));
    });
}

/// The stack recorded by the hook, or the current one if the hook never ran.
fn take_panic_stack() -> Backtrace {
    PANIC_STACK
        .with(|stack| stack.borrow_mut().take())
        .unwrap_or_else(Backtrace::force_capture)
}

/// `task` in function form, wrapped by every layer of `chain`.
pub(crate) fn prepare(chain: &MiddlewareChain, task: &SharedTask) -> TaskFn {
    chain.apply(into_task_fn(Arc::clone(task)))
}

/// Run `f`, turning a panic anywhere inside it into [`ExecutionError::Panicked`].
///
/// `description` names the task in the resulting error.
pub(crate) async fn invoke(f: TaskFn, ctx: ExecutionContext, description: String) -> TaskResult {
    install_panic_hook();

    // The call itself sits inside the guarded future so panics raised while
    // building the future are caught too.
    let outcome = AssertUnwindSafe(async move { f(ctx).await })
        .catch_unwind()
        .await;

    match outcome {
        Ok(result) => result,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            TaskPanicked {
                task: &description,
                message: &message,
            }
            .log();
            Err(ExecutionError::Panicked {
                task: description,
                message,
                stack: Arc::new(take_panic_stack()),
            })
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{failing, panicking};

    #[tokio::test]
    async fn test_invoke_passes_result_through() {
        let task = failing("nope");
        let f = prepare(&MiddlewareChain::empty(), &task);

        let err = invoke(f, ExecutionContext::new(), task.describe()).await.unwrap_err();
        assert_eq!(err.to_string(), "nope");
    }

    #[tokio::test]
    async fn test_invoke_recovers_panic() {
        let task = panicking("exploded");
        let f = prepare(&MiddlewareChain::empty(), &task);

        match invoke(f, ExecutionContext::new(), task.describe()).await {
            Err(ExecutionError::Panicked { task, message, .. }) => {
                assert_eq!(task, "panicking");
                assert_eq!(message, "exploded");
            }
            other => panic!("expected a recovered panic, got {other:?}"),
        }
    }

    #[inline(never)]
    fn overheat_reactor_core() {
        panic!("core breach");
    }

    #[tokio::test]
    async fn test_panic_stack_names_panicking_function() {
        let task = crate::task::shared(crate::task::task_fn(|_ctx| async {
            overheat_reactor_core();
            Ok(())
        }));
        let f = prepare(&MiddlewareChain::empty(), &task);

        match invoke(f, ExecutionContext::new(), task.describe()).await {
            Err(ExecutionError::Panicked { stack, .. }) => {
                assert!(stack.to_string().contains("overheat_reactor_core"));
            }
            other => panic!("expected a recovered panic, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_invoke_recovers_panic_inside_middleware() {
        let chain = MiddlewareChain::empty().with(crate::middleware::middleware_fn(
            |_ctx, _next: TaskFn| async { panic!("layer broke") },
        ));
        let task = crate::test_support::noop();

        let err = invoke(prepare(&chain, &task), ExecutionContext::new(), task.describe())
            .await
            .unwrap_err();
        assert!(err.is_panic());
        assert!(err.to_string().contains("layer broke"));
    }
}
