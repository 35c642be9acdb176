// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Dependency-graph execution.
//!
//! A [`Graph`] runs named tasks under precedence constraints, dispatching
//! every node whose predecessors have all finished. Graphs are only made by
//! [`GraphBuilder::build`], which rejects cycles and malformed references.
//!
//! # Reference direction
//!
//! A node's references are its **successors**: a node named in `a`'s
//! reference list does not start until `a` has completed.
//!
//! ```text
//! add_node("1", .., &["2"])      1 ──▶ 2 ──▶ 3 ──▶ 4
//! add_node("2", .., &["3"])
//! add_node("3", .., &["4"])      "1" runs first, "4" last
//! add_node("4", .., &[])
//! ```
//!
//! [`GraphBuilder::add_node_after`] states the same relation from the other
//! end, listing a node's prerequisites instead.
//!
//! # Execution
//!
//! Each run computes a countdown per node: the number of nodes referencing
//! it. Nodes at zero are dispatched immediately, each on its own tokio task;
//! every successful completion decrements the countdown of the nodes it
//! references and dispatches those reaching zero. The run ends at the first
//! failure, at cancellation, or once every node is done.

mod builder;
mod validation;

pub use builder::GraphBuilder;

use async_trait::async_trait;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::Instrument;

use crate::context::ExecutionContext;
use crate::engine::{invoke, prepare};
use crate::errors::TaskResult;
use crate::middleware::MiddlewareChain;
use crate::observability::messages::engine::{
    ExecutionCancelled, ExecutionCompleted, ExecutionFailed, ExecutionStarted, NodeCompleted,
    NodeDispatched,
};
use crate::observability::messages::StructuredLog;
use crate::task::{SharedTask, Task};

const EXECUTOR: &str = "graph";

struct Node {
    name: String,
    task: SharedTask,
}

/// Per-run lifecycle of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeState {
    /// Waiting on at least one referencing node.
    Blocked,
    /// Eligible, not yet handed to the runtime.
    Ready,
    Running,
    Done,
}

/// An immutable, validated task graph. Cloning is cheap and every clone can
/// be run any number of times, concurrently or not.
#[derive(Clone)]
pub struct Graph {
    nodes: Arc<[Node]>,
    references: Arc<[Vec<usize>]>,
}

impl Graph {
    fn new(nodes: Vec<Node>, references: Vec<Vec<usize>>) -> Self {
        Self {
            nodes: nodes.into(),
            references: references.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node names in registration order.
    pub fn node_names(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|node| node.name.as_str())
    }

    /// Resolved references of `name`, i.e. the nodes that wait for it.
    pub fn references(&self, name: &str) -> Option<Vec<&str>> {
        let index = self.nodes.iter().position(|node| node.name == name)?;
        Some(
            self.references[index]
                .iter()
                .map(|&target| self.nodes[target].name.as_str())
                .collect(),
        )
    }

    pub fn edge_count(&self) -> usize {
        self.references.iter().map(Vec::len).sum()
    }

    /// How many nodes must finish before each node may start.
    fn countdowns(&self) -> Vec<usize> {
        let mut countdowns = vec![0; self.nodes.len()];
        for targets in self.references.iter() {
            for &target in targets {
                countdowns[target] += 1;
            }
        }
        countdowns
    }

    fn dispatch(
        &self,
        index: usize,
        chain: &MiddlewareChain,
        ctx: &ExecutionContext,
        completions: &mpsc::UnboundedSender<(usize, TaskResult)>,
    ) {
        let node = &self.nodes[index];
        let f = prepare(chain, &node.task);
        let description = format!("'{}' ({})", node.name, node.task.describe());
        let node_ctx = ctx.clone();
        let completions = completions.clone();
        tokio::spawn(async move {
            // The receiver is gone once the run has ended early.
            let _ = completions.send((index, invoke(f, node_ctx, description).await));
        });
    }

    async fn run(&self, ctx: &ExecutionContext) -> TaskResult {
        if let Some(reason) = ctx.err() {
            ExecutionCancelled {
                executor: EXECUTOR,
                reason,
                in_flight: 0,
            }
            .log();
            return Err(reason.into());
        }

        let started = Instant::now();
        let chain = ctx.middleware();
        let mut countdowns = self.countdowns();
        let mut states: Vec<NodeState> = countdowns
            .iter()
            .map(|&countdown| if countdown == 0 { NodeState::Ready } else { NodeState::Blocked })
            .collect();
        let mut ready: VecDeque<usize> = states
            .iter()
            .enumerate()
            .filter(|(_, state)| **state == NodeState::Ready)
            .map(|(index, _)| index)
            .collect();

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut in_flight = 0;
        let mut done = 0;

        loop {
            while let Some(index) = ready.pop_front() {
                states[index] = NodeState::Running;
                in_flight += 1;
                self.dispatch(index, chain, ctx, &tx);
                NodeDispatched {
                    node: &self.nodes[index].name,
                    in_flight,
                }
                .log();
            }

            let (index, result) = tokio::select! {
                biased;
                reason = ctx.cancelled() => {
                    ExecutionCancelled {
                        executor: EXECUTOR,
                        reason,
                        in_flight,
                    }
                    .log();
                    return Err(reason.into());
                }
                Some(completion) = rx.recv() => completion,
            };
            in_flight -= 1;

            if let Err(error) = result {
                ExecutionFailed {
                    executor: EXECUTOR,
                    error: &error,
                }
                .log();
                return Err(error);
            }

            states[index] = NodeState::Done;
            done += 1;
            let mut released = 0;
            for &target in &self.references[index] {
                countdowns[target] -= 1;
                if countdowns[target] == 0 {
                    debug_assert_eq!(states[target], NodeState::Blocked);
                    states[target] = NodeState::Ready;
                    ready.push_back(target);
                    released += 1;
                }
            }
            NodeCompleted {
                node: &self.nodes[index].name,
                released,
                remaining: self.nodes.len() - done,
            }
            .log();

            if done == self.nodes.len() {
                ExecutionCompleted {
                    executor: EXECUTOR,
                    task_count: self.nodes.len(),
                    duration: started.elapsed(),
                }
                .log();
                return Ok(());
            }
        }
    }
}

#[async_trait]
impl Task for Graph {
    async fn execute(&self, ctx: &ExecutionContext) -> TaskResult {
        if self.nodes.is_empty() {
            return Ok(());
        }
        let started = ExecutionStarted {
            executor: EXECUTOR,
            task_count: self.nodes.len(),
        };
        started.log();
        let span = started.span("graph_run");
        self.run(ctx).instrument(span).await
    }

    fn describe(&self) -> String {
        format!("graph of {} nodes", self.nodes.len())
    }
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (node, targets) in self.nodes.iter().zip(self.references.iter()) {
            let names: Vec<&str> = targets
                .iter()
                .map(|&target| self.nodes[target].name.as_str())
                .collect();
            map.entry(&node.name, &names);
        }
        map.finish()
    }
}
