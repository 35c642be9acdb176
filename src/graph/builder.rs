// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use indexmap::IndexMap;
use regex::Regex;

use super::{validation, Graph, Node};
use crate::errors::BuildError;
use crate::observability::messages::graph::{GraphBuildFailed, GraphBuilt, PatternMatchedNothing};
use crate::observability::messages::StructuredLog;
use crate::task::{shared, SharedTask, Task};

struct PendingNode {
    task: SharedTask,
    /// Nodes that start after this one.
    references: Vec<String>,
    /// Nodes this one starts after.
    prerequisites: Vec<String>,
}

/// Accumulates named tasks and their references, then validates them into a
/// [`Graph`].
///
/// References are resolved at [`build`](Self::build) time, so nodes may be
/// added in any order. A reference that is not the exact name of a node is
/// compiled as a regular expression and expands to every node whose name it
/// matches; matching nothing is allowed.
///
/// ```rust
/// use taskgraph::context::ExecutionContext;
/// use taskgraph::graph::GraphBuilder;
/// use taskgraph::task::{task_fn, Task};
///
/// # #[tokio::main]
/// # async fn main() {
/// let step = || task_fn(|_ctx: ExecutionContext| async { Ok(()) });
///
/// let mut builder = GraphBuilder::new();
/// builder
///     .add_node("checkout", step(), &["build-.*"])
///     .add_node("build-linux", step(), &["publish"])
///     .add_node("build-macos", step(), &["publish"])
///     .add_node("publish", step(), &[]);
///
/// let graph = builder.build().unwrap();
/// assert_eq!(graph.references("checkout"), Some(vec!["build-linux", "build-macos"]));
/// graph.execute(&ExecutionContext::new()).await.unwrap();
/// # }
/// ```
#[derive(Default)]
pub struct GraphBuilder {
    nodes: IndexMap<String, PendingNode>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `task` under `name`. Every node matched by `references` waits
    /// for this one to finish before it starts.
    ///
    /// Registering a name again replaces the earlier node.
    pub fn add_node<T: Task + 'static>(
        &mut self,
        name: impl Into<String>,
        task: T,
        references: &[&str],
    ) -> &mut Self {
        self.insert(name.into(), shared(task), to_strings(references), Vec::new())
    }

    /// Register `task` under `name`, starting only after every node matched by
    /// `prerequisites` has finished.
    ///
    /// `add_node_after("b", t, &["a"])` is equivalent to `"a"` listing `"b"`
    /// among its references.
    pub fn add_node_after<T: Task + 'static>(
        &mut self,
        name: impl Into<String>,
        task: T,
        prerequisites: &[&str],
    ) -> &mut Self {
        self.insert(name.into(), shared(task), Vec::new(), to_strings(prerequisites))
    }

    /// Register a node with both forms of reference at once.
    pub(crate) fn insert(
        &mut self,
        name: String,
        task: SharedTask,
        references: Vec<String>,
        prerequisites: Vec<String>,
    ) -> &mut Self {
        self.nodes.insert(
            name,
            PendingNode {
                task,
                references,
                prerequisites,
            },
        );
        self
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Resolve every reference and validate the result.
    ///
    /// The builder is left untouched, so calling `build` again yields an
    /// identical graph.
    pub fn build(&self) -> Result<Graph, BuildError> {
        match self.resolve_and_validate() {
            Ok(graph) => {
                GraphBuilt {
                    node_count: graph.len(),
                    edge_count: graph.edge_count(),
                }
                .log();
                Ok(graph)
            }
            Err(error) => {
                GraphBuildFailed { error: &error }.log();
                Err(error)
            }
        }
    }

    fn resolve_and_validate(&self) -> Result<Graph, BuildError> {
        let mut references = vec![Vec::new(); self.nodes.len()];
        for (index, (name, pending)) in self.nodes.iter().enumerate() {
            for reference in &pending.references {
                references[index].extend(self.resolve(name, reference)?);
            }
            for prerequisite in &pending.prerequisites {
                for source in self.resolve(name, prerequisite)? {
                    references[source].push(index);
                }
            }
        }

        let names: Vec<&str> = self.nodes.keys().map(String::as_str).collect();
        validation::validate(&names, &references)?;

        let nodes = self
            .nodes
            .iter()
            .map(|(name, pending)| Node {
                name: name.clone(),
                task: pending.task.clone(),
            })
            .collect();
        Ok(Graph::new(nodes, references))
    }

    /// Node indices `reference` stands for: the exact name if a node has it,
    /// otherwise every node the pattern matches, in registration order.
    fn resolve(&self, node: &str, reference: &str) -> Result<Vec<usize>, BuildError> {
        if let Some(index) = self.nodes.get_index_of(reference) {
            return Ok(vec![index]);
        }

        let pattern = Regex::new(reference).map_err(|source| BuildError::PatternCompileFailed {
            node: node.to_string(),
            pattern: reference.to_string(),
            source,
        })?;
        let matches: Vec<usize> = self
            .nodes
            .keys()
            .enumerate()
            .filter(|(_, name)| pattern.is_match(name))
            .map(|(index, _)| index)
            .collect();

        if matches.is_empty() {
            PatternMatchedNothing {
                node,
                pattern: reference,
            }
            .log();
        }
        Ok(matches)
    }
}

fn to_strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_string()).collect()
}
