// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use super::TaskRegistry;
use crate::context::ExecutionContext;
use crate::errors::ConfigError;
use crate::graph::{Graph, GraphBuilder};

/// A graph described as data.
///
/// # Fields
/// * `timeout_ms` - Deadline for a whole run, applied by [`GraphConfig::context`]
/// * `nodes` - Node definitions in registration order
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct GraphConfig {
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    pub nodes: Vec<NodeConfig>,
}

/// One node of a [`GraphConfig`].
///
/// # Fields
/// * `name` - Unique node name
/// * `task` - Task kind, looked up in the [`TaskRegistry`]
/// * `references` - Names or patterns of nodes that start after this one
/// * `after` - Names or patterns of nodes this one starts after
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct NodeConfig {
    pub name: String,
    pub task: String,
    #[serde(default)]
    pub references: Vec<String>,
    #[serde(default)]
    pub after: Vec<String>,
}

impl GraphConfig {
    /// Parse a configuration from YAML text.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Bind every node to its registered task and build the graph.
    pub fn build_graph(&self, registry: &TaskRegistry) -> Result<Graph, ConfigError> {
        let mut builder = GraphBuilder::new();
        for node in &self.nodes {
            let task = registry
                .get(&node.task)
                .ok_or_else(|| ConfigError::UnknownTask {
                    node: node.name.clone(),
                    task: node.task.clone(),
                })?;
            builder.insert(
                node.name.clone(),
                task.clone(),
                node.references.clone(),
                node.after.clone(),
            );
        }
        Ok(builder.build()?)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// A fresh context carrying the configured deadline, if any. The deadline
    /// starts counting now.
    pub fn context(&self) -> ExecutionContext {
        let ctx = ExecutionContext::new();
        match self.timeout() {
            Some(timeout) => ctx.with_timeout(timeout),
            None => ctx,
        }
    }
}

/// Load a graph configuration from a YAML file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<GraphConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    GraphConfig::from_yaml(&content)
}

/// Load a YAML file and build its graph against `registry`.
pub fn load_graph<P: AsRef<Path>>(path: P, registry: &TaskRegistry) -> Result<Graph, ConfigError> {
    load_config(path)?.build_graph(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{BuildError, CancellationError, ExecutionError};
    use crate::task::Task;
    use crate::test_support::{append, joined, new_log, noop, stalled};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_defaults() {
        let config = GraphConfig::from_yaml(
            r#"
nodes:
  - name: only
    task: noop
"#,
        )
        .unwrap();

        assert_eq!(config.timeout_ms, None);
        assert_eq!(config.nodes.len(), 1);
        assert!(config.nodes[0].references.is_empty());
        assert!(config.nodes[0].after.is_empty());
    }

    #[test]
    fn test_parse_error() {
        let result = GraphConfig::from_yaml("nodes: [");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = load_config("/nonexistent/graph.yaml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_unknown_task() {
        let config = GraphConfig::from_yaml(
            r#"
nodes:
  - name: fetch
    task: http_fetch
"#,
        )
        .unwrap();

        match config.build_graph(&TaskRegistry::new()) {
            Err(ConfigError::UnknownTask { node, task }) => {
                assert_eq!(node, "fetch");
                assert_eq!(task, "http_fetch");
            }
            other => panic!("expected an unknown task, got {other:?}"),
        }
    }

    #[test]
    fn test_build_error_surfaces() {
        let config = GraphConfig::from_yaml(
            r#"
nodes:
  - name: a
    task: noop
    references: [b]
  - name: b
    task: noop
    references: [a]
"#,
        )
        .unwrap();
        let mut registry = TaskRegistry::new();
        registry.register("noop", noop());

        assert!(matches!(
            config.build_graph(&registry),
            Err(ConfigError::Build(BuildError::CycleDetected { .. }))
        ));
    }

    #[test]
    fn test_matches_graph_built_in_code() {
        let file = write_config(
            r#"
nodes:
  - name: fetch
    task: noop
    references: ["parse-.*"]
  - name: parse-json
    task: noop
  - name: parse-yaml
    task: noop
  - name: store
    task: noop
    after: [parse-json, parse-yaml]
"#,
        );
        let mut registry = TaskRegistry::new();
        registry.register("noop", noop());
        let loaded = load_graph(file.path(), &registry).unwrap();

        let mut builder = GraphBuilder::new();
        builder
            .add_node("fetch", noop(), &["parse-.*"])
            .add_node("parse-json", noop(), &["store"])
            .add_node("parse-yaml", noop(), &["store"])
            .add_node("store", noop(), &[]);
        let coded = builder.build().unwrap();

        assert_eq!(format!("{loaded:?}"), format!("{coded:?}"));
    }

    #[tokio::test]
    async fn test_loaded_graph_runs_in_order() {
        let log = new_log();
        let file = write_config(
            r#"
nodes:
  - name: last
    task: third
    after: [middle]
  - name: middle
    task: second
  - name: first
    task: first
    references: [middle]
"#,
        );
        let mut registry = TaskRegistry::new();
        registry
            .register("first", append(&log, "first"))
            .register("second", append(&log, "second"))
            .register("third", append(&log, "third"));

        let config = load_config(file.path()).unwrap();
        let graph = config.build_graph(&registry).unwrap();
        graph.execute(&config.context()).await.unwrap();

        assert_eq!(joined(&log), "first,second,third");
    }

    #[tokio::test]
    async fn test_timeout_becomes_deadline() {
        let config = GraphConfig::from_yaml(
            r#"
timeout_ms: 20
nodes:
  - name: wait
    task: stalled
"#,
        )
        .unwrap();
        let mut registry = TaskRegistry::new();
        registry.register("stalled", stalled());

        let ctx = config.context();
        assert!(ctx.deadline().is_some());

        let graph = config.build_graph(&registry).unwrap();
        let result = graph.execute(&ctx).await;
        assert!(matches!(
            result,
            Err(ExecutionError::Cancelled(CancellationError::DeadlineExceeded))
        ));
    }
}
