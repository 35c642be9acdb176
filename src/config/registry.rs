// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::fmt;

use crate::task::{shared, SharedTask, Task};

/// Task implementations addressable by kind from a graph configuration.
///
/// Several nodes may name the same kind; they then share one task instance.
#[derive(Clone, Default)]
pub struct TaskRegistry {
    tasks: HashMap<String, SharedTask>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `task` as `kind`, replacing any earlier registration.
    pub fn register<T: Task + 'static>(&mut self, kind: impl Into<String>, task: T) -> &mut Self {
        self.tasks.insert(kind.into(), shared(task));
        self
    }

    pub fn get(&self, kind: &str) -> Option<&SharedTask> {
        self.tasks.get(kind)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.tasks.contains_key(kind)
    }

    /// Registered kinds, sorted.
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.tasks.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl fmt::Debug for TaskRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.kinds()
                    .into_iter()
                    .filter_map(|kind| self.tasks.get(kind).map(|task| (kind, task.describe()))),
            )
            .finish()
    }
}
