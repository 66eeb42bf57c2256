//! Task registry
//!
//! Stores declared tasks in registration order.

use crate::error::{RegistryError, RegistryResult};
use crate::graph::{Predicate, Task};
use std::collections::HashMap;

/// Registered tasks, indexed by identifier
#[derive(Debug, Default)]
pub struct TaskRegistry {
    tasks: Vec<Task>,
    index: HashMap<String, usize>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new task with its dependencies
    pub fn register<I, S>(&mut self, id: impl Into<String>, dependencies: I) -> RegistryResult<&mut Task>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(Task::new(id, dependencies))
    }

    /// Register an already-built task
    pub fn insert(&mut self, task: Task) -> RegistryResult<&mut Task> {
        if task.id().is_empty() {
            return Err(RegistryError::EmptyIdentifier);
        }
        if self.index.contains_key(task.id()) {
            return Err(RegistryError::DuplicateTask(task.id().to_string()));
        }

        let position = self.tasks.len();
        self.index.insert(task.id().to_string(), position);
        self.tasks.push(task);
        Ok(&mut self.tasks[position])
    }

    /// All tasks matching the predicate, in registration order
    pub fn find(&self, predicate: &Predicate) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| predicate.matches(t.id()))
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.index.get(id).map(|&i| &self.tasks[i])
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.index.get(id).map(|&i| &mut self.tasks[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Tasks in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Task> {
        self.tasks.iter_mut()
    }

    /// Identifiers in registration order
    pub fn ids(&self) -> Vec<String> {
        self.tasks.iter().map(|t| t.id().to_string()).collect()
    }

    /// Consume the registry, keeping only `order`'s tasks in that order
    pub(crate) fn take_ordered(self, order: &[String]) -> Vec<Task> {
        let mut slots: Vec<Option<Task>> = self.tasks.into_iter().map(Some).collect();
        order
            .iter()
            .filter_map(|id| self.index.get(id).and_then(|&i| slots[i].take()))
            .collect()
    }
}
