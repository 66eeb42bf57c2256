//! Task rules
//!
//! A task rule materializes tasks on demand: when resolution meets a
//! dependency that nobody registered and whose name starts with the rule's
//! prefix, the rule builds it. `${name}` expands to the full task name and
//! `${suffix}` to the part after the prefix.

use crate::error::InterpolationResult;
use crate::graph::task::{Action, Command, Origin, Task};
use crate::runner::{interpolate, interpolate_list};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct TaskRule {
    prefix: String,
    pub description: Option<String>,
    pub dependencies: Vec<String>,
    pub commands: Vec<Command>,
}

impl TaskRule {
    pub fn new(prefix: impl Into<String>) -> Self {
        TaskRule {
            prefix: prefix.into(),
            description: None,
            dependencies: Vec::new(),
            commands: Vec::new(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_commands(mut self, commands: Vec<Command>) -> Self {
        self.commands = commands;
        self
    }

    /// Whether this rule can build a task with the given name
    ///
    /// The name must be longer than the prefix.
    pub fn applies_to(&self, task_id: &str) -> bool {
        task_id.len() > self.prefix.len() && task_id.starts_with(&self.prefix)
    }

    /// Build the task for `task_id`
    ///
    /// Fails if a template expands without end, e.g. when `task_id` itself
    /// contains `${suffix}`.
    pub fn materialize(&self, task_id: &str) -> InterpolationResult<Task> {
        let mut vars = HashMap::new();
        vars.insert("name".to_string(), task_id.to_string());
        vars.insert(
            "suffix".to_string(),
            task_id[self.prefix.len().min(task_id.len())..].to_string(),
        );

        let dependencies = interpolate_list(&self.dependencies, &vars)?;

        let action = if self.commands.is_empty() {
            Action::Nothing
        } else {
            Action::Commands(
                self.commands
                    .iter()
                    .map(|c| c.interpolated(&vars))
                    .collect::<InterpolationResult<Vec<_>>>()?,
            )
        };

        let mut task = Task::new(task_id, dependencies)
            .with_action(action)
            .with_origin(Origin::Rule);

        if let Some(desc) = &self.description {
            task = task.with_description(interpolate(desc, &vars)?);
        }

        Ok(task)
    }
}
