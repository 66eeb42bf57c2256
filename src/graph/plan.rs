//! Frozen execution plan
//!
//! The plan holds the realized tasks in topological order. Tasks can be read
//! and disabled by the graph-ready pass, but never added, removed or
//! reordered.

use crate::graph::{FinalizeReport, Task};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct ExecutionPlan {
    tasks: Vec<Task>,
    index: HashMap<String, usize>,
    after_evaluate: FinalizeReport,
    graph_ready: FinalizeReport,
}

impl ExecutionPlan {
    /// Build a plan from tasks already in dependency order
    pub(crate) fn from_ordered(tasks: Vec<Task>) -> Self {
        let index = tasks
            .iter()
            .enumerate()
            .map(|(i, t)| (t.id().to_string(), i))
            .collect();

        ExecutionPlan {
            tasks,
            index,
            after_evaluate: FinalizeReport::default(),
            graph_ready: FinalizeReport::default(),
        }
    }

    pub(crate) fn with_reports(mut self, after_evaluate: FinalizeReport, graph_ready: FinalizeReport) -> Self {
        self.after_evaluate = after_evaluate;
        self.graph_ready = graph_ready;
        self
    }

    pub(crate) fn tasks_mut(&mut self) -> impl Iterator<Item = &mut Task> {
        self.tasks.iter_mut()
    }

    /// Tasks in execution order
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.index.get(id).map(|&i| &self.tasks[i])
    }

    /// Position of a task in the execution order
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Identifiers in execution order
    pub fn ids(&self) -> Vec<&str> {
        self.tasks.iter().map(Task::id).collect()
    }

    /// Identifiers of disabled tasks, in execution order
    pub fn disabled_ids(&self) -> Vec<&str> {
        self.tasks
            .iter()
            .filter(|t| !t.is_enabled())
            .map(Task::id)
            .collect()
    }

    /// What the configuration-time pass disabled
    pub fn after_evaluate_report(&self) -> &FinalizeReport {
        &self.after_evaluate
    }

    /// What the graph-ready pass disabled
    pub fn graph_ready_report(&self) -> &FinalizeReport {
        &self.graph_ready
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_lookup() {
        let mut strip = Task::new("strip", ["compile"]);
        strip.disable();
        let plan = ExecutionPlan::from_ordered(vec![Task::new("compile", Vec::<String>::new()), strip]);

        assert_eq!(plan.len(), 2);
        assert_eq!(plan.ids(), vec!["compile", "strip"]);
        assert_eq!(plan.position("strip"), Some(1));
        assert_eq!(plan.disabled_ids(), vec!["strip"]);
        assert!(plan.get("missing").is_none());
    }
}
