//! Build graph
//!
//! This module holds the task registry, name predicates, override rules and
//! the two override passes. A [`Graph`] is configured first, then consumed by
//! [`Graph::finalize`] which produces a frozen [`ExecutionPlan`]:
//!
//! 1. [`GraphFinalizer`] applies the rules to every registered task.
//! 2. The resolver computes the execution order, materializing tasks from
//!    task rules as dependencies require them.
//! 3. [`ExecutionGraphHook`] applies the same rules to the realized order.

pub mod finalize;
pub mod hook;
pub mod plan;
pub mod predicate;
pub mod registry;
pub mod resolve;
pub mod rule;
pub mod task;
pub mod task_rule;

// Re-export main types
pub use finalize::*;
pub use hook::*;
pub use plan::*;
pub use predicate::{matches, Predicate, PredicateFn};
pub use registry::*;
pub use resolve::*;
pub use rule::*;
pub use task::*;
pub use task_rule::*;

use crate::error::{GraphResult, RegistryResult};

/// Build state during configuration
#[derive(Debug, Default)]
pub struct Graph {
    registry: TaskRegistry,
    task_rules: Vec<TaskRule>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a task with its dependencies
    pub fn register<I, S>(&mut self, id: impl Into<String>, dependencies: I) -> RegistryResult<&mut Task>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.registry.register(id, dependencies)
    }

    /// Register an already-built task
    pub fn register_task(&mut self, task: Task) -> RegistryResult<&mut Task> {
        self.registry.insert(task)
    }

    /// Add a rule that materializes tasks during resolution
    pub fn add_task_rule(&mut self, rule: TaskRule) {
        self.task_rules.push(rule);
    }

    pub fn registry(&self) -> &TaskRegistry {
        &self.registry
    }

    pub fn task_rules(&self) -> &[TaskRule] {
        &self.task_rules
    }

    /// Run both override passes around resolution and freeze the result
    ///
    /// `targets` selects the roots; when empty every registered task is a
    /// root. Consuming the graph guarantees each pass runs exactly once.
    pub fn finalize(self, rules: &RuleSet, targets: &[String]) -> GraphResult<ExecutionPlan> {
        let Graph {
            mut registry,
            task_rules,
        } = self;

        let after_evaluate = GraphFinalizer::apply(rules, &mut registry);
        let order = resolve(&mut registry, &task_rules, targets)?;

        let mut plan = ExecutionPlan::from_ordered(registry.take_ordered(&order));
        let graph_ready = ExecutionGraphHook::apply(rules, &mut plan);

        Ok(plan.with_reports(after_evaluate, graph_ready))
    }
}
