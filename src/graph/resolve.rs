//! Execution order resolution
//!
//! Depth-first walk from the requested targets, visiting dependencies in
//! declared order, so the same registration order always yields the same
//! execution order.

use crate::error::{GraphError, GraphResult};
use crate::graph::{TaskRegistry, TaskRule};
use std::collections::HashSet;

/// Compute the execution order for `targets`
///
/// With no targets every registered task is a root, in registration order.
/// Dependencies that are not registered are materialized from the first task
/// rule that applies to them and added to the registry.
pub fn resolve(
    registry: &mut TaskRegistry,
    task_rules: &[TaskRule],
    targets: &[String],
) -> GraphResult<Vec<String>> {
    let roots = if targets.is_empty() {
        registry.ids()
    } else {
        targets.to_vec()
    };

    let mut resolver = Resolver {
        registry,
        task_rules,
        order: Vec::new(),
        done: HashSet::new(),
        stack: Vec::new(),
    };

    for root in &roots {
        resolver.visit(root, None)?;
    }

    Ok(resolver.order)
}

struct Resolver<'a> {
    registry: &'a mut TaskRegistry,
    task_rules: &'a [TaskRule],
    order: Vec<String>,
    done: HashSet<String>,
    stack: Vec<String>,
}

impl Resolver<'_> {
    fn visit(&mut self, id: &str, required_by: Option<&str>) -> GraphResult<()> {
        if let Some(pos) = self.stack.iter().position(|t| t == id) {
            let mut cycle = self.stack[pos..].to_vec();
            cycle.push(id.to_string());
            return Err(GraphError::CycleDetected(cycle));
        }

        if self.done.contains(id) {
            return Ok(());
        }

        if !self.registry.contains(id) {
            self.materialize(id, required_by)?;
        }

        let dependencies = self
            .registry
            .get(id)
            .map(|t| t.dependencies().to_vec())
            .unwrap_or_default();

        self.stack.push(id.to_string());
        for dep in &dependencies {
            self.visit(dep, Some(id))?;
        }
        self.stack.pop();

        self.done.insert(id.to_string());
        self.order.push(id.to_string());
        Ok(())
    }

    fn materialize(&mut self, id: &str, required_by: Option<&str>) -> GraphResult<()> {
        let rule = self.task_rules.iter().find(|r| r.applies_to(id));

        match (rule, required_by) {
            (Some(rule), _) => {
                let task = rule.materialize(id).map_err(|e| GraphError::RuleTemplate {
                    prefix: rule.prefix().to_string(),
                    task: id.to_string(),
                    error: e.to_string(),
                })?;
                // The id is known to be absent, so insertion cannot collide.
                let _ = self.registry.insert(task);
                Ok(())
            }
            (None, Some(parent)) => Err(GraphError::UnknownTask {
                task: id.to_string(),
                required_by: parent.to_string(),
            }),
            (None, None) => Err(GraphError::UnknownTarget(id.to_string())),
        }
    }
}
