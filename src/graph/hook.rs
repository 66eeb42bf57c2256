//! Graph-ready override pass
//!
//! Runs once the execution order is known. It scans the realized plan, so it
//! also covers tasks that task rules materialized during resolution.

use crate::graph::{ExecutionPlan, FinalizeReport, RuleSet};

/// Override pass over the realized execution order
pub struct ExecutionGraphHook;

impl ExecutionGraphHook {
    /// Disable every planned task matching any rule
    pub fn apply(rules: &RuleSet, plan: &mut ExecutionPlan) -> FinalizeReport {
        FinalizeReport {
            disabled: rules.apply_to(plan.tasks_mut()),
        }
    }
}
