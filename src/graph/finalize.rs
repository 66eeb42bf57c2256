//! Configuration-time override pass
//!
//! Runs once every task has been registered, before the execution order is
//! computed. It only sees tasks that exist at that point.

use crate::graph::{RuleSet, TaskRegistry};

/// Tasks an override pass disabled
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinalizeReport {
    /// Identifiers newly disabled by the pass, in the order they were hit
    pub disabled: Vec<String>,
}

impl FinalizeReport {
    pub fn is_empty(&self) -> bool {
        self.disabled.is_empty()
    }
}

/// Override pass over the raw registry
pub struct GraphFinalizer;

impl GraphFinalizer {
    /// Disable every registered task matching any rule
    pub fn apply(rules: &RuleSet, registry: &mut TaskRegistry) -> FinalizeReport {
        FinalizeReport {
            disabled: rules.apply_to(registry.iter_mut()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{OverrideRule, Predicate};

    #[test]
    fn test_finalizer_disables_matching_tasks() {
        let mut registry = TaskRegistry::new();
        for id in ["compile", "stripDebugSymbols", "extractNativeSymbolTables", "package"] {
            registry.register(id, Vec::<String>::new()).unwrap();
        }
        let rules = RuleSet::from_patterns(["strip", "extractNativeSymbol"]);

        let report = GraphFinalizer::apply(&rules, &mut registry);

        assert_eq!(
            report.disabled,
            vec!["stripDebugSymbols", "extractNativeSymbolTables"]
        );
        assert!(registry.get("compile").unwrap().is_enabled());
        assert!(registry.get("package").unwrap().is_enabled());
    }

    #[test]
    fn test_finalizer_is_idempotent() {
        let mut registry = TaskRegistry::new();
        registry.register("lintVital", Vec::<String>::new()).unwrap();
        let rules: RuleSet = std::iter::once(OverrideRule::disable(Predicate::Exact(
            "lintVital".to_string(),
        )))
        .collect();

        assert!(!GraphFinalizer::apply(&rules, &mut registry).is_empty());
        assert!(GraphFinalizer::apply(&rules, &mut registry).is_empty());
        assert!(!registry.get("lintVital").unwrap().is_enabled());
    }
}
