//! Override rules
//!
//! An override rule pairs a [`Predicate`] with an effect. Rules are applied in
//! declared order; a later rule hitting an already-disabled task is a no-op.

use crate::graph::{Predicate, Task};

/// What an override rule does to a matching task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Disable,
}

/// A predicate paired with an effect
#[derive(Debug, Clone)]
pub struct OverrideRule {
    pub predicate: Predicate,
    pub effect: Effect,
}

impl OverrideRule {
    /// Rule disabling every task the predicate matches
    pub fn disable(predicate: Predicate) -> Self {
        OverrideRule {
            predicate,
            effect: Effect::Disable,
        }
    }

    /// Apply to one task. Returns true if the task changed.
    pub fn apply(&self, task: &mut Task) -> bool {
        if !self.predicate.matches(task.id()) {
            return false;
        }
        match self.effect {
            Effect::Disable => task.disable(),
        }
    }
}

/// Ordered list of override rules shared by both override passes
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<OverrideRule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-insensitive substring rules, one per pattern
    pub fn from_patterns<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        patterns
            .into_iter()
            .map(|p| OverrideRule::disable(Predicate::from_pattern(p)))
            .collect()
    }

    pub fn push(&mut self, rule: OverrideRule) {
        self.rules.push(rule);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OverrideRule> {
        self.rules.iter()
    }

    /// Whether any rule's predicate matches the identifier
    pub fn matches_any(&self, task_id: &str) -> bool {
        self.rules.iter().any(|r| r.predicate.matches(task_id))
    }

    /// Apply every rule, in order, to every task
    ///
    /// Returns the identifiers of tasks this call changed, in the order they
    /// were changed. Dependency edges are never touched.
    pub fn apply_to<'a, I>(&self, tasks: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a mut Task>,
    {
        let mut tasks: Vec<&mut Task> = tasks.into_iter().collect();
        let mut changed = Vec::new();

        for rule in &self.rules {
            for task in tasks.iter_mut() {
                if rule.apply(task) {
                    changed.push(task.id().to_string());
                }
            }
        }

        changed
    }
}

impl FromIterator<OverrideRule> for RuleSet {
    fn from_iter<T: IntoIterator<Item = OverrideRule>>(iter: T) -> Self {
        RuleSet {
            rules: iter.into_iter().collect(),
        }
    }
}

impl Extend<OverrideRule> for RuleSet {
    fn extend<T: IntoIterator<Item = OverrideRule>>(&mut self, iter: T) {
        self.rules.extend(iter);
    }
}

impl IntoIterator for RuleSet {
    type Item = OverrideRule;
    type IntoIter = std::vec::IntoIter<OverrideRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.into_iter()
    }
}
