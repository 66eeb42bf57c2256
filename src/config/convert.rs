//! Conversion from build file types to graph types

use crate::config::types::{self, Config, RuleConfig, RuleDetail, TaskConfig, TaskRuleConfig};
use crate::error::{BuildError, ConfigError, ConfigResult};
use crate::graph::{Action, Command, Graph, OverrideRule, Predicate, RuleSet, Task, TaskRule};

impl RuleConfig {
    /// Predicate described by this rule
    pub fn to_predicate(&self) -> ConfigResult<Predicate> {
        match self {
            RuleConfig::Pattern(pattern) => Ok(Predicate::from_pattern(pattern.clone())),
            RuleConfig::Detailed(detail) => detail.to_predicate(),
        }
    }

    pub fn to_rule(&self) -> ConfigResult<OverrideRule> {
        self.to_predicate().map(OverrideRule::disable)
    }
}

impl RuleDetail {
    fn to_predicate(&self) -> ConfigResult<Predicate> {
        let set = [
            self.contains.is_some(),
            self.contains_case_sensitive.is_some(),
            self.exact.is_some(),
            self.glob.is_some(),
            self.regex.is_some(),
        ]
        .iter()
        .filter(|&&s| s)
        .count();

        if set != 1 {
            return Err(ConfigError::AmbiguousRule(set));
        }

        if let Some(v) = &self.contains {
            Ok(Predicate::CaseInsensitiveSubstring(v.clone()))
        } else if let Some(v) = &self.contains_case_sensitive {
            Ok(Predicate::Substring(v.clone()))
        } else if let Some(v) = &self.exact {
            Ok(Predicate::Exact(v.clone()))
        } else if let Some(v) = &self.glob {
            Predicate::glob(v)
        } else if let Some(v) = &self.regex {
            Predicate::regex(v)
        } else {
            Err(ConfigError::AmbiguousRule(0))
        }
    }
}

/// Build a rule set from configured rules, keeping their order
pub fn build_rules(rules: &[RuleConfig]) -> ConfigResult<RuleSet> {
    rules.iter().map(RuleConfig::to_rule).collect()
}

impl From<&types::Command> for Command {
    fn from(config: &types::Command) -> Self {
        match config {
            types::Command::Simple(cmd) => Command::Simple(cmd.clone()),
            types::Command::Complex(detail) => Command::Complex {
                exec: detail.exec.clone(),
                print: detail.print.clone().unwrap_or_else(|| detail.exec.clone()),
                quiet: detail.quiet,
                dir: detail.dir.clone(),
            },
        }
    }
}

fn commands_action(run: &[types::Command]) -> Action {
    if run.is_empty() {
        Action::Nothing
    } else {
        Action::Commands(run.iter().map(Command::from).collect())
    }
}

impl TaskConfig {
    /// Runtime task for this definition
    pub fn to_task(&self) -> Task {
        let mut task =
            Task::new(self.name.clone(), self.depends_on.iter().cloned()).with_action(commands_action(&self.run));
        if let Some(desc) = &self.description {
            task = task.with_description(desc.clone());
        }
        if !self.enabled {
            task.disable();
        }
        task
    }
}

impl TaskRuleConfig {
    pub fn to_task_rule(&self) -> TaskRule {
        let mut rule = TaskRule::new(self.prefix.clone())
            .with_dependencies(self.depends_on.iter().cloned())
            .with_commands(self.run.iter().map(Command::from).collect());
        if let Some(desc) = &self.description {
            rule = rule.with_description(desc.clone());
        }
        rule
    }
}

impl Config {
    /// Register every task and task rule, in file order
    ///
    /// Fails on the first duplicate task name.
    pub fn to_graph(&self) -> Result<Graph, BuildError> {
        let mut graph = Graph::new();

        for task in &self.tasks {
            graph.register_task(task.to_task())?;
        }

        for rule in &self.task_rules {
            graph.add_task_rule(rule.to_task_rule());
        }

        Ok(graph)
    }

    /// Override rules declared in the build file
    pub fn override_rules(&self) -> ConfigResult<RuleSet> {
        build_rules(&self.overrides)
    }
}
