//! Configuration validation
//!
//! Semantic checks that serde cannot express. Duplicate task names are left
//! to the task registry, which reports them when the graph is built.

use crate::config::types::{Command, Config, RuleConfig, TaskConfig, TaskRuleConfig};
use crate::error::{ConfigError, ConfigResult};

/// Validate a complete configuration
pub fn validate_config(config: &Config) -> ConfigResult<()> {
    if let Some(interpreter) = &config.interpreter {
        if interpreter.is_empty() {
            return Err(ConfigError::Invalid(
                "interpreter must name a program".to_string(),
            ));
        }
    }

    for rule in &config.overrides {
        validate_rule(rule)?;
    }

    for rule in &config.task_rules {
        validate_task_rule(rule)?;
    }

    for task in &config.tasks {
        validate_task(task)?;
    }

    Ok(())
}

/// Validate a single task
pub fn validate_task(task: &TaskConfig) -> ConfigResult<()> {
    if task.name.trim().is_empty() {
        return Err(ConfigError::Invalid("task name must not be empty".to_string()));
    }

    if task.depends_on.iter().any(|d| d.trim().is_empty()) {
        return Err(ConfigError::Invalid(format!(
            "task '{}' has an empty dependency name",
            task.name
        )));
    }

    validate_commands(&task.name, &task.run)
}

/// Validate a task rule
pub fn validate_task_rule(rule: &TaskRuleConfig) -> ConfigResult<()> {
    if rule.prefix.is_empty() {
        return Err(ConfigError::Invalid(
            "task rule prefix must not be empty".to_string(),
        ));
    }

    validate_commands(&rule.prefix, &rule.run)
}

/// Validate an override rule
pub fn validate_rule(rule: &RuleConfig) -> ConfigResult<()> {
    rule.to_predicate().map(|_| ())
}

fn validate_commands(owner: &str, commands: &[Command]) -> ConfigResult<()> {
    for cmd in commands {
        let exec = match cmd {
            Command::Simple(s) => s,
            Command::Complex(detail) => &detail.exec,
        };
        if exec.trim().is_empty() {
            return Err(ConfigError::Invalid(format!(
                "'{}' has an empty command",
                owner
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;

    #[test]
    fn test_valid_config() {
        let config = parse_config(
            r#"
overrides:
  - strip
  - regex: "^extract.*Symbols$"
task-rules:
  - prefix: strip
    run: echo ${suffix}
tasks:
  - name: compile
    run: echo compile
  - name: package
    depends-on: compile
"#,
        )
        .unwrap();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_empty_interpreter() {
        let config = parse_config("interpreter: []\n").unwrap();
        assert!(matches!(validate_config(&config), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_empty_task_name() {
        let config = parse_config("tasks:\n  - name: \"\"\n").unwrap();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_empty_command() {
        let config = parse_config("tasks:\n  - name: a\n    run: \"  \"\n").unwrap();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_bad_regex_rule() {
        let config = parse_config("overrides:\n  - regex: \"(\"\n").unwrap();
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_rule_with_two_matchers() {
        let config = parse_config("overrides:\n  - exact: a\n    glob: b*\n").unwrap();
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::AmbiguousRule(2))
        ));
    }

    #[test]
    fn test_empty_task_rule_prefix() {
        let config = parse_config("task-rules:\n  - prefix: \"\"\n").unwrap();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_duplicates_left_to_registry() {
        let config = parse_config("tasks:\n  - name: build\n  - name: build\n").unwrap();
        assert!(validate_config(&config).is_ok());
    }
}
