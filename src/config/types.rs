//! Core configuration types
//!
//! This module defines the data structures that represent a build.yml file.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Top-level configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Project name (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Interpreter used for commands (e.g., ["sh", "-c"])
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpreter: Option<Vec<String>>,

    /// Env file loaded into the command environment, relative to the build file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dotenv: Option<String>,

    /// Variables available to commands
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub vars: HashMap<String, String>,

    /// Override rules, applied in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub overrides: Vec<RuleConfig>,

    /// Rules that materialize tasks on demand
    #[serde(rename = "task-rules", default, skip_serializing_if = "Vec::is_empty")]
    pub task_rules: Vec<TaskRuleConfig>,

    /// Tasks in registration order
    #[serde(default)]
    pub tasks: Vec<TaskConfig>,
}

/// An override rule
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RuleConfig {
    /// Bare string: case-insensitive substring
    Pattern(String),

    /// Explicit matcher
    Detailed(RuleDetail),
}

/// An override rule with an explicit matcher; exactly one field must be set
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RuleDetail {
    /// Identifier contains the value, ignoring case
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contains: Option<String>,

    /// Identifier contains the value, case-sensitive
    #[serde(rename = "contains-case-sensitive", skip_serializing_if = "Option::is_none")]
    pub contains_case_sensitive: Option<String>,

    /// Identifier equals the value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exact: Option<String>,

    /// Identifier matches the glob
    #[serde(skip_serializing_if = "Option::is_none")]
    pub glob: Option<String>,

    /// Identifier matches the regular expression
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
}

/// A task definition
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TaskConfig {
    /// Task identifier
    pub name: String,

    /// Text shown in task listings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Tasks that must complete first
    #[serde(
        rename = "depends-on",
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "deserialize_string_list"
    )]
    pub depends_on: Vec<String>,

    /// Commands to execute
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "deserialize_commands"
    )]
    pub run: Vec<Command>,

    /// Registered disabled when false
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// A task rule definition
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TaskRuleConfig {
    /// Names starting with this prefix are built by the rule
    pub prefix: String,

    /// Description template
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Dependency templates
    #[serde(
        rename = "depends-on",
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "deserialize_string_list"
    )]
    pub depends_on: Vec<String>,

    /// Command templates
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "deserialize_commands"
    )]
    pub run: Vec<Command>,
}

/// A command to execute
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Command {
    /// Simple string command
    Simple(String),

    /// Complex command with additional options
    Complex(CommandDetail),
}

/// Detailed command specification
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CommandDetail {
    /// The command to execute
    #[serde(alias = "command")]
    pub exec: String,

    /// What to print when running (defaults to exec)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub print: Option<String>,

    /// Whether to suppress the [RUN] line
    #[serde(default)]
    pub quiet: bool,

    /// Working directory for the command
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

fn default_true() -> bool {
    true
}

/// Custom deserializer for string fields that accept a single value or a list
fn deserialize_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    use serde_yaml::Value;

    let value = Value::deserialize(deserializer)?;

    match value {
        Value::String(s) => Ok(vec![s]),
        Value::Sequence(seq) => seq
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                other => Err(D::Error::custom(format!(
                    "expected a task name, found {:?}",
                    other
                ))),
            })
            .collect(),
        Value::Null => Ok(Vec::new()),
        _ => Err(D::Error::custom("expected a string or a list of strings")),
    }
}

/// Custom deserializer for commands that handles both single values and arrays
fn deserialize_commands<'de, D>(deserializer: D) -> Result<Vec<Command>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    use serde_yaml::Value;

    let value = Value::deserialize(deserializer)?;

    match value {
        // Single string or complex command
        Value::String(s) => Ok(vec![Command::Simple(s)]),
        Value::Mapping(_) => {
            let cmd = Command::deserialize(value).map_err(D::Error::custom)?;
            Ok(vec![cmd])
        }
        // Array of commands
        Value::Sequence(seq) => {
            let mut cmds = Vec::new();
            for item in seq {
                let cmd = Command::deserialize(item).map_err(D::Error::custom)?;
                cmds.push(cmd);
            }
            Ok(cmds)
        }
        // Null or not present
        Value::Null => Ok(Vec::new()),
        _ => Err(D::Error::custom("run must be a string, object, or array")),
    }
}
