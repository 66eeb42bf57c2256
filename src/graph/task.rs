//! Task types
//!
//! A task is a named unit of work with ordered dependency identifiers, an
//! enabled flag and an action.

use crate::error::{ExecutionError, ExecutionResult, InterpolationResult};
use crate::runner::{execute_command, interpolate, Context};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Callable task action
pub type ActionFn = Arc<dyn Fn(&Context) -> anyhow::Result<()> + Send + Sync>;

/// What a task does when it runs
#[derive(Clone, Default)]
pub enum Action {
    /// Lifecycle task that only aggregates its dependencies
    #[default]
    Nothing,

    /// Shell commands run in order through the context interpreter
    Commands(Vec<Command>),

    /// Arbitrary callable
    Custom(ActionFn),
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Nothing => write!(f, "Nothing"),
            Action::Commands(cmds) => f.debug_tuple("Commands").field(cmds).finish(),
            Action::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// Where a task came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Registered while configuring the graph
    Declared,

    /// Materialized from a task rule during resolution
    Rule,
}

/// A task in the build graph
#[derive(Debug, Clone)]
pub struct Task {
    id: String,
    dependencies: Vec<String>,
    enabled: bool,
    origin: Origin,

    /// Text shown in task listings
    pub description: Option<String>,

    /// Work performed when the task runs
    pub action: Action,
}

impl Task {
    /// Create an enabled task with no action
    pub fn new<I, S>(id: impl Into<String>, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Task {
            id: id.into(),
            dependencies: dependencies.into_iter().map(Into::into).collect(),
            enabled: true,
            origin: Origin::Declared,
            description: None,
            action: Action::Nothing,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Dependency identifiers in declared order
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// Clear the enabled flag. Returns true if the task was enabled before.
    ///
    /// There is no way back: once cleared the flag stays cleared.
    pub fn disable(&mut self) -> bool {
        std::mem::replace(&mut self.enabled, false)
    }

    /// Add a dependency edge
    pub fn depends_on(&mut self, id: impl Into<String>) -> &mut Self {
        self.dependencies.push(id.into());
        self
    }

    /// Set the action
    pub fn with_action(mut self, action: Action) -> Self {
        self.action = action;
        self
    }

    /// Set the action to a callable
    pub fn with_fn<F>(self, f: F) -> Self
    where
        F: Fn(&Context) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.with_action(Action::Custom(Arc::new(f)))
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub(crate) fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    /// Run the task action
    ///
    /// Any failure is reported as [`ExecutionError::TaskFailed`] carrying this
    /// task's identifier.
    pub fn run(&self, ctx: &Context) -> ExecutionResult<()> {
        let result = match &self.action {
            Action::Nothing => Ok(()),
            Action::Commands(cmds) => cmds
                .iter()
                .try_for_each(|cmd| execute_command(cmd, ctx))
                .map_err(|e| e.to_string()),
            Action::Custom(f) => f(ctx).map_err(|e| format!("{:#}", e)),
        };

        result.map_err(|reason| ExecutionError::TaskFailed {
            task: self.id.clone(),
            reason,
        })
    }
}

/// A shell command run by a task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Simple command string
    Simple(String),

    /// Complex command with options
    Complex {
        exec: String,
        print: String,
        quiet: bool,
        dir: Option<String>,
    },
}

impl Command {
    /// Get the command to execute
    pub fn exec(&self) -> &str {
        match self {
            Command::Simple(cmd) => cmd,
            Command::Complex { exec, .. } => exec,
        }
    }

    /// Get what to print
    pub fn print(&self) -> &str {
        match self {
            Command::Simple(cmd) => cmd,
            Command::Complex { print, .. } => print,
        }
    }

    /// Check if this command is quiet
    pub fn is_quiet(&self) -> bool {
        match self {
            Command::Simple(_) => false,
            Command::Complex { quiet, .. } => *quiet,
        }
    }

    /// Get the working directory
    pub fn dir(&self) -> Option<&str> {
        match self {
            Command::Simple(_) => None,
            Command::Complex { dir, .. } => dir.as_deref(),
        }
    }

    /// Copy of this command with `${var}` references expanded
    ///
    /// Unknown variables are left in place so they can still be resolved from
    /// the context when the command runs.
    pub fn interpolated(&self, vars: &HashMap<String, String>) -> InterpolationResult<Command> {
        let expanded = match self {
            Command::Simple(cmd) => Command::Simple(interpolate(cmd, vars)?),
            Command::Complex {
                exec,
                print,
                quiet,
                dir,
            } => Command::Complex {
                exec: interpolate(exec, vars)?,
                print: interpolate(print, vars)?,
                quiet: *quiet,
                dir: dir.as_deref().map(|d| interpolate(d, vars)).transpose()?,
            },
        };
        Ok(expanded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_new_task_is_enabled() {
        let task = Task::new("compile", ["generate"]);
        assert_eq!(task.id(), "compile");
        assert_eq!(task.dependencies(), &["generate".to_string()]);
        assert!(task.is_enabled());
        assert_eq!(task.origin(), Origin::Declared);
    }

    #[test]
    fn test_disable_is_sticky() {
        let mut task = Task::new("strip", Vec::<String>::new());
        assert!(task.disable());
        assert!(!task.disable());
        assert!(!task.is_enabled());
    }

    #[test]
    fn test_run_custom_action() {
        let counter = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&counter);
        let task = Task::new("count", Vec::<String>::new()).with_fn(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        task.run(&Context::new()).unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failing_action_names_task() {
        let task = Task::new("explode", Vec::<String>::new())
            .with_fn(|_| Err(anyhow::anyhow!("boom")));

        let err = task.run(&Context::new()).unwrap_err();
        match err {
            ExecutionError::TaskFailed { task, reason } => {
                assert_eq!(task, "explode");
                assert_eq!(reason, "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_command_interpolation() {
        let mut vars = HashMap::new();
        vars.insert("suffix".to_string(), "Release".to_string());

        let cmd = Command::Complex {
            exec: "echo ${suffix} ${flavor}".to_string(),
            print: "strip ${suffix}".to_string(),
            quiet: true,
            dir: Some("out/${suffix}".to_string()),
        };

        let expanded = cmd.interpolated(&vars).unwrap();
        assert_eq!(expanded.exec(), "echo Release ${flavor}");
        assert_eq!(expanded.print(), "strip Release");
        assert_eq!(expanded.dir(), Some("out/Release"));
        assert!(expanded.is_quiet());
    }

    #[test]
    fn test_command_interpolation_reports_recursion() {
        let mut vars = HashMap::new();
        vars.insert("loop".to_string(), "x${loop}".to_string());

        let cmd = Command::Simple("echo ${loop}".to_string());
        assert!(matches!(
            cmd.interpolated(&vars),
            Err(crate::error::InterpolationError::RecursiveInterpolation)
        ));
    }
}
