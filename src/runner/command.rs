//! Command execution
//!
//! This module runs a task's shell commands through the context interpreter.

use crate::error::{ExecutionError, ExecutionResult};
use crate::graph::Command;
use crate::runner::{interpolate, Context, Verbosity};
use std::process::{Command as StdCommand, Stdio};

/// Execute a command in the given context
pub fn execute_command(cmd: &Command, ctx: &Context) -> ExecutionResult<()> {
    let exec_str = interpolate(cmd.exec(), &ctx.vars).map_err(|e| ExecutionError::InvalidValue {
        name: "command".to_string(),
        error: e.to_string(),
    })?;

    if !cmd.is_quiet() && ctx.verbosity >= Verbosity::Normal {
        let print_str = interpolate(cmd.print(), &ctx.vars).unwrap_or_else(|_| cmd.print().to_string());
        eprintln!("[RUN] {}", print_str);
    }

    let working_dir = match cmd.dir() {
        Some(dir) => {
            let interpolated_dir = interpolate(dir, &ctx.vars).map_err(|e| ExecutionError::InvalidValue {
                name: "dir".to_string(),
                error: e.to_string(),
            })?;
            ctx.working_dir.join(interpolated_dir)
        }
        None => ctx.working_dir.clone(),
    };

    let (program, interpreter_args) =
        ctx.interpreter
            .split_first()
            .ok_or_else(|| ExecutionError::InvalidValue {
                name: "interpreter".to_string(),
                error: "interpreter must not be empty".to_string(),
            })?;

    let mut command = StdCommand::new(program);
    command.args(interpreter_args);
    command.arg(&exec_str);
    command.current_dir(&working_dir);

    command.stdin(Stdio::inherit());
    if ctx.verbosity > Verbosity::Silent {
        command.stdout(Stdio::inherit());
        command.stderr(Stdio::inherit());
    } else {
        command.stdout(Stdio::null());
        command.stderr(Stdio::null());
    }

    for (key, value) in &ctx.vars {
        command.env(key, value);
    }

    let status = command.status().map_err(|e| ExecutionError::Spawn {
        program: program.clone(),
        error: e.to_string(),
    })?;

    if !status.success() {
        return Err(ExecutionError::CommandFailed(status.code()));
    }

    Ok(())
}
