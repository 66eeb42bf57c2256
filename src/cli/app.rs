//! Main CLI application

use crate::cli::completion::print_completions;
use crate::config::{
    build_rules, load_env_file, load_user_overrides, parse_config_auto, parse_config_file,
    validate_config, Config,
};
use crate::error::BuildError;
use crate::graph::{ExecutionPlan, RuleSet};
use crate::runner::{Context, Executor, Verbosity};
use crate::ui;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use clap_complete::Shell;
use std::ffi::OsString;
use std::path::PathBuf;

/// CLI application
pub struct App {
    /// The clap command
    command: Command,
}

impl App {
    pub fn new() -> Self {
        App {
            command: build_command(),
        }
    }

    /// Run the application with the process arguments
    pub fn run(self) -> Result<(), BuildError> {
        self.run_from(std::env::args_os())
    }

    /// Run the application with explicit arguments
    pub fn run_from<I, T>(mut self, args: I) -> Result<(), BuildError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.command.clone().get_matches_from(args);
        let verbosity = get_verbosity(&matches);

        match matches.subcommand() {
            Some(("run", sub)) => {
                let (config, config_path) = load_config(&matches)?;
                run_build(&config, config_path, sub, verbosity)
            }
            Some(("tasks", sub)) => {
                let (config, _) = load_config(&matches)?;
                let plan = plan_all(&config)?;
                ui::print_task_list(&plan, sub.get_flag("all"));
                Ok(())
            }
            Some(("completions", sub)) => {
                if let Some(shell) = sub.get_one::<Shell>("shell").copied() {
                    print_completions(shell, &mut self.command);
                }
                Ok(())
            }
            _ => {
                self.command.print_help()?;
                println!();
                Ok(())
            }
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the clap command
pub fn build_command() -> Command {
    Command::new("build")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Build-task graph runner with name-pattern task overrides")
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Path to build.yml")
                .global(true),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only print command output and errors")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("silent")
                .short('s')
                .long("silent")
                .help("Print no output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Print verbose output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("run")
                .about("Run tasks in dependency order")
                .arg(
                    Arg::new("continue-on-failure")
                        .long("continue-on-failure")
                        .help("Keep running independent tasks after a failure")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("disable-pattern")
                        .long("disable-pattern")
                        .value_name("PATTERN")
                        .help("Disable tasks whose name contains PATTERN (case-insensitive)")
                        .action(ArgAction::Append),
                )
                .arg(
                    Arg::new("jobs")
                        .short('j')
                        .long("jobs")
                        .value_name("N")
                        .help("Run up to N independent tasks at once")
                        .value_parser(value_parser!(u64).range(1..))
                        .default_value("1"),
                )
                .arg(
                    Arg::new("tasks")
                        .value_name("TASK")
                        .help("Tasks to run (default: all)")
                        .num_args(0..),
                ),
        )
        .subcommand(
            Command::new("tasks")
                .about("List tasks after both override passes")
                .arg(
                    Arg::new("all")
                        .long("all")
                        .help("Include tasks materialized by task rules")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completions")
                .arg(
                    Arg::new("shell")
                        .value_name("SHELL")
                        .required(true)
                        .value_parser(value_parser!(Shell)),
                ),
        )
}

/// Get verbosity level from matches
fn get_verbosity(matches: &ArgMatches) -> Verbosity {
    if matches.get_flag("silent") {
        Verbosity::Silent
    } else if matches.get_flag("quiet") {
        Verbosity::Quiet
    } else if matches.get_flag("verbose") {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    }
}

/// Load and validate the build file named by `--file`, or discover one
fn load_config(matches: &ArgMatches) -> Result<(Config, PathBuf), BuildError> {
    let (config, path) = match matches.get_one::<PathBuf>("file") {
        Some(path) => (parse_config_file(path)?, path.clone()),
        None => parse_config_auto()?,
    };
    validate_config(&config)?;
    Ok((config, path))
}

/// Build file rules, then user-wide rules, then `extra_patterns`
fn collect_rules(config: &Config, extra_patterns: &[String]) -> Result<RuleSet, BuildError> {
    let mut rules = config.override_rules()?;
    rules.extend(build_rules(&load_user_overrides()?)?);
    rules.extend(RuleSet::from_patterns(extra_patterns.iter().cloned()));
    Ok(rules)
}

/// Finalize the whole graph, for listings
fn plan_all(config: &Config) -> Result<ExecutionPlan, BuildError> {
    let rules = collect_rules(config, &[])?;
    Ok(config.to_graph()?.finalize(&rules, &[])?)
}

fn run_build(
    config: &Config,
    config_path: PathBuf,
    matches: &ArgMatches,
    verbosity: Verbosity,
) -> Result<(), BuildError> {
    let patterns: Vec<String> = matches
        .get_many::<String>("disable-pattern")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let targets: Vec<String> = matches
        .get_many::<String>("tasks")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    let rules = collect_rules(config, &patterns)?;
    let graph = config.to_graph()?;
    let plan = graph.finalize(&rules, &targets)?;

    let ctx = Context::new()
        .with_config_path(config_path)
        .with_verbosity(verbosity);
    let config_dir = ctx.config_dir();
    let mut ctx = ctx.with_working_dir(config_dir);

    if let Some(interpreter) = &config.interpreter {
        ctx = ctx.with_interpreter(interpreter.clone());
    }

    let mut vars = config.vars.clone();
    if let Some(dotenv) = &config.dotenv {
        vars.extend(load_env_file(&ctx.config_dir().join(dotenv))?);
    }
    ctx = ctx.with_vars(vars);

    if let Some(name) = &config.name {
        ctx.print_info(&format!("Building {}", name));
    }
    ui::print_overrides(&plan, verbosity);

    let executor = Executor::new()
        .with_continue_on_failure(matches.get_flag("continue-on-failure"))
        .with_jobs(matches.get_one::<u64>("jobs").copied().unwrap_or(1) as usize);

    let report = executor.run(&plan, &ctx);
    ui::print_report(&report, verbosity);
    report.into_result()?;

    Ok(())
}

/// Run the CLI application
pub fn run() -> Result<(), BuildError> {
    App::new().run()
}
