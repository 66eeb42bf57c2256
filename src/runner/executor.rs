//! Plan execution
//!
//! The executor walks a frozen [`ExecutionPlan`]. A task starts only once each
//! of its dependencies has succeeded or been skipped. Disabled tasks are
//! skipped and still satisfy their dependents. A panicking action fails its
//! task like an error does. Independent tasks may run on
//! parallel worker threads when `jobs > 1`.

use crate::error::{ExecutionError, ExecutionResult};
use crate::graph::ExecutionPlan;
use crate::runner::Context;
use std::any::Any;
use std::collections::{BTreeSet, VecDeque};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::thread;

/// Final state of a planned task after a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Action ran and succeeded
    Succeeded,

    /// Task was disabled by an override rule
    Skipped,

    /// Action ran and failed
    Failed(String),

    /// Never started because the named dependency failed
    Blocked(String),

    /// Never started because the run was aborted
    NotRun,
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    /// Short label for reports
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Succeeded => "OK",
            Outcome::Skipped => "SKIPPED",
            Outcome::Failed(_) => "FAILED",
            Outcome::Blocked(_) => "BLOCKED",
            Outcome::NotRun => "NOT RUN",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Failed(reason) => write!(f, "{}: {}", self.label(), reason),
            Outcome::Blocked(dep) => write!(f, "{}: '{}' failed", self.label(), dep),
            _ => write!(f, "{}", self.label()),
        }
    }
}

/// Outcome of every planned task
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// (task id, outcome) in plan order
    outcomes: Vec<(String, Outcome)>,

    /// Task ids in the order their actions started
    started: Vec<String>,
}

impl RunReport {
    pub fn outcomes(&self) -> &[(String, Outcome)] {
        &self.outcomes
    }

    pub fn outcome(&self, task_id: &str) -> Option<&Outcome> {
        self.outcomes
            .iter()
            .find(|(id, _)| id == task_id)
            .map(|(_, outcome)| outcome)
    }

    /// Task ids whose actions were started, in start order
    pub fn started(&self) -> &[String] {
        &self.started
    }

    /// Ids with the given outcome label, in plan order
    pub fn with_label(&self, label: &str) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|(_, o)| o.label() == label)
            .map(|(id, _)| id.as_str())
            .collect()
    }

    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|(_, o)| {
            matches!(o, Outcome::Succeeded | Outcome::Skipped)
        })
    }

    /// Turn the first failure into an error
    pub fn into_result(self) -> ExecutionResult<RunReport> {
        let failure = self.outcomes.iter().find_map(|(id, o)| match o {
            Outcome::Failed(reason) => Some((id.clone(), reason.clone())),
            _ => None,
        });

        match failure {
            Some((task, reason)) => Err(ExecutionError::TaskFailed { task, reason }),
            None => Ok(self),
        }
    }
}

/// Runs an execution plan
#[derive(Debug, Clone)]
pub struct Executor {
    continue_on_failure: bool,
    jobs: usize,
}

impl Default for Executor {
    fn default() -> Self {
        Executor {
            continue_on_failure: false,
            jobs: 1,
        }
    }
}

impl Executor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep running independent tasks after a failure
    pub fn with_continue_on_failure(mut self, continue_on_failure: bool) -> Self {
        self.continue_on_failure = continue_on_failure;
        self
    }

    /// Maximum number of tasks running at once (at least 1)
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Run the plan
    ///
    /// Without `continue_on_failure` the first failure stops new tasks from
    /// starting; tasks already running are allowed to finish. With it, only
    /// tasks depending on the failed one are held back.
    pub fn run(&self, plan: &ExecutionPlan, ctx: &Context) -> RunReport {
        let tasks = plan.tasks();
        let count = tasks.len();

        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); count];
        let mut waiting: Vec<usize> = vec![0; count];
        for (i, task) in tasks.iter().enumerate() {
            for dep in task.dependencies() {
                if let Some(d) = plan.position(dep) {
                    dependents[d].push(i);
                    waiting[i] += 1;
                }
            }
        }

        let mut outcomes: Vec<Option<Outcome>> = vec![None; count];
        let mut ready: BTreeSet<usize> = (0..count).filter(|&i| waiting[i] == 0).collect();
        let mut started = Vec::new();
        let mut in_flight = 0usize;
        let mut aborted = false;

        let (tx, rx) = crossbeam_channel::unbounded::<(usize, ExecutionResult<()>)>();

        thread::scope(|scope| loop {
            while !aborted && in_flight < self.jobs {
                let Some(i) = ready.pop_first() else { break };
                let task = &tasks[i];

                if !task.is_enabled() {
                    ctx.print_task_skip(task.id(), "disabled");
                    outcomes[i] = Some(Outcome::Skipped);
                    release(i, &dependents, &mut waiting, &mut ready);
                    continue;
                }

                ctx.print_task_start(task.id());
                started.push(task.id().to_string());
                in_flight += 1;

                let tx = tx.clone();
                scope.spawn(move || {
                    let result = panic::catch_unwind(AssertUnwindSafe(|| task.run(ctx)))
                        .unwrap_or_else(|payload| {
                            Err(ExecutionError::TaskFailed {
                                task: task.id().to_string(),
                                reason: format!("panicked: {}", panic_message(payload.as_ref())),
                            })
                        });
                    let _ = tx.send((i, result));
                });
            }

            if in_flight == 0 {
                break;
            }

            let Ok((i, result)) = rx.recv() else { break };
            in_flight -= 1;

            match result {
                Ok(()) => {
                    ctx.print_task_complete(tasks[i].id());
                    outcomes[i] = Some(Outcome::Succeeded);
                    release(i, &dependents, &mut waiting, &mut ready);
                }
                Err(e) => {
                    ctx.print_error(&e.to_string());
                    let reason = match e {
                        ExecutionError::TaskFailed { reason, .. } => reason,
                        other => other.to_string(),
                    };
                    outcomes[i] = Some(Outcome::Failed(reason));
                    if self.continue_on_failure {
                        block_dependents(i, tasks[i].id(), &dependents, &mut outcomes);
                    } else {
                        aborted = true;
                    }
                }
            }
        });
        drop(tx);

        RunReport {
            outcomes: tasks
                .iter()
                .zip(outcomes)
                .map(|(t, o)| (t.id().to_string(), o.unwrap_or(Outcome::NotRun)))
                .collect(),
            started,
        }
    }
}

/// Text of a panic payload, when it carries one
fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown cause")
}

/// Mark `done` as finished, queueing dependents with nothing left to wait on
fn release(
    done: usize,
    dependents: &[Vec<usize>],
    waiting: &mut [usize],
    ready: &mut BTreeSet<usize>,
) {
    for &d in &dependents[done] {
        waiting[d] -= 1;
        if waiting[d] == 0 {
            ready.insert(d);
        }
    }
}

/// Mark everything downstream of `failed` as blocked
fn block_dependents(
    failed: usize,
    failed_id: &str,
    dependents: &[Vec<usize>],
    outcomes: &mut [Option<Outcome>],
) {
    let mut queue: VecDeque<usize> = dependents[failed].iter().copied().collect();
    while let Some(d) = queue.pop_front() {
        if outcomes[d].is_none() {
            outcomes[d] = Some(Outcome::Blocked(failed_id.to_string()));
            queue.extend(dependents[d].iter().copied());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Graph, RuleSet};
    use crate::runner::Verbosity;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    type Log = Arc<Mutex<Vec<String>>>;

    fn ctx() -> Context {
        Context::new().with_verbosity(Verbosity::Silent)
    }

    fn record(graph: &mut Graph, log: &Log, id: &str, deps: &[&str]) {
        let log = Arc::clone(log);
        let name = id.to_string();
        let task = crate::graph::Task::new(id, deps.iter().copied()).with_fn(move |_| {
            log.lock().unwrap().push(name.clone());
            Ok(())
        });
        graph.register_task(task).unwrap();
    }

    fn fail(graph: &mut Graph, id: &str, deps: &[&str]) {
        let task = crate::graph::Task::new(id, deps.iter().copied())
            .with_fn(|_| Err(anyhow::anyhow!("action raised")));
        graph.register_task(task).unwrap();
    }

    #[test]
    fn test_disabled_task_is_skipped() {
        let log: Log = Arc::default();
        let mut graph = Graph::new();
        record(&mut graph, &log, "a", &[]);
        record(&mut graph, &log, "b-strip", &[]);
        record(&mut graph, &log, "c", &[]);

        let plan = graph.finalize(&RuleSet::from_patterns(["strip"]), &[]).unwrap();
        let report = Executor::new().run(&plan, &ctx());

        assert!(report.is_success());
        assert_eq!(*log.lock().unwrap(), vec!["a", "c"]);
        assert_eq!(report.outcome("b-strip"), Some(&Outcome::Skipped));
        assert_eq!(report.outcome("a"), Some(&Outcome::Succeeded));
    }

    #[test]
    fn test_skipped_dependency_satisfies_dependent() {
        let log: Log = Arc::default();
        let mut graph = Graph::new();
        record(&mut graph, &log, "strip", &[]);
        record(&mut graph, &log, "package", &["strip"]);

        let plan = graph.finalize(&RuleSet::from_patterns(["strip"]), &[]).unwrap();
        let report = Executor::new().run(&plan, &ctx());

        assert!(report.is_success());
        assert_eq!(*log.lock().unwrap(), vec!["package"]);
    }

    #[test]
    fn test_failure_aborts_dependents() {
        let log: Log = Arc::default();
        let mut graph = Graph::new();
        record(&mut graph, &log, "a", &["b"]);
        fail(&mut graph, "b", &[]);

        let plan = graph.finalize(&RuleSet::new(), &[]).unwrap();
        let report = Executor::new().run(&plan, &ctx());

        assert!(log.lock().unwrap().is_empty());
        assert_eq!(report.outcome("b"), Some(&Outcome::Failed("action raised".to_string())));
        assert_eq!(report.outcome("a"), Some(&Outcome::NotRun));

        let err = report.into_result().unwrap_err();
        assert!(matches!(err, ExecutionError::TaskFailed { ref task, .. } if task == "b"));
    }

    #[test]
    fn test_abort_stops_independent_tasks() {
        let log: Log = Arc::default();
        let mut graph = Graph::new();
        fail(&mut graph, "first", &[]);
        record(&mut graph, &log, "second", &[]);

        let plan = graph.finalize(&RuleSet::new(), &[]).unwrap();
        let report = Executor::new().run(&plan, &ctx());

        assert!(log.lock().unwrap().is_empty());
        assert_eq!(report.outcome("second"), Some(&Outcome::NotRun));
    }

    #[test]
    fn test_continue_on_failure_runs_independent_tasks() {
        let log: Log = Arc::default();
        let mut graph = Graph::new();
        fail(&mut graph, "b", &[]);
        record(&mut graph, &log, "a", &["b"]);
        record(&mut graph, &log, "top", &["a"]);
        record(&mut graph, &log, "independent", &[]);

        let plan = graph.finalize(&RuleSet::new(), &[]).unwrap();
        let report = Executor::new()
            .with_continue_on_failure(true)
            .run(&plan, &ctx());

        assert_eq!(*log.lock().unwrap(), vec!["independent"]);
        assert_eq!(report.outcome("a"), Some(&Outcome::Blocked("b".to_string())));
        assert_eq!(report.outcome("top"), Some(&Outcome::Blocked("b".to_string())));
        assert!(!report.is_success());
        assert!(report.into_result().is_err());
    }

    #[test]
    fn test_dependencies_start_first_in_parallel() {
        let log: Log = Arc::default();
        let mut graph = Graph::new();
        record(&mut graph, &log, "app", &["lib1", "lib2", "res"]);
        record(&mut graph, &log, "lib1", &["core"]);
        record(&mut graph, &log, "lib2", &["core"]);
        record(&mut graph, &log, "core", &[]);
        record(&mut graph, &log, "res", &[]);

        let plan = graph.finalize(&RuleSet::new(), &[]).unwrap();
        let report = Executor::new().with_jobs(4).run(&plan, &ctx());

        assert!(report.is_success());
        let finished = log.lock().unwrap().clone();
        let pos = |id: &str| finished.iter().position(|t| t == id).unwrap();
        assert_eq!(finished.len(), 5);
        assert!(pos("core") < pos("lib1"));
        assert!(pos("core") < pos("lib2"));
        assert!(pos("lib1") < pos("app"));
        assert!(pos("lib2") < pos("app"));
        assert!(pos("res") < pos("app"));
    }

    #[test]
    fn test_single_job_follows_plan_order() {
        let log: Log = Arc::default();
        let mut graph = Graph::new();
        record(&mut graph, &log, "package", &["compile", "resources"]);
        record(&mut graph, &log, "compile", &[]);
        record(&mut graph, &log, "resources", &[]);

        let plan = graph.finalize(&RuleSet::new(), &[]).unwrap();
        let report = Executor::new().run(&plan, &ctx());

        assert_eq!(report.started(), plan.ids().as_slice());
        assert_eq!(*log.lock().unwrap(), vec!["compile", "resources", "package"]);
    }

    #[test]
    fn test_all_skipped_is_success() {
        let mut graph = Graph::new();
        graph.register("stripA", Vec::<String>::new()).unwrap();
        graph.register("stripB", ["stripA"]).unwrap();

        let plan = graph.finalize(&RuleSet::from_patterns(["strip"]), &[]).unwrap();
        let report = Executor::new().run(&plan, &ctx());

        assert!(report.is_success());
        assert!(report.started().is_empty());
        assert_eq!(report.with_label("SKIPPED"), vec!["stripA", "stripB"]);
    }

    #[test]
    fn test_panicking_action_fails_task() {
        for continue_on_failure in [false, true] {
            let log: Log = Arc::default();
            let mut graph = Graph::new();
            let boom = crate::graph::Task::new("boom", Vec::<String>::new())
                .with_fn(|_| panic!("raised"));
            graph.register_task(boom).unwrap();
            record(&mut graph, &log, "after", &["boom"]);

            let plan = graph.finalize(&RuleSet::new(), &[]).unwrap();
            let report = Executor::new()
                .with_continue_on_failure(continue_on_failure)
                .run(&plan, &ctx());

            assert!(log.lock().unwrap().is_empty());
            assert_eq!(
                report.outcome("boom"),
                Some(&Outcome::Failed("panicked: raised".to_string()))
            );
            let expected = if continue_on_failure {
                Outcome::Blocked("boom".to_string())
            } else {
                Outcome::NotRun
            };
            assert_eq!(report.outcome("after"), Some(&expected));
        }
    }

    #[test]
    fn test_abort_lets_running_task_finish() {
        let log: Log = Arc::default();
        let (failed_tx, failed_rx) = crossbeam_channel::bounded::<()>(1);
        let mut graph = Graph::new();

        let slow_log = Arc::clone(&log);
        let slow = crate::graph::Task::new("slow", Vec::<String>::new()).with_fn(move |_| {
            failed_rx.recv_timeout(Duration::from_secs(10))?;
            thread::sleep(Duration::from_millis(100));
            slow_log.lock().unwrap().push("slow".to_string());
            Ok(())
        });
        graph.register_task(slow).unwrap();

        let broken = crate::graph::Task::new("broken", Vec::<String>::new()).with_fn(move |_| {
            let _ = failed_tx.send(());
            Err(anyhow::anyhow!("action raised"))
        });
        graph.register_task(broken).unwrap();
        record(&mut graph, &log, "after", &["broken"]);

        let plan = graph.finalize(&RuleSet::new(), &[]).unwrap();
        let report = Executor::new().with_jobs(2).run(&plan, &ctx());

        assert_eq!(report.started(), &["slow".to_string(), "broken".to_string()]);
        assert_eq!(report.outcome("slow"), Some(&Outcome::Succeeded));
        assert!(report.outcome("broken").is_some_and(Outcome::is_failure));
        assert_eq!(report.outcome("after"), Some(&Outcome::NotRun));
        assert_eq!(*log.lock().unwrap(), vec!["slow"]);
    }
}
