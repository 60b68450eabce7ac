//! CPM solver: forward pass, summary rollup, backward pass, float.

use std::fmt;
use thiserror::Error;

use crate::config::SolverConfig;
use crate::models::{Schedule, Task};
use crate::{log_debug, log_passes, log_summary};

use super::graph::TaskGraph;
use super::passes::{
    backward_sweep, converge, forward_sweep, free_float, late_init, rollup_sweep, Span,
};

/// Fixed-point loop of the solver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pass {
    Forward,
    Rollup,
    Backward,
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pass::Forward => write!(f, "forward pass"),
            Pass::Rollup => write!(f, "summary rollup"),
            Pass::Backward => write!(f, "backward pass"),
        }
    }
}

/// Errors that can occur while solving a schedule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Circular dependency detected: {pass} did not settle within {passes} passes")]
    CyclicDependency { pass: Pass, passes: usize },
    #[error("Circular parent hierarchy detected at task {task_id}")]
    CyclicHierarchy { task_id: String },
}

/// Solve a task snapshot with the default configuration.
///
/// # Returns
/// * `Ok(Schedule)` with every computed field populated, in input order
/// * `Err(ScheduleError)` if a dependency or parent cycle is found
pub fn solve(tasks: &[Task]) -> Result<Schedule, ScheduleError> {
    solve_with_config(tasks, &SolverConfig::default())
}

/// Solve a task snapshot.
///
/// Computed fields on the input are ignored, so solving an already solved
/// snapshot yields the same schedule.
pub fn solve_with_config(tasks: &[Task], config: &SolverConfig) -> Result<Schedule, ScheduleError> {
    let verbosity = config.verbosity;
    let graph = TaskGraph::new(tasks)?;
    let n = graph.len();
    let limit = config.pass_limit(n);

    for task in tasks {
        if task.duration < 0 {
            log_debug!(verbosity, "Task {}: negative duration {} treated as 0", task.id, task.duration);
        }
    }

    let (early, passes) = converge(Pass::Forward, limit, vec![None; n], |prev| {
        forward_sweep(&graph, prev)
    })?;
    log_passes!(verbosity, "Forward pass settled after {} passes", passes);

    let (early, passes) = converge(Pass::Rollup, limit, early, |prev| rollup_sweep(&graph, prev))?;
    log_passes!(verbosity, "Summary rollup settled after {} passes", passes);

    let project_duration = early
        .iter()
        .filter_map(|span| span.map(|s| s.finish))
        .max()
        .unwrap_or(0);

    let init = late_init(&graph, &early, project_duration);
    let (late, passes) = converge(Pass::Backward, limit, init, |prev| {
        backward_sweep(&graph, prev)
    })?;
    log_passes!(verbosity, "Backward pass settled after {} passes", passes);

    let solved: Vec<Task> = tasks
        .iter()
        .enumerate()
        .map(|(i, task)| annotate(&graph, task, i, &early, &late, project_duration))
        .collect();

    log_summary!(
        verbosity,
        "Solved {} tasks: project duration {}, {} critical",
        n,
        project_duration,
        solved.iter().filter(|t| t.is_critical).count()
    );

    Ok(Schedule {
        tasks: solved,
        project_duration,
    })
}

/// Copy a task with its computed fields filled in.
fn annotate(
    graph: &TaskGraph<'_>,
    task: &Task,
    i: usize,
    early: &[Option<Span>],
    late: &[Span],
    project_duration: i64,
) -> Task {
    let mut out = task.clone();
    let early_span = early[i];
    let late_span = late[i];

    out.is_summary = graph.is_summary[i];
    out.early_start = early_span.map(|s| s.start);
    out.early_finish = early_span.map(|s| s.finish);
    out.late_start = Some(late_span.start);
    out.late_finish = Some(late_span.finish);

    if graph.is_summary[i] {
        out.duration = early_span.map_or(0, |s| s.finish.saturating_sub(s.start));
        out.total_float = Some(0);
        out.free_float = Some(0);
        out.is_critical = false;
    } else {
        out.duration = graph.durations[i];
        let total_float = early_span.map(|s| late_span.start.saturating_sub(s.start));
        out.total_float = total_float;
        out.free_float = free_float(graph, early, i, project_duration);
        out.is_critical = total_float == Some(0);
    }
    out
}
