//! Fixed-point passes of the CPM solver.
//!
//! Each sweep is a pure function from the previous pass's values to the next
//! pass's values plus a `changed` flag. `converge` drives a sweep until it
//! stops changing or the pass limit is reached.

use super::graph::TaskGraph;
use super::solver::{Pass, ScheduleError};

/// Start and finish offsets of a task.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    pub start: i64,
    pub finish: i64,
}

impl Span {
    #[inline]
    pub fn new(start: i64, duration: i64) -> Self {
        Self {
            start,
            finish: start.saturating_add(duration),
        }
    }
}

/// Run `sweep` until it reports no change.
///
/// Returns the converged values and the number of passes taken, or
/// `CyclicDependency` once `limit` passes have all changed something.
pub fn converge<T>(
    pass: Pass,
    limit: usize,
    initial: Vec<T>,
    mut sweep: impl FnMut(&[T]) -> (Vec<T>, bool),
) -> Result<(Vec<T>, usize), ScheduleError> {
    let mut state = initial;
    for passes in 1..=limit {
        let (next, changed) = sweep(&state);
        state = next;
        if !changed {
            return Ok((state, passes));
        }
    }
    Err(ScheduleError::CyclicDependency {
        pass,
        passes: limit,
    })
}

/// One forward sweep over the non-summary tasks.
///
/// Only predecessors that already have a span in `prev` constrain the start;
/// a task with none of them resolved starts at its constraint or at 0.
pub fn forward_sweep(graph: &TaskGraph<'_>, prev: &[Option<Span>]) -> (Vec<Option<Span>>, bool) {
    let mut next = prev.to_vec();
    let mut changed = false;

    for i in 0..graph.len() {
        if graph.is_summary[i] {
            continue;
        }

        let mut max_es: Option<i64> = graph.predecessors[i]
            .iter()
            .filter_map(|&p| prev[p].map(|span| span.finish))
            .max();

        if let Some(constraint) = graph.constraints[i] {
            max_es = Some(max_es.map_or(constraint, |es| es.max(constraint)));
        }

        let span = Span::new(max_es.unwrap_or(0), graph.durations[i]);
        if prev[i] != Some(span) {
            next[i] = Some(span);
            changed = true;
        }
    }

    (next, changed)
}

/// One rollup sweep: each summary spans its direct children's spans.
pub fn rollup_sweep(graph: &TaskGraph<'_>, prev: &[Option<Span>]) -> (Vec<Option<Span>>, bool) {
    let mut next = prev.to_vec();
    let mut changed = false;

    for i in 0..graph.len() {
        if !graph.is_summary[i] {
            continue;
        }

        let rolled = graph.children[i]
            .iter()
            .filter_map(|&c| prev[c])
            .fold(None, |acc: Option<Span>, child| {
                Some(match acc {
                    None => child,
                    Some(span) => Span {
                        start: span.start.min(child.start),
                        finish: span.finish.max(child.finish),
                    },
                })
            });

        if prev[i] != rolled {
            next[i] = rolled;
            changed = true;
        }
    }

    (next, changed)
}

/// Initial late spans: every task finishes at the project end.
pub fn late_init(graph: &TaskGraph<'_>, early: &[Option<Span>], project_duration: i64) -> Vec<Span> {
    (0..graph.len())
        .map(|i| {
            let duration = if graph.is_summary[i] {
                early[i].map_or(0, |span| span.finish.saturating_sub(span.start))
            } else {
                graph.durations[i]
            };
            Span {
                start: project_duration.saturating_sub(duration),
                finish: project_duration,
            }
        })
        .collect()
}

/// One backward sweep: a task must finish before its earliest-starting
/// successor's late start.
pub fn backward_sweep(graph: &TaskGraph<'_>, prev: &[Span]) -> (Vec<Span>, bool) {
    let mut next = prev.to_vec();
    let mut changed = false;

    for i in 0..graph.len() {
        if graph.is_summary[i] {
            continue;
        }
        let Some(late_finish) = graph.successors[i].iter().map(|&s| prev[s].start).min() else {
            continue;
        };

        let span = Span {
            start: late_finish.saturating_sub(graph.durations[i]),
            finish: late_finish,
        };
        if prev[i] != span {
            next[i] = span;
            changed = true;
        }
    }

    (next, changed)
}

/// Free float of a non-summary task: slack before the earliest successor start,
/// or before project end when nothing follows it.
pub fn free_float(
    graph: &TaskGraph<'_>,
    early: &[Option<Span>],
    i: usize,
    project_duration: i64,
) -> Option<i64> {
    let finish = early[i]?.finish;
    let next_start = graph.successors[i]
        .iter()
        .filter_map(|&s| early[s].map(|span| span.start))
        .min();
    Some(next_start.unwrap_or(project_duration).saturating_sub(finish))
}
