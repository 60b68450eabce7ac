//! Collapsed-view projection.
//!
//! Folds the descendants of collapsed summary tasks into the summary bar and
//! re-wires dependency edges between the nodes that remain visible. The
//! projection is display-only; the schedule it reads is never changed.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::models::{CollapsedView, Edge, Task};

/// Ids of summary tasks whose `is_collapsed` flag is set.
pub fn collapsed_ids(tasks: &[Task]) -> FxHashSet<String> {
    let parents: FxHashSet<&str> = tasks.iter().filter_map(|t| t.parent_id.as_deref()).collect();
    tasks
        .iter()
        .filter(|t| t.is_collapsed && parents.contains(t.id.as_str()))
        .map(|t| t.id.clone())
        .collect()
}

/// Project a solved task set onto the nodes visible with `collapsed` folded.
///
/// A task is represented by its outermost collapsed summary ancestor, the task
/// itself included; otherwise it represents itself. Ids in `collapsed` that
/// are not summaries have no effect. A visible summary that folds hidden
/// descendants comes back with `is_collapsed` set, so the view can be passed
/// straight to layout.
pub fn project_collapsed_view(tasks: &[Task], collapsed: &FxHashSet<String>) -> CollapsedView {
    let mut by_id: FxHashMap<&str, &Task> =
        FxHashMap::with_capacity_and_hasher(tasks.len(), Default::default());
    for task in tasks {
        by_id.entry(task.id.as_str()).or_insert(task);
    }
    let summaries: FxHashSet<&str> = tasks
        .iter()
        .filter_map(|t| t.parent_id.as_deref())
        .filter(|p| by_id.contains_key(p))
        .collect();

    let mut representatives: FxHashMap<String, String> =
        FxHashMap::with_capacity_and_hasher(tasks.len(), Default::default());
    for task in tasks {
        if representatives.contains_key(&task.id) {
            continue;
        }
        let chain = ancestor_chain(task, &by_id);
        let rep = chain
            .iter()
            .rev()
            .find(|id| summaries.contains(*id) && collapsed.contains(**id))
            .copied()
            .unwrap_or(task.id.as_str());
        representatives.insert(task.id.clone(), rep.to_string());
    }

    let folding: FxHashSet<&str> = representatives
        .iter()
        .filter(|(id, rep)| id != rep)
        .map(|(_, rep)| rep.as_str())
        .collect();
    let visible_tasks: Vec<Task> = tasks
        .iter()
        .filter(|t| representatives.get(&t.id) == Some(&t.id))
        .map(|t| {
            let mut task = t.clone();
            if folding.contains(task.id.as_str()) {
                task.is_collapsed = true;
            }
            task
        })
        .collect();

    let mut seen: FxHashSet<Edge> = FxHashSet::default();
    let mut visible_edges: Vec<Edge> = Vec::new();
    for task in tasks {
        let Some(to) = representatives.get(&task.id) else {
            continue;
        };
        for pred in &task.predecessors {
            let Some(from) = representatives.get(pred) else {
                continue;
            };
            if from == to {
                continue;
            }
            let edge = Edge::new(from.clone(), to.clone());
            if seen.insert(edge.clone()) {
                visible_edges.push(edge);
            }
        }
    }

    CollapsedView {
        visible_tasks,
        visible_edges,
        representatives,
    }
}

/// Ids from `task` up to its root, task first. Stops at a dangling parent or
/// at the first repeated id.
fn ancestor_chain<'a>(task: &'a Task, by_id: &FxHashMap<&'a str, &'a Task>) -> Vec<&'a str> {
    let mut chain: Vec<&'a str> = vec![task.id.as_str()];
    let mut visited: FxHashSet<&'a str> = FxHashSet::default();
    visited.insert(task.id.as_str());

    let mut current = task;
    while let Some(parent) = current.parent_id.as_deref().and_then(|p| by_id.get(p).copied()) {
        if !visited.insert(parent.id.as_str()) {
            break;
        }
        chain.push(parent.id.as_str());
        current = parent;
    }
    chain
}
