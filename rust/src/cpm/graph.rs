//! Index of a task snapshot for the CPM passes.
//!
//! References are resolved to dense indices once; every pass then works on
//! plain vectors. Unknown predecessor and parent ids are dropped here, which
//! keeps half-edited networks solvable while the user is still typing.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::models::Task;

use super::solver::ScheduleError;

/// Pre-computed structure of a task snapshot, indexed by input position.
pub struct TaskGraph<'a> {
    pub tasks: &'a [Task],
    index: FxHashMap<&'a str, usize>,
    /// Non-summary predecessors of each non-summary task.
    pub predecessors: Vec<Vec<usize>>,
    /// Non-summary tasks listing each non-summary task as a predecessor.
    pub successors: Vec<Vec<usize>>,
    pub parent: Vec<Option<usize>>,
    pub children: Vec<Vec<usize>>,
    pub is_summary: Vec<bool>,
    /// Authored durations, negatives coerced to 0.
    pub durations: Vec<i64>,
    /// Constraint offsets, negatives clamped to 0.
    pub constraints: Vec<Option<i64>>,
}

impl<'a> TaskGraph<'a> {
    /// Build the graph, rejecting a parent chain that loops back on itself.
    pub fn new(tasks: &'a [Task]) -> Result<Self, ScheduleError> {
        let n = tasks.len();

        let mut index: FxHashMap<&str, usize> =
            FxHashMap::with_capacity_and_hasher(n, Default::default());
        for (i, task) in tasks.iter().enumerate() {
            index.entry(task.id.as_str()).or_insert(i);
        }

        let mut parent = vec![None; n];
        let mut children: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut is_summary = vec![false; n];
        for (i, task) in tasks.iter().enumerate() {
            let Some(parent_id) = task.parent_id.as_deref() else {
                continue;
            };
            if let Some(&p) = index.get(parent_id) {
                parent[i] = Some(p);
                children[p].push(i);
                is_summary[p] = true;
            }
        }

        check_hierarchy(tasks, &parent)?;

        let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut successors: Vec<Vec<usize>> = vec![Vec::new(); n];
        for (i, task) in tasks.iter().enumerate() {
            if is_summary[i] {
                continue;
            }
            let mut seen: FxHashSet<usize> = FxHashSet::default();
            for pred_id in &task.predecessors {
                let Some(&p) = index.get(pred_id.as_str()) else {
                    continue;
                };
                if is_summary[p] || !seen.insert(p) {
                    continue;
                }
                predecessors[i].push(p);
                successors[p].push(i);
            }
        }

        Ok(Self {
            tasks,
            index,
            predecessors,
            successors,
            parent,
            children,
            is_summary,
            durations: tasks.iter().map(Task::effective_duration).collect(),
            constraints: tasks
                .iter()
                .map(|t| t.constraint_date.map(|c| c.max(0)))
                .collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Index of the first task with this id.
    #[inline]
    pub fn get(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }
}

/// Walk every parent chain; a chain longer than the task count has a loop.
fn check_hierarchy(tasks: &[Task], parent: &[Option<usize>]) -> Result<(), ScheduleError> {
    let n = tasks.len();
    // 0 = unvisited, 1 = on current chain, 2 = known to reach a root
    let mut state = vec![0u8; n];
    let mut chain: Vec<usize> = Vec::new();

    for start in 0..n {
        if state[start] == 2 {
            continue;
        }
        chain.clear();
        let mut current = Some(start);
        while let Some(i) = current {
            match state[i] {
                2 => break,
                1 => {
                    return Err(ScheduleError::CyclicHierarchy {
                        task_id: tasks[i].id.clone(),
                    })
                }
                _ => {
                    state[i] = 1;
                    chain.push(i);
                    current = parent[i];
                }
            }
        }
        for &i in &chain {
            state[i] = 2;
        }
    }
    Ok(())
}
