//! Lane assignment within a single zone.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::log_debug;
use crate::models::Task;

/// Latest finish per lane; `None` means nothing has been placed there yet.
#[derive(Clone, Debug, Default)]
pub struct LaneTable {
    lanes: Vec<Option<i64>>,
}

impl LaneTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    /// A lane is free at `time` once everything in it has finished.
    #[inline]
    pub fn is_free(&self, lane: usize, time: i64) -> bool {
        match self.lanes.get(lane) {
            Some(Some(finish)) => *finish <= time,
            _ => true,
        }
    }

    /// Lowest lane free at `time`, if any.
    pub fn first_free(&self, time: i64) -> Option<usize> {
        (0..self.lanes.len()).find(|&lane| self.is_free(lane, time))
    }

    /// Record a task finishing at `finish` in `lane`, growing the table as needed.
    pub fn occupy(&mut self, lane: usize, finish: i64) {
        if lane >= self.lanes.len() {
            self.lanes.resize(lane + 1, None);
        }
        let slot = &mut self.lanes[lane];
        *slot = Some(slot.map_or(finish, |prev| prev.max(finish)));
    }

    /// Open a new lane and return its index.
    fn open(&mut self) -> usize {
        self.lanes.push(None);
        self.lanes.len() - 1
    }
}

/// Start and finish used for placement; unsolved tasks sit at 0.
#[inline]
pub fn placement_span(task: &Task) -> (i64, i64) {
    let start = task.early_start.unwrap_or(0);
    let finish = task
        .early_finish
        .unwrap_or(start.saturating_add(task.effective_duration()));
    (start, finish)
}

/// Assign lanes to the tasks of one zone.
///
/// Tasks are processed by `(early_start, id)`, with zero-length tasks ahead
/// of the others that start at the same time so a milestone is placed before
/// the work it releases. A manual lane is always honored, even when it
/// overlaps, but is capped at the zone's task count plus the lanes already
/// open. Otherwise a task continues the lane of a same-zone predecessor that
/// finishes exactly at its start, then falls back to the lowest free lane,
/// then opens a new one.
///
/// Returns `(task, lane)` pairs in processing order and the lane count.
pub fn assign_lanes<'a>(zone_tasks: &[&'a Task], verbosity: u8) -> (Vec<(&'a Task, usize)>, usize) {
    let mut ordered: Vec<&'a Task> = zone_tasks.to_vec();
    ordered.sort_by_cached_key(|task| {
        let (start, finish) = placement_span(task);
        (start, finish > start, task.id.clone())
    });

    let in_zone: FxHashSet<&str> = zone_tasks.iter().map(|t| t.id.as_str()).collect();
    let mut lane_of: FxHashMap<&str, usize> = FxHashMap::default();
    let mut finish_of: FxHashMap<&str, i64> = FxHashMap::default();
    let mut table = LaneTable::new();
    let mut assigned = Vec::with_capacity(ordered.len());

    for task in ordered {
        let (start, finish) = placement_span(task);

        let lane = if let Some(manual) = task.manual_lane {
            let lane = manual.min(zone_tasks.len() + table.len());
            log_debug!(verbosity, "Task {}: manual lane {} (requested {})", task.id, lane, manual);
            lane
        } else if let Some(lane) = continuation_lane(task, start, &in_zone, &lane_of, &finish_of, &table) {
            log_debug!(verbosity, "Task {}: continues lane {}", task.id, lane);
            lane
        } else if let Some(lane) = table.first_free(start) {
            log_debug!(verbosity, "Task {}: free lane {}", task.id, lane);
            lane
        } else {
            let lane = table.open();
            log_debug!(verbosity, "Task {}: opened lane {}", task.id, lane);
            lane
        };

        table.occupy(lane, finish);
        lane_of.entry(task.id.as_str()).or_insert(lane);
        finish_of.entry(task.id.as_str()).or_insert(finish);
        assigned.push((task, lane));
    }

    (assigned, table.len())
}

/// Lowest lane of an already placed same-zone predecessor ending exactly at
/// `start` whose lane is free at `start`.
fn continuation_lane(
    task: &Task,
    start: i64,
    in_zone: &FxHashSet<&str>,
    lane_of: &FxHashMap<&str, usize>,
    finish_of: &FxHashMap<&str, i64>,
    table: &LaneTable,
) -> Option<usize> {
    task.predecessors
        .iter()
        .map(String::as_str)
        .filter(|pred| in_zone.contains(pred))
        .filter(|pred| finish_of.get(pred) == Some(&start))
        .filter_map(|pred| lane_of.get(pred).copied())
        .filter(|&lane| table.is_free(lane, start))
        .min()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placed(id: &str, start: i64, duration: i64) -> Task {
        let mut task = Task::new(id, duration);
        task.early_start = Some(start);
        task.early_finish = Some(start + duration);
        task
    }

    fn lanes_by_id(assigned: &[(&Task, usize)]) -> FxHashMap<String, usize> {
        assigned.iter().map(|(t, l)| (t.id.clone(), *l)).collect()
    }

    #[test]
    fn test_lane_table() {
        let mut table = LaneTable::new();
        assert!(table.is_empty());
        assert!(table.is_free(0, 0));
        table.occupy(0, 5);
        assert!(!table.is_free(0, 4));
        assert!(table.is_free(0, 5));
        table.occupy(2, 3);
        assert_eq!(table.len(), 3);
        assert_eq!(table.first_free(1), Some(1));
        table.occupy(0, 2);
        assert!(!table.is_free(0, 4), "finish never moves backwards");
    }

    #[test]
    fn test_greedy_reuses_lowest_free_lane() {
        let a = placed("a", 0, 4);
        let b = placed("b", 1, 2);
        let c = placed("c", 3, 2);
        let d = placed("d", 4, 1);
        let (assigned, count) = assign_lanes(&[&d, &c, &b, &a], 0);
        let lanes = lanes_by_id(&assigned);

        assert_eq!(count, 2);
        assert_eq!(lanes["a"], 0);
        assert_eq!(lanes["b"], 1);
        assert_eq!(lanes["c"], 1);
        assert_eq!(lanes["d"], 0);
        let order: Vec<&str> = assigned.iter().map(|(t, _)| t.id.as_str()).collect();
        assert_eq!(order, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_chain_continues_its_lane() {
        // Lane 0 frees up at 2, but "next" follows "b_pred" into lane 1
        let short = placed("a_short", 0, 2);
        let pred = placed("b_pred", 0, 3);
        let mut next = placed("next", 3, 2);
        next.predecessors = vec!["b_pred".to_string()];
        let (assigned, count) = assign_lanes(&[&next, &pred, &short], 0);
        let lanes = lanes_by_id(&assigned);

        assert_eq!(count, 2);
        assert_eq!(lanes["a_short"], 0);
        assert_eq!(lanes["b_pred"], 1);
        assert_eq!(lanes["next"], 1);
    }

    #[test]
    fn test_predecessor_with_gap_does_not_claim_lane() {
        let other = placed("a_other", 0, 1);
        let pred = placed("b_pred", 0, 2);
        let mut next = placed("next", 4, 1);
        next.predecessors = vec!["b_pred".to_string()];
        let (assigned, _) = assign_lanes(&[&other, &pred, &next], 0);
        assert_eq!(lanes_by_id(&assigned)["next"], 0);
    }

    #[test]
    fn test_manual_lane_may_overlap() {
        let a = placed("a", 0, 5);
        let b = placed("b", 1, 5).with_manual_lane(0);
        let c = placed("c", 2, 1).with_manual_lane(3);
        let (assigned, count) = assign_lanes(&[&a, &b, &c], 0);
        let lanes = lanes_by_id(&assigned);

        assert_eq!(lanes["b"], 0);
        assert_eq!(lanes["c"], 3);
        assert_eq!(count, 4);
    }

    #[test]
    fn test_oversized_manual_lane_is_capped() {
        let a = placed("a", 0, 2);
        let b = placed("b", 1, 2).with_manual_lane(usize::MAX);
        let (assigned, count) = assign_lanes(&[&a, &b], 0);
        let lanes = lanes_by_id(&assigned);

        assert_eq!(lanes["a"], 0);
        assert_eq!(lanes["b"], 3);
        assert_eq!(count, 4);
    }

    #[test]
    fn test_milestone_is_placed_before_the_work_it_releases() {
        // "z_gate" sorts after "a_next" by id but finishes exactly at its start
        let short = placed("a_short", 0, 2);
        let gate = placed("z_gate", 3, 0).with_manual_lane(1);
        let mut next = placed("a_next", 3, 2);
        next.predecessors = vec!["z_gate".to_string()];
        let (assigned, count) = assign_lanes(&[&next, &gate, &short], 0);
        let lanes = lanes_by_id(&assigned);

        let order: Vec<&str> = assigned.iter().map(|(t, _)| t.id.as_str()).collect();
        assert_eq!(order, vec!["a_short", "z_gate", "a_next"]);
        assert_eq!(lanes["z_gate"], 1);
        assert_eq!(lanes["a_next"], 1);
        assert_eq!(count, 2);
    }

    #[test]
    fn test_milestones_share_a_lane() {
        let m1 = placed("m1", 3, 0);
        let m2 = placed("m2", 3, 0);
        let (_, count) = assign_lanes(&[&m1, &m2], 0);
        assert_eq!(count, 1);
    }

    #[test]
    fn test_unsolved_tasks_start_at_zero() {
        let task = Task::new("raw", 4);
        assert_eq!(placement_span(&task), (0, 4));
    }
}
