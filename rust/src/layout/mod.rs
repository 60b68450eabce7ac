//! Layout engine: zone-partitioned, non-overlapping lane assignment.
//!
//! Consumes solved tasks and only produces positions; schedule values pass
//! through untouched.

mod collapse;
mod lanes;
mod zones;

use rustc_hash::FxHashMap;

use crate::config::LayoutConfig;
use crate::models::{LaneAssignment, Layout, Task};
use crate::{log_passes, log_summary};

pub use collapse::{collapsed_ids, project_collapsed_view};
pub use lanes::{assign_lanes, placement_span, LaneTable};
pub use zones::{display_order, ZoneStack};

/// Lay out solved tasks with the default configuration.
pub fn layout(tasks: &[Task], zone_order: Option<&[String]>) -> Layout {
    layout_with_config(tasks, zone_order, &LayoutConfig::default())
}

/// Lay out solved tasks.
///
/// Expanded summary tasks are drawn as brackets over their children and get
/// no lane; a collapsed summary is placed like an ordinary bar.
pub fn layout_with_config(tasks: &[Task], zone_order: Option<&[String]>, config: &LayoutConfig) -> Layout {
    let verbosity = config.verbosity;

    let mut by_zone: FxHashMap<&str, Vec<&Task>> = FxHashMap::default();
    for task in tasks {
        let zone = task.zone_or(&config.default_zone);
        let entry = by_zone.entry(zone).or_default();
        if occupies_lane(task) {
            entry.push(task);
        }
    }

    let order = display_order(by_zone.keys().copied(), zone_order);
    let mut stack = ZoneStack::new();
    let mut rows: Vec<LaneAssignment> = Vec::with_capacity(tasks.len());

    for zone in &order {
        let zone_tasks = by_zone.get(zone.as_str()).map(Vec::as_slice).unwrap_or_default();
        let (assigned, lane_count) = assign_lanes(zone_tasks, verbosity);
        let start_row = stack.next_row();

        rows.extend(assigned.into_iter().map(|(task, lane)| LaneAssignment {
            task_id: task.id.clone(),
            zone: zone.clone(),
            lane,
            row: start_row + lane,
        }));

        let meta = stack.push(zone, lane_count, config);
        log_passes!(
            verbosity,
            "Zone {}: rows {}..{} ({} tasks)",
            meta.name,
            meta.start_row,
            meta.start_row + meta.row_count,
            zone_tasks.len()
        );
    }

    let zones = stack.into_zones();
    log_summary!(
        verbosity,
        "Laid out {} tasks in {} zones",
        rows.len(),
        zones.len()
    );

    Layout { rows, zones }
}

#[inline]
fn occupies_lane(task: &Task) -> bool {
    !task.is_summary || task.is_collapsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpm::solve;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn site() -> Vec<Task> {
        vec![
            Task::new("excavate", 3).with_zone("Groundworks"),
            Task::new("footings", 2)
                .with_zone("Groundworks")
                .with_predecessors(["excavate"]),
            Task::new("drainage", 4).with_zone("Groundworks"),
            Task::new("frame", 5)
                .with_zone("Structure")
                .with_predecessors(["footings"]),
            Task::milestone("permit"),
        ]
    }

    #[test]
    fn test_zones_alphabetical_with_default_zone() {
        let schedule = solve(&site()).unwrap();
        let result = layout(&schedule.tasks, None);

        let names: Vec<&str> = result.zones.iter().map(|z| z.name.as_str()).collect();
        assert_eq!(names, vec!["General", "Groundworks", "Structure"]);
        assert_eq!(result.zones[0].start_row, 0);
        assert_eq!(result.zones[1].start_row, 1);
        assert_eq!(result.zones[1].row_count, 2);
        assert_eq!(result.zones[2].start_row, 3);
        assert_eq!(result.total_rows(), 4);

        // drainage and excavate both start at 0; footings continues excavate
        assert_eq!(result.row_of("drainage"), Some(1));
        assert_eq!(result.row_of("excavate"), Some(2));
        assert_eq!(result.row_of("footings"), Some(2));
        assert_eq!(result.row_of("frame"), Some(3));
    }

    #[test]
    fn test_explicit_zone_order_and_colors() {
        let schedule = solve(&site()).unwrap();
        let order = vec!["Structure".to_string(), "Fit-out".to_string()];
        let result = layout(&schedule.tasks, Some(&order));

        let names: Vec<&str> = result.zones.iter().map(|z| z.name.as_str()).collect();
        assert_eq!(names, vec!["Structure", "Fit-out", "General", "Groundworks"]);
        assert_eq!(result.zones[1].row_count, 1);
        assert_eq!(result.row_of("frame"), Some(0));
        assert_eq!(result.row_of("excavate"), Some(4));

        let palette = LayoutConfig::default().palette;
        for (i, zone) in result.zones.iter().enumerate() {
            assert_eq!(zone.color, palette[i % palette.len()]);
        }
    }

    #[test]
    fn test_expanded_summary_has_no_lane() {
        let tasks = vec![
            Task::new("S", 0).with_zone("Core"),
            Task::new("X", 2).with_zone("Core").with_parent("S"),
        ];
        let schedule = solve(&tasks).unwrap();
        let result = layout(&schedule.tasks, None);
        assert_eq!(result.row_of("S"), None);
        assert_eq!(result.row_of("X"), Some(0));

        let mut collapsed = schedule.tasks.clone();
        collapsed[0].is_collapsed = true;
        let result = layout(&collapsed, None);
        assert!(result.row_of("S").is_some());
    }

    #[test]
    fn test_collapsed_view_places_its_summary() {
        let tasks = vec![
            Task::new("S", 0).with_zone("Core"),
            Task::new("X", 2).with_zone("Core").with_parent("S"),
            Task::new("Y", 3)
                .with_zone("Core")
                .with_parent("S")
                .with_predecessors(["X"]),
        ];
        let schedule = solve(&tasks).unwrap();
        let collapsed: rustc_hash::FxHashSet<String> = ["S".to_string()].into_iter().collect();
        let view = project_collapsed_view(&schedule.tasks, &collapsed);
        let result = layout(&view.visible_tasks, None);

        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.row_of("S"), Some(0));
        assert_eq!(result.zones[0].row_count, 1);
    }

    #[test]
    fn test_empty_input() {
        let result = layout(&[], None);
        assert!(result.rows.is_empty());
        assert!(result.zones.is_empty());
        assert_eq!(result.total_rows(), 0);
    }

    #[test]
    fn test_layout_is_deterministic_and_non_overlapping() {
        let mut rng = StdRng::seed_from_u64(42);
        let zones = ["A", "B", "C"];
        for _ in 0..20 {
            let tasks: Vec<Task> = (0..30)
                .map(|i| {
                    let mut task = Task::new(format!("t{:02}", i), rng.random_range(0..6))
                        .with_zone(zones[rng.random_range(0..zones.len())]);
                    if i > 0 && rng.random_bool(0.5) {
                        task.predecessors = vec![format!("t{:02}", rng.random_range(0..i))];
                    }
                    task
                })
                .collect();
            let schedule = solve(&tasks).unwrap();

            let mut reversed = schedule.tasks.clone();
            reversed.reverse();
            let result = layout(&schedule.tasks, None);
            assert_eq!(result.rows.len(), tasks.len());
            let rows_of = |l: &Layout| -> Vec<(String, usize)> {
                let mut rows: Vec<(String, usize)> =
                    l.rows.iter().map(|r| (r.task_id.clone(), r.row)).collect();
                rows.sort();
                rows
            };
            assert_eq!(rows_of(&result), rows_of(&layout(&reversed, None)));

            for (i, a) in result.rows.iter().enumerate() {
                for b in &result.rows[i + 1..] {
                    if a.row != b.row {
                        continue;
                    }
                    let (a_start, a_finish) = placement_span(schedule.get(&a.task_id).unwrap());
                    let (b_start, b_finish) = placement_span(schedule.get(&b.task_id).unwrap());
                    assert!(
                        a_finish <= b_start || b_finish <= a_start,
                        "{} and {} overlap in row {}",
                        a.task_id,
                        b.task_id,
                        a.row
                    );
                }
            }
        }
    }
}
