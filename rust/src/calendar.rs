//! Calendar-day projection of schedule offsets.
//!
//! One time unit is one calendar day counted from the project start.

use chrono::{Days, NaiveDate};

use crate::models::{Schedule, Task};

/// Calendar dates of a solved task. `finish` is exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CalendarSpan {
    pub start: NaiveDate,
    pub finish: NaiveDate,
}

/// Shift `project_start` by a non-negative day offset.
fn offset_date(project_start: NaiveDate, offset: i64) -> Option<NaiveDate> {
    let days = u64::try_from(offset).ok()?;
    project_start.checked_add_days(Days::new(days))
}

/// Early start / finish dates of a solved task; `None` if unsolved.
pub fn calendar_span(task: &Task, project_start: NaiveDate) -> Option<CalendarSpan> {
    Some(CalendarSpan {
        start: offset_date(project_start, task.early_start?)?,
        finish: offset_date(project_start, task.early_finish?)?,
    })
}

/// Date the project finishes.
pub fn project_finish(schedule: &Schedule, project_start: NaiveDate) -> Option<NaiveDate> {
    offset_date(project_start, schedule.project_duration)
}

/// Constraint offset for a "start no earlier than" date. Dates before the
/// project start clamp to 0.
pub fn constraint_offset(date: NaiveDate, project_start: NaiveDate) -> i64 {
    (date - project_start).num_days().max(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpm::solve;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    #[test]
    fn test_calendar_span_of_solved_task() {
        let tasks = vec![
            Task::new("slab", 10),
            Task::new("walls", 5).with_predecessors(["slab"]),
        ];
        let schedule = solve(&tasks).unwrap();
        let walls = calendar_span(schedule.get("walls").unwrap(), start()).unwrap();

        assert_eq!(walls.start, NaiveDate::from_ymd_opt(2025, 3, 11).unwrap());
        assert_eq!(walls.finish, NaiveDate::from_ymd_opt(2025, 3, 16).unwrap());
        assert_eq!(
            project_finish(&schedule, start()),
            Some(NaiveDate::from_ymd_opt(2025, 3, 16).unwrap())
        );
    }

    #[test]
    fn test_unsolved_task_has_no_span() {
        assert_eq!(calendar_span(&Task::new("a", 1), start()), None);
    }

    #[test]
    fn test_constraint_offset_round_trip() {
        let date = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        let offset = constraint_offset(date, start());
        assert_eq!(offset, 31);

        let tasks = vec![Task::new("crane", 2).with_constraint_date(offset)];
        let schedule = solve(&tasks).unwrap();
        let span = calendar_span(&schedule.tasks[0], start()).unwrap();
        assert_eq!(span.start, date);

        let before = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        assert_eq!(constraint_offset(before, start()), 0);
    }
}
