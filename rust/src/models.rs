//! Core data types for the scheduling and layout engine.

use rustc_hash::FxHashMap;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Kind of task. Only affects rendering, never the CPM math.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TaskKind {
    #[default]
    Normal,
    /// Dummy / logical link. No resources, may still carry a duration.
    Virtual,
    Milestone,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskKind::Normal => write!(f, "normal"),
            TaskKind::Virtual => write!(f, "virtual"),
            TaskKind::Milestone => write!(f, "milestone"),
        }
    }
}

impl FromStr for TaskKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "normal" => Ok(TaskKind::Normal),
            "virtual" => Ok(TaskKind::Virtual),
            "milestone" => Ok(TaskKind::Milestone),
            other => Err(format!("Unknown task kind: {}", other)),
        }
    }
}

/// A unit of work or a milestone in the activity network.
///
/// Fields from `early_start` down are owned by the solver and overwritten on
/// every solve; values supplied by the caller are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct Task {
    pub id: String,
    pub name: String,
    /// Time units. Negative values are treated as 0.
    pub duration: i64,
    /// Finish-to-start predecessors. Unknown ids contribute no constraint.
    pub predecessors: Vec<String>,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: TaskKind,
    pub zone: Option<String>,
    pub parent_id: Option<String>,
    pub is_collapsed: bool,
    /// "Start no earlier than", as an offset from project start.
    pub constraint_date: Option<i64>,
    pub manual_lane: Option<usize>,

    pub early_start: Option<i64>,
    pub early_finish: Option<i64>,
    pub late_start: Option<i64>,
    pub late_finish: Option<i64>,
    pub total_float: Option<i64>,
    pub free_float: Option<i64>,
    pub is_critical: bool,
    pub is_summary: bool,
}

impl Task {
    /// Creates a normal task with the given ID and duration.
    pub fn new(id: impl Into<String>, duration: i64) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            duration,
            ..Self::default()
        }
    }

    /// Creates a zero-duration milestone.
    pub fn milestone(id: impl Into<String>) -> Self {
        Self::new(id, 0).with_kind(TaskKind::Milestone)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_predecessors<I, S>(mut self, predecessors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.predecessors = predecessors.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_kind(mut self, kind: TaskKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = Some(zone.into());
        self
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_constraint_date(mut self, offset: i64) -> Self {
        self.constraint_date = Some(offset);
        self
    }

    pub fn with_manual_lane(mut self, lane: usize) -> Self {
        self.manual_lane = Some(lane);
        self
    }

    pub fn collapsed(mut self) -> Self {
        self.is_collapsed = true;
        self
    }

    /// Duration with negative input coerced to 0.
    #[inline]
    pub fn effective_duration(&self) -> i64 {
        self.duration.max(0)
    }

    /// Zone label, falling back to `default_zone` when missing or blank.
    pub fn zone_or<'a>(&'a self, default_zone: &'a str) -> &'a str {
        match self.zone.as_deref().map(str::trim) {
            Some(zone) if !zone.is_empty() => zone,
            _ => default_zone,
        }
    }
}

/// A solved snapshot: the annotated tasks in input order plus the project length.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Schedule {
    pub tasks: Vec<Task>,
    pub project_duration: i64,
}

impl Schedule {
    /// Look up a task by id (first occurrence).
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Critical non-summary tasks ordered by `(early_start, id)`.
    pub fn critical_path(&self) -> Vec<&Task> {
        let mut critical: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|t| t.is_critical && !t.is_summary)
            .collect();
        critical.sort_by(|a, b| {
            a.early_start
                .cmp(&b.early_start)
                .then_with(|| a.id.cmp(&b.id))
        });
        critical
    }

    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
    }
}

/// Placement of one task in the diagram.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct LaneAssignment {
    pub task_id: String,
    pub zone: String,
    /// Lane within the zone.
    pub lane: usize,
    /// Row across all zones: zone start row + lane.
    pub row: usize,
}

/// Per-zone layout metadata, in display order.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ZoneMeta {
    pub name: String,
    pub start_row: usize,
    /// At least 1, even for a zone without placed tasks.
    pub row_count: usize,
    pub color: String,
}

/// Result of a layout pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Layout {
    pub rows: Vec<LaneAssignment>,
    pub zones: Vec<ZoneMeta>,
}

impl Layout {
    /// Row assigned to a task, if it was placed.
    pub fn row_of(&self, task_id: &str) -> Option<usize> {
        self.rows
            .iter()
            .find(|r| r.task_id == task_id)
            .map(|r| r.row)
    }

    /// Total rows occupied by all zones.
    pub fn total_rows(&self) -> usize {
        self.zones.iter().map(|z| z.row_count).sum()
    }
}

/// A dependency edge between two visible nodes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Edge {
    /// Predecessor side.
    pub from: String,
    /// Successor side.
    pub to: String,
}

impl Edge {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Display-only projection of a schedule with collapsed summaries folded.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CollapsedView {
    pub visible_tasks: Vec<Task>,
    pub visible_edges: Vec<Edge>,
    /// task id -> id of the visible node standing in for it.
    pub representatives: FxHashMap<String, String>,
}

impl CollapsedView {
    pub fn is_visible(&self, task_id: &str) -> bool {
        self.visible_tasks.iter().any(|t| t.id == task_id)
    }

    pub fn representative_of(&self, task_id: &str) -> Option<&str> {
        self.representatives.get(task_id).map(String::as_str)
    }
}
