//! Python bindings (enabled with the `python` feature).

use chrono::NaiveDate;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use rustc_hash::FxHashSet;
use std::collections::{HashMap, HashSet};

use crate::calendar::calendar_span;
use crate::config::{LayoutConfig, SolverConfig};
use crate::models::{LaneAssignment, Task, TaskKind, ZoneMeta};

/// A task as seen from Python. `kind` is "normal", "virtual" or "milestone".
#[pyclass(name = "Task")]
#[derive(Clone, Debug)]
pub struct PyTask {
    #[pyo3(get, set)]
    pub id: String,
    #[pyo3(get, set)]
    pub name: String,
    #[pyo3(get, set)]
    pub duration: i64,
    #[pyo3(get, set)]
    pub predecessors: Vec<String>,
    #[pyo3(get, set)]
    pub kind: String,
    #[pyo3(get, set)]
    pub zone: Option<String>,
    #[pyo3(get, set)]
    pub parent_id: Option<String>,
    #[pyo3(get, set)]
    pub is_collapsed: bool,
    #[pyo3(get, set)]
    pub constraint_date: Option<i64>,
    #[pyo3(get, set)]
    pub manual_lane: Option<usize>,
    #[pyo3(get)]
    pub early_start: Option<i64>,
    #[pyo3(get)]
    pub early_finish: Option<i64>,
    #[pyo3(get)]
    pub late_start: Option<i64>,
    #[pyo3(get)]
    pub late_finish: Option<i64>,
    #[pyo3(get)]
    pub total_float: Option<i64>,
    #[pyo3(get)]
    pub free_float: Option<i64>,
    #[pyo3(get)]
    pub is_critical: bool,
    #[pyo3(get)]
    pub is_summary: bool,
}

#[pymethods]
impl PyTask {
    #[new]
    #[pyo3(signature = (
        id,
        duration,
        predecessors=Vec::new(),
        name=None,
        kind="normal".to_string(),
        zone=None,
        parent_id=None,
        is_collapsed=false,
        constraint_date=None,
        manual_lane=None
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        id: String,
        duration: i64,
        predecessors: Vec<String>,
        name: Option<String>,
        kind: String,
        zone: Option<String>,
        parent_id: Option<String>,
        is_collapsed: bool,
        constraint_date: Option<i64>,
        manual_lane: Option<usize>,
    ) -> Self {
        let mut task = Task::new(id, duration);
        if let Some(name) = name {
            task.name = name;
        }
        task.predecessors = predecessors;
        task.zone = zone;
        task.parent_id = parent_id;
        task.is_collapsed = is_collapsed;
        task.constraint_date = constraint_date;
        task.manual_lane = manual_lane;
        let mut py_task = Self::from(task);
        py_task.kind = kind;
        py_task
    }

    fn __repr__(&self) -> String {
        format!(
            "Task(id={:?}, duration={}, preds={}, early_start={:?}, critical={})",
            self.id,
            self.duration,
            self.predecessors.len(),
            self.early_start,
            self.is_critical
        )
    }
}

impl From<Task> for PyTask {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            name: task.name,
            duration: task.duration,
            predecessors: task.predecessors,
            kind: task.kind.to_string(),
            zone: task.zone,
            parent_id: task.parent_id,
            is_collapsed: task.is_collapsed,
            constraint_date: task.constraint_date,
            manual_lane: task.manual_lane,
            early_start: task.early_start,
            early_finish: task.early_finish,
            late_start: task.late_start,
            late_finish: task.late_finish,
            total_float: task.total_float,
            free_float: task.free_float,
            is_critical: task.is_critical,
            is_summary: task.is_summary,
        }
    }
}

impl PyTask {
    fn into_task(self) -> PyResult<Task> {
        let kind: TaskKind = self.kind.parse().map_err(PyValueError::new_err)?;
        Ok(Task {
            id: self.id,
            name: self.name,
            duration: self.duration,
            predecessors: self.predecessors,
            kind,
            zone: self.zone,
            parent_id: self.parent_id,
            is_collapsed: self.is_collapsed,
            constraint_date: self.constraint_date,
            manual_lane: self.manual_lane,
            early_start: self.early_start,
            early_finish: self.early_finish,
            late_start: self.late_start,
            late_finish: self.late_finish,
            total_float: self.total_float,
            free_float: self.free_float,
            is_critical: self.is_critical,
            is_summary: self.is_summary,
        })
    }
}

fn to_tasks(tasks: Vec<PyTask>) -> PyResult<Vec<Task>> {
    tasks.into_iter().map(PyTask::into_task).collect()
}

#[pyclass(name = "LaneAssignment")]
#[derive(Clone, Debug)]
pub struct PyLaneAssignment {
    #[pyo3(get)]
    pub task_id: String,
    #[pyo3(get)]
    pub zone: String,
    #[pyo3(get)]
    pub lane: usize,
    #[pyo3(get)]
    pub row: usize,
}

impl From<LaneAssignment> for PyLaneAssignment {
    fn from(row: LaneAssignment) -> Self {
        Self {
            task_id: row.task_id,
            zone: row.zone,
            lane: row.lane,
            row: row.row,
        }
    }
}

#[pyclass(name = "ZoneMeta")]
#[derive(Clone, Debug)]
pub struct PyZoneMeta {
    #[pyo3(get)]
    pub name: String,
    #[pyo3(get)]
    pub start_row: usize,
    #[pyo3(get)]
    pub row_count: usize,
    #[pyo3(get)]
    pub color: String,
}

impl From<ZoneMeta> for PyZoneMeta {
    fn from(zone: ZoneMeta) -> Self {
        Self {
            name: zone.name,
            start_row: zone.start_row,
            row_count: zone.row_count,
            color: zone.color,
        }
    }
}

/// Solve a task list.
///
/// # Returns
/// * (solved tasks, project duration)
///
/// # Raises
/// * ValueError on a dependency or parent cycle, or an unknown task kind
#[pyfunction]
#[pyo3(signature = (tasks, max_passes=None, verbosity=0))]
fn solve(tasks: Vec<PyTask>, max_passes: Option<usize>, verbosity: u8) -> PyResult<(Vec<PyTask>, i64)> {
    let tasks = to_tasks(tasks)?;
    let config = SolverConfig {
        max_passes,
        verbosity,
    };
    let schedule = crate::cpm::solve_with_config(&tasks, &config)
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    let duration = schedule.project_duration;
    Ok((schedule.tasks.into_iter().map(PyTask::from).collect(), duration))
}

/// Lay out solved tasks into zones and lanes.
#[pyfunction]
#[pyo3(signature = (tasks, zone_order=None, default_zone=None, palette=None, verbosity=0))]
fn layout(
    tasks: Vec<PyTask>,
    zone_order: Option<Vec<String>>,
    default_zone: Option<String>,
    palette: Option<Vec<String>>,
    verbosity: u8,
) -> PyResult<(Vec<PyLaneAssignment>, Vec<PyZoneMeta>)> {
    let tasks = to_tasks(tasks)?;
    let defaults = LayoutConfig::default();
    let config = LayoutConfig {
        default_zone: default_zone.unwrap_or(defaults.default_zone),
        palette: palette.unwrap_or(defaults.palette),
        verbosity,
    };
    let result = crate::layout::layout_with_config(&tasks, zone_order.as_deref(), &config);
    Ok((
        result.rows.into_iter().map(PyLaneAssignment::from).collect(),
        result.zones.into_iter().map(PyZoneMeta::from).collect(),
    ))
}

/// Fold collapsed summaries.
///
/// # Returns
/// * (visible tasks, edges as (predecessor, successor) id pairs)
#[pyfunction]
fn project_collapsed_view(
    tasks: Vec<PyTask>,
    collapsed_ids: HashSet<String>,
) -> PyResult<(Vec<PyTask>, Vec<(String, String)>)> {
    let tasks = to_tasks(tasks)?;
    let collapsed: FxHashSet<String> = collapsed_ids.into_iter().collect();
    let view = crate::layout::project_collapsed_view(&tasks, &collapsed);
    Ok((
        view.visible_tasks.into_iter().map(PyTask::from).collect(),
        view.visible_edges
            .into_iter()
            .map(|edge| (edge.from, edge.to))
            .collect(),
    ))
}

/// Map solved task ids to (start, finish) calendar dates.
#[pyfunction]
fn calendar_dates(
    tasks: Vec<PyTask>,
    project_start: NaiveDate,
) -> PyResult<HashMap<String, (NaiveDate, NaiveDate)>> {
    let tasks = to_tasks(tasks)?;
    Ok(tasks
        .iter()
        .filter_map(|task| {
            calendar_span(task, project_start).map(|span| (task.id.clone(), (span.start, span.finish)))
        })
        .collect())
}

/// The netplan.rust Python module.
#[pymodule]
fn rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyTask>()?;
    m.add_class::<PyLaneAssignment>()?;
    m.add_class::<PyZoneMeta>()?;

    m.add_function(wrap_pyfunction!(solve, m)?)?;
    m.add_function(wrap_pyfunction!(layout, m)?)?;
    m.add_function(wrap_pyfunction!(project_collapsed_view, m)?)?;
    m.add_function(wrap_pyfunction!(calendar_dates, m)?)?;

    Ok(())
}
