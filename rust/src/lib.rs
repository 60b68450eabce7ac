//! Scheduling and layout engine for construction activity networks.
//!
//! - [`cpm`]: Critical Path Method solver with summary rollup and manual
//!   constraints.
//! - [`layout`]: zone-partitioned lane assignment and the collapsed-view
//!   projection.
//! - [`calendar`]: offsets to calendar dates.
//!
//! Every entry point takes an immutable task snapshot and returns a new one.

// Allow clippy warning triggered by PyO3 macro expansion
#![cfg_attr(feature = "python", allow(clippy::useless_conversion))]

pub mod calendar;
mod config;
pub mod cpm;
pub mod layout;
pub mod logging;
mod models;
#[cfg(feature = "python")]
mod python;

pub use calendar::{calendar_span, constraint_offset, project_finish, CalendarSpan};
pub use config::{LayoutConfig, SolverConfig, DEFAULT_PALETTE, DEFAULT_ZONE};
pub use cpm::{solve, solve_with_config, Pass, ScheduleError};
pub use layout::{collapsed_ids, layout, layout_with_config, project_collapsed_view};
pub use models::{CollapsedView, Edge, LaneAssignment, Layout, Schedule, Task, TaskKind, ZoneMeta};
