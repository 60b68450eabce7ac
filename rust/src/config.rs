//! Configuration types for the solver and the layout engine.

/// Zone label used for tasks without one.
pub const DEFAULT_ZONE: &str = "General";

/// Zone colors, assigned cyclically by display position.
pub const DEFAULT_PALETTE: [&str; 8] = [
    "#4e79a7", "#f28e2b", "#59a14f", "#e15759", "#76b7b2", "#edc948", "#b07aa1", "#9c755f",
];

/// Configuration for the CPM solver.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SolverConfig {
    /// Pass limit for each fixed-point loop. `None` = task count + 2.
    pub max_passes: Option<usize>,
    /// Verbosity level: 0=silent, 1=summary, 2=passes, 3=debug.
    pub verbosity: u8,
}

impl SolverConfig {
    /// Effective pass limit for a snapshot of `task_count` tasks.
    ///
    /// An acyclic network of n tasks settles in at most n passes, plus one
    /// pass to observe that nothing changed.
    pub fn pass_limit(&self, task_count: usize) -> usize {
        self.max_passes.unwrap_or(task_count + 2).max(1)
    }
}

/// Configuration for the layout engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutConfig {
    /// Zone assigned to tasks with a missing or empty zone.
    pub default_zone: String,
    /// Zone colors. An empty palette yields empty color strings.
    pub palette: Vec<String>,
    /// Verbosity level: 0=silent, 1=summary, 2=passes, 3=debug.
    pub verbosity: u8,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            default_zone: DEFAULT_ZONE.to_string(),
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
            verbosity: 0,
        }
    }
}

impl LayoutConfig {
    /// Color for the zone at `position` in display order.
    pub fn zone_color(&self, position: usize) -> String {
        if self.palette.is_empty() {
            return String::new();
        }
        self.palette[position % self.palette.len()].clone()
    }
}
