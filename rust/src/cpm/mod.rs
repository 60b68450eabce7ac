//! Critical Path Method solver.
//!
//! The solver relaxes the dependency network to a fixed point instead of
//! sorting it first, so input order never has to be topological. Each loop is
//! bounded; a network that keeps changing is reported as cyclic.

mod graph;
mod passes;
mod solver;

pub use graph::TaskGraph;
pub use passes::Span;
pub use solver::{solve, solve_with_config, Pass, ScheduleError};
