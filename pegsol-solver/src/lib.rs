//! Peg solitaire solver.
//!
//! Finds a sequence of jumps that leaves a single peg using an iterative
//! depth-first search over a recycling arena of board states, then walks the
//! parent links back to the root to recover the line of play.

pub mod movegen;
pub mod path;
pub mod pool;
pub mod render;
pub mod solver;
pub mod stats;

pub use path::{reconstruct, PathError, Solution};
pub use solver::{solve, Solver, SolverConfig};
pub use stats::SearchStats;
