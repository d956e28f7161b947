//! Iterative depth-first search for a one-peg board.
//!
//! The frontier is an explicit LIFO stack of pool nodes. Each popped board is
//! expanded in full; children are pushed in generation order, so the last
//! generated jump is explored first. There is no closed set: boards reachable
//! along several paths are expanded once per path.
//!
//! Dead ends are released as soon as they are found, which cascades up
//! through ancestors whose subtrees are exhausted. Live memory therefore
//! stays proportional to the frontier and its ancestors rather than to the
//! number of boards visited.

use std::time::Duration;

use log::debug;
use pegsol_core::{Board, JumpList};

use crate::movegen::generate_moves_into;
use crate::path::{reconstruct, Solution};
use crate::pool::{NodeId, StatePool};
use crate::stats::SearchStats;

/// Expansions between progress-timer checks.
const PROGRESS_CHECK_EVERY: u64 = 4096;

/// Tunables for a [`Solver`].
#[derive(Clone, Debug)]
pub struct SolverConfig {
    /// Minimum time between progress log lines
    pub log_interval: Duration,
    /// Initial capacity of the frontier stack and node pool
    pub frontier_capacity: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            log_interval: Duration::from_secs(5),
            frontier_capacity: 256,
        }
    }
}

/// Depth-first solver.
pub struct Solver {
    config: SolverConfig,
    /// Statistics of the most recent search
    pub stats: SearchStats,
}

impl Solver {
    pub fn new() -> Self {
        Self::with_config(SolverConfig::default())
    }

    pub fn with_config(config: SolverConfig) -> Self {
        Self {
            config,
            stats: SearchStats::new(0),
        }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Search for a sequence of jumps leaving exactly one peg.
    ///
    /// Returns None when every board reachable from `root` has been explored
    /// without reaching one peg. The result is deterministic for a given
    /// root.
    pub fn solve(&mut self, root: Board) -> Option<Solution> {
        self.stats = SearchStats::new(root.peg_count());
        debug!(
            "search start: {} pegs, {} invalid cells",
            root.peg_count(),
            root.invalid_count()
        );

        let mut pool = StatePool::with_capacity(self.config.frontier_capacity);
        let root_id = pool.acquire(root, None);

        let terminal = if root.is_terminal() {
            Some(root_id)
        } else {
            self.search(&mut pool, root_id)
        };

        self.stats.finish(terminal.is_some(), pool.live(), pool.stats());

        match terminal {
            Some(id) => {
                let solution = Solution::new(reconstruct(&pool, id));
                debug!(
                    "search solved in {} jumps after {} expansions",
                    solution.len(),
                    self.stats.expanded
                );
                Some(solution)
            }
            None => {
                debug!(
                    "search exhausted after {} expansions, fewest pegs {}",
                    self.stats.expanded, self.stats.min_pegs
                );
                None
            }
        }
    }

    /// Run the frontier loop. Returns the node of the first one-peg board.
    fn search(&mut self, pool: &mut StatePool, root: NodeId) -> Option<NodeId> {
        let mut frontier: Vec<NodeId> = Vec::with_capacity(self.config.frontier_capacity);
        frontier.push(root);

        let mut jumps = JumpList::new();

        while let Some(id) = frontier.pop() {
            let board = *pool.board(id);
            generate_moves_into(&board, &mut jumps);
            self.stats.expanded += 1;

            if self.stats.expanded % PROGRESS_CHECK_EVERY == 0
                && self.stats.should_log(self.config.log_interval)
            {
                self.stats.log_progress(frontier.len(), pool.live(), pool.stats());
            }

            if jumps.is_empty() {
                self.stats.dead_ends += 1;
                pool.release(id);
                continue;
            }

            for jump in jumps.iter() {
                let child = board.apply(jump);
                let child_id = pool.acquire(child, Some(id));
                self.stats.record_child(child.peg_count());

                if child.is_terminal() {
                    return Some(child_id);
                }
                frontier.push(child_id);
            }

            self.stats.max_frontier = self.stats.max_frontier.max(frontier.len());
        }

        None
    }
}

impl Default for Solver {
    fn default() -> Self {
        Self::new()
    }
}

/// Solve `root` with the default configuration.
pub fn solve(root: Board) -> Option<Solution> {
    Solver::new().solve(root)
}
