//! Solution path reconstruction.

use pegsol_core::{Board, Jump};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pool::{NodeId, StatePool};

/// Walk parent links from `terminal` up to the root.
///
/// Returns the boards ordered root first, `terminal` last.
pub fn reconstruct(pool: &StatePool, terminal: NodeId) -> Vec<Board> {
    let mut boards = Vec::new();
    let mut current = Some(terminal);
    while let Some(id) = current {
        boards.push(*pool.board(id));
        current = pool.parent(id);
    }
    boards.reverse();
    boards
}

/// Error checking a solution path that did not come from the search.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("solution path has no boards")]
    Empty,

    #[error("board {step} does not follow from the board before it by its recorded jump")]
    Disconnected { step: usize },
}

/// A winning line of play: boards from the root to a one-peg board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSolution")]
pub struct Solution {
    boards: Vec<Board>,
}

#[derive(Deserialize)]
struct RawSolution {
    boards: Vec<Board>,
}

impl TryFrom<RawSolution> for Solution {
    type Error = PathError;

    fn try_from(raw: RawSolution) -> Result<Self, Self::Error> {
        Solution::try_from(raw.boards)
    }
}

impl TryFrom<Vec<Board>> for Solution {
    type Error = PathError;

    /// Accept a path only if it is non-empty and every board follows from
    /// the one before it by the jump it records.
    fn try_from(boards: Vec<Board>) -> Result<Self, Self::Error> {
        if boards.is_empty() {
            return Err(PathError::Empty);
        }
        for (idx, pair) in boards.windows(2).enumerate() {
            let (prev, next) = (&pair[0], &pair[1]);
            match prev.jump_between(next) {
                Some(jump) if next.last_jump() == Some(jump) => {}
                _ => return Err(PathError::Disconnected { step: idx + 1 }),
            }
        }
        Ok(Self { boards })
    }
}

impl Solution {
    /// Wrap a reconstructed root-to-terminal sequence.
    ///
    /// # Panics
    ///
    /// Panics if `boards` is empty.
    pub fn new(boards: Vec<Board>) -> Self {
        assert!(!boards.is_empty(), "solution path needs at least the root");
        Self { boards }
    }

    /// Every board on the path, root included.
    pub fn boards(&self) -> &[Board] {
        &self.boards
    }

    /// Boards after the root, one per jump.
    pub fn steps(&self) -> &[Board] {
        &self.boards[1..]
    }

    /// Number of jumps.
    pub fn len(&self) -> usize {
        self.boards.len() - 1
    }

    /// True when the root itself was already solved.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn root(&self) -> &Board {
        &self.boards[0]
    }

    pub fn terminal(&self) -> &Board {
        &self.boards[self.boards.len() - 1]
    }

    /// The jumps played, in order.
    pub fn jumps(&self) -> impl Iterator<Item = Jump> + '_ {
        self.steps().iter().filter_map(|board| board.last_jump())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pegsol_core::{Direction, Pos};

    #[test]
    fn test_reconstruct_orders_root_first() {
        let mut pool = StatePool::new();
        let root_board = Board::english();
        let a_board = root_board.apply(Jump::new(Pos(38), Direction::Up).unwrap());
        let b_board = a_board.apply(Jump::new(Pos(29), Direction::Right).unwrap());

        let root = pool.acquire(root_board, None);
        let a = pool.acquire(a_board, Some(root));
        // A sibling that is not on the path.
        pool.acquire(a_board.apply(Jump::new(Pos(33), Direction::Left).unwrap()), Some(a));
        let b = pool.acquire(b_board, Some(a));

        let path = reconstruct(&pool, b);
        assert_eq!(path, vec![root_board, a_board, b_board]);
    }

    #[test]
    fn test_reconstruct_root_only() {
        let mut pool = StatePool::new();
        let root_board = Board::from_rows(&["o"]).unwrap();
        let root = pool.acquire(root_board, None);

        let solution = Solution::new(reconstruct(&pool, root));
        assert_eq!(solution.boards().len(), 1);
        assert_eq!(solution.len(), 0);
        assert!(solution.is_empty());
        assert!(solution.steps().is_empty());
        assert_eq!(solution.root(), solution.terminal());
    }

    #[test]
    fn test_solution_jumps() {
        let root = Board::from_rows(&[".oo.o"]).unwrap();
        let first = Jump::new(Pos(1), Direction::Right).unwrap();
        let second = Jump::new(Pos(4), Direction::Left).unwrap();
        let mid = root.apply(first);
        let end = mid.apply(second);

        let solution = Solution::new(vec![root, mid, end]);
        assert_eq!(solution.len(), 2);
        assert_eq!(solution.jumps().collect::<Vec<_>>(), vec![first, second]);
        assert!(solution.terminal().is_terminal());
    }
}
