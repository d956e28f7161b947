//! Table-driven jump generator.
//!
//! Every possible jump on the 7x7 grid is precomputed per origin cell at
//! compile time. Directions that would leave the grid have no entry, so
//! generation never reads outside the grid and never wraps across rows.
//!
//! Emission order: origin cells in row-major order, then
//! [`Direction::ALL`] (left, down, up, right) for each origin. The search
//! driver depends on this order for reproducible results.

use pegsol_core::{Board, Direction, Jump, JumpList, Pos, CELLS};

/// Candidate jumps per origin cell, indexed like [`Direction::ALL`].
const JUMP_TABLE: [[Option<Jump>; 4]; CELLS] = build_jump_table();

const fn build_jump_table() -> [[Option<Jump>; 4]; CELLS] {
    let mut table = [[None; 4]; CELLS];
    let mut cell = 0;
    while cell < CELLS {
        let mut dir = 0;
        while dir < 4 {
            table[cell][dir] = Jump::new(Pos(cell as u8), Direction::ALL[dir]);
            dir += 1;
        }
        cell += 1;
    }
    table
}

/// Generate all legal jumps for `board`.
pub fn generate_moves(board: &Board) -> JumpList {
    let mut jumps = JumpList::new();
    generate_moves_into(board, &mut jumps);
    jumps
}

/// Generate all legal jumps for `board` into a reusable buffer.
///
/// The buffer is cleared first.
pub fn generate_moves_into(board: &Board, jumps: &mut JumpList) {
    jumps.clear();

    let pegs = board.pegs();
    let empties = board.empties();

    let mut remaining = pegs;
    while remaining != 0 {
        let cell = remaining.trailing_zeros() as usize;
        remaining &= remaining - 1;

        for jump in JUMP_TABLE[cell].iter().flatten() {
            if pegs & jump.over.bit() != 0 && empties & jump.to.bit() != 0 {
                jumps.push(*jump);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pegsol_core::Cell;

    #[test]
    fn test_table_has_no_wrapping_jumps() {
        for (cell, entries) in JUMP_TABLE.iter().enumerate() {
            let from = Pos(cell as u8);
            for jump in entries.iter().flatten() {
                assert_eq!(jump.from, from);
                let same_row = jump.to.row() == from.row() && jump.over.row() == from.row();
                let same_col = jump.to.col() == from.col() && jump.over.col() == from.col();
                assert!(same_row || same_col, "wrapping jump {jump}");
            }
        }
    }

    #[test]
    fn test_initial_position_move_count() {
        let jumps = generate_moves(&Board::english());
        // Four jumps into the centre hole.
        assert_eq!(jumps.len(), 4);
        assert!(jumps.iter().all(|j| j.to == Pos(24)));
    }

    #[test]
    fn test_generator_vs_legal_jumps() {
        let mut board = Board::english();
        let mut buffer = JumpList::new();

        // Follow the first generated jump down to a dead end, comparing
        // against the reference enumerator at every step.
        loop {
            generate_moves_into(&board, &mut buffer);
            assert_eq!(buffer.as_slice(), board.legal_jumps().as_slice());
            match buffer.get(0) {
                Some(jump) => board = board.apply(jump),
                None => break,
            }
        }
        assert!(board.peg_count() < 32);
    }

    #[test]
    fn test_emission_order_left_down_up_right() {
        // A single peg surrounded by pegs and then holes in all directions.
        let board = Board::from_rows(&["  .  ", "  o  ", ".ooo.", "  o  ", "  .  "]).unwrap();
        let centre = Pos::from_row_col(2, 2);
        let dirs: Vec<Direction> = generate_moves(&board)
            .iter()
            .filter(|j| j.from == centre)
            .map(|j| j.direction())
            .collect();
        assert_eq!(dirs, Direction::ALL.to_vec());
    }

    #[test]
    fn test_no_moves_through_invalid_cells() {
        // Pegs at the grid edge next to invalid cells.
        let board = Board::from_rows(&["oo x", "o   ", "x   "]).unwrap();
        assert!(generate_moves(&board).is_empty());
        assert_eq!(board.cell(Pos(2)), Cell::Invalid);
    }

    #[test]
    fn test_right_edge_does_not_wrap() {
        // (0,5),(0,6) pegs and (1,0) empty: a wrapping generator would jump
        // from (0,5) over (0,6) onto (1,0).
        let board = Board::from_rows(&["     oo", "."]).unwrap();
        assert!(generate_moves(&board).is_empty());
    }
}
