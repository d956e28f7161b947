//! Plain-text board rendering for terminals.
//!
//! ```text
//! ~~~~~~~~~~~~~
//!     o o o
//!     o o o
//! o o o o o o o
//! o o o @ o o o
//! o o o . o o o
//!     o * o
//!     o o o
//! Peg count: 31
//! ```
//!
//! `*` marks the cell the last jump started from and `@` where it landed.
//! With colour enabled both keep their normal symbol and are highlighted
//! instead.

use pegsol_core::{Board, Cell, Pos, SIDE};

const PEG: char = 'o';
const HOLE: char = '.';
const OUTSIDE: char = ' ';
const VACATED: char = '*';
const LANDED: char = '@';

const RULE: &str = "~~~~~~~~~~~~~";

// ANSI colours
const HIGHLIGHT_FROM: &str = "\x1b[33m";
const HIGHLIGHT_TO: &str = "\x1b[32m";
const RESET: &str = "\x1b[0m";

/// Rendering switches.
#[derive(Clone, Copy, Debug, Default)]
pub struct RenderOptions {
    /// Highlight the last jump with ANSI colours instead of marker symbols
    pub color: bool,
}

/// Render one board, highlighting the jump that produced it.
pub fn render(board: &Board, options: RenderOptions) -> String {
    let jump = board.last_jump();
    let mut out = String::with_capacity(160);
    out.push_str(RULE);
    out.push('\n');

    for row in 0..SIDE {
        let mut line = String::with_capacity(32);
        for col in 0..SIDE {
            let pos = Pos::from_row_col(row, col);
            if col > 0 {
                line.push(' ');
            }
            let symbol = match board.cell(pos) {
                Cell::Peg => PEG,
                Cell::Empty => HOLE,
                Cell::Invalid => OUTSIDE,
            };
            let is_from = jump.is_some_and(|j| j.from == pos);
            let is_to = jump.is_some_and(|j| j.to == pos);

            match (is_from, is_to, options.color) {
                (true, _, true) => line.push_str(&format!("{HIGHLIGHT_FROM}{symbol}{RESET}")),
                (_, true, true) => line.push_str(&format!("{HIGHLIGHT_TO}{symbol}{RESET}")),
                (true, _, false) => line.push(VACATED),
                (_, true, false) => line.push(LANDED),
                _ => line.push(symbol),
            }
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out.push_str(&format!("Peg count: {}", board.peg_count()));
    out
}

/// Render a solution step with a move header.
///
/// `index` is 1-based; the header is omitted for root boards.
pub fn render_step(index: usize, board: &Board, options: RenderOptions) -> String {
    match board.last_jump() {
        Some(jump) => format!("Move {index}: {jump}\n{}", render(board, options)),
        None => render(board, options),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pegsol_core::{Direction, Jump};

    #[test]
    fn test_render_english_root() {
        let text = render(&Board::english(), RenderOptions::default());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], RULE);
        assert_eq!(lines[1], "    o o o");
        assert_eq!(lines[4], "o o o . o o o");
        assert_eq!(lines[8], "Peg count: 32");
    }

    #[test]
    fn test_render_marks_last_jump() {
        let child = Board::english().apply(Jump::new(Pos(38), Direction::Up).unwrap());
        let text = render(&child, RenderOptions::default());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[4], "o o o @ o o o");
        assert_eq!(lines[5], "o o o . o o o");
        assert_eq!(lines[6], "    o * o");
        assert_eq!(lines[8], "Peg count: 31");
    }

    #[test]
    fn test_render_color_keeps_symbols() {
        let child = Board::english().apply(Jump::new(Pos(38), Direction::Up).unwrap());
        let text = render(&child, RenderOptions { color: true });
        assert!(text.contains(&format!("{HIGHLIGHT_TO}o{RESET}")));
        assert!(text.contains(&format!("{HIGHLIGHT_FROM}.{RESET}")));
        assert!(!text.contains(LANDED));
    }

    #[test]
    fn test_render_step_header() {
        let root = Board::english();
        let child = root.apply(Jump::new(Pos(10), Direction::Down).unwrap());
        let step = render_step(1, &child, RenderOptions::default());
        assert!(step.starts_with("Move 1: (1,3)->(3,3)\n"));
        assert!(render_step(0, &root, RenderOptions::default()).starts_with(RULE));
    }
}
