//! Peg solitaire board logic with bit-mask occupancy.
//!
//! # Board Encoding
//!
//! ```text
//! The 7x7 grid is indexed row-major, cell = row * 7 + col:
//!
//!    0  1  2  3  4  5  6
//!    7  8  9 10 11 12 13
//!   14 15 16 17 18 19 20
//!   21 22 23 24 25 26 27
//!   28 29 30 31 32 33 34
//!   35 36 37 38 39 40 41
//!   42 43 44 45 46 47 48
//!
//! pegs: bit i set when cell i holds a peg
//! area: bit i set when cell i is part of the playing area
//!
//!   Peg     = pegs
//!   Empty   = area & !pegs
//!   Invalid = !area
//! ```
//!
//! # Jumps
//!
//! A jump moves a peg two cells along a row or column over an adjacent peg
//! into an empty cell. The jumped peg is removed, so every jump lowers the
//! peg count by exactly one and flips exactly three bits of `pegs`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Side length of the grid.
pub const SIDE: u8 = 7;

/// Number of cells in the grid.
pub const CELLS: usize = (SIDE as usize) * (SIDE as usize);

/// Mask covering all 49 grid cells.
const GRID_MASK: u64 = (1u64 << CELLS) - 1;

/// State of a single cell.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Occupied cell.
    Peg,
    /// Unoccupied cell inside the playing area.
    Empty,
    /// Cell outside the playing area. Never occupied, never targeted.
    Invalid,
}

/// Position on the 7x7 grid (0-48), row-major.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pos(pub u8);

impl Pos {
    /// Create a position from row and column (0-6 each).
    #[inline]
    pub const fn from_row_col(row: u8, col: u8) -> Pos {
        debug_assert!(row < SIDE && col < SIDE);
        Pos(row * SIDE + col)
    }

    /// Get the row (0-6).
    #[inline]
    pub const fn row(self) -> u8 {
        self.0 / SIDE
    }

    /// Get the column (0-6).
    #[inline]
    pub const fn col(self) -> u8 {
        self.0 % SIDE
    }

    /// Single-bit mask for this cell.
    #[inline]
    pub const fn bit(self) -> u64 {
        1u64 << self.0
    }

    /// Check if this is a valid grid position (0-48).
    #[inline]
    pub const fn is_valid(self) -> bool {
        (self.0 as usize) < CELLS
    }

    /// Step `steps` cells in `direction`.
    ///
    /// Returns None when the result leaves the grid. Rows never wrap.
    #[inline]
    pub const fn offset(self, direction: Direction, steps: u8) -> Option<Pos> {
        let (dr, dc) = direction.delta();
        let row = self.row() as i8 + dr * steps as i8;
        let col = self.col() as i8 + dc * steps as i8;
        if row < 0 || row >= SIDE as i8 || col < 0 || col >= SIDE as i8 {
            return None;
        }
        Some(Pos::from_row_col(row as u8, col as u8))
    }

    /// Iterate over all 49 positions in row-major order.
    pub fn all() -> impl Iterator<Item = Pos> {
        (0..CELLS as u8).map(Pos)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row(), self.col())
    }
}

/// Jump direction.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Down,
    Up,
    Right,
}

impl Direction {
    /// All directions in move-generation order.
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Down,
        Direction::Up,
        Direction::Right,
    ];

    /// (row, col) delta of a single step.
    #[inline]
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Direction::Left => (0, -1),
            Direction::Down => (1, 0),
            Direction::Up => (-1, 0),
            Direction::Right => (0, 1),
        }
    }
}

/// A candidate jump: `from` jumps over `over` and lands on `to`.
///
/// Whether it is legal depends on the board it is applied to; see
/// [`Board::is_legal`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawJump")]
pub struct Jump {
    pub from: Pos,
    pub over: Pos,
    pub to: Pos,
}

impl Jump {
    /// Build the jump starting at `from` in `direction`.
    ///
    /// Returns None if the jumped or landing cell falls outside the grid.
    #[inline]
    pub const fn new(from: Pos, direction: Direction) -> Option<Jump> {
        let over = match from.offset(direction, 1) {
            Some(pos) => pos,
            None => return None,
        };
        let to = match from.offset(direction, 2) {
            Some(pos) => pos,
            None => return None,
        };
        Some(Jump { from, over, to })
    }

    /// Build the jump whose origin and landing cells are `from` and `to`.
    ///
    /// Returns None unless both lie on one row or column exactly two apart.
    pub fn between(from: Pos, to: Pos) -> Option<Jump> {
        Direction::ALL
            .into_iter()
            .find(|&dir| from.offset(dir, 2) == Some(to))
            .and_then(|dir| Jump::new(from, dir))
    }

    /// Direction of travel.
    pub fn direction(&self) -> Direction {
        let (fr, fc) = (self.from.row(), self.from.col());
        let (tr, tc) = (self.to.row(), self.to.col());
        if fr == tr {
            if tc < fc {
                Direction::Left
            } else {
                Direction::Right
            }
        } else if tr > fr {
            Direction::Down
        } else {
            Direction::Up
        }
    }

    /// The three cell patches this jump applies, in order.
    #[inline]
    pub fn patches(&self) -> [(Pos, Cell); 3] {
        [
            (self.from, Cell::Empty),
            (self.over, Cell::Empty),
            (self.to, Cell::Peg),
        ]
    }

    /// Mask of the three cells touched by the jump.
    #[inline]
    pub const fn mask(&self) -> u64 {
        self.from.bit() | self.over.bit() | self.to.bit()
    }
}

impl fmt::Display for Jump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.from, self.to)
    }
}

/// Serialized jump, checked before it becomes a [`Jump`].
#[derive(Deserialize)]
struct RawJump {
    from: Pos,
    over: Pos,
    to: Pos,
}

impl TryFrom<RawJump> for Jump {
    type Error = BoardError;

    fn try_from(raw: RawJump) -> Result<Self, Self::Error> {
        let malformed = BoardError::MalformedJump {
            from: raw.from.0,
            over: raw.over.0,
            to: raw.to.0,
        };
        if !raw.from.is_valid() || !raw.to.is_valid() {
            return Err(malformed);
        }
        match Jump::between(raw.from, raw.to) {
            Some(jump) if jump.over == raw.over => Ok(jump),
            _ => Err(malformed),
        }
    }
}

// ============================================================================
// JUMP LIST - Zero-allocation jump sequence
// ============================================================================

/// Number of distinct jumps that fit on a 7x7 grid (7 lines × 5 starts × 2
/// orientations × 2 directions), an upper bound on legal jumps per board.
pub const MAX_JUMPS: usize = 140;

const PLACEHOLDER: Jump = Jump {
    from: Pos(0),
    over: Pos(0),
    to: Pos(0),
};

/// A fixed-size jump list that avoids heap allocation.
#[derive(Clone, Copy)]
pub struct JumpList {
    jumps: [Jump; MAX_JUMPS],
    len: u8,
}

impl JumpList {
    /// Create an empty jump list.
    #[inline]
    pub const fn new() -> JumpList {
        JumpList {
            jumps: [PLACEHOLDER; MAX_JUMPS],
            len: 0,
        }
    }

    /// Add a jump to the list.
    #[inline]
    pub fn push(&mut self, jump: Jump) {
        debug_assert!((self.len as usize) < MAX_JUMPS);
        self.jumps[self.len as usize] = jump;
        self.len += 1;
    }

    /// Remove all jumps.
    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Get the number of jumps.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    /// Check if empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get a jump by index.
    #[inline]
    pub fn get(&self, idx: usize) -> Option<Jump> {
        self.as_slice().get(idx).copied()
    }

    /// The stored jumps as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[Jump] {
        &self.jumps[..self.len as usize]
    }

    /// Iterate over jumps.
    pub fn iter(&self) -> impl Iterator<Item = Jump> + '_ {
        self.as_slice().iter().copied()
    }
}

impl Default for JumpList {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for JumpList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

// ============================================================================
// LAYOUTS
// ============================================================================

/// Error parsing a text layout.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("layout has {0} rows, at most 7 are allowed")]
    TooManyRows(usize),

    #[error("row {row} has {len} cells, at most 7 are allowed")]
    RowTooLong { row: usize, len: usize },

    #[error("unexpected character {ch:?} at row {row}, column {col}")]
    UnexpectedChar { ch: char, row: usize, col: usize },
}

/// Error rebuilding a board or jump from serialized data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("jump {from} -> {over} -> {to} is not two cells along a row or column")]
    MalformedJump { from: u8, over: u8, to: u8 },

    #[error("playing area {0:#x} extends past the 7x7 grid")]
    AreaOutsideGrid(u64),

    #[error("pegs {pegs:#x} lie outside the playing area {area:#x}")]
    PegsOutsideArea { pegs: u64, area: u64 },

    #[error("cached peg count {cached} does not match the {actual} pegs on the board")]
    PegCountMismatch { cached: u8, actual: u32 },

    #[error("last jump {0} could not have produced this board")]
    InconsistentLastJump(Jump),
}

/// The 33-hole English cross with the centre hole empty.
pub const ENGLISH_ROWS: [&str; 7] = [
    "  ooo  ",
    "  ooo  ",
    "ooooooo",
    "ooo.ooo",
    "ooooooo",
    "  ooo  ",
    "  ooo  ",
];

// ============================================================================
// BOARD
// ============================================================================

/// Board snapshot: occupancy plus the jump that produced it.
///
/// Boards are small `Copy` values. A child is derived from its parent with
/// [`Board::apply`]; the parent link itself is kept by whoever owns the
/// search tree.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "RawBoard")]
pub struct Board {
    pegs: u64,
    area: u64,
    peg_count: u8,
    last_jump: Option<Jump>,
}

impl Board {
    /// Create a root board from raw peg and playing-area masks.
    ///
    /// No shape validation is done here; pegs outside the area are dropped.
    pub fn from_masks(pegs: u64, area: u64) -> Board {
        let area = area & GRID_MASK;
        let pegs = pegs & area;
        Board {
            pegs,
            area,
            peg_count: pegs.count_ones() as u8,
            last_jump: None,
        }
    }

    /// The standard English board: 32 pegs, centre empty.
    pub fn english() -> Board {
        match Board::from_rows(&ENGLISH_ROWS) {
            Ok(board) => board,
            Err(e) => unreachable!("built-in English layout is malformed: {e}"),
        }
    }

    /// Create a root board from a full cell array.
    pub fn from_cells(cells: &[Cell; CELLS]) -> Board {
        let mut pegs = 0u64;
        let mut area = 0u64;
        for (idx, cell) in cells.iter().enumerate() {
            match cell {
                Cell::Peg => {
                    pegs |= 1 << idx;
                    area |= 1 << idx;
                }
                Cell::Empty => area |= 1 << idx,
                Cell::Invalid => {}
            }
        }
        Board::from_masks(pegs, area)
    }

    /// Parse a root board from text rows.
    ///
    /// `o` is a peg, `.` an empty hole, and a space, `x` or `#` marks a cell
    /// outside the playing area. Rows shorter than 7 cells and missing rows
    /// are padded with invalid cells. Connectivity is not checked.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Board, LayoutError> {
        if rows.len() > SIDE as usize {
            return Err(LayoutError::TooManyRows(rows.len()));
        }

        let mut pegs = 0u64;
        let mut area = 0u64;
        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            let len = line.chars().count();
            if len > SIDE as usize {
                return Err(LayoutError::RowTooLong { row, len });
            }
            for (col, ch) in line.chars().enumerate() {
                let bit = Pos::from_row_col(row as u8, col as u8).bit();
                match ch {
                    'o' => {
                        pegs |= bit;
                        area |= bit;
                    }
                    '.' => area |= bit,
                    ' ' | 'x' | '#' => {}
                    _ => return Err(LayoutError::UnexpectedChar { ch, row, col }),
                }
            }
        }
        Ok(Board::from_masks(pegs, area))
    }

    /// Raw peg mask.
    #[inline]
    pub const fn pegs(&self) -> u64 {
        self.pegs
    }

    /// Raw playing-area mask.
    #[inline]
    pub const fn area(&self) -> u64 {
        self.area
    }

    /// Mask of empty in-area cells.
    #[inline]
    pub const fn empties(&self) -> u64 {
        self.area & !self.pegs
    }

    /// Get the state of a cell.
    #[inline]
    pub fn cell(&self, pos: Pos) -> Cell {
        let bit = pos.bit();
        if self.pegs & bit != 0 {
            Cell::Peg
        } else if self.area & bit != 0 {
            Cell::Empty
        } else {
            Cell::Invalid
        }
    }

    /// Cached peg count. O(1).
    #[inline]
    pub const fn peg_count(&self) -> u32 {
        self.peg_count as u32
    }

    /// Recount pegs from the occupancy mask.
    #[inline]
    pub const fn count_pegs(&self) -> u32 {
        self.pegs.count_ones()
    }

    /// Number of cells outside the playing area.
    #[inline]
    pub const fn invalid_count(&self) -> u32 {
        CELLS as u32 - self.area.count_ones()
    }

    /// Exactly one peg left.
    #[inline]
    pub const fn is_terminal(&self) -> bool {
        self.peg_count == 1
    }

    /// The jump that produced this board, None for a root.
    #[inline]
    pub const fn last_jump(&self) -> Option<Jump> {
        self.last_jump
    }

    /// Compare occupancy only, ignoring how each board was reached.
    #[inline]
    pub fn same_occupancy(&self, other: &Board) -> bool {
        self.pegs == other.pegs && self.area == other.area
    }

    // ========== Jumps ==========

    /// Check whether `jump` can be played on this board.
    #[inline]
    pub fn is_legal(&self, jump: Jump) -> bool {
        self.pegs & jump.from.bit() != 0
            && self.pegs & jump.over.bit() != 0
            && self.empties() & jump.to.bit() != 0
    }

    /// Derive the child board produced by `jump`.
    ///
    /// # Panics
    ///
    /// Panics if the jump's origin or jumped cell is not a peg, or its
    /// landing cell is not empty. Move generation only ever produces legal
    /// jumps, so this indicates a logic error.
    #[inline]
    pub fn apply(&self, jump: Jump) -> Board {
        assert!(
            self.is_legal(jump),
            "illegal jump {jump} applied to board with pegs {:#x}",
            self.pegs
        );
        Board {
            pegs: self.pegs ^ jump.mask(),
            area: self.area,
            peg_count: self.peg_count - 1,
            last_jump: Some(jump),
        }
    }

    /// All legal jumps, by cell in row-major order then by
    /// [`Direction::ALL`].
    ///
    /// Straightforward reference version; the solver has its own
    /// table-driven generator.
    pub fn legal_jumps(&self) -> Vec<Jump> {
        let mut jumps = Vec::with_capacity(16);
        for from in Pos::all() {
            if self.cell(from) != Cell::Peg {
                continue;
            }
            for dir in Direction::ALL {
                if let Some(jump) = Jump::new(from, dir) {
                    if self.is_legal(jump) {
                        jumps.push(jump);
                    }
                }
            }
        }
        jumps
    }

    /// Find the legal jump that turns this board into `next`.
    ///
    /// Returns None if the boards differ in shape or are not one jump apart.
    pub fn jump_between(&self, next: &Board) -> Option<Jump> {
        if self.area != next.area {
            return None;
        }
        let diff = self.pegs ^ next.pegs;
        if diff.count_ones() != 3 {
            return None;
        }
        let added = next.pegs & diff;
        if added.count_ones() != 1 {
            return None;
        }
        let to = Pos(added.trailing_zeros() as u8);

        let mut removed = self.pegs & diff;
        while removed != 0 {
            let from = Pos(removed.trailing_zeros() as u8);
            removed &= removed - 1;
            if let Some(jump) = Jump::between(from, to) {
                if jump.mask() == diff && self.is_legal(jump) {
                    return Some(jump);
                }
            }
        }
        None
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::english()
    }
}

impl fmt::Display for Board {
    /// Plain layout in the same notation [`Board::from_rows`] accepts.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..SIDE {
            if row > 0 {
                writeln!(f)?;
            }
            for col in 0..SIDE {
                let ch = match self.cell(Pos::from_row_col(row, col)) {
                    Cell::Peg => 'o',
                    Cell::Empty => '.',
                    Cell::Invalid => ' ',
                };
                write!(f, "{ch}")?;
            }
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = LayoutError;

    /// Parse newline-separated rows; see [`Board::from_rows`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows: Vec<&str> = s.lines().collect();
        Board::from_rows(&rows)
    }
}

/// Serialized board, checked before it becomes a [`Board`].
#[derive(Deserialize)]
struct RawBoard {
    pegs: u64,
    area: u64,
    peg_count: u8,
    last_jump: Option<Jump>,
}

impl TryFrom<RawBoard> for Board {
    type Error = BoardError;

    fn try_from(raw: RawBoard) -> Result<Self, Self::Error> {
        if raw.area & !GRID_MASK != 0 {
            return Err(BoardError::AreaOutsideGrid(raw.area));
        }
        if raw.pegs & !raw.area != 0 {
            return Err(BoardError::PegsOutsideArea {
                pegs: raw.pegs,
                area: raw.area,
            });
        }
        let actual = raw.pegs.count_ones();
        if u32::from(raw.peg_count) != actual {
            return Err(BoardError::PegCountMismatch {
                cached: raw.peg_count,
                actual,
            });
        }

        let board = Board {
            last_jump: raw.last_jump,
            ..Board::from_masks(raw.pegs, raw.area)
        };
        // The jump must have left its origin and jumped cells empty and its
        // landing cell occupied.
        if let Some(jump) = raw.last_jump {
            let empties = board.empties();
            if board.pegs & jump.to.bit() == 0
                || empties & jump.from.bit() == 0
                || empties & jump.over.bit() == 0
            {
                return Err(BoardError::InconsistentLastJump(jump));
            }
        }
        Ok(board)
    }
}
