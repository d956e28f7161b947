//! Rule invariants over random playouts.
//!
//! Plays seeded random games from several starting layouts and checks, after
//! every jump, the properties the solver relies on:
//! - the cached peg count drops by exactly one and matches a recount
//! - invalid cells never change
//! - each parent/child pair is connected by exactly the jump that was played

use pegsol_core::{Board, Cell, Direction, Jump, Pos, CELLS};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const PLAYOUTS: u64 = 200;

fn starting_layouts() -> Vec<Board> {
    vec![
        Board::english(),
        Board::from_rows(&[
            "  ooo  ",
            " ooooo ",
            "ooooooo",
            "ooo.ooo",
            "ooooooo",
            " ooooo ",
            "  ooo  ",
        ])
        .unwrap(),
        Board::from_rows(&["ooooooo"; 7]).unwrap(),
        Board::from_rows(&["o.ooo", "ooooo", "oo.oo"]).unwrap(),
    ]
}

fn invalid_cells(board: &Board) -> Vec<Pos> {
    Pos::all()
        .filter(|&pos| board.cell(pos) == Cell::Invalid)
        .collect()
}

#[test]
fn random_playouts_keep_invariants() {
    for (layout_idx, root) in starting_layouts().into_iter().enumerate() {
        let invalid = invalid_cells(&root);

        for seed in 0..PLAYOUTS {
            let mut rng = StdRng::seed_from_u64(seed * 31 + layout_idx as u64);
            let mut board = root;

            loop {
                let jumps = board.legal_jumps();
                if jumps.is_empty() {
                    break;
                }
                let jump = jumps[rng.random_range(0..jumps.len())];
                let child = board.apply(jump);

                assert_eq!(child.peg_count(), board.peg_count() - 1);
                assert_eq!(child.peg_count(), child.count_pegs());
                assert_eq!(child.invalid_count(), root.invalid_count());
                assert_eq!(invalid_cells(&child), invalid);
                assert_eq!(board.jump_between(&child), Some(jump));
                assert_eq!(child.last_jump(), Some(jump));

                board = child;
            }

            assert!(board.peg_count() >= 1);
            assert!(board.legal_jumps().is_empty());
        }
    }
}

#[test]
fn legal_jumps_never_touch_invalid_cells() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..500 {
        let mut cells = [Cell::Invalid; CELLS];
        for cell in cells.iter_mut() {
            *cell = match rng.random_range(0..3) {
                0 => Cell::Peg,
                1 => Cell::Empty,
                _ => Cell::Invalid,
            };
        }
        let board = Board::from_cells(&cells);

        for jump in board.legal_jumps() {
            for (pos, _) in jump.patches() {
                assert_ne!(board.cell(pos), Cell::Invalid, "jump {jump} touches {pos}");
            }
            assert!(board.is_legal(jump));
        }
    }
}

#[test]
fn legal_jumps_are_complete() {
    // Every in-grid jump that satisfies the legality rule must be listed.
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..200 {
        let pegs: u64 = rng.random();
        let area: u64 = rng.random::<u64>() | pegs;
        let board = Board::from_masks(pegs, area);
        let listed = board.legal_jumps();

        let mut expected = 0;
        for from in Pos::all() {
            for dir in Direction::ALL {
                if let Some(jump) = Jump::new(from, dir) {
                    if board.is_legal(jump) {
                        expected += 1;
                        assert!(listed.contains(&jump));
                    }
                }
            }
        }
        assert_eq!(listed.len(), expected);
    }
}

#[test]
fn board_serializes_with_last_jump() {
    let child = Board::english().apply(Jump::new(Pos(10), Direction::Down).unwrap());
    let json = serde_json::to_string(&child).unwrap();
    let back: Board = serde_json::from_str(&json).unwrap();
    assert_eq!(back, child);
    assert_eq!(back.peg_count(), 31);
}

#[test]
fn board_rejects_stale_peg_count() {
    let stale = r#"{"pegs":3,"area":7,"peg_count":0,"last_jump":null}"#;
    let err = serde_json::from_str::<Board>(stale).unwrap_err();
    assert!(err.to_string().contains("peg count"), "{err}");

    let board: Board =
        serde_json::from_str(r#"{"pegs":3,"area":7,"peg_count":2,"last_jump":null}"#).unwrap();
    assert_eq!(board.peg_count(), board.count_pegs());
    assert_eq!(board.legal_jumps().len(), 1);
}

#[test]
fn board_rejects_masks_outside_area_or_grid() {
    let outside = r#"{"pegs":8,"area":7,"peg_count":1,"last_jump":null}"#;
    assert!(serde_json::from_str::<Board>(outside).is_err());
    let json = format!(r#"{{"pegs":0,"area":{},"peg_count":0,"last_jump":null}}"#, 1u64 << CELLS);
    assert!(serde_json::from_str::<Board>(&json).is_err());
}

#[test]
fn board_rejects_inconsistent_last_jump() {
    let child = Board::english().apply(Jump::new(Pos(10), Direction::Down).unwrap());
    let mut value = serde_json::to_value(child).unwrap();

    // (5,3) is still occupied, so (5,3)->(3,3) cannot have been played.
    value["last_jump"] = serde_json::json!({"from": 38, "over": 31, "to": 24});
    assert!(serde_json::from_value::<Board>(value.clone()).is_err());

    // Not a straight two-cell jump.
    value["last_jump"] = serde_json::json!({"from": 10, "over": 17, "to": 31});
    assert!(serde_json::from_value::<Board>(value.clone()).is_err());

    // Off the grid.
    value["last_jump"] = serde_json::json!({"from": 60, "over": 53, "to": 46});
    assert!(serde_json::from_value::<Board>(value).is_err());
}
