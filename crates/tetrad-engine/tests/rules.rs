//! Rule-level tests for the engine, run across every allowed board size
//! where the rule does not depend on it.

use tetrad_engine::{
    Board, BoardSize, Color, EngineError, GameEngine, Pawn, Pos, Posture, Winner, Zone,
};

// =========================================================================
// Helpers
// =========================================================================

fn sizes() -> impl Iterator<Item = BoardSize> {
    BoardSize::ALLOWED.into_iter().filter_map(BoardSize::new)
}

fn empty(side: usize) -> Board {
    Board::new(BoardSize::new(side).expect("allowed size"))
}

fn color_at(engine: &GameEngine, r: usize, c: usize) -> Option<Color> {
    engine.board().get(Pos::new(r, c)).map(|p| p.color)
}

// =========================================================================
// Zone legality
// =========================================================================

#[test]
fn test_interior_cells_always_placeable_when_empty() {
    for size in sizes() {
        let engine = GameEngine::new(size);
        let board = engine.board();
        for pos in board.positions() {
            let expected = board.zone(pos) == Zone::Interior;
            assert_eq!(
                engine.is_valid_placement(pos),
                expected,
                "size {} pos {pos}",
                size.get()
            );
        }
    }
}

#[test]
fn test_pre_border_needs_occupied_interior_neighbor() {
    for size in sizes() {
        let board = empty(size.get()).with(Pos::new(2, 4), Pawn::old(Color::B));
        let engine = GameEngine::from_position(board, Color::A);

        assert!(engine.is_valid_placement(Pos::new(1, 3)));
        assert!(engine.is_valid_placement(Pos::new(1, 4)));
        assert!(engine.is_valid_placement(Pos::new(1, 5)));
        assert!(!engine.is_valid_placement(Pos::new(1, 6)));
        assert!(!engine.is_valid_placement(Pos::new(1, 2)));
    }
}

#[test]
fn test_pre_border_neighbor_does_not_anchor_pre_border() {
    for size in sizes() {
        let board = empty(size.get()).with(Pos::new(1, 4), Pawn::old(Color::B));
        let engine = GameEngine::from_position(board, Color::A);

        assert_eq!(engine.board().zone(Pos::new(1, 5)), Zone::PreBorder);
        assert!(!engine.is_valid_placement(Pos::new(1, 5)));
    }
}

#[test]
fn test_border_needs_occupied_pre_border_neighbor() {
    for size in sizes() {
        let side = size.get();
        let last = side - 1;
        let board = empty(side)
            .with(Pos::new(1, 4), Pawn::old(Color::C))
            .with(Pos::new(4, 2), Pawn::old(Color::C));
        let engine = GameEngine::from_position(board, Color::A);

        assert!(engine.is_valid_placement(Pos::new(0, 3)));
        assert!(engine.is_valid_placement(Pos::new(0, 5)));
        assert!(!engine.is_valid_placement(Pos::new(0, 6)));
        // (4, 2) is interior: it anchors nothing on the border.
        assert!(!engine.is_valid_placement(Pos::new(4, 0)));
        assert!(!engine.is_valid_placement(Pos::new(last, 4)));
    }
}

#[test]
fn test_corner_needs_its_diagonal_neighbor() {
    for size in sizes() {
        let last = size.get() - 1;
        let corners = [
            Pos::new(0, 0),
            Pos::new(0, last),
            Pos::new(last, 0),
            Pos::new(last, last),
        ];

        for corner in corners {
            let board = empty(size.get());
            let anchor = board.corner_anchor(corner);

            // Every other neighbor occupied, anchor empty: still illegal.
            let mut crowded = board.clone();
            for n in board.neighbors(corner).filter(|&n| n != anchor) {
                crowded.set(n, Some(Pawn::old(Color::B)));
            }
            let engine = GameEngine::from_position(crowded, Color::A);
            assert!(!engine.is_valid_placement(corner), "corner {corner}");

            let anchored = board.with(anchor, Pawn::old(Color::B));
            let engine = GameEngine::from_position(anchored, Color::A);
            assert!(engine.is_valid_placement(corner), "corner {corner}");
        }
    }
}

#[test]
fn test_occupied_cell_is_never_placeable() {
    let board = empty(9).with(Pos::new(4, 4), Pawn::old(Color::D));
    let engine = GameEngine::from_position(board, Color::A);
    assert!(!engine.is_valid_placement(Pos::new(4, 4)));
}

// =========================================================================
// Second placement spacing
// =========================================================================

#[test]
fn test_second_placement_must_be_three_away() {
    let mut engine = GameEngine::from_position(empty(15), Color::A);
    engine.place_pawn(Pos::new(7, 7)).unwrap();

    for pos in [Pos::new(7, 9), Pos::new(5, 5), Pos::new(9, 8), Pos::new(6, 7)] {
        assert_eq!(
            engine.place_pawn(pos),
            Err(EngineError::InvalidMove(pos)),
            "{pos} is closer than 3"
        );
    }
    assert_eq!(engine.placements_left(), 1);

    let placement = engine.place_pawn(Pos::new(7, 10)).unwrap();
    assert!(placement.turn_ended);
    assert_eq!(engine.current_color(), Color::B);
}

#[test]
fn test_spacing_applies_regardless_of_zone() {
    let board = empty(13).with(Pos::new(2, 2), Pawn::old(Color::B));
    let mut engine = GameEngine::from_position(board, Color::A);
    engine.place_pawn(Pos::new(3, 3)).unwrap();

    // (1, 1) is a pre-border cell anchored by (2, 2), but too close.
    assert_eq!(engine.board().zone(Pos::new(1, 1)), Zone::PreBorder);
    assert!(!engine.is_valid_placement(Pos::new(1, 1)));
}

// =========================================================================
// Turn flow
// =========================================================================

#[test]
fn test_opening_turn_is_a_single_placement() {
    let mut engine = GameEngine::new(BoardSize::new(13).unwrap());
    let placement = engine.place_pawn(Pos::new(6, 6)).unwrap();

    assert!(placement.turn_ended);
    assert_eq!(color_at(&engine, 6, 6), Some(Color::A));
    assert_eq!(engine.current_color(), Color::B);
    assert_eq!(engine.placements_left(), 2);
}

#[test]
fn test_turn_skips_unplayable_second_placement() {
    // On a 9 board the interior is 5x5, so after a central pawn no
    // interior cell is three away, and nothing else is anchored.
    let mut engine = GameEngine::from_position(empty(9), Color::B);
    let placement = engine.place_pawn(Pos::new(4, 4)).unwrap();

    assert!(placement.turn_ended);
    assert_eq!(engine.current_color(), Color::C);
    assert_eq!(engine.placements_left(), 2);
    assert_eq!(engine.winner(), None);
}

#[test]
fn test_no_legal_placement_for_next_color_is_a_draw() {
    let mut board = empty(9);
    for pos in board.positions().collect::<Vec<_>>() {
        if pos != Pos::new(4, 4) {
            board.set(pos, Some(Pawn::old(Color::B)));
        }
    }
    let mut engine = GameEngine::from_position(board, Color::A);

    let placement = engine.place_pawn(Pos::new(4, 4)).unwrap();
    assert!(placement.converted.is_empty());
    assert!(placement.turn_ended);
    assert_eq!(placement.decided, Some(Winner::Draw));
    assert_eq!(engine.winner(), Some(Winner::Draw));
    assert_eq!(engine.winning_path(), None);
}

// =========================================================================
// Conversion
// =========================================================================

#[test]
fn test_pincer_converts_whole_line() {
    let board = empty(13)
        .with(Pos::new(5, 4), Pawn::old(Color::A))
        .with(Pos::new(5, 5), Pawn::old(Color::B))
        .with(Pos::new(5, 6), Pawn::old(Color::B))
        .with(Pos::new(5, 7), Pawn::old(Color::B));
    let mut engine = GameEngine::from_position(board, Color::A);

    let placement = engine.place_pawn(Pos::new(5, 8)).unwrap();

    assert_eq!(
        placement.converted,
        vec![Pos::new(5, 7), Pos::new(5, 6), Pos::new(5, 5)]
    );
    for c in 5..=7 {
        let pawn = engine.board().get(Pos::new(5, c)).unwrap();
        assert_eq!(pawn.color, Color::A);
        assert_eq!(pawn.prev_color, Some(Color::B));
        assert_eq!(pawn.posture, Posture::Old);
    }
    assert_eq!(engine.board().count(Color::B), 0);
}

#[test]
fn test_mixed_colors_block_capture() {
    let board = empty(13)
        .with(Pos::new(5, 2), Pawn::old(Color::A))
        .with(Pos::new(5, 3), Pawn::old(Color::B))
        .with(Pos::new(5, 4), Pawn::old(Color::D));
    let mut engine = GameEngine::from_position(board, Color::A);

    let placement = engine.place_pawn(Pos::new(5, 5)).unwrap();
    assert!(placement.converted.is_empty());
    assert_eq!(color_at(&engine, 5, 3), Some(Color::B));
    assert_eq!(color_at(&engine, 5, 4), Some(Color::D));
}

#[test]
fn test_gap_blocks_capture() {
    let board = empty(13)
        .with(Pos::new(5, 2), Pawn::old(Color::A))
        .with(Pos::new(5, 3), Pawn::old(Color::B));
    let mut engine = GameEngine::from_position(board, Color::A);

    let placement = engine.place_pawn(Pos::new(5, 5)).unwrap();
    assert!(placement.converted.is_empty());
    assert_eq!(color_at(&engine, 5, 3), Some(Color::B));
}

#[test]
fn test_line_running_off_the_board_is_not_captured() {
    let board = empty(9)
        .with(Pos::new(4, 3), Pawn::old(Color::B))
        .with(Pos::new(4, 2), Pawn::old(Color::B))
        .with(Pos::new(4, 1), Pawn::old(Color::B))
        .with(Pos::new(4, 0), Pawn::old(Color::B));
    let mut engine = GameEngine::from_position(board, Color::A);

    let placement = engine.place_pawn(Pos::new(4, 4)).unwrap();
    assert!(placement.converted.is_empty());
}

#[test]
fn test_teammate_line_is_still_an_enemy_line() {
    let board = empty(13)
        .with(Pos::new(6, 3), Pawn::old(Color::A))
        .with(Pos::new(6, 4), Pawn::old(Color::C));
    let mut engine = GameEngine::from_position(board, Color::A);

    let placement = engine.place_pawn(Pos::new(6, 5)).unwrap();
    assert_eq!(placement.converted, vec![Pos::new(6, 4)]);
    assert_eq!(color_at(&engine, 6, 4), Some(Color::A));
}

#[test]
fn test_one_placement_converts_several_directions() {
    let board = empty(13)
        .with(Pos::new(6, 3), Pawn::old(Color::A))
        .with(Pos::new(6, 4), Pawn::old(Color::B))
        .with(Pos::new(3, 5), Pawn::old(Color::A))
        .with(Pos::new(4, 5), Pawn::old(Color::D))
        .with(Pos::new(5, 5), Pawn::old(Color::D))
        .with(Pos::new(8, 7), Pawn::old(Color::A))
        .with(Pos::new(7, 6), Pawn::old(Color::C));
    let mut engine = GameEngine::from_position(board, Color::A);

    let placement = engine.place_pawn(Pos::new(6, 5)).unwrap();
    assert_eq!(placement.converted.len(), 4);
    for (r, c) in [(6, 4), (4, 5), (5, 5), (7, 6)] {
        assert_eq!(color_at(&engine, r, c), Some(Color::A), "({r}, {c})");
    }
}

#[test]
fn test_new_pawn_halts_the_walk() {
    let board = empty(13)
        .with(Pos::new(5, 4), Pawn::old(Color::A))
        .with(Pos::new(5, 5), Pawn::new(Color::B));
    let mut engine = GameEngine::from_position(board, Color::A);

    let placement = engine.place_pawn(Pos::new(5, 6)).unwrap();
    assert!(placement.converted.is_empty());
    assert_eq!(color_at(&engine, 5, 5), Some(Color::B));
}

#[test]
fn test_new_pawn_loses_immunity_when_its_color_moves_again() {
    // B's pawn at (5, 5) was placed on B's last turn. A, C, and D cannot
    // take it until B's next turn starts.
    let board = empty(13)
        .with(Pos::new(5, 4), Pawn::old(Color::A))
        .with(Pos::new(5, 5), Pawn::new(Color::B));
    let mut engine = GameEngine::from_position(board, Color::C);

    // C and D play far away; the B pawn stays NEW throughout.
    engine.place_pawn(Pos::new(10, 10)).unwrap();
    engine.place_pawn(Pos::new(10, 2)).unwrap();
    engine.place_pawn(Pos::new(2, 10)).unwrap();
    engine.place_pawn(Pos::new(8, 2)).unwrap();
    assert_eq!(engine.current_color(), Color::A);
    assert_eq!(
        engine.board().get(Pos::new(5, 5)).unwrap().posture,
        Posture::New
    );

    // A's turn: bracketing the NEW pawn does nothing.
    let placement = engine.place_pawn(Pos::new(5, 6)).unwrap();
    assert!(placement.converted.is_empty());
    engine.place_pawn(Pos::new(2, 2)).unwrap();

    // B's turn begins: the pawn turns OLD.
    assert_eq!(engine.current_color(), Color::B);
    assert_eq!(
        engine.board().get(Pos::new(5, 5)).unwrap().posture,
        Posture::Old
    );
}

#[test]
fn test_aged_pawn_can_be_captured() {
    let board = empty(13)
        .with(Pos::new(5, 4), Pawn::old(Color::A))
        .with(Pos::new(5, 5), Pawn::new(Color::B));
    let mut engine = GameEngine::from_position(board, Color::A);

    // A: two quiet placements, then B's turn ages (5, 5).
    engine.place_pawn(Pos::new(9, 9)).unwrap();
    engine.place_pawn(Pos::new(2, 2)).unwrap();
    assert_eq!(
        engine.board().get(Pos::new(5, 5)).unwrap().posture,
        Posture::Old
    );

    // B, C, D play elsewhere.
    for pos in [
        Pos::new(9, 2),
        Pos::new(2, 9),
        Pos::new(10, 10),
        Pos::new(6, 10),
        Pos::new(3, 6),
        Pos::new(8, 6),
    ] {
        engine.place_pawn(pos).unwrap();
    }
    assert_eq!(engine.current_color(), Color::A);

    let placement = engine.place_pawn(Pos::new(5, 6)).unwrap();
    assert_eq!(placement.converted, vec![Pos::new(5, 5)]);
    assert_eq!(color_at(&engine, 5, 5), Some(Color::A));
}

// =========================================================================
// Win detection
// =========================================================================

#[test]
fn test_top_to_bottom_chain_wins() {
    let mut board = empty(9);
    for r in 0..8 {
        board.set(Pos::new(r, 4), Some(Pawn::old(Color::A)));
    }
    let mut engine = GameEngine::from_position(board, Color::A);

    let placement = engine.place_pawn(Pos::new(8, 4)).unwrap();
    assert_eq!(placement.decided, Some(Winner::Color(Color::A)));
    assert!(!placement.turn_ended);
    assert_eq!(engine.winner(), Some(Winner::Color(Color::A)));

    let path = engine.winning_path().expect("winner has a path");
    assert_eq!(path.len(), 9);
    assert_eq!(path.first(), Some(&Pos::new(8, 4)));
    assert_eq!(path.last(), Some(&Pos::new(0, 4)));

    // The match is frozen.
    assert_eq!(engine.placements_left(), 2);
    assert!(!engine.has_legal_placement());
    assert!(engine.place_pawn(Pos::new(2, 2)).is_err());
}

#[test]
fn test_left_to_right_chain_wins() {
    let mut board = empty(11);
    for c in 0..11 {
        // A diagonal kink in the middle is still connected.
        let r = if c < 5 { 5 } else { 6 };
        board.set(Pos::new(r, c), Some(Pawn::old(Color::D)));
    }
    let engine = GameEngine::from_position(board, Color::A);

    assert!(engine.check_win(Color::D));
    assert!(!engine.check_win(Color::A));
    let path = engine.winning_path_for(Color::D).unwrap();
    assert_eq!(path.first().map(|p| p.c), Some(10));
    assert_eq!(path.last().map(|p| p.c), Some(0));
}

#[test]
fn test_chain_through_corner_does_not_win() {
    for size in sizes() {
        let last = size.get() - 1;
        let mut board = empty(size.get());
        for r in 0..last {
            board.set(Pos::new(r, 1), Some(Pawn::old(Color::B)));
        }
        board.set(Pos::new(last, 0), Some(Pawn::old(Color::B)));
        let engine = GameEngine::from_position(board.clone(), Color::A);
        assert!(!engine.check_win(Color::B), "size {}", size.get());

        board.set(Pos::new(last, 2), Some(Pawn::old(Color::B)));
        let engine = GameEngine::from_position(board, Color::A);
        let path = engine.winning_path_for(Color::B).unwrap();
        assert!(path.iter().all(|&p| engine.board().zone(p) != Zone::Corner));
    }
}

#[test]
fn test_corner_start_cells_do_not_count() {
    // A chain along the top row from corner to corner touches column 0
    // and the last column only through corners.
    let mut board = empty(9);
    for c in 0..9 {
        board.set(Pos::new(0, c), Some(Pawn::old(Color::C)));
    }
    let engine = GameEngine::from_position(board, Color::A);
    assert!(!engine.check_win(Color::C));
}

#[test]
fn test_winning_path_is_connected() {
    let mut board = empty(13);
    let cells = [
        (0, 6), (1, 7), (2, 7), (3, 8), (4, 8), (5, 7),
        (6, 6), (7, 6), (8, 5), (9, 5), (10, 6), (11, 6), (12, 6),
    ];
    for (r, c) in cells {
        board.set(Pos::new(r, c), Some(Pawn::old(Color::B)));
    }
    let engine = GameEngine::from_position(board, Color::A);
    let path = engine.winning_path_for(Color::B).unwrap();

    assert_eq!(path.len(), cells.len());
    for pair in path.windows(2) {
        assert_eq!(pair[0].chebyshev(pair[1]), 1);
    }
}
