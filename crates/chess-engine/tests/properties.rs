//! Randomised playout properties for the game state and search.
//!
//! Each case walks a random line from a fixed position by picking moves by
//! index out of the (underpromotion-expanded) legal list.

use chess_engine::movegen::expand_underpromotions;
use chess_engine::search::negamax_full_width;
use chess_engine::{init_hash, GameState, SearchConfig, Searcher};
use proptest::prelude::*;

const STARTS: [&str; 4] = [
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1",
];

/// Plays up to `picks.len()` moves, stopping early at a terminal position.
fn playout(start: usize, picks: &[usize]) -> GameState {
    let mut state = GameState::from_fen(STARTS[start % STARTS.len()]).unwrap();
    for &pick in picks {
        let moves = expand_underpromotions(state.legal_moves());
        if moves.is_empty() {
            break;
        }
        state.apply(moves[pick % moves.len()]);
    }
    state
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn apply_then_revert_is_identity(
        start in 0usize..4,
        picks in prop::collection::vec(any::<usize>(), 0..24),
        last in any::<usize>(),
    ) {
        let mut state = playout(start, &picks);
        let moves = expand_underpromotions(state.legal_moves());
        prop_assume!(!moves.is_empty());

        let before = state.clone();
        let mv = moves[last % moves.len()];
        state.apply(mv);
        prop_assert_eq!(state.plies(), before.plies() + 1);
        let undone = state.revert().unwrap();

        prop_assert_eq!(undone, mv);
        prop_assert_eq!(&state, &before);
        prop_assert_eq!(state.board(), before.board());
        prop_assert_eq!(state.fingerprint(), before.fingerprint());
        prop_assert_eq!(state.to_fen(), before.to_fen());
    }

    #[test]
    fn fingerprint_tracks_board(
        start in 0usize..4,
        picks in prop::collection::vec(any::<usize>(), 0..40),
    ) {
        let mut state = playout(start, &picks);
        prop_assert_eq!(state.fingerprint(), init_hash(state.board()));

        // Unwinding the whole line keeps the invariant at every step.
        while state.plies() > 0 {
            state.revert().unwrap();
            prop_assert_eq!(state.fingerprint(), init_hash(state.board()));
        }
    }

    #[test]
    fn terminal_flags_iff_no_moves(
        start in 0usize..4,
        picks in prop::collection::vec(any::<usize>(), 0..60),
    ) {
        let mut state = playout(start, &picks);
        let moves = state.legal_moves();
        let flags = (state.is_checkmate(), state.is_stalemate());
        if moves.is_empty() {
            prop_assert!(flags == (true, false) || flags == (false, true));
            prop_assert_eq!(state.is_checkmate(), state.in_check());
        } else {
            prop_assert_eq!(flags, (false, false));
        }
    }

    #[test]
    fn legal_moves_never_leave_king_attacked(
        start in 0usize..4,
        picks in prop::collection::vec(any::<usize>(), 0..30),
    ) {
        let mut state = playout(start, &picks);
        let mover = state.side_to_move();
        for mv in state.legal_moves() {
            state.apply(mv);
            let king = state.king_square(mover);
            prop_assert!(
                !chess_engine::movegen::is_square_attacked(state.board(), king, mover),
                "{} leaves the king attacked",
                mv
            );
            state.revert().unwrap();
        }
    }

    #[test]
    fn alpha_beta_equals_full_width(
        start in 0usize..4,
        picks in prop::collection::vec(any::<usize>(), 0..12),
        depth in 1u32..=2,
    ) {
        let mut state = playout(start, &picks);
        let before = state.clone();
        let mut searcher = Searcher::new(SearchConfig { depth, parallel: false, threads: 0 });
        let pruned = searcher
            .negamax(&mut state, depth, f64::NEG_INFINITY, f64::INFINITY)
            .unwrap();
        let full = negamax_full_width(&mut state, depth).unwrap();
        prop_assert_eq!(pruned, full);
        prop_assert_eq!(&state, &before);
    }
}
