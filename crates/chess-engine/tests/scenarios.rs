//! Whole-game scenarios exercising state, legality and search together.

use chess_core::{CastleSide, Color, Square};
use chess_engine::{best_move, EngineError, GameState, SearchConfig, Searcher};

fn play_line(state: &mut GameState, line: &str) {
    for text in line.split_whitespace() {
        state
            .play_uci(text)
            .unwrap_or_else(|e| panic!("{} rejected: {}", text, e));
    }
}

fn has_move(state: &mut GameState, uci: &str) -> bool {
    state.legal_moves().iter().any(|m| m.to_uci() == uci)
}

#[test]
fn no_castling_right_after_the_opening() {
    let mut state = GameState::new();
    play_line(&mut state, "e2e4 e7e5");
    assert!(!has_move(&mut state, "e1g1"));
    assert_eq!(state.legal_moves().len(), 29);
}

#[test]
fn kingside_castling_once_the_path_clears() {
    let mut state = GameState::new();
    play_line(&mut state, "e2e4 e7e5 g1f3 b8c6 f1c4");
    state.play_uci("g8f6").unwrap();
    assert!(has_move(&mut state, "e1g1"));

    let castle = state.play(Square::E1, Square::G1, None).unwrap();
    assert!(castle.is_castle());
    assert!(!state
        .castling_rights()
        .has(Color::White, CastleSide::KingSide));
    assert!(state.castling_rights().has(Color::Black, CastleSide::KingSide));
}

#[test]
fn kingside_castling_refused_when_f1_is_covered() {
    // The a6 bishop covers f1 without checking the king.
    let mut state = GameState::from_fen("4k3/8/b7/8/8/8/8/4K2R w K - 0 1").unwrap();
    assert!(!state.in_check());
    assert!(!has_move(&mut state, "e1g1"));

    let mut state = GameState::from_fen("4k3/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
    assert!(has_move(&mut state, "e1g1"));
}

#[test]
fn scholars_mate() {
    let mut state = GameState::new();
    play_line(&mut state, "e2e4 e7e5 f1c4 b8c6 d1h5 g8f6 h5f7");
    assert!(state.legal_moves().is_empty());
    assert!(state.is_checkmate());
    assert!(!state.is_stalemate());
    assert_eq!(best_move(&mut state, 3).unwrap(), None);
}

#[test]
fn fools_mate_is_found_by_search() {
    let mut state = GameState::new();
    play_line(&mut state, "f2f3 e7e5 g2g4");
    let mv = best_move(&mut state, 2).unwrap().unwrap();
    assert_eq!(mv.to_uci(), "d8h4");
}

#[test]
fn playing_and_unwinding_a_game_restores_the_start() {
    let mut state = GameState::new();
    let start = state.clone();
    play_line(
        &mut state,
        "e2e4 d7d5 e4d5 g8f6 f1b5 c7c6 d5c6 d8a5 c6b7 a5b5 b7a8q",
    );
    assert_eq!(state.plies(), 11);
    while state.plies() > 0 {
        state.revert().unwrap();
    }
    assert_eq!(state, start);
    assert_eq!(state.revert(), Err(EngineError::RevertUnderflow));
}

#[test]
fn sequential_and_parallel_agree_at_shallow_depth() {
    let lines = ["", "e2e4 e7e5", "d2d4 d7d5 c2c4 e7e6 b1c3"];
    for line in lines {
        for depth in 0..=1 {
            let mut state = GameState::new();
            play_line(&mut state, line);
            let seq = Searcher::new(SearchConfig {
                depth,
                parallel: false,
                threads: 0,
            })
            .search(&mut state)
            .unwrap();
            let par = Searcher::new(SearchConfig {
                depth,
                parallel: true,
                threads: 0,
            })
            .search(&mut state)
            .unwrap();
            assert_eq!(seq.best_move, par.best_move, "line '{}' depth {}", line, depth);
            assert_eq!(seq.score, par.score);
        }
    }
}

#[test]
fn promotion_is_preferred() {
    let mut state = GameState::from_fen("8/4P3/8/8/8/8/k7/2K5 w - - 0 1").unwrap();
    let before = state.clone();
    let mv = best_move(&mut state, 2).unwrap().unwrap();
    assert_eq!(state, before);
    assert_eq!(mv.to_uci(), "e7e8q");
}
