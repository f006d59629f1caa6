//! Search-side post-processing of legal move lists.

use crate::{EngineError, GameState};
use chess_core::{Move, PieceKind};

/// Adds rook, bishop and knight variants right after each queen promotion.
pub fn expand_underpromotions(moves: Vec<Move>) -> Vec<Move> {
    let promotions = moves.iter().filter(|m| m.is_promotion()).count();
    if promotions == 0 {
        return moves;
    }

    let underpromotions = &PieceKind::PROMOTIONS[1..];
    let mut expanded = Vec::with_capacity(moves.len() + promotions * underpromotions.len());
    for mv in moves {
        expanded.push(mv);
        if mv.is_promotion() {
            expanded.extend(underpromotions.iter().map(|&kind| mv.with_promotion(kind)));
        }
    }
    expanded
}

/// Reorders moves as captures, then checking moves, then the rest.
///
/// Relative order within each group is kept. Whether a move gives check is
/// found by applying it, probing the opponent's king, and reverting.
pub fn order_moves(state: &mut GameState, moves: Vec<Move>) -> Result<Vec<Move>, EngineError> {
    let mut captures = Vec::new();
    let mut checks = Vec::new();
    let mut quiet = Vec::new();

    for mv in moves {
        if mv.is_capture() {
            captures.push(mv);
            continue;
        }
        state.apply(mv);
        let gives_check = state.in_check();
        state.revert()?;
        if gives_check {
            checks.push(mv);
        } else {
            quiet.push(mv);
        }
    }

    captures.append(&mut checks);
    captures.append(&mut quiet);
    Ok(captures)
}

/// Legal moves with underpromotions expanded, in search order.
pub fn search_moves(state: &mut GameState) -> Result<Vec<Move>, EngineError> {
    let moves = expand_underpromotions(state.legal_moves());
    order_moves(state, moves)
}
