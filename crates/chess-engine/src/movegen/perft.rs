//! Perft (performance test) for move generator validation.
//!
//! Perft counts the number of leaf nodes at a given depth, which can be
//! compared against known-correct values to validate the move generator.
//! Underpromotions are expanded so the counts match the published tables.

use super::expand_underpromotions;
use crate::{EngineError, GameState};

/// Counts the number of leaf nodes at the given depth.
pub fn perft(state: &mut GameState, depth: u32) -> Result<u64, EngineError> {
    if depth == 0 {
        return Ok(1);
    }

    let moves = expand_underpromotions(state.legal_moves());

    if depth == 1 {
        return Ok(moves.len() as u64);
    }

    let mut nodes = 0u64;
    for mv in moves {
        state.apply(mv);
        let count = perft(state, depth - 1);
        state.revert()?;
        nodes += count?;
    }
    Ok(nodes)
}

/// Perft with divide - shows node count for each move at depth-1.
/// Useful for debugging to identify which moves have incorrect counts.
pub fn perft_divide(state: &mut GameState, depth: u32) -> Result<Vec<(String, u64)>, EngineError> {
    let moves = expand_underpromotions(state.legal_moves());
    let mut results = Vec::with_capacity(moves.len());

    for mv in moves {
        state.apply(mv);
        let nodes = perft(state, depth.saturating_sub(1));
        state.revert()?;
        results.push((mv.to_uci(), nodes?));
    }

    results.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(results)
}
