//! Fixed-depth negamax search with alpha-beta pruning.
//!
//! Scores are always from the perspective of the side to move at the node
//! being scored. Leaves are scored with [`evaluate`] multiplied by the side
//! sign; a side with no legal moves scores `-(MATE_SCORE + 100 * depth)`
//! when checkmated and `0` when stalemated, so nearer mates score higher
//! for the winner.
//!
//! The root can run sequentially on the caller's state or in parallel on
//! one cloned state per root move (via rayon). Parallel workers search with
//! the full window and share no bounds. Both roots break ties in favour of
//! the earliest move in search order, so they pick the same move.

use crate::eval::evaluate;
use crate::movegen::{expand_underpromotions, order_moves, search_moves};
use crate::{EngineError, GameState};
use chess_core::Move;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

/// Base magnitude of a checkmate score.
pub const MATE_SCORE: f64 = 10_000.0;

/// Added per remaining ply so faster mates are preferred.
pub const MATE_DEPTH_BONUS: f64 = 100.0;

/// Search settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Plies to search from the root.
    pub depth: u32,
    /// Search root moves on separate threads.
    pub parallel: bool,
    /// Worker threads for the parallel root; 0 uses rayon's global pool.
    pub threads: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            depth: 4,
            parallel: false,
            threads: 0,
        }
    }
}

/// Outcome of a root search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchResult {
    /// `None` when the root is terminal or the depth is zero.
    pub best_move: Option<Move>,
    /// Score of `best_move` for the side to move.
    pub score: f64,
    /// Nodes visited, root included.
    pub nodes: u64,
}

/// Score for a node whose side to move has no legal moves.
fn terminal_score(state: &GameState, depth: u32) -> f64 {
    if state.is_checkmate() {
        -(MATE_SCORE + MATE_DEPTH_BONUS * f64::from(depth))
    } else {
        0.0
    }
}

/// Static score from the side to move's perspective.
#[inline]
fn leaf_score(state: &GameState) -> f64 {
    f64::from(state.side_to_move().sign()) * evaluate(state)
}

/// Negamax searcher. Holds the configuration and a node counter.
#[derive(Debug, Clone)]
pub struct Searcher {
    config: SearchConfig,
    nodes: u64,
}

impl Searcher {
    pub fn new(config: SearchConfig) -> Self {
        Searcher { config, nodes: 0 }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Nodes visited since construction.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Searches the position to the configured depth.
    ///
    /// The caller's state is restored before returning, on success and on
    /// error alike.
    pub fn search(&mut self, state: &mut GameState) -> Result<SearchResult, EngineError> {
        let depth = self.config.depth;
        let start = self.nodes;
        self.nodes += 1;

        let moves = search_moves(state)?;
        if moves.is_empty() {
            let score = terminal_score(state, depth);
            warn!(
                "search called on a terminal position (checkmate: {}, stalemate: {})",
                state.is_checkmate(),
                state.is_stalemate()
            );
            return Ok(SearchResult {
                best_move: None,
                score,
                nodes: self.nodes - start,
            });
        }
        if depth == 0 {
            return Ok(SearchResult {
                best_move: None,
                score: leaf_score(state),
                nodes: self.nodes - start,
            });
        }

        let (best_move, score) = if self.config.parallel {
            self.parallel_root(state, moves)?
        } else {
            self.sequential_root(state, moves)?
        };

        debug!(
            "search finished: depth {} best {} score {:.2} nodes {}",
            depth,
            best_move.map_or_else(|| "-".to_string(), |m| m.to_uci()),
            score,
            self.nodes - start
        );

        Ok(SearchResult {
            best_move,
            score,
            nodes: self.nodes - start,
        })
    }

    fn sequential_root(
        &mut self,
        state: &mut GameState,
        moves: Vec<Move>,
    ) -> Result<(Option<Move>, f64), EngineError> {
        let depth = self.config.depth;
        let beta = f64::INFINITY;
        let mut alpha = f64::NEG_INFINITY;
        let mut best = None;

        for mv in moves {
            state.apply(mv);
            let child = self.negamax(state, depth - 1, -beta, -alpha);
            state.revert()?;
            let score = -child?;
            debug!("root move {} scored {:.2}", mv, score);

            if score > alpha {
                alpha = score;
                best = Some(mv);
            }
        }

        Ok((best, alpha))
    }

    fn parallel_root(
        &mut self,
        state: &GameState,
        moves: Vec<Move>,
    ) -> Result<(Option<Move>, f64), EngineError> {
        let depth = self.config.depth;
        let worker_config = SearchConfig {
            parallel: false,
            ..self.config
        };

        let run = || -> Result<Vec<(Move, f64, u64)>, EngineError> {
            moves
                .par_iter()
                .map(|&mv| {
                    let mut branch = state.clone();
                    branch.apply(mv);
                    let mut worker = Searcher::new(worker_config);
                    let score = -worker.negamax(
                        &mut branch,
                        depth - 1,
                        f64::NEG_INFINITY,
                        f64::INFINITY,
                    )?;
                    trace!(
                        "worker {:?} searched {} score {:.2}",
                        rayon::current_thread_index(),
                        mv,
                        score
                    );
                    Ok((mv, score, worker.nodes))
                })
                .collect()
        };

        let results = if self.config.threads > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.config.threads)
                .build()
                .map_err(|e| EngineError::ThreadPool(e.to_string()))?;
            pool.install(run)?
        } else {
            run()?
        };

        let mut best: Option<(Move, f64)> = None;
        for (mv, score, nodes) in results {
            self.nodes += nodes;
            debug!("root move {} scored {:.2}", mv, score);
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((mv, score));
            }
        }

        Ok(match best {
            Some((mv, score)) => (Some(mv), score),
            None => (None, f64::NEG_INFINITY),
        })
    }

    /// Fail-hard negamax.
    ///
    /// Returns a score in `[alpha, beta]` for the side to move. The state is
    /// left as it was found.
    pub fn negamax(
        &mut self,
        state: &mut GameState,
        depth: u32,
        alpha: f64,
        beta: f64,
    ) -> Result<f64, EngineError> {
        self.nodes += 1;

        let legal = state.legal_moves();
        if legal.is_empty() {
            return Ok(terminal_score(state, depth));
        }
        if depth == 0 {
            return Ok(leaf_score(state));
        }

        let moves = order_moves(state, expand_underpromotions(legal))?;
        let mut alpha = alpha;
        for mv in moves {
            state.apply(mv);
            let child = self.negamax(state, depth - 1, -beta, -alpha);
            state.revert()?;
            alpha = alpha.max(-child?);
            if alpha >= beta {
                return Ok(alpha);
            }
        }
        Ok(alpha)
    }
}

/// Plain negamax without pruning, for checking the pruned search.
pub fn negamax_full_width(state: &mut GameState, depth: u32) -> Result<f64, EngineError> {
    let legal = state.legal_moves();
    if legal.is_empty() {
        return Ok(terminal_score(state, depth));
    }
    if depth == 0 {
        return Ok(leaf_score(state));
    }

    let mut best = f64::NEG_INFINITY;
    for mv in expand_underpromotions(legal) {
        state.apply(mv);
        let child = negamax_full_width(state, depth - 1);
        state.revert()?;
        best = best.max(-child?);
    }
    Ok(best)
}

/// Best move for the side to move at `depth` plies, searched sequentially.
///
/// Returns `None` for a checkmated or stalemated side or at depth zero.
pub fn best_move(state: &mut GameState, depth: u32) -> Result<Option<Move>, EngineError> {
    let config = SearchConfig {
        depth,
        parallel: false,
        threads: 0,
    };
    Ok(Searcher::new(config).search(state)?.best_move)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn searcher(depth: u32, parallel: bool) -> Searcher {
        Searcher::new(SearchConfig {
            depth,
            parallel,
            threads: 0,
        })
    }

    #[test]
    fn finds_mate_in_one() {
        let mut state = GameState::new();
        for m in ["e2e4", "e7e5", "d1h5", "b8c6", "f1c4", "g8f6"] {
            state.play_uci(m).unwrap();
        }
        let before = state.clone();
        let result = searcher(2, false).search(&mut state).unwrap();
        assert_eq!(result.best_move.map(|m| m.to_uci()), Some("h5f7".to_string()));
        assert_eq!(result.score, MATE_SCORE + MATE_DEPTH_BONUS);
        assert_eq!(state, before);
    }

    #[test]
    fn terminal_roots_return_no_move() {
        let mut mate = GameState::from_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1").unwrap();
        let result = searcher(3, false).search(&mut mate).unwrap();
        assert_eq!(result.best_move, None);
        assert_eq!(result.score, -(MATE_SCORE + 3.0 * MATE_DEPTH_BONUS));

        let mut stale = GameState::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        let result = searcher(3, false).search(&mut stale).unwrap();
        assert_eq!(result.best_move, None);
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn depth_zero_returns_no_move() {
        let mut state = GameState::new();
        assert_eq!(best_move(&mut state, 0).unwrap(), None);
    }

    #[test]
    fn takes_a_hanging_queen() {
        let mut state = GameState::from_fen("4k3/8/8/3q4/8/8/8/3RK3 w - - 0 1").unwrap();
        let mv = best_move(&mut state, 2).unwrap().unwrap();
        assert_eq!(mv.to_uci(), "d1d5");
    }

    #[test]
    fn black_prefers_its_own_gain() {
        let mut state = GameState::from_fen("3rk3/8/8/8/3Q4/8/8/4K3 b - - 0 1").unwrap();
        let mv = best_move(&mut state, 2).unwrap().unwrap();
        assert_eq!(mv.to_uci(), "d8d4");
    }

    #[test]
    fn alpha_beta_matches_full_width() {
        let fens = [
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "4k3/1P6/8/8/8/8/6p1/4K3 w - - 0 1",
        ];
        for fen in fens {
            for depth in 1..=2 {
                let mut state = GameState::from_fen(fen).unwrap();
                let pruned = searcher(depth, false)
                    .negamax(&mut state, depth, f64::NEG_INFINITY, f64::INFINITY)
                    .unwrap();
                let full = negamax_full_width(&mut state, depth).unwrap();
                assert_eq!(pruned, full, "{} at depth {}", fen, depth);
            }
        }
    }

    #[test]
    fn parallel_agrees_with_sequential() {
        let fens = [
            "r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/5Q2/PPPP1PPP/RNB1K1NR w KQkq - 2 3",
            "4k3/8/8/3q4/8/8/8/3RK3 w - - 0 1",
        ];
        for fen in fens {
            for depth in 1..=2 {
                let mut state = GameState::from_fen(fen).unwrap();
                let seq = searcher(depth, false).search(&mut state).unwrap();
                let par = searcher(depth, true).search(&mut state).unwrap();
                assert_eq!(seq.best_move.map(|m| m.to_uci()), par.best_move.map(|m| m.to_uci()));
                assert_eq!(seq.score, par.score);
            }
        }
    }

    #[test]
    fn parallel_with_dedicated_pool() {
        let mut state = GameState::from_fen("4k3/8/8/3q4/8/8/8/3RK3 w - - 0 1").unwrap();
        let mut searcher = Searcher::new(SearchConfig {
            depth: 2,
            parallel: true,
            threads: 2,
        });
        let result = searcher.search(&mut state).unwrap();
        assert_eq!(result.best_move.map(|m| m.to_uci()), Some("d1d5".to_string()));
        assert!(result.nodes > 1);
        assert_eq!(searcher.nodes(), result.nodes);
    }

    #[test]
    fn search_restores_state() {
        let mut state = GameState::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .unwrap();
        let before = state.clone();
        searcher(2, false).search(&mut state).unwrap();
        assert_eq!(state, before);
        assert_eq!(state.fingerprint(), before.fingerprint());
    }

    #[test]
    fn config_defaults_from_partial_toml() {
        let config: SearchConfig = toml::from_str("depth = 3").unwrap();
        assert_eq!(config.depth, 3);
        assert!(!config.parallel);
        assert_eq!(config.threads, 0);
    }
}
