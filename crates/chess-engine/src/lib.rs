//! Chess engine over a mailbox board.
//!
//! This crate provides:
//! - [`GameState`] - board, side to move, castling rights, en passant
//!   target and an undo stack with exact make/unmake
//! - Legal move generation with pin and check detection
//! - [`evaluate`] - a heuristic static evaluation
//! - [`Searcher`] - fixed-depth negamax with alpha-beta pruning and an
//!   optional parallel root
//! - Zobrist fingerprints maintained incrementally
//!
//! # Architecture
//!
//! The board is an 8x8 grid of `Option<Piece>`, row 0 being rank 8. Moves
//! are applied in place and reverted from the undo stack; the search
//! relies on `apply`/`revert` being exact inverses rather than copying
//! positions, except at a parallel root where each worker owns a clone.
//!
//! # Example
//!
//! ```
//! use chess_engine::{best_move, GameState};
//!
//! let mut state = GameState::new();
//! println!("Legal moves from starting position: {}", state.legal_moves().len());
//!
//! state.play_uci("e2e4").unwrap();
//! state.play_uci("e7e5").unwrap();
//! let reply = best_move(&mut state, 2).unwrap();
//! println!("Position after 1.e4 e5: {} (engine suggests {:?})", state.to_fen(), reply);
//! ```

mod error;
pub mod eval;
mod game;
pub mod movegen;
pub mod search;
pub mod zobrist;

pub use error::EngineError;
pub use eval::evaluate;
pub use game::{GameState, UndoRecord};
pub use movegen::{perft, perft_divide};
pub use search::{best_move, SearchConfig, SearchResult, Searcher, MATE_SCORE};
pub use zobrist::{hash_move, init_hash};
