//! Engine error type.

use chess_core::{FenError, PieceKind, Square};
use thiserror::Error;

/// Recoverable conditions reported by the engine.
///
/// None of these leave the game state partially modified: every operation
/// that returns an error checks its input before mutating anything.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The requested move is not in the current legal-move list.
    #[error("illegal move requested: {from}{to}")]
    IllegalMoveRequested { from: Square, to: Square },

    /// `revert` was called with an empty history.
    #[error("nothing to undo")]
    RevertUnderflow,

    /// A promotion was played interactively without choosing a piece.
    #[error("promotion {from}{to} requires a piece choice")]
    AmbiguousPromotion { from: Square, to: Square },

    /// A pawn cannot become a pawn or a king.
    #[error("cannot promote to {0}")]
    InvalidPromotion(PieceKind),

    /// Move text that is not coordinate notation such as "e7e8q".
    #[error("unreadable move '{0}'")]
    InvalidMoveText(String),

    /// The position breaks a board invariant (e.g. two white kings).
    #[error("invalid position: {0}")]
    InvalidPosition(String),

    #[error(transparent)]
    Fen(#[from] FenError),

    /// The parallel search pool could not be created.
    #[error("failed to build search thread pool: {0}")]
    ThreadPool(String),
}
