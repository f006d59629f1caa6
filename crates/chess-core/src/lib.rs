//! Core types for chess.
//!
//! This crate provides the fundamental value types used by the engine:
//! - [`Piece`], [`PieceKind`] and [`Color`] for piece representation
//! - [`Square`] for `(row, col)` board coordinates
//! - [`Move`] and [`MoveKind`] for single plies
//! - [`CastlingRights`] and [`CastleSide`]
//! - FEN parsing and serialization via [`Fen`]

mod castling;
mod color;
mod fen;
mod mov;
mod piece;
mod square;

pub use castling::{CastleSide, CastlingRights};
pub use color::Color;
pub use fen::{Fen, FenError, Grid};
pub use mov::{Move, MoveKind};
pub use piece::{Piece, PieceKind};
pub use square::Square;
