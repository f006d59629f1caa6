//! Mutable game state with make/unmake history.
//!
//! [`GameState`] owns the board, the side to move, castling rights, the en
//! passant target and an undo stack. [`GameState::apply`] and
//! [`GameState::revert`] are exact inverses: after `apply(m)` followed by
//! `revert()` every field compares equal to its value before the pair.

use crate::movegen::{self, attacks};
use crate::zobrist;
use crate::EngineError;
use chess_core::{CastlingRights, Color, Fen, Grid, Move, MoveKind, Piece, PieceKind, Square};
use std::fmt;

/// Everything needed to take back one ply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndoRecord {
    /// The move that was applied.
    pub mv: Move,
    /// Castling rights before the move.
    pub castling: CastlingRights,
    /// En passant target before the move.
    pub en_passant: Option<Square>,
    /// Halfmove clock before the move.
    pub halfmove_clock: u32,
    /// Zobrist hash before the move.
    pub hash: u64,
}

/// A chess position plus the history that led to it.
///
/// The checkmate and stalemate flags are a cache filled by
/// [`GameState::legal_moves`]. They are cleared on every `apply` and
/// `revert` and are ignored by equality.
#[derive(Debug, Clone)]
pub struct GameState {
    board: Grid,
    side_to_move: Color,
    kings: [Square; 2],
    castling: CastlingRights,
    en_passant: Option<Square>,
    halfmove_clock: u32,
    start_fullmove: u32,
    start_side: Color,
    hash: u64,
    history: Vec<UndoRecord>,
    checkmate: bool,
    stalemate: bool,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Creates the standard starting position.
    pub fn new() -> Self {
        match Self::from_parsed(Fen::default()) {
            Ok(state) => state,
            Err(_) => unreachable!("the starting position has one king per side"),
        }
    }

    /// Parses a FEN string into a fresh state with empty history.
    pub fn from_fen(fen: &str) -> Result<Self, EngineError> {
        Self::from_parsed(Fen::parse(fen)?)
    }

    /// Builds a state from an already parsed FEN record.
    ///
    /// Each side must have exactly one king, and the side not to move must
    /// not be in check. An en passant target must sit behind a pawn of the
    /// side that just moved.
    pub fn from_parsed(fen: Fen) -> Result<Self, EngineError> {
        let mut kings: [Vec<Square>; 2] = [Vec::new(), Vec::new()];
        for square in Square::all() {
            if let Some(piece) = fen.board[square.row() as usize][square.col() as usize] {
                if piece.kind == PieceKind::King {
                    kings[piece.color.index()].push(square);
                }
            }
        }

        let mut king_squares = [Square::E1, Square::E8];
        for color in Color::BOTH {
            match kings[color.index()].as_slice() {
                [square] => king_squares[color.index()] = *square,
                found => {
                    return Err(EngineError::InvalidPosition(format!(
                        "{} has {} kings",
                        color,
                        found.len()
                    )))
                }
            }
        }

        let resting = fen.side_to_move.opposite();
        if attacks::is_square_attacked(&fen.board, king_squares[resting.index()], resting) {
            return Err(EngineError::InvalidPosition(format!(
                "{} is in check but it is {} to move",
                resting, fen.side_to_move
            )));
        }

        if let Some(target) = fen.en_passant {
            check_en_passant_target(&fen.board, target, resting)?;
        }

        Ok(GameState {
            hash: zobrist::init_hash(&fen.board),
            board: fen.board,
            side_to_move: fen.side_to_move,
            kings: king_squares,
            castling: fen.castling,
            en_passant: fen.en_passant,
            halfmove_clock: fen.halfmove_clock,
            start_fullmove: fen.fullmove_number.max(1),
            start_side: fen.side_to_move,
            history: Vec::new(),
            checkmate: false,
            stalemate: false,
        })
    }

    /// Returns the piece grid, row 0 being rank 8.
    #[inline]
    pub fn board(&self) -> &Grid {
        &self.board
    }

    /// Returns the piece on a square, if any.
    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board[square.row() as usize][square.col() as usize]
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Returns the square of the given side's king.
    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        self.kings[color.index()]
    }

    #[inline]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling
    }

    /// Square a pawn may capture into en passant this ply.
    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    /// Number of plies applied since construction.
    #[inline]
    pub fn plies(&self) -> usize {
        self.history.len()
    }

    /// The undo stack, oldest first.
    pub fn history(&self) -> &[UndoRecord] {
        &self.history
    }

    /// The most recently applied move.
    pub fn last_move(&self) -> Option<Move> {
        self.history.last().map(|record| record.mv)
    }

    /// Incrementally maintained Zobrist hash of the piece placement.
    #[inline]
    pub fn fingerprint(&self) -> u64 {
        self.hash
    }

    /// Set by the last `legal_moves` call that found no moves while in check.
    #[inline]
    pub fn is_checkmate(&self) -> bool {
        self.checkmate
    }

    /// Set by the last `legal_moves` call that found no moves out of check.
    #[inline]
    pub fn is_stalemate(&self) -> bool {
        self.stalemate
    }

    /// Whether the side to move is currently in check.
    pub fn in_check(&self) -> bool {
        let us = self.side_to_move;
        attacks::is_square_attacked(&self.board, self.king_square(us), us)
    }

    /// Generates every legal move for the side to move.
    ///
    /// Promotions are listed once, as queen promotions. Also refreshes the
    /// checkmate and stalemate flags.
    pub fn legal_moves(&mut self) -> Vec<Move> {
        let moves = movegen::generate_legal(self);
        let stuck = moves.is_empty();
        let checked = stuck && self.in_check();
        self.checkmate = checked;
        self.stalemate = stuck && !checked;
        moves
    }

    /// Applies a move without validating it.
    ///
    /// `mv` must come from this position's legal-move list (optionally with
    /// its promotion piece changed). Anything else corrupts the state.
    pub fn apply(&mut self, mv: Move) {
        let us = mv.moved().color;

        self.history.push(UndoRecord {
            mv,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            hash: self.hash,
        });
        self.hash = zobrist::hash_move(&mv, self.hash);

        self.set(mv.from(), None);
        if mv.is_en_passant() {
            self.set(mv.capture_square(), None);
        }
        self.set(mv.to(), Some(mv.placed()));
        if let Some((rook_from, rook_to)) = mv.castle_rook_squares() {
            let rook = self.take(rook_from);
            self.set(rook_to, rook);
        }

        match mv.moved().kind {
            PieceKind::King => {
                self.kings[us.index()] = mv.to();
                self.castling.revoke_color(us);
            }
            PieceKind::Rook => self.castling.revoke_corner(mv.from()),
            _ => {}
        }
        if matches!(mv.captured(), Some(piece) if piece.kind == PieceKind::Rook) {
            self.castling.revoke_corner(mv.to());
        }

        self.en_passant = match mv.kind() {
            MoveKind::DoublePush => {
                Square::new((mv.from().row() + mv.to().row()) / 2, mv.from().col())
            }
            _ => None,
        };

        if mv.moved().kind == PieceKind::Pawn || mv.is_capture() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }

        self.side_to_move = us.opposite();
        self.checkmate = false;
        self.stalemate = false;

        debug_assert_eq!(self.hash, zobrist::init_hash(&self.board));
    }

    /// Resolves `(from, to)` against the legal-move list and applies it.
    ///
    /// This is the interactive entry point: a promotion needs an explicit
    /// piece choice, which is ignored for every other move.
    pub fn play(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> Result<Move, EngineError> {
        let candidate = self
            .legal_moves()
            .into_iter()
            .find(|m| m.from() == from && m.to() == to)
            .ok_or(EngineError::IllegalMoveRequested { from, to })?;

        let mv = if candidate.is_promotion() {
            match promotion {
                None => return Err(EngineError::AmbiguousPromotion { from, to }),
                Some(kind) if !kind.is_promotion_target() => {
                    return Err(EngineError::InvalidPromotion(kind))
                }
                Some(kind) => candidate.with_promotion(kind),
            }
        } else {
            candidate
        };

        self.apply(mv);
        Ok(mv)
    }

    /// Parses coordinate notation such as "e2e4" or "e7e8n" and plays it.
    pub fn play_uci(&mut self, text: &str) -> Result<Move, EngineError> {
        let invalid = || EngineError::InvalidMoveText(text.to_string());
        let from = text.get(0..2).and_then(Square::from_algebraic).ok_or_else(invalid)?;
        let to = text.get(2..4).and_then(Square::from_algebraic).ok_or_else(invalid)?;
        let promotion = match text.get(4..) {
            None | Some("") => None,
            Some(suffix) => {
                let mut chars = suffix.chars();
                match (chars.next().and_then(PieceKind::from_char), chars.next()) {
                    (Some(kind), None) => Some(kind),
                    _ => return Err(invalid()),
                }
            }
        };
        self.play(from, to, promotion)
    }

    /// Takes back the most recent move.
    pub fn revert(&mut self) -> Result<Move, EngineError> {
        let record = self.history.pop().ok_or(EngineError::RevertUnderflow)?;
        let mv = record.mv;

        self.set(mv.to(), None);
        if let Some((rook_from, rook_to)) = mv.castle_rook_squares() {
            let rook = self.take(rook_to);
            self.set(rook_from, rook);
        }
        self.set(mv.capture_square(), mv.captured());
        self.set(mv.from(), Some(mv.moved()));

        let us = mv.moved().color;
        if mv.moved().kind == PieceKind::King {
            self.kings[us.index()] = mv.from();
        }

        self.side_to_move = us;
        self.castling = record.castling;
        self.en_passant = record.en_passant;
        self.halfmove_clock = record.halfmove_clock;
        self.hash = record.hash;
        self.checkmate = false;
        self.stalemate = false;

        Ok(mv)
    }

    /// Serializes the current position.
    pub fn to_fen(&self) -> String {
        let offset = usize::from(self.start_side == Color::Black);
        let fullmove = self.start_fullmove as usize + (self.history.len() + offset) / 2;
        Fen {
            board: self.board,
            side_to_move: self.side_to_move,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: u32::try_from(fullmove).unwrap_or(u32::MAX),
        }
        .to_string()
    }

    #[inline]
    fn set(&mut self, square: Square, piece: Option<Piece>) {
        self.board[square.row() as usize][square.col() as usize] = piece;
    }

    #[inline]
    fn take(&mut self, square: Square) -> Option<Piece> {
        self.board[square.row() as usize][square.col() as usize].take()
    }
}

/// Rejects an en passant target that no double push by `pusher` could
/// have left behind.
fn check_en_passant_target(
    board: &Grid,
    target: Square,
    pusher: Color,
) -> Result<(), EngineError> {
    let step = pusher.pawn_direction();
    let expected_row = pusher.pawn_row() as i8 + step;
    if target.row() as i8 != expected_row {
        return Err(EngineError::InvalidPosition(format!(
            "en passant target {} is not on {}'s skipped rank",
            target, pusher
        )));
    }
    if board[target.row() as usize][target.col() as usize].is_some() {
        return Err(EngineError::InvalidPosition(format!(
            "en passant target {} is occupied",
            target
        )));
    }
    let victim = target
        .offset(step, 0)
        .map(|sq| board[sq.row() as usize][sq.col() as usize]);
    if victim != Some(Some(Piece::new(pusher, PieceKind::Pawn))) {
        return Err(EngineError::InvalidPosition(format!(
            "no {} pawn stands behind en passant target {}",
            pusher, target
        )));
    }
    Ok(())
}

impl PartialEq for GameState {
    fn eq(&self, other: &Self) -> bool {
        self.board == other.board
            && self.side_to_move == other.side_to_move
            && self.kings == other.kings
            && self.castling == other.castling
            && self.en_passant == other.en_passant
            && self.halfmove_clock == other.halfmove_clock
            && self.hash == other.hash
            && self.history == other.history
    }
}

impl Eq for GameState {}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, cells) in self.board.iter().enumerate() {
            write!(f, "{} ", 8 - row)?;
            for cell in cells {
                let c = cell.map_or('.', |piece| piece.to_fen_char());
                write!(f, " {}", c)?;
            }
            writeln!(f)?;
        }
        write!(f, "   a b c d e f g h")
    }
}
