//! Legal move generation.
//!
//! Generation is pin- and check-aware rather than generate-then-filter:
//! - checks and pins against the mover's king are computed once by ray
//!   casting outward from the king
//! - pinned pieces only generate moves along their pin axis
//! - king destinations are probed for attacks with the king treated as
//!   absent from its current square
//! - in single check, non-king moves must capture the checker or block
//!   the checking ray; in double check only the king moves
//! - en passant is verified by simulating the capture, which also catches
//!   the discovered check along the rank when both pawns disappear
//!
//! Moves come out in board order (row 0 first, then by column, then by
//! the piece's direction table). Promotions are generated once, as queen
//! promotions; see [`ordering::expand_underpromotions`].

pub mod attacks;
pub mod ordering;
mod perft;

pub use attacks::{checks_and_pins, is_square_attacked, Check, CheckInfo, Pin};
pub use ordering::{expand_underpromotions, order_moves, search_moves};
pub use perft::{perft, perft_divide};

use crate::GameState;
use attacks::{Direction, DIAGONAL, KING_STEPS, KNIGHT_JUMPS, ORTHOGONAL};
use chess_core::{CastleSide, Color, Grid, Move, Piece, PieceKind, Square};

/// Read-only context shared by the per-piece generators.
struct Generator<'a> {
    state: &'a GameState,
    board: &'a Grid,
    us: Color,
    king: Square,
    info: CheckInfo,
}

impl<'a> Generator<'a> {
    fn new(state: &'a GameState) -> Self {
        let us = state.side_to_move();
        let king = state.king_square(us);
        let info = checks_and_pins(state.board(), king, us);
        Generator {
            state,
            board: state.board(),
            us,
            king,
            info,
        }
    }

    #[inline]
    fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board[square.row() as usize][square.col() as usize]
    }

    /// Whether a piece on `from` may step along `dir` given its pin.
    #[inline]
    fn allowed(&self, from: Square, dir: Direction) -> bool {
        match self.info.pin_direction(from) {
            None => true,
            Some(pin) => pin == dir || pin == (-dir.0, -dir.1),
        }
    }

    fn generate(&self) -> Vec<Move> {
        let mut moves = Vec::with_capacity(48);

        if self.info.checks.len() >= 2 {
            self.king_moves(self.king, &mut moves);
            return moves;
        }

        for square in Square::all() {
            let Some(piece) = self.piece_at(square) else {
                continue;
            };
            if piece.color != self.us {
                continue;
            }
            match piece.kind {
                PieceKind::Pawn => self.pawn_moves(square, piece, &mut moves),
                PieceKind::Knight => self.knight_moves(square, piece, &mut moves),
                PieceKind::Bishop => self.slider_moves(square, piece, &DIAGONAL, &mut moves),
                PieceKind::Rook => self.slider_moves(square, piece, &ORTHOGONAL, &mut moves),
                PieceKind::Queen => self.slider_moves(square, piece, &KING_STEPS, &mut moves),
                PieceKind::King => {
                    self.king_moves(square, &mut moves);
                    self.castle_moves(square, piece, &mut moves);
                }
            }
        }

        if self.info.in_check() {
            let blocks = self.info.blocking_squares(self.king);
            moves.retain(|m| {
                m.moved().kind == PieceKind::King || m.is_en_passant() || blocks.contains(&m.to())
            });
        }

        moves
    }

    fn pawn_moves(&self, from: Square, pawn: Piece, moves: &mut Vec<Move>) {
        let dir = self.us.pawn_direction();

        if self.allowed(from, (dir, 0)) {
            if let Some(one) = from.offset(dir, 0) {
                if self.piece_at(one).is_none() {
                    moves.push(Move::new(from, one, pawn, None));
                    if from.row() == self.us.pawn_row() {
                        if let Some(two) = one.offset(dir, 0) {
                            if self.piece_at(two).is_none() {
                                moves.push(Move::new(from, two, pawn, None));
                            }
                        }
                    }
                }
            }
        }

        for dc in [-1, 1] {
            let Some(target) = from.offset(dir, dc) else {
                continue;
            };
            match self.piece_at(target) {
                Some(victim) if victim.color != self.us => {
                    if self.allowed(from, (dir, dc)) {
                        moves.push(Move::new(from, target, pawn, Some(victim)));
                    }
                }
                None if self.state.en_passant() == Some(target) => {
                    let mv = Move::en_passant(from, target, pawn);
                    if self.en_passant_is_safe(&mv) {
                        moves.push(mv);
                    }
                }
                _ => {}
            }
        }
    }

    /// Plays the capture on a scratch board and asks whether the king is
    /// attacked afterwards. Both pawns leave the rank at once, so a rook
    /// or queen behind them on the king's rank is seen here.
    fn en_passant_is_safe(&self, mv: &Move) -> bool {
        let mut scratch = *self.board;
        let victim = mv.capture_square();
        scratch[mv.from().row() as usize][mv.from().col() as usize] = None;
        scratch[victim.row() as usize][victim.col() as usize] = None;
        scratch[mv.to().row() as usize][mv.to().col() as usize] = Some(mv.moved());
        !is_square_attacked(&scratch, self.king, self.us)
    }

    fn knight_moves(&self, from: Square, knight: Piece, moves: &mut Vec<Move>) {
        // A pinned knight can never stay on its pin axis.
        if self.info.pin_direction(from).is_some() {
            return;
        }
        for &(dr, dc) in &KNIGHT_JUMPS {
            let Some(target) = from.offset(dr, dc) else {
                continue;
            };
            match self.piece_at(target) {
                None => moves.push(Move::new(from, target, knight, None)),
                Some(victim) if victim.color != self.us => {
                    moves.push(Move::new(from, target, knight, Some(victim)))
                }
                Some(_) => {}
            }
        }
    }

    fn slider_moves(
        &self,
        from: Square,
        piece: Piece,
        directions: &[Direction],
        moves: &mut Vec<Move>,
    ) {
        for &dir in directions {
            if !self.allowed(from, dir) {
                continue;
            }
            let mut current = from;
            while let Some(target) = current.offset(dir.0, dir.1) {
                match self.piece_at(target) {
                    None => moves.push(Move::new(from, target, piece, None)),
                    Some(victim) => {
                        if victim.color != self.us {
                            moves.push(Move::new(from, target, piece, Some(victim)));
                        }
                        break;
                    }
                }
                current = target;
            }
        }
    }

    fn king_moves(&self, from: Square, moves: &mut Vec<Move>) {
        let king = Piece::new(self.us, PieceKind::King);
        for &(dr, dc) in &KING_STEPS {
            let Some(target) = from.offset(dr, dc) else {
                continue;
            };
            let captured = match self.piece_at(target) {
                Some(piece) if piece.color == self.us => continue,
                other => other,
            };
            if !is_square_attacked(self.board, target, self.us) {
                moves.push(Move::new(from, target, king, captured));
            }
        }
    }

    fn castle_moves(&self, from: Square, king: Piece, moves: &mut Vec<Move>) {
        let rights = self.state.castling_rights();
        let row = self.us.back_row();
        if self.info.in_check() || from != Square::at(row, 4) {
            return;
        }

        for side in CastleSide::BOTH {
            if !rights.has(self.us, side) {
                continue;
            }
            let rook_home = side.rook_home(self.us);
            if self.piece_at(rook_home) != Some(Piece::new(self.us, PieceKind::Rook)) {
                continue;
            }

            let (low, high) = if rook_home.col() < 4 {
                (rook_home.col() + 1, 4)
            } else {
                (5, rook_home.col())
            };
            if (low..high).any(|col| self.piece_at(Square::at(row, col)).is_some()) {
                continue;
            }

            let passed = Square::at(row, side.rook_target_col());
            let target = Square::at(row, side.king_target_col());
            if is_square_attacked(self.board, passed, self.us)
                || is_square_attacked(self.board, target, self.us)
            {
                continue;
            }

            moves.push(Move::castle(from, target, king));
        }
    }
}

/// Every legal move for the side to move in `state`.
///
/// Prefer [`GameState::legal_moves`], which also refreshes the terminal
/// flags.
pub fn generate_legal(state: &GameState) -> Vec<Move> {
    Generator::new(state).generate()
}
