//! Move representation.

use crate::{CastleSide, Piece, PieceKind, Square};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Special-move classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    /// Any move without a side effect beyond moving and capturing.
    Normal,
    /// Pawn advance of two rows from its starting row.
    DoublePush,
    /// En passant capture; the victim is beside the destination.
    EnPassant,
    /// King move of two columns with the rook hopping over it.
    Castle,
}

/// A single ply, captured from a board snapshot at construction.
///
/// Identity is the `(from, to)` pair only: two moves that differ just in
/// the promotion piece compare equal and hash alike. Read
/// [`Move::promotion`] to tell them apart.
#[derive(Clone, Copy)]
pub struct Move {
    from: Square,
    to: Square,
    moved: Piece,
    captured: Option<Piece>,
    promotion: Option<PieceKind>,
    kind: MoveKind,
}

impl Move {
    /// Creates a regular move or capture.
    ///
    /// Pawn double steps are tagged [`MoveKind::DoublePush`]; pawns reaching
    /// the last row default to queen promotion.
    pub fn new(from: Square, to: Square, moved: Piece, captured: Option<Piece>) -> Self {
        let is_pawn = moved.kind == PieceKind::Pawn;
        let kind = if is_pawn && from.row().abs_diff(to.row()) == 2 {
            MoveKind::DoublePush
        } else {
            MoveKind::Normal
        };
        let promotion = if is_pawn && to.row() == moved.color.promotion_row() {
            Some(PieceKind::Queen)
        } else {
            None
        };
        Move {
            from,
            to,
            moved,
            captured,
            promotion,
            kind,
        }
    }

    /// Creates an en passant capture by `moved`.
    pub fn en_passant(from: Square, to: Square, moved: Piece) -> Self {
        Move {
            from,
            to,
            moved,
            captured: Some(Piece::new(moved.color.opposite(), PieceKind::Pawn)),
            promotion: None,
            kind: MoveKind::EnPassant,
        }
    }

    /// Creates a castle; `from`/`to` are the king's squares.
    pub fn castle(from: Square, to: Square, king: Piece) -> Self {
        Move {
            from,
            to,
            moved: king,
            captured: None,
            promotion: None,
            kind: MoveKind::Castle,
        }
    }

    /// Returns a copy with the promotion piece overridden.
    ///
    /// Has no effect on moves that are not promotions.
    #[inline]
    pub fn with_promotion(mut self, kind: PieceKind) -> Self {
        if self.is_promotion() {
            self.promotion = Some(kind);
        }
        self
    }

    #[inline]
    pub const fn from(&self) -> Square {
        self.from
    }

    #[inline]
    pub const fn to(&self) -> Square {
        self.to
    }

    #[inline]
    pub const fn moved(&self) -> Piece {
        self.moved
    }

    #[inline]
    pub const fn captured(&self) -> Option<Piece> {
        self.captured
    }

    #[inline]
    pub const fn promotion(&self) -> Option<PieceKind> {
        self.promotion
    }

    #[inline]
    pub const fn kind(&self) -> MoveKind {
        self.kind
    }

    #[inline]
    pub const fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    #[inline]
    pub const fn is_promotion(&self) -> bool {
        self.promotion.is_some()
    }

    #[inline]
    pub fn is_en_passant(&self) -> bool {
        self.kind == MoveKind::EnPassant
    }

    #[inline]
    pub fn is_castle(&self) -> bool {
        self.kind == MoveKind::Castle
    }

    /// The piece standing on the destination after the move.
    #[inline]
    pub fn placed(&self) -> Piece {
        match self.promotion {
            Some(kind) => Piece::new(self.moved.color, kind),
            None => self.moved,
        }
    }

    /// Square the captured piece stood on.
    ///
    /// For en passant this is beside the destination, on the mover's row.
    #[inline]
    pub fn capture_square(&self) -> Square {
        if self.is_en_passant() {
            Square::at(self.from.row(), self.to.col())
        } else {
            self.to
        }
    }

    /// Castle side, if this is a castle.
    pub fn castle_side(&self) -> Option<CastleSide> {
        if !self.is_castle() {
            return None;
        }
        if self.to.col() > self.from.col() {
            Some(CastleSide::KingSide)
        } else {
            Some(CastleSide::QueenSide)
        }
    }

    /// Rook origin and destination for a castle.
    pub fn castle_rook_squares(&self) -> Option<(Square, Square)> {
        self.castle_side().map(|side| {
            let row = self.from.row();
            (
                Square::at(row, side.rook_home_col()),
                Square::at(row, side.rook_target_col()),
            )
        })
    }

    /// Coordinate notation, e.g. "e2e4" or "e7e8q".
    pub fn to_uci(&self) -> String {
        match self.promotion {
            Some(kind) => format!("{}{}{}", self.from, self.to, kind.to_char()),
            None => format!("{}{}", self.from, self.to),
        }
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.from == other.from && self.to == other.to
    }
}

impl Eq for Move {}

impl Hash for Move {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.from.hash(state);
        self.to.hash(state);
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({})", self.to_uci())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    const WP: Piece = Piece::new(Color::White, PieceKind::Pawn);
    const BP: Piece = Piece::new(Color::Black, PieceKind::Pawn);

    #[test]
    fn double_push_is_tagged() {
        let m = Move::new(sq("e2"), sq("e4"), WP, None);
        assert_eq!(m.kind(), MoveKind::DoublePush);
        let single = Move::new(sq("e2"), sq("e3"), WP, None);
        assert_eq!(single.kind(), MoveKind::Normal);
    }

    #[test]
    fn promotion_defaults_to_queen() {
        let m = Move::new(sq("a7"), sq("a8"), WP, None);
        assert!(m.is_promotion());
        assert_eq!(m.promotion(), Some(PieceKind::Queen));
        assert_eq!(m.to_uci(), "a7a8q");

        let black = Move::new(sq("h2"), sq("h1"), BP, None);
        assert_eq!(black.promotion(), Some(PieceKind::Queen));
    }

    #[test]
    fn identity_ignores_promotion_piece() {
        let queen = Move::new(sq("a7"), sq("a8"), WP, None);
        let knight = queen.with_promotion(PieceKind::Knight);
        assert_eq!(queen, knight);
        assert_ne!(queen.promotion(), knight.promotion());
        assert_eq!(knight.placed(), Piece::new(Color::White, PieceKind::Knight));
    }

    #[test]
    fn with_promotion_ignored_for_plain_moves() {
        let m = Move::new(sq("e2"), sq("e3"), WP, None).with_promotion(PieceKind::Rook);
        assert_eq!(m.promotion(), None);
    }

    #[test]
    fn en_passant_captures_beside_destination() {
        let m = Move::en_passant(sq("e5"), sq("d6"), WP);
        assert_eq!(m.captured(), Some(BP));
        assert_eq!(m.capture_square(), sq("d5"));
        assert!(m.is_capture());
    }

    #[test]
    fn castle_rook_squares() {
        let king = Piece::new(Color::White, PieceKind::King);
        let short = Move::castle(Square::E1, Square::G1, king);
        assert_eq!(short.castle_side(), Some(CastleSide::KingSide));
        assert_eq!(short.castle_rook_squares(), Some((Square::H1, Square::F1)));

        let black_king = Piece::new(Color::Black, PieceKind::King);
        let long = Move::castle(Square::E8, Square::C8, black_king);
        assert_eq!(long.castle_rook_squares(), Some((Square::A8, Square::D8)));
    }

    #[test]
    fn display() {
        let m = Move::new(sq("g1"), sq("f3"), Piece::new(Color::White, PieceKind::Knight), None);
        assert_eq!(format!("{}", m), "g1f3");
        assert_eq!(format!("{:?}", m), "Move(g1f3)");
    }
}
