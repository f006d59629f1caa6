//! Ray-cast attack detection, checks and pins.
//!
//! Everything here works from the king outward: eight rays plus the knight
//! jumps are walked from a square until they leave the board or hit a
//! piece. The mover's own king is transparent so that a square can be
//! probed as a hypothetical king destination without moving anything.

use chess_core::{Color, Grid, Piece, PieceKind, Square};

/// A `(row, col)` step.
pub type Direction = (i8, i8);

/// Rook directions.
pub const ORTHOGONAL: [Direction; 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Bishop directions.
pub const DIAGONAL: [Direction; 4] = [(-1, -1), (-1, 1), (1, 1), (1, -1)];

/// All eight king steps, orthogonal first.
pub const KING_STEPS: [Direction; 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, 1),
    (1, -1),
];

pub const KNIGHT_JUMPS: [Direction; 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

/// A piece giving check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Check {
    /// Square of the checking piece.
    pub square: Square,
    /// Step from the king toward the checker; `None` for a knight.
    pub direction: Option<Direction>,
}

/// A friendly piece that may only move along `direction` (either sense).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pin {
    pub square: Square,
    pub direction: Direction,
}

/// Checks and pins against one king.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckInfo {
    pub checks: Vec<Check>,
    pub pins: Vec<Pin>,
}

impl CheckInfo {
    #[inline]
    pub fn in_check(&self) -> bool {
        !self.checks.is_empty()
    }

    /// The pin axis of the piece on `square`, if it is pinned.
    pub fn pin_direction(&self, square: Square) -> Option<Direction> {
        self.pins
            .iter()
            .find(|pin| pin.square == square)
            .map(|pin| pin.direction)
    }

    /// Squares a non-king move may land on to resolve a single check.
    ///
    /// For a slider this is every square between king and checker plus the
    /// checker itself; otherwise only the checker's square.
    pub fn blocking_squares(&self, king: Square) -> Vec<Square> {
        let Some(check) = self.checks.first() else {
            return Vec::new();
        };
        let Some((dr, dc)) = check.direction else {
            return vec![check.square];
        };
        let mut squares = Vec::new();
        let mut current = king;
        while let Some(next) = current.offset(dr, dc) {
            squares.push(next);
            if next == check.square {
                break;
            }
            current = next;
        }
        squares
    }
}

/// What a single ray from the king found.
enum RayHit {
    /// An enemy piece attacks along the ray with nothing in between.
    Attacker(Square),
    /// One friendly piece stands between the king and an enemy attacker.
    Pinned(Square),
    Clear,
}

#[inline]
fn piece_at(board: &Grid, square: Square) -> Option<Piece> {
    board[square.row() as usize][square.col() as usize]
}

/// Whether `kind` at `distance` steps along `dir` attacks the origin.
fn attacks_along(attacker: Piece, dir: Direction, distance: usize) -> bool {
    let orthogonal = dir.0 == 0 || dir.1 == 0;
    match attacker.kind {
        PieceKind::Rook => orthogonal,
        PieceKind::Bishop => !orthogonal,
        PieceKind::Queen => true,
        PieceKind::King => distance == 1,
        // The pawn must sit on the origin's diagonal, behind its own push
        // direction relative to the origin.
        PieceKind::Pawn => {
            distance == 1 && !orthogonal && dir.0 == -attacker.color.pawn_direction()
        }
        PieceKind::Knight => false,
    }
}

fn scan_ray(board: &Grid, origin: Square, dir: Direction, us: Color) -> RayHit {
    let mut shield: Option<Square> = None;
    let mut current = origin;
    let mut distance = 0;

    while let Some(next) = current.offset(dir.0, dir.1) {
        current = next;
        distance += 1;
        match piece_at(board, next) {
            None => continue,
            Some(piece) if piece.color == us => {
                if piece.kind == PieceKind::King {
                    continue;
                }
                if shield.is_some() {
                    return RayHit::Clear;
                }
                shield = Some(next);
            }
            Some(piece) => {
                if !attacks_along(piece, dir, distance) {
                    return RayHit::Clear;
                }
                return match shield {
                    None => RayHit::Attacker(next),
                    Some(pinned) => RayHit::Pinned(pinned),
                };
            }
        }
    }
    RayHit::Clear
}

fn knight_attackers(board: &Grid, origin: Square, us: Color) -> impl Iterator<Item = Square> + '_ {
    KNIGHT_JUMPS.iter().filter_map(move |&(dr, dc)| {
        let target = origin.offset(dr, dc)?;
        match piece_at(board, target) {
            Some(piece) if piece.color != us && piece.kind == PieceKind::Knight => Some(target),
            _ => None,
        }
    })
}

/// Whether `square` is attacked by the opponent of `us`.
///
/// `us`'s king is ignored wherever it stands, so this answers "would a
/// king of colour `us` be safe on `square`".
pub fn is_square_attacked(board: &Grid, square: Square, us: Color) -> bool {
    KING_STEPS
        .iter()
        .any(|&dir| matches!(scan_ray(board, square, dir, us), RayHit::Attacker(_)))
        || knight_attackers(board, square, us).next().is_some()
}

/// Collects checks against and pins toward a king of colour `us` on `king`.
pub fn checks_and_pins(board: &Grid, king: Square, us: Color) -> CheckInfo {
    let mut info = CheckInfo::default();

    for &dir in &KING_STEPS {
        match scan_ray(board, king, dir, us) {
            RayHit::Attacker(square) => info.checks.push(Check {
                square,
                direction: Some(dir),
            }),
            RayHit::Pinned(square) => info.pins.push(Pin {
                square,
                direction: dir,
            }),
            RayHit::Clear => {}
        }
    }

    info.checks.extend(knight_attackers(board, king, us).map(|square| Check {
        square,
        direction: None,
    }));

    info
}
