//! Static evaluation.
//!
//! Scores are in pawns from White's point of view: positive favours White.
//! The terms are material plus a handful of pawn-structure, development and
//! king-safety heuristics, each mirrored for Black.

use crate::GameState;
use chess_core::{Color, Grid, Piece, PieceKind, Square};

const CENTRAL_PAWN: f64 = 0.2;
const PAWN_CHAIN: f64 = 0.05;
const DOUBLED_PAWN: f64 = 0.5;
const PASSED_PAWN: f64 = 0.3;
const SPACE_PER_ROW: f64 = 0.05;

const DEVELOPED_MINOR: f64 = 0.15;
const KNIGHT_ON_RIM: f64 = 0.05;
const ROOK_OPEN_FILE: f64 = 0.15;
const EARLY_QUEEN: f64 = 0.15;
/// Queen sorties before this many plies are penalised.
const EARLY_QUEEN_PLIES: usize = 10;

const KING_ON_FLANK: f64 = 0.4;
const SHIELD_MISSING: f64 = 0.5;
const SHIELD_THIN: [f64; 3] = [0.3, 0.1, 0.05];

/// Per-file pawn counts and queen presence, gathered in one board pass.
struct Census {
    pawns: [[u8; 8]; 2],
    queens: [bool; 2],
}

impl Census {
    fn take(board: &Grid) -> Self {
        let mut census = Census {
            pawns: [[0; 8]; 2],
            queens: [false; 2],
        };
        for row in board {
            for (col, cell) in row.iter().enumerate() {
                match cell {
                    Some(piece) if piece.kind == PieceKind::Pawn => {
                        census.pawns[piece.color.index()][col] += 1
                    }
                    Some(piece) if piece.kind == PieceKind::Queen => {
                        census.queens[piece.color.index()] = true
                    }
                    _ => {}
                }
            }
        }
        census
    }

    fn open_file(&self, col: u8) -> bool {
        self.pawns[0][col as usize] == 0 && self.pawns[1][col as usize] == 0
    }
}

#[inline]
fn piece_at(board: &Grid, square: Square) -> Option<Piece> {
    board[square.row() as usize][square.col() as usize]
}

fn is_pawn(board: &Grid, square: Option<Square>, color: Color) -> bool {
    square.and_then(|sq| piece_at(board, sq)) == Some(Piece::new(color, PieceKind::Pawn))
}

/// Bonuses for one pawn, from its owner's point of view.
fn pawn_terms(board: &Grid, square: Square, color: Color) -> f64 {
    let dir = color.pawn_direction();
    let (row, col) = (square.row(), square.col());
    let mut score = 0.0;

    if (2..=5).contains(&row) && (3..=4).contains(&col) {
        score += CENTRAL_PAWN;
    }

    if is_pawn(board, square.offset(-dir, -1), color) || is_pawn(board, square.offset(-dir, 1), color)
    {
        score += PAWN_CHAIN;
    }

    let enemy = color.opposite();
    let mut passed = true;
    for dc in -1..=1 {
        let mut ahead = square.offset(dir, dc);
        while let Some(sq) = ahead {
            if piece_at(board, sq) == Some(Piece::new(enemy, PieceKind::Pawn)) {
                passed = false;
                break;
            }
            ahead = sq.offset(dir, 0);
        }
        if !passed {
            break;
        }
    }
    if passed {
        score += PASSED_PAWN;
    }

    score += SPACE_PER_ROW * f64::from(row.abs_diff(color.back_row()));
    score
}

/// Flank and pawn-shield terms for one king, from its owner's point of view.
fn king_safety(board: &Grid, square: Square, color: Color) -> f64 {
    let col = square.col();
    if (3..=5).contains(&col) {
        return 0.0;
    }

    let dir = color.pawn_direction();
    let mut near = 0;
    let mut far = 0;
    for dc in [-1, 1] {
        if is_pawn(board, square.offset(dir, dc), color) {
            near += 1;
        }
        if is_pawn(board, square.offset(2 * dir, dc), color) {
            far += 1;
        }
    }

    let shield = match (near, far) {
        (2.., _) => 0.0,
        (0, _) => -SHIELD_MISSING,
        (_, far) => -SHIELD_THIN[far.min(2)],
    };
    KING_ON_FLANK + shield
}

/// Scores the position from White's perspective.
///
/// Pure: reads the board and the ply count only.
pub fn evaluate(state: &GameState) -> f64 {
    let board = state.board();
    let census = Census::take(board);
    let opening = state.plies() < EARLY_QUEEN_PLIES;
    let mut score = 0.0;

    for square in Square::all() {
        let Some(piece) = piece_at(board, square) else {
            continue;
        };
        let color = piece.color;
        let (row, col) = (square.row(), square.col());

        let mut terms = piece.kind.value();
        match piece.kind {
            PieceKind::Pawn => terms += pawn_terms(board, square, color),
            PieceKind::Knight | PieceKind::Bishop => {
                if row != color.back_row() {
                    terms += DEVELOPED_MINOR;
                }
                if piece.kind == PieceKind::Knight && (col == 0 || col == 7) {
                    terms -= KNIGHT_ON_RIM;
                }
            }
            PieceKind::Rook => {
                if (3..=6).contains(&col) && census.open_file(col) {
                    terms += ROOK_OPEN_FILE;
                }
            }
            PieceKind::Queen => {
                if opening && square != Square::at(color.back_row(), 3) {
                    terms -= EARLY_QUEEN;
                }
            }
            PieceKind::King => {
                if census.queens[color.opposite().index()] {
                    terms += king_safety(board, square, color);
                }
            }
        }

        score += f64::from(color.sign()) * terms;
    }

    for col in 0..8 {
        for color in Color::BOTH {
            let extra = census.pawns[color.index()][col].saturating_sub(1);
            score -= f64::from(color.sign()) * DOUBLED_PAWN * f64::from(extra);
        }
    }

    score
}
