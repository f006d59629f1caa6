//! Zobrist hashing for position fingerprints.
//!
//! Each (square, piece) pair owns a random 64-bit key; a board's hash is the
//! XOR of the keys of every occupied square. Only piece placement is hashed:
//! side to move, castling rights and the en passant target are not part of
//! the fingerprint.
//!
//! Because XOR is its own inverse, [`hash_move`] both applies and undoes a
//! move's contribution.

use chess_core::{Grid, Move, Piece, PieceKind, Square};

/// Zobrist hash keys, indexed `[square][piece]`.
///
/// Generated at compile time from a fixed seed for reproducibility.
pub struct ZobristKeys {
    pieces: [[u64; 12]; 64],
}

impl ZobristKeys {
    /// Initializes the keys using a xorshift64 PRNG.
    pub const fn new() -> Self {
        const fn next_random(state: u64) -> u64 {
            let mut x = state;
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            x
        }

        let mut state = 0x9E3779B97F4A7C15u64; // Golden ratio seed
        let mut pieces = [[0u64; 12]; 64];

        let mut square = 0;
        while square < 64 {
            let mut piece = 0;
            while piece < 12 {
                state = next_random(state);
                pieces[square][piece] = state;
                piece += 1;
            }
            square += 1;
        }

        ZobristKeys { pieces }
    }

    /// Returns the key for a piece on a square.
    #[inline]
    pub const fn piece_key(&self, piece: Piece, square: Square) -> u64 {
        self.pieces[square.index()][piece.index()]
    }
}

impl Default for ZobristKeys {
    fn default() -> Self {
        Self::new()
    }
}

/// Global Zobrist keys (initialized at compile time).
pub static ZOBRIST: ZobristKeys = ZobristKeys::new();

/// Hashes a full board from scratch.
pub fn init_hash(board: &Grid) -> u64 {
    let mut hash = 0u64;
    for square in Square::all() {
        if let Some(piece) = board[square.row() as usize][square.col() as usize] {
            hash ^= ZOBRIST.piece_key(piece, square);
        }
    }
    hash
}

/// Toggles the contribution of `mv` into `hash`.
///
/// Covers the moving piece on both squares (the promoted piece on the
/// destination), the captured piece on its capture square and the rook of
/// a castle. Applying it twice with the same move restores `hash`.
pub fn hash_move(mv: &Move, hash: u64) -> u64 {
    let mut hash = hash;
    hash ^= ZOBRIST.piece_key(mv.moved(), mv.from());
    hash ^= ZOBRIST.piece_key(mv.placed(), mv.to());

    if let Some(captured) = mv.captured() {
        hash ^= ZOBRIST.piece_key(captured, mv.capture_square());
    }

    if let Some((rook_from, rook_to)) = mv.castle_rook_squares() {
        let rook = Piece::new(mv.moved().color, PieceKind::Rook);
        hash ^= ZOBRIST.piece_key(rook, rook_from);
        hash ^= ZOBRIST.piece_key(rook, rook_to);
    }

    hash
}
