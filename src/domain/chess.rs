//! Piece value types shared by the board, the theme tables and the rules adapter.
//! No GPUI dependencies - this is the domain layer.

use shakmaty::{Color as SColor, File, Rank, Role, Square};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum PieceKind {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum PieceColor {
    White,
    Black,
}

impl PieceColor {
    pub fn other(self) -> Self {
        match self {
            PieceColor::White => PieceColor::Black,
            PieceColor::Black => PieceColor::White,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: PieceColor,
}

impl Piece {
    pub fn new(color: PieceColor, kind: PieceKind) -> Self {
        Self { kind, color }
    }

    /// Two-letter code used as pieceset key, e.g. `wq` or `bn`
    pub fn code(&self) -> &'static str {
        match (self.color, self.kind) {
            (PieceColor::White, PieceKind::Pawn) => "wp",
            (PieceColor::White, PieceKind::Rook) => "wr",
            (PieceColor::White, PieceKind::Knight) => "wn",
            (PieceColor::White, PieceKind::Bishop) => "wb",
            (PieceColor::White, PieceKind::Queen) => "wq",
            (PieceColor::White, PieceKind::King) => "wk",
            (PieceColor::Black, PieceKind::Pawn) => "bp",
            (PieceColor::Black, PieceKind::Rook) => "br",
            (PieceColor::Black, PieceKind::Knight) => "bn",
            (PieceColor::Black, PieceKind::Bishop) => "bb",
            (PieceColor::Black, PieceKind::Queen) => "bq",
            (PieceColor::Black, PieceKind::King) => "bk",
        }
    }
}

/// File index 0..8 (a = 0)
pub fn file_index(square: Square) -> u32 {
    square.file() as u32
}

/// Rank index 0..8 (rank 1 = 0)
pub fn rank_index(square: Square) -> u32 {
    square.rank() as u32
}

/// Build a square from file and rank indices, `None` outside the board
pub fn square_at(file: i32, rank: i32) -> Option<Square> {
    if (0..8).contains(&file) && (0..8).contains(&rank) {
        Some(Square::from_coords(File::new(file as u32), Rank::new(rank as u32)))
    } else {
        None
    }
}

/// Whether the square is a dark one (a1 is dark)
pub fn is_dark_square(square: Square) -> bool {
    (file_index(square) + rank_index(square)) % 2 == 0
}

pub fn color_from_shakmaty(color: SColor) -> PieceColor {
    match color {
        SColor::White => PieceColor::White,
        SColor::Black => PieceColor::Black,
    }
}

pub fn kind_from_role(role: Role) -> PieceKind {
    match role {
        Role::Pawn => PieceKind::Pawn,
        Role::Knight => PieceKind::Knight,
        Role::Bishop => PieceKind::Bishop,
        Role::Rook => PieceKind::Rook,
        Role::Queen => PieceKind::Queen,
        Role::King => PieceKind::King,
    }
}

pub fn role_from_kind(kind: PieceKind) -> Role {
    match kind {
        PieceKind::Pawn => Role::Pawn,
        PieceKind::Knight => Role::Knight,
        PieceKind::Bishop => Role::Bishop,
        PieceKind::Rook => Role::Rook,
        PieceKind::Queen => Role::Queen,
        PieceKind::King => Role::King,
    }
}

/// Convert shakmaty piece to our domain Piece
pub fn shakmaty_to_piece(piece: shakmaty::Piece) -> Piece {
    Piece {
        kind: kind_from_role(piece.role),
        color: color_from_shakmaty(piece.color),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_at_bounds() {
        assert_eq!(square_at(4, 3), Some(Square::E4));
        assert_eq!(square_at(0, 0), Some(Square::A1));
        assert_eq!(square_at(7, 7), Some(Square::H8));
        assert_eq!(square_at(8, 0), None);
        assert_eq!(square_at(0, -1), None);
    }

    #[test]
    fn test_square_colors() {
        assert!(is_dark_square(Square::A1));
        assert!(!is_dark_square(Square::H1));
        assert!(is_dark_square(Square::H8));
    }

    #[test]
    fn test_piece_codes() {
        assert_eq!(Piece::new(PieceColor::White, PieceKind::Queen).code(), "wq");
        assert_eq!(Piece::new(PieceColor::Black, PieceKind::Knight).code(), "bn");
    }
}
