//! Colors, piece kinds and the movement catalog.

use std::fmt;

/// Side colors. Exactly two, never more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    #[inline]
    pub fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Direction sign of this color's pawn pushes.
    #[inline]
    pub fn forward(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Rank where this color's pieces start, on a board `height` tall.
    #[inline]
    pub fn back_rank(self, height: i8) -> i8 {
        match self {
            Color::White => 0,
            Color::Black => height - 1,
        }
    }

    /// Rank where this color's pawns start.
    #[inline]
    pub fn pawn_start_rank(self, height: i8) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => height - 2,
        }
    }

    /// Index for per-color arrays.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Color::White => "white",
            Color::Black => "black",
        })
    }
}

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2), (2, 1), (2, -1), (1, -2), (-1, -2), (-2, -1), (-2, 1), (-1, 2),
];
const BISHOP_OFFSETS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];
const ROOK_OFFSETS: [(i8, i8); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];
const ROYAL_OFFSETS: [(i8, i8); 8] = [
    (1, 0), (1, 1), (0, 1), (-1, 1), (-1, 0), (-1, -1), (0, -1), (1, -1),
];

/// Piece kinds.
///
/// Each kind carries its movement-offset table and its range class in
/// the catalog below; there is no runtime registry to populate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Uppercase display initial.
    pub fn initial(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }

    pub fn from_initial(c: char) -> Option<PieceKind> {
        match c {
            'P' => Some(PieceKind::Pawn),
            'N' => Some(PieceKind::Knight),
            'B' => Some(PieceKind::Bishop),
            'R' => Some(PieceKind::Rook),
            'Q' => Some(PieceKind::Queen),
            'K' => Some(PieceKind::King),
            _ => None,
        }
    }

    /// Movement offsets as (Δfile, Δrank) pairs.
    ///
    /// Pawns are absent from this table: their pushes are not attacks
    /// and their attacks depend on color, see [`pawn_attack_offsets`].
    pub fn offsets(self) -> &'static [(i8, i8)] {
        match self {
            PieceKind::Pawn => &[],
            PieceKind::Knight => &KNIGHT_OFFSETS,
            PieceKind::Bishop => &BISHOP_OFFSETS,
            PieceKind::Rook => &ROOK_OFFSETS,
            PieceKind::Queen | PieceKind::King => &ROYAL_OFFSETS,
        }
    }

    /// Long-range kinds repeat their offsets until blocked; short-range
    /// kinds step once.
    pub fn is_long_range(self) -> bool {
        matches!(self, PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen)
    }
}

/// Diagonal attack offsets of a pawn of `color`.
///
/// Pawns never attack the square directly ahead.
#[inline]
pub fn pawn_attack_offsets(color: Color) -> [(i8, i8); 2] {
    let fwd = color.forward();
    [(-1, fwd), (1, fwd)]
}

/// A colored piece. Plain value, no identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    #[inline]
    pub const fn new(color: Color, kind: PieceKind) -> Piece {
        Piece { color, kind }
    }

    /// FEN letter: uppercase for White, lowercase for Black.
    pub fn to_char(self) -> char {
        let c = self.kind.initial();
        match self.color {
            Color::White => c,
            Color::Black => c.to_ascii_lowercase(),
        }
    }

    pub fn from_char(c: char) -> Option<Piece> {
        let kind = PieceKind::from_initial(c.to_ascii_uppercase())?;
        let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
        Some(Piece { color, kind })
    }
}
