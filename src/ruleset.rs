//! Variant configuration.

use crate::castling::Wing;
use crate::piece::{Color, PieceKind};

/// Kinds a pawn may promote to, in the order promotion moves are
/// expanded in the legal-move list.
pub const PROMOTION_KINDS: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];

/// Everything that distinguishes a chess variant from standard play:
/// board dimensions, castling geometry and promotion choices.
///
/// A single value consumed by the board and position code; variants are
/// configuration, not subclasses.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ruleset {
    pub width: i8,
    pub height: i8,
    /// Initial king file, shared by both colors.
    pub king_file: i8,
    pub kingside_rook_file: i8,
    pub queenside_rook_file: i8,
    pub promotions: &'static [PieceKind],
}

impl Ruleset {
    /// Standard 8x8 chess.
    pub fn standard() -> Ruleset {
        Ruleset {
            width: 8,
            height: 8,
            king_file: 4,
            kingside_rook_file: 7,
            queenside_rook_file: 0,
            promotions: &PROMOTION_KINDS,
        }
    }

    /// Shuffled (960-style) setup on a standard board.
    ///
    /// The caller provides the back-rank files of the king and both
    /// rooks; castling destinations stay on the usual c/d and g/f
    /// files. Files must satisfy `queenside < king < kingside`.
    pub fn shuffled(king_file: i8, queenside_rook_file: i8, kingside_rook_file: i8) -> Ruleset {
        debug_assert!(queenside_rook_file < king_file && king_file < kingside_rook_file);
        Ruleset {
            king_file,
            kingside_rook_file,
            queenside_rook_file,
            ..Ruleset::standard()
        }
    }

    /// True for the classic e1/a1/h1 castling geometry, which lets FEN
    /// castling fields use the KQkq letters.
    pub fn is_standard_geometry(&self) -> bool {
        self.width == 8
            && self.height == 8
            && self.king_file == 4
            && self.kingside_rook_file == 7
            && self.queenside_rook_file == 0
    }

    /// Wing a rook on `file` castles on, relative to the king's file.
    pub fn wing_of_rook_file(&self, file: i8) -> Wing {
        if file > self.king_file { Wing::King } else { Wing::Queen }
    }

    /// File the king lands on when castling on `wing`.
    pub fn king_target_file(&self, wing: Wing) -> i8 {
        match wing {
            Wing::King => self.width - 2,
            Wing::Queen => 2,
        }
    }

    /// File the castling rook lands on.
    pub fn rook_target_file(&self, wing: Wing) -> i8 {
        match wing {
            Wing::King => self.width - 3,
            Wing::Queen => 3,
        }
    }

    pub fn back_rank(&self, color: Color) -> i8 {
        color.back_rank(self.height)
    }

    pub fn pawn_start_rank(&self, color: Color) -> i8 {
        color.pawn_start_rank(self.height)
    }

    /// Rank a pawn of `color` promotes on (the enemy back rank).
    pub fn promotion_rank(&self, color: Color) -> i8 {
        color.opposite().back_rank(self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_geometry() {
        let rs = Ruleset::standard();
        assert!(rs.is_standard_geometry());
        assert_eq!(rs.king_target_file(Wing::King), 6);
        assert_eq!(rs.rook_target_file(Wing::King), 5);
        assert_eq!(rs.king_target_file(Wing::Queen), 2);
        assert_eq!(rs.rook_target_file(Wing::Queen), 3);
        assert_eq!(rs.promotion_rank(Color::White), 7);
        assert_eq!(rs.promotion_rank(Color::Black), 0);
    }

    #[test]
    fn test_shuffled_geometry() {
        // King on b1, rooks on a1 and e1.
        let rs = Ruleset::shuffled(1, 0, 4);
        assert!(!rs.is_standard_geometry());
        assert_eq!(rs.wing_of_rook_file(4), Wing::King);
        assert_eq!(rs.wing_of_rook_file(0), Wing::Queen);
        // Castling destinations do not depend on the shuffle.
        assert_eq!(rs.king_target_file(Wing::King), 6);
        assert_eq!(rs.king_target_file(Wing::Queen), 2);
    }
}
