//! Moves and their application to a board.

use crate::board::Board;
use crate::piece::{Piece, PieceKind};
use crate::square::{sq, Square};

/// A move, tagged by what it does on the board.
///
/// Values are immutable once built. Promotion is carried inside the
/// pawn variant: the legal-move list contains one fully-formed move per
/// promotable kind, so there is no half-built "promotion pending"
/// state to finalize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    /// Quiet move or capture by any piece, pawns excepted.
    Plain { source: Square, dest: Square },
    /// Compound king+rook move.
    Castle {
        king_source: Square,
        king_dest: Square,
        rook_source: Square,
        rook_dest: Square,
    },
    /// Pawn push or capture, including double steps, en passant and
    /// promotions.
    Pawn {
        source: Square,
        dest: Square,
        double_step: bool,
        en_passant: bool,
        promotion: Option<PieceKind>,
    },
}

/// What a move application needs to remember to be reverted exactly:
/// the piece that moved (pre-promotion) and the captured piece with the
/// square it actually stood on, which for en passant is not the
/// destination square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Undo {
    moved: Piece,
    captured: Option<(Square, Piece)>,
}

impl Move {
    /// Square the moving piece leaves; the king's for a castle.
    pub fn source(&self) -> Square {
        match *self {
            Move::Plain { source, .. } => source,
            Move::Castle { king_source, .. } => king_source,
            Move::Pawn { source, .. } => source,
        }
    }

    /// Square the moving piece lands on; the king's for a castle.
    pub fn dest(&self) -> Square {
        match *self {
            Move::Plain { dest, .. } => dest,
            Move::Castle { king_dest, .. } => king_dest,
            Move::Pawn { dest, .. } => dest,
        }
    }

    pub fn promotion(&self) -> Option<PieceKind> {
        match *self {
            Move::Pawn { promotion, .. } => promotion,
            _ => None,
        }
    }

    pub fn is_castle(&self) -> bool {
        matches!(self, Move::Castle { .. })
    }

    pub fn is_en_passant(&self) -> bool {
        matches!(self, Move::Pawn { en_passant: true, .. })
    }

    /// Whether this move captures something on `board` (before apply).
    pub fn is_capture(&self, board: &Board) -> bool {
        match *self {
            Move::Castle { .. } => false,
            Move::Pawn { en_passant: true, .. } => true,
            _ => board.has_piece_at(self.dest()),
        }
    }

    /// Square holding the captured piece, if this move captures on
    /// `board`. Differs from `dest` for en passant.
    fn capture_square(&self, board: &Board) -> Option<Square> {
        match *self {
            Move::Castle { .. } => None,
            Move::Pawn { source, dest, en_passant: true, .. } => {
                Some(sq(dest.file, source.rank))
            }
            _ if board.has_piece_at(self.dest()) => Some(self.dest()),
            _ => None,
        }
    }

    /// Mutate `board` to reflect this move, returning the undo record.
    ///
    /// Expects a board this move makes sense on: a piece on the source
    /// square, both castle pieces present, etc. Move lists produced by
    /// a position always qualify.
    pub fn apply_to(&self, board: &mut Board) -> Undo {
        match *self {
            Move::Plain { source, dest } => {
                let moved = take_piece(board, source);
                let captured = board.remove(dest).map(|p| (dest, p));
                board.set(dest, moved);
                Undo { moved, captured }
            }
            Move::Pawn { source, dest, promotion, .. } => {
                let capture_square = self.capture_square(board);
                let moved = take_piece(board, source);
                let captured = capture_square
                    .and_then(|s| board.remove(s).map(|p| (s, p)));
                let placed = match promotion {
                    Some(kind) => Piece::new(moved.color, kind),
                    None => moved,
                };
                board.set(dest, placed);
                Undo { moved, captured }
            }
            Move::Castle { king_source, king_dest, rook_source, rook_dest } => {
                // Clear both squares before setting both, so a king
                // landing on the rook's origin (or vice versa, as
                // happens in shuffled setups) never corrupts occupancy.
                let king = take_piece(board, king_source);
                let rook = take_piece(board, rook_source);
                board.set(king_dest, king);
                board.set(rook_dest, rook);
                Undo { moved: king, captured: None }
            }
        }
    }

    /// Exact inverse of `apply_to`, restoring any captured piece to the
    /// square it was taken from.
    pub fn unmake(&self, board: &mut Board, undo: &Undo) {
        match *self {
            Move::Plain { source, dest } | Move::Pawn { source, dest, .. } => {
                board.remove(dest);
                board.set(source, undo.moved);
                if let Some((square, piece)) = undo.captured {
                    board.set(square, piece);
                }
            }
            Move::Castle { king_source, king_dest, rook_source, rook_dest } => {
                let king = take_piece(board, king_dest);
                let rook = take_piece(board, rook_dest);
                board.set(king_source, king);
                board.set(rook_source, rook);
            }
        }
    }
}

fn take_piece(board: &mut Board, square: Square) -> Piece {
    match board.remove(square) {
        Some(piece) => piece,
        None => panic!("no piece on {}", square),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::Color;

    fn put(board: &mut Board, s: &str, color: Color, kind: PieceKind) {
        board.set(Square::parse(s).unwrap(), Piece::new(color, kind));
    }

    fn at(s: &str) -> Square {
        Square::parse(s).unwrap()
    }

    #[test]
    fn test_apply_and_unmake_plain_capture() {
        let mut b = Board::new_empty(8, 8);
        put(&mut b, "d4", Color::White, PieceKind::Knight);
        put(&mut b, "e6", Color::Black, PieceKind::Pawn);
        let before = b.clone();

        let m = Move::Plain { source: at("d4"), dest: at("e6") };
        assert!(m.is_capture(&b));
        let undo = m.apply_to(&mut b);
        assert!(!b.has_piece_at(at("d4")));
        assert_eq!(b.get(at("e6")), Some(Piece::new(Color::White, PieceKind::Knight)));
        assert_eq!(b.num_pieces(), 1);

        m.unmake(&mut b, &undo);
        assert_eq!(b, before);
    }

    #[test]
    fn test_apply_and_unmake_en_passant() {
        let mut b = Board::new_empty(8, 8);
        put(&mut b, "e5", Color::White, PieceKind::Pawn);
        put(&mut b, "d5", Color::Black, PieceKind::Pawn);
        let before = b.clone();

        // White captures en passant on d6; the black pawn dies on d5.
        let m = Move::Pawn {
            source: at("e5"),
            dest: at("d6"),
            double_step: false,
            en_passant: true,
            promotion: None,
        };
        assert!(m.is_capture(&b));
        let undo = m.apply_to(&mut b);
        assert_eq!(b.get(at("d6")), Some(Piece::new(Color::White, PieceKind::Pawn)));
        assert!(!b.has_piece_at(at("d5")));
        assert!(!b.has_piece_at(at("e5")));

        m.unmake(&mut b, &undo);
        assert_eq!(b, before);
    }

    #[test]
    fn test_apply_and_unmake_promotion() {
        let mut b = Board::new_empty(8, 8);
        put(&mut b, "a7", Color::White, PieceKind::Pawn);
        put(&mut b, "b8", Color::Black, PieceKind::Rook);
        let before = b.clone();

        let m = Move::Pawn {
            source: at("a7"),
            dest: at("b8"),
            double_step: false,
            en_passant: false,
            promotion: Some(PieceKind::Queen),
        };
        let undo = m.apply_to(&mut b);
        assert_eq!(b.get(at("b8")), Some(Piece::new(Color::White, PieceKind::Queen)));

        // Unmake restores the pawn, not the queen, and the taken rook.
        m.unmake(&mut b, &undo);
        assert_eq!(b, before);
    }

    #[test]
    fn test_apply_and_unmake_castle() {
        let mut b = Board::new_empty(8, 8);
        put(&mut b, "e1", Color::White, PieceKind::King);
        put(&mut b, "h1", Color::White, PieceKind::Rook);
        let before = b.clone();

        let m = Move::Castle {
            king_source: at("e1"),
            king_dest: at("g1"),
            rook_source: at("h1"),
            rook_dest: at("f1"),
        };
        assert!(!m.is_capture(&b));
        let undo = m.apply_to(&mut b);
        assert_eq!(b.get(at("g1")), Some(Piece::new(Color::White, PieceKind::King)));
        assert_eq!(b.get(at("f1")), Some(Piece::new(Color::White, PieceKind::Rook)));
        assert!(!b.has_piece_at(at("e1")));
        assert!(!b.has_piece_at(at("h1")));
        assert_eq!(b.king_square(Color::White), Some(at("g1")));

        m.unmake(&mut b, &undo);
        assert_eq!(b, before);
        assert_eq!(b.king_square(Color::White), Some(at("e1")));
    }

    #[test]
    fn test_castle_onto_shared_squares() {
        // Shuffled setup: king on b1, queen-side rook on a1. Castling
        // lands the king on c1 and the rook on d1; the intermediate
        // states overlap the origin squares.
        let mut b = Board::new_empty(8, 8);
        put(&mut b, "b1", Color::White, PieceKind::King);
        put(&mut b, "a1", Color::White, PieceKind::Rook);
        let before = b.clone();

        let m = Move::Castle {
            king_source: at("b1"),
            king_dest: at("c1"),
            rook_source: at("a1"),
            rook_dest: at("d1"),
        };
        let undo = m.apply_to(&mut b);
        assert_eq!(b.get(at("c1")), Some(Piece::new(Color::White, PieceKind::King)));
        assert_eq!(b.get(at("d1")), Some(Piece::new(Color::White, PieceKind::Rook)));
        assert_eq!(b.num_pieces(), 2);

        m.unmake(&mut b, &undo);
        assert_eq!(b, before);
    }
}
