//! Board occupancy and attack generation.

use std::collections::{HashMap, HashSet};
use std::io::{self, Write};

use crate::piece::{pawn_attack_offsets, Color, Piece, PieceKind};
use crate::square::{sq, Square};

/// Mutable mapping of squares to pieces.
///
/// Squares are rank-major; absent entries are empty squares. The board
/// caches each color's king square and keeps the cache in sync on every
/// mutation that touches a king. It is cheap to clone, which is how
/// hypothetical moves are tried without committing them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    width: i8,
    height: i8,
    squares: Vec<Option<Piece>>,
    kings: [Option<Square>; 2],
}

impl Board {
    pub fn new_empty(width: i8, height: i8) -> Board {
        Board {
            width,
            height,
            squares: vec![None; (width as usize) * (height as usize)],
            kings: [None, None],
        }
    }

    /// Standard 8x8 starting occupancy.
    pub fn new_standard() -> Board {
        let mut board = Board::new_empty(8, 8);
        let back = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for (file, &kind) in back.iter().enumerate() {
            let file = file as i8;
            board.set(sq(file, 0), Piece::new(Color::White, kind));
            board.set(sq(file, 1), Piece::new(Color::White, PieceKind::Pawn));
            board.set(sq(file, 6), Piece::new(Color::Black, PieceKind::Pawn));
            board.set(sq(file, 7), Piece::new(Color::Black, kind));
        }
        board
    }

    #[inline]
    pub fn width(&self) -> i8 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i8 {
        self.height
    }

    /// Whether these coordinates are on the board at all.
    #[inline]
    pub fn contains(&self, square: Square) -> bool {
        square.file >= 0 && square.file < self.width && square.rank >= 0 && square.rank < self.height
    }

    #[inline]
    fn index(&self, square: Square) -> usize {
        (square.rank as usize) * (self.width as usize) + (square.file as usize)
    }

    #[inline]
    pub fn get(&self, square: Square) -> Option<Piece> {
        self.squares[self.index(square)]
    }

    #[inline]
    pub fn has_piece_at(&self, square: Square) -> bool {
        self.get(square).is_some()
    }

    /// Place `piece` on `square`, replacing any occupant.
    pub fn set(&mut self, square: Square, piece: Piece) {
        let i = self.index(square);
        if let Some(old) = self.squares[i] {
            if old.kind == PieceKind::King {
                self.kings[old.color.index()] = None;
            }
        }
        self.squares[i] = Some(piece);
        if piece.kind == PieceKind::King {
            self.kings[piece.color.index()] = Some(square);
        }
    }

    /// Empty `square`, returning the removed piece if any.
    pub fn remove(&mut self, square: Square) -> Option<Piece> {
        let i = self.index(square);
        let removed = self.squares[i].take();
        if let Some(piece) = removed {
            if piece.kind == PieceKind::King {
                self.kings[piece.color.index()] = None;
            }
        }
        removed
    }

    /// Cached king square of `color`.
    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.kings[color.index()]
    }

    /// All pieces of `color` with their squares, rank-major order.
    pub fn pieces_of(&self, color: Color) -> Vec<(Square, Piece)> {
        let mut pieces = Vec::with_capacity(16);
        for rank in 0..self.height {
            for file in 0..self.width {
                let square = sq(file, rank);
                if let Some(piece) = self.get(square) {
                    if piece.color == color {
                        pieces.push((square, piece));
                    }
                }
            }
        }
        pieces
    }

    pub fn num_pieces(&self) -> usize {
        self.squares.iter().filter(|s| s.is_some()).count()
    }

    /// Piece counts per kind, indexed by color.
    pub fn material_count(&self) -> [HashMap<PieceKind, u32>; 2] {
        let mut counts = [HashMap::new(), HashMap::new()];
        for piece in self.squares.iter().flatten() {
            *counts[piece.color.index()].entry(piece.kind).or_insert(0) += 1;
        }
        counts
    }

    /// Every square attacked by `color`.
    ///
    /// Occupied squares are included regardless of occupant color: a
    /// defended friendly piece sits on an attacked square, which is
    /// what king-safety and castling-path checks need.
    pub fn attacked_squares(&self, color: Color) -> HashSet<Square> {
        let mut attacked = HashSet::new();
        for (square, piece) in self.pieces_of(color) {
            self.walk_attacks(square, piece, &mut |s| {
                attacked.insert(s);
                false
            });
        }
        attacked
    }

    /// Short-circuiting attack test: does any piece of `color` attack
    /// `target`?
    pub fn is_attacking(&self, color: Color, target: Square) -> bool {
        for (square, piece) in self.pieces_of(color) {
            if self.walk_attacks(square, piece, &mut |s| s == target) {
                return true;
            }
        }
        false
    }

    /// Walk the attack pattern of `piece` standing on `source`, calling
    /// `visit` for each attacked square. Stops early (returning true)
    /// when `visit` does.
    ///
    /// Short-range pieces step each offset once; long-range pieces
    /// repeat an offset until the board edge or an occupied square,
    /// which is itself included.
    pub(crate) fn walk_attacks<F>(&self, source: Square, piece: Piece, visit: &mut F) -> bool
    where
        F: FnMut(Square) -> bool,
    {
        if piece.kind == PieceKind::Pawn {
            for (df, dr) in pawn_attack_offsets(piece.color) {
                let target = sq(source.file + df, source.rank + dr);
                if self.contains(target) && visit(target) {
                    return true;
                }
            }
            return false;
        }
        for &(df, dr) in piece.kind.offsets() {
            let mut target = sq(source.file + df, source.rank + dr);
            while self.contains(target) {
                if visit(target) {
                    return true;
                }
                if !piece.kind.is_long_range() || self.has_piece_at(target) {
                    break;
                }
                target = sq(target.file + df, target.rank + dr);
            }
        }
        false
    }

    /// Write an ASCII rendering of the board, top rank first.
    pub fn draw<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for rank in (0..self.height).rev() {
            let mut line = String::with_capacity(self.width as usize);
            for file in 0..self.width {
                line.push(self.get(sq(file, rank)).map_or('.', |p| p.to_char()));
            }
            writeln!(out, "{} {}", rank + 1, line)?;
        }
        let files: String = (0..self.width).map(|f| (b'a' + f as u8) as char).collect();
        writeln!(out, "  {}", files)
    }
}
