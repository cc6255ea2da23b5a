//! Positions and legal move derivation.

use crate::board::Board;
use crate::castling::{CastlingRights, Wing};
use crate::errors::Error;
use crate::fen;
use crate::movement::Move;
use crate::notation;
use crate::piece::{Color, PieceKind};
use crate::ruleset::Ruleset;
use crate::square::{sq, Square};

/// Terminal state of a position.
///
/// Triple repetition needs the ancestor chain and is therefore
/// reported by `Game::status`, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ongoing,
    Checkmate,
    Stalemate,
    FiftyMoveRule,
    TripleRepetition,
    InsufficientMaterial,
}

/// Immutable snapshot of a game: board, side to move, castling rights,
/// en-passant target and clocks.
///
/// The legal-move list and the in-check flag are derived once at
/// construction and frozen; a position never changes after that. The
/// half-move clock counts half-moves since the last capture or pawn
/// push, the full-move number starts at 1 and increments after Black
/// moves.
#[derive(Debug, Clone)]
pub struct Position {
    board: Board,
    color: Color,
    castling: CastlingRights,
    en_passant: Option<Square>,
    halfmove: u32,
    fullmove: u32,
    ruleset: Ruleset,
    legal_moves: Vec<Move>,
    in_check: bool,
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        // Derived fields follow from the snapshot fields.
        self.board == other.board
            && self.color == other.color
            && self.castling == other.castling
            && self.en_passant == other.en_passant
            && self.halfmove == other.halfmove
            && self.fullmove == other.fullmove
            && self.ruleset == other.ruleset
    }
}

impl Eq for Position {}

impl Position {
    /// Build a position from explicit parts, validating the king-count
    /// invariant (exactly one king per color).
    pub fn new(
        board: Board,
        color: Color,
        castling: CastlingRights,
        en_passant: Option<Square>,
        halfmove: u32,
        fullmove: u32,
        ruleset: Ruleset,
    ) -> Result<Position, Error> {
        for side in [Color::White, Color::Black] {
            let kings = board
                .pieces_of(side)
                .iter()
                .filter(|(_, p)| p.kind == PieceKind::King)
                .count();
            if kings != 1 {
                return Err(Error::UnreachablePosition {
                    reason: format!("{} {} kings on the board", kings, side),
                });
            }
        }
        Ok(Position::new_unchecked(
            board, color, castling, en_passant, halfmove, fullmove, ruleset,
        ))
    }

    /// Internal constructor for boards already known to be sound, e.g.
    /// successors of a validated position.
    fn new_unchecked(
        board: Board,
        color: Color,
        castling: CastlingRights,
        en_passant: Option<Square>,
        halfmove: u32,
        fullmove: u32,
        ruleset: Ruleset,
    ) -> Position {
        let in_check = match board.king_square(color) {
            Some(king) => board.is_attacking(color.opposite(), king),
            None => false,
        };
        let legal_moves =
            derive_legal_moves(&board, color, &castling, en_passant, &ruleset, in_check);
        Position {
            board,
            color,
            castling,
            en_passant,
            halfmove,
            fullmove,
            ruleset,
            legal_moves,
            in_check,
        }
    }

    /// The standard starting position.
    pub fn from_start() -> Position {
        let ruleset = Ruleset::standard();
        let castling = CastlingRights::standard(&ruleset);
        Position::new_unchecked(
            Board::new_standard(),
            Color::White,
            castling,
            None,
            0,
            1,
            ruleset,
        )
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn castling(&self) -> &CastlingRights {
        &self.castling
    }

    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    pub fn halfmove(&self) -> u32 {
        self.halfmove
    }

    pub fn fullmove(&self) -> u32 {
        self.fullmove
    }

    pub fn ruleset(&self) -> &Ruleset {
        &self.ruleset
    }

    /// Moves the side to move may play, in generation order.
    pub fn legal_moves(&self) -> &[Move] {
        &self.legal_moves
    }

    pub fn is_in_check(&self) -> bool {
        self.in_check
    }

    /// Serialize to position text, see the `fen` module.
    pub fn to_fen(&self) -> String {
        fen::position_to_fen(self)
    }

    /// Derive the successor position of a legal move.
    ///
    /// Fails with `IllegalMove` if `m` is not in the legal-move list
    /// (structural equality; callers may rebuild an equal move).
    pub fn play(&self, m: &Move) -> Result<Position, Error> {
        if !self.legal_moves.contains(m) {
            return Err(Error::IllegalMove {
                notation: notation::move_to_uci(m),
            });
        }
        let mut board = self.board.clone();
        let is_capture = m.is_capture(&board);
        let is_pawn_move = matches!(m, Move::Pawn { .. });
        let mut castling = self.castling.clone();

        // Capturing an enemy rook still on its origin square takes the
        // victim's castling right with it.
        let enemy = self.color.opposite();
        if let Some(piece) = board.get(m.dest()) {
            if piece.color == enemy
                && piece.kind == PieceKind::Rook
                && m.dest().rank == self.ruleset.back_rank(enemy)
            {
                castling.clear_file(enemy, m.dest().file);
            }
        }
        // A king move (castling included) clears both own rights; a
        // rook leaving its origin square clears that file.
        match self.board.get(m.source()).map(|p| p.kind) {
            Some(PieceKind::King) => castling.clear_color(self.color),
            Some(PieceKind::Rook)
                if m.source().rank == self.ruleset.back_rank(self.color) =>
            {
                castling.clear_file(self.color, m.source().file);
            }
            _ => {}
        }

        m.apply_to(&mut board);

        let en_passant = match *m {
            Move::Pawn { source, double_step: true, .. } => {
                Some(sq(source.file, source.rank + self.color.forward()))
            }
            _ => None,
        };
        let halfmove = if is_capture || is_pawn_move { 0 } else { self.halfmove + 1 };
        let fullmove = match self.color {
            Color::White => self.fullmove,
            Color::Black => self.fullmove + 1,
        };
        Ok(Position::new_unchecked(
            board,
            enemy,
            castling,
            en_passant,
            halfmove,
            fullmove,
            self.ruleset.clone(),
        ))
    }

    /// Same board diagram for repetition purposes: occupancy, side to
    /// move, castling rights and en-passant target, clocks ignored.
    pub fn same_diagram(&self, other: &Position) -> bool {
        self.board == other.board
            && self.color == other.color
            && self.castling == other.castling
            && self.en_passant == other.en_passant
    }

    /// Terminal status of this position alone.
    pub fn status(&self) -> Status {
        if self.legal_moves.is_empty() {
            return if self.in_check { Status::Checkmate } else { Status::Stalemate };
        }
        if self.halfmove >= 100 {
            return Status::FiftyMoveRule;
        }
        if self.has_insufficient_material() {
            return Status::InsufficientMaterial;
        }
        Status::Ongoing
    }

    /// Standard insufficient-material table: bare kings, king versus
    /// king and one minor piece, or one bishop each on same-colored
    /// squares.
    fn has_insufficient_material(&self) -> bool {
        let mut extras: [Vec<(Square, PieceKind)>; 2] = [vec![], vec![]];
        for color in [Color::White, Color::Black] {
            for (square, piece) in self.board.pieces_of(color) {
                if piece.kind != PieceKind::King {
                    extras[color.index()].push((square, piece.kind));
                }
            }
        }
        let minor = |k: PieceKind| matches!(k, PieceKind::Knight | PieceKind::Bishop);
        match (&extras[0][..], &extras[1][..]) {
            ([], []) => true,
            ([], [(_, kind)]) | ([(_, kind)], []) => minor(*kind),
            ([(s1, PieceKind::Bishop)], [(s2, PieceKind::Bishop)]) => {
                s1.is_light() == s2.is_light()
            }
            _ => false,
        }
    }
}

/// Compute the full legal-move list for `color`.
///
/// Pseudo-legal moves are generated first, then filtered by trying
/// each one on a scratch board and rejecting those that leave the own
/// king attacked. No move is exempt from that filter. Castling is
/// generated separately with its own path rules.
fn derive_legal_moves(
    board: &Board,
    color: Color,
    castling: &CastlingRights,
    en_passant: Option<Square>,
    ruleset: &Ruleset,
    in_check: bool,
) -> Vec<Move> {
    let mut moves = Vec::with_capacity(40);
    for (square, piece) in board.pieces_of(color) {
        if piece.kind == PieceKind::Pawn {
            generate_pawn_moves(board, color, square, en_passant, ruleset, &mut moves);
        } else {
            board.walk_attacks(square, piece, &mut |dest| {
                let same_color = board.get(dest).map_or(false, |p| p.color == color);
                if !same_color {
                    moves.push(Move::Plain { source: square, dest });
                }
                false
            });
        }
    }

    // Try-then-revert king safety filter.
    let opponent = color.opposite();
    let mut scratch = board.clone();
    moves.retain(|m| {
        let undo = m.apply_to(&mut scratch);
        let safe = match scratch.king_square(color) {
            Some(king) => !scratch.is_attacking(opponent, king),
            None => true,
        };
        m.unmake(&mut scratch, &undo);
        safe
    });

    generate_castles(board, color, castling, ruleset, in_check, &mut moves);
    moves
}

/// Pawn pushes and captures from `square`.
///
/// Moves reaching the promotion rank are expanded into one move per
/// promotable kind; callers select among the expansions.
fn generate_pawn_moves(
    board: &Board,
    color: Color,
    square: Square,
    en_passant: Option<Square>,
    ruleset: &Ruleset,
    moves: &mut Vec<Move>,
) {
    let fwd = color.forward();
    let one = sq(square.file, square.rank + fwd);
    if board.contains(one) && !board.has_piece_at(one) {
        push_pawn_move(color, square, one, false, ruleset, moves);
        if square.rank == ruleset.pawn_start_rank(color) {
            let two = sq(square.file, square.rank + 2 * fwd);
            if board.contains(two) && !board.has_piece_at(two) {
                moves.push(Move::Pawn {
                    source: square,
                    dest: two,
                    double_step: true,
                    en_passant: false,
                    promotion: None,
                });
            }
        }
    }
    for (df, dr) in crate::piece::pawn_attack_offsets(color) {
        let dest = sq(square.file + df, square.rank + dr);
        if !board.contains(dest) {
            continue;
        }
        let takes_en_passant = en_passant == Some(dest);
        let takes_enemy = board.get(dest).map_or(false, |p| p.color != color);
        if takes_enemy || takes_en_passant {
            push_pawn_move(color, square, dest, takes_en_passant, ruleset, moves);
        }
    }
}

fn push_pawn_move(
    color: Color,
    source: Square,
    dest: Square,
    en_passant: bool,
    ruleset: &Ruleset,
    moves: &mut Vec<Move>,
) {
    if dest.rank == ruleset.promotion_rank(color) {
        for &kind in ruleset.promotions {
            moves.push(Move::Pawn {
                source,
                dest,
                double_step: false,
                en_passant,
                promotion: Some(kind),
            });
        }
    } else {
        moves.push(Move::Pawn {
            source,
            dest,
            double_step: false,
            en_passant,
            promotion: None,
        });
    }
}

/// Castling moves for every rook file still available to `color`.
///
/// All of these must hold:
/// 1. The king is on its back rank and not currently in check.
/// 2. The availability file still holds an own rook.
/// 3. Every square the king crosses, destination included, is
///    unattacked and empty apart from the king itself and the castling
///    rook.
/// 4. Every square the rook crosses is empty apart from the king's own
///    square.
fn generate_castles(
    board: &Board,
    color: Color,
    castling: &CastlingRights,
    ruleset: &Ruleset,
    in_check: bool,
    moves: &mut Vec<Move>,
) {
    if in_check {
        return;
    }
    let back = ruleset.back_rank(color);
    let king_square = match board.king_square(color) {
        Some(k) if k.rank == back => k,
        _ => return,
    };
    let opponent = color.opposite();
    'files: for &rook_file in castling.files(color) {
        let rook_source = sq(rook_file, back);
        match board.get(rook_source) {
            Some(p) if p.color == color && p.kind == PieceKind::Rook => {}
            _ => continue,
        }
        let wing = if rook_file > king_square.file { Wing::King } else { Wing::Queen };
        let king_dest = sq(ruleset.king_target_file(wing), back);
        let rook_dest = sq(ruleset.rook_target_file(wing), back);

        for file in file_span(king_square.file, king_dest.file) {
            let s = sq(file, back);
            if board.is_attacking(opponent, s) {
                continue 'files;
            }
            if s != king_square && s != rook_source && board.has_piece_at(s) {
                continue 'files;
            }
        }
        for file in file_span(rook_file, rook_dest.file) {
            let s = sq(file, back);
            if s != rook_source && s != king_square && board.has_piece_at(s) {
                continue 'files;
            }
        }
        moves.push(Move::Castle { king_source: king_square, king_dest, rook_source, rook_dest });
    }
}

fn file_span(a: i8, b: i8) -> std::ops::RangeInclusive<i8> {
    a.min(b)..=a.max(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::Piece;

    fn at(s: &str) -> Square {
        Square::parse(s).unwrap()
    }

    fn put(board: &mut Board, s: &str, color: Color, kind: PieceKind) {
        board.set(at(s), Piece::new(color, kind));
    }

    fn position(board: Board, color: Color, castling: CastlingRights) -> Position {
        Position::new(board, color, castling, None, 0, 1, Ruleset::standard()).unwrap()
    }

    fn play_uci(p: &Position, moves: &[&str]) -> Position {
        let mut p = p.clone();
        for text in moves {
            let m = notation::parse_uci_move(&p, text).unwrap();
            p = p.play(&m).unwrap();
        }
        p
    }

    #[test]
    fn test_start_position_has_20_moves() {
        let p = Position::from_start();
        // 16 pawn moves and 4 knight moves.
        assert_eq!(p.legal_moves().len(), 20);
        assert!(!p.is_in_check());
        assert_eq!(p.status(), Status::Ongoing);
    }

    #[test]
    fn test_legal_moves_never_leave_own_king_attacked() {
        // Not just the start position: also a position with a pin and
        // a check around.
        let positions = [
            Position::from_start(),
            play_uci(&Position::from_start(), &["e2e4", "e7e5", "g1f3", "b8c6", "f1b5"]),
        ];
        for p in &positions {
            let mut scratch = p.board().clone();
            for m in p.legal_moves() {
                let undo = m.apply_to(&mut scratch);
                let king = scratch.king_square(p.color()).unwrap();
                assert!(!scratch.is_attacking(p.color().opposite(), king), "{:?}", m);
                m.unmake(&mut scratch, &undo);
            }
            assert_eq!(&scratch, p.board());
        }
    }

    #[test]
    fn test_pinned_piece_cannot_move() {
        let mut b = Board::new_empty(8, 8);
        put(&mut b, "e1", Color::White, PieceKind::King);
        put(&mut b, "e4", Color::White, PieceKind::Knight);
        put(&mut b, "e8", Color::Black, PieceKind::Rook);
        put(&mut b, "a8", Color::Black, PieceKind::King);
        let p = position(b, Color::White, CastlingRights::none());
        // The knight is pinned on the e file and has no legal move.
        assert!(p.legal_moves().iter().all(|m| m.source() != at("e4")));
    }

    #[test]
    fn test_fools_mate() {
        let p = play_uci(&Position::from_start(), &["f2f3", "e7e6", "g2g4", "d8h4"]);
        assert_eq!(p.color(), Color::White);
        assert!(p.is_in_check());
        assert_eq!(p.legal_moves().len(), 0);
        assert_eq!(p.status(), Status::Checkmate);
    }

    #[test]
    fn test_stalemate() {
        // Corner stalemate: the black king has no square, no check.
        let mut b = Board::new_empty(8, 8);
        put(&mut b, "a8", Color::Black, PieceKind::King);
        put(&mut b, "c7", Color::White, PieceKind::Queen);
        put(&mut b, "b6", Color::White, PieceKind::King);
        let p = position(b, Color::Black, CastlingRights::none());
        assert!(!p.is_in_check());
        assert_eq!(p.legal_moves().len(), 0);
        assert_eq!(p.status(), Status::Stalemate);
    }

    #[test]
    fn test_both_castles_available() {
        let mut b = Board::new_empty(8, 8);
        put(&mut b, "e1", Color::White, PieceKind::King);
        put(&mut b, "a1", Color::White, PieceKind::Rook);
        put(&mut b, "h1", Color::White, PieceKind::Rook);
        put(&mut b, "e8", Color::Black, PieceKind::King);
        let rights = CastlingRights::standard(&Ruleset::standard());
        let p = position(b, Color::White, rights);
        let castles: Vec<&Move> = p.legal_moves().iter().filter(|m| m.is_castle()).collect();
        assert_eq!(castles.len(), 2);
        assert!(castles.iter().any(|m| m.dest() == at("g1")));
        assert!(castles.iter().any(|m| m.dest() == at("c1")));
    }

    #[test]
    fn test_castle_blocked_or_attacked_wing() {
        let rights = CastlingRights::standard(&Ruleset::standard());

        // A rook eyeing f1 kills the king-side castle only.
        let mut b = Board::new_empty(8, 8);
        put(&mut b, "e1", Color::White, PieceKind::King);
        put(&mut b, "a1", Color::White, PieceKind::Rook);
        put(&mut b, "h1", Color::White, PieceKind::Rook);
        put(&mut b, "e8", Color::Black, PieceKind::King);
        put(&mut b, "f8", Color::Black, PieceKind::Rook);
        let p = position(b, Color::White, rights.clone());
        let castles: Vec<&Move> = p.legal_moves().iter().filter(|m| m.is_castle()).collect();
        assert_eq!(castles.len(), 1);
        assert_eq!(castles[0].dest(), at("c1"));

        // A piece on b1 kills the queen-side castle only, even though
        // the king never crosses b1 (the rook does).
        let mut b = Board::new_empty(8, 8);
        put(&mut b, "e1", Color::White, PieceKind::King);
        put(&mut b, "a1", Color::White, PieceKind::Rook);
        put(&mut b, "h1", Color::White, PieceKind::Rook);
        put(&mut b, "b1", Color::White, PieceKind::Knight);
        put(&mut b, "e8", Color::Black, PieceKind::King);
        let p = position(b, Color::White, rights.clone());
        let castles: Vec<&Move> = p.legal_moves().iter().filter(|m| m.is_castle()).collect();
        assert_eq!(castles.len(), 1);
        assert_eq!(castles[0].dest(), at("g1"));

        // A king in check cannot castle at all.
        let mut b = Board::new_empty(8, 8);
        put(&mut b, "e1", Color::White, PieceKind::King);
        put(&mut b, "a1", Color::White, PieceKind::Rook);
        put(&mut b, "h1", Color::White, PieceKind::Rook);
        put(&mut b, "e8", Color::Black, PieceKind::Rook);
        put(&mut b, "a8", Color::Black, PieceKind::King);
        let p = position(b, Color::White, rights);
        assert!(p.is_in_check());
        assert!(p.legal_moves().iter().all(|m| !m.is_castle()));
    }

    #[test]
    fn test_castling_rights_follow_moves() {
        let p = Position::from_start();
        // Push the h pawn, swing the rook out: White loses the h1
        // right but keeps a1.
        let p = play_uci(&p, &["h2h4", "e7e5", "h1h3", "e5e4"]);
        assert_eq!(p.castling().files(Color::White), &[0]);
        assert_eq!(p.castling().files(Color::Black), &[7, 0]);
    }

    #[test]
    fn test_rook_capture_clears_victim_right() {
        let mut b = Board::new_empty(8, 8);
        put(&mut b, "e1", Color::White, PieceKind::King);
        put(&mut b, "e8", Color::Black, PieceKind::King);
        put(&mut b, "h8", Color::Black, PieceKind::Rook);
        put(&mut b, "h1", Color::White, PieceKind::Rook);
        let mut rights = CastlingRights::none();
        rights.add_file(Color::Black, 7);
        let p = position(b, Color::White, rights);
        let m = notation::parse_uci_move(&p, "h1h8").unwrap();
        let p = p.play(&m).unwrap();
        assert!(p.castling().is_empty());
    }

    #[test]
    fn test_en_passant_capture() {
        let p = play_uci(&Position::from_start(), &["e2e4", "a7a6", "e4e5", "d7d5"]);
        assert_eq!(p.en_passant(), Some(at("d6")));
        let m = notation::parse_uci_move(&p, "e5d6").unwrap();
        assert!(m.is_en_passant());
        let p2 = p.play(&m).unwrap();
        // The advanced pawn is gone from d5, not from d6.
        assert!(!p2.board().has_piece_at(at("d5")));
        assert_eq!(
            p2.board().get(at("d6")),
            Some(Piece::new(Color::White, PieceKind::Pawn))
        );
        // The opportunity lapses after any other move.
        let p3 = play_uci(&p, &["b1c3", "a6a5"]);
        assert_eq!(p3.en_passant(), None);
        assert!(notation::parse_uci_move(&p3, "e5d6").is_err());
    }

    #[test]
    fn test_promotion_expansion() {
        let mut b = Board::new_empty(8, 8);
        put(&mut b, "a7", Color::White, PieceKind::Pawn);
        put(&mut b, "e1", Color::White, PieceKind::King);
        put(&mut b, "e8", Color::Black, PieceKind::King);
        let p = position(b, Color::Black, CastlingRights::none());
        let p = play_uci(&p, &["e8f8"]);
        // One pawn move per promotable kind, nothing ambiguous.
        let promos: Vec<&Move> =
            p.legal_moves().iter().filter(|m| m.source() == at("a7")).collect();
        assert_eq!(promos.len(), 4);
        assert!(promos.iter().all(|m| m.promotion().is_some()));
    }

    #[test]
    fn test_halfmove_and_fullmove_clocks() {
        let p = play_uci(&Position::from_start(), &["g1f3", "g8f6"]);
        assert_eq!(p.halfmove(), 2);
        assert_eq!(p.fullmove(), 2);
        let p = play_uci(&p, &["d2d4"]);
        // Pawn pushes reset the half-move clock.
        assert_eq!(p.halfmove(), 0);
    }

    #[test]
    fn test_fifty_move_rule_status() {
        let mut b = Board::new_empty(8, 8);
        put(&mut b, "e1", Color::White, PieceKind::King);
        put(&mut b, "e8", Color::Black, PieceKind::King);
        put(&mut b, "a1", Color::White, PieceKind::Queen);
        let p =
            Position::new(b, Color::White, CastlingRights::none(), None, 100, 80, Ruleset::standard())
                .unwrap();
        assert_eq!(p.status(), Status::FiftyMoveRule);
    }

    #[test]
    fn test_insufficient_material() {
        // Bare kings.
        let mut b = Board::new_empty(8, 8);
        put(&mut b, "e1", Color::White, PieceKind::King);
        put(&mut b, "e8", Color::Black, PieceKind::King);
        let p = position(b.clone(), Color::White, CastlingRights::none());
        assert_eq!(p.status(), Status::InsufficientMaterial);

        // King and knight versus king.
        put(&mut b, "b1", Color::White, PieceKind::Knight);
        let p = position(b.clone(), Color::White, CastlingRights::none());
        assert_eq!(p.status(), Status::InsufficientMaterial);

        // Same-colored bishops draw, opposite-colored do not.
        let mut b = Board::new_empty(8, 8);
        put(&mut b, "e1", Color::White, PieceKind::King);
        put(&mut b, "e8", Color::Black, PieceKind::King);
        put(&mut b, "c1", Color::White, PieceKind::Bishop); // dark
        put(&mut b, "f8", Color::Black, PieceKind::Bishop); // dark
        let p = position(b.clone(), Color::White, CastlingRights::none());
        assert_eq!(p.status(), Status::InsufficientMaterial);
        let mut b2 = b.clone();
        b2.remove(at("f8"));
        put(&mut b2, "c8", Color::Black, PieceKind::Bishop); // light
        let p = position(b2, Color::White, CastlingRights::none());
        assert_eq!(p.status(), Status::Ongoing);

        // A rook is always sufficient.
        put(&mut b, "a1", Color::White, PieceKind::Rook);
        let p = position(b, Color::White, CastlingRights::none());
        assert_eq!(p.status(), Status::Ongoing);
    }

    #[test]
    fn test_two_kings_rejected() {
        let mut b = Board::new_empty(8, 8);
        put(&mut b, "e1", Color::White, PieceKind::King);
        put(&mut b, "d1", Color::White, PieceKind::King);
        put(&mut b, "e8", Color::Black, PieceKind::King);
        let err = Position::new(
            b,
            Color::White,
            CastlingRights::none(),
            None,
            0,
            1,
            Ruleset::standard(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::UnreachablePosition { .. }));
    }

    #[test]
    fn test_illegal_move_rejected() {
        let p = Position::from_start();
        let m = Move::Plain { source: at("e2"), dest: at("e5") };
        assert_eq!(
            p.play(&m),
            Err(Error::IllegalMove { notation: "e2e5".to_string() })
        );
    }

    #[test]
    fn test_shuffled_castling() {
        // King b1, rooks a1/e1: queen-side castle crosses c1, king
        // lands on c1 and the rook on d1.
        let ruleset = Ruleset::shuffled(1, 0, 4);
        let mut b = Board::new_empty(8, 8);
        put(&mut b, "b1", Color::White, PieceKind::King);
        put(&mut b, "a1", Color::White, PieceKind::Rook);
        put(&mut b, "e1", Color::White, PieceKind::Rook);
        put(&mut b, "b8", Color::Black, PieceKind::King);
        let mut rights = CastlingRights::none();
        rights.add_file(Color::White, 0);
        rights.add_file(Color::White, 4);
        let p = Position::new(b, Color::White, rights, None, 0, 1, ruleset).unwrap();
        let castles: Vec<&Move> = p.legal_moves().iter().filter(|m| m.is_castle()).collect();
        assert_eq!(castles.len(), 2);
        assert!(castles.iter().any(|m| m.dest() == at("c1")));
        assert!(castles.iter().any(|m| m.dest() == at("g1")));
    }
}
