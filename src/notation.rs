//! Move notation, both algebraic (SAN) and pure coordinate (UCI).

use crate::errors::Error;
use crate::movement::Move;
use crate::piece::{Piece, PieceKind};
use crate::rules::Position;
use crate::square::{sq, Square};

/// Pure coordinate form: source, destination, optional promotion
/// letter ("e2e4", "a7a8q"). Castles use the king's squares.
pub fn move_to_uci(m: &Move) -> String {
    let mut text = format!("{}{}", m.source(), m.dest());
    if let Some(kind) = m.promotion() {
        text.push(kind.initial().to_ascii_lowercase());
    }
    text
}

/// Resolve coordinate notation against the position's legal moves.
pub fn parse_uci_move(position: &Position, text: &str) -> Result<Move, Error> {
    let illegal = || Error::IllegalMove { notation: text.to_string() };
    // Slicing by byte offsets; multibyte input is simply illegal.
    if text.len() < 4 || !text.is_ascii() {
        return Err(illegal());
    }
    let source = Square::parse(&text[0..2]).map_err(|_| illegal())?;
    let dest = Square::parse(&text[2..4]).map_err(|_| illegal())?;
    let promotion = match &text[4..] {
        "" => None,
        p => Some(
            PieceKind::from_initial(p.chars().next().unwrap_or(' ').to_ascii_uppercase())
                .filter(|_| p.len() == 1)
                .ok_or_else(illegal)?,
        ),
    };
    position
        .legal_moves()
        .iter()
        .find(|m| m.source() == source && m.dest() == dest && m.promotion() == promotion)
        .copied()
        .ok_or_else(illegal)
}

/// Generate algebraic notation for a legal move, with a `+`/`#` suffix
/// derived from the successor position.
pub fn move_to_san(position: &Position, m: &Move) -> Result<String, Error> {
    let successor = position.play(m)?;
    let mut text = san_body(position, m);
    if successor.is_in_check() {
        text.push(if successor.legal_moves().is_empty() { '#' } else { '+' });
    }
    Ok(text)
}

/// Notation without the check suffix. `m` must be legal in `position`.
pub(crate) fn san_body(position: &Position, m: &Move) -> String {
    let board = position.board();
    match *m {
        Move::Castle { king_source, rook_source, .. } => {
            // The wing follows the rook: in shuffled setups both castles
            // can move the king toward the same side.
            if rook_source.file > king_source.file {
                "O-O".to_string()
            } else {
                "O-O-O".to_string()
            }
        }
        Move::Pawn { source, dest, promotion, .. } => {
            let mut text = String::new();
            if m.is_capture(board) {
                text.push((b'a' + source.file as u8) as char);
                text.push('x');
            }
            text.push_str(&dest.to_string());
            if let Some(kind) = promotion {
                text.push('=');
                text.push(kind.initial());
            }
            text
        }
        Move::Plain { source, dest } => {
            let piece = piece_at(board, source);
            let mut text = String::new();
            text.push(piece.kind.initial());
            text.push_str(&disambiguation(position, piece, source, dest));
            if m.is_capture(board) {
                text.push('x');
            }
            text.push_str(&dest.to_string());
            text
        }
    }
}

/// Minimum text telling this move apart from other legal moves of the
/// same kind to the same destination: nothing, source file, source
/// rank, or the full source square.
fn disambiguation(position: &Position, piece: Piece, source: Square, dest: Square) -> String {
    let board = position.board();
    let rivals: Vec<Square> = position
        .legal_moves()
        .iter()
        .filter(|o| {
            matches!(o, Move::Plain { .. })
                && o.dest() == dest
                && o.source() != source
                && piece_at(board, o.source()).kind == piece.kind
        })
        .map(|o| o.source())
        .collect();
    if rivals.is_empty() {
        return String::new();
    }
    let file = (b'a' + source.file as u8) as char;
    if rivals.iter().all(|r| r.file != source.file) {
        file.to_string()
    } else if rivals.iter().all(|r| r.rank != source.rank) {
        (source.rank + 1).to_string()
    } else {
        sq(source.file, source.rank).to_string()
    }
}

fn piece_at(board: &crate::board::Board, square: Square) -> Piece {
    match board.get(square) {
        Some(piece) => piece,
        None => panic!("no piece on {}", square),
    }
}

/// Resolve algebraic notation against the position's legal moves.
///
/// The check suffix (and `!`/`?` annotations) are ignored; anything
/// other than exactly one match is an error.
pub fn parse_san(position: &Position, text: &str) -> Result<Move, Error> {
    let wanted = text.trim_end_matches(|c| matches!(c, '+' | '#' | '!' | '?'));
    let mut matches = position
        .legal_moves()
        .iter()
        .filter(|m| san_body(position, m) == wanted);
    match (matches.next(), matches.next()) {
        (Some(m), None) => Ok(*m),
        (first, _) => {
            let count = if first.is_some() { 2 } else { 0 };
            Err(Error::AmbiguousOrIllegalNotation {
                notation: text.to_string(),
                matches: count,
            })
        }
    }
}
