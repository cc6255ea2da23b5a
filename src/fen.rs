//! Position text parsing and serialization.
//!
//! Six space-separated fields: piece placement (rank-major, top rank
//! first, digits for empty runs), side to move, castling availability,
//! en-passant target, half-move clock, full-move number. For any
//! reachable position `serialize(parse(s)) == s` holds byte for byte.

use nom::bytes::complete::take_while1;
use nom::character::complete::multispace0;
use nom::sequence::{preceded, tuple};
use nom::IResult;

use crate::board::Board;
use crate::castling::CastlingRights;
use crate::errors::Error;
use crate::piece::{Color, Piece};
use crate::rules::Position;
use crate::ruleset::Ruleset;
use crate::square::{sq, Square};

pub const FEN_START: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Position text split into raw fields, not yet interpreted.
#[derive(Debug, Clone)]
pub struct Fen {
    pub placement: String,
    pub color: String,
    pub castling: String,
    pub en_passant: String,
    pub halfmove: String,
    pub fullmove: String,
}

fn take_field(i: &str) -> IResult<&str, &str> {
    preceded(multispace0, take_while1(|c: char| !c.is_whitespace()))(i)
}

/// Split position text into its six fields.
pub fn split_fen(i: &str) -> Option<Fen> {
    let (_, (placement, color, castling, en_passant, halfmove, fullmove)) =
        tuple((take_field, take_field, take_field, take_field, take_field, take_field))(i)
            .ok()?;
    Some(Fen {
        placement: placement.to_string(),
        color: color.to_string(),
        castling: castling.to_string(),
        en_passant: en_passant.to_string(),
        halfmove: halfmove.to_string(),
        fullmove: fullmove.to_string(),
    })
}

/// Parse position text into a validated position.
///
/// Every field failure is an `InvalidPositionFormat` naming the field;
/// a board violating the king-count invariant is an
/// `UnreachablePosition`.
pub fn parse(i: &str, ruleset: &Ruleset) -> Result<Position, Error> {
    let fen = split_fen(i).ok_or_else(|| Error::InvalidPositionFormat {
        field: "field count",
        value: i.to_string(),
    })?;
    let board = parse_placement(&fen.placement, ruleset)?;
    let color = match fen.color.as_str() {
        "w" => Color::White,
        "b" => Color::Black,
        _ => {
            return Err(Error::InvalidPositionFormat {
                field: "side to move",
                value: fen.color.clone(),
            })
        }
    };
    let castling = parse_castling(&fen.castling, ruleset)?;
    let en_passant = parse_en_passant(&fen.en_passant, &board)?;
    let halfmove = fen.halfmove.parse().map_err(|_| Error::InvalidPositionFormat {
        field: "halfmove clock",
        value: fen.halfmove.clone(),
    })?;
    let fullmove = fen.fullmove.parse().map_err(|_| Error::InvalidPositionFormat {
        field: "fullmove number",
        value: fen.fullmove.clone(),
    })?;
    Position::new(board, color, castling, en_passant, halfmove, fullmove, ruleset.clone())
}

fn parse_placement(placement: &str, ruleset: &Ruleset) -> Result<Board, Error> {
    let bad = || Error::InvalidPositionFormat {
        field: "placement",
        value: placement.to_string(),
    };
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != ruleset.height as usize {
        return Err(bad());
    }
    let mut board = Board::new_empty(ruleset.width, ruleset.height);
    for (i, rank_text) in ranks.iter().enumerate() {
        let rank = ruleset.height - 1 - i as i8;
        let mut file: i8 = 0;
        let mut digits = String::new();
        for c in rank_text.chars() {
            if c.is_ascii_digit() {
                digits.push(c);
                continue;
            }
            if !digits.is_empty() {
                file += digits.parse::<i8>().map_err(|_| bad())?;
                digits.clear();
            }
            let piece = Piece::from_char(c).ok_or_else(bad)?;
            if file >= ruleset.width {
                return Err(bad());
            }
            board.set(sq(file, rank), piece);
            file += 1;
        }
        if !digits.is_empty() {
            file += digits.parse::<i8>().map_err(|_| bad())?;
        }
        if file != ruleset.width {
            return Err(bad());
        }
    }
    Ok(board)
}

fn parse_castling(text: &str, ruleset: &Ruleset) -> Result<CastlingRights, Error> {
    let mut rights = CastlingRights::none();
    if text == "-" {
        return Ok(rights);
    }
    let bad = || Error::InvalidPositionFormat {
        field: "castling",
        value: text.to_string(),
    };
    for c in text.chars() {
        // KQkq name the ruleset's rook files; shuffled positions may
        // name rook files directly (uppercase for White).
        let (color, file) = match c {
            'K' => (Color::White, ruleset.kingside_rook_file),
            'Q' => (Color::White, ruleset.queenside_rook_file),
            'k' => (Color::Black, ruleset.kingside_rook_file),
            'q' => (Color::Black, ruleset.queenside_rook_file),
            'A'..='H' => (Color::White, c as i8 - 'A' as i8),
            'a'..='h' => (Color::Black, c as i8 - 'a' as i8),
            _ => return Err(bad()),
        };
        if file >= ruleset.width {
            return Err(bad());
        }
        rights.add_file(color, file);
    }
    Ok(rights)
}

fn parse_en_passant(text: &str, board: &Board) -> Result<Option<Square>, Error> {
    if text == "-" {
        return Ok(None);
    }
    let bad = || Error::InvalidPositionFormat {
        field: "en passant",
        value: text.to_string(),
    };
    let square = Square::parse(text).map_err(|_| bad())?;
    if !board.contains(square) {
        return Err(bad());
    }
    Ok(Some(square))
}

/// Serialize a position to its six-field text form.
pub fn position_to_fen(position: &Position) -> String {
    let board = position.board();
    let mut placement = String::new();
    for rank in (0..board.height()).rev() {
        if rank != board.height() - 1 {
            placement.push('/');
        }
        let mut empties = 0;
        for file in 0..board.width() {
            match board.get(sq(file, rank)) {
                None => empties += 1,
                Some(piece) => {
                    if empties > 0 {
                        placement.push_str(&empties.to_string());
                        empties = 0;
                    }
                    placement.push(piece.to_char());
                }
            }
        }
        if empties > 0 {
            placement.push_str(&empties.to_string());
        }
    }
    let color = match position.color() {
        Color::White => "w",
        Color::Black => "b",
    };
    format!(
        "{} {} {} {} {} {}",
        placement,
        color,
        castling_to_string(position.castling(), position.ruleset()),
        en_passant_to_string(position.en_passant()),
        position.halfmove(),
        position.fullmove(),
    )
}

/// Castling field: KQkq letters under standard geometry, rook file
/// letters otherwise, `-` when nothing is left.
pub fn castling_to_string(rights: &CastlingRights, ruleset: &Ruleset) -> String {
    if rights.is_empty() {
        return "-".to_string();
    }
    let mut out = String::new();
    for color in [Color::White, Color::Black] {
        for &file in rights.files(color) {
            let c = if ruleset.is_standard_geometry() {
                if file == ruleset.kingside_rook_file { 'K' } else { 'Q' }
            } else {
                (b'A' + file as u8) as char
            };
            out.push(match color {
                Color::White => c,
                Color::Black => c.to_ascii_lowercase(),
            });
        }
    }
    out
}

pub fn en_passant_to_string(en_passant: Option<Square>) -> String {
    en_passant.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string())
}
