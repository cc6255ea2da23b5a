//! Chess rules, notation and game-record handling.
//!
//! The crate is organized bottom-up: squares and pieces, then the
//! board, then positions with full legality, then text layers on top
//! (FEN, algebraic notation, game records with variations).

pub mod board;
pub mod castling;
pub mod errors;
pub mod fen;
pub mod game;
pub mod movement;
pub mod notation;
pub mod piece;
pub mod rules;
pub mod ruleset;
pub mod square;

pub use board::Board;
pub use castling::{CastlingRights, Wing};
pub use errors::{Error, Warning};
pub use game::{Game, GameResult};
pub use movement::Move;
pub use piece::{Color, Piece, PieceKind};
pub use rules::{Position, Status};
pub use ruleset::Ruleset;
pub use square::{sq, Square};
