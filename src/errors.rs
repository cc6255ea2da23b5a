//! Crate error taxonomy.

use std::fmt;

/// Domain errors for the rules, notation and game-record layers.
///
/// Every variant is terminal for the operation that raised it: the
/// crate never substitutes a default move or position on error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Malformed position text; `field` names the offending FEN field.
    #[error("invalid position format: bad {field} field: {value:?}")]
    InvalidPositionFormat { field: &'static str, value: String },

    /// An attempted move is not in the current legal-move list.
    #[error("illegal move: {notation}")]
    IllegalMove { notation: String },

    /// A notation string matched zero or more than one legal move.
    #[error("ambiguous or illegal notation: {notation:?} ({matches} matches)")]
    AmbiguousOrIllegalNotation { notation: String, matches: usize },

    /// Game-record tokenization or parenthesis matching failed.
    #[error("malformed game record at {token:?}: {context}")]
    MalformedGameRecord { token: String, context: String },

    /// Syntactically valid position text that cannot occur in legal play.
    #[error("unreachable position: {reason}")]
    UnreachablePosition { reason: String },
}

/// Recoverable inconsistencies surfaced during game-record parsing.
///
/// Warnings never abort a parse; the caller decides what to do with them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// Body result token disagrees with the header-declared result.
    /// The header is authoritative and has been kept.
    ResultMismatch { header: String, body: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Warning::ResultMismatch { header, body } => write!(
                f,
                "game result token {} disagrees with header result {}, keeping the header",
                body, header
            ),
        }
    }
}
