//! Board coordinates.

use std::fmt;

use crate::errors::Error;

/// Coords (file, rank) of a square on a board, zero-based.
///
/// On a standard board both components are in [0, 7]; variant boards
/// may be wider or taller, so bounds are checked against a [`Board`]
/// (`crate::board::Board`), not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    pub file: i8,
    pub rank: i8,
}

/// Shorthand constructor.
#[inline]
pub const fn sq(file: i8, rank: i8) -> Square {
    Square { file, rank }
}

impl Square {
    /// True for light squares, false for dark ones; a1 is dark.
    #[inline]
    pub fn is_light(self) -> bool {
        (self.file + self.rank) % 2 == 1
    }

    /// Parse algebraic coordinates ("e4").
    ///
    /// Only the shape is checked here: a lowercase file letter followed
    /// by a rank number. Whether the square fits on a given board is up
    /// to the caller.
    pub fn parse(s: &str) -> Result<Square, Error> {
        let bad = || Error::InvalidPositionFormat {
            field: "square",
            value: s.to_string(),
        };
        let bytes = s.as_bytes();
        if bytes.len() < 2 || !bytes[0].is_ascii_lowercase() {
            return Err(bad());
        }
        let file = (bytes[0] - b'a') as i8;
        let rank: i8 = s[1..].parse().map_err(|_| bad())?;
        if rank < 1 {
            return Err(bad());
        }
        Ok(sq(file, rank - 1))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file as u8) as char, self.rank + 1)
    }
}
