//! Castling availability.

use crate::piece::Color;
use crate::ruleset::Ruleset;

/// Board wing a castle happens on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Wing {
    King,
    Queen,
}

/// Per-color set of rook origin files still eligible to castle with.
///
/// Tracking files rather than king/queen-side flags supports shuffled
/// setups where the rooks do not start in the corners. Files are kept
/// sorted descending, so for a standard setup the king side comes
/// first. Rights are only ever removed, never re-added:
/// - a king move clears both files for that color,
/// - a rook move from its origin square clears that file,
/// - a capture on a rook origin square clears it for the victim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CastlingRights {
    files: [Vec<i8>; 2],
}

impl CastlingRights {
    /// No castling available for either side.
    pub fn none() -> CastlingRights {
        CastlingRights { files: [vec![], vec![]] }
    }

    /// Both rooks eligible for both colors, per the ruleset geometry.
    pub fn standard(ruleset: &Ruleset) -> CastlingRights {
        let mut rights = CastlingRights::none();
        for color in [Color::White, Color::Black] {
            rights.add_file(color, ruleset.kingside_rook_file);
            rights.add_file(color, ruleset.queenside_rook_file);
        }
        rights
    }

    /// Eligible rook origin files, king side first.
    pub fn files(&self, color: Color) -> &[i8] {
        &self.files[color.index()]
    }

    pub fn has_file(&self, color: Color, file: i8) -> bool {
        self.files[color.index()].contains(&file)
    }

    /// Register an eligible rook file. Used by position setup only.
    pub fn add_file(&mut self, color: Color, file: i8) {
        let files = &mut self.files[color.index()];
        if !files.contains(&file) {
            files.push(file);
            files.sort_unstable_by(|a, b| b.cmp(a));
        }
    }

    /// Remove one file, e.g. after a rook move or its capture.
    pub fn clear_file(&mut self, color: Color, file: i8) {
        self.files[color.index()].retain(|&f| f != file);
    }

    /// Remove all rights of `color`, e.g. after a king move.
    pub fn clear_color(&mut self, color: Color) {
        self.files[color.index()].clear();
    }

    pub fn is_empty(&self) -> bool {
        self.files[0].is_empty() && self.files[1].is_empty()
    }
}
