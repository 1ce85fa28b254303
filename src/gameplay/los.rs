//! Line of sight between hexes
//!
//! The traced line is canonicalized (always computed from the smaller
//! endpoint) so los(a, b) and los(b, a) inspect the identical hex sequence
//! and rounding ties break the same way in both directions. Only terrain
//! blocks; unit occupancy never does.

use serde::{Deserialize, Serialize};

use crate::gameplay::constants::{OBSERVER_HEIGHT, PARTIAL_COVER_MODIFIER};
use crate::gameplay::grid::HexGrid;
use crate::gameplay::hex::HexCoordinate;
use crate::gameplay::terrain::CoverLevel;

/// Result of a line-of-sight check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LosResult {
    pub has_los: bool,
    /// Accumulated to-hit penalty from partial cover along the line
    pub cover_penalty: i32,
    /// First hex that blocked the line, if any
    pub blocking_hex: Option<HexCoordinate>,
}

impl LosResult {
    fn clear() -> Self {
        Self {
            has_los: true,
            cover_penalty: 0,
            blocking_hex: None,
        }
    }

    fn blocked(at: HexCoordinate, penalty: i32) -> Self {
        Self {
            has_los: false,
            cover_penalty: penalty,
            blocking_hex: Some(at),
        }
    }
}

/// Check line of sight between two hexes.
///
/// Full cover strictly between the endpoints blocks outright. Partial
/// cover adds a to-hit penalty per hex. An intervening hex also blocks
/// when its ground elevation plus terrain height strictly exceeds the
/// sight line interpolated between the endpoint elevations (each raised by
/// observer height).
pub fn line_of_sight(grid: &HexGrid, from: HexCoordinate, to: HexCoordinate) -> LosResult {
    if from == to {
        return LosResult::clear();
    }

    // Canonical endpoint order keeps the check symmetric
    let (a, b) = if from <= to { (from, to) } else { (to, from) };

    let line = a.line_to(&b);
    let n = (line.len() - 1) as i32;
    let eye_a = grid.elevation(a) + OBSERVER_HEIGHT;
    let eye_b = grid.elevation(b) + OBSERVER_HEIGHT;

    let mut penalty = 0;
    for (i, coord) in line.iter().enumerate().skip(1).take(line.len() - 2) {
        let Some(hex) = grid.get(*coord) else {
            continue;
        };

        match hex.cover_level() {
            CoverLevel::Full => return LosResult::blocked(*coord, penalty),
            CoverLevel::Partial => penalty += PARTIAL_COVER_MODIFIER,
            CoverLevel::None => {}
        }

        // Integer comparison of obstacle height against the interpolated
        // sight line: height > eye_a + (eye_b - eye_a) * i / n
        let i = i as i32;
        let height = hex.elevation as i32 + hex.terrain_height();
        if height * n > eye_a * (n - i) + eye_b * i {
            return LosResult::blocked(*coord, penalty);
        }
    }

    LosResult {
        has_los: true,
        cover_penalty: penalty,
        blocking_hex: None,
    }
}
