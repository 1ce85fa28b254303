//! Session configuration with documented defaults
//!
//! Everything a battle needs fixed up front lives here; per-hex terrain and
//! the unit roster are authored separately at session creation.

use serde::{Deserialize, Serialize};

use crate::core::types::HeatScale;

/// Configuration for a game session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Map radius in hexes around the origin.
    ///
    /// Every coordinate within this radius exists on the grid (Clear,
    /// elevation 0) even if no terrain was authored for it. A radius of 8
    /// gives 217 hexes, enough for a lance-on-lance engagement.
    pub map_radius: u32,

    /// Heat scale variant for every unit in the battle.
    ///
    /// Fixes the shutdown maximum (Single=30, Double=50, Triple=70); the
    /// threshold effect tiers are percentages of this maximum.
    pub heat_scale: HeatScale,

    /// RNG seed for determinism. Same seed + same commands = same battle.
    pub seed: u64,

    /// Turn limit. A battle still undecided at the end of this turn is a
    /// draw.
    pub max_turns: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            map_radius: 8,
            heat_scale: HeatScale::Single,
            seed: 42,
            max_turns: 30,
        }
    }
}
