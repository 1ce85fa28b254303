//! Turn phase cycle and initiative
//!
//! Initiative -> Movement -> WeaponAttack -> PhysicalAttack -> Heat -> End,
//! then the turn wraps. Game-over is an orthogonal condition checked by
//! the session, not a phase.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::types::Side;
use crate::gameplay::dice::roll_2d6;

/// The six fixed phases of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TurnPhase {
    #[default]
    Initiative,
    Movement,
    WeaponAttack,
    PhysicalAttack,
    Heat,
    End,
}

impl TurnPhase {
    /// The next phase, and whether the turn wrapped
    pub fn next(&self) -> (TurnPhase, bool) {
        match self {
            TurnPhase::Initiative => (TurnPhase::Movement, false),
            TurnPhase::Movement => (TurnPhase::WeaponAttack, false),
            TurnPhase::WeaponAttack => (TurnPhase::PhysicalAttack, false),
            TurnPhase::PhysicalAttack => (TurnPhase::Heat, false),
            TurnPhase::Heat => (TurnPhase::End, false),
            TurnPhase::End => (TurnPhase::Initiative, true),
        }
    }

    /// All phases in cycle order
    pub fn all() -> [TurnPhase; 6] {
        [
            TurnPhase::Initiative,
            TurnPhase::Movement,
            TurnPhase::WeaponAttack,
            TurnPhase::PhysicalAttack,
            TurnPhase::Heat,
            TurnPhase::End,
        ]
    }
}

/// Outcome of an initiative roll-off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiativeRoll {
    pub player_roll: u8,
    pub opponent_roll: u8,
    pub first_mover: Side,
}

/// Roll initiative for both sides; ties re-roll, the higher roller acts
/// first. Deterministic given a seeded RNG.
pub fn roll_initiative(rng: &mut impl Rng) -> InitiativeRoll {
    loop {
        let player_roll = roll_2d6(rng);
        let opponent_roll = roll_2d6(rng);
        if player_roll == opponent_roll {
            continue;
        }
        let first_mover = if player_roll > opponent_roll {
            Side::Player
        } else {
            Side::Opponent
        };
        return InitiativeRoll {
            player_roll,
            opponent_roll,
            first_mover,
        };
    }
}
