//! Tactical combat engine - phases, movement, line of sight, heat, attacks
//!
//! The engine owns all game-state mutation through an append-only event
//! log. Every UI is a read-only projection plus an intent producer; the
//! spectator driver proves the command surface needs no UI at all.

pub mod ai;
pub mod attack;
pub mod constants;
pub mod dice;
pub mod events;
pub mod grid;
pub mod heat;
pub mod hex;
pub mod los;
pub mod movement;
pub mod phase;
pub mod session;
pub mod spectator;
pub mod terrain;
pub mod units;
pub mod weapons;

// Re-exports for convenient access
pub use ai::{AiCommand, AiStrategy, GreedyAi};
pub use attack::{
    attacker_movement_modifier, is_rear_attack, resolve_roll, target_movement_modifier,
    HitLocationTable, PhysicalAttackKind, StandardHitTable, ToHitFactors,
};
pub use constants::*;
pub use events::{DestructionReason, EventLog, GameEndReason, GameEvent, GameEventKind};
pub use grid::{GridConfig, Hex, HexGrid};
pub use heat::{dissipate, effects_for, HeatEffects};
pub use hex::{Facing, HexCoordinate};
pub use los::{line_of_sight, LosResult};
pub use movement::{movement_range, MovementRangeHex, MovementType};
pub use phase::{roll_initiative, InitiativeRoll, TurnPhase};
pub use session::{CommandOutcome, GameResult, GameSession, GameState, RejectReason};
pub use spectator::SpectatorDriver;
pub use terrain::{primary_feature, CoverLevel, TerrainFeature, TerrainType};
pub use units::{MechLocation, UnitDefinition, UnitGameState, WeaponMount};
pub use weapons::{RangeBracket, WeaponKind, WeaponStats};
