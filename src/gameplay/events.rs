//! Append-only game event log
//!
//! Events are the single source of truth: the session's current state is a
//! fold over this log, and every consumer (live UI, event display,
//! spectator replay) reads the same tagged payloads. Events are never
//! reordered or removed; ordering is the log index.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::core::types::{Side, UnitId};
use crate::gameplay::attack::PhysicalAttackKind;
use crate::gameplay::hex::{Facing, HexCoordinate};
use crate::gameplay::movement::MovementType;
use crate::gameplay::phase::TurnPhase;
use crate::gameplay::units::MechLocation;
use crate::gameplay::weapons::WeaponKind;

/// Why a destroyed unit died
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DestructionReason {
    CenterTorsoDestroyed,
    HeadDestroyed,
    PilotKilled,
}

/// Why the game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEndReason {
    Elimination,
    TurnLimit,
}

/// Tagged event payloads - the wire contract between the engine and every
/// consumer. Each variant carries exactly the fields of that event kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEventKind {
    InitiativeRolled {
        player_roll: u8,
        opponent_roll: u8,
        first_mover: Side,
    },
    PhaseChanged {
        turn: u32,
        phase: TurnPhase,
    },
    MovementDeclared {
        unit_id: UnitId,
        from: HexCoordinate,
        to: HexCoordinate,
        facing: Facing,
        movement_type: MovementType,
        mp_spent: u32,
        hexes_moved: u32,
    },
    AttackDeclared {
        attacker: UnitId,
        target: UnitId,
        weapon: WeaponKind,
    },
    AttackResolved {
        attacker: UnitId,
        target: UnitId,
        weapon: WeaponKind,
        target_number: i32,
        roll: u8,
        hit: bool,
    },
    PhysicalAttackDeclared {
        attacker: UnitId,
        target: UnitId,
        kind: PhysicalAttackKind,
    },
    PhysicalAttackResolved {
        attacker: UnitId,
        target: UnitId,
        kind: PhysicalAttackKind,
        target_number: i32,
        roll: u8,
        hit: bool,
    },
    DamageApplied {
        unit_id: UnitId,
        location: MechLocation,
        rear: bool,
        armor_damage: u32,
        structure_damage: u32,
        location_destroyed: bool,
    },
    CriticalHit {
        unit_id: UnitId,
        location: MechLocation,
        roll: u8,
    },
    HeatGenerated {
        unit_id: UnitId,
        amount: i32,
        /// Absolute heat after generation, so replay folds are exact
        heat: i32,
    },
    HeatDissipated {
        unit_id: UnitId,
        amount: i32,
        heat: i32,
    },
    UnitShutdown {
        unit_id: UnitId,
        heat: i32,
    },
    UnitRestarted {
        unit_id: UnitId,
        heat: i32,
    },
    PilotHit {
        unit_id: UnitId,
        wounds: u8,
        conscious: bool,
    },
    UnitDestroyed {
        unit_id: UnitId,
        reason: DestructionReason,
    },
    GameEnded {
        winner: Option<Side>,
        reason: GameEndReason,
    },
}

/// A logged event with its position in the battle timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Log index; dense, 0-based, append order
    pub id: u64,
    pub turn: u32,
    pub phase: TurnPhase,
    /// Wall-clock milliseconds; informational only, never folded
    pub timestamp_ms: u64,
    pub kind: GameEventKind,
}

/// Append-only event log
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<GameEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event, stamping id, turn, phase, and wall clock
    pub fn push(&mut self, turn: u32, phase: TurnPhase, kind: GameEventKind) -> &GameEvent {
        let timestamp_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        self.events.push(GameEvent {
            id: self.events.len() as u64,
            turn,
            phase,
            timestamp_ms,
            kind,
        });
        self.events.last().expect("just pushed")
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }

    pub fn as_slice(&self) -> &[GameEvent] {
        &self.events
    }

    /// The most recent event, if any
    pub fn last(&self) -> Option<&GameEvent> {
        self.events.last()
    }
}
