//! The game session aggregate
//!
//! Commands are the only mutation path. Each command validates, then
//! mutates state by folding the very events it appends, so the current
//! state is reproducible by replaying the log from the initial snapshot -
//! replay determinism is structural, not incidental. Rejected commands
//! change nothing and append nothing.

use std::collections::HashMap;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::config::GameConfig;
use crate::core::error::{GameError, Result};
use crate::core::types::{Side, UnitId};
use crate::gameplay::ai::{AiCommand, AiStrategy};
use crate::gameplay::attack::{
    attacker_movement_modifier, is_rear_attack, resolve_roll, target_movement_modifier,
    HitLocationTable, PhysicalAttackKind, StandardHitTable, ToHitFactors,
};
use crate::gameplay::constants::{
    CONSCIOUSNESS_TARGETS, CRITICAL_CHECK_TARGET, MAX_PILOT_WOUNDS, PARTIAL_COVER_MODIFIER,
    RUN_HEAT, TARGET_FULL_COVER_MODIFIER, WALK_HEAT,
};
use crate::gameplay::dice::roll_2d6;
use crate::gameplay::events::{
    DestructionReason, EventLog, GameEndReason, GameEvent, GameEventKind,
};
use crate::gameplay::grid::HexGrid;
use crate::gameplay::heat::{dissipate, effects_for};
use crate::gameplay::hex::{Facing, HexCoordinate};
use crate::gameplay::los::line_of_sight;
use crate::gameplay::movement::{movement_range, path_to, reachability, MovementType};
use crate::gameplay::phase::{roll_initiative, TurnPhase};
use crate::gameplay::terrain::CoverLevel;
use crate::gameplay::units::{MechLocation, UnitDefinition, UnitGameState};

/// Why a command was turned down. Plain data, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    GameOver,
    WrongPhase,
    UnknownUnit,
    UnitInactive,
    AlreadyMoved,
    AlreadyFired,
    AlreadyAttackedPhysically,
    OffMap,
    DestinationOccupied,
    NotReachable,
    NoWeaponsSelected,
    InvalidWeapon,
    NoLineOfSight,
    OutOfRange,
    InvalidTarget,
    NotAdjacent,
}

/// Result of a command submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandOutcome {
    Accepted,
    Rejected(RejectReason),
}

impl CommandOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, CommandOutcome::Accepted)
    }

    pub fn rejection(&self) -> Option<RejectReason> {
        match self {
            CommandOutcome::Accepted => None,
            CommandOutcome::Rejected(reason) => Some(*reason),
        }
    }
}

/// Final outcome of a finished battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    /// None is a draw
    pub winner: Option<Side>,
    pub reason: GameEndReason,
}

/// Derived battle state: a fold over the event log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub turn: u32,
    pub phase: TurnPhase,
    pub first_mover: Option<Side>,
    pub units: HashMap<UnitId, UnitGameState>,
    pub grid: HexGrid,
    pub result: Option<GameResult>,
}

impl GameState {
    fn unit(&self, unit_id: UnitId) -> Result<&UnitGameState> {
        self.units.get(&unit_id).ok_or(GameError::UnitNotFound(unit_id))
    }

    fn unit_mut(&mut self, unit_id: UnitId) -> Result<&mut UnitGameState> {
        self.units.get_mut(&unit_id).ok_or(GameError::UnitNotFound(unit_id))
    }
}

/// Serializable view of a whole session (RNG state excluded)
#[derive(Serialize)]
struct SessionSnapshot<'a> {
    config: &'a GameConfig,
    roster: &'a [UnitDefinition],
    state: &'a GameState,
    events: &'a [GameEvent],
}

/// The aggregate root: roster, event log, derived state, and the session
/// RNG. Created once per battle; after game-over it only answers queries.
pub struct GameSession {
    config: GameConfig,
    roster: Vec<UnitDefinition>,
    initial: GameState,
    state: GameState,
    events: EventLog,
    rng: ChaCha8Rng,
    hit_table: Box<dyn HitLocationTable>,
}

impl GameSession {
    /// Create a session on an authored grid with units at their
    /// deployment hexes. Rolls turn 1 initiative immediately.
    pub fn new(
        config: GameConfig,
        grid: HexGrid,
        deployments: Vec<(UnitDefinition, HexCoordinate, Facing)>,
    ) -> Result<Self> {
        let mut state = GameState {
            turn: 1,
            phase: TurnPhase::Initiative,
            first_mover: None,
            units: HashMap::new(),
            grid,
            result: None,
        };
        let mut roster = Vec::with_capacity(deployments.len());

        for (definition, position, facing) in deployments {
            if !state.grid.in_bounds(position) {
                return Err(GameError::InvalidDeployment(format!(
                    "{} deployed off-map at {}",
                    definition.name,
                    position.to_key()
                )));
            }
            if state.grid.occupant(position).is_some() {
                return Err(GameError::InvalidDeployment(format!(
                    "{} deployed onto an occupied hex {}",
                    definition.name,
                    position.to_key()
                )));
            }
            state.grid.set_occupant(position, definition.id);
            state
                .units
                .insert(definition.id, UnitGameState::new(&definition, position, facing));
            roster.push(definition);
        }

        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        let mut session = Self {
            config,
            initial: state.clone(),
            state,
            roster,
            events: EventLog::new(),
            rng,
            hit_table: Box::new(StandardHitTable),
        };

        session.emit(GameEventKind::PhaseChanged {
            turn: 1,
            phase: TurnPhase::Initiative,
        })?;
        session.roll_turn_initiative()?;
        Ok(session)
    }

    /// Swap in a different hit-location table
    pub fn with_hit_table(mut self, table: Box<dyn HitLocationTable>) -> Self {
        self.hit_table = table;
        self
    }

    // ===== Queries =====

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Read-only snapshot of the current state
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn events(&self) -> &[GameEvent] {
        self.events.as_slice()
    }

    pub fn roster(&self) -> &[UnitDefinition] {
        &self.roster
    }

    /// Roster entry for a unit
    pub fn definition(&self, unit_id: UnitId) -> Option<&UnitDefinition> {
        self.roster.iter().find(|d| d.id == unit_id)
    }

    /// Units of one side in roster order
    pub fn units_of(&self, side: Side) -> impl Iterator<Item = (&UnitDefinition, &UnitGameState)> {
        self.roster
            .iter()
            .filter(move |d| d.side == side)
            .filter_map(|d| self.state.units.get(&d.id).map(|u| (d, u)))
    }

    pub fn is_game_over(&self) -> bool {
        self.state.result.is_some()
    }

    /// Final result; None while the battle is still running
    pub fn result(&self) -> Option<&GameResult> {
        self.state.result.as_ref()
    }

    /// Full session as JSON for record-sheet and replay consumers
    pub fn to_json(&self) -> Result<String> {
        let snapshot = SessionSnapshot {
            config: &self.config,
            roster: &self.roster,
            state: &self.state,
            events: self.events.as_slice(),
        };
        Ok(serde_json::to_string_pretty(&snapshot)?)
    }

    /// Rebuild the state after the first `upto` events by replaying the
    /// log from the initial snapshot
    pub fn replay_state(&self, upto: usize) -> Result<GameState> {
        let mut state = self.initial.clone();
        for event in &self.events.as_slice()[..upto.min(self.events.len())] {
            Self::apply_event(&mut state, &event.kind)?;
        }
        Ok(state)
    }

    // ===== Commands =====

    /// Advance to the next phase; wrapping End -> Initiative increments
    /// the turn. Entering Initiative re-rolls first mover; entering Heat
    /// dissipates every unit; entering End checks the turn limit.
    pub fn advance_phase(&mut self) -> Result<CommandOutcome> {
        if self.is_game_over() {
            return Ok(CommandOutcome::Rejected(RejectReason::GameOver));
        }

        let (next, wrapped) = self.state.phase.next();
        let turn = if wrapped { self.state.turn + 1 } else { self.state.turn };
        self.emit(GameEventKind::PhaseChanged { turn, phase: next })?;
        info!(turn, phase = ?next, "phase advanced");

        match next {
            TurnPhase::Initiative => self.roll_turn_initiative()?,
            TurnPhase::Heat => self.resolve_heat_phase()?,
            TurnPhase::End => self.check_game_end()?,
            _ => {}
        }
        Ok(CommandOutcome::Accepted)
    }

    /// Move a unit to a destination hex within its run envelope
    pub fn move_unit(&mut self, unit_id: UnitId, destination: HexCoordinate) -> Result<CommandOutcome> {
        if self.is_game_over() {
            return Ok(CommandOutcome::Rejected(RejectReason::GameOver));
        }
        if self.state.phase != TurnPhase::Movement {
            return Ok(CommandOutcome::Rejected(RejectReason::WrongPhase));
        }
        let Some(definition) = self.definition(unit_id) else {
            return Ok(CommandOutcome::Rejected(RejectReason::UnknownUnit));
        };
        let walk_mp = definition.walk_mp;
        let run_mp = definition.run_mp();

        let unit = self.state.unit(unit_id)?;
        if !unit.is_active() {
            return Ok(CommandOutcome::Rejected(RejectReason::UnitInactive));
        }
        if unit.movement_this_turn.is_some() {
            return Ok(CommandOutcome::Rejected(RejectReason::AlreadyMoved));
        }
        let from = unit.position;
        let facing = unit.facing;
        let heat = unit.heat;

        if !self.state.grid.in_bounds(destination) {
            return Ok(CommandOutcome::Rejected(RejectReason::OffMap));
        }
        if destination == from {
            return Ok(CommandOutcome::Rejected(RejectReason::NotReachable));
        }
        if self.state.grid.occupant(destination).is_some() {
            return Ok(CommandOutcome::Rejected(RejectReason::DestinationOccupied));
        }

        let reach = reachability(&self.state.grid, from, run_mp, MovementType::Walk);
        let mp_spent = match reach.get(&destination) {
            Some(entry) if entry.reachable => entry.cost,
            _ => return Ok(CommandOutcome::Rejected(RejectReason::NotReachable)),
        };
        let path = path_to(&reach, destination)
            .ok_or_else(|| GameError::CorruptEventLog("reachable hex without a path".into()))?;
        let hexes_moved = (path.len() - 1) as u32;
        let movement_type = if mp_spent <= walk_mp {
            MovementType::Walk
        } else {
            MovementType::Run
        };
        let new_facing = path
            .len()
            .checked_sub(2)
            .and_then(|i| Facing::from_step(path[i], destination))
            .unwrap_or(facing);

        self.emit(GameEventKind::MovementDeclared {
            unit_id,
            from,
            to: destination,
            facing: new_facing,
            movement_type,
            mp_spent,
            hexes_moved,
        })?;

        let amount = match movement_type {
            MovementType::Walk => WALK_HEAT,
            MovementType::Run => RUN_HEAT,
        };
        self.emit(GameEventKind::HeatGenerated {
            unit_id,
            amount,
            heat: heat + amount,
        })?;

        debug!(?unit_id, to = %destination.to_key(), ?movement_type, mp_spent, "move accepted");
        Ok(CommandOutcome::Accepted)
    }

    /// Fire a set of the attacker's weapons (by mount index) at a target
    pub fn declare_attack(
        &mut self,
        attacker_id: UnitId,
        target_id: UnitId,
        weapon_indices: &[usize],
    ) -> Result<CommandOutcome> {
        if self.is_game_over() {
            return Ok(CommandOutcome::Rejected(RejectReason::GameOver));
        }
        if self.state.phase != TurnPhase::WeaponAttack {
            return Ok(CommandOutcome::Rejected(RejectReason::WrongPhase));
        }
        if weapon_indices.is_empty() {
            return Ok(CommandOutcome::Rejected(RejectReason::NoWeaponsSelected));
        }

        let (Some(attacker_def), Some(target_def)) =
            (self.definition(attacker_id), self.definition(target_id))
        else {
            return Ok(CommandOutcome::Rejected(RejectReason::UnknownUnit));
        };
        if attacker_id == target_id || attacker_def.side == target_def.side {
            return Ok(CommandOutcome::Rejected(RejectReason::InvalidTarget));
        }
        let gunnery = i32::from(attacker_def.gunnery);
        let mounts = attacker_def.weapons.clone();
        if weapon_indices.iter().any(|&i| i >= mounts.len()) {
            return Ok(CommandOutcome::Rejected(RejectReason::InvalidWeapon));
        }

        let attacker = self.state.unit(attacker_id)?;
        if !attacker.is_active() {
            return Ok(CommandOutcome::Rejected(RejectReason::UnitInactive));
        }
        if attacker.fired_this_turn {
            return Ok(CommandOutcome::Rejected(RejectReason::AlreadyFired));
        }
        let attacker_pos = attacker.position;
        let attacker_movement = attacker.movement_this_turn;
        let attacker_heat = attacker.heat;

        let target = self.state.unit(target_id)?;
        if target.destroyed {
            return Ok(CommandOutcome::Rejected(RejectReason::InvalidTarget));
        }
        let target_pos = target.position;
        let target_facing = target.facing;
        let target_hexes_moved = target.hexes_moved_this_turn;

        let los = line_of_sight(&self.state.grid, attacker_pos, target_pos);
        if !los.has_los {
            return Ok(CommandOutcome::Rejected(RejectReason::NoLineOfSight));
        }

        let distance = attacker_pos.distance(&target_pos);
        let mut range_modifiers = Vec::with_capacity(weapon_indices.len());
        for &index in weapon_indices {
            match mounts[index].weapon.range_modifier(distance) {
                Some(modifier) => range_modifiers.push(modifier),
                // Any selected weapon past long range rejects the whole
                // declaration; a UI should not offer it
                None => return Ok(CommandOutcome::Rejected(RejectReason::OutOfRange)),
            }
        }

        let target_terrain = match self.state.grid.get(target_pos).map(|h| h.cover_level()) {
            Some(CoverLevel::Partial) => PARTIAL_COVER_MODIFIER,
            Some(CoverLevel::Full) => TARGET_FULL_COVER_MODIFIER,
            _ => 0,
        };
        let heat_penalty = effects_for(attacker_heat, self.config.heat_scale).to_hit_penalty;
        let rear = is_rear_attack(target_pos, target_facing, attacker_pos);

        for (&index, range) in weapon_indices.iter().zip(range_modifiers) {
            let mount = mounts[index];
            let stats = mount.weapon.stats();

            self.emit(GameEventKind::AttackDeclared {
                attacker: attacker_id,
                target: target_id,
                weapon: mount.weapon,
            })?;

            let factors = ToHitFactors {
                gunnery,
                attacker_movement: attacker_movement_modifier(attacker_movement),
                target_movement: target_movement_modifier(target_hexes_moved),
                range,
                heat: heat_penalty,
                cover: los.cover_penalty,
                target_terrain,
            };
            let target_number = factors.total();
            let roll = roll_2d6(&mut self.rng);
            let hit = resolve_roll(target_number, roll);

            self.emit(GameEventKind::AttackResolved {
                attacker: attacker_id,
                target: target_id,
                weapon: mount.weapon,
                target_number,
                roll,
                hit,
            })?;

            if hit {
                let (location, rear_armor) = self.hit_table.roll_location(&mut self.rng, rear);
                self.apply_damage(target_id, stats.damage, location, rear_armor)?;
            }

            if stats.heat > 0 {
                let current = self.state.unit(attacker_id)?.heat;
                self.emit(GameEventKind::HeatGenerated {
                    unit_id: attacker_id,
                    amount: stats.heat,
                    heat: current + stats.heat,
                })?;
            }

            // The wreck absorbs no further declared fire
            if self.state.unit(target_id)?.destroyed {
                break;
            }
        }

        self.check_game_end()?;
        Ok(CommandOutcome::Accepted)
    }

    /// Punch or kick an adjacent target
    pub fn physical_attack(
        &mut self,
        attacker_id: UnitId,
        target_id: UnitId,
        kind: PhysicalAttackKind,
    ) -> Result<CommandOutcome> {
        if self.is_game_over() {
            return Ok(CommandOutcome::Rejected(RejectReason::GameOver));
        }
        if self.state.phase != TurnPhase::PhysicalAttack {
            return Ok(CommandOutcome::Rejected(RejectReason::WrongPhase));
        }
        let (Some(attacker_def), Some(target_def)) =
            (self.definition(attacker_id), self.definition(target_id))
        else {
            return Ok(CommandOutcome::Rejected(RejectReason::UnknownUnit));
        };
        if attacker_id == target_id || attacker_def.side == target_def.side {
            return Ok(CommandOutcome::Rejected(RejectReason::InvalidTarget));
        }
        let piloting = i32::from(attacker_def.piloting);
        let tonnage = attacker_def.tonnage;

        let attacker = self.state.unit(attacker_id)?;
        if !attacker.is_active() {
            return Ok(CommandOutcome::Rejected(RejectReason::UnitInactive));
        }
        if attacker.physical_attack_this_turn {
            return Ok(CommandOutcome::Rejected(RejectReason::AlreadyAttackedPhysically));
        }
        let attacker_pos = attacker.position;
        let attacker_movement = attacker.movement_this_turn;

        let target = self.state.unit(target_id)?;
        if target.destroyed {
            return Ok(CommandOutcome::Rejected(RejectReason::InvalidTarget));
        }
        let target_pos = target.position;
        let target_facing = target.facing;
        let target_hexes_moved = target.hexes_moved_this_turn;

        if attacker_pos.distance(&target_pos) != 1 {
            return Ok(CommandOutcome::Rejected(RejectReason::NotAdjacent));
        }

        self.emit(GameEventKind::PhysicalAttackDeclared {
            attacker: attacker_id,
            target: target_id,
            kind,
        })?;

        let target_number = piloting
            + kind.to_hit_modifier()
            + attacker_movement_modifier(attacker_movement)
            + target_movement_modifier(target_hexes_moved);
        let roll = roll_2d6(&mut self.rng);
        let hit = resolve_roll(target_number, roll);

        self.emit(GameEventKind::PhysicalAttackResolved {
            attacker: attacker_id,
            target: target_id,
            kind,
            target_number,
            roll,
            hit,
        })?;

        if hit {
            let rear = is_rear_attack(target_pos, target_facing, attacker_pos);
            let (location, rear_armor) = kind.roll_location(&mut self.rng, rear);
            self.apply_damage(target_id, kind.damage(tonnage), location, rear_armor)?;
        }

        self.check_game_end()?;
        Ok(CommandOutcome::Accepted)
    }

    /// Let a strategy play out the current phase for one side. Every
    /// chosen command goes through the normal validation path; a rejected
    /// choice stops the strategy rather than being trusted.
    pub fn run_ai_turn(&mut self, side: Side, strategy: &mut dyn AiStrategy) -> Result<()> {
        loop {
            if self.is_game_over() {
                return Ok(());
            }
            let legal = self.legal_commands(side);
            if legal.is_empty() {
                return Ok(());
            }
            let Some(command) = strategy.choose(self, side, &legal) else {
                return Ok(());
            };
            let outcome = match command {
                AiCommand::Move { unit_id, destination } => self.move_unit(unit_id, destination)?,
                AiCommand::Attack {
                    attacker,
                    target,
                    ref weapons,
                } => self.declare_attack(attacker, target, weapons)?,
                AiCommand::Physical {
                    attacker,
                    target,
                    kind,
                } => self.physical_attack(attacker, target, kind)?,
            };
            if let CommandOutcome::Rejected(reason) = outcome {
                warn!(?side, ?reason, "AI proposed an illegal command, stopping its activation");
                return Ok(());
            }
        }
    }

    /// Enumerate every command the engine would accept for `side` in the
    /// current phase, in a deterministic order
    pub fn legal_commands(&self, side: Side) -> Vec<AiCommand> {
        let mut commands = Vec::new();
        if self.is_game_over() {
            return commands;
        }

        match self.state.phase {
            TurnPhase::Movement => {
                for (definition, unit) in self.units_of(side) {
                    if !unit.is_active() || unit.movement_this_turn.is_some() {
                        continue;
                    }
                    let mut range = movement_range(
                        &self.state.grid,
                        unit.position,
                        definition.run_mp(),
                        MovementType::Walk,
                    );
                    range.sort_by_key(|h| h.coord);
                    for hex in range {
                        if hex.reachable && self.state.grid.occupant(hex.coord).is_none() {
                            commands.push(AiCommand::Move {
                                unit_id: definition.id,
                                destination: hex.coord,
                            });
                        }
                    }
                }
            }
            TurnPhase::WeaponAttack => {
                for (definition, unit) in self.units_of(side) {
                    if !unit.is_active() || unit.fired_this_turn {
                        continue;
                    }
                    for (target_def, target) in self.units_of(side.opposite()) {
                        if target.destroyed {
                            continue;
                        }
                        if !line_of_sight(&self.state.grid, unit.position, target.position).has_los
                        {
                            continue;
                        }
                        let distance = unit.position.distance(&target.position);
                        let weapons: Vec<usize> = definition
                            .weapons
                            .iter()
                            .enumerate()
                            .filter(|(_, m)| m.weapon.range_modifier(distance).is_some())
                            .map(|(i, _)| i)
                            .collect();
                        if !weapons.is_empty() {
                            commands.push(AiCommand::Attack {
                                attacker: definition.id,
                                target: target_def.id,
                                weapons,
                            });
                        }
                    }
                }
            }
            TurnPhase::PhysicalAttack => {
                for (definition, unit) in self.units_of(side) {
                    if !unit.is_active() || unit.physical_attack_this_turn {
                        continue;
                    }
                    for (target_def, target) in self.units_of(side.opposite()) {
                        if target.destroyed || unit.position.distance(&target.position) != 1 {
                            continue;
                        }
                        for kind in [PhysicalAttackKind::Kick, PhysicalAttackKind::Punch] {
                            commands.push(AiCommand::Physical {
                                attacker: definition.id,
                                target: target_def.id,
                                kind,
                            });
                        }
                    }
                }
            }
            _ => {}
        }

        commands
    }

    // ===== Internals =====

    /// Append an event and fold it into the current state. The fold is
    /// the ONLY place state changes.
    fn emit(&mut self, kind: GameEventKind) -> Result<()> {
        Self::apply_event(&mut self.state, &kind)?;
        debug!(event = ?kind, "event appended");
        self.events.push(self.state.turn, self.state.phase, kind);
        Ok(())
    }

    /// Fold one event into a state. Used for live mutation and replay
    /// alike; an event referencing an unknown unit means the log is
    /// corrupt and propagates as a fatal error.
    fn apply_event(state: &mut GameState, kind: &GameEventKind) -> Result<()> {
        match kind {
            GameEventKind::InitiativeRolled { first_mover, .. } => {
                state.first_mover = Some(*first_mover);
            }
            GameEventKind::PhaseChanged { turn, phase } => {
                state.turn = *turn;
                state.phase = *phase;
                if *phase == TurnPhase::Initiative {
                    for unit in state.units.values_mut() {
                        unit.reset_turn_flags();
                    }
                }
            }
            GameEventKind::MovementDeclared {
                unit_id,
                from,
                to,
                facing,
                movement_type,
                hexes_moved,
                ..
            } => {
                let unit = state.unit_mut(*unit_id)?;
                unit.position = *to;
                unit.facing = *facing;
                unit.movement_this_turn = Some(*movement_type);
                unit.hexes_moved_this_turn = *hexes_moved;
                state.grid.clear_occupant(*from);
                state.grid.set_occupant(*to, *unit_id);
            }
            GameEventKind::AttackDeclared { attacker, .. } => {
                state.unit_mut(*attacker)?.fired_this_turn = true;
            }
            GameEventKind::PhysicalAttackDeclared { attacker, .. } => {
                state.unit_mut(*attacker)?.physical_attack_this_turn = true;
            }
            // Outcomes are carried by the follow-up damage/heat events
            GameEventKind::AttackResolved { .. } => {}
            GameEventKind::PhysicalAttackResolved { .. } => {}
            GameEventKind::DamageApplied {
                unit_id,
                location,
                rear,
                armor_damage,
                structure_damage,
                location_destroyed,
            } => {
                let unit = state.unit_mut(*unit_id)?;
                let armor = if *rear {
                    unit.rear_armor.entry(*location).or_insert(0)
                } else {
                    unit.armor.entry(*location).or_insert(0)
                };
                *armor = armor.saturating_sub(*armor_damage);
                let structure = unit.structure.entry(*location).or_insert(0);
                *structure = structure.saturating_sub(*structure_damage);
                if *location_destroyed {
                    unit.destroyed_locations.insert(*location);
                }
            }
            // Informational: equipment-slot criticals are not modeled
            GameEventKind::CriticalHit { .. } => {}
            GameEventKind::HeatGenerated { unit_id, heat, .. }
            | GameEventKind::HeatDissipated { unit_id, heat, .. } => {
                state.unit_mut(*unit_id)?.heat = *heat;
            }
            GameEventKind::UnitShutdown { unit_id, .. } => {
                state.unit_mut(*unit_id)?.shutdown = true;
            }
            GameEventKind::UnitRestarted { unit_id, .. } => {
                state.unit_mut(*unit_id)?.shutdown = false;
            }
            GameEventKind::PilotHit {
                unit_id,
                wounds,
                conscious,
            } => {
                let unit = state.unit_mut(*unit_id)?;
                unit.pilot_wounds = *wounds;
                unit.pilot_conscious = *conscious;
            }
            GameEventKind::UnitDestroyed { unit_id, .. } => {
                let unit = state.unit_mut(*unit_id)?;
                unit.destroyed = true;
                let position = unit.position;
                state.grid.clear_occupant(position);
            }
            GameEventKind::GameEnded { winner, reason } => {
                state.result = Some(GameResult {
                    winner: *winner,
                    reason: *reason,
                });
            }
        }
        Ok(())
    }

    /// Roll and record initiative for the current turn
    fn roll_turn_initiative(&mut self) -> Result<()> {
        let roll = roll_initiative(&mut self.rng);
        self.emit(GameEventKind::InitiativeRolled {
            player_roll: roll.player_roll,
            opponent_roll: roll.opponent_roll,
            first_mover: roll.first_mover,
        })?;
        info!(turn = self.state.turn, first_mover = ?roll.first_mover, "initiative rolled");
        Ok(())
    }

    /// Heat phase: dissipate every surviving unit, then apply shutdown
    /// and restart transitions
    fn resolve_heat_phase(&mut self) -> Result<()> {
        let scale = self.config.heat_scale;
        let order: Vec<UnitId> = self.roster.iter().map(|d| d.id).collect();

        for unit_id in order {
            let Some(definition) = self.definition(unit_id) else {
                continue;
            };
            let heat_sinks = definition.heat_sinks;
            let unit = self.state.unit(unit_id)?;
            if unit.destroyed {
                continue;
            }
            let before = unit.heat;
            let was_shutdown = unit.shutdown;

            let after = dissipate(before, heat_sinks);
            if after != before {
                self.emit(GameEventKind::HeatDissipated {
                    unit_id,
                    amount: before - after,
                    heat: after,
                })?;
            }

            let effects = effects_for(after, scale);
            if effects.shutdown && !was_shutdown {
                self.emit(GameEventKind::UnitShutdown {
                    unit_id,
                    heat: after,
                })?;
            } else if !effects.shutdown && was_shutdown {
                self.emit(GameEventKind::UnitRestarted {
                    unit_id,
                    heat: after,
                })?;
            }
        }
        Ok(())
    }

    /// Work damage through armor, structure, and inward transfer,
    /// emitting one DamageApplied per location touched
    fn apply_damage(
        &mut self,
        unit_id: UnitId,
        damage: u32,
        location: MechLocation,
        rear: bool,
    ) -> Result<()> {
        let mut remaining = damage;
        let mut location = location;

        while remaining > 0 {
            let unit = self.state.unit(unit_id)?;
            if unit.destroyed {
                return Ok(());
            }

            // Already-destroyed locations pass damage straight inward
            if unit.destroyed_locations.contains(&location) {
                match location.transfer_target() {
                    Some(next) => {
                        location = next;
                        continue;
                    }
                    None => return Ok(()),
                }
            }

            let use_rear = rear && location.is_torso();
            let armor_pool = if use_rear {
                unit.rear_armor_at(location)
            } else {
                unit.armor_at(location)
            };
            let armor_damage = remaining.min(armor_pool);
            remaining -= armor_damage;

            let structure_pool = unit.structure_at(location);
            let structure_damage = remaining.min(structure_pool);
            remaining -= structure_damage;

            let location_destroyed = structure_damage > 0 && structure_damage == structure_pool;

            self.emit(GameEventKind::DamageApplied {
                unit_id,
                location,
                rear: use_rear,
                armor_damage,
                structure_damage,
                location_destroyed,
            })?;

            if structure_damage > 0 {
                let crit_roll = roll_2d6(&mut self.rng);
                if crit_roll >= CRITICAL_CHECK_TARGET {
                    self.emit(GameEventKind::CriticalHit {
                        unit_id,
                        location,
                        roll: crit_roll,
                    })?;
                }
            }

            if location == MechLocation::Head && (armor_damage > 0 || structure_damage > 0) {
                self.wound_pilot(unit_id)?;
                if self.state.unit(unit_id)?.destroyed {
                    return Ok(());
                }
            }

            if location_destroyed && location.is_vital() {
                let reason = match location {
                    MechLocation::Head => DestructionReason::HeadDestroyed,
                    _ => DestructionReason::CenterTorsoDestroyed,
                };
                self.emit(GameEventKind::UnitDestroyed { unit_id, reason })?;
                return Ok(());
            }

            if remaining > 0 {
                match location.transfer_target() {
                    Some(next) => location = next,
                    None => return Ok(()),
                }
            }
        }
        Ok(())
    }

    /// One pilot wound: at six the pilot dies and the unit with them,
    /// otherwise a 2d6 consciousness check against the wound-indexed
    /// target
    fn wound_pilot(&mut self, unit_id: UnitId) -> Result<()> {
        let unit = self.state.unit(unit_id)?;
        let wounds = unit.pilot_wounds + 1;
        let already_out = !unit.pilot_conscious;

        if wounds >= MAX_PILOT_WOUNDS {
            self.emit(GameEventKind::PilotHit {
                unit_id,
                wounds,
                conscious: false,
            })?;
            self.emit(GameEventKind::UnitDestroyed {
                unit_id,
                reason: DestructionReason::PilotKilled,
            })?;
            return Ok(());
        }

        let target = CONSCIOUSNESS_TARGETS[(wounds - 1) as usize];
        let conscious = if already_out {
            false
        } else {
            roll_2d6(&mut self.rng) >= target
        };
        self.emit(GameEventKind::PilotHit {
            unit_id,
            wounds,
            conscious,
        })?;
        Ok(())
    }

    /// Emit GameEnded when a side is eliminated, or when the turn limit
    /// passes at the End phase
    fn check_game_end(&mut self) -> Result<()> {
        if self.is_game_over() {
            return Ok(());
        }

        let player_alive = self.units_of(Side::Player).any(|(_, u)| !u.destroyed);
        let opponent_alive = self.units_of(Side::Opponent).any(|(_, u)| !u.destroyed);

        let ended = match (player_alive, opponent_alive) {
            (true, false) => Some((Some(Side::Player), GameEndReason::Elimination)),
            (false, true) => Some((Some(Side::Opponent), GameEndReason::Elimination)),
            (false, false) => Some((None, GameEndReason::Elimination)),
            (true, true) => {
                if self.state.phase == TurnPhase::End && self.state.turn >= self.config.max_turns {
                    Some((None, GameEndReason::TurnLimit))
                } else {
                    None
                }
            }
        };

        if let Some((winner, reason)) = ended {
            self.emit(GameEventKind::GameEnded { winner, reason })?;
            info!(?winner, ?reason, "game over");
        }
        Ok(())
    }
}
