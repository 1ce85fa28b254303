//! Unit roster definitions and per-unit battle state
//!
//! `UnitDefinition` is the static roster entry; `UnitGameState` is owned
//! exclusively by the session and mutated only through engine commands.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::core::types::{Side, UnitId};
use crate::gameplay::hex::{Facing, HexCoordinate};
use crate::gameplay::movement::MovementType;
use crate::gameplay::weapons::WeaponKind;

/// Armor/structure locations of a mech
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MechLocation {
    Head,
    CenterTorso,
    LeftTorso,
    RightTorso,
    LeftArm,
    RightArm,
    LeftLeg,
    RightLeg,
}

impl MechLocation {
    /// All locations
    pub fn all() -> [MechLocation; 8] {
        [
            MechLocation::Head,
            MechLocation::CenterTorso,
            MechLocation::LeftTorso,
            MechLocation::RightTorso,
            MechLocation::LeftArm,
            MechLocation::RightArm,
            MechLocation::LeftLeg,
            MechLocation::RightLeg,
        ]
    }

    /// Torso locations, the only ones with rear armor
    pub fn is_torso(&self) -> bool {
        matches!(
            self,
            MechLocation::CenterTorso | MechLocation::LeftTorso | MechLocation::RightTorso
        )
    }

    /// Where damage transfers once this location is destroyed
    pub fn transfer_target(&self) -> Option<MechLocation> {
        match self {
            MechLocation::LeftArm | MechLocation::LeftLeg => Some(MechLocation::LeftTorso),
            MechLocation::RightArm | MechLocation::RightLeg => Some(MechLocation::RightTorso),
            MechLocation::LeftTorso | MechLocation::RightTorso => Some(MechLocation::CenterTorso),
            MechLocation::Head | MechLocation::CenterTorso => None,
        }
    }

    /// Does destroying this location destroy the whole unit?
    pub fn is_vital(&self) -> bool {
        matches!(self, MechLocation::Head | MechLocation::CenterTorso)
    }
}

/// A weapon fixed to a location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponMount {
    pub weapon: WeaponKind,
    pub location: MechLocation,
}

/// Static roster entry for one unit. Never mutated during a battle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitDefinition {
    pub id: UnitId,
    pub name: String,
    pub side: Side,
    /// Chassis reference for record-sheet lookups
    pub unit_ref: String,
    pub tonnage: u32,
    /// Gunnery skill: lower is better, base of every weapon to-hit
    pub gunnery: u8,
    /// Piloting skill: lower is better, base of physical attacks
    pub piloting: u8,
    pub walk_mp: u32,
    pub heat_sinks: u32,
    pub weapons: Vec<WeaponMount>,
    pub armor: HashMap<MechLocation, u32>,
    /// Rear armor, torso locations only
    pub rear_armor: HashMap<MechLocation, u32>,
    pub structure: HashMap<MechLocation, u32>,
}

impl UnitDefinition {
    /// Create a definition with a simplified standard armor/structure
    /// layout scaled from tonnage. Weapons are added with
    /// [`with_weapon`](Self::with_weapon).
    pub fn new(
        name: impl Into<String>,
        side: Side,
        unit_ref: impl Into<String>,
        tonnage: u32,
        gunnery: u8,
        piloting: u8,
        walk_mp: u32,
        heat_sinks: u32,
    ) -> Self {
        let mut armor = HashMap::new();
        let mut rear_armor = HashMap::new();
        let mut structure = HashMap::new();

        for location in MechLocation::all() {
            let (front, rear, internal) = match location {
                MechLocation::Head => (9, 0, 3),
                MechLocation::CenterTorso => (tonnage / 2, tonnage / 8, tonnage / 4),
                MechLocation::LeftTorso | MechLocation::RightTorso => {
                    (tonnage / 3, tonnage / 10, tonnage / 5)
                }
                MechLocation::LeftArm | MechLocation::RightArm => (tonnage / 4, 0, tonnage / 6),
                MechLocation::LeftLeg | MechLocation::RightLeg => (tonnage / 3, 0, tonnage / 5),
            };
            armor.insert(location, front.max(1));
            if location.is_torso() {
                rear_armor.insert(location, rear.max(1));
            }
            structure.insert(location, internal.max(1));
        }

        Self {
            id: UnitId::new(),
            name: name.into(),
            side,
            unit_ref: unit_ref.into(),
            tonnage,
            gunnery,
            piloting,
            walk_mp,
            heat_sinks,
            weapons: Vec::new(),
            armor,
            rear_armor,
            structure,
        }
    }

    pub fn with_weapon(mut self, weapon: WeaponKind, location: MechLocation) -> Self {
        self.weapons.push(WeaponMount { weapon, location });
        self
    }

    /// Running MP: walking speed times 1.5, rounded up
    pub fn run_mp(&self) -> u32 {
        (self.walk_mp * 3).div_ceil(2)
    }

    /// MP budget for a movement type
    pub fn mp_for(&self, movement: MovementType) -> u32 {
        match movement {
            MovementType::Walk => self.walk_mp,
            MovementType::Run => self.run_mp(),
        }
    }
}

/// Battle state of one unit. Owned exclusively by the session; every field
/// changes only by folding game events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitGameState {
    pub position: HexCoordinate,
    pub facing: Facing,
    pub armor: HashMap<MechLocation, u32>,
    pub rear_armor: HashMap<MechLocation, u32>,
    pub structure: HashMap<MechLocation, u32>,
    pub heat: i32,
    pub destroyed_locations: HashSet<MechLocation>,
    pub destroyed: bool,
    pub pilot_wounds: u8,
    pub pilot_conscious: bool,
    pub shutdown: bool,
    pub movement_this_turn: Option<MovementType>,
    pub hexes_moved_this_turn: u32,
    pub fired_this_turn: bool,
    pub physical_attack_this_turn: bool,
}

impl UnitGameState {
    pub fn new(definition: &UnitDefinition, position: HexCoordinate, facing: Facing) -> Self {
        Self {
            position,
            facing,
            armor: definition.armor.clone(),
            rear_armor: definition.rear_armor.clone(),
            structure: definition.structure.clone(),
            heat: 0,
            destroyed_locations: HashSet::new(),
            destroyed: false,
            pilot_wounds: 0,
            pilot_conscious: true,
            shutdown: false,
            movement_this_turn: None,
            hexes_moved_this_turn: 0,
            fired_this_turn: false,
            physical_attack_this_turn: false,
        }
    }

    /// Can this unit act at all this phase?
    pub fn is_active(&self) -> bool {
        !self.destroyed && self.pilot_conscious && !self.shutdown
    }

    /// Remaining front armor at a location
    pub fn armor_at(&self, location: MechLocation) -> u32 {
        self.armor.get(&location).copied().unwrap_or(0)
    }

    /// Remaining rear armor at a torso location
    pub fn rear_armor_at(&self, location: MechLocation) -> u32 {
        self.rear_armor.get(&location).copied().unwrap_or(0)
    }

    /// Remaining internal structure at a location
    pub fn structure_at(&self, location: MechLocation) -> u32 {
        self.structure.get(&location).copied().unwrap_or(0)
    }

    /// Reset the per-turn bookkeeping at the start of a new turn
    pub fn reset_turn_flags(&mut self) {
        self.movement_this_turn = None;
        self.hexes_moved_this_turn = 0;
        self.fired_this_turn = false;
        self.physical_attack_this_turn = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition() -> UnitDefinition {
        UnitDefinition::new("Test Mech", Side::Player, "TST-1A", 50, 4, 5, 4, 10)
            .with_weapon(WeaponKind::MediumLaser, MechLocation::RightArm)
    }

    #[test]
    fn test_run_mp_rounds_up() {
        let mut def = definition();
        def.walk_mp = 5;
        assert_eq!(def.run_mp(), 8);
        def.walk_mp = 4;
        assert_eq!(def.run_mp(), 6);
    }

    #[test]
    fn test_all_locations_have_armor_and_structure() {
        let def = definition();
        for location in MechLocation::all() {
            assert!(def.armor.get(&location).copied().unwrap_or(0) > 0);
            assert!(def.structure.get(&location).copied().unwrap_or(0) > 0);
        }
    }

    #[test]
    fn test_only_torsos_have_rear_armor() {
        let def = definition();
        for location in MechLocation::all() {
            assert_eq!(def.rear_armor.contains_key(&location), location.is_torso());
        }
    }

    #[test]
    fn test_transfer_chain_ends_at_center_torso() {
        let mut location = MechLocation::RightArm;
        let mut hops = 0;
        while let Some(next) = location.transfer_target() {
            location = next;
            hops += 1;
            assert!(hops < 8, "transfer chain must terminate");
        }
        assert_eq!(location, MechLocation::CenterTorso);
    }

    #[test]
    fn test_fresh_state_is_active() {
        let def = definition();
        let state = UnitGameState::new(&def, HexCoordinate::new(0, 0), Facing::East);
        assert!(state.is_active());
        assert_eq!(state.heat, 0);
        assert!(!state.destroyed);
    }

    #[test]
    fn test_shutdown_unit_inactive() {
        let def = definition();
        let mut state = UnitGameState::new(&def, HexCoordinate::new(0, 0), Facing::East);
        state.shutdown = true;
        assert!(!state.is_active());
    }

    #[test]
    fn test_reset_turn_flags() {
        let def = definition();
        let mut state = UnitGameState::new(&def, HexCoordinate::new(0, 0), Facing::East);
        state.movement_this_turn = Some(MovementType::Run);
        state.hexes_moved_this_turn = 6;
        state.fired_this_turn = true;
        state.physical_attack_this_turn = true;

        state.reset_turn_flags();
        assert_eq!(state.movement_this_turn, None);
        assert_eq!(state.hexes_moved_this_turn, 0);
        assert!(!state.fired_this_turn);
        assert!(!state.physical_attack_this_turn);
    }
}
