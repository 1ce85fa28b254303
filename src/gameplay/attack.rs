//! Attack resolution: to-hit numbers, 2d6 rolls, and hit locations
//!
//! Pure functions plus a pluggable hit-location table; applying the
//! resulting damage to unit state happens in the session through events.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::gameplay::constants::{
    AUTO_HIT_ROLL, AUTO_MISS_ROLL, KICK_ATTACK_MODIFIER, RUN_ATTACK_MODIFIER,
    WALK_ATTACK_MODIFIER,
};
use crate::gameplay::dice::{roll_2d6, roll_d6};
use crate::gameplay::hex::{Facing, HexCoordinate};
use crate::gameplay::movement::MovementType;
use crate::gameplay::units::MechLocation;

/// Everything feeding a weapon-attack to-hit number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ToHitFactors {
    pub gunnery: i32,
    pub attacker_movement: i32,
    pub target_movement: i32,
    pub range: i32,
    pub heat: i32,
    pub cover: i32,
    pub target_terrain: i32,
}

impl ToHitFactors {
    /// The final target number
    pub fn total(&self) -> i32 {
        self.gunnery
            + self.attacker_movement
            + self.target_movement
            + self.range
            + self.heat
            + self.cover
            + self.target_terrain
    }
}

/// To-hit modifier from the attacker's own movement this turn
pub fn attacker_movement_modifier(movement: Option<MovementType>) -> i32 {
    match movement {
        None => 0,
        Some(MovementType::Walk) => WALK_ATTACK_MODIFIER,
        Some(MovementType::Run) => RUN_ATTACK_MODIFIER,
    }
}

/// To-hit modifier from how far the target moved this turn
pub fn target_movement_modifier(hexes_moved: u32) -> i32 {
    match hexes_moved {
        0 => 0,
        1..=4 => 1,
        5..=7 => 2,
        _ => 3,
    }
}

/// Resolve a 2d6 roll against a target number. A natural 2 always misses
/// and a natural 12 always hits, overriding the comparison.
pub fn resolve_roll(target_number: i32, roll: u8) -> bool {
    if roll <= AUTO_MISS_ROLL {
        return false;
    }
    if roll >= AUTO_HIT_ROLL {
        return true;
    }
    i32::from(roll) >= target_number
}

/// Is the attacker inside the target's rear arc (the three hexsides behind
/// the target)? Straight flank shots count as front. Integer cube-rotation
/// math, no floating point.
pub fn is_rear_attack(
    target_position: HexCoordinate,
    target_facing: Facing,
    attacker_position: HexCoordinate,
) -> bool {
    if target_position == attacker_position {
        return false;
    }

    // Cube vector from target to attacker
    let mut x = attacker_position.q - target_position.q;
    let mut z = attacker_position.r - target_position.r;
    let mut y = -x - z;

    // Rotate clockwise once per facing step so the facing maps onto East;
    // one clockwise step is (x, y, z) -> (-z, -x, -y)
    for _ in 0..target_facing.index() {
        let (nx, ny, nz) = (-z, -x, -y);
        x = nx;
        y = ny;
        z = nz;
    }

    x < 0
}

/// Pluggable hit-location determination
pub trait HitLocationTable {
    /// Roll a location; `rear` selects the rear column. Returns the
    /// location and whether rear armor takes the damage.
    fn roll_location(&self, rng: &mut dyn rand::RngCore, rear: bool) -> (MechLocation, bool);
}

/// The classic 2d6 hit-location column
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardHitTable;

impl HitLocationTable for StandardHitTable {
    fn roll_location(&self, rng: &mut dyn rand::RngCore, rear: bool) -> (MechLocation, bool) {
        let roll = roll_2d6(rng);
        let location = match roll {
            2 | 7 => MechLocation::CenterTorso,
            3 | 4 => MechLocation::RightArm,
            5 => MechLocation::RightLeg,
            6 => MechLocation::RightTorso,
            8 => MechLocation::LeftTorso,
            9 => MechLocation::LeftLeg,
            10 | 11 => MechLocation::LeftArm,
            _ => MechLocation::Head,
        };
        // Rear-arc fire strikes rear armor on torso locations
        (location, rear && location.is_torso())
    }
}

/// Physical attack types resolved in the PhysicalAttack phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhysicalAttackKind {
    Punch,
    Kick,
}

impl PhysicalAttackKind {
    /// To-hit modifier on top of the attacker's piloting skill
    pub fn to_hit_modifier(&self) -> i32 {
        match self {
            PhysicalAttackKind::Punch => 0,
            PhysicalAttackKind::Kick => KICK_ATTACK_MODIFIER,
        }
    }

    /// Damage dealt by a mech of the given tonnage
    pub fn damage(&self, tonnage: u32) -> u32 {
        match self {
            PhysicalAttackKind::Punch => tonnage.div_ceil(10),
            PhysicalAttackKind::Kick => tonnage.div_ceil(5),
        }
    }

    /// Roll the dedicated 1d6 location column for this attack
    pub fn roll_location(&self, rng: &mut impl Rng, rear: bool) -> (MechLocation, bool) {
        let roll = roll_d6(rng);
        let location = match self {
            // Punches land at arm height
            PhysicalAttackKind::Punch => match roll {
                1 => MechLocation::LeftArm,
                2 => MechLocation::LeftTorso,
                3 => MechLocation::CenterTorso,
                4 => MechLocation::RightTorso,
                5 => MechLocation::RightArm,
                _ => MechLocation::Head,
            },
            // Kicks only ever hit legs
            PhysicalAttackKind::Kick => {
                if roll <= 3 {
                    MechLocation::RightLeg
                } else {
                    MechLocation::LeftLeg
                }
            }
        };
        (location, rear && location.is_torso())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_to_hit_spec_scenario() {
        // Gunnery 4, medium range +2, target moved +1, no cover => 7
        let factors = ToHitFactors {
            gunnery: 4,
            attacker_movement: 0,
            target_movement: 1,
            range: 2,
            heat: 0,
            cover: 0,
            target_terrain: 0,
        };
        assert_eq!(factors.total(), 7);
        assert!(resolve_roll(7, 7));
        assert!(!resolve_roll(7, 6));
    }

    #[test]
    fn test_natural_two_always_misses() {
        assert!(!resolve_roll(2, 2));
        assert!(!resolve_roll(-3, 2));
    }

    #[test]
    fn test_natural_twelve_always_hits() {
        assert!(resolve_roll(13, 12));
        assert!(resolve_roll(20, 12));
    }

    #[test]
    fn test_attacker_movement_modifiers() {
        assert_eq!(attacker_movement_modifier(None), 0);
        assert_eq!(attacker_movement_modifier(Some(MovementType::Walk)), 1);
        assert_eq!(attacker_movement_modifier(Some(MovementType::Run)), 2);
    }

    #[test]
    fn test_target_movement_modifiers() {
        assert_eq!(target_movement_modifier(0), 0);
        assert_eq!(target_movement_modifier(1), 1);
        assert_eq!(target_movement_modifier(4), 1);
        assert_eq!(target_movement_modifier(5), 2);
        assert_eq!(target_movement_modifier(7), 2);
        assert_eq!(target_movement_modifier(8), 3);
        assert_eq!(target_movement_modifier(15), 3);
    }

    #[test]
    fn test_rear_arc_directly_behind() {
        let target = HexCoordinate::new(0, 0);
        // Facing East: attacker to the west is behind
        assert!(is_rear_attack(target, Facing::East, HexCoordinate::new(-3, 0)));
        // Attacker to the east is in front
        assert!(!is_rear_attack(target, Facing::East, HexCoordinate::new(3, 0)));
    }

    #[test]
    fn test_rear_arc_rotates_with_facing() {
        let target = HexCoordinate::new(0, 0);
        let east_of_target = HexCoordinate::new(4, 0);
        assert!(is_rear_attack(target, Facing::West, east_of_target));
        assert!(!is_rear_attack(target, Facing::East, east_of_target));
    }

    #[test]
    fn test_straight_flank_is_front() {
        let target = HexCoordinate::new(0, 0);
        // Facing East, attacker due "north" along the flank axis
        let flank = HexCoordinate::new(2, -4);
        // (2,-4) cube (2,2,-4): rotated x stays >= 0 for East
        assert!(!is_rear_attack(target, Facing::East, flank));
    }

    #[test]
    fn test_standard_table_covers_all_rolls() {
        let table = StandardHitTable;
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..200 {
            let (location, rear) = table.roll_location(&mut rng, false);
            assert!(MechLocation::all().contains(&location));
            assert!(!rear);
        }
    }

    #[test]
    fn test_rear_fire_hits_rear_torso_armor_only() {
        let table = StandardHitTable;
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..200 {
            let (location, rear) = table.roll_location(&mut rng, true);
            if rear {
                assert!(location.is_torso());
            } else {
                assert!(!location.is_torso());
            }
        }
    }

    #[test]
    fn test_physical_damage_scales_with_tonnage() {
        assert_eq!(PhysicalAttackKind::Punch.damage(50), 5);
        assert_eq!(PhysicalAttackKind::Kick.damage(50), 10);
        assert_eq!(PhysicalAttackKind::Punch.damage(55), 6);
        assert_eq!(PhysicalAttackKind::Kick.damage(55), 11);
    }

    #[test]
    fn test_kick_easier_than_punch() {
        assert!(PhysicalAttackKind::Kick.to_hit_modifier() < PhysicalAttackKind::Punch.to_hit_modifier());
    }

    #[test]
    fn test_kicks_only_hit_legs() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for _ in 0..100 {
            let (location, _) = PhysicalAttackKind::Kick.roll_location(&mut rng, false);
            assert!(matches!(location, MechLocation::LeftLeg | MechLocation::RightLeg));
        }
    }
}
