//! Weapon catalog: damage, heat, and range brackets
//!
//! Cluster weapons (LRM/SRM) use flat averaged damage; per-missile cluster
//! rolls are not modeled.

use serde::{Deserialize, Serialize};

use crate::gameplay::constants::{LONG_RANGE_MODIFIER, MEDIUM_RANGE_MODIFIER};

/// Weapon types available to the customizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    SmallLaser,
    MediumLaser,
    LargeLaser,
    Ppc,
    Autocannon5,
    Autocannon10,
    Lrm10,
    Srm4,
    MachineGun,
}

/// Static properties of a weapon type. Serializes for display surfaces;
/// the catalog itself is code, so there is no deserialization path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeaponStats {
    pub name: &'static str,
    pub damage: u32,
    pub heat: i32,
    /// Attacks inside this distance take +1 per hex of shortfall
    pub min_range: u32,
    pub short: u32,
    pub medium: u32,
    pub long: u32,
}

/// Range bracket of a shot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RangeBracket {
    Short,
    Medium,
    Long,
    OutOfRange,
}

impl RangeBracket {
    /// To-hit modifier for the bracket
    pub fn modifier(&self) -> i32 {
        match self {
            RangeBracket::Short => 0,
            RangeBracket::Medium => MEDIUM_RANGE_MODIFIER,
            RangeBracket::Long => LONG_RANGE_MODIFIER,
            RangeBracket::OutOfRange => 0,
        }
    }
}

impl WeaponKind {
    pub fn stats(&self) -> WeaponStats {
        match self {
            WeaponKind::SmallLaser => WeaponStats {
                name: "Small Laser",
                damage: 3,
                heat: 1,
                min_range: 0,
                short: 1,
                medium: 2,
                long: 3,
            },
            WeaponKind::MediumLaser => WeaponStats {
                name: "Medium Laser",
                damage: 5,
                heat: 3,
                min_range: 0,
                short: 3,
                medium: 6,
                long: 9,
            },
            WeaponKind::LargeLaser => WeaponStats {
                name: "Large Laser",
                damage: 8,
                heat: 8,
                min_range: 0,
                short: 5,
                medium: 10,
                long: 15,
            },
            WeaponKind::Ppc => WeaponStats {
                name: "PPC",
                damage: 10,
                heat: 10,
                min_range: 3,
                short: 6,
                medium: 12,
                long: 18,
            },
            WeaponKind::Autocannon5 => WeaponStats {
                name: "AC/5",
                damage: 5,
                heat: 1,
                min_range: 3,
                short: 6,
                medium: 12,
                long: 18,
            },
            WeaponKind::Autocannon10 => WeaponStats {
                name: "AC/10",
                damage: 10,
                heat: 3,
                min_range: 0,
                short: 5,
                medium: 10,
                long: 15,
            },
            WeaponKind::Lrm10 => WeaponStats {
                name: "LRM 10",
                damage: 6,
                heat: 4,
                min_range: 6,
                short: 7,
                medium: 14,
                long: 21,
            },
            WeaponKind::Srm4 => WeaponStats {
                name: "SRM 4",
                damage: 8,
                heat: 3,
                min_range: 0,
                short: 3,
                medium: 6,
                long: 9,
            },
            WeaponKind::MachineGun => WeaponStats {
                name: "Machine Gun",
                damage: 2,
                heat: 0,
                min_range: 0,
                short: 1,
                medium: 2,
                long: 3,
            },
        }
    }

    /// Range bracket at the given target distance
    pub fn bracket(&self, distance: u32) -> RangeBracket {
        let stats = self.stats();
        if distance <= stats.short {
            RangeBracket::Short
        } else if distance <= stats.medium {
            RangeBracket::Medium
        } else if distance <= stats.long {
            RangeBracket::Long
        } else {
            RangeBracket::OutOfRange
        }
    }

    /// Combined range-derived to-hit modifier (bracket plus minimum-range
    /// surcharge), or None when the target is past long range
    pub fn range_modifier(&self, distance: u32) -> Option<i32> {
        let bracket = self.bracket(distance);
        if bracket == RangeBracket::OutOfRange {
            return None;
        }
        let stats = self.stats();
        let min_penalty = if distance < stats.min_range {
            (stats.min_range - distance + 1) as i32
        } else {
            0
        };
        Some(bracket.modifier() + min_penalty)
    }
}
