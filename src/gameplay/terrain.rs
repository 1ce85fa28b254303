//! Terrain types, stacked features, and their movement/cover effects
//!
//! A hex can stack several features; the one with the highest layer
//! priority is "primary" and alone decides movement cost and cover.

use serde::{Deserialize, Serialize};

/// Terrain type for a hex feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TerrainType {
    #[default]
    Clear,
    Road,       // Paved, overrides other costs
    Pavement,   // Paved, overrides other costs
    Rough,      // Broken ground
    Rubble,     // Collapsed structures
    Ice,        // Frozen surface
    Swamp,      // Bog, very slow
    Water,      // Level is depth
    LightWoods, // Partial cover
    HeavyWoods, // Full cover, blocks LOS
}

/// Cover provided by terrain against incoming fire
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum CoverLevel {
    #[default]
    None,
    Partial,
    Full,
}

impl TerrainType {
    /// Layer priority for primary-feature selection (highest wins).
    ///
    /// Equal priorities never occur between distinct types; two features of
    /// the SAME type tie-break by declaration order (lowest index wins).
    pub fn layer_priority(&self) -> u8 {
        match self {
            TerrainType::Clear => 0,
            TerrainType::Road => 1,
            TerrainType::Pavement => 2,
            TerrainType::Rough => 3,
            TerrainType::Rubble => 4,
            TerrainType::Ice => 5,
            TerrainType::Swamp => 6,
            TerrainType::Water => 7,
            TerrainType::LightWoods => 8,
            TerrainType::HeavyWoods => 9,
        }
    }

    /// Does this terrain force the paved entry cost of 1?
    pub fn is_paved(&self) -> bool {
        matches!(self, TerrainType::Road | TerrainType::Pavement)
    }

    /// Cover against fire traced through or into this terrain
    pub fn cover(&self, level: u8) -> CoverLevel {
        match self {
            TerrainType::HeavyWoods => CoverLevel::Full,
            TerrainType::LightWoods => CoverLevel::Partial,
            TerrainType::Water if level >= 1 => CoverLevel::Partial,
            _ => CoverLevel::None,
        }
    }

    /// Height this terrain adds on top of ground elevation for LOS
    /// purposes. Light woods sit level with standing eye height, so they
    /// only block when elevated above the sight line.
    pub fn los_height(&self) -> i32 {
        match self {
            TerrainType::LightWoods => 1,
            TerrainType::HeavyWoods => 2,
            _ => 0,
        }
    }
}

/// A single terrain feature on a hex. Water uses `level` as depth; woods
/// and rubble keep it for authoring fidelity but derive nothing from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TerrainFeature {
    pub kind: TerrainType,
    pub level: u8,
}

impl TerrainFeature {
    pub fn new(kind: TerrainType) -> Self {
        Self { kind, level: 0 }
    }

    pub fn with_level(kind: TerrainType, level: u8) -> Self {
        Self { kind, level }
    }

    /// MP added on top of the base entry cost of 1
    pub fn entry_cost_modifier(&self) -> u32 {
        match self.kind {
            TerrainType::Clear | TerrainType::Road | TerrainType::Pavement => 0,
            TerrainType::Rough | TerrainType::Rubble | TerrainType::Ice => 1,
            TerrainType::Swamp => 2,
            TerrainType::LightWoods => 1,
            TerrainType::HeavyWoods => 2,
            TerrainType::Water => match self.level {
                0 => 0,
                1 => 1,
                _ => 3,
            },
        }
    }
}

/// Select the primary feature from a stack: highest layer priority wins,
/// ties (same type twice) resolve to the first declared.
pub fn primary_feature(features: &[TerrainFeature]) -> Option<&TerrainFeature> {
    let mut primary: Option<&TerrainFeature> = None;
    for feature in features {
        match primary {
            Some(p) if feature.kind.layer_priority() <= p.kind.layer_priority() => {}
            _ => primary = Some(feature),
        }
    }
    primary
}
