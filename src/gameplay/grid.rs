//! Hex grid with terrain, elevation, and unit occupancy
//!
//! The grid is dense within its radius: every in-bounds coordinate has a
//! hex entry even when no terrain was authored for it.

use std::collections::{BTreeMap, HashMap};

use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::types::UnitId;
use crate::gameplay::hex::HexCoordinate;
use crate::gameplay::movement::MovementType;
use crate::gameplay::terrain::{primary_feature, CoverLevel, TerrainFeature, TerrainType};

/// Grid shape configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    pub radius: u32,
}

/// A single hex on the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hex {
    pub coord: HexCoordinate,
    pub occupant: Option<UnitId>,
    pub terrain: Vec<TerrainFeature>,
    pub elevation: i8,
}

impl Hex {
    pub fn new(coord: HexCoordinate) -> Self {
        Self {
            coord,
            occupant: None,
            terrain: Vec::new(),
            elevation: 0,
        }
    }

    /// The feature that decides movement cost and cover for this hex
    pub fn primary_feature(&self) -> Option<&TerrainFeature> {
        primary_feature(&self.terrain)
    }

    /// MP cost to enter this hex.
    ///
    /// Base 1 plus the primary feature's modifier; paved hexes always cost
    /// exactly 1. Walking and running currently pay identical terrain
    /// costs; the movement type parameter keeps the distinction available
    /// at the API boundary.
    pub fn entry_cost(&self, _movement: MovementType) -> u32 {
        if self.terrain.iter().any(|f| f.kind.is_paved()) {
            return 1;
        }
        1 + self.primary_feature().map_or(0, |f| f.entry_cost_modifier())
    }

    /// Cover level this hex grants, from the primary feature only
    pub fn cover_level(&self) -> CoverLevel {
        self.primary_feature()
            .map_or(CoverLevel::None, |f| f.kind.cover(f.level))
    }

    /// Height terrain adds above ground elevation for sight-line checks
    pub fn terrain_height(&self) -> i32 {
        self.terrain.iter().map(|f| f.kind.los_height()).max().unwrap_or(0)
    }

    /// Water depth (0 when dry)
    pub fn water_depth(&self) -> u8 {
        self.terrain
            .iter()
            .filter(|f| f.kind == TerrainType::Water)
            .map(|f| f.level)
            .max()
            .unwrap_or(0)
    }
}

/// The full battle map
#[derive(Debug, Clone, PartialEq)]
pub struct HexGrid {
    pub config: GridConfig,
    hexes: HashMap<HexCoordinate, Hex>,
}

impl HexGrid {
    /// Create a grid with every hex within `radius` of the origin present
    /// as Clear ground at elevation 0
    pub fn new(config: GridConfig) -> Self {
        let origin = HexCoordinate::default();
        let hexes = origin
            .hexes_in_radius(config.radius)
            .into_iter()
            .map(|coord| (coord, Hex::new(coord)))
            .collect();
        Self { config, hexes }
    }

    /// Get a hex at the given coordinate
    pub fn get(&self, coord: HexCoordinate) -> Option<&Hex> {
        self.hexes.get(&coord)
    }

    /// Get a mutable hex at the given coordinate
    pub fn get_mut(&mut self, coord: HexCoordinate) -> Option<&mut Hex> {
        self.hexes.get_mut(&coord)
    }

    /// Is the coordinate within the map radius?
    pub fn in_bounds(&self, coord: HexCoordinate) -> bool {
        HexCoordinate::default().distance(&coord) <= self.config.radius
    }

    /// Number of hexes on the map
    pub fn len(&self) -> usize {
        self.hexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hexes.is_empty()
    }

    /// Stack a terrain feature on a hex
    pub fn add_feature(&mut self, coord: HexCoordinate, feature: TerrainFeature) {
        if let Some(hex) = self.get_mut(coord) {
            hex.terrain.push(feature);
        }
    }

    /// Set ground elevation at a coordinate
    pub fn set_elevation(&mut self, coord: HexCoordinate, elevation: i8) {
        if let Some(hex) = self.get_mut(coord) {
            hex.elevation = elevation;
        }
    }

    /// The unit standing in a hex, if any
    pub fn occupant(&self, coord: HexCoordinate) -> Option<UnitId> {
        self.get(coord).and_then(|h| h.occupant)
    }

    /// Place a unit in a hex
    pub fn set_occupant(&mut self, coord: HexCoordinate, unit: UnitId) {
        if let Some(hex) = self.get_mut(coord) {
            hex.occupant = Some(unit);
        }
    }

    /// Remove any occupant from a hex
    pub fn clear_occupant(&mut self, coord: HexCoordinate) {
        if let Some(hex) = self.get_mut(coord) {
            hex.occupant = None;
        }
    }

    /// Ground elevation, 0 outside the map
    pub fn elevation(&self, coord: HexCoordinate) -> i32 {
        self.get(coord).map_or(0, |h| h.elevation as i32)
    }
}

// JSON keys must be strings, so the hex map serializes keyed by the stable
// `to_key` encoding (BTreeMap for a deterministic field order on disk).
impl Serialize for HexGrid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let keyed: BTreeMap<String, &Hex> =
            self.hexes.iter().map(|(c, h)| (c.to_key(), h)).collect();
        let mut state = serializer.serialize_struct("HexGrid", 2)?;
        state.serialize_field("config", &self.config)?;
        state.serialize_field("hexes", &keyed)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for HexGrid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            config: GridConfig,
            hexes: BTreeMap<String, Hex>,
        }

        let raw = Raw::deserialize(deserializer)?;
        let mut hexes = HashMap::with_capacity(raw.hexes.len());
        for (key, hex) in raw.hexes {
            let coord = HexCoordinate::from_key(&key)
                .ok_or_else(|| serde::de::Error::custom(format!("bad hex key: {key}")))?;
            hexes.insert(coord, hex);
        }
        Ok(Self {
            config: raw.config,
            hexes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(radius: u32) -> HexGrid {
        HexGrid::new(GridConfig { radius })
    }

    #[test]
    fn test_grid_dense_within_radius() {
        let grid = grid(3);
        // 3r^2 + 3r + 1
        assert_eq!(grid.len(), 37);
        assert!(grid.get(HexCoordinate::new(3, 0)).is_some());
        assert!(grid.get(HexCoordinate::new(4, 0)).is_none());
    }

    #[test]
    fn test_unauthored_hex_is_clear() {
        let grid = grid(2);
        let hex = grid.get(HexCoordinate::new(1, 1)).unwrap();
        assert!(hex.terrain.is_empty());
        assert_eq!(hex.elevation, 0);
        assert_eq!(hex.entry_cost(MovementType::Walk), 1);
    }

    #[test]
    fn test_in_bounds() {
        let grid = grid(4);
        assert!(grid.in_bounds(HexCoordinate::new(2, 2)));
        assert!(!grid.in_bounds(HexCoordinate::new(5, 0)));
    }

    #[test]
    fn test_entry_cost_uses_primary_feature() {
        let mut grid = grid(2);
        let coord = HexCoordinate::new(1, 0);
        grid.add_feature(coord, TerrainFeature::new(TerrainType::Rough));
        grid.add_feature(coord, TerrainFeature::new(TerrainType::HeavyWoods));
        // HeavyWoods (priority 9) outranks Rough: 1 + 2
        assert_eq!(grid.get(coord).unwrap().entry_cost(MovementType::Walk), 3);
    }

    #[test]
    fn test_paved_overrides_other_costs() {
        let mut grid = grid(2);
        let coord = HexCoordinate::new(0, 1);
        grid.add_feature(coord, TerrainFeature::new(TerrainType::Rough));
        grid.add_feature(coord, TerrainFeature::new(TerrainType::Road));
        assert_eq!(grid.get(coord).unwrap().entry_cost(MovementType::Walk), 1);
    }

    #[test]
    fn test_occupancy() {
        let mut grid = grid(2);
        let coord = HexCoordinate::new(1, -1);
        let unit = UnitId::new();

        assert_eq!(grid.occupant(coord), None);
        grid.set_occupant(coord, unit);
        assert_eq!(grid.occupant(coord), Some(unit));
        grid.clear_occupant(coord);
        assert_eq!(grid.occupant(coord), None);
    }

    #[test]
    fn test_json_round_trip_keyed_by_coord() {
        let mut grid = grid(1);
        grid.add_feature(
            HexCoordinate::new(1, 0),
            TerrainFeature::with_level(TerrainType::Water, 2),
        );
        grid.set_elevation(HexCoordinate::new(0, -1), 2);

        let json = serde_json::to_string(&grid).unwrap();
        assert!(json.contains("\"1,0\""));

        let back: HexGrid = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), grid.len());
        assert_eq!(back.get(HexCoordinate::new(1, 0)).unwrap().water_depth(), 2);
        assert_eq!(back.elevation(HexCoordinate::new(0, -1)), 2);
    }
}
