//! Movement planning: cost-limited reachability over the hex grid
//!
//! Dijkstra flood fill with integer MP costs. Occupied hexes block passage
//! but still appear in the result so a UI can explain why they are
//! unreachable.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use serde::{Deserialize, Serialize};

use crate::gameplay::grid::HexGrid;
use crate::gameplay::hex::HexCoordinate;

/// How a unit spends its movement this turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementType {
    Walk,
    Run,
}

/// One hex of a computed movement range; ephemeral, recomputed per
/// selection, never persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovementRangeHex {
    pub coord: HexCoordinate,
    pub mp_cost: u32,
    pub reachable: bool,
    pub movement_type: MovementType,
}

/// Node in the Dijkstra frontier
#[derive(Debug, Clone, Copy)]
struct FrontierNode {
    coord: HexCoordinate,
    cost: u32,
}

impl PartialEq for FrontierNode {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost && self.coord == other.coord
    }
}

impl Eq for FrontierNode {}

impl Ord for FrontierNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse cost order for a min-heap; coord ordering breaks ties so
        // expansion order is a pure function of the inputs
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.coord.cmp(&self.coord))
    }
}

impl PartialOrd for FrontierNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Best known entry for a hex during the flood fill
#[derive(Debug, Clone, Copy)]
pub(crate) struct ReachEntry {
    pub cost: u32,
    pub reachable: bool,
    pub parent: Option<HexCoordinate>,
}

/// Full reachability map from `start` with `budget` MP.
///
/// Entries with `reachable: false` are either occupied or only partially
/// affordable; neither is ever expanded through, so no recorded cost
/// exceeds the budget by more than one hex entry.
pub(crate) fn reachability(
    grid: &HexGrid,
    start: HexCoordinate,
    budget: u32,
    movement: MovementType,
) -> HashMap<HexCoordinate, ReachEntry> {
    let mut best: HashMap<HexCoordinate, ReachEntry> = HashMap::new();
    let mut frontier = BinaryHeap::new();

    best.insert(
        start,
        ReachEntry {
            cost: 0,
            reachable: true,
            parent: None,
        },
    );
    frontier.push(FrontierNode {
        coord: start,
        cost: 0,
    });

    while let Some(current) = frontier.pop() {
        // Stale entry: a cheaper route was already expanded
        if best.get(&current.coord).map_or(true, |e| e.cost < current.cost) {
            continue;
        }

        for neighbor in current.coord.neighbors() {
            let Some(hex) = grid.get(neighbor) else {
                continue;
            };

            let entry_cost = hex.entry_cost(movement);
            let total = current.cost + entry_cost;
            let affordable = total <= budget;
            let passable = affordable && hex.occupant.is_none();

            let improves = best.get(&neighbor).map_or(true, |e| total < e.cost);
            if !improves {
                continue;
            }

            best.insert(
                neighbor,
                ReachEntry {
                    cost: total,
                    reachable: passable,
                    parent: Some(current.coord),
                },
            );

            // Occupied and over-budget hexes are recorded but never expanded
            if passable {
                frontier.push(FrontierNode {
                    coord: neighbor,
                    cost: total,
                });
            }
        }
    }

    best
}

/// Compute the movement range for a unit standing at `start` with `budget`
/// MP of the given movement type. The start hex itself is not included.
pub fn movement_range(
    grid: &HexGrid,
    start: HexCoordinate,
    budget: u32,
    movement: MovementType,
) -> Vec<MovementRangeHex> {
    reachability(grid, start, budget, movement)
        .into_iter()
        .filter(|(coord, _)| *coord != start)
        .map(|(coord, entry)| MovementRangeHex {
            coord,
            mp_cost: entry.cost,
            reachable: entry.reachable,
            movement_type: movement,
        })
        .collect()
}

/// Reconstruct the cheapest path from the flood-fill origin to `dest`
/// (inclusive of both endpoints). None if `dest` was never reached.
pub(crate) fn path_to(
    reach: &HashMap<HexCoordinate, ReachEntry>,
    dest: HexCoordinate,
) -> Option<Vec<HexCoordinate>> {
    reach.get(&dest)?;
    let mut path = vec![dest];
    let mut current = dest;
    while let Some(entry) = reach.get(&current) {
        match entry.parent {
            Some(parent) => {
                path.push(parent);
                current = parent;
            }
            None => break,
        }
    }
    path.reverse();
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::UnitId;
    use crate::gameplay::grid::GridConfig;
    use crate::gameplay::terrain::{TerrainFeature, TerrainType};

    fn open_grid(radius: u32) -> HexGrid {
        HexGrid::new(GridConfig { radius })
    }

    fn range_map(hexes: &[MovementRangeHex]) -> HashMap<HexCoordinate, MovementRangeHex> {
        hexes.iter().map(|h| (h.coord, *h)).collect()
    }

    #[test]
    fn test_open_ground_costs_one_per_hex() {
        let grid = open_grid(5);
        let start = HexCoordinate::new(0, 0);
        let range = range_map(&movement_range(&grid, start, 3, MovementType::Walk));

        let adjacent = range.get(&HexCoordinate::new(1, 0)).unwrap();
        assert_eq!(adjacent.mp_cost, 1);
        assert!(adjacent.reachable);

        let three_out = range.get(&HexCoordinate::new(3, 0)).unwrap();
        assert_eq!(three_out.mp_cost, 3);
        assert!(three_out.reachable);
    }

    #[test]
    fn test_rough_hex_costs_two() {
        // Spec scenario: 5 MP, one Rough hex adjacent to start, clear beyond
        let mut grid = open_grid(6);
        let start = HexCoordinate::new(0, 0);
        let rough = HexCoordinate::new(1, 0);
        grid.add_feature(rough, TerrainFeature::new(TerrainType::Rough));

        let range = range_map(&movement_range(&grid, start, 5, MovementType::Walk));

        let rough_entry = range.get(&rough).unwrap();
        assert_eq!(rough_entry.mp_cost, 2);
        assert!(rough_entry.reachable);

        // Three clear hexes beyond the rough hex: costs 3, 4, 5
        let beyond = range.get(&HexCoordinate::new(4, 0)).unwrap();
        assert_eq!(beyond.mp_cost, 5);
        assert!(beyond.reachable);

        // One further is past the budget
        let too_far = range.get(&HexCoordinate::new(5, 0)).unwrap();
        assert!(!too_far.reachable);
    }

    #[test]
    fn test_partial_affordability_not_reachable() {
        let mut grid = open_grid(4);
        let start = HexCoordinate::new(0, 0);
        let swamp = HexCoordinate::new(1, 0);
        grid.add_feature(swamp, TerrainFeature::new(TerrainType::Swamp));

        // 2 MP budget, swamp costs 3: listed, true cost, not reachable
        let range = range_map(&movement_range(&grid, start, 2, MovementType::Walk));
        let entry = range.get(&swamp).unwrap();
        assert_eq!(entry.mp_cost, 3);
        assert!(!entry.reachable);
    }

    #[test]
    fn test_occupied_hex_blocks_passage() {
        let mut grid = open_grid(5);
        let start = HexCoordinate::new(0, 0);
        // Wall of occupants across q=1 near the line of travel
        for r in -2..=2 {
            grid.set_occupant(HexCoordinate::new(1, r), UnitId::new());
        }

        let range = range_map(&movement_range(&grid, start, 2, MovementType::Walk));

        let blocked = range.get(&HexCoordinate::new(1, 0)).unwrap();
        assert!(!blocked.reachable);

        // (2, 0) is only reachable by going around the wall, which costs
        // more than 2 MP from the start
        match range.get(&HexCoordinate::new(2, 0)) {
            Some(entry) => assert!(!entry.reachable),
            None => {}
        }
    }

    #[test]
    fn test_budget_monotonicity() {
        let mut grid = open_grid(5);
        grid.add_feature(HexCoordinate::new(1, 0), TerrainFeature::new(TerrainType::Rough));
        grid.add_feature(HexCoordinate::new(0, 1), TerrainFeature::new(TerrainType::HeavyWoods));
        let start = HexCoordinate::new(0, 0);

        let small: Vec<_> = movement_range(&grid, start, 3, MovementType::Walk)
            .into_iter()
            .filter(|h| h.reachable)
            .map(|h| h.coord)
            .collect();
        let large = range_map(&movement_range(&grid, start, 6, MovementType::Walk));

        for coord in small {
            assert!(large.get(&coord).is_some_and(|h| h.reachable));
        }
    }

    #[test]
    fn test_path_reconstruction() {
        let grid = open_grid(5);
        let start = HexCoordinate::new(0, 0);
        let dest = HexCoordinate::new(3, 0);

        let reach = reachability(&grid, start, 5, MovementType::Walk);
        let path = path_to(&reach, dest).unwrap();

        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&dest));
        assert_eq!(path.len(), 4);
        for pair in path.windows(2) {
            assert_eq!(pair[0].distance(&pair[1]), 1);
        }
    }

    #[test]
    fn test_deterministic_output() {
        let mut grid = open_grid(4);
        grid.add_feature(HexCoordinate::new(2, -1), TerrainFeature::new(TerrainType::Rubble));
        let start = HexCoordinate::new(0, 0);

        let mut a = movement_range(&grid, start, 4, MovementType::Run);
        let mut b = movement_range(&grid, start, 4, MovementType::Run);
        a.sort_by_key(|h| h.coord);
        b.sort_by_key(|h| h.coord);
        assert_eq!(a, b);
    }

    #[test]
    fn test_cost_is_cheapest_path() {
        // A swamp straight ahead must be bypassed if going around is cheaper
        let mut grid = open_grid(5);
        grid.add_feature(HexCoordinate::new(1, 0), TerrainFeature::new(TerrainType::Swamp));
        let start = HexCoordinate::new(0, 0);

        let range = range_map(&movement_range(&grid, start, 6, MovementType::Walk));
        // Around: (1,-1) then (2,-1) then (2,0) = 3 MP beats through-swamp 4
        assert_eq!(range.get(&HexCoordinate::new(2, 0)).unwrap().mp_cost, 3);
    }
}
