//! Property-style tests for the geometric and threshold invariants

use std::collections::HashMap;

use proptest::prelude::*;

use mekstation::core::types::HeatScale;
use mekstation::gameplay::grid::{GridConfig, HexGrid};
use mekstation::gameplay::heat::effects_for;
use mekstation::gameplay::hex::HexCoordinate;
use mekstation::gameplay::los::line_of_sight;
use mekstation::gameplay::movement::{movement_range, MovementType};
use mekstation::gameplay::terrain::{TerrainFeature, TerrainType};

fn coord() -> impl Strategy<Value = HexCoordinate> {
    (-20i32..=20, -20i32..=20).prop_map(|(q, r)| HexCoordinate::new(q, r))
}

fn in_map_coord(radius: i32) -> impl Strategy<Value = HexCoordinate> {
    (-radius..=radius, -radius..=radius)
        .prop_map(|(q, r)| HexCoordinate::new(q, r))
        .prop_filter("within radius", move |c| {
            HexCoordinate::new(0, 0).distance(c) <= radius as u32
        })
}

/// A small grid with arbitrary light/heavy woods and elevation
fn terrain_grid(radius: u32) -> impl Strategy<Value = HexGrid> {
    let r = radius as i32;
    proptest::collection::vec((in_map_coord(r), 0u8..=3, 0i8..=3), 0..12).prop_map(
        move |features| {
            let mut grid = HexGrid::new(GridConfig { radius });
            for (coord, kind, elevation) in features {
                match kind {
                    0 => grid.add_feature(coord, TerrainFeature::new(TerrainType::LightWoods)),
                    1 => grid.add_feature(coord, TerrainFeature::new(TerrainType::HeavyWoods)),
                    2 => grid.add_feature(coord, TerrainFeature::new(TerrainType::Rough)),
                    _ => grid.set_elevation(coord, elevation),
                }
            }
            grid
        },
    )
}

proptest! {
    #[test]
    fn distance_is_symmetric(a in coord(), b in coord()) {
        prop_assert_eq!(a.distance(&b), b.distance(&a));
    }

    #[test]
    fn distance_to_self_is_zero(a in coord()) {
        prop_assert_eq!(a.distance(&a), 0);
    }

    #[test]
    fn distance_triangle_inequality(a in coord(), b in coord(), c in coord()) {
        prop_assert!(a.distance(&c) <= a.distance(&b) + b.distance(&c));
    }

    #[test]
    fn neighbors_are_at_distance_one(a in coord()) {
        for n in a.neighbors() {
            prop_assert_eq!(a.distance(&n), 1);
        }
    }

    #[test]
    fn hex_key_round_trips(a in coord()) {
        prop_assert_eq!(HexCoordinate::from_key(&a.to_key()), Some(a));
    }

    #[test]
    fn movement_cost_never_undercuts_distance(
        grid in terrain_grid(6),
        budget in 1u32..=8,
    ) {
        // Every hex costs at least 1 MP to enter, so no reported cost can
        // be below the hex distance from the start
        let start = HexCoordinate::new(0, 0);
        for hex in movement_range(&grid, start, budget, MovementType::Walk) {
            prop_assert!(hex.mp_cost >= start.distance(&hex.coord));
            if hex.reachable {
                prop_assert!(hex.mp_cost <= budget);
            }
        }
    }

    #[test]
    fn movement_range_is_monotonic_in_budget(
        grid in terrain_grid(6),
        budget in 1u32..=6,
    ) {
        let start = HexCoordinate::new(0, 0);
        let smaller: HashMap<_, _> = movement_range(&grid, start, budget, MovementType::Walk)
            .into_iter()
            .map(|h| (h.coord, h))
            .collect();
        let larger: HashMap<_, _> = movement_range(&grid, start, budget + 2, MovementType::Walk)
            .into_iter()
            .map(|h| (h.coord, h))
            .collect();

        for (coord, hex) in &smaller {
            if hex.reachable {
                let grown = larger.get(coord);
                prop_assert!(grown.is_some_and(|h| h.reachable));
                // And the cheapest cost never worsens with more budget
                prop_assert_eq!(grown.unwrap().mp_cost, hex.mp_cost);
            }
        }
    }

    #[test]
    fn los_is_symmetric_on_unit_free_grids(
        grid in terrain_grid(6),
        a in in_map_coord(6),
        b in in_map_coord(6),
    ) {
        let forward = line_of_sight(&grid, a, b);
        let reverse = line_of_sight(&grid, b, a);
        prop_assert_eq!(forward.has_los, reverse.has_los);
        prop_assert_eq!(forward.cover_penalty, reverse.cover_penalty);
    }

    #[test]
    fn heat_effects_are_monotonic(
        heat_a in 0i32..=100,
        heat_b in 0i32..=100,
    ) {
        for scale in [HeatScale::Single, HeatScale::Double, HeatScale::Triple] {
            let (low, high) = if heat_a <= heat_b { (heat_a, heat_b) } else { (heat_b, heat_a) };
            let cooler = effects_for(low, scale);
            let hotter = effects_for(high, scale);
            prop_assert!(hotter.to_hit_penalty >= cooler.to_hit_penalty);
            prop_assert!(hotter.shutdown >= cooler.shutdown);
            prop_assert!(hotter.ammo_explosion_risk >= cooler.ammo_explosion_risk);
        }
    }

    #[test]
    fn dissipation_never_goes_negative(heat in 0i32..=200, sinks in 0u32..=60) {
        prop_assert!(mekstation::gameplay::heat::dissipate(heat, sinks) >= 0);
    }
}
