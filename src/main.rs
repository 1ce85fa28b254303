//! MekStation - Headless Spectator Runner
//!
//! Runs an AI-vs-AI battle through the engine's public command surface on
//! a timer cadence and reports the result. No UI anywhere: this binary is
//! the proof that the engine is presentation-agnostic.

use std::time::Duration;

use clap::Parser;

use mekstation::core::config::GameConfig;
use mekstation::core::error::Result;
use mekstation::core::types::{HeatScale, Side};
use mekstation::gameplay::ai::GreedyAi;
use mekstation::gameplay::grid::{GridConfig, HexGrid};
use mekstation::gameplay::hex::{Facing, HexCoordinate};
use mekstation::gameplay::session::GameSession;
use mekstation::gameplay::spectator::SpectatorDriver;
use mekstation::gameplay::terrain::{TerrainFeature, TerrainType};
use mekstation::gameplay::units::{MechLocation, UnitDefinition};
use mekstation::gameplay::weapons::WeaponKind;

#[derive(Parser, Debug)]
#[command(name = "mekstation", about = "Headless AI-vs-AI spectator battle")]
struct Args {
    /// RNG seed; the same seed replays the same battle
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Map radius in hexes
    #[arg(long, default_value_t = 8)]
    radius: u32,

    /// Pause between turns in milliseconds
    #[arg(long, default_value_t = 250)]
    interval_ms: u64,

    /// Turn limit before the battle is called a draw
    #[arg(long, default_value_t = 30)]
    max_turns: u32,

    /// Dump the full session (state + event log) as JSON on exit
    #[arg(long, default_value_t = false)]
    dump_session: bool,
}

fn main() -> Result<()> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter("mekstation=info")
        .init();

    let args = Args::parse();
    tracing::info!(seed = args.seed, radius = args.radius, "MekStation spectator starting");

    let config = GameConfig {
        map_radius: args.radius,
        heat_scale: HeatScale::Single,
        seed: args.seed,
        max_turns: args.max_turns,
    };
    let session = GameSession::new(config, demo_map(args.radius), demo_lances(args.radius))?;

    let mut driver = SpectatorDriver::new(
        session,
        GreedyAi,
        GreedyAi,
        Duration::from_millis(args.interval_ms),
    );
    let result = driver.run()?;

    let session = driver.session();
    println!("\n=== BATTLE REPORT ===");
    println!("Turns fought: {}", session.state().turn);
    println!("Events logged: {}", session.events().len());
    match result {
        Some(result) => match result.winner {
            Some(side) => println!("Winner: {:?} ({:?})", side, result.reason),
            None => println!("Draw ({:?})", result.reason),
        },
        None => println!("Battle still undecided"),
    }
    for (definition, unit) in Side::all()
        .into_iter()
        .flat_map(|side| session.units_of(side))
    {
        println!(
            "  {:<18} {:?}  heat {:>2}  {}",
            definition.name,
            definition.side,
            unit.heat,
            if unit.destroyed { "DESTROYED" } else { "operational" }
        );
    }

    if args.dump_session {
        println!("{}", session.to_json()?);
    }
    Ok(())
}

/// A small symmetric valley: woods on the flanks, a rough belt and a
/// shallow river through the middle, one hill on each side
fn demo_map(radius: u32) -> HexGrid {
    let mut grid = HexGrid::new(GridConfig { radius });

    for r in -(radius as i32)..=radius as i32 {
        grid.add_feature(
            HexCoordinate::new(0, r),
            TerrainFeature::with_level(TerrainType::Water, 1),
        );
    }
    for coord in [
        HexCoordinate::new(-2, 0),
        HexCoordinate::new(-2, 1),
        HexCoordinate::new(2, -1),
        HexCoordinate::new(2, 0),
    ] {
        grid.add_feature(coord, TerrainFeature::new(TerrainType::Rough));
    }
    for coord in [
        HexCoordinate::new(-3, -2),
        HexCoordinate::new(3, 2),
        HexCoordinate::new(-4, 3),
        HexCoordinate::new(4, -3),
    ] {
        grid.add_feature(coord, TerrainFeature::new(TerrainType::LightWoods));
    }
    grid.add_feature(HexCoordinate::new(-1, -3), TerrainFeature::new(TerrainType::HeavyWoods));
    grid.add_feature(HexCoordinate::new(1, 3), TerrainFeature::new(TerrainType::HeavyWoods));
    grid.set_elevation(HexCoordinate::new(-4, 0), 2);
    grid.set_elevation(HexCoordinate::new(4, 0), 2);

    grid
}

/// Two mirrored two-mech lances, deployed near the map edges
fn demo_lances(radius: u32) -> Vec<(UnitDefinition, HexCoordinate, Facing)> {
    let edge = (radius as i32 - 2).max(1);
    let mut deployments = Vec::new();

    for (side, flip, facing) in [(Side::Player, 1, Facing::East), (Side::Opponent, -1, Facing::West)] {
        let prefix = match side {
            Side::Player => "Alpha",
            Side::Opponent => "Bravo",
        };
        let brawler = UnitDefinition::new(
            format!("{prefix} Brawler"),
            side,
            "SHD-2H",
            55,
            4,
            5,
            5,
            12,
        )
        .with_weapon(WeaponKind::Autocannon5, MechLocation::LeftTorso)
        .with_weapon(WeaponKind::MediumLaser, MechLocation::RightArm)
        .with_weapon(WeaponKind::Srm4, MechLocation::CenterTorso);
        let sniper = UnitDefinition::new(
            format!("{prefix} Sniper"),
            side,
            "MAD-3R",
            75,
            3,
            5,
            4,
            16,
        )
        .with_weapon(WeaponKind::Ppc, MechLocation::RightArm)
        .with_weapon(WeaponKind::Ppc, MechLocation::LeftArm)
        .with_weapon(WeaponKind::MediumLaser, MechLocation::CenterTorso);

        deployments.push((brawler, HexCoordinate::new(-edge * flip, flip), facing));
        deployments.push((sniper, HexCoordinate::new(-edge * flip, -flip), facing));
    }

    deployments
}
