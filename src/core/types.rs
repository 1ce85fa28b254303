//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for units (roster entries and their game state)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(pub Uuid);

impl UnitId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UnitId {
    fn default() -> Self {
        Self::new()
    }
}

/// The two sides of a battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Player,
    Opponent,
}

impl Side {
    /// The opposing side
    pub fn opposite(&self) -> Self {
        match self {
            Side::Player => Side::Opponent,
            Side::Opponent => Side::Player,
        }
    }

    /// Both sides
    pub fn all() -> [Side; 2] {
        [Side::Player, Side::Opponent]
    }
}

/// Heat scale variant fixing the sustainable heat maximum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HeatScale {
    #[default]
    Single,
    Double,
    Triple,
}

impl HeatScale {
    /// Scale maximum: heat at or above this forces shutdown
    pub fn maximum(&self) -> i32 {
        match self {
            HeatScale::Single => 30,
            HeatScale::Double => 50,
            HeatScale::Triple => 70,
        }
    }
}

/// Turn counter (1-based)
pub type Turn = u32;
