//! Combat constants - all tunable values in one place

// To-hit modifiers
pub const WALK_ATTACK_MODIFIER: i32 = 1;
pub const RUN_ATTACK_MODIFIER: i32 = 2;
pub const MEDIUM_RANGE_MODIFIER: i32 = 2;
pub const LONG_RANGE_MODIFIER: i32 = 4;
pub const PARTIAL_COVER_MODIFIER: i32 = 1;
pub const TARGET_FULL_COVER_MODIFIER: i32 = 2;
pub const KICK_ATTACK_MODIFIER: i32 = -2;

// Dice
pub const AUTO_MISS_ROLL: u8 = 2;
pub const AUTO_HIT_ROLL: u8 = 12;

// Heat thresholds as percent of the scale maximum
pub const HEAT_PENALTY_ONE_PERCENT: u32 = 25;
pub const HEAT_PENALTY_TWO_PERCENT: u32 = 50;
pub const HEAT_NEAR_MAX_PERCENT: u32 = 75;

// Heat generated by movement
pub const WALK_HEAT: i32 = 1;
pub const RUN_HEAT: i32 = 2;

// Criticals and pilots
pub const CRITICAL_CHECK_TARGET: u8 = 8;
pub const MAX_PILOT_WOUNDS: u8 = 6;
/// Consciousness numbers indexed by wounds 1..=5; 6 wounds kill outright
pub const CONSCIOUSNESS_TARGETS: [u8; 5] = [3, 5, 7, 10, 11];

// Line of sight
pub const OBSERVER_HEIGHT: i32 = 1;
