//! Heat accumulation, dissipation, and threshold effects
//!
//! Heat has no upper bound; running past the scale maximum is a valid,
//! displayed state. Effects are pure functions of (heat, scale).

use serde::{Deserialize, Serialize};

use crate::core::types::HeatScale;
use crate::gameplay::constants::{
    HEAT_NEAR_MAX_PERCENT, HEAT_PENALTY_ONE_PERCENT, HEAT_PENALTY_TWO_PERCENT,
};

/// Effects active at a given heat level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HeatEffects {
    /// To-hit penalty applied to the unit's own attacks
    pub to_hit_penalty: i32,
    /// Ammunition may cook off
    pub ammo_explosion_risk: bool,
    /// Reactor shutdown is forced
    pub shutdown: bool,
}

/// Threshold effect table, keyed by percentage of the scale maximum:
/// 25% -> +1 to-hit, 50% -> +2, 75% -> +3 ("near max"), 100% -> ammo risk
/// and forced shutdown on top.
pub fn effects_for(heat: i32, scale: HeatScale) -> HeatEffects {
    let max = scale.maximum();
    if heat <= 0 {
        return HeatEffects::default();
    }

    let percent = (heat as i64 * 100 / max as i64) as u32;
    let to_hit_penalty = if percent >= HEAT_NEAR_MAX_PERCENT {
        3
    } else if percent >= HEAT_PENALTY_TWO_PERCENT {
        2
    } else if percent >= HEAT_PENALTY_ONE_PERCENT {
        1
    } else {
        0
    };

    HeatEffects {
        to_hit_penalty,
        ammo_explosion_risk: heat >= max,
        shutdown: heat >= max,
    }
}

/// Apply one phase of heat-sink dissipation; heat never drops below 0
pub fn dissipate(heat: i32, heat_sinks: u32) -> i32 {
    (heat - heat_sinks as i32).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cool_unit_has_no_effects() {
        let effects = effects_for(0, HeatScale::Single);
        assert_eq!(effects, HeatEffects::default());
    }

    #[test]
    fn test_penalty_tiers_single_scale() {
        // Single scale max is 30: tiers at 8 (25%), 15 (50%), 23 (75%)
        assert_eq!(effects_for(7, HeatScale::Single).to_hit_penalty, 0);
        assert_eq!(effects_for(8, HeatScale::Single).to_hit_penalty, 1);
        assert_eq!(effects_for(15, HeatScale::Single).to_hit_penalty, 2);
        assert_eq!(effects_for(22, HeatScale::Single).to_hit_penalty, 2);
        assert_eq!(effects_for(23, HeatScale::Single).to_hit_penalty, 3);
    }

    #[test]
    fn test_near_max_without_shutdown() {
        // Spec scenario: heat 23 on the Single scale is the near-max tier
        // but not yet shutdown
        let effects = effects_for(23, HeatScale::Single);
        assert_eq!(effects.to_hit_penalty, 3);
        assert!(!effects.shutdown);
        assert!(!effects.ammo_explosion_risk);
    }

    #[test]
    fn test_at_max_shuts_down_with_ammo_risk() {
        let effects = effects_for(30, HeatScale::Single);
        assert_eq!(effects.to_hit_penalty, 3);
        assert!(effects.shutdown);
        assert!(effects.ammo_explosion_risk);
    }

    #[test]
    fn test_overflow_is_valid_state() {
        let effects = effects_for(45, HeatScale::Single);
        assert!(effects.shutdown);
        assert!(effects.ammo_explosion_risk);
    }

    #[test]
    fn test_scale_variants_shift_thresholds() {
        // Heat 30 shuts down a Single scale but is only 60% of Double
        assert!(effects_for(30, HeatScale::Single).shutdown);
        assert!(!effects_for(30, HeatScale::Double).shutdown);
        assert_eq!(effects_for(30, HeatScale::Double).to_hit_penalty, 2);
        assert!(!effects_for(30, HeatScale::Triple).shutdown);
    }

    #[test]
    fn test_effects_monotonic_in_heat() {
        for scale in [HeatScale::Single, HeatScale::Double, HeatScale::Triple] {
            let mut previous = effects_for(0, scale);
            for heat in 1..=80 {
                let current = effects_for(heat, scale);
                assert!(current.to_hit_penalty >= previous.to_hit_penalty);
                assert!(current.shutdown >= previous.shutdown);
                assert!(current.ammo_explosion_risk >= previous.ammo_explosion_risk);
                previous = current;
            }
        }
    }

    #[test]
    fn test_dissipation_floors_at_zero() {
        assert_eq!(dissipate(12, 10), 2);
        assert_eq!(dissipate(5, 10), 0);
        assert_eq!(dissipate(0, 10), 0);
    }
}
