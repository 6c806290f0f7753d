//! P-N junction depletion region model.

use serde::{Deserialize, Serialize};

/// Silicon barrier potential (V).
pub const BARRIER_VOLTAGE: f64 = 0.7;

/// Depletion width with no applied bias (display units).
pub const BASE_DEPLETION: f64 = 50.0;
pub const MIN_DEPLETION: f64 = 10.0;
pub const MAX_DEPLETION: f64 = 150.0;

/// Largest forward shrink and reverse growth of the depletion region.
const MAX_SHRINKAGE: f64 = 40.0;
const MAX_EXPANSION: f64 = 100.0;

/// Width change per volt of forward and reverse bias.
const FORWARD_SHRINK_RATE: f64 = 40.0;
const REVERSE_EXPAND_RATE: f64 = 20.0;

pub const LEAKAGE_CURRENT: f64 = 0.01;

/// Display range of the bias slider.
pub const SWEEP_START: f64 = -5.0;
pub const SWEEP_END: f64 = 2.0;
pub const SWEEP_STEP: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bias {
    Forward,
    Reverse,
}

/// Junction state derived from a single applied voltage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepletionState {
    /// Depletion width, always within `[MIN_DEPLETION, MAX_DEPLETION]`.
    pub width: f64,
    pub current: f64,
    pub is_conducting: bool,
}

/// Evaluate the junction at `voltage`.
///
/// Forward bias narrows the depletion region and conducts once the barrier
/// is exceeded; reverse bias widens it and passes only leakage.
pub fn evaluate(voltage: f64) -> DepletionState {
    if voltage > 0.0 {
        let shrinkage = MAX_SHRINKAGE.min(voltage * FORWARD_SHRINK_RATE);
        let width = MIN_DEPLETION.max(BASE_DEPLETION - shrinkage);

        if voltage > BARRIER_VOLTAGE {
            DepletionState {
                width,
                current: (voltage - BARRIER_VOLTAGE).exp() * 2.0,
                is_conducting: true,
            }
        } else {
            DepletionState {
                width,
                current: 0.0,
                is_conducting: false,
            }
        }
    } else {
        let expansion = MAX_EXPANSION.min(voltage.abs() * REVERSE_EXPAND_RATE);
        DepletionState {
            width: MAX_DEPLETION.min(BASE_DEPLETION + expansion),
            current: LEAKAGE_CURRENT,
            is_conducting: false,
        }
    }
}

pub fn bias(voltage: f64) -> Bias {
    if voltage > 0.0 {
        Bias::Forward
    } else {
        Bias::Reverse
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_bias() {
        let state = evaluate(0.0);
        assert_eq!(state.width, 50.0);
        assert_eq!(state.current, LEAKAGE_CURRENT);
        assert!(!state.is_conducting);
        assert_eq!(bias(0.0), Bias::Reverse);
    }

    #[test]
    fn test_width_non_increasing() {
        let mut prev = evaluate(-5.0).width;
        for i in 1..=70 {
            let v = -5.0 + i as f64 * 0.1;
            let width = evaluate(v).width;
            assert!(width <= prev, "width grew at {}: {} > {}", v, width, prev);
            prev = width;
        }
    }

    #[test]
    fn test_width_clamped() {
        for v in [-1000.0, -20.0, -5.0, -0.3, 0.0, 0.4, 1.0, 2.0, 50.0] {
            let width = evaluate(v).width;
            assert!((MIN_DEPLETION..=MAX_DEPLETION).contains(&width), "v = {}", v);
        }
        assert_eq!(evaluate(-5.0).width, 150.0);
        assert_eq!(evaluate(-100.0).width, 150.0);
        assert_eq!(evaluate(1.0).width, 10.0);
        assert_eq!(evaluate(2.0).width, 10.0);
    }

    #[test]
    fn test_conduction_past_barrier() {
        let below = evaluate(0.7);
        assert!(!below.is_conducting);
        assert_eq!(below.current, 0.0);

        let above = evaluate(1.7);
        assert!(above.is_conducting);
        assert!((above.current - 1.0f64.exp() * 2.0).abs() < 1e-9);
        assert_eq!(bias(1.7), Bias::Forward);
    }

    #[test]
    fn test_reverse_widening() {
        let state = evaluate(-2.0);
        assert_eq!(state.width, 90.0);
        assert_eq!(state.current, LEAKAGE_CURRENT);
        assert!(!state.is_conducting);
    }
}
