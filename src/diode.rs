//! Illustrative diode I-V characteristic.
//!
//! The forward branch uses a cubic past the knee instead of the Shockley
//! exponential so the curve stays readable on a linear chart. The reverse
//! branch is a flat leakage current until breakdown, then a steep cubic
//! surge.

use serde::{Deserialize, Serialize};

/// Forward voltage below which no current is drawn (V).
pub const KNEE_VOLTAGE: f64 = 0.5;

/// Reverse breakdown voltage (V).
pub const BREAKDOWN_VOLTAGE: f64 = -6.0;

/// Reverse leakage current (mA).
pub const LEAKAGE_CURRENT: f64 = -0.01;

/// Forward cubic gain (mA / V^3).
pub const FORWARD_GAIN: f64 = 100.0;

/// Breakdown cubic gain (mA / V^3).
pub const BREAKDOWN_GAIN: f64 = 50.0;

/// Voltage range plotted by the I-V chart.
pub const SWEEP_START: f64 = -8.0;
pub const SWEEP_END: f64 = 1.5;
pub const SWEEP_STEP: f64 = 0.1;

/// Branch of the characteristic a voltage falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiodeRegion {
    Breakdown,
    Leakage,
    BelowKnee,
    Forward,
}

impl DiodeRegion {
    pub fn label(&self) -> &'static str {
        match self {
            DiodeRegion::Breakdown => "reverse breakdown",
            DiodeRegion::Leakage => "reverse leakage",
            DiodeRegion::BelowKnee => "forward, below knee",
            DiodeRegion::Forward => "forward conduction",
        }
    }
}

/// Diode current (mA) at the applied voltage (V).
///
/// Total over the reals; voltages outside the plotted range are
/// extrapolated with the same formulas.
pub fn current(voltage: f64) -> f64 {
    if voltage > 0.0 {
        if voltage < KNEE_VOLTAGE {
            return 0.0;
        }
        (voltage - KNEE_VOLTAGE).powi(3) * FORWARD_GAIN
    } else if voltage < BREAKDOWN_VOLTAGE {
        -(voltage.abs() - BREAKDOWN_VOLTAGE.abs()).powi(3) * BREAKDOWN_GAIN
    } else {
        LEAKAGE_CURRENT
    }
}

/// Which branch of [`current`] applies at `voltage`.
pub fn region(voltage: f64) -> DiodeRegion {
    if voltage > 0.0 {
        if voltage < KNEE_VOLTAGE {
            DiodeRegion::BelowKnee
        } else {
            DiodeRegion::Forward
        }
    } else if voltage < BREAKDOWN_VOLTAGE {
        DiodeRegion::Breakdown
    } else {
        DiodeRegion::Leakage
    }
}
