//! Zener shunt regulator: a series resistor feeding a load with a Zener
//! diode in parallel.
//!
//! The circuit is piecewise linear, so a single pass decides whether the
//! Zener is in breakdown and computes every branch current from that.

use serde::{Deserialize, Serialize};

/// Zener breakdown voltage (V).
pub const VZ: f64 = 5.0;
/// Series resistance (ohms).
pub const RS: f64 = 100.0;
/// Load resistance (ohms).
pub const RL: f64 = 500.0;

/// Input slider range (V).
pub const SWEEP_START: f64 = 0.0;
pub const SWEEP_END: f64 = 15.0;
pub const SWEEP_STEP: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegulatorStatus {
    Regulating,
    Unregulated,
}

impl RegulatorStatus {
    pub fn label(&self) -> &'static str {
        match self {
            RegulatorStatus::Regulating => "REGULATING",
            RegulatorStatus::Unregulated => "UNREGULATED",
        }
    }
}

/// Regulator output for one input voltage. Voltages in volts, currents in
/// amps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegulatorState {
    pub v_divider: f64,
    pub vout: f64,
    pub is_zener_active: bool,
    pub i_total: f64,
    pub i_load: f64,
    pub i_zener: f64,
}

impl RegulatorState {
    pub fn status(&self) -> RegulatorStatus {
        if self.is_zener_active {
            RegulatorStatus::Regulating
        } else {
            RegulatorStatus::Unregulated
        }
    }
}

pub fn to_milliamps(amps: f64) -> f64 {
    amps * 1000.0
}

/// Circuit constants of the regulator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZenerRegulator {
    pub vz: f64,
    pub rs: f64,
    pub rl: f64,
}

impl Default for ZenerRegulator {
    fn default() -> Self {
        ZenerRegulator {
            vz: VZ,
            rs: RS,
            rl: RL,
        }
    }
}

impl ZenerRegulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate the regulator at input voltage `vin`.
    ///
    /// The Zener only conducts when the unloaded divider voltage strictly
    /// exceeds `vz`. When it does not, `i_zener` is exactly zero.
    pub fn evaluate(&self, vin: f64) -> RegulatorState {
        let v_divider = vin * self.rl / (self.rs + self.rl);
        let is_zener_active = v_divider > self.vz;
        let vout = if is_zener_active { self.vz } else { v_divider };

        let i_total = (vin - vout) / self.rs;
        let i_load = vout / self.rl;
        let i_zener = if is_zener_active { i_total - i_load } else { 0.0 };

        RegulatorState {
            v_divider,
            vout,
            is_zener_active,
            i_total,
            i_load,
            i_zener,
        }
    }
}

/// Evaluate the fixed 5 V / 100 ohm / 500 ohm regulator.
pub fn evaluate(vin: f64) -> RegulatorState {
    ZenerRegulator::default().evaluate(vin)
}
