//! The learning modules offered by the toolkit.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::{diode, junction, zener};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Module {
    PnJunction,
    Diode,
    Zener,
    LogicGates,
}

/// Range and resolution of a module's input control.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InputRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub unit: &'static str,
}

impl InputRange {
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModuleInfo {
    pub module: Module,
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    /// `None` for modules driven by logic levels rather than a voltage.
    pub input: Option<InputRange>,
}

static MODULES: [ModuleInfo; 4] = [
    ModuleInfo {
        module: Module::PnJunction,
        id: "pn-junction",
        title: "P-N Junction",
        description: "Visualize depletion region logic, forward & reverse biasing, and carrier movement.",
        input: Some(InputRange {
            min: junction::SWEEP_START,
            max: junction::SWEEP_END,
            step: junction::SWEEP_STEP,
            unit: "V",
        }),
    },
    ModuleInfo {
        module: Module::Diode,
        id: "diode",
        title: "Diode Characteristics",
        description: "Interactive IV Curve simulation with breakdown voltage and knee voltage analysis.",
        input: Some(InputRange {
            min: diode::SWEEP_START,
            max: diode::SWEEP_END,
            step: 0.05,
            unit: "V",
        }),
    },
    ModuleInfo {
        module: Module::Zener,
        id: "zener",
        title: "Zener Diode",
        description: "Understand voltage regulation and Zener breakdown mechanics.",
        input: Some(InputRange {
            min: zener::SWEEP_START,
            max: zener::SWEEP_END,
            step: zener::SWEEP_STEP,
            unit: "V",
        }),
    },
    ModuleInfo {
        module: Module::LogicGates,
        id: "logic-gates",
        title: "Logic Gates",
        description: "Build circuits with AND, OR, NOT, NAND, NOR gates and verify truth tables.",
        input: None,
    },
];

impl Module {
    pub fn info(&self) -> &'static ModuleInfo {
        match self {
            Module::PnJunction => &MODULES[0],
            Module::Diode => &MODULES[1],
            Module::Zener => &MODULES[2],
            Module::LogicGates => &MODULES[3],
        }
    }

    pub fn id(&self) -> &'static str {
        self.info().id
    }

    /// Default sweep for the module's chart as `(start, end, step)`.
    pub fn default_sweep(&self) -> Option<(f64, f64, f64)> {
        match self {
            Module::PnJunction => Some((
                junction::SWEEP_START,
                junction::SWEEP_END,
                junction::SWEEP_STEP,
            )),
            Module::Diode => Some((diode::SWEEP_START, diode::SWEEP_END, diode::SWEEP_STEP)),
            Module::Zener => Some((zener::SWEEP_START, zener::SWEEP_END, zener::SWEEP_STEP)),
            Module::LogicGates => None,
        }
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Module {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "pn-junction" | "junction" | "pn" => Ok(Module::PnJunction),
            "diode" => Ok(Module::Diode),
            "zener" => Ok(Module::Zener),
            "logic-gates" | "logic" | "gates" => Ok(Module::LogicGates),
            _ => Err(Error::UnknownModule(s.trim().to_string())),
        }
    }
}

pub fn modules() -> &'static [ModuleInfo] {
    &MODULES
}
