//! Logic gate registry and truth tables.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Gate kind. Glyphs for rendering live in [`crate::glyph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gate {
    And,
    Or,
    Not,
    Nand,
    Nor,
}

/// Immutable description of one gate.
#[derive(Debug, Clone, Copy)]
pub struct GateSpec {
    pub gate: Gate,
    pub name: &'static str,
    pub arity: usize,
    pub description: &'static str,
    logic: fn(bool, bool) -> bool,
}

impl GateSpec {
    /// Evaluate the gate. `b` is ignored by single-input gates.
    pub fn evaluate(&self, a: bool, b: bool) -> bool {
        (self.logic)(a, b)
    }

    pub fn is_single_input(&self) -> bool {
        self.arity == 1
    }

    /// All input combinations in canonical order with their outputs.
    pub fn truth_table(&self) -> Vec<TruthTableRow> {
        if self.is_single_input() {
            [false, true]
                .iter()
                .map(|&a| TruthTableRow {
                    a: to_bit(a),
                    b: None,
                    out: to_bit(self.evaluate(a, false)),
                })
                .collect()
        } else {
            let mut rows = Vec::with_capacity(4);
            for a in [false, true] {
                for b in [false, true] {
                    rows.push(TruthTableRow {
                        a: to_bit(a),
                        b: Some(to_bit(b)),
                        out: to_bit(self.evaluate(a, b)),
                    });
                }
            }
            rows
        }
    }
}

fn and(a: bool, b: bool) -> bool {
    a && b
}

fn or(a: bool, b: bool) -> bool {
    a || b
}

fn not(a: bool, _b: bool) -> bool {
    !a
}

fn nand(a: bool, b: bool) -> bool {
    !(a && b)
}

fn nor(a: bool, b: bool) -> bool {
    !(a || b)
}

static GATES: [GateSpec; 5] = [
    GateSpec {
        gate: Gate::And,
        name: "AND",
        arity: 2,
        description: "Output is High (1) only if BOTH inputs are High.",
        logic: and,
    },
    GateSpec {
        gate: Gate::Or,
        name: "OR",
        arity: 2,
        description: "Output is High (1) if AT LEAST ONE input is High.",
        logic: or,
    },
    GateSpec {
        gate: Gate::Not,
        name: "NOT",
        arity: 1,
        description: "Inverts the input. 0 becomes 1, 1 becomes 0. (Single Input)",
        logic: not,
    },
    GateSpec {
        gate: Gate::Nand,
        name: "NAND",
        arity: 2,
        description: "Output is Low (0) only if BOTH inputs are High. (NOT-AND)",
        logic: nand,
    },
    GateSpec {
        gate: Gate::Nor,
        name: "NOR",
        arity: 2,
        description: "Output is Low (0) if ANY input is High. (NOT-OR)",
        logic: nor,
    },
];

impl Gate {
    pub const ALL: [Gate; 5] = [Gate::And, Gate::Or, Gate::Not, Gate::Nand, Gate::Nor];

    pub fn spec(&self) -> &'static GateSpec {
        match self {
            Gate::And => &GATES[0],
            Gate::Or => &GATES[1],
            Gate::Not => &GATES[2],
            Gate::Nand => &GATES[3],
            Gate::Nor => &GATES[4],
        }
    }

    pub fn name(&self) -> &'static str {
        self.spec().name
    }

    pub fn arity(&self) -> usize {
        self.spec().arity
    }

    pub fn evaluate(&self, a: bool, b: bool) -> bool {
        self.spec().evaluate(a, b)
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Gate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        lookup(s).map(|spec| spec.gate)
    }
}

/// One row of a truth table. `b` is `None` for single-input gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TruthTableRow {
    pub a: u8,
    pub b: Option<u8>,
    pub out: u8,
}

impl TruthTableRow {
    /// Whether this row corresponds to the live inputs.
    pub fn matches(&self, a: bool, b: bool) -> bool {
        self.a == to_bit(a) && self.b.map_or(true, |row_b| row_b == to_bit(b))
    }
}

/// All registered gates in display order.
pub fn gates() -> &'static [GateSpec] {
    &GATES
}

/// Look up a gate by name, ignoring case.
pub fn lookup(name: &str) -> Result<&'static GateSpec> {
    let name = name.trim();
    GATES
        .iter()
        .find(|spec| spec.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| Error::UnknownGate(name.to_string()))
}

/// Evaluate the named gate on two bits.
pub fn evaluate(name: &str, a: u8, b: u8) -> Result<u8> {
    let spec = lookup(name)?;
    Ok(to_bit(spec.evaluate(from_bit(a), from_bit(b))))
}

/// Truth table of the named gate.
pub fn enumerate_truth_table(name: &str) -> Result<Vec<TruthTableRow>> {
    Ok(lookup(name)?.truth_table())
}

pub fn to_bit(level: bool) -> u8 {
    u8::from(level)
}

/// Any non-zero level reads as high.
pub fn from_bit(bit: u8) -> bool {
    bit != 0
}

/// Parse a logic level from text: `0`/`1`, `low`/`high`, `false`/`true`.
pub fn parse_bit(value: &str) -> Result<bool> {
    let value = value.trim();
    match value.to_lowercase().as_str() {
        "low" | "false" | "off" => Ok(false),
        "high" | "true" | "on" => Ok(true),
        _ => value
            .parse::<i64>()
            .map(|level| level != 0)
            .map_err(|_| Error::InvalidBit(value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_gates() {
        assert_eq!(evaluate("AND", 1, 1).unwrap(), 1);
        assert_eq!(evaluate("AND", 1, 0).unwrap(), 0);
        assert_eq!(evaluate("OR", 0, 1).unwrap(), 1);
        assert_eq!(evaluate("OR", 0, 0).unwrap(), 0);
        assert_eq!(evaluate("NOT", 1, 0).unwrap(), 0);
        assert_eq!(evaluate("NOT", 0, 1).unwrap(), 1);
        assert_eq!(evaluate("NOR", 0, 0).unwrap(), 1);
        assert_eq!(evaluate("NOR", 1, 0).unwrap(), 0);
    }

    #[test]
    fn test_nand() {
        assert_eq!(evaluate("NAND", 1, 1).unwrap(), 0);
        assert_eq!(evaluate("NAND", 0, 0).unwrap(), 1);
    }

    #[test]
    fn test_unknown_gate() {
        assert_eq!(
            enumerate_truth_table("XOR"),
            Err(Error::UnknownGate("XOR".to_string()))
        );
        assert!(matches!(evaluate("XNOR", 1, 1), Err(Error::UnknownGate(_))));
        assert!("buffer".parse::<Gate>().is_err());
    }

    #[test]
    fn test_not_truth_table_order() {
        let rows = enumerate_truth_table("NOT").unwrap();
        assert_eq!(
            rows,
            vec![
                TruthTableRow {
                    a: 0,
                    b: None,
                    out: 1,
                },
                TruthTableRow {
                    a: 1,
                    b: None,
                    out: 0,
                },
            ]
        );
    }

    #[test]
    fn test_two_input_truth_table_order() {
        let rows = enumerate_truth_table("nor").unwrap();
        let inputs: Vec<(u8, Option<u8>)> = rows.iter().map(|r| (r.a, r.b)).collect();
        assert_eq!(
            inputs,
            vec![(0, Some(0)), (0, Some(1)), (1, Some(0)), (1, Some(1))]
        );
        let outputs: Vec<u8> = rows.iter().map(|r| r.out).collect();
        assert_eq!(outputs, vec![1, 0, 0, 0]);
    }

    #[test]
    fn test_registry() {
        let names: Vec<&str> = gates().iter().map(|g| g.name).collect();
        assert_eq!(names, vec!["AND", "OR", "NOT", "NAND", "NOR"]);
        for gate in Gate::ALL {
            assert_eq!(gate.name().parse::<Gate>().unwrap(), gate);
            assert_eq!(gate.spec().truth_table().len(), 1 << gate.arity());
        }
        assert_eq!(Gate::Not.arity(), 1);
    }

    #[test]
    fn test_row_matches_live_inputs() {
        let rows = Gate::Not.spec().truth_table();
        assert!(rows[1].matches(true, false));
        assert!(rows[1].matches(true, true));
        assert!(!rows[0].matches(true, false));

        let rows = Gate::And.spec().truth_table();
        let active: Vec<usize> = (0..4).filter(|&i| rows[i].matches(true, false)).collect();
        assert_eq!(active, vec![2]);
    }

    #[test]
    fn test_parse_bit() {
        assert!(parse_bit("1").unwrap());
        assert!(parse_bit("HIGH").unwrap());
        assert!(!parse_bit("0").unwrap());
        assert!(parse_bit("5").unwrap());
        assert_eq!(parse_bit("maybe"), Err(Error::InvalidBit("maybe".to_string())));
        assert_eq!(parse_bit("Maybe"), Err(Error::InvalidBit("Maybe".to_string())));
        assert_eq!(evaluate("AND", 2, 7).unwrap(), 1);
    }
}
