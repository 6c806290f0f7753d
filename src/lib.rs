pub mod catalog;
pub mod chart;
pub mod cli;
pub mod diode;
pub mod error;
pub mod glyph;
pub mod junction;
pub mod logic;
pub mod simulator;
pub mod zener;

// Re-export commonly used types
pub use catalog::Module;
pub use chart::{produce_sweep, to_point, ChartConfig, ChartPoint, Sweep};
pub use error::Error;
pub use junction::DepletionState;
pub use logic::{enumerate_truth_table, Gate, GateSpec, TruthTableRow};
pub use simulator::{SimulationResult, Simulator};
pub use zener::{RegulatorState, ZenerRegulator};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
