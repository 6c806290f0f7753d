use std::fs::File;

use anyhow::{anyhow, Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::catalog::Module;
use crate::chart::{self, ChartConfig, ChartPoint};
use crate::cli::OutputFormat;
use crate::glyph;
use crate::logic::{self, TruthTableRow};
use crate::zener::{self, ZenerRegulator};
use crate::{diode, junction};

/// Results of the last run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub analysis_type: AnalysisType,
    pub inputs: Vec<f64>,
    pub traces: Vec<Trace>,
    pub chart_points: Vec<ChartPoint>,
    pub truth_table: Vec<TruthTableRow>,
    pub active_row: Option<usize>,
    pub gate_output: Option<u8>,
    /// SVG symbol of the evaluated gate
    pub glyph: Option<String>,
    pub total_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AnalysisType {
    Probe { module: Module, input: f64 },
    Sweep { module: Module, start: f64, stop: f64, step: f64 },
    TruthTable { gate: String, a: bool, b: bool },
}

/// One named output quantity, sampled at every input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub name: String,
    pub unit: String,
    pub values: Vec<f64>,
}

impl SimulationResult {
    pub fn trace(&self, name: &str) -> Option<&Trace> {
        self.traces.iter().find(|t| t.name == name)
    }

    pub fn polyline(&self) -> String {
        chart::polyline(&self.chart_points)
    }
}

/// A single reading: name, unit, value. The first reading of a module is
/// the one placed on the chart.
type Reading = (&'static str, &'static str, f64);

fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    pub chart: ChartConfig,
    pub regulator: ZenerRegulator,
    pub include_chart: bool,
    pub warn_out_of_range: bool,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        SimulatorConfig {
            chart: ChartConfig::default(),
            regulator: ZenerRegulator::default(),
            include_chart: true,
            warn_out_of_range: true,
        }
    }
}

/// Runs the device models on behalf of a front end and keeps the last
/// result for export
pub struct Simulator {
    results: Option<SimulationResult>,
    config: SimulatorConfig,
}

impl Simulator {
    pub fn new() -> Self {
        Simulator {
            results: None,
            config: SimulatorConfig::default(),
        }
    }

    pub fn with_config(config: SimulatorConfig) -> Self {
        Simulator {
            results: None,
            config,
        }
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    fn readings(&self, module: Module, voltage: f64) -> Result<Vec<Reading>> {
        match module {
            Module::Diode => Ok(vec![("I(D)", "mA", diode::current(voltage))]),
            Module::PnJunction => {
                let state = junction::evaluate(voltage);
                Ok(vec![
                    ("I(J)", "mA", state.current),
                    ("W", "px", state.width),
                    ("conducting", "", flag(state.is_conducting)),
                ])
            }
            Module::Zener => {
                let state = self.config.regulator.evaluate(voltage);
                Ok(vec![
                    ("V(out)", "V", state.vout),
                    ("V(div)", "V", state.v_divider),
                    ("I(total)", "mA", zener::to_milliamps(state.i_total)),
                    ("I(load)", "mA", zener::to_milliamps(state.i_load)),
                    ("I(zener)", "mA", zener::to_milliamps(state.i_zener)),
                    ("active", "", flag(state.is_zener_active)),
                ])
            }
            Module::LogicGates => Err(anyhow!(
                "module '{}' is driven by logic levels, not a voltage",
                module
            )),
        }
    }

    fn check_range(&self, module: Module, value: f64) {
        if !self.config.warn_out_of_range {
            return;
        }
        if let Some(range) = module.info().input {
            if !range.contains(value) {
                warn!(
                    "{} V is outside the {} range [{}, {}]; extrapolating",
                    value, module, range.min, range.max
                );
            }
        }
    }

    /// Evaluate one module at a single input voltage
    pub fn run_probe(&mut self, module: Module, voltage: f64) -> Result<()> {
        info!("Probing {} at {} V", module, voltage);
        let start_time = std::time::Instant::now();

        self.check_range(module, voltage);
        let readings = self.readings(module, voltage)?;

        let traces = readings
            .iter()
            .map(|&(name, unit, value)| Trace {
                name: name.to_string(),
                unit: unit.to_string(),
                values: vec![value],
            })
            .collect();

        let chart_points = if self.config.include_chart {
            vec![self.config.chart.map(voltage, readings[0].2)]
        } else {
            Vec::new()
        };

        self.results = Some(SimulationResult {
            analysis_type: AnalysisType::Probe {
                module,
                input: voltage,
            },
            inputs: vec![voltage],
            traces,
            chart_points,
            truth_table: Vec::new(),
            active_row: None,
            gate_output: None,
            glyph: None,
            total_time: start_time.elapsed().as_secs_f64(),
        });

        Ok(())
    }

    /// Sweep one module over `[start, stop]`
    pub fn run_sweep(&mut self, module: Module, start: f64, stop: f64, step: f64) -> Result<()> {
        info!(
            "Starting {} sweep from {} to {} step {}",
            module, start, stop, step
        );
        let start_time = std::time::Instant::now();

        self.check_range(module, start);
        self.check_range(module, stop);

        // Validates the module before the sweep is built
        let template = self.readings(module, start)?;

        let sweep = chart::produce_sweep(|v| v, start, stop, step)
            .with_context(|| format!("Invalid sweep for {}", module))?;

        let mut inputs = Vec::with_capacity(sweep.len());
        let mut traces: Vec<Trace> = template
            .iter()
            .map(|&(name, unit, _)| Trace {
                name: name.to_string(),
                unit: unit.to_string(),
                values: Vec::with_capacity(sweep.len()),
            })
            .collect();
        let mut chart_points = Vec::new();

        for (i, (voltage, _)) in sweep.enumerate() {
            debug!("Sweep point {}: {} = {} V", i, module, voltage);
            inputs.push(voltage);

            let readings = self.readings(module, voltage)?;
            if self.config.include_chart {
                chart_points.push(self.config.chart.map(voltage, readings[0].2));
            }
            for (trace, (_, _, value)) in traces.iter_mut().zip(readings) {
                trace.values.push(value);
            }
        }

        let num_points = inputs.len();
        self.results = Some(SimulationResult {
            analysis_type: AnalysisType::Sweep {
                module,
                start,
                stop,
                step,
            },
            inputs,
            traces,
            chart_points,
            truth_table: Vec::new(),
            active_row: None,
            gate_output: None,
            glyph: None,
            total_time: start_time.elapsed().as_secs_f64(),
        });

        info!("{} sweep completed with {} points", module, num_points);

        Ok(())
    }

    /// Evaluate a gate on the live inputs and build its truth table
    pub fn run_truth_table(&mut self, gate_name: &str, a: bool, b: bool) -> Result<()> {
        info!("Evaluating gate {} with A={} B={}", gate_name, a, b);
        let start_time = std::time::Instant::now();

        let spec = logic::lookup(gate_name)?;
        let truth_table = spec.truth_table();
        let active_row = truth_table.iter().position(|row| row.matches(a, b));
        let gate_output = logic::to_bit(spec.evaluate(a, b));

        debug!("{}: {}", spec.name, spec.description);

        self.results = Some(SimulationResult {
            analysis_type: AnalysisType::TruthTable {
                gate: spec.name.to_string(),
                a,
                b,
            },
            inputs: Vec::new(),
            traces: Vec::new(),
            chart_points: Vec::new(),
            truth_table,
            active_row,
            gate_output: Some(gate_output),
            glyph: Some(glyph::glyph(spec.gate).to_svg()),
            total_time: start_time.elapsed().as_secs_f64(),
        });

        Ok(())
    }

    pub fn get_results(&self) -> Option<&SimulationResult> {
        self.results.as_ref()
    }

    /// Export the last result to file
    pub fn export_results(&self, filename: &str, format: OutputFormat) -> Result<()> {
        let results = self
            .results
            .as_ref()
            .ok_or_else(|| anyhow!("No simulation results available"))?;

        match format {
            OutputFormat::Csv => self.export_csv(results, filename),
            OutputFormat::Json => self.export_json(results, filename),
        }
    }

    fn export_csv(&self, results: &SimulationResult, filename: &str) -> Result<()> {
        use csv::Writer;

        let file = File::create(filename)
            .with_context(|| format!("Failed to create '{}'", filename))?;
        let mut writer = Writer::from_writer(file);

        if let AnalysisType::TruthTable { .. } = results.analysis_type {
            writer.write_record(["a", "b", "out", "active"])?;
            for (i, row) in results.truth_table.iter().enumerate() {
                let b = row.b.map(|b| b.to_string()).unwrap_or_default();
                let active = if results.active_row == Some(i) { "1" } else { "0" };
                writer.write_record([
                    row.a.to_string(),
                    b,
                    row.out.to_string(),
                    active.to_string(),
                ])?;
            }
            writer.flush()?;
            info!("Truth table exported to CSV: {}", filename);
            return Ok(());
        }

        let with_chart = !results.chart_points.is_empty();

        let mut header = vec!["input".to_string()];
        for trace in &results.traces {
            if trace.unit.is_empty() {
                header.push(trace.name.clone());
            } else {
                header.push(format!("{} [{}]", trace.name, trace.unit));
            }
        }
        if with_chart {
            header.push("x".to_string());
            header.push("y".to_string());
        }
        writer.write_record(&header)?;

        for (i, &input) in results.inputs.iter().enumerate() {
            let mut record = vec![input.to_string()];
            for trace in &results.traces {
                let value = trace.values.get(i).unwrap_or(&0.0);
                record.push(value.to_string());
            }
            if let Some(point) = results.chart_points.get(i) {
                record.push(point.x.to_string());
                record.push(point.y.to_string());
            }
            writer.write_record(&record)?;
        }

        writer.flush()?;
        info!("Results exported to CSV: {}", filename);
        Ok(())
    }

    fn export_json(&self, results: &SimulationResult, filename: &str) -> Result<()> {
        let file = File::create(filename)
            .with_context(|| format!("Failed to create '{}'", filename))?;
        serde_json::to_writer_pretty(file, results)?;

        info!("Results exported to JSON: {}", filename);
        Ok(())
    }

    pub fn print_summary(&self) {
        let Some(results) = &self.results else {
            println!("No simulation results available");
            return;
        };

        println!("\n=== Simulation Summary ===");
        match &results.analysis_type {
            AnalysisType::Probe { module, input } => {
                println!("Module: {}", module.info().title);
                println!("Input: {} V", input);
                match module {
                    Module::Diode => println!("Region: {}", diode::region(*input).label()),
                    Module::PnJunction => println!("Bias: {:?}", junction::bias(*input)),
                    Module::Zener => println!(
                        "Status: {}",
                        self.config.regulator.evaluate(*input).status().label()
                    ),
                    Module::LogicGates => {}
                }
            }
            AnalysisType::Sweep {
                module,
                start,
                stop,
                step,
            } => {
                println!("Module: {}", module.info().title);
                println!("Sweep: {} V to {} V step {} V", start, stop, step);
                println!("Number of points: {}", results.inputs.len());
            }
            AnalysisType::TruthTable { gate, a, b } => {
                if let Ok(spec) = logic::lookup(gate) {
                    println!("Gate: {} ({})", spec.name, spec.description);
                    if spec.is_single_input() {
                        println!("Input: A={}", logic::to_bit(*a));
                    } else {
                        println!("Inputs: A={} B={}", logic::to_bit(*a), logic::to_bit(*b));
                    }
                }
                if let Some(out) = results.gate_output {
                    println!("Output: {}", out);
                }
                println!("\nTruth table:");
                for (i, row) in results.truth_table.iter().enumerate() {
                    let marker = if results.active_row == Some(i) { ">" } else { " " };
                    match row.b {
                        Some(b) => println!("{} {} {} | {}", marker, row.a, b, row.out),
                        None => println!("{} {} | {}", marker, row.a, row.out),
                    }
                }
            }
        }
        println!("Evaluation time: {:.3}ms", results.total_time * 1000.0);

        if !results.traces.is_empty() {
            println!("\nReadings (final values):");
            for trace in &results.traces {
                if let Some(&value) = trace.values.last() {
                    println!("  {}: {:.6}{}", trace.name, value, trace.unit);
                }
            }
        }

        if let Some(point) = results.chart_points.last() {
            println!("\nChart point: ({:.2}, {:.2})", point.x, point.y);
        }
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_diode_probe() {
        let mut simulator = Simulator::new();
        simulator.run_probe(Module::Diode, 0.7).unwrap();

        let results = simulator.get_results().unwrap();
        assert_eq!(results.inputs, vec![0.7]);
        assert!(close(results.trace("I(D)").unwrap().values[0], 0.8));
        let point = results.chart_points[0];
        assert!(close(point.x, 328.0));
        assert!(close(point.y, 196.8));
    }

    #[test]
    fn test_zener_sweep() {
        let mut simulator = Simulator::new();
        simulator.run_sweep(Module::Zener, 0.0, 15.0, 0.5).unwrap();

        let results = simulator.get_results().unwrap();
        assert_eq!(results.inputs.len(), 31);
        assert_eq!(results.chart_points.len(), 31);

        let vout = results.trace("V(out)").unwrap();
        assert!(vout.values.iter().all(|&v| v <= 5.0));
        assert_eq!(*vout.values.last().unwrap(), 5.0);

        let i_zener = results.trace("I(zener)").unwrap();
        assert!(close(*i_zener.values.last().unwrap(), 90.0));
        assert_eq!(i_zener.values[12], 0.0);
    }

    #[test]
    fn test_junction_sweep_traces() {
        let mut simulator = Simulator::new();
        simulator.run_sweep(Module::PnJunction, -5.0, 2.0, 0.1).unwrap();

        let results = simulator.get_results().unwrap();
        assert_eq!(results.traces.len(), 3);
        let widths = &results.trace("W").unwrap().values;
        assert!(widths.windows(2).all(|w| w[1] <= w[0]));
    }

    #[test]
    fn test_logic_module_rejects_voltage() {
        let mut simulator = Simulator::new();
        assert!(simulator.run_probe(Module::LogicGates, 1.0).is_err());
        assert!(simulator.run_sweep(Module::LogicGates, 0.0, 1.0, 0.1).is_err());
        assert!(simulator.get_results().is_none());
    }

    #[test]
    fn test_invalid_sweep_step() {
        let mut simulator = Simulator::new();
        assert!(simulator.run_sweep(Module::Diode, 0.0, 1.0, 0.0).is_err());
        assert!(simulator.run_sweep(Module::Diode, 0.0, 1.0, 1e-300).is_err());
        assert!(simulator.run_sweep(Module::Diode, -8.0, 1.5, 1e-9).is_err());
        assert!(simulator.get_results().is_none());
    }

    #[test]
    fn test_sweep_charts_primary_reading() {
        let mut simulator = Simulator::new();
        simulator.run_sweep(Module::Diode, -8.0, 1.5, 0.1).unwrap();

        let results = simulator.get_results().unwrap();
        let currents = &results.trace("I(D)").unwrap().values;
        assert_eq!(results.chart_points.len(), currents.len());
        for ((&v, &i), point) in results.inputs.iter().zip(currents).zip(&results.chart_points) {
            assert!(i.is_finite());
            assert_eq!(*point, simulator.config().chart.map(v, i));
        }
    }

    #[test]
    fn test_truth_table_run() {
        let mut simulator = Simulator::new();
        simulator.run_truth_table("nand", true, true).unwrap();

        let results = simulator.get_results().unwrap();
        assert_eq!(results.gate_output, Some(0));
        assert_eq!(results.active_row, Some(3));
        assert_eq!(results.truth_table.len(), 4);
        assert!(results.glyph.as_deref().unwrap().contains("circle"));

        assert!(simulator.run_truth_table("XOR", false, false).is_err());
    }

    #[test]
    fn test_export_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("diode.csv");
        let path = path.to_str().unwrap();

        let mut simulator = Simulator::new();
        simulator.run_sweep(Module::Diode, -8.0, 1.5, 0.1).unwrap();
        simulator.export_results(path, OutputFormat::Csv).unwrap();

        let content = std::fs::read_to_string(path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("input,I(D) [mA],x,y"));
        assert_eq!(lines.count(), 96);
    }

    #[test]
    fn test_export_truth_table_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not.csv");
        let path = path.to_str().unwrap();

        let mut simulator = Simulator::new();
        simulator.run_truth_table("NOT", true, false).unwrap();
        simulator.export_results(path, OutputFormat::Csv).unwrap();

        let content = std::fs::read_to_string(path).unwrap();
        assert_eq!(content, "a,b,out,active\n0,,1,0\n1,,0,1\n");
    }

    #[test]
    fn test_export_json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zener.json");
        let path = path.to_str().unwrap();

        let mut simulator = Simulator::new();
        simulator.run_probe(Module::Zener, 15.0).unwrap();
        simulator.export_results(path, OutputFormat::Json).unwrap();

        let file = File::open(path).unwrap();
        let loaded: SimulationResult = serde_json::from_reader(file).unwrap();
        assert_eq!(
            loaded.analysis_type,
            AnalysisType::Probe {
                module: Module::Zener,
                input: 15.0
            }
        );
        assert_eq!(loaded.trace("V(out)").unwrap().values, vec![5.0]);
    }

    #[test]
    fn test_export_without_results() {
        let simulator = Simulator::new();
        assert!(simulator.export_results("unused.csv", OutputFormat::Csv).is_err());
    }

    #[test]
    fn test_chart_can_be_disabled() {
        let mut simulator = Simulator::with_config(SimulatorConfig {
            include_chart: false,
            ..SimulatorConfig::default()
        });
        simulator.run_sweep(Module::Diode, 0.0, 1.0, 0.5).unwrap();
        let results = simulator.get_results().unwrap();
        assert!(results.chart_points.is_empty());
        assert_eq!(results.polyline(), "");
    }
}
