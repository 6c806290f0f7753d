use anyhow::{anyhow, Context, Result};
use clap::ArgMatches;
use lazy_static::lazy_static;
use regex::Regex;

use crate::catalog::Module;
use crate::chart::{ChartConfig, ChartPoint};
use crate::logic;

lazy_static! {
    static ref VALUE_PATTERN: Regex = Regex::new(
        r"^([+-]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)\s*([a-zA-Z]*)$"
    ).unwrap();
}

#[derive(Debug, Clone)]
pub struct CliArgs {
    pub mode: RunMode,
    pub output_file: Option<String>,
    pub output_format: OutputFormat,
    pub chart: ChartConfig,
    pub verbose_level: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunMode {
    List,
    Probe { module: Module, voltage: f64 },
    Sweep { module: Module, start: f64, stop: f64, step: f64 },
    Gate { gate: String, a: bool, b: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Json,
}

impl CliArgs {
    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let module_name = matches
            .get_one::<String>("module")
            .ok_or_else(|| anyhow!("Module is required"))?;

        let output_file = matches.get_one::<String>("output").cloned();
        let verbose_level = matches.get_count("verbose");

        let output_format = match matches
            .get_one::<String>("format")
            .map(String::as_str)
            .unwrap_or("csv")
        {
            "csv" => OutputFormat::Csv,
            "json" => OutputFormat::Json,
            other => return Err(anyhow!("Invalid output format '{}'", other)),
        };

        let mut chart = ChartConfig::default();
        if let Some(values) = matches.get_many::<String>("origin") {
            let values: Vec<&String> = values.collect();
            if values.len() != 2 {
                return Err(anyhow!("Chart origin requires exactly 2 values: x and y"));
            }
            chart.origin = ChartPoint::new(parse_number(values[0])?, parse_number(values[1])?);
        }
        if let Some(values) = matches.get_many::<String>("scale") {
            let values: Vec<&String> = values.collect();
            if values.len() != 2 {
                return Err(anyhow!("Chart scale requires exactly 2 values: x and y"));
            }
            chart.scale_x = parse_number(values[0])?;
            chart.scale_y = parse_number(values[1])?;
        }

        let mode = if module_name.eq_ignore_ascii_case("list") {
            RunMode::List
        } else {
            let module: Module = module_name.parse()?;
            parse_mode(matches, module)?
        };

        Ok(CliArgs {
            mode,
            output_file,
            output_format,
            chart,
            verbose_level,
        })
    }
}

fn parse_mode(matches: &ArgMatches, module: Module) -> Result<RunMode> {
    if module == Module::LogicGates {
        if matches.contains_id("voltage") || matches.contains_id("sweep") {
            return Err(anyhow!(
                "Module '{}' takes --gate and --inputs, not --voltage or --sweep",
                module
            ));
        }

        let gate = matches
            .get_one::<String>("gate")
            .cloned()
            .unwrap_or_else(|| "AND".to_string());
        // Fail on unknown gates before any output is produced
        logic::lookup(&gate)?;

        let (a, b) = match matches.get_many::<String>("inputs") {
            Some(values) => {
                let values: Vec<&String> = values.collect();
                if values.len() != 2 {
                    return Err(anyhow!("Gate inputs require exactly 2 values: A and B"));
                }
                (logic::parse_bit(values[0])?, logic::parse_bit(values[1])?)
            }
            None => (false, false),
        };

        return Ok(RunMode::Gate { gate, a, b });
    }

    if let Some(voltage) = matches.get_one::<String>("voltage") {
        let voltage = parse_voltage_value(voltage)?;
        return Ok(RunMode::Probe { module, voltage });
    }

    if let Some(values) = matches.get_many::<String>("sweep") {
        let values: Vec<&String> = values.collect();
        if values.len() != 3 {
            return Err(anyhow!("Sweep requires exactly 3 parameters: start, stop, step"));
        }

        let start = parse_voltage_value(values[0])?;
        let stop = parse_voltage_value(values[1])?;
        let step = parse_voltage_value(values[2])?;

        if step <= 0.0 {
            return Err(anyhow!("Step size must be positive"));
        }
        if stop < start {
            return Err(anyhow!("Sweep stop must not be below start"));
        }

        return Ok(RunMode::Sweep {
            module,
            start,
            stop,
            step,
        });
    }

    let (start, stop, step) = module
        .default_sweep()
        .ok_or_else(|| anyhow!("Module '{}' has no default sweep", module))?;
    Ok(RunMode::Sweep {
        module,
        start,
        stop,
        step,
    })
}

fn split_value(value: &str) -> Result<(f64, String)> {
    let value = value.trim();
    let captures = VALUE_PATTERN
        .captures(value)
        .ok_or_else(|| anyhow!("Invalid value '{}'", value))?;

    let number = captures[1]
        .parse::<f64>()
        .with_context(|| format!("Invalid number in '{}'", value))?;
    Ok((number, captures[2].to_lowercase()))
}

/// Parse voltage value with unit (e.g., "5V", "-800mV", "1.5")
pub fn parse_voltage_value(value: &str) -> Result<f64> {
    let (number, unit) = split_value(value)?;

    match unit.as_str() {
        "" | "v" => Ok(number),
        "mv" => Ok(number * 1e-3),
        "uv" => Ok(number * 1e-6),
        "kv" => Ok(number * 1e3),
        other => Err(anyhow!("Unknown voltage unit '{}' in '{}'", other, value)),
    }
}

/// Parse a unitless number (pixels, scale factors)
pub fn parse_number(value: &str) -> Result<f64> {
    let (number, unit) = split_value(value)?;
    if unit.is_empty() || unit == "px" {
        Ok(number)
    } else {
        Err(anyhow!("Unexpected unit '{}' in '{}'", unit, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_voltage_value() {
        assert_eq!(parse_voltage_value("1V").unwrap(), 1.0);
        assert_eq!(parse_voltage_value("1.5").unwrap(), 1.5);
        assert_eq!(parse_voltage_value("-6v").unwrap(), -6.0);
        assert_eq!(parse_voltage_value("-800mV").unwrap(), -0.8);
        assert_eq!(parse_voltage_value(".5 V").unwrap(), 0.5);
        assert_eq!(parse_voltage_value("2e-3").unwrap(), 2e-3);
        assert!(parse_voltage_value("5mA").is_err());
        assert!(parse_voltage_value("volts").is_err());
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("300").unwrap(), 300.0);
        assert_eq!(parse_number("40px").unwrap(), 40.0);
        assert!(parse_number("4V").is_err());
    }
}
