use clap::{Arg, ArgMatches, Command};
use colored::*;
use log::{error, info};

use semilab::catalog;
use semilab::cli::{CliArgs, RunMode};
use semilab::simulator::{Simulator, SimulatorConfig};

fn main() {
    let matches = create_cli().get_matches();

    let default_level = match matches.get_count("verbose") {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if let Err(e) = run_application(&matches) {
        error!("{}", format!("Error: {:#}", e).red());
        std::process::exit(1);
    }
}

fn create_cli() -> Command {
    Command::new("semilab")
        .version(semilab::VERSION)
        .about(semilab::DESCRIPTION)
        .arg(
            Arg::new("module")
                .help("Module to run: diode, junction, zener, logic, or list")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("voltage")
                .long("voltage")
                .value_name("V")
                .allow_hyphen_values(true)
                .conflicts_with("sweep")
                .help("Evaluate the module at a single input voltage"),
        )
        .arg(
            Arg::new("sweep")
                .long("sweep")
                .value_names(["START", "STOP", "STEP"])
                .num_args(3)
                .allow_hyphen_values(true)
                .help("Sweep the input voltage (default: the module's display range)"),
        )
        .arg(
            Arg::new("gate")
                .short('g')
                .long("gate")
                .value_name("NAME")
                .help("Logic gate: AND, OR, NOT, NAND, NOR"),
        )
        .arg(
            Arg::new("inputs")
                .long("inputs")
                .value_names(["A", "B"])
                .num_args(2)
                .help("Logic gate input levels"),
        )
        .arg(
            Arg::new("origin")
                .long("origin")
                .value_names(["X", "Y"])
                .num_args(2)
                .allow_hyphen_values(true)
                .help("Chart origin in pixels"),
        )
        .arg(
            Arg::new("scale")
                .long("scale")
                .value_names(["SX", "SY"])
                .num_args(2)
                .allow_hyphen_values(true)
                .help("Chart scale in pixels per unit"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Output file for results"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(clap::ArgAction::Count)
                .help("Increase verbosity level"),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .value_name("FORMAT")
                .default_value("csv")
                .value_parser(["csv", "json"])
                .help("Output format"),
        )
}

fn print_modules() {
    println!("{}", "Available modules:".bold());
    for info in catalog::modules() {
        println!("  {:<12} {}", info.id.bright_blue(), info.title.bold());
        println!("  {:<12} {}", "", info.description);
        if let Some(range) = info.input {
            println!(
                "  {:<12} input {}{} to {}{} step {}{}",
                "", range.min, range.unit, range.max, range.unit, range.step, range.unit
            );
        }
    }
}

fn run_application(matches: &ArgMatches) -> anyhow::Result<()> {
    let args = CliArgs::from_matches(matches)?;

    info!("{}", "Starting semilab".green().bold());

    let config = SimulatorConfig {
        chart: args.chart,
        ..SimulatorConfig::default()
    };
    let mut simulator = Simulator::with_config(config);

    match args.mode {
        RunMode::List => {
            print_modules();
            return Ok(());
        }
        RunMode::Probe { module, voltage } => {
            simulator.run_probe(module, voltage)?;
        }
        RunMode::Sweep {
            module,
            start,
            stop,
            step,
        } => {
            simulator.run_sweep(module, start, stop, step)?;
        }
        RunMode::Gate { gate, a, b } => {
            simulator.run_truth_table(&gate, a, b)?;
        }
    }

    if let Some(output_file) = args.output_file {
        simulator.export_results(&output_file, args.output_format)?;
        println!("Results exported to: {}", output_file.bright_green());
    } else {
        simulator.print_summary();
    }

    info!("{}", "Done".green().bold());
    Ok(())
}
