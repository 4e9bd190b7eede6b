//! Chain Layout Solver - Command Line Interface
//!
//! Wires machines into a single chain with minimal total cable length.

use clap::{Parser, Subcommand};
use chain_layout_solver::instance::ChainInstance;
use chain_layout_solver::heuristics::restart::{RandomRestart, SearchReport};

use ordered_float::OrderedFloat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "chain-layout-solver")]
#[command(author = "M2 AI2D Student")]
#[command(version = "1.0")]
#[command(about = "Hill-climbing solver for minimal-cable machine chains")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve an instance with random-restart hill climbing
    Solve {
        /// Path to the instance file (built-in 12-machine instance if omitted)
        #[arg(short, long)]
        instance: Option<PathBuf>,

        /// Stop as soon as a chain at or below this cable length is found
        #[arg(short, long)]
        target: Option<f64>,

        /// Maximum number of hill-climbing restarts
        #[arg(short, long, default_value = "1000")]
        max_restarts: usize,

        /// Random seed
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Output solution to file (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Analyze an instance
    Analyze {
        /// Path to the instance file (built-in 12-machine instance if omitted)
        #[arg(short, long)]
        instance: Option<PathBuf>,
    },

    /// Run the search across several seeds and summarize
    Compare {
        /// Path to the instance file (built-in 12-machine instance if omitted)
        #[arg(short, long)]
        instance: Option<PathBuf>,

        /// Number of seeded runs
        #[arg(short, long, default_value = "10")]
        runs: usize,

        /// Maximum restarts per run
        #[arg(short, long, default_value = "200")]
        max_restarts: usize,

        /// Base random seed
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Output CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Solve { instance, target, max_restarts, seed, output, verbose } => {
            solve_instance(instance.as_deref(), target, max_restarts, seed, output, verbose);
        }

        Commands::Analyze { instance } => {
            let instance = load_instance(instance.as_deref());
            println!("{}", instance.statistics());
        }

        Commands::Compare { instance, runs, max_restarts, seed, output } => {
            compare_seeds(instance.as_deref(), runs, max_restarts, seed, output);
        }
    }
}

fn load_instance(path: Option<&std::path::Path>) -> ChainInstance {
    match path {
        Some(path) => {
            println!("Loading instance from {:?}...", path);
            match ChainInstance::from_file(path) {
                Ok(inst) => inst,
                Err(e) => {
                    eprintln!("Error loading instance: {}", e);
                    std::process::exit(1);
                }
            }
        }
        None => {
            println!("Using built-in 12-machine instance...");
            ChainInstance::reference()
        }
    }
}

fn solve_instance(
    path: Option<&std::path::Path>,
    target: Option<f64>,
    max_restarts: usize,
    seed: u64,
    output: Option<PathBuf>,
    verbose: bool,
) {
    let instance = load_instance(path);

    if verbose {
        println!("{}", instance.statistics());
    }

    println!("Solving with random-restart hill climbing (seed {}, up to {} restarts)...", seed, max_restarts);

    let driver = RandomRestart::with_params(target, max_restarts, seed);
    let report = match driver.search(&instance) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Search failed: {}", e);
            std::process::exit(1);
        }
    };

    print_report(&instance, &report);

    if let Some(target) = target {
        if report.target_reached {
            println!("Target {:.2} reached after {} restart(s)", target, report.restarts);
        } else {
            println!("Target {:.2} NOT reached within {} restart(s)", target, report.restarts);
        }
    }

    if let Some(output_path) = output {
        let json = serde_json::to_string_pretty(&report).unwrap();
        if let Err(e) = std::fs::write(&output_path, json) {
            eprintln!("Error writing solution: {}", e);
            std::process::exit(1);
        }
        println!("Solution written to {:?}", output_path);
    }
}

fn print_report(instance: &ChainInstance, report: &SearchReport) {
    println!("{}", report.best);
    println!("  Machines: {}", report.best.format_labels(instance));
    println!("  Restarts: {}", report.restarts);
    println!("  Total time: {:.4}s", report.computation_time);
}

fn compare_seeds(
    path: Option<&std::path::Path>,
    runs: usize,
    max_restarts: usize,
    base_seed: u64,
    output: Option<PathBuf>,
) {
    let instance = load_instance(path);

    let mut reports: Vec<(u64, SearchReport)> = Vec::with_capacity(runs);
    for run in 0..runs {
        let seed = base_seed + run as u64;
        let driver = RandomRestart::with_params(None, max_restarts, seed);
        match driver.search(&instance) {
            Ok(report) => {
                println!("seed {:>4}: cost {} ({} restarts, {:.4}s)",
                    seed, report.best.cost, report.restarts, report.computation_time);
                reports.push((seed, report));
            }
            Err(e) => {
                eprintln!("Search failed for seed {}: {}", seed, e);
                std::process::exit(1);
            }
        }
    }

    let mut costs: Vec<f64> = reports.iter()
        .filter_map(|(_, r)| r.best.cost.value())
        .collect();
    costs.sort_by_key(|&c| OrderedFloat(c));

    let mean = costs.iter().sum::<f64>() / costs.len() as f64;
    let variance = costs.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / costs.len() as f64;

    println!("\nSummary over {} run(s):", costs.len());
    println!("  Best:  {:.2}", costs.first().copied().unwrap_or(0.0));
    println!("  Worst: {:.2}", costs.last().copied().unwrap_or(0.0));
    println!("  Mean:  {:.2}", mean);
    println!("  Std:   {:.2}", variance.sqrt());

    if let Some(output_path) = output {
        if let Err(e) = write_csv(&output_path, &reports) {
            eprintln!("Error writing CSV: {}", e);
            std::process::exit(1);
        }
        println!("Results written to {:?}", output_path);
    }
}

fn write_csv(path: &std::path::Path, reports: &[(u64, SearchReport)]) -> Result<(), String> {
    let file = std::fs::File::create(path)
        .map_err(|e| format!("Cannot create file: {}", e))?;
    let mut writer = csv::Writer::from_writer(file);

    writer.write_record(["seed", "cost", "restarts", "time"])
        .map_err(|e| e.to_string())?;

    for (seed, report) in reports {
        let cost = report.best.cost.value()
            .map(|c| format!("{:.2}", c))
            .unwrap_or_else(|| "infeasible".to_string());
        writer.write_record([
            seed.to_string(),
            cost,
            report.restarts.to_string(),
            format!("{:.4}", report.computation_time),
        ]).map_err(|e| e.to_string())?;
    }

    writer.flush().map_err(|e| e.to_string())
}
