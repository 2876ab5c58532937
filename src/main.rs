//! Command-line entry point: solve a JSON instance and print the routes.

use clap::Parser;
use log::{error, info};
use sdvrp::config::Config;
use sdvrp::instance::Instance;
use sdvrp::listener::LogListener;
use sdvrp::utils::save_solution;
use sdvrp::{solve_restored, split_routes};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "sdvrp", version, about = "Split Delivery Vehicle Routing Problem solver")]
struct Args {
    /// Instance file (JSON with capacity, demands and input)
    #[arg(short, long)]
    instance: PathBuf,

    /// Configuration file (JSON); defaults are used for missing fields
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Time limit in seconds
    #[arg(short, long)]
    time_limit: Option<f64>,

    /// Random seed
    #[arg(short, long)]
    seed: Option<u32>,

    /// Maximum number of iterations
    #[arg(short, long)]
    max_iterations: Option<u64>,

    /// Write a readable report of the solution to this file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(time_limit) = args.time_limit {
        config = config.with_time_limit(time_limit);
    }
    if let Some(seed) = args.seed {
        config = config.with_random_seed(seed);
    }
    if let Some(max_iterations) = args.max_iterations {
        config = config.with_max_iterations(max_iterations);
    }

    info!("Loading instance from {}", args.instance.display());
    let instance = Instance::from_file(&args.instance)?;

    let solution = solve_restored(&config, &instance, Some(Box::new(LogListener::new())))?;

    println!("Objective: {}", solution.objective());
    println!("Routes: {}", solution.get_route_count());
    for (i, route) in split_routes(&solution.to_flat()).iter().enumerate() {
        let visits: Vec<String> = route
            .iter()
            .map(|(customer, load)| format!("{}({})", customer, load))
            .collect();
        println!("Route #{}: 0 -> {} -> 0", i + 1, visits.join(" -> "));
    }

    if let Some(path) = &args.output {
        save_solution(&solution, &instance, path)?;
        info!("Solution saved to {}", path.display());
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
