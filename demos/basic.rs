//! Basic example of using the SDVRP library.

use sdvrp::config::Config;
use sdvrp::instance::Instance;
use sdvrp::listener::LogListener;
use sdvrp::utils::{format_duration, save_solution};
use sdvrp::{solve_restored, split_routes};
use std::env;
use std::time::Instant;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Load the instance from the command line or build a small ring instance
    let args: Vec<String> = env::args().collect();
    let instance = if args.len() > 1 {
        println!("Loading instance from: {}", args[1]);
        Instance::from_file(&args[1])?
    } else {
        let mut coords = vec![(0, 0)];
        for ring in 1..=3 {
            for k in 0..12 {
                let angle = std::f64::consts::PI * k as f64 / 6.0;
                let radius = 100.0 * ring as f64;
                coords.push((
                    (radius * angle.cos()).round() as i32,
                    (radius * angle.sin()).round() as i32,
                ));
            }
        }
        let demands: Vec<i32> = (0..36).map(|i| if i % 2 == 0 { 60 } else { 90 }).collect();
        Instance::from_coord_list(100, &demands, &coords)?
    };
    println!(
        "Instance with {} customers, capacity {}, total demand {}",
        instance.get_customer_count(),
        instance.capacity,
        instance.total_demand()
    );

    // Configure the search
    let config = Config::new().with_time_limit(5.0).with_random_seed(1);

    let start_time = Instant::now();
    let solution = solve_restored(&config, &instance, Some(Box::new(LogListener::new())))?;
    let runtime = start_time.elapsed();

    // Print results
    println!("Search completed in {}", format_duration(runtime));
    println!("Best solution distance: {}", solution.objective());
    for (i, route) in split_routes(&solution.to_flat()).iter().enumerate() {
        println!("Route #{}: {:?}", i + 1, route);
    }

    save_solution(&solution, &instance, "sdvrp.sol")?;
    println!("Solution saved to sdvrp.sol");

    Ok(())
}
