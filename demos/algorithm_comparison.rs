//! Incremental versus Restart
//!
//! This example runs the four experiment algorithms on a multi-fidelity
//! Rastrigin function across several seeds and reports the final incumbent
//! performance and the budget each one spent to get there.
//!
//! Pass an algorithm name (`eid-hb`, `cid-hb`, `dcid-hb`, `ih-hb`) to run only
//! that one.

use incremental_hyperband::prelude::*;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "incremental_hyperband=warn".into()),
        )
        .init();

    let algorithms = match std::env::args().nth(1) {
        Some(name) => vec![name.parse::<Algorithm>()?],
        None => Algorithm::ALL.to_vec(),
    };

    println!("=== Incremental versus Restart (Rastrigin, d=4) ===\n");
    println!(
        "{:<8} {:>6} {:>14} {:>14} {:>8}",
        "algo", "seed", "performance", "total budget", "evals"
    );

    const DIM: usize = 4;
    let sampler = UniformSampler::new(Rastrigin::new(DIM).search_space());

    for algorithm in algorithms {
        let mut budgets = Vec::new();
        for seed in 0..5 {
            let config = ExperimentConfig::new(algorithm)
                .with_initial_max_budget(27.0)
                .with_eta(3.0)
                .with_seed(seed);
            let evaluator = Fidelity::new(Rastrigin::new(DIM));
            let result = run_experiment(&config, evaluator, &sampler)?;
            println!(
                "{:<8} {:>6} {:>14.4} {:>14.1} {:>8}",
                result.algorithm, seed, result.performance, result.total_budget, result.evaluations
            );
            budgets.push(result.total_budget);
        }
        let mean = budgets.iter().sum::<f64>() / budgets.len() as f64;
        println!("{:<8} mean total budget {:.1}\n", algorithm, mean);
    }

    Ok(())
}
