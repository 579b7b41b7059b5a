//! Incremental Sphere Optimization
//!
//! This example runs Hyperband on a multi-fidelity Sphere function, then raises
//! the maximum budget and runs again. The second run reuses every evaluation
//! of the first one, so it only pays for the new candidates and the new top
//! rung.
//!
//! Set `RUST_LOG=incremental_hyperband=debug` to see per-rung decisions.

use incremental_hyperband::prelude::*;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "incremental_hyperband=info".into()),
        )
        .init();

    println!("=== Incremental Sphere Optimization ===\n");

    const DIM: usize = 5;
    let evaluator = Fidelity::new(Sphere::new(DIM));
    let sampler = UniformSampler::new(evaluator.benchmark().search_space());

    let config = HyperbandConfig::new()
        .with_max_budget(27.0)
        .with_eta(3.0)
        .with_seed(42);
    let mut hb = Hyperband::new(config, evaluator)?;

    let first = hb.hyperband(&sampler)?;
    println!("{}", first.summary());

    // Raise R from 27 to 81 and continue from the recorded history
    hb.increment_max_budget();
    let second = hb.hyperband(&sampler)?;
    println!("{}", second.summary());

    println!("Budget of the first run:  {:.1}", first.run_budget());
    println!("Budget of the second run: {:.1}", second.run_budget());
    println!("\nBest solution:");
    for (i, val) in second.best_payload().iter().enumerate() {
        println!("  x[{}] = {:.6}", i, val);
    }

    Ok(())
}
