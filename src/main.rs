//! Dining philosophers simulator - binary entry point.
//!
//! Parses the classic argument list, runs the table to a terminal condition,
//! and logs the final classification. Status lines go to stdout through the
//! reporter; diagnostics go through tracing.

use std::sync::Arc;

use clap::Parser;

use dining_sim::sim::reporter::StdoutReporter;
use dining_sim::{Outcome, Simulation, SimulationConfig};

/// Concurrent dining-philosophers simulation with starvation monitoring.
#[derive(Debug, Parser)]
#[command(name = "dining-sim", version, about)]
struct Cli {
    /// Number of philosophers at the table.
    philosophers: u32,

    /// Milliseconds without starting a meal before a philosopher dies.
    time_to_die: u64,

    /// Milliseconds one meal takes.
    time_to_eat: u64,

    /// Milliseconds one nap takes.
    time_to_sleep: u64,

    /// Stop once every philosopher has eaten this many times.
    required_meals: Option<u32>,
}

impl Cli {
    fn into_config(self) -> SimulationConfig {
        SimulationConfig {
            philosophers: self.philosophers,
            time_to_die_ms: self.time_to_die,
            time_to_eat_ms: self.time_to_eat,
            time_to_sleep_ms: self.time_to_sleep,
            required_meals: self.required_meals,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize observability
    dining_sim::observability::init_tracing();

    let simulation = Simulation::new(cli.into_config(), Arc::new(StdoutReporter))?;
    match simulation.run().await? {
        Outcome::Died(id) => tracing::info!("run_classified: died, philosopher={}", id),
        Outcome::AllSatisfied => tracing::info!("run_classified: all_satisfied"),
    }

    Ok(())
}
