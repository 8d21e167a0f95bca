//! Simulation core: shared table state, philosopher lifecycles, and the
//! starvation monitor.
//!
//! The driver wires one task per philosopher plus the monitor around a single
//! shared [`SimulationState`]:
//!
//! ```text
//!   philosopher tasks (1..=N)                 monitor
//!     eat / sleep / think                death + satisfaction scans
//!            │                                    │
//!            ▼                                    ▼
//!   ┌──────────────────────────────────────────────────┐
//!   │                 SimulationState                  │
//!   │   meal records (state lock) · termination flag   │
//!   │   forks: Vec<tokio::sync::Mutex<()>>             │
//!   └──────────────────────────────────────────────────┘
//! ```
//!
//! The termination flag is the single synchronization point between the
//! monitor and the seats: once it latches, every wait and pending fork
//! acquisition returns promptly and no new phase starts.

pub mod clock;
pub mod monitor;
pub mod philosopher;
pub mod reporter;
pub mod state;

use std::sync::Arc;

use crate::sim::clock::{MonotonicClock, TimeSource};
use crate::sim::monitor::Monitor;
use crate::sim::philosopher::Philosopher;
use crate::sim::reporter::Reporter;
use crate::sim::state::SimulationState;
use crate::types::{Result, SimulationConfig};

pub use monitor::Outcome;

/// A fully wired simulation run.
#[derive(Debug)]
pub struct Simulation {
    state: Arc<SimulationState>,
    reporter: Arc<dyn Reporter>,
}

impl Simulation {
    /// Validate `config` and set the table with a fresh monotonic clock.
    pub fn new(config: SimulationConfig, reporter: Arc<dyn Reporter>) -> Result<Self> {
        Self::with_clock(config, reporter, Arc::new(MonotonicClock::new()))
    }

    /// Like [`Simulation::new`] with an explicit time source.
    pub fn with_clock(
        config: SimulationConfig,
        reporter: Arc<dyn Reporter>,
        clock: Arc<dyn TimeSource>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            state: Arc::new(SimulationState::new(config, clock)),
            reporter,
        })
    }

    /// Run to a terminal condition and classify the result.
    ///
    /// Spawns one task per philosopher, then drives the monitor on the
    /// calling task. Returns only after every philosopher task has been
    /// joined, so dropping the returned value tears down a quiet table.
    pub async fn run(self) -> Result<Outcome> {
        let config = self.state.config();
        tracing::info!(
            "simulation_started: philosophers={}, die={}ms, eat={}ms, sleep={}ms, required_meals={:?}",
            config.philosophers,
            config.time_to_die_ms,
            config.time_to_eat_ms,
            config.time_to_sleep_ms,
            config.required_meals,
        );

        let seats: Vec<Philosopher> = {
            let records = self.state.records()?;
            records
                .iter()
                .map(|record| Philosopher::new(record, self.state.clone(), self.reporter.clone()))
                .collect()
        };
        let tasks = seats
            .into_iter()
            .map(|seat| tokio::spawn(seat.run()))
            .collect();

        let monitor = Monitor::new(self.state.clone(), self.reporter.clone());
        let outcome = monitor.run_until_terminal(tasks).await?;

        tracing::info!("simulation_finished: outcome={:?}", outcome);
        Ok(outcome)
    }
}
