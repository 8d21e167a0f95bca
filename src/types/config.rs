//! Configuration structures.
//!
//! The simulation takes its parameters up front and never changes them
//! mid-run: a table size, three timing budgets, and an optional meal quota.

use serde::{Deserialize, Serialize};

use crate::types::{Error, Result};

/// Immutable simulation parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of philosophers (and forks) at the table.
    pub philosophers: u32,

    /// How long a philosopher may go without starting a meal before dying.
    pub time_to_die_ms: u64,

    /// Duration of the eating phase.
    pub time_to_eat_ms: u64,

    /// Duration of the sleeping phase.
    pub time_to_sleep_ms: u64,

    /// Meals every philosopher must finish for the run to end in
    /// `AllSatisfied`. `None` runs unbounded, until a starvation.
    pub required_meals: Option<u32>,
}

impl SimulationConfig {
    /// Reject parameter combinations the core cannot run with.
    ///
    /// Called by the driver before any task is spawned; the core itself
    /// assumes a validated config.
    pub fn validate(&self) -> Result<()> {
        if self.philosophers < 1 {
            return Err(Error::configuration("philosophers must be at least 1"));
        }
        if self.time_to_die_ms == 0 || self.time_to_eat_ms == 0 || self.time_to_sleep_ms == 0 {
            return Err(Error::configuration(
                "time_to_die, time_to_eat and time_to_sleep must be positive",
            ));
        }
        if self.required_meals == Some(0) {
            return Err(Error::configuration(
                "required_meals must be positive when set",
            ));
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            philosophers: 5,
            time_to_die_ms: 800,
            time_to_eat_ms: 200,
            time_to_sleep_ms: 200,
            required_meals: None,
        }
    }
}
