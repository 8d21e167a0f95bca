//! Starvation and satisfaction monitoring.
//!
//! The monitor is the only writer of the termination flag. It polls the meal
//! records at a bounded interval, classifies the run, then joins every
//! philosopher task so nobody is still holding or requesting a fork when the
//! shared state is torn down. It never owns a fork lock itself.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::sim::reporter::Reporter;
use crate::sim::state::SimulationState;
use crate::types::Result;

/// Final classification of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// This philosopher went `time_to_die_ms` without starting a meal.
    Died(u32),
    /// Every philosopher reached the required meal count.
    AllSatisfied,
}

/// Poll cadence derived from the die-time, clamped so extreme configurations
/// can neither spin the monitor nor let it sleep through a starvation window.
fn poll_interval(time_to_die_ms: u64) -> Duration {
    Duration::from_micros((time_to_die_ms / 10).clamp(500, 5_000))
}

/// Watches the table for a terminal condition.
#[derive(Debug)]
pub struct Monitor {
    state: Arc<SimulationState>,
    reporter: Arc<dyn Reporter>,
}

impl Monitor {
    pub(crate) fn new(state: Arc<SimulationState>, reporter: Arc<dyn Reporter>) -> Self {
        Self { state, reporter }
    }

    /// Poll until the run is terminal, then join every philosopher task.
    ///
    /// Joining happens after the flag latches, so every seat has already been
    /// told to stop; a task that cannot be joined is fatal.
    pub(crate) async fn run_until_terminal(
        self,
        tasks: Vec<JoinHandle<Result<()>>>,
    ) -> Result<Outcome> {
        let interval = poll_interval(self.state.config().time_to_die_ms);

        let outcome = loop {
            if let Some(outcome) = self.evaluate()? {
                break outcome;
            }
            tokio::time::sleep(interval).await;
        };

        for task in tasks {
            task.await??;
        }
        Ok(outcome)
    }

    /// One pass over the records: death scan first, in seat order, then the
    /// satisfaction scan. Death wins when both hold in the same pass.
    fn evaluate(&self) -> Result<Option<Outcome>> {
        let now = self.state.clock().now_ms();
        let config = self.state.config();
        let records = self.state.records()?;

        let starved = records
            .iter()
            .find(|record| now.saturating_sub(record.last_meal_ms) >= config.time_to_die_ms)
            .map(|record| record.id);
        if let Some(id) = starved {
            self.state.finish();
            drop(records);
            // Emitted outside the state lock. The flag is already latched,
            // so no second death can ever be reported.
            self.reporter.emit(id, now, "died");
            return Ok(Some(Outcome::Died(id)));
        }

        if let Some(required) = config.required_meals {
            if records.iter().all(|record| record.meals_eaten >= required) {
                self.state.finish();
                return Ok(Some(Outcome::AllSatisfied));
            }
        }

        Ok(None)
    }
}
