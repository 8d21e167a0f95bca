//! Shared simulation state.
//!
//! One `SimulationState` is created per run and handed to every task behind
//! an `Arc`. Meal records live behind a single state lock; forks are
//! independent async mutexes indexed by ring position, deliberately outside
//! the guarded records so fork contention never serializes on the state lock.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio_util::sync::CancellationToken;

use crate::sim::clock::TimeSource;
use crate::types::{Error, Result, SimulationConfig};

/// Per-philosopher meal bookkeeping.
///
/// Written only by the owning philosopher's task and read by the monitor;
/// both sides go through the state lock so a `(last_meal_ms, meals_eaten)`
/// pair can never tear.
#[derive(Debug, Clone)]
pub struct PhilosopherRecord {
    /// Seat number, 1..=philosophers, stable for the whole run.
    pub id: u32,
    /// Ring position of the fork on this philosopher's left: `id - 1`.
    pub left_fork: usize,
    /// Ring position of the fork on this philosopher's right: `id % n`.
    pub right_fork: usize,
    /// When this philosopher last started a meal, ms from simulation start.
    pub last_meal_ms: u64,
    /// Completed meal count, monotonically increasing.
    pub meals_eaten: u32,
}

impl PhilosopherRecord {
    fn new(id: u32, philosophers: u32, start_ms: u64) -> Self {
        Self {
            id,
            left_fork: (id - 1) as usize,
            right_fork: (id % philosophers) as usize,
            last_meal_ms: start_ms,
            meals_eaten: 0,
        }
    }
}

/// Shared state for one simulation run.
///
/// Created once at startup and dropped after the monitor has joined every
/// philosopher task; nothing in it is created or destroyed mid-run.
#[derive(Debug)]
pub struct SimulationState {
    config: SimulationConfig,
    clock: Arc<dyn TimeSource>,
    /// Latched termination flag: cancelled at most once, never reverts.
    shutdown: CancellationToken,
    /// Meal records, guarded by the one state lock. The lock is always the
    /// innermost lock taken and is never held across an await point.
    records: Mutex<Vec<PhilosopherRecord>>,
    /// One exclusive fork per seat. A table for one gets a single degenerate
    /// fork that both of that philosopher's hands point at.
    forks: Vec<tokio::sync::Mutex<()>>,
}

impl SimulationState {
    /// Set the table: N records with `last_meal_ms` at the current clock
    /// reading, and N fork locks.
    pub fn new(config: SimulationConfig, clock: Arc<dyn TimeSource>) -> Self {
        let start_ms = clock.now_ms();
        let n = config.philosophers;
        let records = (1..=n)
            .map(|id| PhilosopherRecord::new(id, n, start_ms))
            .collect();
        let forks = (0..n).map(|_| tokio::sync::Mutex::new(())).collect();
        Self {
            config,
            clock,
            shutdown: CancellationToken::new(),
            records: Mutex::new(records),
            forks,
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn clock(&self) -> &dyn TimeSource {
        self.clock.as_ref()
    }

    /// The fork lock at ring position `index`.
    pub(crate) fn fork(&self, index: usize) -> &tokio::sync::Mutex<()> {
        &self.forks[index]
    }

    /// True once a terminal condition has been observed.
    pub fn is_finished(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// Latch the termination flag. Idempotent; the flag never reverts.
    pub(crate) fn finish(&self) {
        self.shutdown.cancel();
    }

    /// Cancellation handle used by responsive waits and fork acquisition.
    pub(crate) fn shutdown(&self) -> &CancellationToken {
        &self.shutdown
    }

    /// Lock the meal records. Poisoning means a philosopher task panicked
    /// mid-update, which is fatal to the run.
    pub(crate) fn records(&self) -> Result<MutexGuard<'_, Vec<PhilosopherRecord>>> {
        self.records
            .lock()
            .map_err(|_| Error::resource_acquisition("state lock poisoned"))
    }

    /// Mark `id` as starting a meal right now: refresh `last_meal_ms` and
    /// bump `meals_eaten` in one critical section.
    pub(crate) fn record_meal(&self, id: u32) -> Result<()> {
        let now = self.clock.now_ms();
        let mut records = self.records()?;
        if let Some(record) = records.get_mut((id - 1) as usize) {
            record.last_meal_ms = now;
            record.meals_eaten += 1;
        }
        Ok(())
    }
}
