//! # Dining Sim - Concurrent Philosophers Simulation
//!
//! Rust implementation of the dining-philosophers table providing:
//! - One preemptively scheduled task per philosopher (eat/sleep/think cycle)
//! - Parity-keyed fork acquisition order for deadlock avoidance
//! - An independent starvation monitor with a latched termination flag
//! - Timestamped status reporting with serialized, whole-line output
//!
//! ## Architecture
//!
//! ```text
//!   philosopher tasks ──┐            ┌── monitor task
//!    eat/sleep/think    │            │   death / satisfaction scans
//!                       ▼            ▼
//!          ┌────────────────────────────────────┐
//!          │          SimulationState           │
//!          │  meal records · forks · stop flag  │
//!          └────────────────────────────────────┘
//! ```
//!
//! A run terminates when the monitor observes either a starvation
//! ([`Outcome::Died`]) or every seat reaching its meal quota
//! ([`Outcome::AllSatisfied`]).

// Enforce strict safety at compile time
#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

// Re-export public API
pub mod sim;
pub mod types;

// Internal utilities
pub mod observability;

pub use sim::{Outcome, Simulation};
pub use types::{Error, Result, SimulationConfig};
