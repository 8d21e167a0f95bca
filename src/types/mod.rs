//! Core types for the simulation.
//!
//! This module provides foundational types used throughout the system:
//! - **Errors**: Application error types with thiserror derives
//! - **Config**: Immutable simulation parameters with validation

mod config;
mod errors;

pub use config::SimulationConfig;
pub use errors::{Error, Result};
