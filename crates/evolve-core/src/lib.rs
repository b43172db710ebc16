//! Engine state, evolution cycle, and scheduling for the Evolve engine.
//!
//! This crate owns the cycle that drives the population: vitals, mutation,
//! reproduction, selection, statistics, and emergence, run on a fixed
//! interval by an async scheduler.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `evolve-config.yaml` into
//!   strongly-typed structs.
//! - [`cycle`] -- The phase loop for a single cycle.
//! - [`engine`] -- [`EngineState`]: population, RNG, and lifetime counters.
//! - [`runner`] -- [`EvolutionService`]: start/stop scheduling, queries,
//!   manual mutation, and event subscription.
//!
//! [`EngineState`]: engine::EngineState
//! [`EvolutionService`]: runner::EvolutionService

pub mod config;
pub mod cycle;
pub mod engine;
pub mod runner;

pub use config::{ConfigError, EvolveConfig};
pub use cycle::{CycleError, CycleSummary, run_cycle};
pub use engine::EngineState;
pub use runner::{EvolutionService, SchedulerConfig};
