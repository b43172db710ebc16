//! Population state and per-cycle algorithms for the Evolve engine.
//!
//! This crate is the logic layer for organisms -- everything that operates
//! on the population without touching timers or event delivery. It sits
//! between `evolve-types` (the data structures) and `evolve-core` (which
//! schedules cycles and publishes events).
//!
//! All stochastic operations take the caller's RNG, so a seeded engine
//! produces identical populations run after run.
//!
//! # Modules
//!
//! - [`config`] -- Tunable parameters shared by the passes ([`EvolutionParams`])
//! - [`diversity`] -- Simpson's diversity index and type distribution
//! - [`emergent`] -- One-shot emergent behavior latches ([`EmergentDetector`])
//! - [`error`] -- Error types for population operations ([`PopulationError`])
//! - [`genome`] -- Type baselines, starting genomes, trait and gene inheritance
//! - [`mutation`] -- Mutation kind selection and per-kind effects
//! - [`reproduction`] -- Parent eligibility and offspring creation
//! - [`roll`] -- Probability and clamping helpers
//! - [`selection`] -- Ranked culling under selection pressure
//! - [`stats`] -- Global population statistics
//! - [`store`] -- Live organisms and the lineage ledger ([`PopulationStore`])
//! - [`vitals`] -- Aging, energy decay, environmental stress

pub mod config;
pub mod diversity;
pub mod emergent;
pub mod error;
pub mod genome;
pub mod mutation;
pub mod reproduction;
pub mod roll;
pub mod selection;
pub mod stats;
pub mod store;
pub mod vitals;

// Re-export primary types at crate root for convenience.
pub use config::EvolutionParams;
pub use diversity::{diversity_index, simpson_index, type_distribution};
pub use emergent::{EmergentDetector, EmergentSignal, EvolvedOrganism};
pub use error::PopulationError;
pub use mutation::{MutationRoll, mutate, mutate_with, mutation_pass};
pub use reproduction::{is_eligible, reproduce, try_reproduce};
pub use selection::{apply_selection_pressure, removal_count};
pub use stats::compute_global_stats;
pub use store::PopulationStore;
pub use vitals::{StressReport, age_population, apply_environmental_stress, check_death};
