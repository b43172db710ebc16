//! Shared type definitions for the Evolve population-dynamics engine.
//!
//! This crate is the single source of truth for the entity model used
//! across the workspace. Types flow downstream to `TypeScript` via `ts-rs`
//! for the external dashboard.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrapper for organism identifiers
//! - [`enums`] -- Organism kinds, mutation kinds, causes of death, emergent behaviors
//! - [`structs`] -- Organisms, genes, lineages, mutation results, statistics

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{DeathCause, EmergentBehavior, MutationKind, OrganismStatus, OrganismType};
pub use ids::OrganismId;
pub use structs::{
    DeathRecord, EngineStats, Gene, GlobalStats, Lineage, MutationEffect, MutationOutcome,
    MutationRecord, Organism,
};
