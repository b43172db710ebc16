//! Error types for the evolve-population crate.
//!
//! Population operations are total over missing ids (they return `None` or
//! empty results). The variants here cover the few cases where continuing
//! would break an invariant.

use evolve_types::OrganismId;

/// Errors that can occur while operating on the population.
#[derive(Debug, thiserror::Error)]
pub enum PopulationError {
    /// An offspring was requested for a parent that is not alive.
    #[error("parent organism not found in live population: {0}")]
    ParentNotFound(OrganismId),

    /// A counter would overflow.
    #[error("arithmetic overflow: {context}")]
    ArithmeticOverflow {
        /// Description of what was being computed.
        context: String,
    },
}
