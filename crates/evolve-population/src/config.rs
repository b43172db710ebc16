//! Tunable parameters consumed by the population algorithms.
//!
//! These are read-only inputs supplied by the engine's configuration layer.
//! Fixed heuristic constants live next to the algorithm that uses them.

use serde::{Deserialize, Serialize};

/// Default probability that an organism mutates in a cycle.
pub const DEFAULT_MUTATION_RATE: f64 = 0.15;

/// Default upper bound on the live population.
pub const DEFAULT_MAX_POPULATION: usize = 50;

/// Default selection pressure.
pub const DEFAULT_SELECTION_PRESSURE: f64 = 0.3;

/// Parameters shared by the mutation, reproduction and selection passes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvolutionParams {
    /// Per-cycle mutation probability per organism. Also bounds the chance
    /// that an offspring gains a novel trait.
    pub mutation_rate: f64,
    /// Live population bound enforced by selection pressure.
    pub max_population: usize,
    /// Fraction of the population culled per cycle, scaled by 0.1.
    pub selection_pressure: f64,
}

impl Default for EvolutionParams {
    fn default() -> Self {
        Self {
            mutation_rate: DEFAULT_MUTATION_RATE,
            max_population: DEFAULT_MAX_POPULATION,
            selection_pressure: DEFAULT_SELECTION_PRESSURE,
        }
    }
}
