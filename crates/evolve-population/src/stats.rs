//! Population-wide statistics.

use evolve_types::GlobalStats;

use crate::diversity::{simpson_index, type_distribution};
use crate::store::PopulationStore;

/// Recompute [`GlobalStats`] from the live population.
///
/// `generation` is the number of completed cycles. Averages are 0 for an
/// empty population.
pub fn compute_global_stats(store: &PopulationStore, generation: u64) -> GlobalStats {
    let total = store.count();
    let distribution = type_distribution(store.all());

    let mut fitness = 0.0;
    let mut consciousness = 0.0;
    let mut complexity = 0.0;
    let mut highest_generation = 0_u32;
    for organism in store.all() {
        fitness += organism.fitness;
        consciousness += organism.consciousness;
        complexity += organism.complexity;
        highest_generation = highest_generation.max(organism.generation);
    }

    #[allow(clippy::cast_precision_loss)]
    let mean = |sum: f64| if total == 0 { 0.0 } else { sum / total as f64 };

    GlobalStats {
        generation,
        total_organisms: total,
        average_fitness: mean(fitness),
        average_consciousness: mean(consciousness),
        average_complexity: mean(complexity),
        diversity_index: simpson_index(&distribution),
        highest_generation,
        type_distribution: distribution,
    }
}
