//! Asexual reproduction.
//!
//! Eligible parents (fit, energetic, mature) each get one chance per cycle
//! to produce an offspring of their own type. Reproduction never pushes
//! the live population past `max_population`.

use rand::Rng;
use tracing::debug;

use evolve_types::{Organism, OrganismId};

use crate::config::EvolutionParams;
use crate::error::PopulationError;
use crate::roll::{chance, floor_zero};
use crate::store::PopulationStore;

/// Minimum fitness (exclusive) to reproduce.
pub const MIN_PARENT_FITNESS: f64 = 0.6;

/// Minimum energy (exclusive) to reproduce.
pub const MIN_PARENT_ENERGY: f64 = 50.0;

/// Minimum age (exclusive) to reproduce.
pub const MIN_PARENT_AGE: u32 = 5;

/// Per-cycle probability that an eligible parent reproduces.
pub const REPRODUCTION_CHANCE: f64 = 0.1;

/// Energy a parent spends per offspring.
pub const REPRODUCTION_ENERGY_COST: f64 = 20.0;

/// Whether an organism may reproduce this cycle.
pub fn is_eligible(organism: &Organism) -> bool {
    organism.fitness > MIN_PARENT_FITNESS
        && organism.energy > MIN_PARENT_ENERGY
        && organism.age > MIN_PARENT_AGE
}

/// Ids of all currently eligible parents, in id order.
pub fn eligible_parents(store: &PopulationStore) -> Vec<OrganismId> {
    store
        .all()
        .filter(|o| is_eligible(o))
        .map(|o| o.id)
        .collect()
}

/// Roll the reproduction chance for a single parent and, on success,
/// create the offspring and charge the parent its energy cost.
///
/// Eligibility and the population cap are the caller's concern. Returns
/// `Ok(None)` when the roll fails or `parent` is not alive.
pub fn try_reproduce<R: Rng>(
    store: &mut PopulationStore,
    parent: OrganismId,
    novel_trait_chance: f64,
    rng: &mut R,
) -> Result<Option<OrganismId>, PopulationError> {
    let Some(organism_type) = store.get(parent).map(|p| p.organism_type) else {
        return Ok(None);
    };
    if !chance(rng, REPRODUCTION_CHANCE) {
        return Ok(None);
    }

    let child = store.create(organism_type, Some(parent), novel_trait_chance, rng)?;
    if let Some(p) = store.get_mut(parent) {
        p.energy = floor_zero(p.energy - REPRODUCTION_ENERGY_COST);
    }

    debug!(parent_id = %parent, child_id = %child, "Offspring born");
    Ok(Some(child))
}

/// Reproduction pass over the whole population.
///
/// Skipped entirely when the population is already at or above
/// `max_population`; otherwise every eligible parent (snapshotted at the
/// start of the pass) gets one roll, and the pass stops as soon as the cap
/// is reached. Returns the ids of the new offspring in birth order.
pub fn reproduce<R: Rng>(
    store: &mut PopulationStore,
    params: &EvolutionParams,
    rng: &mut R,
) -> Result<Vec<OrganismId>, PopulationError> {
    let mut offspring = Vec::new();
    if store.count() >= params.max_population {
        return Ok(offspring);
    }

    for parent in eligible_parents(store) {
        if store.count() >= params.max_population {
            break;
        }
        if let Some(child) = try_reproduce(store, parent, params.mutation_rate, rng)? {
            offspring.push(child);
        }
    }
    Ok(offspring)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use evolve_types::OrganismType;

    use super::*;

    fn make_eligible(store: &mut PopulationStore, id: OrganismId) {
        let org = store.get_mut(id).unwrap();
        org.fitness = 0.9;
        org.energy = 100.0;
        org.age = 10;
    }

    #[test]
    fn eligibility_thresholds_are_exclusive() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut store = PopulationStore::new();
        let id = store
            .create(OrganismType::AdaptiveLearner, None, 0.15, &mut rng)
            .unwrap();
        make_eligible(&mut store, id);
        assert!(is_eligible(store.get(id).unwrap()));

        store.get_mut(id).unwrap().age = MIN_PARENT_AGE;
        assert!(!is_eligible(store.get(id).unwrap()));

        make_eligible(&mut store, id);
        store.get_mut(id).unwrap().energy = MIN_PARENT_ENERGY;
        assert!(!is_eligible(store.get(id).unwrap()));

        make_eligible(&mut store, id);
        store.get_mut(id).unwrap().fitness = MIN_PARENT_FITNESS;
        assert!(!is_eligible(store.get(id).unwrap()));
    }

    #[test]
    fn thousand_trials_yield_about_one_hundred_offspring() {
        let mut rng = StdRng::seed_from_u64(2024);
        let mut store = PopulationStore::new();
        let parent = store
            .create(OrganismType::InfrastructureBuilder, None, 0.15, &mut rng)
            .unwrap();

        let mut born = Vec::new();
        for _ in 0..1000 {
            make_eligible(&mut store, parent);
            if let Some(child) = try_reproduce(&mut store, parent, 0.15, &mut rng).unwrap() {
                born.push(child);
            }
        }

        // Binomial(1000, 0.1): mean 100, sd ~9.5.
        assert!((60..=140).contains(&born.len()), "born {}", born.len());
        for child in &born {
            let org = store.get(*child).unwrap();
            assert_eq!(org.generation, 2);
            assert_eq!(org.parent_id, Some(parent));
            assert_eq!(org.organism_type, OrganismType::InfrastructureBuilder);
        }
        assert_eq!(store.lineage(parent).unwrap().descendants, born);
    }

    #[test]
    fn parent_pays_energy() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut store = PopulationStore::new();
        let parent = store
            .create(OrganismType::DataProcessor, None, 0.0, &mut rng)
            .unwrap();
        make_eligible(&mut store, parent);

        let child = loop {
            if let Some(child) = try_reproduce(&mut store, parent, 0.0, &mut rng).unwrap() {
                break child;
            }
        };
        let p = store.get(parent).unwrap();
        assert!((p.energy - (100.0 - REPRODUCTION_ENERGY_COST)).abs() < f64::EPSILON);
        assert!(store.get(child).is_some());
    }

    #[test]
    fn pass_is_skipped_at_capacity() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut store = PopulationStore::new();
        for t in OrganismType::SEED_TYPES {
            let id = store.create(t, None, 0.15, &mut rng).unwrap();
            make_eligible(&mut store, id);
        }
        let params = EvolutionParams {
            max_population: 5,
            ..EvolutionParams::default()
        };
        for _ in 0..50 {
            assert!(reproduce(&mut store, &params, &mut rng).unwrap().is_empty());
        }
        assert_eq!(store.count(), 5);
    }

    #[test]
    fn pass_never_exceeds_cap() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut store = PopulationStore::new();
        for _ in 0..20 {
            let id = store
                .create(OrganismType::Generic, None, 0.0, &mut rng)
                .unwrap();
            make_eligible(&mut store, id);
        }
        let params = EvolutionParams {
            max_population: 22,
            ..EvolutionParams::default()
        };
        for _ in 0..100 {
            let _ = reproduce(&mut store, &params, &mut rng).unwrap();
            assert!(store.count() <= 22);
        }
    }

    #[test]
    fn ineligible_population_never_reproduces() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut store = PopulationStore::new();
        for t in OrganismType::SEED_TYPES {
            let _ = store.create(t, None, 0.15, &mut rng).unwrap();
        }
        // Fresh seeds are age 0.
        let params = EvolutionParams::default();
        assert!(reproduce(&mut store, &params, &mut rng).unwrap().is_empty());
    }
}
