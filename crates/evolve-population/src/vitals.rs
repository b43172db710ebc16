//! Aging, energy decay, and environmental stress.

use rand::Rng;

use evolve_types::{DeathCause, Organism};

use crate::roll::{chance, floor_zero};
use crate::store::PopulationStore;

/// Organisms older than this die of natural causes.
pub const MAX_AGE: u32 = 100;

/// Energy every organism loses per cycle.
pub const ENERGY_DECAY_PER_CYCLE: f64 = 1.0;

/// Upper bound (exclusive) of the per-cycle stress probability.
pub const MAX_STRESS: f64 = 0.1;

/// Fitness lost by a stressed organism.
pub const STRESS_FITNESS_PENALTY: f64 = 0.05;

/// Energy lost by a stressed organism.
pub const STRESS_ENERGY_PENALTY: f64 = 5.0;

/// Whether an organism has reached a natural death condition.
pub fn check_death(organism: &Organism) -> bool {
    organism.age > MAX_AGE || organism.energy <= 0.0
}

/// Age every live organism by one cycle and drain its energy, then remove
/// those that died with cause `natural_death`.
///
/// Returns the removed records in id order.
pub fn age_population(store: &mut PopulationStore) -> Vec<Organism> {
    let mut dying = Vec::new();
    for organism in store.all_mut() {
        organism.age = organism.age.saturating_add(1);
        organism.energy = floor_zero(organism.energy - ENERGY_DECAY_PER_CYCLE);
        if check_death(organism) {
            dying.push(organism.id);
        }
    }

    dying
        .into_iter()
        .filter_map(|id| store.remove(id, DeathCause::NaturalDeath))
        .collect()
}

/// Outcome of one environmental stress roll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StressReport {
    /// Stress probability drawn for this cycle.
    pub stress: f64,
    /// Number of organisms that took the penalty.
    pub affected: usize,
}

/// Draw a stress level in `[0, MAX_STRESS)` and penalize each organism
/// independently with that probability.
pub fn apply_environmental_stress<R: Rng>(store: &mut PopulationStore, rng: &mut R) -> StressReport {
    let stress = rng.random_range(0.0..MAX_STRESS);
    let mut affected = 0_usize;
    for organism in store.all_mut() {
        if chance(rng, stress) {
            organism.fitness = floor_zero(organism.fitness - STRESS_FITNESS_PENALTY);
            organism.energy = floor_zero(organism.energy - STRESS_ENERGY_PENALTY);
            affected = affected.saturating_add(1);
        }
    }
    StressReport { stress, affected }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use evolve_types::OrganismType;

    use super::*;

    #[test]
    fn aging_advances_and_drains() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut store = PopulationStore::new();
        let id = store
            .create(OrganismType::Generic, None, 0.0, &mut rng)
            .unwrap();

        assert!(age_population(&mut store).is_empty());
        let org = store.get(id).unwrap();
        assert_eq!(org.age, 1);
        assert!((org.energy - 99.0).abs() < f64::EPSILON);
    }

    #[test]
    fn exhausted_organism_dies_naturally() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut store = PopulationStore::new();
        let doomed = store
            .create(OrganismType::DataProcessor, None, 0.0, &mut rng)
            .unwrap();
        let survivor = store
            .create(OrganismType::DataProcessor, None, 0.0, &mut rng)
            .unwrap();
        store.get_mut(doomed).unwrap().energy = 1.0;

        let dead = age_population(&mut store);
        assert_eq!(dead.len(), 1);
        assert_eq!(dead[0].id, doomed);
        assert_eq!(dead[0].death_cause, Some(DeathCause::NaturalDeath));
        assert!(dead[0].energy.abs() < f64::EPSILON);

        assert!(store.all().all(|o| o.id != doomed));
        assert!(store.get(survivor).is_some());
        let lineage = store.lineage(doomed).unwrap();
        assert_eq!(
            lineage.death.as_ref().map(|d| d.cause),
            Some(DeathCause::NaturalDeath)
        );
    }

    #[test]
    fn old_age_kills() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut store = PopulationStore::new();
        let id = store
            .create(OrganismType::Generic, None, 0.0, &mut rng)
            .unwrap();
        store.get_mut(id).unwrap().age = MAX_AGE;

        let dead = age_population(&mut store);
        assert_eq!(dead.len(), 1);
        assert_eq!(dead[0].age, MAX_AGE + 1);
    }

    #[test]
    fn stress_penalties_are_floored() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut store = PopulationStore::new();
        for _ in 0..30 {
            let id = store
                .create(OrganismType::Generic, None, 0.0, &mut rng)
                .unwrap();
            let org = store.get_mut(id).unwrap();
            org.fitness = 0.01;
            org.energy = 2.0;
        }
        for _ in 0..200 {
            let report = apply_environmental_stress(&mut store, &mut rng);
            assert!((0.0..MAX_STRESS).contains(&report.stress));
            assert!(report.affected <= store.count());
        }
        for org in store.all() {
            assert!(org.fitness >= 0.0);
            assert!(org.energy >= 0.0);
        }
        // With 6000 rolls at ~5%, someone was hit.
        assert!(store.all().any(|o| o.fitness.abs() < f64::EPSILON));
    }
}
