//! Engine state: the population, its RNG, and lifetime counters.
//!
//! [`EngineState`] is an explicit instance with its own stores, so several
//! engines can coexist (tests build one per case). Every stochastic step
//! draws from the injected [`StdRng`]; seeding it makes whole runs,
//! organism ids included, reproducible.
//!
//! Operations here are synchronous and return the events they produced.
//! Scheduling and event delivery belong to [`crate::runner`].

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use evolve_events::{EngineEvent, EvolutionStopped, OrganismMutated};
use evolve_population::{
    EmergentDetector, EvolutionParams, PopulationError, PopulationStore, compute_global_stats,
    mutation,
};
use evolve_types::{
    EngineStats, GlobalStats, Lineage, MutationOutcome, Organism, OrganismId, OrganismType,
};

/// The mutable engine state passed through the evolution cycle.
#[derive(Debug)]
pub struct EngineState {
    /// Live organisms and the lineage ledger.
    pub store: PopulationStore,
    /// Emergent behavior latches.
    pub detector: EmergentDetector,
    /// Tunable parameters.
    pub params: EvolutionParams,
    /// Random source for every stochastic step.
    pub rng: StdRng,
    /// Number of completed cycles.
    pub generation: u64,
    /// Mutations applied over the engine's lifetime, cycles and manual
    /// requests combined.
    pub total_mutations: u64,
    /// Statistics as of the last cycle (or seeding).
    pub global: GlobalStats,
}

impl EngineState {
    /// Create an engine. `seed` makes the run reproducible; `None` seeds
    /// from the operating system.
    pub fn new(params: EvolutionParams, seed: Option<u64>) -> Self {
        let rng = seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        Self::with_rng(params, rng)
    }

    /// Create an engine around a caller-supplied RNG.
    pub fn with_rng(params: EvolutionParams, rng: StdRng) -> Self {
        Self {
            store: PopulationStore::new(),
            detector: EmergentDetector::new(),
            params,
            rng,
            generation: 0,
            total_mutations: 0,
            global: GlobalStats::default(),
        }
    }

    /// Create one seed organism per seed type and refresh the statistics.
    ///
    /// Returns one `organism:created` event per seed, in seeding order.
    pub fn seed_population(&mut self) -> Result<Vec<EngineEvent>, PopulationError> {
        let mut events = Vec::with_capacity(OrganismType::SEED_TYPES.len());
        for organism_type in OrganismType::SEED_TYPES {
            let id = self.store.create(
                organism_type,
                None,
                self.params.mutation_rate,
                &mut self.rng,
            )?;
            if let Some(organism) = self.store.get(id) {
                events.push(EngineEvent::organism_created(organism));
            }
        }
        self.refresh_stats();
        info!(organisms = self.store.count(), "Population seeded");
        Ok(events)
    }

    /// Recompute [`GlobalStats`] for the current population.
    pub fn refresh_stats(&mut self) {
        self.global = compute_global_stats(&self.store, self.generation);
    }

    /// Mutate one live organism immediately, outside the cycle.
    ///
    /// Returns the outcome and its `organism:mutated` event, or `None` if
    /// `id` is not alive.
    pub fn trigger_mutation(&mut self, id: OrganismId) -> Option<(MutationOutcome, EngineEvent)> {
        let outcome = mutation::mutate(&mut self.store, id, &mut self.rng)?;
        self.total_mutations = self.total_mutations.saturating_add(1);
        let event = EngineEvent::OrganismMutated(OrganismMutated::from(&outcome));
        Some((outcome, event))
    }

    /// Engine statistics. `is_running` comes from the scheduler.
    pub fn stats(&self, is_running: bool) -> EngineStats {
        EngineStats {
            global: self.global.clone(),
            total_mutations: self.total_mutations,
            emergent_behaviors: self.detector.fired().to_vec(),
            is_running,
            total_lineages: self.store.lineage_count(),
        }
    }

    /// Snapshot of every live organism, in id order.
    pub fn all_organisms(&self) -> Vec<Organism> {
        self.store.all().cloned().collect()
    }

    /// Snapshot of one live organism.
    pub fn organism(&self, id: OrganismId) -> Option<Organism> {
        self.store.get(id).cloned()
    }

    /// Snapshot of any organism's lineage, live or dead.
    pub fn lineage(&self, id: OrganismId) -> Option<Lineage> {
        self.store.lineage(id).cloned()
    }

    /// Build the `evolution:stopped` event for the current counters.
    pub fn stopped_event(&self) -> EngineEvent {
        EngineEvent::EvolutionStopped(EvolutionStopped {
            timestamp: chrono::Utc::now(),
            final_generation: self.generation,
            total_mutations: self.total_mutations,
        })
    }
}
