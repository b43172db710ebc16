//! Evolution cycle: the phase loop that advances the population one step.
//!
//! Each cycle runs these phases in order:
//!
//! 1. **Vitals** -- age every organism, drain energy, remove natural
//!    deaths, then apply one round of environmental stress.
//! 2. **Mutation** -- each survivor mutates with probability
//!    `mutation_rate`.
//! 3. **Reproduction** -- eligible parents may produce offspring while the
//!    population is under its cap.
//! 4. **Selection** -- cull the least fit down towards the cap.
//! 5. **Statistics** -- bump the generation counter and recompute
//!    [`GlobalStats`].
//! 6. **Emergence** -- check the one-shot emergent behavior latches.
//!
//! The cycle never publishes anything itself. It returns a
//! [`CycleSummary`] carrying the events in the order they happened,
//! closed by `evolution:cycle_complete`.
//!
//! [`GlobalStats`]: evolve_types::GlobalStats

use chrono::Utc;
use tracing::{debug, info};

use evolve_events::{
    CycleComplete, EmergentBehaviorDetected, EngineEvent, OrganismDied, OrganismEvolved,
    OrganismMutated,
};
use evolve_population::{
    EmergentSignal, PopulationError, StressReport, apply_environmental_stress,
    apply_selection_pressure, mutation_pass, reproduce, vitals,
};
use evolve_types::{DeathCause, EmergentBehavior, Organism};

use crate::engine::EngineState;

/// Errors that can occur during cycle execution.
#[derive(Debug, thiserror::Error)]
pub enum CycleError {
    /// Reproduction failed part way through the cycle.
    ///
    /// Vitals and mutation have already been applied; `events` holds what
    /// they produced so observers stay in step with the state.
    #[error("population error: {source}")]
    Population {
        /// The underlying population error.
        source: PopulationError,
        /// Events produced before the failure, in order.
        events: Vec<EngineEvent>,
    },

    /// The generation counter would overflow.
    #[error("generation counter overflow after cycle {generation}")]
    GenerationOverflow {
        /// Last completed generation.
        generation: u64,
    },
}

impl CycleError {
    /// Events produced before the cycle failed. Empty when nothing ran.
    pub fn events(&self) -> &[EngineEvent] {
        match self {
            Self::Population { events, .. } => events,
            Self::GenerationOverflow { .. } => &[],
        }
    }
}

/// Summary of a single cycle's execution.
#[derive(Debug, Clone)]
pub struct CycleSummary {
    /// The cycle number that was executed.
    pub generation: u64,
    /// Live organisms at the end of the cycle.
    pub organism_count: usize,
    /// Organisms removed by aging or energy exhaustion.
    pub natural_deaths: usize,
    /// Organisms removed by selection pressure.
    pub selection_deaths: usize,
    /// Offspring born this cycle.
    pub births: usize,
    /// Mutations applied this cycle.
    pub mutations: usize,
    /// The stress roll for this cycle.
    pub stress: StressReport,
    /// Emergent behaviors that fired this cycle.
    pub emergent: Vec<EmergentBehavior>,
    /// Events produced, in order, ending with `evolution:cycle_complete`.
    pub events: Vec<EngineEvent>,
}

/// Execute one complete cycle.
///
/// # Errors
///
/// Returns [`CycleError`] if offspring creation fails or the generation
/// counter would overflow. State changes made by earlier phases are kept,
/// and their events travel with the error.
pub fn run_cycle(state: &mut EngineState) -> Result<CycleSummary, CycleError> {
    let next_generation =
        state
            .generation
            .checked_add(1)
            .ok_or(CycleError::GenerationOverflow {
                generation: state.generation,
            })?;
    let mut events = Vec::new();

    // --- Phase 1: Vitals ---
    let (natural_deaths, stress) = phase_vitals(state, &mut events);

    // --- Phase 2: Mutation ---
    let mutations = phase_mutation(state, &mut events);

    // --- Phase 3: Reproduction ---
    let births = match phase_reproduction(state, &mut events) {
        Ok(births) => births,
        Err(source) => return Err(CycleError::Population { source, events }),
    };

    // --- Phase 4: Selection ---
    let selection_deaths = phase_selection(state, &mut events);

    // --- Phase 5: Statistics ---
    state.generation = next_generation;
    state.refresh_stats();

    // --- Phase 6: Emergence ---
    let emergent = phase_emergence(state, &mut events);

    events.push(EngineEvent::CycleComplete(CycleComplete {
        generation: state.generation,
        organism_count: state.global.total_organisms,
        average_fitness: state.global.average_fitness,
        total_mutations: state.total_mutations,
        timestamp: Utc::now(),
    }));

    info!(
        generation = state.generation,
        organisms = state.global.total_organisms,
        births,
        natural_deaths,
        selection_deaths,
        mutations,
        average_fitness = state.global.average_fitness,
        diversity = state.global.diversity_index,
        "Cycle complete"
    );

    Ok(CycleSummary {
        generation: state.generation,
        organism_count: state.global.total_organisms,
        natural_deaths,
        selection_deaths,
        births,
        mutations,
        stress,
        emergent,
        events,
    })
}

fn death_events(dead: &[Organism], cause: DeathCause, events: &mut Vec<EngineEvent>) {
    events.extend(
        dead.iter()
            .map(|o| EngineEvent::OrganismDied(OrganismDied::new(o, cause))),
    );
}

fn phase_vitals(state: &mut EngineState, events: &mut Vec<EngineEvent>) -> (usize, StressReport) {
    let dead = vitals::age_population(&mut state.store);
    death_events(&dead, DeathCause::NaturalDeath, events);

    let stress = apply_environmental_stress(&mut state.store, &mut state.rng);
    debug!(
        stress = stress.stress,
        affected = stress.affected,
        "Environmental stress applied"
    );
    (dead.len(), stress)
}

fn phase_mutation(state: &mut EngineState, events: &mut Vec<EngineEvent>) -> usize {
    let outcomes = mutation_pass(&mut state.store, state.params.mutation_rate, &mut state.rng);
    let applied = u64::try_from(outcomes.len()).unwrap_or(u64::MAX);
    state.total_mutations = state.total_mutations.saturating_add(applied);
    events.extend(
        outcomes
            .iter()
            .map(|o| EngineEvent::OrganismMutated(OrganismMutated::from(o))),
    );
    outcomes.len()
}

fn phase_reproduction(
    state: &mut EngineState,
    events: &mut Vec<EngineEvent>,
) -> Result<usize, PopulationError> {
    let offspring = reproduce(&mut state.store, &state.params, &mut state.rng)?;
    events.extend(
        offspring
            .iter()
            .filter_map(|id| state.store.get(*id))
            .map(EngineEvent::organism_created),
    );
    Ok(offspring.len())
}

fn phase_selection(state: &mut EngineState, events: &mut Vec<EngineEvent>) -> usize {
    let culled = apply_selection_pressure(&mut state.store, &state.params);
    death_events(&culled, DeathCause::SelectionPressure, events);
    culled.len()
}

fn phase_emergence(state: &mut EngineState, events: &mut Vec<EngineEvent>) -> Vec<EmergentBehavior> {
    let signals = state.detector.check(&state.store);
    let generation = state.generation;
    signals
        .into_iter()
        .map(|signal| {
            let behavior = signal.behavior;
            emergent_events(signal, generation, events);
            behavior
        })
        .collect()
}

fn emergent_events(signal: EmergentSignal, generation: u64, events: &mut Vec<EngineEvent>) {
    let evolved = signal.evolved.map(|e| OrganismEvolved {
        organism_id: e.organism_id,
        organism_type: e.organism_type,
        traits: e.traits,
        generation,
    });
    if let Some(evolved) = &evolved {
        events.push(EngineEvent::OrganismEvolved(evolved.clone()));
    }
    events.push(EngineEvent::EmergentBehaviorDetected(
        EmergentBehaviorDetected {
            behavior: signal.behavior,
            description: signal.behavior.description().to_owned(),
            generation,
            organism_count: signal.organism_count,
            evolved_organism: evolved,
        },
    ));
}
