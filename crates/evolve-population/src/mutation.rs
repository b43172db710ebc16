//! Mutation selection and effects.
//!
//! A mutation picks one [`MutationKind`] uniformly at random, rolls a
//! magnitude in `[0.05, 0.15)` with a 70% chance of being positive, and
//! applies the kind's effect function to a single organism. Bounded fields
//! are clamped, never rejected.
//!
//! Dispatch goes through [`effect_for`], which maps each kind to a plain
//! function over one organism. There is no cross-organism interaction.

use chrono::Utc;
use rand::seq::IndexedRandom;
use rand::{Rng, RngCore};

use evolve_types::{MutationEffect, MutationKind, MutationOutcome, MutationRecord, Organism, OrganismId};

use crate::genome;
use crate::roll::{chance, clamp_unit, floor_zero};
use crate::store::PopulationStore;

/// Lower bound (inclusive) of a mutation's magnitude.
pub const MIN_MAGNITUDE: f64 = 0.05;

/// Upper bound (exclusive) of a mutation's magnitude.
pub const MAX_MAGNITUDE: f64 = 0.15;

/// Probability that a mutation roll is positive.
pub const POSITIVE_BIAS: f64 = 0.7;

/// Trait count at which trait modification stops adding traits.
pub const MAX_TRAITS: usize = 10;

/// Magnitude and sign of a single mutation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MutationRoll {
    /// Unsigned magnitude in `[MIN_MAGNITUDE, MAX_MAGNITUDE)`.
    pub magnitude: f64,
    /// Whether the effect pushes the field upwards.
    pub positive: bool,
}

impl MutationRoll {
    /// Draw a roll with the standard magnitude range and positive bias.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            magnitude: rng.random_range(MIN_MAGNITUDE..MAX_MAGNITUDE),
            positive: chance(rng, POSITIVE_BIAS),
        }
    }

    /// Magnitude with its sign applied.
    pub fn signed(self) -> f64 {
        if self.positive {
            self.magnitude
        } else {
            -self.magnitude
        }
    }
}

/// Pick a mutation kind uniformly at random.
pub fn choose_kind<R: Rng + ?Sized>(rng: &mut R) -> MutationKind {
    MutationKind::ALL
        .choose(rng)
        .copied()
        .unwrap_or(MutationKind::ComplexityIncrease)
}

/// Signature shared by all effect functions.
pub type EffectFn = fn(&mut Organism, MutationRoll, &mut dyn RngCore) -> MutationEffect;

/// Dispatch table from mutation kind to effect function.
pub const fn effect_for(kind: MutationKind) -> EffectFn {
    match kind {
        MutationKind::GeneExpressionChange => gene_expression_change,
        MutationKind::ConsciousnessBoost => consciousness_boost,
        MutationKind::FitnessAdjustment => fitness_adjustment,
        MutationKind::TraitModification => trait_modification,
        MutationKind::ComplexityIncrease => complexity_increase,
    }
}

/// Shift one randomly chosen gene's expression.
///
/// An organism without genes falls back to a complexity change.
fn gene_expression_change(
    organism: &mut Organism,
    roll: MutationRoll,
    rng: &mut dyn RngCore,
) -> MutationEffect {
    let names: Vec<String> = organism.genes.keys().cloned().collect();
    let Some(name) = names.choose(rng) else {
        return complexity_increase(organism, roll, rng);
    };
    let Some(current) = organism.genes.get_mut(name) else {
        return complexity_increase(organism, roll, rng);
    };
    *current = genome::gene(current.expression + roll.signed());
    MutationEffect::GeneExpressionChange {
        gene: name.clone(),
        expression: current.expression,
        active: current.active,
    }
}

fn consciousness_boost(
    organism: &mut Organism,
    roll: MutationRoll,
    _rng: &mut dyn RngCore,
) -> MutationEffect {
    organism.consciousness = clamp_unit(organism.consciousness + roll.signed());
    MutationEffect::ConsciousnessBoost {
        consciousness: organism.consciousness,
    }
}

fn fitness_adjustment(
    organism: &mut Organism,
    roll: MutationRoll,
    _rng: &mut dyn RngCore,
) -> MutationEffect {
    organism.fitness = clamp_unit(organism.fitness + roll.signed());
    MutationEffect::FitnessAdjustment {
        fitness: organism.fitness,
    }
}

/// Add a novel trait. Never removes one.
///
/// Only applies on a positive roll while the organism holds fewer than
/// [`MAX_TRAITS`]; otherwise reports the unchanged count.
fn trait_modification(
    organism: &mut Organism,
    roll: MutationRoll,
    rng: &mut dyn RngCore,
) -> MutationEffect {
    let mut added_trait = None;
    if roll.positive
        && organism.traits.len() < MAX_TRAITS
        && let Some(novel) = genome::pick_novel_trait(&organism.traits, rng)
    {
        organism.traits.insert(novel.clone());
        added_trait = Some(novel);
    }
    MutationEffect::TraitModification {
        added_trait,
        trait_count: organism.traits.len(),
    }
}

fn complexity_increase(
    organism: &mut Organism,
    roll: MutationRoll,
    _rng: &mut dyn RngCore,
) -> MutationEffect {
    organism.complexity = floor_zero(organism.complexity + roll.signed());
    MutationEffect::ComplexityIncrease {
        complexity: organism.complexity,
    }
}

/// Apply a specific mutation to an organism.
///
/// Increments `mutation_count` and runs the kind's effect. Does not touch
/// the lineage; see [`mutate_with`] for the store-level operation.
pub fn apply_mutation<R: Rng>(
    organism: &mut Organism,
    kind: MutationKind,
    roll: MutationRoll,
    rng: &mut R,
) -> MutationEffect {
    organism.mutation_count = organism.mutation_count.saturating_add(1);
    effect_for(kind)(organism, roll, rng)
}

/// Mutate a live organism with a randomly chosen kind and roll.
///
/// Returns `None` if `id` is not alive.
pub fn mutate<R: Rng>(
    store: &mut PopulationStore,
    id: OrganismId,
    rng: &mut R,
) -> Option<MutationOutcome> {
    let kind = choose_kind(rng);
    let roll = MutationRoll::sample(rng);
    mutate_with(store, id, kind, roll, rng)
}

/// Mutate a live organism with an explicit kind and roll, and append the
/// result to its lineage log.
///
/// Returns `None` if `id` is not alive.
pub fn mutate_with<R: Rng>(
    store: &mut PopulationStore,
    id: OrganismId,
    kind: MutationKind,
    roll: MutationRoll,
    rng: &mut R,
) -> Option<MutationOutcome> {
    let organism = store.get_mut(id)?;
    let effect = apply_mutation(organism, kind, roll, rng);

    let outcome = MutationOutcome {
        organism_id: id,
        mutation_type: kind,
        magnitude: roll.magnitude,
        positive: roll.positive,
        result: effect.clone(),
        new_fitness: organism.fitness,
        new_consciousness: organism.consciousness,
        generation: organism.generation,
        mutation_count: organism.mutation_count,
    };

    let record = MutationRecord {
        kind,
        result: effect,
        generation: outcome.generation,
        timestamp: Utc::now(),
    };
    store.record_mutation(id, record);

    tracing::debug!(
        organism_id = %id,
        kind = %kind,
        magnitude = roll.magnitude,
        positive = roll.positive,
        "Organism mutated"
    );
    Some(outcome)
}

/// Mutation pass: every live organism mutates independently with
/// probability `mutation_rate`.
pub fn mutation_pass<R: Rng>(
    store: &mut PopulationStore,
    mutation_rate: f64,
    rng: &mut R,
) -> Vec<MutationOutcome> {
    let mut outcomes = Vec::new();
    for id in store.ids() {
        if chance(rng, mutation_rate)
            && let Some(outcome) = mutate(store, id, rng)
        {
            outcomes.push(outcome);
        }
    }
    outcomes
}
