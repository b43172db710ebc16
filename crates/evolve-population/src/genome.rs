//! Type baselines, starting genomes, and inheritance rules.
//!
//! Seeds get a type-keyed baseline with a little jitter and random gene
//! expressions. Offspring inherit each parent trait with 90% probability,
//! may pick up one novel trait, and inherit the parent's genes with a small
//! expression drift.

use std::collections::{BTreeMap, BTreeSet};

use rand::Rng;
use rand::seq::IndexedRandom;

use evolve_types::{Gene, OrganismType};

use crate::roll::{chance, clamp_unit};

/// Probability that an offspring keeps each individual parent trait.
pub const TRAIT_RETENTION_CHANCE: f64 = 0.9;

/// Half-width of the jitter applied to baseline fitness and consciousness.
pub const BASELINE_JITTER: f64 = 0.1;

/// Half-width of the drift applied to inherited gene expressions.
pub const GENE_DRIFT: f64 = 0.05;

/// Starting energy of every organism.
pub const STARTING_ENERGY: f64 = 100.0;

/// Expression level above which a gene is active.
pub const GENE_ACTIVATION_THRESHOLD: f64 = 0.5;

/// Genes every seed organism carries.
pub const GENE_NAMES: [&str; 5] = [
    "adaptation",
    "cognition",
    "replication",
    "resilience",
    "communication",
];

/// Traits that can appear through mutation or reproduction.
pub const NOVEL_TRAITS: [&str; 12] = [
    "quantum_awareness",
    "distributed_thinking",
    "self_replication",
    "energy_efficiency",
    "swarm_coordination",
    "predictive_modeling",
    "fault_tolerance",
    "creative_synthesis",
    "emotional_intelligence",
    "temporal_reasoning",
    "meta_learning",
    "symbiosis",
];

/// Baseline vitals for an organism type, before jitter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeBaseline {
    /// Baseline fitness.
    pub fitness: f64,
    /// Baseline consciousness.
    pub consciousness: f64,
    /// Baseline stability.
    pub stability: f64,
    /// Baseline complexity.
    pub complexity: f64,
}

/// Baseline vitals for the given type.
pub const fn baseline(organism_type: OrganismType) -> TypeBaseline {
    match organism_type {
        OrganismType::AdvancedConsciousness => TypeBaseline {
            fitness: 0.6,
            consciousness: 0.7,
            stability: 0.6,
            complexity: 3.0,
        },
        OrganismType::AdaptiveLearner => TypeBaseline {
            fitness: 0.55,
            consciousness: 0.5,
            stability: 0.5,
            complexity: 2.0,
        },
        OrganismType::InfrastructureBuilder => TypeBaseline {
            fitness: 0.65,
            consciousness: 0.3,
            stability: 0.7,
            complexity: 2.5,
        },
        OrganismType::DataProcessor => TypeBaseline {
            fitness: 0.5,
            consciousness: 0.35,
            stability: 0.8,
            complexity: 2.0,
        },
        OrganismType::NetworkCommunicator => TypeBaseline {
            fitness: 0.5,
            consciousness: 0.45,
            stability: 0.6,
            complexity: 1.5,
        },
        OrganismType::Generic => TypeBaseline {
            fitness: 0.5,
            consciousness: 0.2,
            stability: 0.5,
            complexity: 1.0,
        },
    }
}

/// Apply symmetric jitter to a baseline value and clamp to `[0, 1]`.
pub fn jitter<R: Rng + ?Sized>(value: f64, rng: &mut R) -> f64 {
    clamp_unit(value + rng.random_range(-BASELINE_JITTER..BASELINE_JITTER))
}

/// Traits a seed of the given type starts with.
pub const fn base_traits(organism_type: OrganismType) -> &'static [&'static str] {
    match organism_type {
        OrganismType::AdvancedConsciousness => &["self_aware", "abstract_reasoning"],
        OrganismType::AdaptiveLearner => &["pattern_recognition", "adaptive"],
        OrganismType::InfrastructureBuilder => &["resource_management", "construction"],
        OrganismType::DataProcessor => &["analytical", "data_processing"],
        OrganismType::NetworkCommunicator => &["communication", "networking"],
        OrganismType::Generic => &["basic"],
    }
}

/// Build a gene from an expression level.
pub fn gene(expression: f64) -> Gene {
    let expression = clamp_unit(expression);
    Gene {
        expression,
        active: expression > GENE_ACTIVATION_THRESHOLD,
    }
}

/// Random starting genome for a seed organism.
pub fn seed_genes<R: Rng + ?Sized>(rng: &mut R) -> BTreeMap<String, Gene> {
    GENE_NAMES
        .iter()
        .map(|name| ((*name).to_owned(), gene(rng.random::<f64>())))
        .collect()
}

/// Inherit a parent's genome with a small drift on every expression.
pub fn inherit_genes<R: Rng + ?Sized>(
    parent: &BTreeMap<String, Gene>,
    rng: &mut R,
) -> BTreeMap<String, Gene> {
    parent
        .iter()
        .map(|(name, g)| {
            let drift = rng.random_range(-GENE_DRIFT..GENE_DRIFT);
            (name.clone(), gene(g.expression + drift))
        })
        .collect()
}

/// Pick a novel trait the organism does not already have.
///
/// Returns `None` when the pool is exhausted.
pub fn pick_novel_trait<R: Rng + ?Sized>(
    existing: &BTreeSet<String>,
    rng: &mut R,
) -> Option<String> {
    let candidates: Vec<&str> = NOVEL_TRAITS
        .iter()
        .copied()
        .filter(|t| !existing.contains(*t))
        .collect();
    candidates.choose(rng).map(|t| (*t).to_owned())
}

/// Inherit traits from a parent.
///
/// Each parent trait survives independently with
/// [`TRAIT_RETENTION_CHANCE`]; then, with probability `novel_trait_chance`,
/// one unseen trait from [`NOVEL_TRAITS`] is added.
pub fn inherit_traits<R: Rng + ?Sized>(
    parent: &BTreeSet<String>,
    novel_trait_chance: f64,
    rng: &mut R,
) -> BTreeSet<String> {
    let mut traits: BTreeSet<String> = parent
        .iter()
        .filter(|_| chance(rng, TRAIT_RETENTION_CHANCE))
        .cloned()
        .collect();

    if chance(rng, novel_trait_chance)
        && let Some(novel) = pick_novel_trait(&traits, rng)
    {
        traits.insert(novel);
    }
    traits
}
