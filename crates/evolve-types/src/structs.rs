//! Core entity structs: organisms, genes, lineages, and statistics.
//!
//! Field names serialize in camelCase, which is the shape external
//! observers (transport layer, dashboard) consume.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{DeathCause, EmergentBehavior, MutationKind, OrganismStatus, OrganismType};
use crate::ids::OrganismId;

// ---------------------------------------------------------------------------
// Organism
// ---------------------------------------------------------------------------

/// A single gene carried by an organism.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Gene {
    /// Expression level in `[0, 1]`.
    pub expression: f64,
    /// Whether the gene is switched on.
    pub active: bool,
}

/// A simulated entity.
///
/// While alive, the record is owned exclusively by the population store.
/// `fitness`, `consciousness` and `stability` stay within `[0, 1]`;
/// `complexity` and `energy` are non-negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Organism {
    /// Unique, never reused identifier.
    pub id: OrganismId,
    /// Organism kind.
    #[serde(rename = "type")]
    pub organism_type: OrganismType,
    /// Parent that produced this organism (`None` for seeds). Never changes.
    pub parent_id: Option<OrganismId>,
    /// Depth in the parent chain, 1 for seeds.
    pub generation: u32,
    /// Unordered trait set.
    pub traits: BTreeSet<String>,
    /// Gene name to gene state.
    pub genes: BTreeMap<String, Gene>,
    /// Bookkeeping fitness score.
    pub fitness: f64,
    /// Consciousness level.
    pub consciousness: f64,
    /// Structural stability.
    pub stability: f64,
    /// Accumulated complexity.
    pub complexity: f64,
    /// Remaining energy.
    pub energy: f64,
    /// Number of cycles survived.
    pub age: u32,
    /// Number of mutations applied.
    pub mutation_count: u32,
    /// Live or dead.
    pub status: OrganismStatus,
    /// Set on death only.
    pub death_cause: Option<DeathCause>,
    /// Set on death only.
    pub death_time: Option<DateTime<Utc>>,
    /// Real-world creation time.
    pub created_at: DateTime<Utc>,
}

impl Organism {
    /// Whether the organism is still part of the live population.
    pub const fn is_active(&self) -> bool {
        matches!(self.status, OrganismStatus::Active)
    }
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// What a single mutation changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case", rename_all_fields = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub enum MutationEffect {
    /// A gene's expression moved.
    GeneExpressionChange {
        /// Gene that changed.
        gene: String,
        /// New expression level.
        expression: f64,
        /// New activation state.
        active: bool,
    },
    /// Consciousness moved.
    ConsciousnessBoost {
        /// New consciousness level.
        consciousness: f64,
    },
    /// Fitness moved.
    FitnessAdjustment {
        /// New fitness level.
        fitness: f64,
    },
    /// A trait was added, or nothing changed.
    TraitModification {
        /// The trait that was added, if any.
        added_trait: Option<String>,
        /// Trait count after the mutation.
        trait_count: usize,
    },
    /// Complexity moved.
    ComplexityIncrease {
        /// New complexity.
        complexity: f64,
    },
}

/// One entry in a lineage's mutation log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct MutationRecord {
    /// Mutation kind.
    #[serde(rename = "type")]
    pub kind: MutationKind,
    /// What changed.
    pub result: MutationEffect,
    /// Organism generation at the time of the mutation.
    pub generation: u32,
    /// When the mutation was applied.
    pub timestamp: DateTime<Utc>,
}

/// Structured result of a mutation, returned to callers and published in
/// the `organism:mutated` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct MutationOutcome {
    /// Organism that mutated.
    pub organism_id: OrganismId,
    /// Mutation kind.
    pub mutation_type: MutationKind,
    /// Magnitude of the roll, in `[0.05, 0.15)`.
    pub magnitude: f64,
    /// Whether the roll was positive.
    pub positive: bool,
    /// What changed.
    pub result: MutationEffect,
    /// Fitness after the mutation.
    pub new_fitness: f64,
    /// Consciousness after the mutation.
    pub new_consciousness: f64,
    /// Organism generation.
    pub generation: u32,
    /// Mutation count after the mutation.
    pub mutation_count: u32,
}

// ---------------------------------------------------------------------------
// Lineage
// ---------------------------------------------------------------------------

/// How an organism left the live population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct DeathRecord {
    /// Cause of death.
    pub cause: DeathCause,
    /// When it happened.
    pub time: DateTime<Utc>,
    /// Age at death.
    pub age: u32,
    /// Fitness at death.
    pub fitness: f64,
    /// Generation of the organism.
    pub generation: u32,
}

/// Permanent ancestry and history for one organism.
///
/// Created together with the organism and never garbage collected, so
/// lineage queries keep working after the organism dies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Lineage {
    /// The organism this lineage describes.
    pub organism_id: OrganismId,
    /// Organism kind, kept so dead organisms remain identifiable.
    pub organism_type: OrganismType,
    /// Direct parent only. Full ancestry is reconstructed transitively.
    pub ancestors: Vec<OrganismId>,
    /// Children, in birth order.
    pub descendants: Vec<OrganismId>,
    /// Mutation log, in application order.
    pub mutations: Vec<MutationRecord>,
    /// Present once the organism has died.
    pub death: Option<DeathRecord>,
    /// When the organism was created.
    pub created_at: DateTime<Utc>,
}

impl Lineage {
    /// Create an empty lineage for a freshly created organism.
    pub fn new(organism: &Organism) -> Self {
        Self {
            organism_id: organism.id,
            organism_type: organism.organism_type,
            ancestors: organism.parent_id.into_iter().collect(),
            descendants: Vec::new(),
            mutations: Vec::new(),
            death: None,
            created_at: organism.created_at,
        }
    }

    /// Direct parent, if any.
    pub fn parent(&self) -> Option<OrganismId> {
        self.ancestors.first().copied()
    }
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// Population statistics recomputed at the end of every cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct GlobalStats {
    /// Number of completed cycles.
    pub generation: u64,
    /// Live population size.
    pub total_organisms: usize,
    /// Mean fitness of the live population (0 when empty).
    pub average_fitness: f64,
    /// Mean consciousness of the live population (0 when empty).
    pub average_consciousness: f64,
    /// Mean complexity of the live population (0 when empty).
    pub average_complexity: f64,
    /// Simpson's diversity index over organism types.
    pub diversity_index: f64,
    /// Deepest generation among live organisms.
    pub highest_generation: u32,
    /// Live organisms per type.
    pub type_distribution: BTreeMap<OrganismType, usize>,
}

/// Engine-level statistics exposed to the transport layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct EngineStats {
    /// Latest population statistics.
    pub global: GlobalStats,
    /// Mutations applied since the engine was created.
    pub total_mutations: u64,
    /// Emergent behaviors that have fired, in firing order.
    pub emergent_behaviors: Vec<EmergentBehavior>,
    /// Whether cycles are currently being scheduled.
    pub is_running: bool,
    /// Number of lineage records, live and dead.
    pub total_lineages: usize,
}
