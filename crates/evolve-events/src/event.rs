//! Named lifecycle events emitted by the engine.
//!
//! Each variant serializes as `{"event": "<name>", "payload": {...}}` where
//! `<name>` is the colon-separated event name external observers subscribe
//! to (for example `organism:died`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use evolve_types::{
    DeathCause, EmergentBehavior, MutationEffect, MutationKind, MutationOutcome, Organism,
    OrganismId, OrganismType,
};

/// An event published by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload")]
pub enum EngineEvent {
    /// The scheduler transitioned to running.
    #[serde(rename = "evolution:started")]
    EvolutionStarted(EvolutionStarted),
    /// The scheduler transitioned to stopped.
    #[serde(rename = "evolution:stopped")]
    EvolutionStopped(EvolutionStopped),
    /// A seed or offspring organism was created. Carries the full record.
    #[serde(rename = "organism:created")]
    OrganismCreated(Box<Organism>),
    /// An organism mutated, during a cycle or on request.
    #[serde(rename = "organism:mutated")]
    OrganismMutated(OrganismMutated),
    /// An organism left the live population.
    #[serde(rename = "organism:died")]
    OrganismDied(OrganismDied),
    /// An organism was flagged for infrastructure provisioning.
    #[serde(rename = "organism:evolved")]
    OrganismEvolved(OrganismEvolved),
    /// A full cycle finished.
    #[serde(rename = "evolution:cycle_complete")]
    CycleComplete(CycleComplete),
    /// An emergent behavior latched for the first time.
    #[serde(rename = "evolution:emergent_behavior")]
    EmergentBehaviorDetected(EmergentBehaviorDetected),
}

impl EngineEvent {
    /// The wire name of this event.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::EvolutionStarted(_) => "evolution:started",
            Self::EvolutionStopped(_) => "evolution:stopped",
            Self::OrganismCreated(_) => "organism:created",
            Self::OrganismMutated(_) => "organism:mutated",
            Self::OrganismDied(_) => "organism:died",
            Self::OrganismEvolved(_) => "organism:evolved",
            Self::CycleComplete(_) => "evolution:cycle_complete",
            Self::EmergentBehaviorDetected(_) => "evolution:emergent_behavior",
        }
    }

    /// Convenience constructor for `organism:created`.
    pub fn organism_created(organism: &Organism) -> Self {
        Self::OrganismCreated(Box::new(organism.clone()))
    }
}

/// Payload of `evolution:started`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvolutionStarted {
    /// When the scheduler started.
    pub timestamp: DateTime<Utc>,
    /// Live population at start.
    pub initial_population: usize,
}

/// Payload of `evolution:stopped`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvolutionStopped {
    /// When the scheduler stopped.
    pub timestamp: DateTime<Utc>,
    /// Cycles completed at stop time.
    pub final_generation: u64,
    /// Mutations applied over the engine's lifetime.
    pub total_mutations: u64,
}

/// Payload of `organism:mutated`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganismMutated {
    /// Organism that mutated.
    pub organism_id: OrganismId,
    /// Mutation kind.
    pub mutation_type: MutationKind,
    /// What changed.
    pub result: MutationEffect,
    /// Fitness after the mutation.
    pub new_fitness: f64,
    /// Consciousness after the mutation.
    pub new_consciousness: f64,
    /// Organism generation.
    pub generation: u32,
}

impl From<&MutationOutcome> for OrganismMutated {
    fn from(outcome: &MutationOutcome) -> Self {
        Self {
            organism_id: outcome.organism_id,
            mutation_type: outcome.mutation_type,
            result: outcome.result.clone(),
            new_fitness: outcome.new_fitness,
            new_consciousness: outcome.new_consciousness,
            generation: outcome.generation,
        }
    }
}

/// Payload of `organism:died`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganismDied {
    /// Organism that died.
    pub organism_id: OrganismId,
    /// Cause of death.
    pub cause: DeathCause,
    /// Age at death.
    pub age: u32,
    /// Fitness at death.
    pub fitness: f64,
    /// Organism generation.
    pub generation: u32,
}

impl OrganismDied {
    /// Build the payload from a dead organism record.
    pub const fn new(organism: &Organism, cause: DeathCause) -> Self {
        Self {
            organism_id: organism.id,
            cause,
            age: organism.age,
            fitness: organism.fitness,
            generation: organism.generation,
        }
    }
}

/// Payload of `organism:evolved`, consumed by the infrastructure
/// provisioning collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganismEvolved {
    /// Organism flagged as evolved.
    pub organism_id: OrganismId,
    /// Its type.
    pub organism_type: OrganismType,
    /// Traits granted by the evolution.
    pub traits: Vec<String>,
    /// Cycle in which it evolved.
    pub generation: u64,
}

/// Payload of `evolution:cycle_complete`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleComplete {
    /// Cycle number that just completed.
    pub generation: u64,
    /// Live population after the cycle.
    pub organism_count: usize,
    /// Mean fitness after the cycle.
    pub average_fitness: f64,
    /// Mutations applied over the engine's lifetime.
    pub total_mutations: u64,
    /// When the cycle completed.
    pub timestamp: DateTime<Utc>,
}

/// Payload of `evolution:emergent_behavior`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergentBehaviorDetected {
    /// Behavior that fired.
    pub behavior: EmergentBehavior,
    /// Human-readable description.
    pub description: String,
    /// Cycle in which it fired.
    pub generation: u64,
    /// Number of organisms meeting the trigger condition.
    pub organism_count: usize,
    /// Organism flagged for provisioning, for `infrastructure_synthesis`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evolved_organism: Option<OrganismEvolved>,
}
