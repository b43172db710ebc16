//! Enumeration types for the Evolve engine.
//!
//! Every closed set of tags in the simulation (organism kinds, mutation
//! kinds, causes of death, emergent behaviors) is an enum here rather than a
//! free-form string, so dispatch is checked at compile time.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Organism Types
// ---------------------------------------------------------------------------

/// The kind of an organism. Determines its baseline vitals and traits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum OrganismType {
    /// High baseline consciousness, the "thinking" lineage.
    AdvancedConsciousness,
    /// Balanced organism that adapts quickly.
    AdaptiveLearner,
    /// Fit, low-consciousness builder; drives infrastructure synthesis.
    InfrastructureBuilder,
    /// Stable, complex data cruncher.
    DataProcessor,
    /// Communication-oriented organism.
    NetworkCommunicator,
    /// Fallback type with unremarkable baselines.
    Generic,
}

impl OrganismType {
    /// Types seeded (one organism each) when the engine starts.
    pub const SEED_TYPES: [Self; 5] = [
        Self::AdvancedConsciousness,
        Self::AdaptiveLearner,
        Self::InfrastructureBuilder,
        Self::DataProcessor,
        Self::NetworkCommunicator,
    ];

    /// Canonical name as it appears on the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AdvancedConsciousness => "AdvancedConsciousness",
            Self::AdaptiveLearner => "AdaptiveLearner",
            Self::InfrastructureBuilder => "InfrastructureBuilder",
            Self::DataProcessor => "DataProcessor",
            Self::NetworkCommunicator => "NetworkCommunicator",
            Self::Generic => "Generic",
        }
    }
}

impl core::fmt::Display for OrganismType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// Whether an organism is part of the live population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum OrganismStatus {
    /// Alive and owned by the population store.
    #[default]
    Active,
    /// Removed from the live population. Only its lineage remains.
    Dead,
}

/// Why an organism was removed from the live population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum DeathCause {
    /// Exceeded the maximum age or ran out of energy.
    NaturalDeath,
    /// Culled by the selection pressure pass.
    SelectionPressure,
}

impl DeathCause {
    /// Canonical name as it appears on the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NaturalDeath => "natural_death",
            Self::SelectionPressure => "selection_pressure",
        }
    }
}

impl core::fmt::Display for DeathCause {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Mutation Kinds
// ---------------------------------------------------------------------------

/// The kind of a single mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum MutationKind {
    /// Shift the expression level of one gene.
    GeneExpressionChange,
    /// Shift consciousness.
    ConsciousnessBoost,
    /// Shift fitness.
    FitnessAdjustment,
    /// Add a novel trait.
    TraitModification,
    /// Shift complexity. Also the fallback kind.
    ComplexityIncrease,
}

impl MutationKind {
    /// All kinds, in selection order.
    pub const ALL: [Self; 5] = [
        Self::GeneExpressionChange,
        Self::ConsciousnessBoost,
        Self::FitnessAdjustment,
        Self::TraitModification,
        Self::ComplexityIncrease,
    ];

    /// Canonical name as it appears on the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GeneExpressionChange => "gene_expression_change",
            Self::ConsciousnessBoost => "consciousness_boost",
            Self::FitnessAdjustment => "fitness_adjustment",
            Self::TraitModification => "trait_modification",
            Self::ComplexityIncrease => "complexity_increase",
        }
    }
}

impl core::fmt::Display for MutationKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Emergent Behaviors
// ---------------------------------------------------------------------------

/// A notable population state that fires at most once per engine lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum EmergentBehavior {
    /// Several highly conscious organisms coexist.
    CollectiveConsciousness,
    /// Multiple highly fit infrastructure builders coexist.
    InfrastructureSynthesis,
}

impl EmergentBehavior {
    /// Canonical name as it appears on the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CollectiveConsciousness => "collective_consciousness",
            Self::InfrastructureSynthesis => "infrastructure_synthesis",
        }
    }

    /// Human-readable description carried in the emergent-behavior event.
    pub const fn description(self) -> &'static str {
        match self {
            Self::CollectiveConsciousness => {
                "Multiple organisms achieved high consciousness simultaneously"
            }
            Self::InfrastructureSynthesis => {
                "Infrastructure builders evolved the ability to synthesize cloud resources"
            }
        }
    }
}

impl core::fmt::Display for EmergentBehavior {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
