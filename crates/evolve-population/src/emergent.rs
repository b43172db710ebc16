//! One-shot emergent behavior latches.
//!
//! Two population-level patterns are watched:
//!
//! - **Collective consciousness**: at least three live organisms above 0.8
//!   consciousness.
//! - **Infrastructure synthesis**: at least two live infrastructure
//!   builders above 0.8 fitness. The fittest of them is additionally
//!   signalled as evolved, for the infrastructure provisioning
//!   collaborator downstream.
//!
//! Each behavior fires at most once per detector. The detector only reads
//! the population.

use evolve_types::{EmergentBehavior, OrganismId, OrganismType};

use crate::store::PopulationStore;

/// Consciousness (exclusive) an organism needs to count towards
/// collective consciousness.
pub const COLLECTIVE_CONSCIOUSNESS_LEVEL: f64 = 0.8;

/// Organisms needed for collective consciousness.
pub const COLLECTIVE_CONSCIOUSNESS_QUORUM: usize = 3;

/// Fitness (exclusive) a builder needs to count towards infrastructure
/// synthesis.
pub const INFRASTRUCTURE_FITNESS_LEVEL: f64 = 0.8;

/// Builders needed for infrastructure synthesis.
pub const INFRASTRUCTURE_QUORUM: usize = 2;

/// Traits granted to the organism signalled by infrastructure synthesis.
pub const EVOLVED_TRAITS: [&str; 2] = ["infrastructure_synthesis", "cloud_ready"];

/// An organism flagged for provisioning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvolvedOrganism {
    /// Flagged organism.
    pub organism_id: OrganismId,
    /// Its type.
    pub organism_type: OrganismType,
    /// Traits granted by the evolution.
    pub traits: Vec<String>,
}

/// A behavior that latched during a check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmergentSignal {
    /// Behavior that fired.
    pub behavior: EmergentBehavior,
    /// Organisms meeting the trigger condition.
    pub organism_count: usize,
    /// Organism flagged as evolved, for infrastructure synthesis.
    pub evolved: Option<EvolvedOrganism>,
}

/// Latching detector; owns the set of behaviors that have already fired.
#[derive(Debug, Clone, Default)]
pub struct EmergentDetector {
    fired: Vec<EmergentBehavior>,
}

impl EmergentDetector {
    /// Create a detector with nothing fired.
    pub const fn new() -> Self {
        Self { fired: Vec::new() }
    }

    /// Behaviors that have fired, in firing order.
    pub fn fired(&self) -> &[EmergentBehavior] {
        &self.fired
    }

    /// Whether `behavior` has already fired.
    pub fn has_fired(&self, behavior: EmergentBehavior) -> bool {
        self.fired.contains(&behavior)
    }

    /// Evaluate both latches against the live population and return the
    /// behaviors that fired for the first time.
    pub fn check(&mut self, store: &PopulationStore) -> Vec<EmergentSignal> {
        let mut signals = Vec::new();

        if !self.has_fired(EmergentBehavior::CollectiveConsciousness) {
            let conscious = store
                .all()
                .filter(|o| o.consciousness > COLLECTIVE_CONSCIOUSNESS_LEVEL)
                .count();
            if conscious >= COLLECTIVE_CONSCIOUSNESS_QUORUM {
                signals.push(self.latch(EmergentSignal {
                    behavior: EmergentBehavior::CollectiveConsciousness,
                    organism_count: conscious,
                    evolved: None,
                }));
            }
        }

        if !self.has_fired(EmergentBehavior::InfrastructureSynthesis) {
            let builders: Vec<_> = store
                .all()
                .filter(|o| {
                    o.organism_type == OrganismType::InfrastructureBuilder
                        && o.fitness > INFRASTRUCTURE_FITNESS_LEVEL
                })
                .collect();
            if builders.len() >= INFRASTRUCTURE_QUORUM {
                let evolved = builders
                    .iter()
                    .max_by(|a, b| a.fitness.total_cmp(&b.fitness))
                    .map(|o| EvolvedOrganism {
                        organism_id: o.id,
                        organism_type: o.organism_type,
                        traits: EVOLVED_TRAITS.iter().map(|t| (*t).to_owned()).collect(),
                    });
                let organism_count = builders.len();
                signals.push(self.latch(EmergentSignal {
                    behavior: EmergentBehavior::InfrastructureSynthesis,
                    organism_count,
                    evolved,
                }));
            }
        }

        signals
    }

    fn latch(&mut self, signal: EmergentSignal) -> EmergentSignal {
        self.fired.push(signal.behavior);
        tracing::info!(
            behavior = %signal.behavior,
            organism_count = signal.organism_count,
            "Emergent behavior detected"
        );
        signal
    }
}
