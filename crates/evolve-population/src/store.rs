//! The authoritative population store.
//!
//! [`PopulationStore`] owns two maps:
//!
//! - live organisms, keyed by id (dead organisms are removed), and
//! - lineage records for every organism ever created (never pruned).
//!
//! Every other component reads and writes the population through this
//! type. Lookups on unknown ids return `None` or empty collections.

use std::collections::BTreeMap;

use chrono::Utc;
use rand::Rng;
use tracing::debug;

use evolve_types::{
    DeathCause, DeathRecord, Lineage, MutationRecord, Organism, OrganismId, OrganismStatus,
    OrganismType,
};

use crate::error::PopulationError;
use crate::genome;

/// Live organisms plus the permanent lineage ledger.
#[derive(Debug, Clone, Default)]
pub struct PopulationStore {
    /// Live organisms only.
    organisms: BTreeMap<OrganismId, Organism>,
    /// One entry per organism ever created.
    lineages: BTreeMap<OrganismId, Lineage>,
}

impl PopulationStore {
    /// Create an empty store.
    pub const fn new() -> Self {
        Self {
            organisms: BTreeMap::new(),
            lineages: BTreeMap::new(),
        }
    }

    /// Create an organism and its lineage record.
    ///
    /// Seeds (`parent == None`) start at generation 1 with the type's base
    /// traits and a random genome. Offspring start at
    /// `parent.generation + 1`, inherit traits and genes from the parent
    /// (a novel trait is added with probability `novel_trait_chance`), and
    /// are appended to the parent's `descendants`.
    ///
    /// Fitness and consciousness are the type baseline plus jitter; energy
    /// starts at [`genome::STARTING_ENERGY`] and age at 0.
    ///
    /// # Errors
    ///
    /// Returns [`PopulationError::ParentNotFound`] if `parent` is not alive,
    /// or [`PopulationError::ArithmeticOverflow`] if the generation counter
    /// would overflow.
    pub fn create<R: Rng + ?Sized>(
        &mut self,
        organism_type: OrganismType,
        parent: Option<OrganismId>,
        novel_trait_chance: f64,
        rng: &mut R,
    ) -> Result<OrganismId, PopulationError> {
        let id = self.allocate_id(rng);
        let base = genome::baseline(organism_type);

        let (generation, traits, genes) = match parent {
            None => (
                1,
                genome::base_traits(organism_type)
                    .iter()
                    .map(|t| (*t).to_owned())
                    .collect(),
                genome::seed_genes(rng),
            ),
            Some(parent_id) => {
                let parent_org = self
                    .organisms
                    .get(&parent_id)
                    .ok_or(PopulationError::ParentNotFound(parent_id))?;
                let generation = parent_org.generation.checked_add(1).ok_or_else(|| {
                    PopulationError::ArithmeticOverflow {
                        context: String::from("offspring generation overflow"),
                    }
                })?;
                (
                    generation,
                    genome::inherit_traits(&parent_org.traits, novel_trait_chance, rng),
                    genome::inherit_genes(&parent_org.genes, rng),
                )
            }
        };

        let organism = Organism {
            id,
            organism_type,
            parent_id: parent,
            generation,
            traits,
            genes,
            fitness: genome::jitter(base.fitness, rng),
            consciousness: genome::jitter(base.consciousness, rng),
            stability: base.stability,
            complexity: base.complexity,
            energy: genome::STARTING_ENERGY,
            age: 0,
            mutation_count: 0,
            status: OrganismStatus::Active,
            death_cause: None,
            death_time: None,
            created_at: Utc::now(),
        };

        if let Some(parent_id) = parent
            && let Some(parent_lineage) = self.lineages.get_mut(&parent_id)
        {
            parent_lineage.descendants.push(id);
        }

        debug!(
            organism_id = %id,
            organism_type = %organism_type,
            generation,
            parent_id = ?parent,
            "Organism created"
        );

        self.lineages.insert(id, Lineage::new(&organism));
        self.organisms.insert(id, organism);
        Ok(id)
    }

    /// Draw a fresh id from `rng`, retrying on the (astronomically
    /// unlikely) collision with any id ever issued.
    fn allocate_id<R: Rng + ?Sized>(&self, rng: &mut R) -> OrganismId {
        loop {
            let id = OrganismId::from_random_bytes(rng.random());
            if !self.lineages.contains_key(&id) {
                return id;
            }
        }
    }

    /// Remove an organism from the live population.
    ///
    /// Marks the record dead, stamps the death time and cause, appends a
    /// [`DeathRecord`] to its lineage, and returns the dead record. Returns
    /// `None` if the id is not alive.
    pub fn remove(&mut self, id: OrganismId, cause: DeathCause) -> Option<Organism> {
        let mut organism = self.organisms.remove(&id)?;
        let now = Utc::now();
        organism.status = OrganismStatus::Dead;
        organism.death_cause = Some(cause);
        organism.death_time = Some(now);

        if let Some(lineage) = self.lineages.get_mut(&id) {
            lineage.death = Some(DeathRecord {
                cause,
                time: now,
                age: organism.age,
                fitness: organism.fitness,
                generation: organism.generation,
            });
        }

        debug!(
            organism_id = %id,
            cause = %cause,
            age = organism.age,
            fitness = organism.fitness,
            "Organism died"
        );
        Some(organism)
    }

    /// Look up a live organism.
    pub fn get(&self, id: OrganismId) -> Option<&Organism> {
        self.organisms.get(&id)
    }

    /// Mutable access to a live organism.
    pub fn get_mut(&mut self, id: OrganismId) -> Option<&mut Organism> {
        self.organisms.get_mut(&id)
    }

    /// Iterate over all live organisms in id order.
    pub fn all(&self) -> impl Iterator<Item = &Organism> {
        self.organisms.values()
    }

    /// Mutable iteration over all live organisms.
    pub fn all_mut(&mut self) -> impl Iterator<Item = &mut Organism> {
        self.organisms.values_mut()
    }

    /// Snapshot of live ids, in id order.
    pub fn ids(&self) -> Vec<OrganismId> {
        self.organisms.keys().copied().collect()
    }

    /// Number of live organisms.
    pub fn count(&self) -> usize {
        self.organisms.len()
    }

    /// Whether there are no live organisms.
    pub fn is_empty(&self) -> bool {
        self.organisms.is_empty()
    }

    /// Lineage record for any organism ever created.
    pub fn lineage(&self, id: OrganismId) -> Option<&Lineage> {
        self.lineages.get(&id)
    }

    /// Number of lineage records, live and dead.
    pub fn lineage_count(&self) -> usize {
        self.lineages.len()
    }

    /// Append a mutation to an organism's lineage log.
    ///
    /// Returns `false` if no lineage exists for `id`.
    pub fn record_mutation(&mut self, id: OrganismId, record: MutationRecord) -> bool {
        match self.lineages.get_mut(&id) {
            Some(lineage) => {
                lineage.mutations.push(record);
                true
            }
            None => false,
        }
    }

    /// Full ancestor chain of an organism, nearest first.
    ///
    /// Follows each lineage's direct parent transitively, so it also works
    /// when ancestors (or the organism itself) are dead. Returns an empty
    /// list for seeds and unknown ids.
    pub fn ancestry(&self, id: OrganismId) -> Vec<OrganismId> {
        let mut chain = Vec::new();
        let mut cursor = self.lineages.get(&id).and_then(Lineage::parent);
        while let Some(ancestor) = cursor {
            // Parent links point strictly backwards in time; the length
            // check only guards against a corrupted ledger.
            if chain.len() >= self.lineages.len() {
                break;
            }
            chain.push(ancestor);
            cursor = self.lineages.get(&ancestor).and_then(Lineage::parent);
        }
        chain
    }
}
