//! End-to-end scenarios for the Evolve engine.
//!
//! Each test drives the public API the way the transport layer would, with
//! a seeded RNG so every run sees the same population.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::missing_panics_doc,
    clippy::cast_precision_loss
)]

use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;

use evolve_core::{EngineState, EvolutionService, EvolveConfig, SchedulerConfig, run_cycle};
use evolve_events::EngineEvent;
use evolve_population::mutation::{MutationRoll, mutate_with};
use evolve_population::reproduction::try_reproduce;
use evolve_population::{EvolutionParams, apply_selection_pressure, vitals};
use evolve_types::{DeathCause, MutationKind, OrganismType};

fn engine(seed: u64) -> EngineState {
    EngineState::with_rng(EvolutionParams::default(), StdRng::seed_from_u64(seed))
}

// ---------------------------------------------------------------------------
// Scenario A: seeding
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn seeding_produces_five_founders() {
    let mut config = EvolveConfig::default();
    config.evolution.seed = Some(1);
    let service = EvolutionService::new(&config);

    assert!(service.start().await.unwrap());
    let organisms = service.all_organisms().await;
    assert_eq!(organisms.len(), 5);
    assert_eq!(service.organism_count().await, 5);

    let mut types: Vec<_> = organisms.iter().map(|o| o.organism_type).collect();
    types.sort();
    let mut expected = OrganismType::SEED_TYPES.to_vec();
    expected.sort();
    assert_eq!(types, expected);

    for organism in &organisms {
        assert_eq!(organism.generation, 1);
        assert!(organism.parent_id.is_none());
        assert!(service.lineage(organism.id).await.is_some());
    }
    assert!(service.stop().await);
}

// ---------------------------------------------------------------------------
// Scenario B: natural death
// ---------------------------------------------------------------------------

#[test]
fn exhausted_organism_is_removed_but_remembered() {
    let mut state = engine(2);
    let _ = state.seed_population().unwrap();
    let doomed = state.store.ids()[0];
    state.store.get_mut(doomed).unwrap().energy = 1.0;

    let dead = vitals::age_population(&mut state.store);
    assert_eq!(dead.len(), 1);
    assert_eq!(dead[0].death_cause, Some(DeathCause::NaturalDeath));

    assert!(state.all_organisms().iter().all(|o| o.id != doomed));
    assert!(state.organism(doomed).is_none());
    let lineage = state.lineage(doomed).unwrap();
    assert_eq!(lineage.organism_id, doomed);
    assert_eq!(
        lineage.death.map(|d| d.cause),
        Some(DeathCause::NaturalDeath)
    );
}

// ---------------------------------------------------------------------------
// Scenario C: reproduction rate
// ---------------------------------------------------------------------------

#[test]
fn reproduction_rate_is_about_ten_percent() {
    let mut state = engine(3);
    let parent = state
        .store
        .create(OrganismType::AdaptiveLearner, None, 0.15, &mut state.rng)
        .unwrap();

    let mut offspring = 0_usize;
    for _ in 0..1000 {
        let p = state.store.get_mut(parent).unwrap();
        p.fitness = 0.9;
        p.energy = 100.0;
        p.age = 10;
        if let Some(child) = try_reproduce(&mut state.store, parent, 0.15, &mut state.rng).unwrap()
        {
            offspring += 1;
            assert_eq!(state.store.get(child).unwrap().generation, 2);
        }
    }
    assert!((60..=140).contains(&offspring), "offspring {offspring}");
    assert_eq!(
        state.lineage(parent).unwrap().descendants.len(),
        offspring
    );
}

// ---------------------------------------------------------------------------
// Scenario D: clamping
// ---------------------------------------------------------------------------

#[test]
fn consciousness_boost_never_exceeds_one() {
    let mut state = engine(4);
    let _ = state.seed_population().unwrap();
    let id = state.store.ids()[0];
    state.store.get_mut(id).unwrap().consciousness = 0.95;

    for magnitude in [0.05, 0.1, 0.149] {
        let roll = MutationRoll {
            magnitude,
            positive: true,
        };
        let outcome = mutate_with(
            &mut state.store,
            id,
            MutationKind::ConsciousnessBoost,
            roll,
            &mut state.rng,
        )
        .unwrap();
        assert!(outcome.new_consciousness <= 1.0);
    }
    assert!((state.organism(id).unwrap().consciousness - 1.0).abs() < f64::EPSILON);
}

// ---------------------------------------------------------------------------
// Scenario E: selection pressure
// ---------------------------------------------------------------------------

#[test]
fn forty_organisms_lose_exactly_the_weakest() {
    let mut state = engine(5);
    let mut ids = Vec::new();
    for i in 0..40 {
        let id = state
            .store
            .create(OrganismType::Generic, None, 0.0, &mut state.rng)
            .unwrap();
        state.store.get_mut(id).unwrap().fitness = 0.2 + f64::from(i) * 0.015;
        ids.push(id);
    }

    let params = EvolutionParams {
        mutation_rate: 0.15,
        max_population: 50,
        selection_pressure: 0.3,
    };
    let removed = apply_selection_pressure(&mut state.store, &params);
    assert_eq!(removed.len(), 1);
    assert_eq!(removed[0].id, ids[0]);
    assert_eq!(state.store.count(), 39);
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

#[test]
fn long_run_invariants_hold() {
    let params = EvolutionParams {
        mutation_rate: 0.3,
        max_population: 12,
        selection_pressure: 0.3,
    };
    let mut state = EngineState::with_rng(params, StdRng::seed_from_u64(6));
    let _ = state.seed_population().unwrap();

    for _ in 0..300 {
        let summary = run_cycle(&mut state).unwrap();
        assert!(summary.organism_count <= 12);

        for organism in state.store.all() {
            for v in [organism.fitness, organism.consciousness, organism.stability] {
                assert!((0.0..=1.0).contains(&v));
            }
            assert!(organism.energy >= 0.0);
            assert!(organism.complexity >= 0.0);
            assert!(state.store.lineage(organism.id).is_some());

            if let Some(parent) = organism.parent_id {
                let parent_lineage = state.store.lineage(parent).unwrap();
                assert!(parent_lineage.descendants.contains(&organism.id));
                let ancestry = state.store.ancestry(organism.id);
                assert_eq!(ancestry.first(), Some(&parent));
                assert_eq!(
                    ancestry.len(),
                    usize::try_from(organism.generation - 1).unwrap()
                );
            }
        }

        let diversity = state.global.diversity_index;
        assert!((0.0..=1.0).contains(&diversity));
        if state.global.type_distribution.len() < 2 {
            assert!(diversity.abs() < f64::EPSILON);
        }
    }

    // Each behavior at most once, no duplicates.
    let fired = state.detector.fired().to_vec();
    let mut deduped = fired.clone();
    deduped.dedup();
    assert_eq!(fired, deduped);
}

#[test]
fn emergent_behaviors_fire_once_across_cycles() {
    let mut state = engine(7);
    for _ in 0..4 {
        let id = state
            .store
            .create(OrganismType::AdvancedConsciousness, None, 0.0, &mut state.rng)
            .unwrap();
        state.store.get_mut(id).unwrap().consciousness = 1.0;
    }
    state.params.mutation_rate = 0.0;

    let mut emergent_events = 0;
    for _ in 0..10 {
        let summary = run_cycle(&mut state).unwrap();
        emergent_events += summary
            .events
            .iter()
            .filter(|e| e.name() == "evolution:emergent_behavior")
            .count();
    }
    assert_eq!(emergent_events, 1);
    assert_eq!(state.stats(false).emergent_behaviors.len(), 1);
}

#[test]
fn events_serialize_with_wire_names() {
    let mut state = engine(8);
    let created = state.seed_population().unwrap();
    let summary = run_cycle(&mut state).unwrap();

    for event in created.iter().chain(summary.events.iter()) {
        let value = serde_json::to_value(event).unwrap();
        assert_eq!(value["event"], event.name());
        assert!(value.get("payload").is_some());
    }

    let created_json = serde_json::to_value(&created[0]).unwrap();
    assert!(created_json["payload"].get("id").is_some());
    assert_eq!(created_json["payload"]["generation"], 1);
}

#[tokio::test(start_paused = true)]
async fn subscriber_sees_full_lifecycle() {
    let state = engine(9);
    let service = EvolutionService::with_state(
        state,
        SchedulerConfig {
            cycle_interval: Duration::from_millis(50),
            max_cycles: 3,
        },
    );
    let mut rx = service.subscribe();

    assert!(service.start().await.unwrap());
    tokio::time::sleep(Duration::from_millis(500)).await;

    let mut names = Vec::new();
    while let Ok(event) = rx.try_recv() {
        names.push(event.name());
    }
    assert_eq!(names.first(), Some(&"organism:created"));
    assert!(names.contains(&"evolution:started"));
    assert_eq!(
        names
            .iter()
            .filter(|n| **n == "evolution:cycle_complete")
            .count(),
        3
    );
    assert_eq!(names.last(), Some(&"evolution:stopped"));

    let stats = service.stats().await;
    assert!(!stats.is_running);
    assert_eq!(stats.global.generation, 3);
    assert!(stats.total_lineages >= 5);
}

#[test]
fn stopped_event_carries_counters() {
    let mut state = engine(10);
    let _ = state.seed_population().unwrap();
    for _ in 0..3 {
        let _ = run_cycle(&mut state).unwrap();
    }
    match state.stopped_event() {
        EngineEvent::EvolutionStopped(payload) => {
            assert_eq!(payload.final_generation, 3);
            assert_eq!(payload.total_mutations, state.total_mutations);
        }
        other => panic!("unexpected event {other:?}"),
    }
}
