//! Cycle scheduler and the public engine facade.
//!
//! [`EvolutionService`] owns the engine state behind a
//! [`tokio::sync::Mutex`] and drives [`run_cycle`] on a background task:
//!
//! - **Start/stop**: both idempotent. Stop is cooperative; it is checked
//!   before each cycle, never mid-cycle.
//! - **Bounded runs**: an optional `max_cycles` after which the scheduler
//!   stops itself.
//! - **Manual mutation**: serialized against cycles by the engine lock.
//! - **Events**: every state change is fanned out over a broadcast channel
//!   once the operation that produced it has finished.
//!
//! [`run_cycle`]: crate::cycle::run_cycle

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{Mutex, Notify, broadcast};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use evolve_events::{BroadcastPublisher, EngineEvent, EventPublisher, EvolutionStarted};
use evolve_population::PopulationError;
use evolve_types::{EngineStats, Lineage, MutationOutcome, Organism, OrganismId};

use crate::config::EvolveConfig;
use crate::cycle;
use crate::engine::EngineState;

/// Scheduler timing and bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Delay between cycles. The first cycle fires one interval after
    /// start.
    pub cycle_interval: Duration,
    /// Cycle count after which the scheduler stops itself (0 = unlimited).
    pub max_cycles: u64,
}

impl SchedulerConfig {
    /// Whether the cycle bound has been reached at `generation`.
    pub const fn limit_reached(&self, generation: u64) -> bool {
        self.max_cycles > 0 && generation >= self.max_cycles
    }
}

impl From<&EvolveConfig> for SchedulerConfig {
    fn from(config: &EvolveConfig) -> Self {
        Self {
            cycle_interval: Duration::from_millis(config.evolution.cycle_interval_ms),
            max_cycles: config.simulation.max_cycles,
        }
    }
}

/// Handle to the running cycle task.
struct ActiveRun {
    stop: Arc<Notify>,
    task: JoinHandle<()>,
}

/// The evolution engine as seen by the transport layer.
pub struct EvolutionService {
    engine: Arc<Mutex<EngineState>>,
    events: Arc<BroadcastPublisher>,
    running: Arc<AtomicBool>,
    scheduler: SchedulerConfig,
    active: Mutex<Option<ActiveRun>>,
}

impl EvolutionService {
    /// Build a service from configuration.
    pub fn new(config: &EvolveConfig) -> Self {
        let state = EngineState::new(config.evolution_params(), config.evolution.seed);
        Self::with_state(state, SchedulerConfig::from(config))
    }

    /// Build a service around an existing engine state.
    pub fn with_state(state: EngineState, scheduler: SchedulerConfig) -> Self {
        Self {
            engine: Arc::new(Mutex::new(state)),
            events: Arc::new(BroadcastPublisher::default()),
            running: Arc::new(AtomicBool::new(false)),
            scheduler,
            active: Mutex::new(None),
        }
    }

    /// Subscribe to every event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.events.subscribe()
    }

    /// Whether cycles are being scheduled.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Start scheduling cycles.
    ///
    /// No-op returning `Ok(false)` if already running, or if the cycle
    /// bound was already reached by earlier runs. An empty population is
    /// seeded with one organism per seed type first; a population that
    /// survived an earlier stop is kept as is.
    pub async fn start(&self) -> Result<bool, PopulationError> {
        let mut active = self.active.lock().await;
        if self.is_running() {
            return Ok(false);
        }
        // A run that ended on its own leaves a finished task behind.
        if let Some(previous) = active.take() {
            let _ = previous.task.await;
        }

        {
            let mut state = self.engine.lock().await;
            if self.scheduler.limit_reached(state.generation) {
                info!(
                    generation = state.generation,
                    max_cycles = self.scheduler.max_cycles,
                    "Cycle limit already reached, not starting"
                );
                return Ok(false);
            }
            if state.store.is_empty() {
                let created = state.seed_population()?;
                self.events.publish_all(&created);
            }
            self.running.store(true, Ordering::Release);
            self.events
                .publish(&EngineEvent::EvolutionStarted(EvolutionStarted {
                    timestamp: Utc::now(),
                    initial_population: state.store.count(),
                }));
            info!(
                organisms = state.store.count(),
                generation = state.generation,
                cycle_interval_ms = u64::try_from(self.scheduler.cycle_interval.as_millis())
                    .unwrap_or(u64::MAX),
                max_cycles = self.scheduler.max_cycles,
                "Evolution started"
            );
        }

        let stop = Arc::new(Notify::new());
        let task = tokio::spawn(cycle_loop(
            Arc::clone(&self.engine),
            Arc::clone(&self.events) as Arc<dyn EventPublisher>,
            Arc::clone(&self.running),
            Arc::clone(&stop),
            self.scheduler,
        ));
        *active = Some(ActiveRun { stop, task });
        Ok(true)
    }

    /// Stop scheduling cycles.
    ///
    /// Idempotent: returns `false` without emitting anything if not
    /// running. A cycle already in progress completes first.
    pub async fn stop(&self) -> bool {
        let mut active = self.active.lock().await;
        if !self.running.swap(false, Ordering::AcqRel) {
            return false;
        }
        if let Some(run) = active.take() {
            run.stop.notify_one();
            if let Err(e) = run.task.await {
                warn!(error = %e, "Cycle task ended abnormally");
            }
        }

        let state = self.engine.lock().await;
        self.events.publish(&state.stopped_event());
        info!(
            generation = state.generation,
            total_mutations = state.total_mutations,
            "Evolution stopped"
        );
        true
    }

    /// Mutate one live organism immediately.
    ///
    /// Allowed whether or not cycles are running. Returns `None` if the
    /// organism is not alive.
    pub async fn trigger_mutation(&self, id: OrganismId) -> Option<MutationOutcome> {
        let mut state = self.engine.lock().await;
        let (outcome, event) = state.trigger_mutation(id)?;
        self.events.publish(&event);
        Some(outcome)
    }

    /// Snapshot of every live organism.
    pub async fn all_organisms(&self) -> Vec<Organism> {
        self.engine.lock().await.all_organisms()
    }

    /// Snapshot of one live organism.
    pub async fn organism(&self, id: OrganismId) -> Option<Organism> {
        self.engine.lock().await.organism(id)
    }

    /// Number of live organisms.
    pub async fn organism_count(&self) -> usize {
        self.engine.lock().await.store.count()
    }

    /// Lineage of any organism ever created.
    pub async fn lineage(&self, id: OrganismId) -> Option<Lineage> {
        self.engine.lock().await.lineage(id)
    }

    /// Full ancestor chain, nearest first.
    pub async fn ancestry(&self, id: OrganismId) -> Vec<OrganismId> {
        self.engine.lock().await.store.ancestry(id)
    }

    /// Engine statistics.
    pub async fn stats(&self) -> EngineStats {
        let state = self.engine.lock().await;
        state.stats(self.is_running())
    }
}

/// The scheduling loop: sleep, check for stop, run a cycle, publish.
async fn cycle_loop(
    engine: Arc<Mutex<EngineState>>,
    publisher: Arc<dyn EventPublisher>,
    running: Arc<AtomicBool>,
    stop: Arc<Notify>,
    scheduler: SchedulerConfig,
) {
    loop {
        tokio::select! {
            () = stop.notified() => break,
            () = tokio::time::sleep(scheduler.cycle_interval) => {}
        }

        // --- Check stop request (before cycle) ---
        if !running.load(Ordering::Acquire) {
            break;
        }

        let mut state = engine.lock().await;
        if !scheduler.limit_reached(state.generation) {
            match cycle::run_cycle(&mut state) {
                Ok(summary) => publisher.publish_all(&summary.events),
                Err(e) => {
                    publisher.publish_all(e.events());
                    error!(generation = state.generation, error = %e, "Cycle failed");
                }
            }
        }

        // --- Check cycle limit (after cycle) ---
        if scheduler.limit_reached(state.generation) {
            if running.swap(false, Ordering::AcqRel) {
                publisher.publish(&state.stopped_event());
                info!(
                    generation = state.generation,
                    max_cycles = scheduler.max_cycles,
                    "Cycle limit reached"
                );
            }
            break;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use evolve_population::EvolutionParams;

    use super::*;

    fn service(max_cycles: u64) -> EvolutionService {
        let state = EngineState::new(EvolutionParams::default(), Some(9));
        EvolutionService::with_state(
            state,
            SchedulerConfig {
                cycle_interval: Duration::from_millis(100),
                max_cycles,
            },
        )
    }

    fn drain(rx: &mut broadcast::Receiver<EngineEvent>) -> Vec<EngineEvent> {
        let mut out = Vec::new();
        while let Ok(event) = rx.try_recv() {
            out.push(event);
        }
        out
    }

    #[test]
    fn zero_cycle_limit_means_unlimited() {
        let scheduler = SchedulerConfig {
            cycle_interval: Duration::from_millis(1),
            max_cycles: 0,
        };
        assert!(!scheduler.limit_reached(u64::MAX));
    }

    #[tokio::test(start_paused = true)]
    async fn start_seeds_and_announces() {
        let svc = service(0);
        let mut rx = svc.subscribe();

        assert!(svc.start().await.unwrap());
        assert!(svc.is_running());
        assert_eq!(svc.organism_count().await, 5);

        let names: Vec<_> = drain(&mut rx).iter().map(EngineEvent::name).collect();
        assert_eq!(names.iter().filter(|n| **n == "organism:created").count(), 5);
        assert_eq!(names.last(), Some(&"evolution:started"));

        assert!(svc.stop().await);
    }

    #[tokio::test(start_paused = true)]
    async fn start_and_stop_are_idempotent() {
        let svc = service(0);
        let mut rx = svc.subscribe();

        assert!(!svc.stop().await);
        assert!(svc.start().await.unwrap());
        assert!(!svc.start().await.unwrap());
        assert_eq!(svc.organism_count().await, 5);

        assert!(svc.stop().await);
        assert!(!svc.stop().await);
        assert!(!svc.is_running());

        let names: Vec<_> = drain(&mut rx).iter().map(EngineEvent::name).collect();
        assert_eq!(names.iter().filter(|n| **n == "evolution:started").count(), 1);
        assert_eq!(names.iter().filter(|n| **n == "evolution:stopped").count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cycles_fire_on_the_interval() {
        let svc = service(0);
        assert!(svc.start().await.unwrap());

        tokio::time::sleep(Duration::from_millis(350)).await;
        assert!(svc.stop().await);

        let stats = svc.stats().await;
        assert_eq!(stats.global.generation, 3);
        assert!(!stats.is_running);

        // No cycles after stop.
        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(svc.stats().await.global.generation, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn cycle_limit_stops_the_scheduler() {
        let svc = service(4);
        let mut rx = svc.subscribe();
        assert!(svc.start().await.unwrap());

        tokio::time::sleep(Duration::from_millis(2000)).await;
        assert!(!svc.is_running());
        assert_eq!(svc.stats().await.global.generation, 4);

        let events = drain(&mut rx);
        let cycles = events
            .iter()
            .filter(|e| e.name() == "evolution:cycle_complete")
            .count();
        assert_eq!(cycles, 4);
        assert_eq!(events.last().map(EngineEvent::name), Some("evolution:stopped"));

        // Already stopped by the limit.
        assert!(!svc.stop().await);
    }

    #[tokio::test(start_paused = true)]
    async fn start_after_cycle_limit_is_refused() {
        let svc = service(2);
        assert!(svc.start().await.unwrap());
        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert!(!svc.is_running());

        let mut rx = svc.subscribe();
        assert!(!svc.start().await.unwrap());
        assert!(!svc.is_running());

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert!(drain(&mut rx).is_empty());
        assert_eq!(svc.stats().await.global.generation, 2);
        assert!(!svc.stop().await);
    }

    #[tokio::test(start_paused = true)]
    async fn failing_cycles_keep_the_scheduler_running() {
        let mut state = EngineState::new(EvolutionParams::default(), Some(12));
        state.generation = u64::MAX;
        let svc = EvolutionService::with_state(
            state,
            SchedulerConfig {
                cycle_interval: Duration::from_millis(100),
                max_cycles: 0,
            },
        );
        let mut rx = svc.subscribe();

        assert!(svc.start().await.unwrap());
        for _ in 0..5 {
            tokio::time::sleep(Duration::from_millis(100)).await;
            assert!(svc.is_running());
        }

        let names: Vec<_> = drain(&mut rx).iter().map(EngineEvent::name).collect();
        assert!(names.contains(&"evolution:started"));
        assert!(!names.contains(&"evolution:cycle_complete"));
        assert_eq!(svc.organism_count().await, 5);

        assert!(svc.stop().await);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_keeps_population() {
        let svc = service(0);
        assert!(svc.start().await.unwrap());
        tokio::time::sleep(Duration::from_millis(250)).await;
        assert!(svc.stop().await);

        let before: Vec<_> = svc.all_organisms().await.iter().map(|o| o.id).collect();
        let generation = svc.stats().await.global.generation;

        assert!(svc.start().await.unwrap());
        let after: Vec<_> = svc.all_organisms().await.iter().map(|o| o.id).collect();
        assert_eq!(before, after);
        assert_eq!(svc.stats().await.global.generation, generation);
        assert!(svc.stop().await);
    }

    #[tokio::test(start_paused = true)]
    async fn manual_mutation_publishes() {
        let svc = service(0);
        assert!(svc.start().await.unwrap());
        let mut rx = svc.subscribe();

        let id = svc.all_organisms().await[0].id;
        let outcome = svc.trigger_mutation(id).await.unwrap();
        assert_eq!(outcome.organism_id, id);
        assert_eq!(svc.stats().await.total_mutations, 1);

        let events = drain(&mut rx);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name(), "organism:mutated");

        let ghost = OrganismId::from_random_bytes([6; 16]);
        assert!(svc.trigger_mutation(ghost).await.is_none());
        assert!(svc.stop().await);
    }

    #[tokio::test]
    async fn queries_before_start() {
        let svc = service(0);
        assert_eq!(svc.organism_count().await, 0);
        assert!(svc.all_organisms().await.is_empty());
        let ghost = OrganismId::from_random_bytes([2; 16]);
        assert!(svc.organism(ghost).await.is_none());
        assert!(svc.lineage(ghost).await.is_none());
        assert!(svc.ancestry(ghost).await.is_empty());
        assert!(!svc.stats().await.is_running);
    }
}
