//! Lifecycle events and event publishing for the Evolve engine.
//!
//! The engine core never talks to a transport. State transitions return
//! lists of [`EngineEvent`]s; the scheduler hands them to an
//! [`EventPublisher`] once the cycle has finished.
//!
//! # Modules
//!
//! - [`event`] -- Event enum and payload structs with their wire names
//! - [`publisher`] -- [`EventPublisher`] trait, broadcast and no-op sinks

pub mod event;
pub mod publisher;

pub use event::{
    CycleComplete, EmergentBehaviorDetected, EngineEvent, EvolutionStarted, EvolutionStopped,
    OrganismDied, OrganismEvolved, OrganismMutated,
};
pub use publisher::{BroadcastPublisher, DEFAULT_CHANNEL_CAPACITY, EventPublisher, NoOpPublisher};
