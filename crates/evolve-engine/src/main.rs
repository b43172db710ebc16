//! Engine binary for the Evolve population simulation.
//!
//! Wires configuration, structured logging, the cycle scheduler, and an
//! event-logging subscriber together, then runs until interrupted or until
//! the configured cycle bound is reached.
//!
//! # Startup Sequence
//!
//! 1. Load configuration (first argument, default `evolve-config.yaml`)
//! 2. Initialize structured logging (tracing)
//! 3. Build the evolution service and subscribe the event logger
//! 4. Start scheduling cycles
//! 5. Wait for Ctrl-C or a self-stop, then stop cleanly

mod error;

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use evolve_core::config::LoggingConfig;
use evolve_core::{EvolutionService, EvolveConfig};
use evolve_events::EngineEvent;

use crate::error::EngineError;

/// Config file used when no path is given on the command line.
const DEFAULT_CONFIG_PATH: &str = "evolve-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, logging, or seeding fails.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load configuration.
    let config_path = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let (config, from_file) = load_config(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    // 2. Initialize structured logging.
    init_logging(&config.logging)?;
    info!(
        path = %config_path.display(),
        from_file,
        mutation_rate = config.evolution.mutation_rate,
        max_population = config.evolution.max_population,
        cycle_interval_ms = config.evolution.cycle_interval_ms,
        selection_pressure = config.evolution.selection_pressure,
        seed = ?config.evolution.seed,
        max_cycles = config.simulation.max_cycles,
        "Configuration loaded"
    );

    // 3. Build the service and attach subscribers before anything happens.
    let service = EvolutionService::new(&config);
    let logger = tokio::spawn(log_events(service.subscribe()));
    let mut lifecycle = service.subscribe();

    // 4. Start.
    service.start().await.map_err(EngineError::from)?;

    // 5. Run until interrupted or self-stopped.
    tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            signal.map_err(|source| EngineError::Signal { source })?;
            info!("Shutdown signal received");
        }
        () = wait_for_stop(&mut lifecycle) => {
            info!("Scheduler stopped on its own");
        }
    }
    service.stop().await;

    let stats = service.stats().await;
    info!(
        generation = stats.global.generation,
        organisms = stats.global.total_organisms,
        total_mutations = stats.total_mutations,
        total_lineages = stats.total_lineages,
        emergent_behaviors = ?stats.emergent_behaviors,
        "evolve-engine shutdown complete"
    );

    // Dropping the service closes the channel and ends the logger.
    drop(lifecycle);
    drop(service);
    if let Err(e) = logger.await {
        warn!(error = %e, "Event logger ended abnormally");
    }
    Ok(())
}

/// Load configuration, falling back to defaults when the file is absent.
///
/// The flag is `true` when the file was read.
fn load_config(path: &Path) -> Result<(EvolveConfig, bool), EngineError> {
    if path.exists() {
        Ok((EvolveConfig::from_file(path)?, true))
    } else {
        let mut config = EvolveConfig::default();
        config.evolution.apply_env_overrides()?;
        config.validate()?;
        Ok((config, false))
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_logging(logging: &LoggingConfig) -> Result<(), EngineError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .map_err(|e| EngineError::Logging {
            message: e.to_string(),
        })?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    let installed = if logging.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| EngineError::Logging {
        message: e.to_string(),
    })
}

/// Log every engine event until the channel closes.
async fn log_events(mut rx: broadcast::Receiver<EngineEvent>) {
    loop {
        match rx.recv().await {
            Ok(event) => {
                let payload = serde_json::to_string(&event).unwrap_or_default();
                match event {
                    EngineEvent::EvolutionStarted(_)
                    | EngineEvent::EvolutionStopped(_)
                    | EngineEvent::OrganismEvolved(_)
                    | EngineEvent::EmergentBehaviorDetected(_) => {
                        info!(event = event.name(), %payload, "Engine event");
                    }
                    _ => debug!(event = event.name(), %payload, "Engine event"),
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "Event logger fell behind");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

/// Resolve once `evolution:stopped` is seen or the channel closes.
async fn wait_for_stop(rx: &mut broadcast::Receiver<EngineEvent>) {
    loop {
        match rx.recv().await {
            Ok(EngineEvent::EvolutionStopped(_)) | Err(RecvError::Closed) => return,
            Ok(_) | Err(RecvError::Lagged(_)) => {}
        }
    }
}
