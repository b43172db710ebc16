//! Ranked culling.
//!
//! Each cycle removes the excess over `max_population` plus a small
//! pressure-proportional number of "natural" deaths, always starting from
//! the least fit. The population is never culled below [`SURVIVOR_FLOOR`].

use evolve_types::{DeathCause, Organism};

use crate::config::EvolutionParams;
use crate::store::PopulationStore;

/// Selection never reduces the population below this many organisms.
pub const SURVIVOR_FLOOR: usize = 5;

/// Scale applied to selection pressure when computing natural deaths.
pub const NATURAL_DEATH_FACTOR: f64 = 0.1;

/// Number of organisms selection removes from a population of `live`.
///
/// `min(max(0, live - max) + floor(live * pressure * 0.1), live - 5)`,
/// saturating at 0.
pub fn removal_count(live: usize, params: &EvolutionParams) -> usize {
    let target_reduction = live.saturating_sub(params.max_population);

    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    let natural_deaths =
        (live as f64 * params.selection_pressure.max(0.0) * NATURAL_DEATH_FACTOR).floor() as usize;

    target_reduction
        .saturating_add(natural_deaths)
        .min(live.saturating_sub(SURVIVOR_FLOOR))
}

/// Selection pass: remove the lowest-fitness organisms with cause
/// `selection_pressure`. Returns the removed records, least fit first.
pub fn apply_selection_pressure(
    store: &mut PopulationStore,
    params: &EvolutionParams,
) -> Vec<Organism> {
    let removals = removal_count(store.count(), params);
    if removals == 0 {
        return Vec::new();
    }

    let mut ranked: Vec<(f64, _)> = store.all().map(|o| (o.fitness, o.id)).collect();
    ranked.sort_by(|a, b| a.0.total_cmp(&b.0));

    ranked
        .into_iter()
        .take(removals)
        .filter_map(|(_, id)| store.remove(id, DeathCause::SelectionPressure))
        .collect()
}
