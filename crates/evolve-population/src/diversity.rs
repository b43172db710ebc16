//! Simpson's diversity index over organism types.

use std::collections::BTreeMap;

use evolve_types::{Organism, OrganismType};

/// Count organisms per type.
pub fn type_distribution<'a, I>(organisms: I) -> BTreeMap<OrganismType, usize>
where
    I: IntoIterator<Item = &'a Organism>,
{
    let mut counts = BTreeMap::new();
    for organism in organisms {
        let entry = counts.entry(organism.organism_type).or_insert(0_usize);
        *entry = entry.saturating_add(1);
    }
    counts
}

/// Simpson's index `1 - sum(n_i (n_i - 1)) / (N (N - 1))` for a type
/// distribution.
///
/// Returns exactly 0 for fewer than two distinct types or `N <= 1`, and is
/// always in `[0, 1]`.
pub fn simpson_index(distribution: &BTreeMap<OrganismType, usize>) -> f64 {
    let total: usize = distribution.values().sum();
    if total <= 1 || distribution.len() < 2 {
        return 0.0;
    }

    #[allow(clippy::cast_precision_loss)]
    let pairs = |n: usize| n as f64 * n.saturating_sub(1) as f64;

    let same_type: f64 = distribution.values().map(|&n| pairs(n)).sum();
    (1.0 - same_type / pairs(total)).clamp(0.0, 1.0)
}

/// Diversity of a set of organisms.
pub fn diversity_index<'a, I>(organisms: I) -> f64
where
    I: IntoIterator<Item = &'a Organism>,
{
    simpson_index(&type_distribution(organisms))
}
