//! Type-safe identifier wrappers around [`Uuid`].
//!
//! Organism identifiers are opaque and never reused. The engine draws them
//! from its own random source (see [`OrganismId::from_random_bytes`]) so a
//! seeded run produces the same identifiers, and therefore the same map
//! iteration order, every time.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Unique identifier for an organism in the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct OrganismId(pub Uuid);

impl OrganismId {
    /// Create a new identifier using UUID v7 (time-ordered).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Build a UUID v4 identifier from caller-supplied random bytes.
    ///
    /// Version and variant bits are overwritten, so any 16 bytes are valid.
    pub const fn from_random_bytes(bytes: [u8; 16]) -> Self {
        Self(uuid::Builder::from_random_bytes(bytes).into_uuid())
    }

    /// Return the inner [`Uuid`] value.
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for OrganismId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for OrganismId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for OrganismId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl From<OrganismId> for Uuid {
    fn from(id: OrganismId) -> Self {
        id.0
    }
}

impl core::str::FromStr for OrganismId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_bytes_produce_v4() {
        let id = OrganismId::from_random_bytes([7; 16]);
        assert_eq!(id.into_inner().get_version_num(), 4);
    }

    #[test]
    fn same_bytes_same_id() {
        let a = OrganismId::from_random_bytes([42; 16]);
        let b = OrganismId::from_random_bytes([42; 16]);
        assert_eq!(a, b);
    }

    #[test]
    fn id_display_matches_uuid() {
        let id = OrganismId::new();
        assert_eq!(id.to_string(), id.into_inner().to_string());
    }

    #[test]
    fn id_parses_from_display() {
        let id = OrganismId::new();
        let parsed: Result<OrganismId, _> = id.to_string().parse();
        assert_eq!(parsed.ok(), Some(id));
    }

    #[test]
    fn id_serializes_as_bare_uuid() {
        let id = OrganismId::from_random_bytes([1; 16]);
        let json = serde_json::to_string(&id).unwrap_or_default();
        assert_eq!(json, format!("\"{}\"", id.into_inner()));
    }
}
