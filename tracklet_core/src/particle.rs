//! Particle metadata: display name and colour keyed by particle id.
//!
//! A [`ParticleTable`] always carries a default entry, supplied when the table
//! is built, so lookups never fail.

use crate::types::ParticleId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Display attributes of one particle species.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticleInfo {
    pub name: String,
    pub color: String,
}

impl ParticleInfo {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
        }
    }
}

/// Immutable lookup from particle id to [`ParticleInfo`], with fallback.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParticleTable {
    entries: HashMap<ParticleId, ParticleInfo>,
    default: ParticleInfo,
}

impl ParticleTable {
    /// Empty table; every lookup resolves to `default`.
    pub fn new(default: ParticleInfo) -> Self {
        Self {
            entries: HashMap::new(),
            default,
        }
    }

    /// Add or replace the entry for `id`.
    pub fn with(mut self, id: ParticleId, info: ParticleInfo) -> Self {
        self.entries.insert(id, info);
        self
    }

    /// Entry for `id`, or the default entry when `id` is not in the table.
    pub fn get(&self, id: ParticleId) -> &ParticleInfo {
        match self.entries.get(&id) {
            Some(info) => info,
            None => {
                tracing::trace!(particle_id = id.0, "unknown particle id, using default");
                &self.default
            }
        }
    }

    pub fn default_info(&self) -> &ParticleInfo {
        &self.default
    }

    pub fn contains(&self, id: ParticleId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Entries sorted by id (default excluded).
    pub fn entries(&self) -> Vec<(ParticleId, &ParticleInfo)> {
        let mut out: Vec<_> = self.entries.iter().map(|(id, info)| (*id, info)).collect();
        out.sort_by_key(|(id, _)| *id);
        out
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Shared table of common species, keyed by PDG code.
    pub fn standard() -> &'static ParticleTable {
        static STANDARD: OnceLock<ParticleTable> = OnceLock::new();
        STANDARD.get_or_init(|| {
            ParticleTable::new(ParticleInfo::new("unknown", "grey"))
                .with(ParticleId(11), ParticleInfo::new("e-", "blue"))
                .with(ParticleId(-11), ParticleInfo::new("e+", "cyan"))
                .with(ParticleId(13), ParticleInfo::new("mu-", "red"))
                .with(ParticleId(-13), ParticleInfo::new("mu+", "orange"))
                .with(ParticleId(22), ParticleInfo::new("gamma", "yellow"))
                .with(ParticleId(111), ParticleInfo::new("pi0", "pink"))
                .with(ParticleId(211), ParticleInfo::new("pi+", "green"))
                .with(ParticleId(-211), ParticleInfo::new("pi-", "lime"))
                .with(ParticleId(321), ParticleInfo::new("K+", "purple"))
                .with(ParticleId(-321), ParticleInfo::new("K-", "violet"))
                .with(ParticleId(2112), ParticleInfo::new("n", "brown"))
                .with(ParticleId(2212), ParticleInfo::new("p", "black"))
                .with(ParticleId(-2212), ParticleInfo::new("p~", "magenta"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_id_resolves_to_entry() {
        let table = ParticleTable::standard();
        let info = table.get(ParticleId(13));
        assert_eq!(info.name, "mu-");
        assert_eq!(info.color, "red");
    }

    #[test]
    fn unknown_id_falls_back_to_default() {
        let table = ParticleTable::standard();
        assert!(!table.contains(ParticleId(99)));
        assert_eq!(table.get(ParticleId(99)), table.default_info());
    }

    #[test]
    fn with_replaces_existing_entry() {
        let table = ParticleTable::new(ParticleInfo::new("none", "white"))
            .with(ParticleId(1), ParticleInfo::new("a", "red"))
            .with(ParticleId(1), ParticleInfo::new("b", "blue"));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(ParticleId(1)).name, "b");
    }

    #[test]
    fn empty_table_always_returns_default() {
        let table = ParticleTable::new(ParticleInfo::new("none", "white"));
        assert!(table.is_empty());
        assert_eq!(table.get(ParticleId(-11)).name, "none");
    }

    #[test]
    fn entries_are_sorted_by_id() {
        let ids: Vec<i32> = ParticleTable::standard()
            .entries()
            .iter()
            .map(|(id, _)| id.0)
            .collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }
}
