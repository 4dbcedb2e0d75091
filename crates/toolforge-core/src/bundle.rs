//! Stat bundles: the per-tool mapping from stat kind to value.

use crate::fixed::Fixed64;
use crate::id::StatId;
use crate::stat::StatRegistry;
use std::collections::BTreeMap;

/// A mapping from stat kind to value, either base (post-aggregation) or
/// effective (post-multiplier) stats.
///
/// Bundles are assembled by the aggregator and multiplier modules and then
/// [`finalize`](Self::finalize)d, which clamps every value to its kind's
/// bounds. Iteration order is stat ID order, so two bundles built from the
/// same inputs compare and iterate identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct StatBundle {
    values: BTreeMap<StatId, Fixed64>,
}

impl StatBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, stat: StatId, value: Fixed64) -> Self {
        self.values.insert(stat, value);
        self
    }

    pub(crate) fn set(&mut self, stat: StatId, value: Fixed64) {
        self.values.insert(stat, value);
    }

    pub fn get(&self, stat: StatId) -> Option<Fixed64> {
        self.values.get(&stat).copied()
    }

    /// The stat's value, or `fallback` if the bundle does not carry it.
    pub fn value_or(&self, stat: StatId, fallback: Fixed64) -> Fixed64 {
        self.get(stat).unwrap_or(fallback)
    }

    pub fn contains(&self, stat: StatId) -> bool {
        self.values.contains_key(&stat)
    }

    /// Iterate entries in stat ID order.
    pub fn iter(&self) -> impl Iterator<Item = (StatId, Fixed64)> + '_ {
        self.values.iter().map(|(id, v)| (*id, *v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Clamp every value to the bounds of its registered kind.
    ///
    /// Entries for kinds the registry does not know are left untouched.
    pub fn finalize(mut self, registry: &StatRegistry) -> Self {
        for (id, value) in self.values.iter_mut() {
            if let Some(def) = registry.kind(*id) {
                *value = def.bounds.clamp(*value);
            }
        }
        self
    }
}

impl FromIterator<(StatId, Fixed64)> for StatBundle {
    fn from_iter<I: IntoIterator<Item = (StatId, Fixed64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
