//! Multiplier modules: per-stat scalar factors applied on top of a bundle.

use crate::bundle::StatBundle;
use crate::fixed::Fixed64;
use crate::id::StatId;
use std::borrow::Borrow;
use std::collections::BTreeMap;

/// Per-stat multipliers. Stats without an entry have factor 1.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiplierSet {
    factors: BTreeMap<StatId, Fixed64>,
}

impl MultiplierSet {
    pub fn builder() -> MultiplierSetBuilder {
        MultiplierSetBuilder::default()
    }

    /// The factor for `stat`, 1 if unlisted.
    pub fn factor(&self, stat: StatId) -> Fixed64 {
        self.factors.get(&stat).copied().unwrap_or(Fixed64::ONE)
    }

    pub fn iter(&self) -> impl Iterator<Item = (StatId, Fixed64)> + '_ {
        self.factors.iter().map(|(id, f)| (*id, *f))
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    /// A new bundle with every entry multiplied by this set's factor.
    pub fn apply(&self, bundle: &StatBundle) -> StatBundle {
        bundle
            .iter()
            .map(|(id, value)| (id, value.saturating_mul(self.factor(id))))
            .collect()
    }
}

impl FromIterator<(StatId, Fixed64)> for MultiplierSet {
    fn from_iter<I: IntoIterator<Item = (StatId, Fixed64)>>(iter: I) -> Self {
        Self {
            factors: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Default)]
pub struct MultiplierSetBuilder {
    factors: BTreeMap<StatId, Fixed64>,
}

impl MultiplierSetBuilder {
    /// Set the factor for `stat`, replacing any earlier value.
    pub fn set(mut self, stat: StatId, factor: Fixed64) -> Self {
        self.factors.insert(stat, factor);
        self
    }

    pub fn build(self) -> MultiplierSet {
        MultiplierSet {
            factors: self.factors,
        }
    }
}

/// Apply `modules` to `bundle` in declaration order.
///
/// Factors for each stat are folded across modules first and the product is
/// applied to the base value once, so swapping two modules never changes a
/// final value.
pub fn apply_multipliers<M: Borrow<MultiplierSet>>(bundle: &StatBundle, modules: &[M]) -> StatBundle {
    bundle
        .iter()
        .map(|(id, value)| {
            let factor = modules
                .iter()
                .fold(Fixed64::ONE, |acc, m| acc.saturating_mul(m.borrow().factor(id)));
            (id, value.saturating_mul(factor))
        })
        .collect()
}
