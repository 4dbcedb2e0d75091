//! Part slots and the part stat aggregator.
//!
//! A tool definition declares an ordered list of [`PartSlot`]s. Given the
//! material stats assigned to each slot, [`aggregate_base_stats`] produces the
//! tool's base [`StatBundle`]. Each stat kind's [`StatSource`] decides whether
//! only the primary (head) part contributes or all parts do.

use crate::bundle::StatBundle;
use crate::fixed::Fixed64;
use crate::material::MaterialStats;
use crate::stat::{CombineRule, StatRegistry, StatSource};
use std::fmt;

/// The role a material occupies within a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PartRole {
    Head,
    Handle,
    Extra,
}

impl PartRole {
    pub fn name(self) -> &'static str {
        match self {
            PartRole::Head => "head",
            PartRole::Handle => "handle",
            PartRole::Extra => "extra",
        }
    }
}

impl fmt::Display for PartRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A slot declared by a tool definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartSlot {
    pub role: PartRole,
    /// Scale applied to this part's contributions to additive stats.
    pub weight: Fixed64,
    /// Whether aggregation fails when the slot has no material.
    pub required: bool,
}

impl PartSlot {
    pub fn new(role: PartRole) -> Self {
        Self {
            role,
            weight: Fixed64::ONE,
            required: true,
        }
    }

    pub fn head() -> Self {
        Self::new(PartRole::Head)
    }

    pub fn handle() -> Self {
        Self::new(PartRole::Handle)
    }

    pub fn extra() -> Self {
        Self::new(PartRole::Extra)
    }

    pub fn weighted(mut self, weight: Fixed64) -> Self {
        self.weight = weight;
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

/// A slot paired with the stats of the material assigned to it, if any.
#[derive(Debug, Clone, Copy)]
pub struct PartAssignment<'a> {
    pub slot: &'a PartSlot,
    pub material: Option<&'a MaterialStats>,
}

impl<'a> PartAssignment<'a> {
    pub fn new(slot: &'a PartSlot, material: Option<&'a MaterialStats>) -> Self {
        Self { slot, material }
    }
}

/// Index of the slot primary-sourced stats are read from: the first head
/// slot, or the first slot when the layout has no head.
pub fn primary_index(slots: impl IntoIterator<Item = PartRole>) -> Option<usize> {
    let mut first = None;
    for (i, role) in slots.into_iter().enumerate() {
        if role == PartRole::Head {
            return Some(i);
        }
        first.get_or_insert(i);
    }
    first
}

/// Combine per-part material stats into a base bundle holding every
/// registered stat kind.
///
/// - `Primary` kinds read the primary slot's material, falling back to the
///   kind's default when it does not provide the stat.
/// - `All` kinds merge every part's contribution with the kind's
///   [`CombineRule`]; additive contributions are scaled by slot weight. With
///   no contributions the kind's default is used.
///
/// Values are not clamped here; see [`StatBundle::finalize`].
pub fn aggregate_base_stats(
    registry: &StatRegistry,
    assignments: &[PartAssignment<'_>],
) -> Result<StatBundle, AggregateError> {
    for (index, assignment) in assignments.iter().enumerate() {
        if assignment.slot.required && assignment.material.is_none() {
            return Err(AggregateError::MissingPart {
                index,
                role: assignment.slot.role,
            });
        }
    }

    let primary = primary_index(assignments.iter().map(|a| a.slot.role))
        .and_then(|i| assignments[i].material);

    let mut bundle = StatBundle::new();
    for (id, def) in registry.iter() {
        let value = match def.source {
            StatSource::Primary => primary.and_then(|m| m.get(id)).unwrap_or(def.default),
            StatSource::All => {
                let mut contributions = assignments
                    .iter()
                    .filter_map(|a| {
                        let value = a.material?.get(id)?;
                        Some(match def.combine {
                            CombineRule::Add => value.saturating_mul(a.slot.weight),
                            CombineRule::Multiply => value,
                        })
                    })
                    .peekable();
                if contributions.peek().is_none() {
                    def.default
                } else {
                    contributions.fold(def.combine.neutral(), |acc, v| def.combine.combine(acc, v))
                }
            }
        };
        bundle.set(id, value);
    }
    Ok(bundle)
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AggregateError {
    #[error("no material assigned to required {role} slot {index}")]
    MissingPart { index: usize, role: PartRole },
}
