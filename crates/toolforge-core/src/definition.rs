//! Tool definitions: ordered lists of pluggable computation modules.
//!
//! A [`ToolDefinition`] declares its part layout, its effectiveness rule and
//! any stat adjustments as [`ToolModule`]s. [`ToolDefinition::build_stats`]
//! runs them against a material selection:
//!
//! ```text
//! materials → aggregate_base_stats → BaseStats → MultiplyStats → finalize
//! ```
//!
//! Modules of the same kind run in declaration order.

use crate::bundle::StatBundle;
use crate::fixed::Fixed64;
use crate::id::{MaterialId, StatId};
use crate::material::MaterialCatalog;
use crate::multiplier::{MultiplierSet, apply_multipliers};
use crate::part::{AggregateError, PartAssignment, PartRole, PartSlot, aggregate_base_stats};
use crate::predicate::BlockPredicate;
use crate::stat::{StandardStats, StatRegistry, StatRegistryError};

/// A computation unit attached to a tool definition.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolModule {
    /// Blocks on which the tool's mining speed applies.
    IsEffective(BlockPredicate),
    /// The part layout aggregated into base stats.
    PartStats(Vec<PartSlot>),
    /// Flat contributions merged into the base stats with each kind's rule.
    BaseStats(StatBundle),
    /// Per-stat multipliers applied after base stats.
    MultiplyStats(MultiplierSet),
}

impl ToolModule {
    pub fn kind_name(&self) -> &'static str {
        match self {
            ToolModule::IsEffective(_) => "is_effective",
            ToolModule::PartStats(_) => "part_stats",
            ToolModule::BaseStats(_) => "base_stats",
            ToolModule::MultiplyStats(_) => "multiply_stats",
        }
    }
}

/// A validated tool definition. Read-only once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDefinition {
    name: String,
    modules: Vec<ToolModule>,
}

#[derive(Debug)]
pub struct ToolDefinitionBuilder {
    name: String,
    modules: Vec<ToolModule>,
}

impl ToolDefinitionBuilder {
    pub fn module(mut self, module: ToolModule) -> Self {
        self.modules.push(module);
        self
    }

    /// Validate the module list.
    ///
    /// Exactly one non-empty `PartStats` module is required and at most one
    /// `IsEffective` module is allowed. A definition without `IsEffective` is
    /// legal but never effective on any block.
    pub fn build(self) -> Result<ToolDefinition, ToolDefinitionError> {
        let mut parts = None;
        let mut effective = false;
        for module in &self.modules {
            match module {
                ToolModule::PartStats(slots) => {
                    if parts.replace(slots).is_some() {
                        return Err(ToolDefinitionError::DuplicateModule(module.kind_name()));
                    }
                }
                ToolModule::IsEffective(_) => {
                    if effective {
                        return Err(ToolDefinitionError::DuplicateModule(module.kind_name()));
                    }
                    effective = true;
                }
                ToolModule::BaseStats(_) | ToolModule::MultiplyStats(_) => {}
            }
        }

        match parts {
            None => return Err(ToolDefinitionError::NoPartStats(self.name)),
            Some(slots) if slots.is_empty() => {
                return Err(ToolDefinitionError::EmptyParts(self.name));
            }
            Some(_) => {}
        }
        if !effective {
            tracing::warn!(tool = %self.name, "tool definition has no effectiveness module; it will never be effective");
        }

        Ok(ToolDefinition {
            name: self.name,
            modules: self.modules,
        })
    }
}

impl ToolDefinition {
    pub fn builder(name: &str) -> ToolDefinitionBuilder {
        ToolDefinitionBuilder {
            name: name.to_string(),
            modules: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn modules(&self) -> &[ToolModule] {
        &self.modules
    }

    /// The declared part layout.
    pub fn parts(&self) -> &[PartSlot] {
        self.modules
            .iter()
            .find_map(|m| match m {
                ToolModule::PartStats(slots) => Some(slots.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    pub fn predicate(&self) -> Option<&BlockPredicate> {
        self.modules.iter().find_map(|m| match m {
            ToolModule::IsEffective(p) => Some(p),
            _ => None,
        })
    }

    /// Multiplier modules in declaration order.
    pub fn multipliers(&self) -> impl Iterator<Item = &MultiplierSet> {
        self.modules.iter().filter_map(|m| match m {
            ToolModule::MultiplyStats(set) => Some(set),
            _ => None,
        })
    }

    fn base_stats(&self) -> impl Iterator<Item = &StatBundle> {
        self.modules.iter().filter_map(|m| match m {
            ToolModule::BaseStats(bundle) => Some(bundle),
            _ => None,
        })
    }

    /// Compute the effective stats of this tool built from `materials`.
    ///
    /// `materials[i]` fills the i-th declared slot; a selection shorter than
    /// the layout leaves the trailing slots empty.
    pub fn build_stats(
        &self,
        registry: &StatRegistry,
        catalog: &MaterialCatalog,
        materials: &[Option<MaterialId>],
    ) -> Result<ToolStats, ToolBuildError> {
        let parts = self.parts();
        if materials.len() > parts.len() {
            return Err(ToolBuildError::SelectionMismatch {
                slots: parts.len(),
                materials: materials.len(),
            });
        }

        let mut assignments = Vec::with_capacity(parts.len());
        for (i, slot) in parts.iter().enumerate() {
            let stats = match materials.get(i).copied().flatten() {
                None => None,
                Some(id) => {
                    let material = catalog.get(id).ok_or(ToolBuildError::UnknownMaterial(id))?;
                    let stats = material.stats.get(&slot.role).ok_or_else(|| {
                        ToolBuildError::IncompatibleMaterial {
                            material: material.name.clone(),
                            role: slot.role,
                        }
                    })?;
                    Some(stats)
                }
            };
            assignments.push(PartAssignment::new(slot, stats));
        }

        let mut bundle = aggregate_base_stats(registry, &assignments)?;

        for bonus in self.base_stats() {
            for (id, value) in bonus.iter() {
                let def = registry.kind(id).ok_or(ToolBuildError::UnknownStat(id))?;
                let current = bundle.value_or(id, def.default);
                bundle.set(id, def.combine.combine(current, value));
            }
        }

        let multipliers: Vec<&MultiplierSet> = self.multipliers().collect();
        let bundle = apply_multipliers(&bundle, &multipliers).finalize(registry);
        let stats = StandardStats::resolve(registry)?;

        tracing::debug!(tool = %self.name, stats = bundle.len(), "tool stats built");
        Ok(ToolStats {
            tool: self.name.clone(),
            bundle,
            predicate: self.predicate().cloned(),
            stats,
        })
    }
}

/// The effective stats of one tool definition × material selection, plus
/// everything the harvest resolver needs to evaluate it.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolStats {
    pub tool: String,
    pub bundle: StatBundle,
    pub predicate: Option<BlockPredicate>,
    pub stats: StandardStats,
}

impl ToolStats {
    pub fn new(
        tool: &str,
        bundle: StatBundle,
        predicate: Option<BlockPredicate>,
        stats: StandardStats,
    ) -> Self {
        Self {
            tool: tool.to_string(),
            bundle,
            predicate,
            stats,
        }
    }

    pub fn mining_speed(&self) -> Fixed64 {
        self.bundle.value_or(self.stats.mining_speed, Fixed64::ONE)
    }

    pub fn harvest_tier(&self) -> Fixed64 {
        self.bundle.value_or(self.stats.harvest_tier, Fixed64::ZERO)
    }

    pub fn durability(&self) -> Fixed64 {
        self.bundle.value_or(self.stats.durability, Fixed64::ONE)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ToolDefinitionError {
    #[error("tool definition {0} has no part_stats module")]
    NoPartStats(String),
    #[error("tool definition {0} declares no parts")]
    EmptyParts(String),
    #[error("duplicate {0} module")]
    DuplicateModule(&'static str),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ToolBuildError {
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
    #[error(transparent)]
    Registry(#[from] StatRegistryError),
    #[error("unknown material: {0:?}")]
    UnknownMaterial(MaterialId),
    #[error("material {material} cannot be used as a {role} part")]
    IncompatibleMaterial { material: String, role: PartRole },
    #[error("{materials} materials selected for {slots} part slots")]
    SelectionMismatch { slots: usize, materials: usize },
    #[error("unknown stat: {0:?}")]
    UnknownStat(StatId),
}
