//! Toolforge Core -- the data-driven tool stat engine.
//!
//! Tools are assembled from material parts. This crate turns a tool
//! definition plus a material selection into effective stats, and those
//! stats plus a block into a digging speed. All arithmetic uses
//! deterministic fixed-point values.
//!
//! # Stat Pipeline
//!
//! [`definition::ToolDefinition::build_stats`] runs a tool's modules in a
//! fixed order:
//!
//! 1. **Aggregate** -- Combine the per-part material stats using each stat
//!    kind's combine rule and source policy.
//! 2. **Base stats** -- Merge flat contributions declared by the definition.
//! 3. **Multiply** -- Fold every multiplier module into one factor per stat
//!    and apply it once.
//! 4. **Finalize** -- Clamp each stat into its registered bounds.
//!
//! [`harvest::resolve_speed`] then evaluates the result against a block:
//!
//! ```rust,ignore
//! let tool = definition.build_stats(&registry, &catalog, &[Some(iron), Some(wood)])?;
//! let speed = resolve_speed(&tool, ToolCondition::intact(250), &block, &HarvestConfig::default());
//! ```
//!
//! # Key Types
//!
//! - [`stat::StatRegistry`] -- Immutable table of stat kinds (frozen at startup).
//! - [`material::MaterialCatalog`] -- Per-material, per-role stat contributions.
//! - [`part::aggregate_base_stats`] -- The part stat aggregator.
//! - [`predicate::BlockPredicate`] -- Composable effectiveness rules.
//! - [`multiplier::MultiplierSet`] -- Per-stat scaling factors.
//! - [`harvest::HarvestResolver`] -- Final speed resolution.
//! - [`cache::StatCache`] -- Memoised stats per definition and selection.
//! - [`fixed::Fixed64`] -- Q32.32 fixed-point type for deterministic math.

pub mod block;
pub mod bundle;
pub mod cache;
pub mod definition;
pub mod fixed;
pub mod harvest;
pub mod id;
pub mod material;
pub mod multiplier;
pub mod part;
pub mod predicate;
pub mod stat;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
