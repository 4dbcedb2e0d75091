//! Harvest-speed resolution: the final mining speed of a tool on a block.
//!
//! # Algorithm
//!
//! 1. If the tool has no effectiveness rule, the rule rejects the block, or
//!    the block requires a higher harvest tier than the tool has, the speed
//!    is the configured baseline (1.0, "bare-handed").
//! 2. Otherwise the speed is the tool's effective `mining_speed`.
//! 3. A broken tool scales whatever step 1 or 2 produced by the broken-tool
//!    factor. The result stays strictly positive and strictly below the
//!    unpenalized speed.
//!
//! Resolution is stateless: a pure function of the tool's stats, its
//! condition, the block and the configuration.

use crate::block::BlockDescriptor;
use crate::definition::ToolStats;
use crate::fixed::{Fixed64, smallest_positive};

// ---------------------------------------------------------------------------
// Tool condition
// ---------------------------------------------------------------------------

/// Remaining durability of one tool instance, supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolCondition {
    pub durability: u32,
    pub max_durability: u32,
}

impl ToolCondition {
    /// `durability` is capped at `max_durability`.
    pub fn new(durability: u32, max_durability: u32) -> Self {
        Self {
            durability: durability.min(max_durability),
            max_durability,
        }
    }

    pub fn intact(max_durability: u32) -> Self {
        Self::new(max_durability, max_durability)
    }

    pub fn broken(max_durability: u32) -> Self {
        Self::new(0, max_durability)
    }

    /// Out of durability. A condition with no maximum tracks no wear and is
    /// never broken.
    pub fn is_broken(&self) -> bool {
        self.durability == 0 && self.max_durability > 0
    }

    /// The condition after taking `amount` damage.
    pub fn damaged(self, amount: u32) -> Self {
        Self {
            durability: self.durability.saturating_sub(amount),
            ..self
        }
    }

    /// Remaining durability as a fraction of the maximum, in `[0, 1]`.
    pub fn ratio(&self) -> Fixed64 {
        if self.max_durability == 0 {
            return Fixed64::ZERO;
        }
        let bits = (i128::from(self.durability) << 32) / i128::from(self.max_durability);
        Fixed64::from_bits(bits as i64)
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Tunables for harvest-speed resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarvestConfig {
    /// Speed of a tool that is not effective on a block.
    pub baseline_speed: Fixed64,
    /// Scale applied to a broken tool's speed. Must lie in `(0, 1)`.
    pub broken_speed_factor: Fixed64,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            baseline_speed: Fixed64::ONE,
            broken_speed_factor: Fixed64::from_num(0.3),
        }
    }
}

impl HarvestConfig {
    pub fn validate(&self) -> Result<(), HarvestConfigError> {
        if self.broken_speed_factor <= Fixed64::ZERO || self.broken_speed_factor >= Fixed64::ONE {
            return Err(HarvestConfigError::BrokenFactorOutOfRange(
                self.broken_speed_factor,
            ));
        }
        if self.baseline_speed <= Fixed64::ZERO {
            return Err(HarvestConfigError::NonPositiveBaseline(self.baseline_speed));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HarvestConfigError {
    #[error("broken speed factor {0} must be strictly between 0 and 1")]
    BrokenFactorOutOfRange(Fixed64),
    #[error("baseline speed {0} must be positive")]
    NonPositiveBaseline(Fixed64),
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Whether `tool` gets its bonus speed on `block`: the tool has an
/// effectiveness rule, the rule accepts the block and the tool's harvest
/// tier meets the block's requirement.
pub fn is_correct_tool(tool: &ToolStats, block: &BlockDescriptor) -> bool {
    let Some(predicate) = &tool.predicate else {
        tracing::trace!(tool = %tool.tool, "no effectiveness rule");
        return false;
    };
    if !predicate.is_effective(block) {
        tracing::trace!(tool = %tool.tool, block = ?block.block, "not effective");
        return false;
    }
    let sufficient = meets_harvest_level(tool.harvest_tier(), block.harvest_level);
    if !sufficient {
        tracing::trace!(
            tool = %tool.tool,
            block = ?block.block,
            required = ?block.harvest_level,
            "harvest tier too low"
        );
    }
    sufficient
}

/// Blocks without a requirement accept any tier.
fn meets_harvest_level(tier: Fixed64, required: Option<u32>) -> bool {
    match required {
        None => true,
        Some(level) => Fixed64::checked_from_num(level).is_some_and(|level| tier >= level),
    }
}

/// Scale `speed` down for a broken tool, keeping it in `(0, speed)`.
///
/// When `speed` is already the smallest positive value the result equals it.
fn broken_penalty(speed: Fixed64, factor: Fixed64) -> Fixed64 {
    let penalized = speed.saturating_mul(factor);
    let penalized = if penalized >= speed {
        speed.saturating_sub(smallest_positive())
    } else {
        penalized
    };
    penalized.max(smallest_positive())
}

/// The digging speed of `tool` on `block`. Always strictly positive.
pub fn resolve_speed(
    tool: &ToolStats,
    condition: ToolCondition,
    block: &BlockDescriptor,
    config: &HarvestConfig,
) -> Fixed64 {
    let speed = if is_correct_tool(tool, block) {
        tool.mining_speed()
    } else {
        config.baseline_speed
    }
    .max(smallest_positive());

    if condition.is_broken() {
        let penalized = broken_penalty(speed, config.broken_speed_factor);
        tracing::trace!(tool = %tool.tool, %speed, %penalized, "broken tool penalty");
        penalized
    } else {
        speed
    }
}

/// A validated [`HarvestConfig`] bundled with the resolution functions.
#[derive(Debug, Clone, Copy, Default)]
pub struct HarvestResolver {
    config: HarvestConfig,
}

impl HarvestResolver {
    pub fn new(config: HarvestConfig) -> Result<Self, HarvestConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &HarvestConfig {
        &self.config
    }

    pub fn resolve_speed(
        &self,
        tool: &ToolStats,
        condition: ToolCondition,
        block: &BlockDescriptor,
    ) -> Fixed64 {
        resolve_speed(tool, condition, block, &self.config)
    }

    pub fn is_correct_tool(&self, tool: &ToolStats, block: &BlockDescriptor) -> bool {
        is_correct_tool(tool, block)
    }
}
