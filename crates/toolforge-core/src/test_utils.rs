//! Shared test helpers for integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use crate::block::{BlockDescriptor, BlockPalette, BlockPaletteBuilder};
use crate::definition::{ToolDefinition, ToolModule, ToolStats};
use crate::fixed::Fixed64;
use crate::id::MaterialId;
use crate::material::{MaterialCatalog, MaterialCatalogBuilder, MaterialStats};
use crate::multiplier::MultiplierSet;
use crate::part::{PartRole, PartSlot};
use crate::predicate::BlockPredicate;
use crate::stat::{StandardStats, StatRegistry};

// ===========================================================================
// Fixed-point helper
// ===========================================================================

pub fn fixed(v: f64) -> Fixed64 {
    Fixed64::from_num(v)
}

// ===========================================================================
// Reference values
// ===========================================================================

/// Mining speed of the head material.
pub fn head_mining_speed() -> Fixed64 {
    fixed(6.0)
}

/// Harvest tier of the head material.
pub const HEAD_HARVEST_TIER: u32 = 1;

/// Harvest level obsidian requires.
pub const OBSIDIAN_LEVEL: u32 = 3;

pub const PICKAXE_TAG: &str = "mineable/pickaxe";
pub const SHOVEL_TAG: &str = "mineable/shovel";

// ===========================================================================
// Fixture
// ===========================================================================

/// A standard registry, a three-material catalog and a small block palette.
///
/// Materials:
/// - `iron` (head only): durability 100, mining speed 6, harvest tier 1,
///   attack damage 2.
/// - `wood` (handle 20 / extra 5 durability).
/// - `string` (handle 15 / extra 10 durability).
///
/// Blocks: `dirt` (shovel), `cobblestone` and `stone` (pickaxe), `obsidian`
/// (pickaxe, level 3).
pub struct Fixture {
    pub registry: StatRegistry,
    pub stats: StandardStats,
    pub catalog: MaterialCatalog,
    pub palette: BlockPalette,
    pub head: MaterialId,
    pub handle: MaterialId,
    pub extra: MaterialId,
}

pub fn fixture() -> Fixture {
    let registry = StatRegistry::standard();
    let stats = StandardStats::resolve(&registry).unwrap();

    let durability = |v: f64| MaterialStats::builder().set(stats.durability, fixed(v)).build();

    let mut materials = MaterialCatalogBuilder::new();
    let head = materials
        .register(
            "iron",
            vec![(
                PartRole::Head,
                MaterialStats::builder()
                    .set(stats.durability, fixed(100.0))
                    .set(stats.mining_speed, head_mining_speed())
                    .set(stats.harvest_tier, fixed(f64::from(HEAD_HARVEST_TIER)))
                    .set(stats.attack_damage, fixed(2.0))
                    .build(),
            )],
        )
        .unwrap();
    let handle = materials
        .register(
            "wood",
            vec![
                (PartRole::Handle, durability(20.0)),
                (PartRole::Extra, durability(5.0)),
            ],
        )
        .unwrap();
    let extra = materials
        .register(
            "string",
            vec![
                (PartRole::Handle, durability(15.0)),
                (PartRole::Extra, durability(10.0)),
            ],
        )
        .unwrap();
    let catalog = materials.build(&registry).unwrap();

    let mut blocks = BlockPaletteBuilder::new();
    blocks.register_block("dirt", &[SHOVEL_TAG], None).unwrap();
    blocks.register_block("cobblestone", &[PICKAXE_TAG], None).unwrap();
    blocks.register_block("stone", &[PICKAXE_TAG], None).unwrap();
    blocks
        .register_block("obsidian", &[PICKAXE_TAG], Some(OBSIDIAN_LEVEL))
        .unwrap();
    let palette = blocks.build();

    Fixture {
        registry,
        stats,
        catalog,
        palette,
        head,
        handle,
        extra,
    }
}

impl Fixture {
    /// Head, handle, extra.
    pub fn standard_parts(&self) -> Vec<PartSlot> {
        vec![PartSlot::head(), PartSlot::handle(), PartSlot::extra()]
    }

    pub fn standard_selection(&self) -> Vec<Option<MaterialId>> {
        vec![Some(self.head), Some(self.handle), Some(self.extra)]
    }

    /// Look up a palette block by name.
    pub fn block(&self, name: &str) -> BlockDescriptor {
        self.palette.descriptor_by_name(name).unwrap().clone()
    }

    /// `pickaxe`: effective on every block tagged `mineable/pickaxe`.
    pub fn standard_definition(&self) -> ToolDefinition {
        let tag = self.palette.tag_id(PICKAXE_TAG).unwrap();
        ToolDefinition::builder("pickaxe")
            .module(ToolModule::IsEffective(BlockPredicate::tag(tag)))
            .module(ToolModule::PartStats(self.standard_parts()))
            .build()
            .unwrap()
    }

    pub fn standard_tool(&self) -> ToolStats {
        self.standard_definition()
            .build_stats(&self.registry, &self.catalog, &self.standard_selection())
            .unwrap()
    }

    /// `cobble_only`: effective on cobblestone alone.
    pub fn cobble_definition(&self) -> ToolDefinition {
        let cobble = self.palette.block_id("cobblestone").unwrap();
        ToolDefinition::builder("cobble_only")
            .module(ToolModule::IsEffective(BlockPredicate::set([cobble])))
            .module(ToolModule::PartStats(self.standard_parts()))
            .build()
            .unwrap()
    }

    /// `mining_tool`: effective on cobblestone, with a 2× mining speed module.
    pub fn mining_definition(&self) -> ToolDefinition {
        let cobble = self.palette.block_id("cobblestone").unwrap();
        ToolDefinition::builder("mining_tool")
            .module(ToolModule::IsEffective(BlockPredicate::set([cobble])))
            .module(ToolModule::PartStats(self.standard_parts()))
            .module(ToolModule::MultiplyStats(
                MultiplierSet::builder()
                    .set(self.stats.mining_speed, fixed(2.0))
                    .build(),
            ))
            .build()
            .unwrap()
    }

    /// Build any definition laid out with [`Fixture::standard_parts`].
    pub fn build(&self, definition: &ToolDefinition) -> ToolStats {
        definition
            .build_stats(&self.registry, &self.catalog, &self.standard_selection())
            .unwrap()
    }
}
