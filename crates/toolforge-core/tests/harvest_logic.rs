//! End-to-end harvest speed scenarios against the shared fixture.

use toolforge_core::bundle::StatBundle;
use toolforge_core::definition::{ToolDefinition, ToolModule};
use toolforge_core::fixed::Fixed64;
use toolforge_core::harvest::{HarvestConfig, HarvestResolver, ToolCondition, resolve_speed};
use toolforge_core::part::PartSlot;
use toolforge_core::predicate::BlockPredicate;
use toolforge_core::test_utils::*;

fn intact() -> ToolCondition {
    ToolCondition::intact(130)
}

// ===========================================================================
// Effectiveness
// ===========================================================================

#[test]
fn unmatched_block_uses_baseline() {
    let f = fixture();
    let tool = f.build(&f.cobble_definition());
    let speed = resolve_speed(&tool, intact(), &f.block("dirt"), &HarvestConfig::default());
    assert_eq!(speed, Fixed64::ONE);
}

#[test]
fn matched_block_uses_mining_speed() {
    let f = fixture();
    let tool = f.build(&f.cobble_definition());
    let speed = resolve_speed(&tool, intact(), &f.block("cobblestone"), &HarvestConfig::default());
    assert_eq!(speed, head_mining_speed());
}

#[test]
fn tag_predicate_matches_every_tagged_block() {
    let f = fixture();
    let resolver = HarvestResolver::default();
    let tool = f.standard_tool();
    for name in ["cobblestone", "stone"] {
        assert!(resolver.is_correct_tool(&tool, &f.block(name)), "{name}");
        assert_eq!(resolver.resolve_speed(&tool, intact(), &f.block(name)), head_mining_speed());
    }
    assert!(!resolver.is_correct_tool(&tool, &f.block("dirt")));
}

#[test]
fn definition_without_effectiveness_is_never_effective() {
    let f = fixture();
    let def = ToolDefinition::builder("club")
        .module(ToolModule::PartStats(f.standard_parts()))
        .build()
        .unwrap();
    let tool = f.build(&def);
    for name in ["dirt", "cobblestone", "stone", "obsidian"] {
        let speed = resolve_speed(&tool, intact(), &f.block(name), &HarvestConfig::default());
        assert_eq!(speed, Fixed64::ONE, "{name}");
    }
}

#[test]
fn composite_predicate_excludes_blocks() {
    let f = fixture();
    let pickaxe = f.palette.tag_id(PICKAXE_TAG).unwrap();
    let stone = f.palette.block_id("stone").unwrap();
    let def = ToolDefinition::builder("picky")
        .module(ToolModule::IsEffective(BlockPredicate::and([
            BlockPredicate::tag(pickaxe),
            BlockPredicate::not(BlockPredicate::set([stone])),
        ])))
        .module(ToolModule::PartStats(f.standard_parts()))
        .build()
        .unwrap();
    let tool = f.build(&def);
    let config = HarvestConfig::default();

    assert_eq!(resolve_speed(&tool, intact(), &f.block("cobblestone"), &config), head_mining_speed());
    assert_eq!(resolve_speed(&tool, intact(), &f.block("stone"), &config), Fixed64::ONE);
}

// ===========================================================================
// Harvest level
// ===========================================================================

#[test]
fn insufficient_harvest_tier_uses_baseline() {
    let f = fixture();
    let tool = f.standard_tool();
    assert!(HEAD_HARVEST_TIER < OBSIDIAN_LEVEL);
    let speed = resolve_speed(&tool, intact(), &f.block("obsidian"), &HarvestConfig::default());
    assert_eq!(speed, Fixed64::ONE);
}

#[test]
fn base_stats_module_can_raise_harvest_tier() {
    let f = fixture();
    let pickaxe = f.palette.tag_id(PICKAXE_TAG).unwrap();
    let def = ToolDefinition::builder("diamond_pickaxe")
        .module(ToolModule::IsEffective(BlockPredicate::tag(pickaxe)))
        .module(ToolModule::PartStats(f.standard_parts()))
        .module(ToolModule::BaseStats(
            StatBundle::new()
                .with(f.stats.harvest_tier, fixed(f64::from(OBSIDIAN_LEVEL - HEAD_HARVEST_TIER))),
        ))
        .build()
        .unwrap();
    let tool = f.build(&def);
    assert_eq!(tool.harvest_tier(), fixed(f64::from(OBSIDIAN_LEVEL)));
    let speed = resolve_speed(&tool, intact(), &f.block("obsidian"), &HarvestConfig::default());
    assert_eq!(speed, head_mining_speed());
}

// ===========================================================================
// Broken tools
// ===========================================================================

#[test]
fn broken_tool_on_unmatched_block_is_below_baseline() {
    let f = fixture();
    let tool = f.build(&f.cobble_definition());
    let speed = resolve_speed(
        &tool,
        ToolCondition::broken(130),
        &f.block("dirt"),
        &HarvestConfig::default(),
    );
    assert!(speed > Fixed64::ZERO);
    assert!(speed < Fixed64::ONE);
}

#[test]
fn broken_tool_on_matched_block_is_below_mining_speed() {
    let f = fixture();
    let tool = f.build(&f.cobble_definition());
    let speed = resolve_speed(
        &tool,
        ToolCondition::broken(130),
        &f.block("cobblestone"),
        &HarvestConfig::default(),
    );
    assert!(speed > Fixed64::ZERO);
    assert!(speed < head_mining_speed());
}

#[test]
fn broken_factor_is_configurable() {
    let f = fixture();
    let tool = f.build(&f.cobble_definition());
    let resolver = HarvestResolver::new(HarvestConfig {
        broken_speed_factor: fixed(0.5),
        ..HarvestConfig::default()
    })
    .unwrap();
    let speed = resolver.resolve_speed(&tool, ToolCondition::broken(130), &f.block("cobblestone"));
    assert_eq!(speed, fixed(3.0));
}

#[test]
fn worn_tool_is_not_penalized() {
    let f = fixture();
    let tool = f.build(&f.cobble_definition());
    let worn = ToolCondition::intact(130).damaged(129);
    assert!(!worn.is_broken());
    let speed = resolve_speed(&tool, worn, &f.block("cobblestone"), &HarvestConfig::default());
    assert_eq!(speed, head_mining_speed());
}

// ===========================================================================
// Multiplier modules
// ===========================================================================

#[test]
fn multiplier_module_scales_matched_speed() {
    let f = fixture();
    let tool = f.build(&f.mining_definition());
    let config = HarvestConfig::default();

    let cobble = resolve_speed(&tool, intact(), &f.block("cobblestone"), &config);
    assert_eq!(cobble, head_mining_speed() * 2);

    let stone = resolve_speed(&tool, intact(), &f.block("stone"), &config);
    assert_eq!(stone, Fixed64::ONE);
}

#[test]
fn weighted_parts_feed_durability() {
    let f = fixture();
    let def = ToolDefinition::builder("heavy")
        .module(ToolModule::PartStats(vec![
            PartSlot::head().weighted(fixed(2.0)),
            PartSlot::handle(),
            PartSlot::extra().optional(),
        ]))
        .build()
        .unwrap();
    let tool = def
        .build_stats(&f.registry, &f.catalog, &[Some(f.head), Some(f.handle), None])
        .unwrap();
    // 100 × 2 + 20
    assert_eq!(tool.durability(), fixed(220.0));
}
