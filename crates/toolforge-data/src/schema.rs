//! Serde data file structs for tool content definitions.
//!
//! These structs define the on-disk format for stat kinds, materials, blocks,
//! tool definitions and harvest configuration. They are deserialized from
//! RON, JSON, or TOML data files and then resolved into core types by the
//! loader.

use serde::Deserialize;
use std::collections::BTreeMap;

fn default_true() -> bool {
    true
}

fn default_one() -> f64 {
    1.0
}

// ===========================================================================
// Stat kinds
// ===========================================================================

/// A custom stat kind registered on top of the stock catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct StatKindData {
    pub name: String,
    #[serde(default)]
    pub default: f64,
    pub combine: CombineData,
    #[serde(default)]
    pub source: SourceData,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombineData {
    Add,
    Multiply,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceData {
    #[default]
    All,
    Primary,
}

// ===========================================================================
// Materials
// ===========================================================================

/// A material and the stats it contributes per part role. A role that is
/// absent means the material cannot fill that role.
#[derive(Debug, Clone, Deserialize)]
pub struct MaterialData {
    pub name: String,
    #[serde(default)]
    pub head: Option<BTreeMap<String, f64>>,
    #[serde(default)]
    pub handle: Option<BTreeMap<String, f64>>,
    #[serde(default)]
    pub extra: Option<BTreeMap<String, f64>>,
}

// ===========================================================================
// Blocks
// ===========================================================================

/// A block type in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockData {
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub harvest_level: Option<u32>,
}

// ===========================================================================
// Tools
// ===========================================================================

/// A tool definition: a name and an ordered module list.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolData {
    pub name: String,
    pub modules: Vec<ModuleData>,
}

/// One tool module. Stat maps are keyed by stat kind name.
#[derive(Debug, Clone, Deserialize)]
pub enum ModuleData {
    IsEffective(PredicateData),
    PartStats(Vec<PartData>),
    BaseStats(BTreeMap<String, f64>),
    MultiplyStats(BTreeMap<String, f64>),
}

/// An effectiveness rule. Blocks and tags are referenced by name.
#[derive(Debug, Clone, Deserialize)]
pub enum PredicateData {
    Any,
    Never,
    Blocks(Vec<String>),
    Tag(String),
    And(Vec<PredicateData>),
    Or(Vec<PredicateData>),
    Not(Box<PredicateData>),
}

/// A part slot in a tool's layout.
#[derive(Debug, Clone, Deserialize)]
pub struct PartData {
    pub role: RoleData,
    #[serde(default = "default_one")]
    pub weight: f64,
    #[serde(default = "default_true")]
    pub required: bool,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleData {
    Head,
    Handle,
    Extra,
}

// ===========================================================================
// Harvest configuration
// ===========================================================================

/// Resolver tunables. Missing fields take the engine defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct HarvestData {
    #[serde(default = "default_one")]
    pub baseline_speed: f64,
    #[serde(default = "default_broken_speed_factor")]
    pub broken_speed_factor: f64,
}

fn default_broken_speed_factor() -> f64 {
    0.3
}

impl Default for HarvestData {
    fn default() -> Self {
        Self {
            baseline_speed: default_one(),
            broken_speed_factor: default_broken_speed_factor(),
        }
    }
}

// ===========================================================================
// TOML wrappers
// ===========================================================================

/// Wrapper for a list of stat kinds in TOML format.
#[derive(Debug, Clone, Deserialize)]
pub struct TomlStats {
    pub stats: Vec<StatKindData>,
}

/// Wrapper for a list of materials in TOML format.
#[derive(Debug, Clone, Deserialize)]
pub struct TomlMaterials {
    pub materials: Vec<MaterialData>,
}

/// Wrapper for a list of blocks in TOML format.
#[derive(Debug, Clone, Deserialize)]
pub struct TomlBlocks {
    pub blocks: Vec<BlockData>,
}

/// Wrapper for a list of tools in TOML format.
#[derive(Debug, Clone, Deserialize)]
pub struct TomlTools {
    pub tools: Vec<ToolData>,
}

// ===========================================================================
// Tests
// ===========================================================================
