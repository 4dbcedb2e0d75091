//! Resolution pipeline: reads data files, resolves cross-references, builds registries.
//!
//! Provides format detection (RON/JSON/TOML), file discovery, and deserialization
//! helpers, plus [`load_content`], which turns a content directory into the
//! immutable core registries.
//!
//! # Content directory
//!
//! | base name   | required | contents                                  |
//! |-------------|----------|-------------------------------------------|
//! | `stats`     | no       | custom stat kinds added to the stock set  |
//! | `materials` | yes      | per-role material stats                   |
//! | `blocks`    | no       | block names, tags and harvest levels      |
//! | `tools`     | yes      | tool definitions (ordered module lists)   |
//! | `harvest`   | no       | resolver tunables                         |
//!
//! Each file may be `.ron`, `.toml` or `.json`. TOML list files keep their
//! entries under a top-level key named after the file (`[[tools]]`).

use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use toolforge_core::block::{BlockDescriptor, BlockPalette, BlockPaletteBuilder, BlockPaletteError};
use toolforge_core::bundle::StatBundle;
use toolforge_core::definition::{ToolDefinition, ToolDefinitionError, ToolModule};
use toolforge_core::fixed::{Fixed64, f64_to_fixed64};
use toolforge_core::harvest::{HarvestConfig, HarvestConfigError, HarvestResolver};
use toolforge_core::id::{BlockId, MaterialId, StatId};
use toolforge_core::material::{MaterialCatalog, MaterialCatalogBuilder, MaterialError, MaterialStats};
use toolforge_core::multiplier::MultiplierSet;
use toolforge_core::part::{PartRole, PartSlot};
use toolforge_core::predicate::BlockPredicate;
use toolforge_core::stat::{
    CombineRule, StandardStats, StatBounds, StatRegistry, StatRegistryBuilder, StatRegistryError,
    StatSource,
};

use crate::schema::{
    BlockData, CombineData, HarvestData, MaterialData, ModuleData, PartData, PredicateData,
    RoleData, SourceData, StatKindData, ToolData,
};

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur during data loading.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// A required data file was not found in the given directory.
    #[error("required file '{file}' not found in {dir}")]
    MissingRequired { file: String, dir: PathBuf },

    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// A name reference could not be resolved.
    #[error("unresolved {expected_kind} reference '{name}' in {file}")]
    UnresolvedRef {
        file: PathBuf,
        name: String,
        expected_kind: &'static str,
    },

    /// A duplicate name was found.
    #[error("duplicate name '{name}' in {file}")]
    DuplicateName { file: PathBuf, name: String },

    /// A tool definition failed validation.
    #[error("invalid tool definition '{tool}': {source}")]
    Tool {
        tool: String,
        source: ToolDefinitionError,
    },

    #[error(transparent)]
    Stat(#[from] StatRegistryError),

    #[error(transparent)]
    Material(#[from] MaterialError),

    #[error(transparent)]
    Block(#[from] BlockPaletteError),

    #[error(transparent)]
    Harvest(#[from] HarvestConfigError),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported data file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// File discovery
// ===========================================================================

/// Scan a directory for a data file with the given base name (without extension).
///
/// Looks for `{base_name}.ron`, `{base_name}.toml`, and `{base_name}.json`.
/// Returns `Ok(None)` if no file is found, or `Err(ConflictingFormats)` if
/// multiple formats exist for the same base name.
pub fn find_data_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let mut found: Option<PathBuf> = None;

    for ext in ["ron", "toml", "json"] {
        let candidate = dir.join(format!("{base_name}.{ext}"));
        if candidate.exists() {
            if let Some(existing) = found {
                return Err(DataLoadError::ConflictingFormats {
                    a: existing,
                    b: candidate,
                });
            }
            found = Some(candidate);
        }
    }

    Ok(found)
}

/// Like [`find_data_file`], but returns an error if no file is found.
pub fn require_data_file(dir: &Path, base_name: &str) -> Result<PathBuf, DataLoadError> {
    find_data_file(dir, base_name)?.ok_or_else(|| DataLoadError::MissingRequired {
        file: base_name.to_string(),
        dir: dir.to_path_buf(),
    })
}

// ===========================================================================
// Deserialization
// ===========================================================================

fn parse_error(path: &Path, e: impl std::fmt::Display) -> DataLoadError {
    DataLoadError::Parse {
        file: path.to_path_buf(),
        detail: e.to_string(),
    }
}

/// Read a file and deserialize it according to its format (detected from extension).
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        Format::Ron => ron::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Json => serde_json::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Toml => toml::from_str(&content).map_err(|e| parse_error(path, e)),
    }
}

/// Deserialize a list from a file. For TOML files, extracts the array at the
/// given `toml_key` from a top-level table. For RON and JSON, deserializes
/// directly as `Vec<T>`.
pub fn deserialize_list<T: DeserializeOwned>(
    path: &Path,
    toml_key: &str,
) -> Result<Vec<T>, DataLoadError> {
    if detect_format(path)? != Format::Toml {
        return deserialize_file(path);
    }

    let content = std::fs::read_to_string(path)?;
    let mut table: toml::Table = toml::from_str(&content).map_err(|e| parse_error(path, e))?;
    let array = table.remove(toml_key).ok_or_else(|| DataLoadError::Parse {
        file: path.to_path_buf(),
        detail: format!("missing key '{toml_key}' in TOML file"),
    })?;
    array
        .try_into()
        .map_err(|e: toml::de::Error| parse_error(path, e))
}

// ===========================================================================
// Name resolution helpers
// ===========================================================================

/// Look up a name in a map, returning an `UnresolvedRef` error if not found.
pub fn resolve_name<'a, V>(
    map: &'a HashMap<String, V>,
    name: &str,
    file: &Path,
    expected_kind: &'static str,
) -> Result<&'a V, DataLoadError> {
    map.get(name).ok_or_else(|| DataLoadError::UnresolvedRef {
        file: file.to_path_buf(),
        name: name.to_string(),
        expected_kind,
    })
}

/// Check whether a name already exists in a map, returning a `DuplicateName`
/// error if so.
pub fn check_duplicate<V>(
    map: &HashMap<String, V>,
    name: &str,
    file: &Path,
) -> Result<(), DataLoadError> {
    if map.contains_key(name) {
        Err(DataLoadError::DuplicateName {
            file: file.to_path_buf(),
            name: name.to_string(),
        })
    } else {
        Ok(())
    }
}

// ===========================================================================
// Content
// ===========================================================================

/// Everything loaded from a content directory, resolved into core types.
#[derive(Debug)]
pub struct Content {
    pub registry: StatRegistry,
    pub stats: StandardStats,
    pub catalog: MaterialCatalog,
    pub palette: BlockPalette,
    pub tools: Vec<ToolDefinition>,
    pub resolver: HarvestResolver,
}

impl Content {
    pub fn tool(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.iter().find(|t| t.name() == name)
    }

    pub fn material_id(&self, name: &str) -> Option<MaterialId> {
        self.catalog.material_id(name)
    }

    pub fn block(&self, name: &str) -> Option<&BlockDescriptor> {
        self.palette.descriptor_by_name(name)
    }
}

/// Load and resolve a content directory. See the module docs for its layout.
pub fn load_content(dir: &Path) -> Result<Content, DataLoadError> {
    let registry = match find_data_file(dir, "stats")? {
        Some(path) => load_stats(&path)?,
        None => StatRegistry::standard(),
    };
    let stats = StandardStats::resolve(&registry)?;
    let stat_ids: HashMap<String, StatId> = registry
        .iter()
        .map(|(id, def)| (def.name.clone(), id))
        .collect();

    let catalog = load_materials(&require_data_file(dir, "materials")?, &registry, &stat_ids)?;

    let mut palette = BlockPaletteBuilder::new();
    let mut block_ids = HashMap::new();
    if let Some(path) = find_data_file(dir, "blocks")? {
        block_ids = load_blocks(&path, &mut palette)?;
    }

    let tools_path = require_data_file(dir, "tools")?;
    let tool_data: Vec<ToolData> = deserialize_list(&tools_path, "tools")?;
    let mut seen = HashMap::new();
    let mut tools = Vec::with_capacity(tool_data.len());
    for data in &tool_data {
        check_duplicate(&seen, &data.name, &tools_path)?;
        seen.insert(data.name.clone(), ());
        let mut resolver = Resolver {
            file: &tools_path,
            stat_ids: &stat_ids,
            block_ids: &block_ids,
            palette: &mut palette,
        };
        tools.push(resolver.tool(data)?);
    }
    let palette = palette.build();

    let harvest = match find_data_file(dir, "harvest")? {
        Some(path) => deserialize_file::<HarvestData>(&path)?,
        None => HarvestData::default(),
    };
    let resolver = HarvestResolver::new(HarvestConfig {
        baseline_speed: f64_to_fixed64(harvest.baseline_speed),
        broken_speed_factor: f64_to_fixed64(harvest.broken_speed_factor),
    })?;

    tracing::info!(
        dir = %dir.display(),
        stats = registry.len(),
        materials = catalog.len(),
        blocks = palette.block_count(),
        tools = tools.len(),
        "content loaded"
    );

    Ok(Content {
        registry,
        stats,
        catalog,
        palette,
        tools,
        resolver,
    })
}

fn load_stats(path: &Path) -> Result<StatRegistry, DataLoadError> {
    let kinds: Vec<StatKindData> = deserialize_list(path, "stats")?;
    let mut builder = StatRegistryBuilder::standard();
    for kind in &kinds {
        if builder.stat_id(&kind.name).is_some() {
            return Err(DataLoadError::DuplicateName {
                file: path.to_path_buf(),
                name: kind.name.clone(),
            });
        }
        let combine = match kind.combine {
            CombineData::Add => CombineRule::Add,
            CombineData::Multiply => CombineRule::Multiply,
        };
        let source = match kind.source {
            SourceData::All => StatSource::All,
            SourceData::Primary => StatSource::Primary,
        };
        let bounds = StatBounds::new(
            kind.min.map_or(Fixed64::MIN, f64_to_fixed64),
            kind.max.map_or(Fixed64::MAX, f64_to_fixed64),
        );
        builder.register_bounded(&kind.name, f64_to_fixed64(kind.default), combine, source, bounds)?;
    }
    Ok(builder.build())
}

fn load_materials(
    path: &Path,
    registry: &StatRegistry,
    stat_ids: &HashMap<String, StatId>,
) -> Result<MaterialCatalog, DataLoadError> {
    let materials: Vec<MaterialData> = deserialize_list(path, "materials")?;
    let mut builder = MaterialCatalogBuilder::new();
    let mut seen = HashMap::new();
    for material in &materials {
        check_duplicate(&seen, &material.name, path)?;
        seen.insert(material.name.clone(), ());

        let mut roles = Vec::new();
        for (role, stats) in [
            (PartRole::Head, &material.head),
            (PartRole::Handle, &material.handle),
            (PartRole::Extra, &material.extra),
        ] {
            if let Some(stats) = stats {
                let stats: MaterialStats = resolve_stats(stats, stat_ids, path)?.into_iter().collect();
                roles.push((role, stats));
            }
        }
        builder.register(&material.name, roles)?;
    }
    Ok(builder.build(registry)?)
}

fn load_blocks(
    path: &Path,
    palette: &mut BlockPaletteBuilder,
) -> Result<HashMap<String, BlockId>, DataLoadError> {
    let blocks: Vec<BlockData> = deserialize_list(path, "blocks")?;
    let mut ids = HashMap::new();
    for block in &blocks {
        check_duplicate(&ids, &block.name, path)?;
        let tags: Vec<&str> = block.tags.iter().map(String::as_str).collect();
        let id = palette.register_block(&block.name, &tags, block.harvest_level)?;
        ids.insert(block.name.clone(), id);
    }
    Ok(ids)
}

/// Resolve a `stat name → value` map against the registry's names.
fn resolve_stats(
    values: &BTreeMap<String, f64>,
    stat_ids: &HashMap<String, StatId>,
    file: &Path,
) -> Result<Vec<(StatId, Fixed64)>, DataLoadError> {
    values
        .iter()
        .map(|(name, value)| {
            let id = resolve_name(stat_ids, name, file, "stat")?;
            Ok((*id, f64_to_fixed64(*value)))
        })
        .collect()
}

/// Name lookups shared while resolving one tools file.
struct Resolver<'a> {
    file: &'a Path,
    stat_ids: &'a HashMap<String, StatId>,
    block_ids: &'a HashMap<String, BlockId>,
    palette: &'a mut BlockPaletteBuilder,
}

impl Resolver<'_> {
    fn tool(&mut self, data: &ToolData) -> Result<ToolDefinition, DataLoadError> {
        let mut builder = ToolDefinition::builder(&data.name);
        for module in &data.modules {
            let module = match module {
                ModuleData::IsEffective(predicate) => ToolModule::IsEffective(self.predicate(predicate)?),
                ModuleData::PartStats(parts) => ToolModule::PartStats(parts.iter().map(part_slot).collect()),
                ModuleData::BaseStats(values) => {
                    let bundle: StatBundle = resolve_stats(values, self.stat_ids, self.file)?
                        .into_iter()
                        .collect();
                    ToolModule::BaseStats(bundle)
                }
                ModuleData::MultiplyStats(values) => {
                    let factors: MultiplierSet = resolve_stats(values, self.stat_ids, self.file)?
                        .into_iter()
                        .collect();
                    ToolModule::MultiplyStats(factors)
                }
            };
            builder = builder.module(module);
        }
        builder.build().map_err(|source| DataLoadError::Tool {
            tool: data.name.clone(),
            source,
        })
    }

    /// Block names must be declared in the blocks file; tag names are
    /// interned on first use.
    fn predicate(&mut self, data: &PredicateData) -> Result<BlockPredicate, DataLoadError> {
        Ok(match data {
            PredicateData::Any => BlockPredicate::Any,
            PredicateData::Never => BlockPredicate::Never,
            PredicateData::Blocks(names) => {
                let mut ids = Vec::with_capacity(names.len());
                for name in names {
                    ids.push(*resolve_name(self.block_ids, name, self.file, "block")?);
                }
                BlockPredicate::set(ids)
            }
            PredicateData::Tag(name) => BlockPredicate::tag(self.palette.tag(name)),
            PredicateData::And(list) => BlockPredicate::and(self.predicates(list)?),
            PredicateData::Or(list) => BlockPredicate::or(self.predicates(list)?),
            PredicateData::Not(inner) => BlockPredicate::not(self.predicate(inner)?),
        })
    }

    fn predicates(&mut self, list: &[PredicateData]) -> Result<Vec<BlockPredicate>, DataLoadError> {
        list.iter().map(|p| self.predicate(p)).collect()
    }
}

fn part_slot(data: &PartData) -> PartSlot {
    let role = match data.role {
        RoleData::Head => PartRole::Head,
        RoleData::Handle => PartRole::Handle,
        RoleData::Extra => PartRole::Extra,
    };
    let slot = PartSlot::new(role).weighted(f64_to_fixed64(data.weight));
    if data.required { slot } else { slot.optional() }
}

// ===========================================================================
// Tests
// ===========================================================================
