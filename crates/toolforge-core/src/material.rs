//! Material catalog: per-material, per-part-role stat contributions.

use crate::fixed::Fixed64;
use crate::id::{MaterialId, StatId};
use crate::part::PartRole;
use crate::stat::StatRegistry;
use std::collections::{BTreeMap, HashMap};

/// Immutable stats one material contributes when used in one part role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterialStats {
    values: BTreeMap<StatId, Fixed64>,
}

impl MaterialStats {
    pub fn builder() -> MaterialStatsBuilder {
        MaterialStatsBuilder::default()
    }

    pub fn get(&self, stat: StatId) -> Option<Fixed64> {
        self.values.get(&stat).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StatId, Fixed64)> + '_ {
        self.values.iter().map(|(id, v)| (*id, *v))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(StatId, Fixed64)> for MaterialStats {
    fn from_iter<I: IntoIterator<Item = (StatId, Fixed64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Default)]
pub struct MaterialStatsBuilder {
    values: BTreeMap<StatId, Fixed64>,
}

impl MaterialStatsBuilder {
    pub fn set(mut self, stat: StatId, value: Fixed64) -> Self {
        self.values.insert(stat, value);
        self
    }

    pub fn build(self) -> MaterialStats {
        MaterialStats {
            values: self.values,
        }
    }
}

/// A material and the stats it provides for each part role it can fill.
#[derive(Debug, Clone)]
pub struct MaterialDef {
    pub name: String,
    pub stats: BTreeMap<PartRole, MaterialStats>,
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Builder for the immutable [`MaterialCatalog`].
#[derive(Debug, Default)]
pub struct MaterialCatalogBuilder {
    materials: Vec<MaterialDef>,
    name_to_id: HashMap<String, MaterialId>,
}

impl MaterialCatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a material with its per-role stats. Returns its ID.
    pub fn register(
        &mut self,
        name: &str,
        stats: impl IntoIterator<Item = (PartRole, MaterialStats)>,
    ) -> Result<MaterialId, MaterialError> {
        if self.name_to_id.contains_key(name) {
            return Err(MaterialError::DuplicateMaterial(name.to_string()));
        }
        let id = MaterialId(self.materials.len() as u32);
        self.materials.push(MaterialDef {
            name: name.to_string(),
            stats: stats.into_iter().collect(),
        });
        self.name_to_id.insert(name.to_string(), id);
        Ok(id)
    }

    pub fn material_id(&self, name: &str) -> Option<MaterialId> {
        self.name_to_id.get(name).copied()
    }

    /// Finalize the catalog. Every stat a material references must be
    /// registered in `registry`.
    pub fn build(self, registry: &StatRegistry) -> Result<MaterialCatalog, MaterialError> {
        for material in &self.materials {
            for stats in material.stats.values() {
                if let Some((stat, _)) = stats.iter().find(|(id, _)| !registry.contains(*id)) {
                    return Err(MaterialError::UnknownStat {
                        material: material.name.clone(),
                        stat,
                    });
                }
            }
        }

        tracing::debug!(materials = self.materials.len(), "material catalog finalized");
        Ok(MaterialCatalog {
            materials: self.materials,
            name_to_id: self.name_to_id,
        })
    }
}

/// Immutable, read-only material lookup.
#[derive(Debug)]
pub struct MaterialCatalog {
    materials: Vec<MaterialDef>,
    name_to_id: HashMap<String, MaterialId>,
}

impl MaterialCatalog {
    pub fn get(&self, id: MaterialId) -> Option<&MaterialDef> {
        self.materials.get(id.0 as usize)
    }

    pub fn material_id(&self, name: &str) -> Option<MaterialId> {
        self.name_to_id.get(name).copied()
    }

    /// Stats `id` contributes in `role`, or `None` if the material is
    /// unknown or cannot fill that role.
    pub fn stats(&self, id: MaterialId, role: PartRole) -> Option<&MaterialStats> {
        self.get(id).and_then(|m| m.stats.get(&role))
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MaterialError {
    #[error("duplicate material: {0}")]
    DuplicateMaterial(String),
    #[error("material {material} references unknown stat {stat:?}")]
    UnknownStat { material: String, stat: StatId },
}
