//! Memoised tool stats.
//!
//! Building stats walks every module of a definition. Tools are usually
//! queried many times per build (once per block broken), so [`StatCache`]
//! keeps the result per `(definition, material selection)` and hands out
//! shared references. Entries must be invalidated when content reloads.
//!
//! Lookups go by definition name, but each entry remembers the definition it
//! was built from. A different definition reusing a cached name replaces the
//! stale entry instead of receiving its stats.

use std::collections::HashMap;
use std::sync::Arc;

use crate::definition::{ToolBuildError, ToolDefinition, ToolStats};
use crate::id::MaterialId;
use crate::material::MaterialCatalog;
use crate::stat::StatRegistry;

type CacheKey = (String, Vec<Option<MaterialId>>);

#[derive(Debug)]
struct CacheEntry {
    definition: ToolDefinition,
    stats: Arc<ToolStats>,
}

#[derive(Debug, Default)]
pub struct StatCache {
    entries: HashMap<CacheKey, CacheEntry>,
    hits: u64,
    misses: u64,
}

impl StatCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return cached stats for `definition` built from `materials`, building
    /// them on first request. Build errors are not cached.
    pub fn get_or_build(
        &mut self,
        definition: &ToolDefinition,
        registry: &StatRegistry,
        catalog: &MaterialCatalog,
        materials: &[Option<MaterialId>],
    ) -> Result<Arc<ToolStats>, ToolBuildError> {
        let key = (definition.name().to_string(), materials.to_vec());
        if let Some(entry) = self.entries.get(&key) {
            if entry.definition == *definition {
                self.hits += 1;
                return Ok(Arc::clone(&entry.stats));
            }
            tracing::debug!(tool = %definition.name(), "cached definition changed, rebuilding");
        }

        self.misses += 1;
        let stats = Arc::new(definition.build_stats(registry, catalog, materials)?);
        self.entries.insert(
            key,
            CacheEntry {
                definition: definition.clone(),
                stats: Arc::clone(&stats),
            },
        );
        tracing::debug!(tool = %definition.name(), entries = self.entries.len(), "stat cache miss");
        Ok(stats)
    }

    /// Drop every entry for the named definition. Returns how many were removed.
    pub fn invalidate(&mut self, definition: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|(name, _), _| name != definition);
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(hits, misses)` since creation.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::ToolModule;
    use crate::harvest::{HarvestConfig, ToolCondition, resolve_speed};
    use crate::multiplier::MultiplierSet;
    use crate::predicate::BlockPredicate;
    use crate::test_utils::*;

    #[test]
    fn second_lookup_is_a_hit() {
        let f = fixture();
        let def = f.standard_definition();
        let mut cache = StatCache::new();

        let a = cache
            .get_or_build(&def, &f.registry, &f.catalog, &f.standard_selection())
            .unwrap();
        let b = cache
            .get_or_build(&def, &f.registry, &f.catalog, &f.standard_selection())
            .unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.stats(), (1, 1));
    }

    #[test]
    fn cached_stats_match_direct_build() {
        let f = fixture();
        let mut cache = StatCache::new();
        let cached = cache
            .get_or_build(&f.standard_definition(), &f.registry, &f.catalog, &f.standard_selection())
            .unwrap();
        assert_eq!(*cached, f.standard_tool());
    }

    #[test]
    fn selections_are_cached_separately() {
        let f = fixture();
        let def = f.standard_definition();
        let mut cache = StatCache::new();
        cache
            .get_or_build(&def, &f.registry, &f.catalog, &f.standard_selection())
            .unwrap();
        cache
            .get_or_build(&def, &f.registry, &f.catalog, &[Some(f.head), Some(f.extra), Some(f.handle)])
            .unwrap();
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn errors_are_not_cached() {
        let f = fixture();
        let mut cache = StatCache::new();
        let result = cache.get_or_build(&f.standard_definition(), &f.registry, &f.catalog, &[]);
        assert!(result.is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn same_name_with_different_modules_is_rebuilt() {
        let f = fixture();
        let cobble = f.block("cobblestone");
        let plain = f.cobble_definition();
        let boosted = ToolDefinition::builder(plain.name())
            .module(ToolModule::IsEffective(BlockPredicate::set([cobble.block])))
            .module(ToolModule::PartStats(f.standard_parts()))
            .module(ToolModule::MultiplyStats(
                MultiplierSet::builder()
                    .set(f.stats.mining_speed, fixed(2.0))
                    .build(),
            ))
            .build()
            .unwrap();
        let mut cache = StatCache::new();

        let first = cache
            .get_or_build(&plain, &f.registry, &f.catalog, &f.standard_selection())
            .unwrap();
        let second = cache
            .get_or_build(&boosted, &f.registry, &f.catalog, &f.standard_selection())
            .unwrap();

        let config = HarvestConfig::default();
        let intact = ToolCondition::intact(100);
        assert_eq!(resolve_speed(&first, intact, &cobble, &config), head_mining_speed());
        assert_eq!(
            resolve_speed(&second, intact, &cobble, &config),
            resolve_speed(&f.build(&boosted), intact, &cobble, &config)
        );
        assert_eq!(resolve_speed(&second, intact, &cobble, &config), fixed(12.0));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.stats(), (0, 2));

        // The replacement is now the cached entry.
        let third = cache
            .get_or_build(&boosted, &f.registry, &f.catalog, &f.standard_selection())
            .unwrap();
        assert!(Arc::ptr_eq(&second, &third));
    }

    #[test]
    fn invalidate_removes_only_named_definition() {
        let f = fixture();
        let mut cache = StatCache::new();
        cache
            .get_or_build(&f.standard_definition(), &f.registry, &f.catalog, &f.standard_selection())
            .unwrap();
        cache
            .get_or_build(&f.mining_definition(), &f.registry, &f.catalog, &f.standard_selection())
            .unwrap();

        assert_eq!(cache.invalidate("pickaxe"), 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.invalidate("pickaxe"), 0);

        cache.clear();
        assert!(cache.is_empty());
    }
}
