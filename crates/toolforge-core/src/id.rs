use serde::{Deserialize, Serialize};

/// Identifies a stat kind in the [`StatRegistry`](crate::stat::StatRegistry).
/// Ids are dense: the n-th registered kind has id `n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StatId(pub u16);

/// Identifies a material in the [`MaterialCatalog`](crate::material::MaterialCatalog).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MaterialId(pub u32);

/// Identifies a block type in the [`BlockPalette`](crate::block::BlockPalette).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockId(pub u32);

/// Identifies a block category tag (e.g. `mineable/pickaxe`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TagId(pub u32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stat_id_equality() {
        assert_eq!(StatId(0), StatId(0));
        assert_ne!(StatId(0), StatId(1));
    }

    #[test]
    fn ids_order_by_index() {
        assert!(BlockId(1) < BlockId(2));
        assert!(StatId(3) > StatId(0));
    }

    #[test]
    fn ids_are_hashable() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(MaterialId(0), "iron");
        map.insert(MaterialId(1), "wood");
        assert_eq!(map[&MaterialId(1)], "wood");
    }
}
