//! Effectiveness predicates: does a tool's bonus speed apply to a block?

use crate::block::BlockDescriptor;
use crate::id::{BlockId, TagId};
use std::collections::BTreeSet;

/// A stateless rule over a block's identity and tags.
///
/// Combinators evaluate their children left to right and short-circuit.
/// `And` of nothing is true, `Or` of nothing is false, and an empty
/// `BlockSet` matches no block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockPredicate {
    /// Matches every block.
    Any,
    /// Matches no block.
    Never,
    /// Matches blocks whose identity is in the set.
    BlockSet(BTreeSet<BlockId>),
    /// Matches blocks carrying the tag.
    Tag(TagId),
    And(Vec<BlockPredicate>),
    Or(Vec<BlockPredicate>),
    Not(Box<BlockPredicate>),
}

impl BlockPredicate {
    pub fn set(blocks: impl IntoIterator<Item = BlockId>) -> Self {
        BlockPredicate::BlockSet(blocks.into_iter().collect())
    }

    pub fn tag(tag: TagId) -> Self {
        BlockPredicate::Tag(tag)
    }

    pub fn and(predicates: impl IntoIterator<Item = BlockPredicate>) -> Self {
        BlockPredicate::And(predicates.into_iter().collect())
    }

    pub fn or(predicates: impl IntoIterator<Item = BlockPredicate>) -> Self {
        BlockPredicate::Or(predicates.into_iter().collect())
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(predicate: BlockPredicate) -> Self {
        BlockPredicate::Not(Box::new(predicate))
    }

    pub fn is_effective(&self, block: &BlockDescriptor) -> bool {
        match self {
            BlockPredicate::Any => true,
            BlockPredicate::Never => false,
            BlockPredicate::BlockSet(set) => set.contains(&block.block),
            BlockPredicate::Tag(tag) => block.has_tag(*tag),
            BlockPredicate::And(all) => all.iter().all(|p| p.is_effective(block)),
            BlockPredicate::Or(any) => any.iter().any(|p| p.is_effective(block)),
            BlockPredicate::Not(inner) => !inner.is_effective(block),
        }
    }
}

/// Evaluate `predicate` against `block`.
pub fn is_effective(predicate: &BlockPredicate, block: &BlockDescriptor) -> bool {
    predicate.is_effective(block)
}
