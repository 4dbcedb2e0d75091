//! Block descriptors supplied by the world/query layer.
//!
//! The engine never owns world state. Callers describe the block being mined
//! with a [`BlockDescriptor`]; a [`BlockPalette`] interns block and tag names
//! so content files and tests can refer to them by name.

use crate::id::{BlockId, TagId};
use std::collections::HashMap;

/// Everything the resolver needs to know about a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockDescriptor {
    pub block: BlockId,
    pub tags: Vec<TagId>,
    /// Minimum harvest tier required to mine at full speed. `None` means any
    /// tool is sufficient.
    pub harvest_level: Option<u32>,
}

impl BlockDescriptor {
    pub fn new(block: BlockId) -> Self {
        Self {
            block,
            tags: Vec::new(),
            harvest_level: None,
        }
    }

    pub fn with_tag(mut self, tag: TagId) -> Self {
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
        self
    }

    pub fn with_harvest_level(mut self, level: u32) -> Self {
        self.harvest_level = Some(level);
        self
    }

    pub fn has_tag(&self, tag: TagId) -> bool {
        self.tags.contains(&tag)
    }
}

/// A named block type.
#[derive(Debug, Clone)]
pub struct BlockDef {
    pub name: String,
    pub descriptor: BlockDescriptor,
}

/// Builder for the immutable [`BlockPalette`].
#[derive(Debug, Default)]
pub struct BlockPaletteBuilder {
    blocks: Vec<BlockDef>,
    block_name_to_id: HashMap<String, BlockId>,
    tags: Vec<String>,
    tag_name_to_id: HashMap<String, TagId>,
}

impl BlockPaletteBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a tag name. Registering the same name twice returns the same ID.
    pub fn tag(&mut self, name: &str) -> TagId {
        if let Some(id) = self.tag_name_to_id.get(name) {
            return *id;
        }
        let id = TagId(self.tags.len() as u32);
        self.tags.push(name.to_string());
        self.tag_name_to_id.insert(name.to_string(), id);
        id
    }

    /// Register a block carrying the named tags. Returns its ID.
    pub fn register_block(
        &mut self,
        name: &str,
        tags: &[&str],
        harvest_level: Option<u32>,
    ) -> Result<BlockId, BlockPaletteError> {
        if self.block_name_to_id.contains_key(name) {
            return Err(BlockPaletteError::DuplicateBlock(name.to_string()));
        }
        let id = BlockId(self.blocks.len() as u32);
        let mut descriptor = BlockDescriptor::new(id);
        for tag in tags {
            let tag = self.tag(tag);
            descriptor = descriptor.with_tag(tag);
        }
        descriptor.harvest_level = harvest_level;
        self.blocks.push(BlockDef {
            name: name.to_string(),
            descriptor,
        });
        self.block_name_to_id.insert(name.to_string(), id);
        Ok(id)
    }

    pub fn block_id(&self, name: &str) -> Option<BlockId> {
        self.block_name_to_id.get(name).copied()
    }

    pub fn build(self) -> BlockPalette {
        BlockPalette {
            blocks: self.blocks,
            block_name_to_id: self.block_name_to_id,
            tags: self.tags,
            tag_name_to_id: self.tag_name_to_id,
        }
    }
}

/// Immutable name ↔ ID table for blocks and tags.
#[derive(Debug, Default)]
pub struct BlockPalette {
    blocks: Vec<BlockDef>,
    block_name_to_id: HashMap<String, BlockId>,
    tags: Vec<String>,
    tag_name_to_id: HashMap<String, TagId>,
}

impl BlockPalette {
    pub fn get(&self, id: BlockId) -> Option<&BlockDef> {
        self.blocks.get(id.0 as usize)
    }

    pub fn descriptor(&self, id: BlockId) -> Option<&BlockDescriptor> {
        self.get(id).map(|b| &b.descriptor)
    }

    pub fn descriptor_by_name(&self, name: &str) -> Option<&BlockDescriptor> {
        self.block_id(name).and_then(|id| self.descriptor(id))
    }

    pub fn block_id(&self, name: &str) -> Option<BlockId> {
        self.block_name_to_id.get(name).copied()
    }

    pub fn tag_id(&self, name: &str) -> Option<TagId> {
        self.tag_name_to_id.get(name).copied()
    }

    pub fn tag_name(&self, id: TagId) -> Option<&str> {
        self.tags.get(id.0 as usize).map(String::as_str)
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn tag_count(&self) -> usize {
        self.tags.len()
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BlockPaletteError {
    #[error("duplicate block: {0}")]
    DuplicateBlock(String),
}
