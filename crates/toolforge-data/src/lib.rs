//! Content loading for the tool stat engine.
//!
//! Reads stat kinds, materials, blocks, tool definitions and harvest
//! configuration from RON, TOML or JSON files and resolves them into the
//! immutable registries of `toolforge-core`.

pub mod loader;
pub mod schema;

pub use loader::{Content, DataLoadError, load_content};
