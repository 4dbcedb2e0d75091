//! Cross-crate tests for `toolforge-core` and `toolforge-data`. See `tests/`.
