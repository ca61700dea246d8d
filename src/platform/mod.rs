//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (keyboard flags, pointer position)
//! - Storage (LocalStorage on web, in-memory elsewhere)

pub mod input;
pub mod storage;

pub use input::{Command, InputSampler, key_command, pointer_to_logical};
pub use storage::{KeyValueStore, MemoryStorage, StorageError, default_storage};
