//! Storage module for persisting crawl output
//!
//! This module handles everything the crawler writes, including:
//! - Raw page content, one artifact per page id
//! - The append-only `<id> <url>` index
//! - The optional site tree report
//!
//! Two sinks are provided: [`FsStorage`] writes to a directory and
//! [`MemoryStorage`] keeps everything in memory.

mod fs;
mod memory;
mod traits;

pub use fs::{FsStorage, DATA_DIR, INDEX_FILE};
pub use memory::MemoryStorage;
pub use traits::{index_line, Storage, StorageError, StorageResult};
