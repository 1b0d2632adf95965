//! Storage traits and error types
//!
//! This module defines the trait interface for crawl output sinks and
//! associated error types.

use crate::config::TreeFormat;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to prepare output directory {path}: {source}")]
    Prepare {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for crawl output sinks
///
/// The crawler calls [`Storage::write_content`] and [`Storage::append_index`]
/// once per fetch attempt, in id order, before the page's links are followed.
/// Any error is fatal for the run.
pub trait Storage {
    /// Stores the raw content fetched for page `id` (empty if the fetch failed)
    fn write_content(&mut self, id: u32, content: &str) -> StorageResult<()>;

    /// Appends the `<id> <url>` index line for page `id`
    fn append_index(&mut self, id: u32, url: &str) -> StorageResult<()>;

    /// Stores the rendered site tree
    fn write_tree(&mut self, report: &str, format: TreeFormat) -> StorageResult<()>;
}

impl<S: Storage + ?Sized> Storage for &mut S {
    fn write_content(&mut self, id: u32, content: &str) -> StorageResult<()> {
        (**self).write_content(id, content)
    }

    fn append_index(&mut self, id: u32, url: &str) -> StorageResult<()> {
        (**self).append_index(id, url)
    }

    fn write_tree(&mut self, report: &str, format: TreeFormat) -> StorageResult<()> {
        (**self).write_tree(report, format)
    }
}

/// Formats one index line, without the trailing newline
pub fn index_line(id: u32, url: &str) -> String {
    format!("{} {}", id, url)
}
