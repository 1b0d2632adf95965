//! Site-Arbor: a depth-bounded site crawler
//!
//! This crate crawls a website from a seed URL, stores the raw content of every
//! visited page, and records the parent/child relationships between pages so
//! that the site can be rendered as a tree.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Site-Arbor operations
#[derive(Debug, Error)]
pub enum ArborError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Failed to serialize tree: {0}")]
    TreeSerialization(#[from] serde_json::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

// Re-export commonly used types
pub use config::Config;
pub use crawler::Coordinator;
pub use state::{PageRecord, Warning, WarningKind};
pub use crate::url::normalize_url;
