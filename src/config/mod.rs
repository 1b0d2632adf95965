//! Configuration module for Site-Arbor
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every setting has a default, so a configuration can also be built in code
//! from [`Config::default`].
//!
//! # Example
//!
//! ```no_run
//! use site_arbor::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("arbor.toml")).unwrap();
//! println!("Crawler will follow links {} levels deep", config.crawler.depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, TreeFormat, DEFAULT_DEPTH};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
