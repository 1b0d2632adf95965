//! Output module for crawl reports
//!
//! This module handles:
//! - Building the site tree from page records
//! - Rendering the tree as text or JSON
//! - Summarizing the run and formatting warnings

mod summary;
mod tree;

pub use summary::{format_warnings, print_summary, CrawlSummary};
pub use tree::{build_tree, render_text, render_tree, TreeNode};
