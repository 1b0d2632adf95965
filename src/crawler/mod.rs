//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with warning classification
//! - HTML parsing, link extraction and title formatting
//! - Depth-bounded traversal and page id allocation

mod coordinator;
mod fetcher;
mod parser;

pub use coordinator::{run_crawl, Coordinator, ProgressCallback};
pub use fetcher::{build_http_client, fetch_url, UNEXPECTED_MESSAGE};
pub use parser::{format_title, parse_page, ParsedPage, MAX_TITLE_CHARS, UNKNOWN_TITLE};
