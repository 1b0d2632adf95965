//! State tracking module
//!
//! This module holds the per-run crawl session (page id counter, page records)
//! and the diagnostics collector for fetch warnings.

mod diagnostics;
mod session;

pub use diagnostics::{Diagnostics, Warning, WarningKind};
pub use session::{CrawlTask, PageRecord, Session};
