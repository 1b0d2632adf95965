//! End-of-run crawl summary

use crate::state::{Session, Warning, WarningKind};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Summary statistics for a crawl
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Number of page records (fetch attempts)
    pub pages: usize,

    /// Number of pages with a parent
    pub linked_pages: usize,

    pub total_warnings: usize,
    pub warnings_by_kind: BTreeMap<WarningKind, usize>,

    /// The run was stopped by an interrupt before the traversal finished
    pub interrupted: bool,
}

impl CrawlSummary {
    /// Creates a summary of `session`, finishing now
    pub fn from_session(session: &Session, interrupted: bool) -> Self {
        let records = session.records();
        let diagnostics = session.diagnostics();

        Self {
            started_at: session.started_at(),
            finished_at: Utc::now(),
            pages: records.len(),
            linked_pages: records.iter().filter(|r| r.parent_id.is_some()).count(),
            total_warnings: diagnostics.len(),
            warnings_by_kind: diagnostics.count_by_kind(),
            interrupted,
        }
    }

    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }
}

/// Prints a summary to stdout
pub fn print_summary(summary: &CrawlSummary) {
    println!("=== Crawl Summary ===\n");

    if summary.interrupted {
        println!("Status: interrupted");
    } else {
        println!("Status: completed");
    }
    println!("  Started: {}", summary.started_at.to_rfc3339());
    println!("  Duration: {}s", summary.duration_seconds());
    println!("  Pages parsed: {}", summary.pages);
    println!("  Pages reached via links: {}", summary.linked_pages);
    println!();

    if !summary.warnings_by_kind.is_empty() {
        println!("Warnings ({}):", summary.total_warnings);
        for (kind, count) in &summary.warnings_by_kind {
            println!("  {}: {}", kind, count);
        }
        println!();
    }
}

/// Formats warnings one per line as `<url>\t<message>`
pub fn format_warnings(warnings: &[Warning]) -> String {
    warnings.iter().map(|w| format!("{}\n", w)).collect()
}
