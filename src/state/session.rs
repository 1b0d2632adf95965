//! Per-run crawl state
//!
//! A [`Session`] holds everything one crawl invocation accumulates: the page
//! id counter, the page records and the warnings. It is reset at the start of
//! every crawl and only appended to while the crawl runs, so it is always in
//! a consistent state even when the crawl is interrupted half way.

use crate::state::diagnostics::Diagnostics;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;

/// One recorded fetch attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRecord {
    /// Page id, allocated from 1 upwards
    pub id: u32,

    /// The URL the page was fetched from
    pub url: String,

    /// Display title (see [`crate::crawler::format_title`])
    pub title: String,

    /// Id of the page that linked here, `None` for the seed
    pub parent_id: Option<u32>,
}

/// A scheduled traversal step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    pub url: String,
    pub depth_remaining: u32,
    pub parent_id: Option<u32>,
}

impl CrawlTask {
    /// The initial task of a crawl
    pub fn seed(url: impl Into<String>, depth: u32) -> Self {
        Self {
            url: url.into(),
            depth_remaining: depth,
            parent_id: None,
        }
    }

    /// A task for a link found on page `parent_id`, one level deeper
    ///
    /// Returns `None` when the child would have no depth left.
    pub fn child_of(&self, url: String, parent_id: u32) -> Option<Self> {
        let depth_remaining = self.depth_remaining.checked_sub(1).filter(|d| *d > 0)?;
        Some(Self {
            url,
            depth_remaining,
            parent_id: Some(parent_id),
        })
    }

    /// Returns true if this task must not be fetched
    pub fn is_exhausted(&self) -> bool {
        self.depth_remaining == 0
    }
}

/// State scoped to a single crawl invocation
#[derive(Debug, Clone)]
pub struct Session {
    last_id: u32,
    records: Vec<PageRecord>,
    diagnostics: Diagnostics,
    visited: HashSet<String>,
    started_at: DateTime<Utc>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            last_id: 0,
            records: Vec::new(),
            diagnostics: Diagnostics::new(),
            visited: HashSet::new(),
            started_at: Utc::now(),
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears all state and restarts the run clock
    pub fn reset(&mut self) {
        self.last_id = 0;
        self.records.clear();
        self.diagnostics.clear();
        self.visited.clear();
        self.started_at = Utc::now();
    }

    /// Allocates the next page id
    pub fn allocate_id(&mut self) -> u32 {
        self.last_id += 1;
        self.last_id
    }

    /// Number of ids handed out so far
    pub fn allocated(&self) -> u32 {
        self.last_id
    }

    /// Returns true if `max_pages` ids have already been allocated
    pub fn cap_reached(&self, max_pages: Option<u32>) -> bool {
        max_pages.is_some_and(|max| self.last_id >= max)
    }

    /// Marks a URL as fetched; returns false if it already was
    pub fn mark_visited(&mut self, url: &str) -> bool {
        self.visited.insert(url.to_string())
    }

    pub fn push_record(&mut self, record: PageRecord) {
        debug_assert!(record.parent_id.map_or(true, |parent| parent < record.id));
        self.records.push(record);
    }

    /// Page records in id order
    pub fn records(&self) -> &[PageRecord] {
        &self.records
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn diagnostics_mut(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}
