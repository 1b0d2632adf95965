//! Fetch warning collection
//!
//! Every transport failure during a crawl becomes a [`Warning`]. Warnings are
//! kept in the order they occurred and are only ever read back for the
//! end-of-run report; none of them stops the crawl.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Classification of a failed fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// The URL uses a scheme the HTTP client cannot fetch
    Scheme,

    /// The request timed out
    Timeout,

    /// The connection could not be established
    Connection,

    /// Any other transport failure
    Unexpected,
}

impl WarningKind {
    /// Returns the string representation used in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheme => "scheme",
            Self::Timeout => "timeout",
            Self::Connection => "connection",
            Self::Unexpected => "unexpected",
        }
    }
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recoverable fetch failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    /// The URL that could not be fetched
    pub url: String,

    /// The failure class
    pub kind: WarningKind,

    /// Human readable description
    pub message: String,
}

impl Warning {
    pub fn new(url: impl Into<String>, kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.url, self.message)
    }
}

/// Insertion-ordered warning log for one crawl session
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a warning
    pub fn record(&mut self, warning: Warning) {
        self.warnings.push(warning);
    }

    /// All warnings in the order they were recorded
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Number of warnings per kind, in kind order
    pub fn count_by_kind(&self) -> BTreeMap<WarningKind, usize> {
        let mut counts = BTreeMap::new();
        for warning in &self.warnings {
            *counts.entry(warning.kind).or_insert(0) += 1;
        }
        counts
    }

    pub(crate) fn clear(&mut self) {
        self.warnings.clear();
    }
}
