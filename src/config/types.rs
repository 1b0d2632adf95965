use serde::{Deserialize, Serialize};

/// Default traversal depth
pub const DEFAULT_DEPTH: u32 = 2;

/// Main configuration structure for Site-Arbor
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// URL to start crawling from
    #[serde(rename = "seed-url", default)]
    pub seed_url: Option<String>,

    /// Number of link levels to follow, the seed page counting as one
    #[serde(default = "default_depth")]
    pub depth: u32,

    /// Maximum number of pages to fetch
    #[serde(rename = "max-pages", default)]
    pub max_pages: Option<u32>,

    /// Delay before every request (seconds)
    #[serde(default)]
    pub sleep: f64,

    /// Fetch every URL at most once per run
    #[serde(rename = "global-dedup", default)]
    pub global_dedup: bool,

    /// Per-request timeout (seconds); the HTTP client default when unset
    #[serde(rename = "request-timeout", default)]
    pub request_timeout: Option<u64>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            seed_url: None,
            depth: DEFAULT_DEPTH,
            max_pages: None,
            sleep: 0.0,
            global_dedup: false,
            request_timeout: None,
        }
    }
}

fn default_depth() -> u32 {
    DEFAULT_DEPTH
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving urls.txt, data/ and the tree report
    #[serde(default = "default_directory")]
    pub directory: String,

    /// Write the site tree after the crawl
    #[serde(default)]
    pub tree: bool,

    /// Format of the site tree report
    #[serde(rename = "tree-format", default)]
    pub tree_format: TreeFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            tree: false,
            tree_format: TreeFormat::default(),
        }
    }
}

fn default_directory() -> String {
    ".".to_string()
}

/// Site tree report format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TreeFormat {
    /// Indented text with box-drawing guides
    #[default]
    Text,

    /// Nested JSON objects
    Json,
}

impl TreeFormat {
    /// File extension of the report
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Json => "json",
        }
    }
}
