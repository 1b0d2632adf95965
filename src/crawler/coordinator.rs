//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that coordinates all aspects of the
//! crawling process, including:
//! - Depth-first traversal over an explicit task stack
//! - Page id allocation and the page limit
//! - Coordinating fetching, storage and link extraction
//! - Collecting page records and fetch warnings for the end-of-run report

use crate::config::{Config, CrawlerConfig, TreeFormat};
use crate::crawler::parser::parse_page;
use crate::crawler::{build_http_client, fetch_url};
use crate::output::{build_tree, render_tree, CrawlSummary, TreeNode};
use crate::state::{CrawlTask, PageRecord, Session, Warning};
use crate::storage::{FsStorage, Storage};
use crate::ArborError;
use reqwest::Client;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Called once per recorded page, right after the record is created
pub type ProgressCallback = Arc<dyn Fn(&PageRecord) + Send + Sync>;

/// Main crawler coordinator structure
pub struct Coordinator<S: Storage> {
    config: CrawlerConfig,
    client: Client,
    storage: S,
    session: Session,
    delay: Duration,
    progress_callback: Option<ProgressCallback>,
}

impl<S: Storage> Coordinator<S> {
    /// Creates a new coordinator writing to `storage`
    ///
    /// # Arguments
    ///
    /// * `config` - Crawler settings (depth, page limit, delay, ...)
    /// * `storage` - Sink for page content and the index
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(ArborError)` - The HTTP client could not be built
    pub fn new(config: CrawlerConfig, storage: S) -> Result<Self, ArborError> {
        let client = build_http_client(config.request_timeout.map(Duration::from_secs))?;
        Ok(Self::with_client(config, storage, client))
    }

    /// Creates a coordinator using an existing HTTP client
    pub fn with_client(config: CrawlerConfig, storage: S, client: Client) -> Self {
        let delay = sleep_delay(config.sleep);

        Self {
            config,
            client,
            storage,
            session: Session::new(),
            delay,
            progress_callback: None,
        }
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Crawls from `seed`, following links depth first
    ///
    /// # Traversal
    ///
    /// 1. Pop the next task from the stack (the seed task first)
    /// 2. Stop once `max_pages` ids have been handed out
    /// 3. With `global_dedup`, skip URLs already fetched in this run
    /// 4. Sleep for the configured delay
    /// 5. Allocate the next id, fetch, store content and index line
    /// 6. Record the page and notify the progress callback
    /// 7. Push the page's links as child tasks, one level deeper
    ///
    /// Children are pushed in reverse so they are popped in link order,
    /// which gives the same pre-order as a recursive traversal. Without
    /// `global_dedup` the same URL may be fetched again from another branch;
    /// only the depth bounds the crawl.
    ///
    /// The session is reset first, and afterwards holds the records and
    /// warnings of this run. If the future is dropped part way, everything
    /// recorded up to that point stays consistent.
    ///
    /// # Errors
    ///
    /// Only storage failures abort the crawl. Fetch failures become warnings.
    pub async fn crawl(&mut self, seed: &str) -> Result<(), ArborError> {
        self.session.reset();

        tracing::info!(
            "Starting crawl of {} (depth {}, page limit {:?})",
            seed,
            self.config.depth,
            self.config.max_pages
        );

        let mut stack = vec![CrawlTask::seed(seed, self.config.depth)];

        while let Some(task) = stack.pop() {
            if task.is_exhausted() {
                continue;
            }

            if self.session.cap_reached(self.config.max_pages) {
                tracing::info!(
                    "Page limit of {} reached, stopping",
                    self.session.allocated()
                );
                break;
            }

            if self.config.global_dedup && !self.session.mark_visited(&task.url) {
                tracing::debug!("Already fetched {}, skipping", task.url);
                continue;
            }

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            let id = self.session.allocate_id();
            let links = self.visit(id, &task).await?;

            for link in links.into_iter().rev() {
                if let Some(child) = task.child_of(link, id) {
                    stack.push(child);
                }
            }
        }

        tracing::info!(
            "Crawl finished: {} pages recorded, {} warnings",
            self.session.records().len(),
            self.session.diagnostics().len()
        );

        Ok(())
    }

    /// Fetches, stores and records one page; returns its outbound links
    async fn visit(&mut self, id: u32, task: &CrawlTask) -> Result<Vec<String>, ArborError> {
        tracing::debug!("Fetching page {}: {}", id, task.url);

        let content = match fetch_url(&self.client, &task.url).await {
            Ok(body) => body,
            Err(warning) => {
                tracing::warn!("Failed to fetch {}: {}", warning.url, warning.message);
                self.session.diagnostics_mut().record(warning);
                String::new()
            }
        };

        self.storage.write_content(id, &content)?;
        self.storage.append_index(id, &task.url)?;

        let parsed = parse_page(&content, &task.url);
        tracing::debug!(
            "Page {} \"{}\" has {} links",
            id,
            parsed.title,
            parsed.links.len()
        );

        let record = PageRecord {
            id,
            url: task.url.clone(),
            title: parsed.title,
            parent_id: task.parent_id,
        };

        if let Some(callback) = &self.progress_callback {
            callback(&record);
        }
        self.session.push_record(record);

        Ok(parsed.links)
    }

    /// Builds the site tree from the pages recorded so far
    pub fn tree(&self) -> Vec<TreeNode> {
        build_tree(self.session.records())
    }

    /// Renders the site tree and hands it to storage
    pub fn save_tree(&mut self, format: TreeFormat) -> Result<(), ArborError> {
        let report = render_tree(&self.tree(), format)?;
        self.storage.write_tree(&report, format)?;
        Ok(())
    }

    /// Summarizes the current session
    pub fn summary(&self, interrupted: bool) -> CrawlSummary {
        CrawlSummary::from_session(&self.session, interrupted)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Page records of the current session, in id order
    pub fn records(&self) -> &[PageRecord] {
        self.session.records()
    }

    /// Warnings of the current session, in the order they occurred
    pub fn warnings(&self) -> &[Warning] {
        self.session.diagnostics().warnings()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }
}

/// Converts the configured sleep into a delay
///
/// Values too large for a `Duration` saturate to `Duration::MAX`. Negative
/// and NaN values never pass validation and map to no delay.
fn sleep_delay(secs: f64) -> Duration {
    match Duration::try_from_secs_f64(secs) {
        Ok(delay) => delay,
        Err(_) if secs > 0.0 => Duration::MAX,
        Err(_) => Duration::ZERO,
    }
}

/// Runs a complete crawl operation
///
/// This function orchestrates the entire crawl process:
///
/// 1. Validate the configuration
/// 2. Prepare the output directory
/// 3. Crawl from the seed URL
/// 4. Write the site tree if requested
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(CrawlSummary)` - Crawl completed
/// * `Err(ArborError)` - Invalid configuration or storage failure
///
/// # Example
///
/// ```no_run
/// use site_arbor::config::load_config;
/// use site_arbor::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("arbor.toml"))?;
/// let summary = run_crawl(config).await?;
/// println!("{} pages", summary.pages);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<CrawlSummary, ArborError> {
    crate::config::validate(&config)?;

    let seed = config.crawler.seed_url.clone().unwrap_or_default();
    let storage = FsStorage::create(Path::new(&config.output.directory))?;
    let mut coordinator = Coordinator::new(config.crawler, storage)?;

    coordinator.crawl(&seed).await?;

    if config.output.tree {
        coordinator.save_tree(config.output.tree_format)?;
    }

    Ok(coordinator.summary(false))
}
