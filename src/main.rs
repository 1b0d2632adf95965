//! Site-Arbor main entry point
//!
//! This is the command-line interface for the Site-Arbor crawler.

use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use site_arbor::config::{parse_config, validate, Config, TreeFormat};
use site_arbor::crawler::Coordinator;
use site_arbor::output::{format_warnings, print_summary};
use site_arbor::state::PageRecord;
use site_arbor::storage::FsStorage;
use std::io::{BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Site-Arbor: crawl a website and save all of its pages
///
/// By default a urls.txt file with page ids and their URLs and a data
/// directory with the contents of every page (<page id>.html) are created.
/// With -t a tree representation of the site is written as well.
#[derive(Parser, Debug)]
#[command(name = "site-arbor")]
#[command(version = "1.0.0")]
#[command(about = "Crawl a website and save all of its pages", long_about = None)]
struct Cli {
    /// URL of the site to crawl, e.g. https://en.wikipedia.org/
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// Depth of the search
    #[arg(short, long)]
    depth: Option<u32>,

    /// Maximum number of pages to fetch
    #[arg(short = 'n', long)]
    max_pages: Option<u32>,

    /// Sleep time between requests, in seconds
    #[arg(short, long)]
    sleep: Option<f64>,

    /// Save a tree representation of the site
    #[arg(short = 't', long)]
    tree: bool,

    /// Format of the tree report
    #[arg(long, value_enum)]
    tree_format: Option<TreeFormat>,

    /// Fetch every URL at most once
    #[arg(long)]
    global_dedup: bool,

    /// Request timeout, in seconds
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<u64>,

    /// Directory to write results to
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Path to a TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Do not show the progress indicator
    #[arg(long)]
    no_progress: bool,

    /// Print warnings without asking
    #[arg(long)]
    show_warnings: bool,
}

impl Cli {
    /// Layers command-line values over `config`
    fn apply_to(&self, config: &mut Config) {
        if let Some(url) = &self.url {
            config.crawler.seed_url = Some(url.clone());
        }
        if let Some(depth) = self.depth {
            config.crawler.depth = depth;
        }
        if let Some(max_pages) = self.max_pages {
            config.crawler.max_pages = Some(max_pages);
        }
        if let Some(sleep) = self.sleep {
            config.crawler.sleep = sleep;
        }
        if self.global_dedup {
            config.crawler.global_dedup = true;
        }
        if let Some(timeout) = self.timeout {
            config.crawler.request_timeout = Some(timeout);
        }
        if let Some(output) = &self.output {
            config.output.directory = output.display().to_string();
        }
        if self.tree {
            config.output.tree = true;
        }
        if let Some(format) = self.tree_format {
            config.output.tree_format = format;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            parse_config(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?
        }
        None => Config::default(),
    };
    cli.apply_to(&mut config);
    validate(&config)?;

    let seed = config.crawler.seed_url.clone().unwrap_or_default();
    println!("Parsing {} ...", seed);

    let storage = FsStorage::create(Path::new(&config.output.directory))
        .context("Failed to prepare output directory")?;

    let progress = (!cli.no_progress && !cli.quiet).then(|| Arc::new(progress_bar()));

    let mut coordinator = Coordinator::new(config.crawler.clone(), storage)?;
    if let Some(bar) = &progress {
        let bar = bar.clone();
        coordinator = coordinator.with_progress_callback(Arc::new(move |_record: &PageRecord| {
            bar.inc(1);
        }));
    }

    let interrupted = tokio::select! {
        result = coordinator.crawl(&seed) => {
            result.context("Crawl failed")?;
            false
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Interrupted, finishing up");
            true
        }
    };

    if let Some(bar) = &progress {
        bar.finish();
    }

    end_cycle(coordinator.warnings(), cli.show_warnings)?;

    if config.output.tree {
        coordinator
            .save_tree(config.output.tree_format)
            .context("Failed to write the site tree")?;
    }

    if !cli.quiet {
        println!();
        print_summary(&coordinator.summary(interrupted));
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_arbor=info,warn"),
            1 => EnvFilter::new("site_arbor=debug,info"),
            2 => EnvFilter::new("site_arbor=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

fn progress_bar() -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} Parsed {pos} pages (press ctrl+c to interrupt) [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.enable_steady_tick(std::time::Duration::from_millis(120));
    bar
}

/// Reports the warnings of the run, asking first when attached to a terminal
fn end_cycle(warnings: &[site_arbor::Warning], show: bool) -> std::io::Result<()> {
    if warnings.is_empty() {
        println!("\nHave a nice day!");
        return Ok(());
    }

    let show = show
        || !std::io::stdin().is_terminal()
        || confirm(&format!(
            "\n{} warnings occurred. Want to see them?",
            warnings.len()
        ))?;

    if show {
        print!("{}", format_warnings(warnings));
    } else {
        println!("\nHave a nice day!");
    }
    Ok(())
}

/// Asks a yes/no question, defaulting to yes
fn confirm(question: &str) -> std::io::Result<bool> {
    print!("{} [Y/n]: ", question);
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;

    Ok(!matches!(answer.trim().to_lowercase().as_str(), "n" | "no"))
}
