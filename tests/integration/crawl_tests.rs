//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use site_arbor::config::{Config, CrawlerConfig, TreeFormat};
use site_arbor::crawler::{run_crawl, Coordinator};
use site_arbor::state::{PageRecord, WarningKind};
use site_arbor::storage::{FsStorage, MemoryStorage};
use std::fs;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a crawler configuration with the given depth
fn create_test_config(depth: u32) -> CrawlerConfig {
    CrawlerConfig {
        depth,
        request_timeout: Some(5),
        ..CrawlerConfig::default()
    }
}

/// Serves `body` as an HTML page at `route`
async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// Builds a page with a title and one anchor per href
fn page(title: &str, hrefs: &[&str]) -> String {
    let links: String = hrefs
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    format!(
        "<html><head><title>{}</title></head><body>{}</body></html>",
        title, links
    )
}

/// Paths of all requests the server received, in order
async fn requested_paths(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|request| request.url.path().to_string())
        .collect()
}

fn summarize(records: &[PageRecord]) -> Vec<(u32, String, Option<u32>)> {
    records
        .iter()
        .map(|r| (r.id, r.url.clone(), r.parent_id))
        .collect()
}

#[tokio::test]
async fn test_seed_with_child_and_mailto() {
    let server = MockServer::start().await;
    let base = server.uri();
    let seed = format!("{}/", base);

    let home = page("Home", &["/child", "mailto:a@b.com"]);
    mount_page(&server, "/", &home).await;
    mount_page(&server, "/child", &page("Child", &[])).await;

    let dir = tempfile::tempdir().unwrap();
    let storage = FsStorage::create(dir.path()).unwrap();
    let mut coordinator = Coordinator::new(create_test_config(2), storage).unwrap();
    coordinator.crawl(&seed).await.unwrap();

    assert_eq!(
        summarize(coordinator.records()),
        vec![
            (1, seed.clone(), None),
            (2, format!("{}/child", base), Some(1)),
        ]
    );
    assert_eq!(coordinator.records()[0].title, "Home");
    assert_eq!(coordinator.records()[1].title, "Child");
    assert!(coordinator.warnings().is_empty());

    let index = fs::read_to_string(dir.path().join("urls.txt")).unwrap();
    assert_eq!(index, format!("1 {}\n2 {}/child\n", seed, base));
    assert_eq!(
        fs::read_to_string(dir.path().join("data").join("1.html")).unwrap(),
        home
    );

    assert_eq!(requested_paths(&server).await, vec!["/", "/child"]);
}

#[tokio::test]
async fn test_depth_one_records_only_seed() {
    let server = MockServer::start().await;
    let seed = format!("{}/", server.uri());

    mount_page(&server, "/", &page("Home", &["/a", "/b", "/c", "/d"])).await;

    let mut coordinator = Coordinator::new(create_test_config(1), MemoryStorage::new()).unwrap();
    coordinator.crawl(&seed).await.unwrap();

    assert_eq!(coordinator.records().len(), 1);
    assert_eq!(coordinator.storage().index_lines().len(), 1);
    assert_eq!(requested_paths(&server).await, vec!["/"]);
}

#[tokio::test]
async fn test_depth_first_preorder() {
    let server = MockServer::start().await;
    let base = server.uri();
    let seed = format!("{}/", base);

    mount_page(&server, "/", &page("Home", &["/a", "/b"])).await;
    mount_page(&server, "/a", &page("A", &["/c"])).await;
    mount_page(&server, "/b", &page("B", &[])).await;
    mount_page(&server, "/c", &page("C", &[])).await;

    let mut coordinator = Coordinator::new(create_test_config(3), MemoryStorage::new()).unwrap();
    coordinator.crawl(&seed).await.unwrap();

    assert_eq!(
        summarize(coordinator.records()),
        vec![
            (1, seed.clone(), None),
            (2, format!("{}/a", base), Some(1)),
            (3, format!("{}/c", base), Some(2)),
            (4, format!("{}/b", base), Some(1)),
        ]
    );
    assert_eq!(requested_paths(&server).await, vec!["/", "/a", "/c", "/b"]);
}

#[tokio::test]
async fn test_ids_are_sequential() {
    let server = MockServer::start().await;
    let seed = format!("{}/", server.uri());

    mount_page(&server, "/", &page("Home", &["/a", "/b", "/c"])).await;
    mount_page(&server, "/a", &page("A", &["/b", "/c"])).await;
    mount_page(&server, "/b", &page("B", &["/a"])).await;

    let mut coordinator = Coordinator::new(create_test_config(3), MemoryStorage::new()).unwrap();
    coordinator.crawl(&seed).await.unwrap();

    let ids: Vec<u32> = coordinator.records().iter().map(|r| r.id).collect();
    let expected: Vec<u32> = (1..=ids.len() as u32).collect();
    assert_eq!(ids, expected);

    // One record per request, and every parent precedes its child
    assert_eq!(requested_paths(&server).await.len(), ids.len());
    for record in coordinator.records() {
        if let Some(parent) = record.parent_id {
            assert!(parent < record.id);
        }
    }
}

#[tokio::test]
async fn test_max_pages_cap() {
    let server = MockServer::start().await;
    let seed = format!("{}/", server.uri());

    let hrefs: Vec<String> = (1..=8).map(|i| format!("/p{}", i)).collect();
    let hrefs: Vec<&str> = hrefs.iter().map(String::as_str).collect();
    mount_page(&server, "/", &page("Home", &hrefs)).await;
    for href in &hrefs {
        mount_page(&server, href, &page(href, &[])).await;
    }

    let config = CrawlerConfig {
        max_pages: Some(5),
        ..create_test_config(2)
    };
    let mut coordinator = Coordinator::new(config, MemoryStorage::new()).unwrap();
    coordinator.crawl(&seed).await.unwrap();

    assert_eq!(coordinator.records().len(), 5);
    assert_eq!(coordinator.storage().index_lines().len(), 5);
    assert_eq!(coordinator.records().last().map(|r| r.id), Some(5));
    assert_eq!(requested_paths(&server).await.len(), 5);
}

#[tokio::test]
async fn test_fragment_links_get_labelled() {
    let server = MockServer::start().await;
    let base = server.uri();
    let seed = format!("{}/", base);

    mount_page(&server, "/", &page("Home", &["#sec"])).await;

    let mut coordinator = Coordinator::new(create_test_config(2), MemoryStorage::new()).unwrap();
    coordinator.crawl(&seed).await.unwrap();

    let records = coordinator.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].url, format!("{}/#sec", base));
    assert_eq!(records[1].title, "Home (#sec)");

    coordinator.save_tree(TreeFormat::Text).unwrap();
    let storage = coordinator.into_storage();
    assert_eq!(
        storage.tree(),
        Some((TreeFormat::Text, "Home\n└── Home (#sec)\n"))
    );
}

#[tokio::test]
async fn test_cycle_refetched_until_depth_exhausted() {
    let server = MockServer::start().await;
    let seed = format!("{}/", server.uri());

    mount_page(&server, "/", &page("Home", &["/a"])).await;
    mount_page(&server, "/a", &page("A", &["/"])).await;

    let mut coordinator = Coordinator::new(create_test_config(4), MemoryStorage::new()).unwrap();
    coordinator.crawl(&seed).await.unwrap();

    let titles: Vec<&str> = coordinator
        .records()
        .iter()
        .map(|r| r.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Home", "A", "Home", "A"]);
    assert_eq!(requested_paths(&server).await, vec!["/", "/a", "/", "/a"]);
}

#[tokio::test]
async fn test_global_dedup_fetches_each_url_once() {
    let server = MockServer::start().await;
    let seed = format!("{}/", server.uri());

    mount_page(&server, "/", &page("Home", &["/a", "/b"])).await;
    mount_page(&server, "/a", &page("A", &["/", "/b"])).await;
    mount_page(&server, "/b", &page("B", &["/a"])).await;

    let config = CrawlerConfig {
        global_dedup: true,
        ..create_test_config(5)
    };
    let mut coordinator = Coordinator::new(config, MemoryStorage::new()).unwrap();
    coordinator.crawl(&seed).await.unwrap();

    let parents: Vec<Option<u32>> = coordinator.records().iter().map(|r| r.parent_id).collect();
    assert_eq!(parents, vec![None, Some(1), Some(2)]);
    assert_eq!(requested_paths(&server).await, vec!["/", "/a", "/b"]);
}

#[tokio::test]
async fn test_failed_fetches_become_warnings() {
    let server = MockServer::start().await;
    let base = server.uri();
    let seed = format!("{}/", base);

    mount_page(
        &server,
        "/",
        &page("Home", &["ftp://files.example.com/x", "javascript:void(0)", "/ok"]),
    )
    .await;
    mount_page(&server, "/ok", &page("Ok", &[])).await;

    let dir = tempfile::tempdir().unwrap();
    let storage = FsStorage::create(dir.path()).unwrap();
    let mut coordinator = Coordinator::new(create_test_config(2), storage).unwrap();
    coordinator.crawl(&seed).await.unwrap();

    assert_eq!(coordinator.records().len(), 4);
    assert_eq!(coordinator.records()[1].title, "Unknown");

    let warnings = coordinator.warnings();
    assert_eq!(warnings.len(), 2);
    assert_eq!(warnings[0].url, "ftp://files.example.com/x");
    assert!(warnings.iter().all(|w| w.kind == WarningKind::Scheme));

    assert_eq!(
        fs::read_to_string(dir.path().join("data").join("2.html")).unwrap(),
        ""
    );
    let index = fs::read_to_string(dir.path().join("urls.txt")).unwrap();
    assert_eq!(index.lines().count(), 4);
}

#[tokio::test]
async fn test_unreachable_host_does_not_stop_crawl() {
    let server = MockServer::start().await;
    let seed = format!("{}/", server.uri());

    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let dead = format!("http://127.0.0.1:{}/gone", listener.local_addr().unwrap().port());
    drop(listener);

    mount_page(&server, "/", &page("Home", &[dead.as_str(), "/after"])).await;
    mount_page(&server, "/after", &page("After", &[])).await;

    let mut coordinator = Coordinator::new(create_test_config(2), MemoryStorage::new()).unwrap();
    coordinator.crawl(&seed).await.unwrap();

    assert_eq!(coordinator.records().len(), 3);
    assert_eq!(coordinator.records()[2].title, "After");
    assert_eq!(coordinator.warnings().len(), 1);
    assert_eq!(coordinator.warnings()[0].kind, WarningKind::Connection);
}

#[tokio::test]
async fn test_progress_callback_sees_every_record() {
    let server = MockServer::start().await;
    let seed = format!("{}/", server.uri());

    mount_page(&server, "/", &page("Home", &["/a", "/b"])).await;

    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = seen.clone();

    let mut coordinator = Coordinator::new(create_test_config(2), MemoryStorage::new())
        .unwrap()
        .with_progress_callback(Arc::new(move |record: &PageRecord| {
            seen_clone.lock().unwrap().push(record.id);
        }));
    coordinator.crawl(&seed).await.unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
}

#[tokio::test]
async fn test_sleep_applies_before_every_fetch() {
    let server = MockServer::start().await;
    let seed = format!("{}/", server.uri());

    mount_page(&server, "/", &page("Home", &["/a"])).await;

    let config = CrawlerConfig {
        sleep: 0.1,
        ..create_test_config(2)
    };
    let mut coordinator = Coordinator::new(config, MemoryStorage::new()).unwrap();

    let start = Instant::now();
    coordinator.crawl(&seed).await.unwrap();

    assert_eq!(coordinator.records().len(), 2);
    assert!(start.elapsed() >= Duration::from_millis(200));
}

#[tokio::test]
async fn test_run_crawl_writes_outputs() {
    let server = MockServer::start().await;
    let seed = format!("{}/", server.uri());

    mount_page(&server, "/", &page("Home", &["/docs"])).await;
    mount_page(&server, "/docs", &page("Docs", &[])).await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.crawler.seed_url = Some(seed);
    config.output.directory = dir.path().display().to_string();
    config.output.tree = true;
    config.output.tree_format = TreeFormat::Json;

    let summary = run_crawl(config).await.unwrap();

    assert_eq!(summary.pages, 2);
    assert_eq!(summary.total_warnings, 0);
    assert!(!summary.interrupted);

    let tree: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("tree.json")).unwrap()).unwrap();
    assert_eq!(tree[0]["title"], "Home");
    assert_eq!(tree[0]["children"][0]["title"], "Docs");
    assert!(dir.path().join("data").join("2.html").exists());
}

#[tokio::test]
async fn test_run_crawl_rejects_invalid_seed() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.crawler.seed_url = Some("not-a-url".to_string());
    config.output.directory = dir.path().display().to_string();

    assert!(run_crawl(config).await.is_err());
    assert!(!dir.path().join("urls.txt").exists());
}
