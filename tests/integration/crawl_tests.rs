//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full run cycle end-to-end against JSON files in a temp directory.

use skinmap::config::{Config, FetcherConfig, PathsConfig};
use skinmap::crawler::{FetchError, HttpPageFetcher, PageFetcher, WorkshopField};
use skinmap::storage::read_json;
use skinmap::{CacheStore, Coordinator, GroupedConfig, RunOutcome, SkinmapError};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server and temp files
fn create_test_config(base_url: &str, dir: &TempDir) -> Config {
    Config {
        paths: PathsConfig {
            source_list: dir.path().join("skinslist.json"),
            cache: dir.path().join("cache.json"),
            output: dir.path().join("Skins.json"),
        },
        fetcher: FetcherConfig {
            index_url: format!("{}/skins", base_url),
            request_timeout_secs: 5,
            connect_timeout_secs: 5,
        },
        ..Config::default()
    }
}

fn skin_page(workshop_id: u64, item: &str) -> String {
    format!(
        r#"<html><body>
        <table class="stats-table">
            <tr><td>Workshop ID</td><td><a href="https://steamcommunity.com/sharedfiles/filedetails/?id={id}">{id}</a></td></tr>
        </table>
        <div data-name="skin-for">
            <div class="item-cell"><img src="//rustlabs.com/img/items180/{item}.png"></div>
        </div>
        </body></html>"#,
        id = workshop_id,
        item = item
    )
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html")
}

/// Mounts an index page linking `/skin/a`, `/skin/b` and `/skin/c`
async fn mount_index(server: &MockServer) {
    // Protocol-relative like the real index page, plus a plain path
    let host = server.uri().trim_start_matches("http:").to_string();
    let index = format!(
        r#"<html><body><div id="wrappah">
            <a href="{host}/skin/a">Tempered AK47</a>
            <a href="/skin/b">Glory AK47</a>
            <a href="{host}/skin/c">Workbench Frame</a>
        </div></body></html>"#,
        host = host
    );

    Mock::given(method("GET"))
        .and(path("/skins"))
        .respond_with(html(index))
        .mount(server)
        .await;
}

async fn mount_page(server: &MockServer, page: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn mount_all_pages(server: &MockServer) {
    mount_page(server, "/skin/a", html(skin_page(1_174_389_582, "rifle.ak"))).await;
    mount_page(server, "/skin/b", html(skin_page(1_230_000_001, "rifle.ak"))).await;
    // No stats table: not a workshop skin
    mount_page(
        server,
        "/skin/c",
        html("<html><body><h1>Frame</h1></body></html>".to_string()),
    )
    .await;
}

async fn requests_to(server: &MockServer, page: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == page)
        .count()
}

fn read_output(dir: &TempDir) -> Option<GroupedConfig> {
    read_json(&dir.path().join("Skins.json")).expect("Failed to read output")
}

#[tokio::test]
async fn test_full_run_discovers_crawls_and_groups() {
    let mock_server = MockServer::start().await;
    mount_index(&mock_server).await;
    mount_all_pages(&mock_server).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), &dir);
    let coordinator = Coordinator::from_config(config).expect("Failed to create coordinator");

    let outcome = coordinator
        .run(&CancellationToken::new())
        .await
        .expect("Run failed");

    match outcome {
        RunOutcome::Completed(crawl) => {
            assert_eq!(crawl.processed, 3);
            assert_eq!(crawl.resolved, 2);
            assert_eq!(crawl.ignored, 1);
        }
        other => panic!("Expected a completed run, got {:?}", other),
    }

    let base = mock_server.uri();
    let source_list = coordinator.store().load_source_list().unwrap().unwrap();
    assert_eq!(
        source_list,
        vec![
            format!("{}/skin/a", base),
            format!("{}/skin/b", base),
            format!("{}/skin/c", base),
        ]
    );

    let cache = coordinator.store().load_cache().unwrap();
    assert_eq!(cache.len(), 3);
    assert!(cache.records()[2].state.is_ignored());

    let written: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("Skins.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(
        written,
        serde_json::json!({
            "Skins": [
                {
                    "Item Shortname": "rifle.ak",
                    "Permission": "",
                    "Skins": [1_174_389_582u64, 1_230_000_001u64]
                }
            ]
        })
    );
}

#[tokio::test]
async fn test_fetch_error_saves_progress_and_next_run_resumes() {
    let mock_server = MockServer::start().await;
    mount_index(&mock_server).await;
    mount_page(&mock_server, "/skin/a", html(skin_page(11, "hatchet"))).await;
    mount_page(&mock_server, "/skin/b", ResponseTemplate::new(503)).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), &dir);

    let coordinator = Coordinator::from_config(config.clone()).unwrap();
    let result = coordinator.run(&CancellationToken::new()).await;

    assert!(matches!(
        result,
        Err(SkinmapError::Fetch(FetchError::Status { status: 503, .. }))
    ));
    assert!(read_output(&dir).is_none(), "No output after a failed crawl");

    let cache = coordinator.store().load_cache().unwrap();
    assert!(cache.records()[0].state.is_resolved());
    assert!(cache.records()[1].is_pending());
    assert!(cache.records()[2].is_pending());

    // Second run against a healthy server only fetches what is left
    mock_server.reset().await;
    mount_page(&mock_server, "/skin/b", html(skin_page(12, "hatchet"))).await;
    mount_page(
        &mock_server,
        "/skin/c",
        html("<html><body></body></html>".to_string()),
    )
    .await;

    let coordinator = Coordinator::from_config(config).unwrap();
    let outcome = coordinator.run(&CancellationToken::new()).await.unwrap();

    assert!(matches!(outcome, RunOutcome::Completed(crawl) if crawl.processed == 2));
    assert_eq!(requests_to(&mock_server, "/skins").await, 0);
    assert_eq!(requests_to(&mock_server, "/skin/a").await, 0);
    assert_eq!(requests_to(&mock_server, "/skin/b").await, 1);

    let output = read_output(&dir).unwrap();
    assert_eq!(output.group("hatchet").unwrap().skins, vec![11, 12]);
}

#[tokio::test]
async fn test_up_to_date_run_only_regenerates_output() {
    let mock_server = MockServer::start().await;
    mount_index(&mock_server).await;
    mount_all_pages(&mock_server).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), &dir);

    Coordinator::from_config(config.clone())
        .unwrap()
        .run(&CancellationToken::new())
        .await
        .unwrap();

    let cache_before = std::fs::read_to_string(dir.path().join("cache.json")).unwrap();
    let output_before = read_output(&dir).unwrap();
    std::fs::remove_file(dir.path().join("Skins.json")).unwrap();
    mock_server.reset().await;

    let outcome = Coordinator::from_config(config)
        .unwrap()
        .run(&CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome, RunOutcome::UpToDate { records: 3 });
    assert!(mock_server
        .received_requests()
        .await
        .unwrap_or_default()
        .is_empty());
    assert_eq!(
        std::fs::read_to_string(dir.path().join("cache.json")).unwrap(),
        cache_before
    );
    assert_eq!(read_output(&dir), Some(output_before));
}

#[tokio::test]
async fn test_cancelled_run_fetches_nothing_and_writes_no_output() {
    let mock_server = MockServer::start().await;
    mount_index(&mock_server).await;
    mount_all_pages(&mock_server).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), &dir);
    let token = CancellationToken::new();
    token.cancel();

    let coordinator = Coordinator::from_config(config).unwrap();
    let outcome = coordinator.run(&token).await.unwrap();

    assert!(matches!(outcome, RunOutcome::Cancelled(crawl) if crawl.processed == 0));
    assert_eq!(requests_to(&mock_server, "/skin/a").await, 0);
    assert_eq!(coordinator.store().load_cache().unwrap().pending_count(), 3);
    assert!(read_output(&dir).is_none());
}

#[tokio::test]
async fn test_http_fetcher_extracts_fields() {
    let mock_server = MockServer::start().await;
    mount_all_pages(&mock_server).await;

    let fetcher = HttpPageFetcher::new(&Config::default()).unwrap();

    let fields = fetcher
        .fetch(&format!("{}/skin/a", mock_server.uri()))
        .await
        .unwrap();
    assert_eq!(fields.workshop_id, WorkshopField::Id(1_174_389_582));
    assert_eq!(
        fields.item_image.as_deref(),
        Some("//rustlabs.com/img/items180/rifle.ak.png")
    );

    let fields = fetcher
        .fetch(&format!("{}/skin/c", mock_server.uri()))
        .await
        .unwrap();
    assert_eq!(fields.workshop_id, WorkshopField::Absent);
}

#[tokio::test]
async fn test_http_fetcher_reports_status_errors() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/skin/gone", ResponseTemplate::new(404)).await;

    let fetcher = HttpPageFetcher::new(&Config::default()).unwrap();
    let result = fetcher
        .fetch(&format!("{}/skin/gone", mock_server.uri()))
        .await;

    assert!(matches!(result, Err(FetchError::Status { status: 404, .. })));
}

#[tokio::test]
async fn test_discover_rejects_invalid_index_url() {
    let fetcher = HttpPageFetcher::new(&Config::default()).unwrap();
    let result = fetcher.discover("not a url").await;
    assert!(matches!(result, Err(FetchError::InvalidUrl { .. })));
}
