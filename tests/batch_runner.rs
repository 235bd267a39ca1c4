use page_crawler::config::{ConfigLoader, CrawlConfig, ResultsOutput};
use page_crawler::crawler::CrawlerEngine;
use page_crawler::output::export_results;
use page_crawler::output::memory::MemoryOutput;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn page(server: &MockServer, at: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

fn config_in(dir: &TempDir) -> CrawlConfig {
    CrawlConfig {
        output_dir: dir.path().to_string_lossy().into_owned(),
        ..CrawlConfig::default()
    }
}

#[tokio::test]
async fn processes_multiple_urls() {
    let server = MockServer::start().await;
    page(&server, "/example", "<html><body>Example</body></html>").await;
    page(&server, "/test", "<html><body>Test</body></html>").await;
    let dir = TempDir::new().unwrap();
    let sink = Arc::new(MemoryOutput::new());
    let engine = CrawlerEngine::new(&config_in(&dir).non_interactive(), sink.clone(), None).unwrap();

    let example = format!("{}/example", server.uri());
    let test = format!("{}/test", server.uri());
    let urls = vec![example.clone(), test.clone(), "invalid_url".to_string()];
    let results = engine.crawl_urls(urls.as_slice()).await;

    assert_eq!(results.len(), 3);
    assert_eq!(
        results.keys().collect::<Vec<_>>(),
        vec![example.as_str(), test.as_str(), "invalid_url"]
    );
    assert!(results.get(&example).unwrap().is_success());
    assert!(results.get(&test).unwrap().is_success());
    let invalid = results.get("invalid_url").unwrap();
    assert!(!invalid.is_success());
    assert_eq!(invalid.error(), Some("Invalid URL"));

    assert!(dir.path().join("127.0.0.1-example.html").exists());
    assert!(dir.path().join("127.0.0.1-test.html").exists());
    assert_eq!(sink.lines().last().unwrap(), "Invalid URL: invalid_url");
}

#[tokio::test]
async fn non_interactive_mode_never_pauses() {
    let server = MockServer::start().await;
    page(&server, "/one", "<html><body>Example 1</body></html>").await;
    page(&server, "/two", "<html><body>Example 2</body></html>").await;
    let dir = TempDir::new().unwrap();
    let config = CrawlConfig {
        delay_ms: 60_000,
        ..config_in(&dir)
    }
    .non_interactive();
    let engine = CrawlerEngine::new(&config, Arc::new(MemoryOutput::new()), None).unwrap();

    let urls = [format!("{}/one", server.uri()), format!("{}/two", server.uri())];
    let started = Instant::now();
    let results = engine.crawl_urls(&urls).await;

    assert!(started.elapsed() < Duration::from_secs(30));
    assert!(results.iter().all(|(_, r)| r.is_success()));
    assert_eq!(engine.get_metrics().pauses, 0);
}

#[tokio::test]
async fn pauses_only_between_network_urls() {
    let server = MockServer::start().await;
    page(&server, "/a", "<p>a</p>").await;
    page(&server, "/b", "<p>b</p>").await;
    let dir = TempDir::new().unwrap();
    let config = CrawlConfig {
        delay_ms: 10,
        ..config_in(&dir)
    };
    let engine = CrawlerEngine::new(&config, Arc::new(MemoryOutput::new()), None).unwrap();

    let urls = [
        "not a url".to_string(),
        format!("{}/a", server.uri()),
        "ftp://example.com".to_string(),
        format!("{}/b", server.uri()),
    ];
    engine.crawl_urls(&urls).await;

    // After /a only; nothing follows /b and invalid URLs never pause.
    assert_eq!(engine.get_metrics().pauses, 1);
}

#[tokio::test]
async fn failures_do_not_stop_the_batch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(410))
        .mount(&server)
        .await;
    page(&server, "/fine", "<a></a><a></a>").await;
    let dir = TempDir::new().unwrap();
    let engine = CrawlerEngine::new(
        &config_in(&dir).non_interactive(),
        Arc::new(MemoryOutput::new()),
        None,
    )
    .unwrap();

    let gone = format!("{}/gone", server.uri());
    let fine = format!("{}/fine", server.uri());
    let results = engine.crawl_urls(&[gone.clone(), fine.clone()]).await;

    assert!(results.get(&gone).unwrap().error().unwrap().starts_with("Failed to crawl"));
    assert!(results.get(&fine).unwrap().is_success());

    let metrics = engine.get_metrics();
    assert_eq!(metrics.urls_processed, 2);
    assert_eq!(metrics.pages_saved, 1);
    assert_eq!(metrics.fetches_failed, 1);
}

#[tokio::test]
async fn duplicate_urls_keep_latest_result() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    page(&server, "/flaky", "<img>").await;
    let dir = TempDir::new().unwrap();
    let engine = CrawlerEngine::new(
        &config_in(&dir).non_interactive(),
        Arc::new(MemoryOutput::new()),
        None,
    )
    .unwrap();

    let flaky = format!("{}/flaky", server.uri());
    let results = engine.crawl_urls(&[flaky.clone(), flaky.clone()]).await;

    assert_eq!(results.len(), 1);
    assert!(results.get(&flaky).unwrap().is_success());
    assert_eq!(engine.get_metrics().urls_processed, 2);
}

#[tokio::test]
async fn exports_batch_results() {
    let server = MockServer::start().await;
    page(&server, "/ok", "<a></a>").await;
    let dir = TempDir::new().unwrap();
    let export = dir.path().join("results.json");
    let config = CrawlConfig {
        results: Some(ResultsOutput::from_path(&export)),
        ..config_in(&dir).non_interactive()
    };
    let engine = ConfigLoader::create_engine(&config, Arc::new(MemoryOutput::new()), None).unwrap();

    let ok = format!("{}/ok", server.uri());
    let results = engine.crawl_urls(&[ok.clone(), "invalid_url".to_string()]).await;

    let mut handler = ConfigLoader::create_results_output(&config).unwrap().unwrap();
    export_results(handler.as_mut(), &results).await.unwrap();

    let exported: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&export).unwrap()).unwrap();
    let records = exported.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["url"], ok.as_str());
    assert_eq!(records[0]["filename"], "127.0.0.1-ok.html");
    assert_eq!(records[1]["message"], "Invalid URL");
}
