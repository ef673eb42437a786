//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end, with output written to temp directories.

use ripple_rank::config::{
    load_config_with_hash, Config, CrawlerConfig, OutputConfig, ScoringConfig, SeedEntry,
    UserAgentConfig,
};
use ripple_rank::crawler::{run_crawl, Coordinator, HttpFetcher, StopHandle};
use ripple_rank::output::{JsonlSink, MemorySink, NoProgress};
use ripple_rank::state::CrawlState;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration crawling from the given seeds
fn create_test_config(seeds: Vec<String>, output_dir: &Path) -> Config {
    Config {
        crawler: CrawlerConfig {
            fetch_timeout_secs: 5,
            ..Default::default()
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        output: OutputConfig {
            directory: output_dir.to_string_lossy().into_owned(),
        },
        scoring: ScoringConfig::default(),
        seeds: seeds
            .into_iter()
            .map(|url| SeedEntry { url, priority: 0.0 })
            .collect(),
    }
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html")
}

fn http_fetcher(config: &Config) -> HttpFetcher {
    HttpFetcher::from_config(
        &config.user_agent,
        Duration::from_secs(config.crawler.fetch_timeout_secs),
    )
    .expect("Failed to build HTTP client")
}

/// Reads every record from a JSON-lines output file
fn read_records(path: &Path) -> Vec<serde_json::Value> {
    std::fs::read_to_string(path)
        .expect("Failed to read output")
        .lines()
        .map(|line| serde_json::from_str(line).expect("Invalid JSON line"))
        .collect()
}

#[tokio::test]
async fn test_full_crawl_follows_score_order() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Index links to two shallow pages and one deeper article
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(format!(
            r#"<html><head><title>Home</title></head><body>
            <a href="{0}/page1">Page 1</a>
            <a href="{0}/page2">Page 2</a>
            <a href="/article/deep">Article</a>
            </body></html>"#,
            base_url
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    for (route, title) in [
        ("/page1", "Page 1"),
        ("/page2", "Page 2"),
        ("/article/deep", "Article"),
    ] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(html(format!(
                r#"<html><head><title>{0}</title></head><body>{0} content</body></html>"#,
                title
            )))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let output_dir = TempDir::new().expect("Failed to create temp dir");
    let mut config = create_test_config(vec![format!("{}/", base_url)], output_dir.path());
    config
        .scoring
        .content_type_weights
        .insert("/article/".to_string(), 5.0);

    let report = run_crawl(&config, "full", StopHandle::new())
        .await
        .expect("Crawl failed");

    assert_eq!(report.state, CrawlState::Drained);
    assert_eq!(report.stats.pages_emitted, 4);
    assert_eq!(report.stats.fetch_failures, 0);

    let records = read_records(&output_dir.path().join("crawl-full.jsonl"));
    let urls: Vec<String> = records
        .iter()
        .map(|r| r["url"].as_str().unwrap().to_string())
        .collect();

    // /article/deep scores 5 - 2, the shallow pages -1 each in discovery order
    assert_eq!(
        urls,
        vec![
            format!("{}/", base_url),
            format!("{}/article/deep", base_url),
            format!("{}/page1", base_url),
            format!("{}/page2", base_url),
        ]
    );
    assert_eq!(records[0]["title"], "Home");
    assert_eq!(records[1]["text"], "Article content");
}

#[tokio::test]
async fn test_failed_seed_drains_without_output() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let output_dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(vec![format!("{}/", base_url)], output_dir.path());
    let sink = JsonlSink::for_session(output_dir.path(), "failed");
    let output_path = sink.path().to_path_buf();

    let mut coordinator = Coordinator::from_config(&config, http_fetcher(&config))
        .expect("Failed to create coordinator")
        .with_output(Box::new(sink));
    let report = coordinator.run().await.expect("Crawl failed");

    assert_eq!(report.state, CrawlState::Drained);
    assert_eq!(report.stats.fetch_failures, 1);
    assert_eq!(report.stats.pages_emitted, 0);
    assert_eq!(coordinator.tracker().visit_count("127.0.0.1"), 1);
    assert!(!output_path.exists(), "No output file for an empty crawl");
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html("<p>late</p>".to_string()).set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let output_dir = TempDir::new().expect("Failed to create temp dir");
    let mut config = create_test_config(vec![format!("{}/slow", base_url)], output_dir.path());
    config.crawler.fetch_timeout_secs = 1;

    let sink = MemorySink::new();
    let mut coordinator = Coordinator::from_config(&config, http_fetcher(&config))
        .expect("Failed to create coordinator")
        .with_output(Box::new(sink.clone()))
        .with_progress(Box::new(NoProgress));
    let report = coordinator.run().await.expect("Crawl failed");

    assert_eq!(report.state, CrawlState::Drained);
    assert_eq!(report.stats.fetch_failures, 1);
    assert!(sink.is_empty());
}

#[tokio::test]
async fn test_non_html_is_not_emitted() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(format!(
            r#"<html><body><a href="{}/report.pdf">PDF</a></body></html>"#,
            base_url
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/report.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"%PDF-1.4".to_vec())
                .insert_header("content-type", "application/pdf"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let output_dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(vec![format!("{}/", base_url)], output_dir.path());

    let sink = MemorySink::new();
    let mut coordinator = Coordinator::from_config(&config, http_fetcher(&config))
        .expect("Failed to create coordinator")
        .with_output(Box::new(sink.clone()));
    let report = coordinator.run().await.expect("Crawl failed");

    assert_eq!(report.stats.pages_fetched, 2);
    assert_eq!(report.stats.parse_failures, 1);
    assert_eq!(sink.len(), 1);
    assert_eq!(coordinator.tracker().visit_count("127.0.0.1"), 2);
}

#[tokio::test]
async fn test_redirect_resolves_links_from_final_url() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(301)
                .insert_header("location", format!("{}/docs/new", base_url).as_str()),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/docs/new"))
        .respond_with(html(r#"<a href="next">Next</a>"#.to_string()))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/docs/next"))
        .respond_with(html("<p>end</p>".to_string()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let output_dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(vec![format!("{}/old", base_url)], output_dir.path());

    let sink = MemorySink::new();
    let mut coordinator = Coordinator::from_config(&config, http_fetcher(&config))
        .expect("Failed to create coordinator")
        .with_output(Box::new(sink.clone()));
    coordinator.run().await.expect("Crawl failed");

    let urls: Vec<String> = sink.pages().into_iter().map(|p| p.url).collect();
    assert_eq!(
        urls,
        vec![format!("{}/old", base_url), format!("{}/docs/next", base_url)]
    );
}

#[tokio::test]
async fn test_stopped_crawl_fetches_nothing() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .respond_with(html("<p>never</p>".to_string()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let output_dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(vec![format!("{}/", base_url)], output_dir.path());

    let stop = StopHandle::new();
    stop.stop();
    let report = run_crawl(&config, "stopped", stop)
        .await
        .expect("Crawl failed");

    assert_eq!(report.state, CrawlState::Stopped);
    assert_eq!(report.stats.fetch_attempts(), 0);
}

#[tokio::test]
async fn test_max_pages_limits_fetches() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(format!(
            r#"<a href="{0}/a">a</a><a href="{0}/b">b</a><a href="{0}/c">c</a>"#,
            base_url
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .respond_with(html("<p>leaf</p>".to_string()))
        .mount(&mock_server)
        .await;

    let output_dir = TempDir::new().expect("Failed to create temp dir");
    let mut config = create_test_config(vec![format!("{}/", base_url)], output_dir.path());
    config.crawler.max_pages = Some(2);

    let report = run_crawl(&config, "budget", StopHandle::new())
        .await
        .expect("Crawl failed");

    assert_eq!(report.state, CrawlState::Stopped);
    assert_eq!(report.stats.fetch_attempts(), 2);
    assert_eq!(
        read_records(&output_dir.path().join("crawl-budget.jsonl")).len(),
        2
    );
}

#[tokio::test]
async fn test_crawl_from_config_file() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            "<html><head><title>Rust</title></head><body>rust rust rust</body></html>"
                .to_string(),
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let output_dir = dir.path().join("out");
    let config_path = dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        format!(
            r#"
[crawler]
fetch-timeout-secs = 5

[user-agent]
crawler-name = "TestBot"
crawler-version = "1.0"
contact-url = "https://example.com/bot"
contact-email = "bot@example.com"

[output]
directory = "{}"

[scoring.keyword-weights]
rust = 1.5

[[seed]]
url = "{}/"
priority = 10.0
"#,
            output_dir.display(),
            base_url
        ),
    )
    .expect("Failed to write config");

    let (config, hash) = load_config_with_hash(&config_path).expect("Failed to load config");
    assert_eq!(hash.len(), 64);

    let report = run_crawl(&config, &hash[..8], StopHandle::new())
        .await
        .expect("Crawl failed");
    assert_eq!(report.stats.pages_emitted, 1);

    let records = read_records(&output_dir.join(format!("crawl-{}.jsonl", &hash[..8])));
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["title"], "Rust");
    // Three keyword hits at 1.5, root path has depth 0
    assert_eq!(records[0]["score"], 4.5);
}
