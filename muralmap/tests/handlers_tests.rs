use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use muralmap::commands::command_argument_builder;
use muralmap::handlers::*;
use muralmap::server::{AppState, router};
use muralmap_core::PipelineConfig;
use muralmap_scanner::listing::encode_marker;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn scrape_matches(args: &[&str]) -> clap::ArgMatches {
    let mut argv = vec!["muralmap", "scrape"];
    argv.extend_from_slice(args);
    let matches = command_argument_builder().get_matches_from(argv);
    let (_, sub) = matches.subcommand().unwrap();
    sub.clone()
}

// ============================================================================
// Argument Handling
// ============================================================================

#[test]
fn test_defaults_match_oakland_deployment() {
    let config = pipeline_config_from_args(&scrape_matches(&[]));
    let default = PipelineConfig::default();

    assert_eq!(config.listing_url, default.listing_url);
    assert_eq!(config.request_delay, Duration::from_millis(500));
    assert_eq!(config.fetch_timeout, Duration::from_secs(10));
    assert_eq!(config.max_enrichments, None);
    assert_eq!(
        config.supplementary_path,
        Some(PathBuf::from("extra_murals.csv"))
    );
}

#[test]
fn test_flags_override_defaults() {
    let config = pipeline_config_from_args(&scrape_matches(&[
        "--listing-url",
        "http://wiki.test/oakland/Murals",
        "--delay-ms",
        "0",
        "--timeout-secs",
        "3",
        "--limit",
        "5",
    ]));

    assert_eq!(config.listing_url, "http://wiki.test/oakland/Murals");
    assert_eq!(config.syntax.base_url, "http://wiki.test/oakland/");
    assert_eq!(config.request_delay, Duration::ZERO);
    assert_eq!(config.fetch_timeout, Duration::from_secs(3));
    assert_eq!(config.max_enrichments, Some(5));
}

#[test]
fn test_invalid_listing_url_is_rejected() {
    let result = command_argument_builder().try_get_matches_from([
        "muralmap",
        "scrape",
        "--listing-url",
        "not a url",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_serve_bind_default() {
    let matches = command_argument_builder().get_matches_from(["muralmap", "serve"]);
    let (name, sub) = matches.subcommand().unwrap();
    assert_eq!(name, "serve");
    assert_eq!(
        sub.get_one::<String>("bind").map(String::as_str),
        Some("127.0.0.1:5000")
    );
}

#[test]
fn test_expand_path_tilde() {
    let expanded = expand_path("~/murals/extra.csv");
    assert!(!expanded.to_string_lossy().starts_with('~'));
    assert!(expanded.ends_with("murals/extra.csv"));

    assert_eq!(expand_path("extra.csv"), PathBuf::from("extra.csv"));
}

// ============================================================================
// HTTP Endpoint
// ============================================================================

fn config_for(server: &MockServer) -> PipelineConfig {
    PipelineConfig::default()
        .with_listing_url(&format!("{}/oakland/Murals", server.uri()))
        .with_request_delay(Duration::from_millis(1))
        .with_fetch_timeout(Duration::from_secs(2))
        .with_supplementary_path(None)
        .with_capacity(3)
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

#[tokio::test]
async fn test_healthz() {
    let app = router(AppState::new(PipelineConfig::default()));
    let (status, body) = get(app, "/healthz").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"ok");
}

#[tokio::test]
async fn test_mural_data_served_as_geojson() {
    let server = MockServer::start().await;
    let config = config_for(&server);
    let listing = format!(
        "<script>[{}]</script>",
        encode_marker(&config.syntax, "Mural A", "MuralA", -122.27, 37.80)
    );
    Mock::given(method("GET"))
        .and(path("/oakland/Murals"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/oakland/MuralA"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&server)
        .await;

    let app = router(AppState::new(config));
    let (status, body) = get(app, "/get_mural_data").await;
    let json: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["type"], "FeatureCollection");
    let features = json["features"].as_array().unwrap();
    assert_eq!(features.len(), 3);
    assert_eq!(features[0]["properties"]["name"], "Mural A");
    assert_eq!(features[0]["properties"]["id"], 707);
    assert_eq!(
        features[0]["geometry"]["coordinates"],
        serde_json::json!([-122.27, 37.8])
    );
    assert_eq!(features[1]["properties"]["name"], "reserved");
}

#[tokio::test]
async fn test_upstream_failure_gives_bad_gateway_with_empty_collection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/oakland/Murals"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let app = router(AppState::new(config_for(&server)));
    let (status, body) = get(app, "/get_mural_data").await;
    let json: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["type"], "FeatureCollection");
    assert!(json["features"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_scrape_writes_output_file() {
    let server = MockServer::start().await;
    let config = config_for(&server);
    let listing = format!(
        "<script>[{}]</script>",
        encode_marker(&config.syntax, "Mural B", "MuralB", -122.26, 37.81)
    );
    Mock::given(method("GET"))
        .and(path("/oakland/Murals"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/oakland/MuralB"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&server)
        .await;

    let dir = tempfile::TempDir::new().unwrap();
    let output = dir.path().join("murals.geojson");
    let listing_url = format!("{}/oakland/Murals", server.uri());
    let missing_extra = dir.path().join("none.csv");
    let args = scrape_matches(&[
        "--listing-url",
        &listing_url,
        "--delay-ms",
        "1",
        "--extra-murals",
        missing_extra.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
    ]);

    handle_scrape(&args, true).await.unwrap();

    let written: Value = serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    let features = written["features"].as_array().unwrap();
    assert_eq!(features.len(), PipelineConfig::default().capacity);
    assert_eq!(features[0]["properties"]["name"], "Mural B");
}

#[tokio::test]
async fn test_scrape_fails_when_listing_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/oakland/Murals"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let listing_url = format!("{}/oakland/Murals", server.uri());
    let args = scrape_matches(&["--listing-url", &listing_url, "--delay-ms", "0"]);

    assert!(handle_scrape(&args, true).await.is_err());
}
