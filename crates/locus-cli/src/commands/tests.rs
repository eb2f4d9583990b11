//! Unit tests for CLI commands.

use super::*;
use crate::output::OutputHandler;
use locus_core::types::HttpMethod;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Create a temporary directory for testing
fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// Command context rooted in a temporary directory, with storage inside it
fn create_test_context(temp_dir: &TempDir, api_base_url: Option<String>) -> CommandContext {
    let cwd = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();

    let mut config = LocusToml::default();
    config.client.api_base_url = api_base_url;
    config.client.storage_dir = Some(cwd.join("storage"));
    config.client.max_retries = 0;

    CommandContext {
        cwd,
        output: OutputHandler::plain(),
        config,
        config_source: ConfigSource::Defaults,
    }
}

fn stored_items(ctx: &CommandContext) -> serde_json::Value {
    let file = ctx.cwd.join("storage").join("local_storage.json");
    serde_json::from_str(&std::fs::read_to_string(file).unwrap()).unwrap()
}

#[tokio::test]
async fn test_login_writes_token_to_local_storage() {
    let temp_dir = create_temp_dir();
    let ctx = create_test_context(&temp_dir, None);

    login::login("  secret-token ".to_string(), &ctx).await.unwrap();

    assert_eq!(stored_items(&ctx)["auth_token"], "secret-token");
}

#[tokio::test]
async fn test_login_rejects_empty_token() {
    let temp_dir = create_temp_dir();
    let ctx = create_test_context(&temp_dir, None);

    let err = login::login("   ".to_string(), &ctx).await.unwrap_err();
    assert!(matches!(err, LocusError::InvalidRequest { .. }));
    assert!(!ctx.cwd.join("storage").exists());
}

#[tokio::test]
async fn test_logout_removes_token_only() {
    let temp_dir = create_temp_dir();
    let ctx = create_test_context(&temp_dir, None);

    let store = ctx.token_store().unwrap();
    store.set_item("theme", "dark").unwrap();
    login::login("secret-token".to_string(), &ctx).await.unwrap();

    login::logout(&ctx).await.unwrap();

    let items = stored_items(&ctx);
    assert!(items.get("auth_token").is_none());
    assert_eq!(items["theme"], "dark");

    // Logging out twice is fine
    login::logout(&ctx).await.unwrap();
}

#[tokio::test]
async fn test_stored_token_reaches_the_api() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/locations"))
        .and(header("authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{"name": "Oslo"}])))
        .expect(1)
        .mount(&server)
        .await;

    let temp_dir = create_temp_dir();
    let ctx = create_test_context(&temp_dir, Some(server.uri()));

    login::login("secret-token".to_string(), &ctx).await.unwrap();
    request::get("/locations".to_string(), false, &ctx).await.unwrap();
}

#[tokio::test]
async fn test_request_sends_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/compare"))
        .and(body_json(serde_json::json!({"left": "oslo", "right": "bergen"})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let temp_dir = create_temp_dir();
    let ctx = create_test_context(&temp_dir, Some(server.uri()));

    request::execute(
        "post".to_string(),
        "/compare".to_string(),
        Some(r#"{"left": "oslo", "right": "bergen"}"#.to_string()),
        &ctx,
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn test_get_surfaces_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/locations"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let temp_dir = create_temp_dir();
    let ctx = create_test_context(&temp_dir, Some(server.uri()));

    let err = request::get("/locations".to_string(), true, &ctx).await.unwrap_err();
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn test_relative_url_without_base_is_rejected() {
    let temp_dir = create_temp_dir();
    let ctx = create_test_context(&temp_dir, None);

    let err = request::get("/locations".to_string(), false, &ctx).await.unwrap_err();
    assert!(matches!(err, LocusError::MissingBaseUrl { .. }));
}

#[test]
fn test_build_descriptor() {
    let descriptor = request::build_descriptor("patch", "/locations/1".to_string(), Some(r#"{"name":"Bergen"}"#)).unwrap();
    assert_eq!(descriptor.method, HttpMethod::Patch);
    assert_eq!(descriptor.body, Some(serde_json::json!({"name": "Bergen"})));
    assert_eq!(descriptor.retry_count, 0);

    assert!(matches!(
        request::build_descriptor("FETCH", "/".to_string(), None),
        Err(LocusError::InvalidRequest { .. })
    ));
    assert!(matches!(
        request::build_descriptor("GET", "/".to_string(), Some("{}")),
        Err(LocusError::InvalidRequest { .. })
    ));
    assert!(matches!(
        request::build_descriptor("POST", "/".to_string(), Some("{not json")),
        Err(LocusError::InvalidRequest { .. })
    ));
}

#[tokio::test]
async fn test_route_commands() {
    let temp_dir = create_temp_dir();
    let ctx = create_test_context(&temp_dir, None);

    route::resolve("/compare?left=oslo".to_string(), &ctx).await.unwrap();
    route::list(&ctx).await.unwrap();

    let err = route::resolve("/unknown".to_string(), &ctx).await.unwrap_err();
    assert!(matches!(err, LocusError::RouteNotFound { .. }));
}

#[test]
fn test_describe_route_match() {
    let matched = locus_router::RouteTable::app_routes().require("/").unwrap();
    assert_eq!(route::describe(&matched), "/ -> Layout > Dashboard");
}

#[tokio::test]
async fn test_init_writes_parseable_config() {
    let temp_dir = create_temp_dir();
    let ctx = create_test_context(&temp_dir, Some("https://api.example.com".to_string()));

    init::execute(&ctx).await.unwrap();

    let written = locus_config::toml::load_from_file(&ctx.cwd.join("locus.toml")).await.unwrap();
    assert_eq!(written.client.api_base_url.as_deref(), Some("https://api.example.com"));
    assert_eq!(written.client.timeout_ms, 5_000);
    assert_eq!(written.client.cache_ttl_ms, 60_000);
    assert_eq!(written.client.storage_dir, None);
}

#[tokio::test]
async fn test_init_keeps_existing_config() {
    let temp_dir = create_temp_dir();
    let ctx = create_test_context(&temp_dir, None);

    std::fs::write(temp_dir.path().join("locus.toml"), "existing content").unwrap();
    init::execute(&ctx).await.unwrap();

    let content = std::fs::read_to_string(temp_dir.path().join("locus.toml")).unwrap();
    assert_eq!(content, "existing content");
}

#[tokio::test]
async fn test_config_and_version() {
    let temp_dir = create_temp_dir();
    let ctx = create_test_context(&temp_dir, None);

    config::show(&ctx).await.unwrap();
    show_version(&ctx).await.unwrap();
}
