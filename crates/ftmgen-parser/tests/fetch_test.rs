//! Tests for the remote schema fetcher

use ftmgen_parser::{ParserError, SchemaCatalog, SchemaFetcher};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

const THING: &str = "Thing:\n  required:\n    - name\n  properties:\n    name:\n      label: Name\n";
const INTERVAL: &str = "Interval:\n  properties:\n    startDate:\n      type: date\n";

fn listing(server: &MockServer, files: &[&str]) -> serde_json::Value {
    let items: Vec<_> = files
        .iter()
        .map(|name| {
            json!({
                "name": name,
                "path": format!("followthemoney/schema/{name}"),
                "type": "file",
                "download_url": format!("{}/raw/{name}", server.uri())
            })
        })
        .collect();
    json!(items)
}

async fn mount_file(server: &MockServer, name: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/raw/{name}")))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_fetch_listing_and_documents() -> Result<(), ParserError> {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/schema"))
        .and(header("accept", "application/vnd.github.v3+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(
            &server,
            &["Thing.yaml", "Interval.yaml"],
        )))
        .mount(&server)
        .await;
    mount_file(&server, "Thing.yaml", THING).await;
    mount_file(&server, "Interval.yaml", INTERVAL).await;

    let fetcher = SchemaFetcher::new()?.quiet();
    let documents = fetcher.fetch_all(&format!("{}/schema", server.uri())).await?;

    let names: Vec<&str> = documents.iter().map(|d| d.file_name.as_str()).collect();
    assert_eq!(names, vec!["Interval.yaml", "Thing.yaml"]);

    let catalog = SchemaCatalog::from_documents(&documents)?;
    assert_eq!(catalog.get("Thing").map(|n| n.required.clone()), Some(vec!["name".to_string()]));
    Ok(())
}

#[tokio::test]
async fn test_listing_skips_directories_and_other_files() -> Result<(), ParserError> {
    let server = MockServer::start().await;
    let body = json!([
        {
            "name": "Thing.yaml",
            "type": "file",
            "download_url": format!("{}/raw/Thing.yaml", server.uri())
        },
        {
            "name": "README.md",
            "type": "file",
            "download_url": format!("{}/raw/README.md", server.uri())
        },
        { "name": "legacy.yaml", "type": "dir", "download_url": null }
    ]);

    Mock::given(method("GET"))
        .and(path("/schema"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let fetcher = SchemaFetcher::new()?.quiet();
    let entries = fetcher.list(&format!("{}/schema", server.uri())).await?;

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "Thing.yaml");
    Ok(())
}

#[tokio::test]
async fn test_missing_listing_is_http_error() -> Result<(), ParserError> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/schema"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fetcher = SchemaFetcher::new()?.quiet();
    let result = fetcher.fetch_all(&format!("{}/schema", server.uri())).await;

    assert!(matches!(result, Err(ParserError::Http { status: 404, .. })));
    Ok(())
}

#[tokio::test]
async fn test_failed_download_aborts_fetch() -> Result<(), ParserError> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/schema"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(
            &server,
            &["Thing.yaml", "Interval.yaml"],
        )))
        .mount(&server)
        .await;
    mount_file(&server, "Thing.yaml", THING).await;
    Mock::given(method("GET"))
        .and(path("/raw/Interval.yaml"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let fetcher = SchemaFetcher::new()?.quiet();
    let result = fetcher.fetch_all(&format!("{}/schema", server.uri())).await;

    assert!(matches!(result, Err(ParserError::Http { status: 500, .. })));
    Ok(())
}

#[tokio::test]
async fn test_listing_must_be_json() -> Result<(), ParserError> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/schema"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>rate limited</html>"))
        .mount(&server)
        .await;

    let fetcher = SchemaFetcher::new()?.quiet();
    let result = fetcher.list(&format!("{}/schema", server.uri())).await;

    assert!(matches!(result, Err(ParserError::Json(_))));
    Ok(())
}

#[tokio::test]
async fn test_fetch_to_dir() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/schema"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(&server, &["Thing.yaml"])))
        .mount(&server)
        .await;
    mount_file(&server, "Thing.yaml", THING).await;

    let dir = tempfile::tempdir()?;
    let target = dir.path().join("schemas");
    let fetcher = SchemaFetcher::new()?.quiet();
    let written = fetcher
        .fetch_to_dir(&format!("{}/schema", server.uri()), &target)
        .await?;

    assert_eq!(written, vec![target.join("Thing.yaml")]);
    assert_eq!(std::fs::read_to_string(target.join("Thing.yaml"))?, THING);

    let reloaded = ftmgen_parser::load_dir(&target)?;
    assert_eq!(reloaded.len(), 1);
    Ok(())
}
