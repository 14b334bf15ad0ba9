//! Provider Management Tests
//!
//! Adding hydralinks catalogs from a mock server into a temp directory.

use mockito::Server;
use repackgrab::catalog::LocalSearch;
use repackgrab::providers::{ProviderError, Providers};
use tempfile::TempDir;

const DODI: &str = r#"{"name":"DODI","downloads":[{"title":"Hades","uris":["magnet:h"],"uploadDate":"2024-01-01"}]}"#;

fn providers_for(server: &Server, dir: &TempDir) -> Providers {
    Providers::new(dir.path().join("catalogs")).with_sources_prefix(format!("{}/sources/", server.url()))
}

/// Test: a valid catalog is stored pretty-printed and becomes searchable
#[tokio::test]
async fn test_add_provider() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/sources/dodi.json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(DODI)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let providers = providers_for(&server, &dir);
    let info = providers
        .add(&format!("{}/sources/dodi.json", server.url()))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(info.name, "dodi.json");
    assert!(info.path.exists());

    let stored = std::fs::read_to_string(&info.path).unwrap();
    assert!(stored.contains('\n'));
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(&stored).unwrap(),
        serde_json::from_str::<serde_json::Value>(DODI).unwrap()
    );

    let listed = providers.list().unwrap();
    assert_eq!(listed, vec![info]);

    let (records, _) = LocalSearch::new(providers.dir()).search("hades").await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].source, "dodi");
    assert_eq!(records[0].upload_date.as_deref(), Some("2024-01-01"));
}

/// Test: non-catalog JSON is rejected and nothing is written
#[tokio::test]
async fn test_add_provider_invalid_catalog() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/sources/broken.json")
        .with_status(200)
        .with_body(r#"{"message": "rate limited"}"#)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let providers = providers_for(&server, &dir);
    let err = providers
        .add(&format!("{}/sources/broken.json", server.url()))
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::InvalidCatalog(_)));
    assert!(providers.is_empty());
}

/// Test: HTTP errors surface their status
#[tokio::test]
async fn test_add_provider_http_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/sources/gone.json")
        .with_status(500)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let err = providers_for(&server, &dir)
        .add(&format!("{}/sources/gone.json", server.url()))
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::Status(500)));
}

/// Test: URLs outside the sources prefix are refused without a request
#[tokio::test]
async fn test_add_provider_wrong_prefix() {
    let mut server = Server::new_async().await;
    let mock = server.mock("GET", mockito::Matcher::Any).expect(0).create_async().await;

    let dir = TempDir::new().unwrap();
    let err = providers_for(&server, &dir)
        .add(&format!("{}/other/dodi.json", server.url()))
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::InvalidUrl(_)));
    mock.assert_async().await;
}

/// Test: an extensionless URL is stored as .json and stays searchable
#[tokio::test]
async fn test_add_provider_without_extension() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/sources/dodi")
        .with_status(200)
        .with_body(DODI)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let providers = providers_for(&server, &dir);
    let info = providers
        .add(&format!("{}/sources/dodi", server.url()))
        .await
        .unwrap();

    assert_eq!(info.name, "dodi.json");
    assert_eq!(providers.list().unwrap(), vec![info]);

    let (records, _) = LocalSearch::new(providers.dir()).search("hades").await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].title, "Hades");
}
