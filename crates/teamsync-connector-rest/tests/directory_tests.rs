//! Person directory against a mock HTTP server.

mod common;

use common::*;
use serde_json::json;
use teamsync_connector_rest::RestDirectory;
use teamsync_core::traits::DirectorySource;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_load_all_persons() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/people"))
        .and(header("authorization", bearer().as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            person_json(1, "alice"),
            person_json(2, "Bob"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let directory = RestDirectory::new(create_config(&server)).unwrap();
    let persons = directory.load_all_persons().await.unwrap();

    assert_eq!(persons.len(), 2);
    assert_eq!(persons[0].directory_id.as_str(), "1");
    assert_eq!(persons[1].external_username, "Bob");
}

#[tokio::test]
async fn test_load_wrapped_response() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/people"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "people": [{ "id": "u-77", "username": "carol" }]
        })))
        .mount(&server)
        .await;

    let directory = RestDirectory::new(create_config(&server)).unwrap();
    let persons = directory.load_all_persons().await.unwrap();

    assert_eq!(persons[0].directory_id.as_str(), "u-77");
}

#[tokio::test]
async fn test_unauthorized() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/people"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let directory = RestDirectory::new(create_config(&server)).unwrap();
    let err = directory.load_all_persons().await.unwrap_err();

    assert_eq!(err.error_code(), "AUTH_FAILED");
    assert!(!err.is_transient());
}

#[tokio::test]
async fn test_malformed_body_is_invalid_data() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/people"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let directory = RestDirectory::new(create_config(&server)).unwrap();
    let err = directory.load_all_persons().await.unwrap_err();

    assert_eq!(err.error_code(), "INVALID_DATA");
}

#[tokio::test]
async fn test_base_url_path_prefix_is_kept() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/people"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let config = teamsync_connector_rest::RestConfig::new(format!("{}/api/v2/", server.uri()))
        .with_retry(teamsync_connector_rest::RetryConfig::disabled());
    let directory = RestDirectory::new(config).unwrap();

    assert!(directory.load_all_persons().await.unwrap().is_empty());
}
