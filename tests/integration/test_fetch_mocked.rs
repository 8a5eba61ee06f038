//! Integration tests for fetch_metrics using mocked HTTP responses
//!
//! These tests verify request construction, status handling and response
//! flattening without making real API calls. They use wiremock to simulate
//! the Altmetric v1 API.

#[path = "common/mod.rs"]
mod common;

use altmetric_client::{
    AltmetricError, Identifier, IdentifierQuery, MetricValue, RequestOptions, to_table,
};
use common::{TEST_API_KEY, create_mock_client, sample_article_response};
use std::time::Duration;
use tracing_test::traced_test;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Test a successful lookup by ISBN
#[tokio::test]
#[traced_test]
async fn test_fetch_isbn_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/isbn/978-3-319-25557-6"))
        .and(query_param("key", TEST_API_KEY))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({
                    "title": "T",
                    "counts": { "cited_by_posts_count": 3 }
                }))
                .insert_header("content-type", "application/json"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);

    let result = client
        .fetch_metrics(&Identifier::isbn("978-3-319-25557-6").unwrap())
        .await
        .expect("ISBN lookup should succeed");

    assert_eq!(result.get("title"), Some(&MetricValue::from("T")));
    assert_eq!(
        result.get("counts.cited_by_posts_count"),
        Some(&MetricValue::Integer(3))
    );
    assert_eq!(result.len(), 2);
    assert_eq!(result.identifier().path(), "isbn/978-3-319-25557-6");

    let table = to_table(&result);
    assert_eq!(table.columns(), &["title", "counts.cited_by_posts_count"]);
    assert_eq!(table.rows(), &[vec!["T".to_string(), "3".to_string()]]);
}

/// Test that a full article response is flattened
#[tokio::test]
#[traced_test]
async fn test_fetch_doi_flattens_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/doi/10.1038/480426a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_article_response()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);

    let result = client
        .fetch_metrics(&Identifier::doi("doi:10.1038/480426a").unwrap())
        .await
        .expect("DOI lookup should succeed");

    assert_eq!(result.title(), Some("Dark matter: Missing galaxies"));
    assert_eq!(result.altmetric_id(), Some(241939));
    assert_eq!(result.score(), Some(17.25));
    assert_eq!(result.cited_by_posts_count(), Some(21));
    assert_eq!(
        result.get("authors[1]"),
        Some(&MetricValue::from("John Doe"))
    );
    assert_eq!(
        result.get("context.all.pct"),
        Some(&MetricValue::Integer(98))
    );
    assert_eq!(result.get("history.1y"), Some(&MetricValue::Integer(0)));
    assert!(result.get("abstract").is_none());
    assert_eq!(result.raw()["journal"], "Nature");
}

/// Test that a 404 becomes a not-found error without parsing the body
#[tokio::test]
#[traced_test]
async fn test_fetch_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/doi/10.1038/480426a"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);

    let err = client
        .fetch_metrics(&Identifier::doi("10.1038/480426a").unwrap())
        .await
        .expect_err("404 should be an error");

    match err {
        AltmetricError::NotFound { identifier } => {
            assert_eq!(identifier, "doi/10.1038/480426a");
        }
        other => panic!("Expected NotFound, got {:?}", other),
    }
}

/// Test that a server error with a JSON body still yields a result
#[tokio::test]
#[traced_test]
async fn test_fetch_server_error_still_parses() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/pmid/21761193"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(serde_json::json!({
                "title": "Partial",
                "score": 1.5
            })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);

    let result = client
        .fetch_metrics(&Identifier::pmid("21761193").unwrap())
        .await
        .expect("non-404 failures are only warnings");

    assert_eq!(result.title(), Some("Partial"));
    assert_eq!(result.score(), Some(1.5));
}

/// Test that a server error with a non-JSON body surfaces as a parse error
#[tokio::test]
#[traced_test]
async fn test_fetch_server_error_invalid_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/pmid/21761193"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);

    let err = client
        .fetch_metrics(&Identifier::pmid("21761193").unwrap())
        .await
        .unwrap_err();

    assert!(matches!(err, AltmetricError::JsonError(_)));
}

/// Test that request options reach the wire unchanged
#[tokio::test]
#[traced_test]
async fn test_fetch_with_request_options() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/arxiv/1108.2455"))
        .and(query_param("key", "per-call-key"))
        .and(query_param("include", "counts"))
        .and(header("x-request-id", "abc123"))
        .and(header("user-agent", "altmetric-client-tests/0.1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "arxiv_id": "1108.2455"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let options = RequestOptions::new()
        .with_api_key("per-call-key")
        .with_query_param("include", "counts")
        .with_header("X-Request-Id", "abc123")
        .with_timeout(Duration::from_secs(5));

    let result = client
        .fetch_metrics_with_options(&Identifier::arxiv("arXiv:1108.2455").unwrap(), &options)
        .await
        .expect("request with options should succeed");

    assert_eq!(
        result.get("arxiv_id"),
        Some(&MetricValue::from("1108.2455"))
    );
}

/// Test the named-slot surface end to end
#[tokio::test]
#[traced_test]
async fn test_fetch_query_single_slot() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/id/241939"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_article_response()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);

    let result = client
        .fetch_query(&IdentifierQuery::new().oid("241939"))
        .await
        .expect("single slot should be fetched");

    assert_eq!(result.altmetric_id(), Some(241939));
}

/// Test that conflicting slots never reach the network
#[tokio::test]
#[traced_test]
async fn test_fetch_query_conflict_makes_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_article_response()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);

    let err = client
        .fetch_query(&IdentifierQuery::new().doi("10.1038/480426a").pmid("22193074"))
        .await
        .unwrap_err();
    assert!(matches!(err, AltmetricError::MultipleIdentifiers { count: 2 }));

    let err = client.fetch_query(&IdentifierQuery::new()).await.unwrap_err();
    assert!(matches!(err, AltmetricError::NoIdentifier));
}

/// Test that a tagged object path goes to its own endpoint
#[tokio::test]
#[traced_test]
async fn test_fetch_query_object_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/doi/10.1038/480426a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_article_response()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);

    let result = client
        .fetch_query(&IdentifierQuery::new().oid("doi/10.1038/480426a"))
        .await
        .expect("tagged object path should be fetched");

    assert_eq!(result.doi(), Some("10.1038/480426a"));
}

/// Test that an unsupported tag in an object path never reaches the network
#[tokio::test]
#[traced_test]
async fn test_fetch_query_unknown_tag_makes_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_article_response()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);

    let err = client
        .fetch_query(&IdentifierQuery::new().oid("pmc/PMC3159876"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AltmetricError::UnknownIdentifierType { ref tag } if tag == "pmc"
    ));
    assert!(err.is_usage_error());
}

/// Test that the blocking wrapper refuses to run inside an async runtime
#[tokio::test]
async fn test_fetch_metrics_blocking_inside_runtime() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_article_response()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let err = client
        .fetch_metrics_blocking(&Identifier::doi("10.1038/480426a").unwrap())
        .unwrap_err();

    assert!(matches!(err, AltmetricError::IoError { .. }));
}

/// Test the blocking wrapper outside of any async runtime
#[test]
fn test_fetch_metrics_blocking() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let mock_server = runtime.block_on(MockServer::start());

    runtime.block_on(
        Mock::given(method("GET"))
            .and(path("/v1/uri/http%3A//example.com/paper"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "title": "Web paper"
            })))
            .expect(1)
            .mount(&mock_server),
    );

    let client = create_mock_client(&mock_server);
    let result = client
        .fetch_metrics_blocking(&Identifier::uri("http://example.com/paper").unwrap())
        .expect("blocking fetch should succeed");

    assert_eq!(result.title(), Some("Web paper"));
}
