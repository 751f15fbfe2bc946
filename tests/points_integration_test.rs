use piwebapi_client::{NoAuth, PiWebApiClient, PiWebApiError, PiWebApiResult};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper to create a test client rooted at `/piwebapi` on the mock server
fn create_test_client(server: &MockServer) -> PiWebApiResult<PiWebApiClient> {
    PiWebApiClient::new(format!("{}/piwebapi", server.uri()), NoAuth)
}

/// Test searching a single tag
#[tokio::test]
async fn test_search_sinusoid() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/piwebapi/search/query"))
        .and(query_param("q", "name:sinusoid"))
        .and(query_param("count", "10"))
        .and(query_param("scope", "*"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "TotalHits": 1,
            "Items": [
                {"Name": "sinusoid", "WebID": "abc123", "UniqueID": "u1", "DataType": "Float32"}
            ],
            "Errors": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server).expect("Failed to create client");
    let points = client.points().find("name:sinusoid").await
        .expect("Failed to search points");

    assert_eq!(points.len(), 1);
    assert_eq!(points[0].name, "sinusoid");
    assert_eq!(points[0].web_id, "abc123");
    assert_eq!(points[0].data_type, "Float32");
    assert!(points[0].current.is_none(), "Search results carry no values");
}

/// Count and scope are passed through
#[tokio::test]
async fn test_search_with_scope_and_count() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/piwebapi/search/query"))
        .and(query_param("q", "name:cd*"))
        .and(query_param("count", "100"))
        .and(query_param("scope", "pi:PISRV01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Items": [
                {"Name": "cdt158", "WebID": "w1", "UniqueID": "u1", "DataType": "Float32"},
                {"Name": "cdm158", "WebID": "w2", "UniqueID": "u2", "DataType": "Digital", "Description": "Batch state"}
            ],
            "Errors": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server).expect("Failed to create client");
    let points = client.points().search("name:cd*", 100, "pi:PISRV01").await
        .expect("Failed to search points");

    let names: Vec<_> = points.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["cdt158", "cdm158"]);
    assert_eq!(points[1].description.as_deref(), Some("Batch state"));
}

/// Upstream errors alongside hits are logged, hits are still returned
#[tokio::test]
async fn test_search_partial_errors_keep_points() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/piwebapi/search/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Items": [
                {"Name": "sinusoid", "WebID": "abc123", "UniqueID": "u1", "DataType": "Float32"},
                {"Name": "no-webid", "UniqueID": "u2", "DataType": "Float32"}
            ],
            "Errors": [
                {"ErrorCode": -10722, "Source": "PISRV02", "Message": "Server is unavailable."}
            ]
        })))
        .mount(&server)
        .await;

    let client = create_test_client(&server).expect("Failed to create client");
    let points = client.points().find("name:sinusoid").await
        .expect("Failed to search points");

    assert_eq!(points.len(), 1);
    assert_eq!(points[0].name, "sinusoid");
}

/// Errors with no hits fail the search
#[tokio::test]
async fn test_search_errors_without_hits() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/piwebapi/search/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Items": [],
            "Errors": [
                {"ErrorCode": -1, "Source": "Search", "Message": "Query parameter must be specified."}
            ]
        })))
        .mount(&server)
        .await;

    let client = create_test_client(&server).expect("Failed to create client");
    let err = client.points().find("").await.unwrap_err();

    match err {
        PiWebApiError::Upstream(errors) => {
            assert_eq!(errors.len(), 1);
            assert!(errors[0].message.as_deref().unwrap_or_default().contains("Query parameter"));
        }
        other => panic!("Expected upstream error, got {:?}", other),
    }
}

/// No hits and no errors is simply an empty result
#[tokio::test]
async fn test_search_no_hits() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/piwebapi/search/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Items": [], "Errors": []})))
        .mount(&server)
        .await;

    let client = create_test_client(&server).expect("Failed to create client");
    let points = client.points().find("name:nothing").await
        .expect("Failed to search points");

    assert!(points.is_empty());
}
