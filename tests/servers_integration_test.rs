use piwebapi_client::{
    BasicAuth, ClientConfig, Logger, NegotiateAuth, NoAuth, PiWebApiClient, PiWebApiError, PiWebApiResult,
};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper to create a test client rooted at `/piwebapi` on the mock server
fn create_test_client(server: &MockServer) -> PiWebApiResult<PiWebApiClient> {
    PiWebApiClient::new(
        format!("{}/piwebapi", server.uri()),
        BasicAuth::new("admin", "admin")
    )
}

fn dataservers_body() -> serde_json::Value {
    json!({
        "Links": {},
        "Items": [
            {
                "WebId": "F1DSmN8",
                "Id": "1b7bd3ad-3e1a-4f6b-8a6f-7b9d5a3c0c01",
                "Name": "PISRV01",
                "Path": "\\\\PISRV01",
                "IsConnected": true,
                "ServerVersion": "3.4.420.1182"
            },
            {
                "WebId": "F1DSxQ2",
                "Id": "8f3c1e0a-2d4b-4c5e-9f6a-7b8c9d0e1f02",
                "Name": "PISRV02",
                "IsConnected": false,
                "ServerVersion": "3.4.440.477"
            }
        ]
    })
}

/// Test listing data servers
#[tokio::test]
async fn test_list_data_servers() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/piwebapi/dataservers"))
        .and(header("authorization", "Basic YWRtaW46YWRtaW4="))
        .respond_with(ResponseTemplate::new(200).set_body_json(dataservers_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server).expect("Failed to create client");
    let servers = client.data_servers().list().await
        .expect("Failed to list data servers");

    assert_eq!(servers.len(), 2);
    assert_eq!(servers[0].name, "PISRV01");
    assert_eq!(servers[0].web_id, "F1DSmN8");
    assert!(servers[0].is_connected);
    assert!(!servers[1].is_connected);
}

/// One malformed server record does not hide the others
#[tokio::test]
async fn test_list_data_servers_skips_bad_record() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;

    let mut body = dataservers_body();
    body["Items"].as_array_mut().unwrap().insert(1, json!({"Name": "PISRV-BROKEN"}));

    Mock::given(method("GET"))
        .and(path("/piwebapi/dataservers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let client = create_test_client(&server).expect("Failed to create client");
    let servers = client.data_servers().list().await
        .expect("Failed to list data servers");

    let names: Vec<_> = servers.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["PISRV01", "PISRV02"]);
}

/// Test finding a data server by name
#[tokio::test]
async fn test_get_data_server_by_name() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/piwebapi/dataservers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(dataservers_body()))
        .mount(&server)
        .await;

    let client = create_test_client(&server).expect("Failed to create client");

    let found = client.data_servers().get_by_name("PISRV02").await
        .expect("Failed to search data servers");
    assert_eq!(found.map(|s| s.web_id), Some("F1DSxQ2".to_string()));

    let missing = client.data_servers().get_by_name("NOPE").await
        .expect("Failed to search data servers");
    assert!(missing.is_none());
}

/// HTTP status errors map onto typed errors
#[tokio::test]
async fn test_status_errors_are_typed() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/piwebapi/dataservers"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "Errors": ["Authorization has been denied for this request."]
        })))
        .mount(&server)
        .await;

    let client = create_test_client(&server).expect("Failed to create client");
    let err = client.data_servers().list().await.unwrap_err();

    match err {
        PiWebApiError::Auth(message) => assert!(message.contains("denied")),
        other => panic!("Expected auth error, got {:?}", other),
    }

    let err = PiWebApiClient::new(format!("{}/elsewhere", server.uri()), NoAuth)
        .unwrap()
        .data_servers()
        .list()
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(404));
}

/// Test the root document links
#[tokio::test]
async fn test_home_links() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;
    let base = format!("{}/piwebapi", server.uri());

    Mock::given(method("GET"))
        .and(path("/piwebapi/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Links": {
                "Self": format!("{}/", base),
                "DataServers": format!("{}/dataservers", base),
                "Search": format!("{}/search", base)
            }
        })))
        .mount(&server)
        .await;

    let client = create_test_client(&server).expect("Failed to create client");
    let home = client.home().get().await.expect("Failed to get root document");

    assert_eq!(home.link("Self"), Some(format!("{}/", base).as_str()));
    assert_eq!(home.link("Search"), Some(format!("{}/search", base).as_str()));
}

/// Any HTTP answer counts as reachable
#[tokio::test]
async fn test_connectivity_ignores_status() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = create_test_client(&server).expect("Failed to create client");
    assert!(client.is_reachable().await);
}

/// Transport failures are reported as unreachable, not as errors
#[tokio::test]
async fn test_connectivity_transport_failure() {
    let _ = env_logger::try_init();

    let config = ClientConfig::new("http://127.0.0.1:1/piwebapi").basic_auth("admin", "admin");
    let client = PiWebApiClient::connect(&config, Logger::global()).await
        .expect("Client should be built even when unreachable");

    assert!(!client.is_reachable().await);
}

/// Unknown auth scheme names fall back to basic credentials
#[tokio::test]
async fn test_config_unknown_scheme_uses_basic() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/piwebapi/dataservers"))
        .and(header("authorization", "Basic YWRtaW46YWRtaW4="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Items": []})))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = ClientConfig::new(format!("{}/piwebapi", server.uri()));
    config.auth_type = "digest".to_string();
    config.username = Some("admin".to_string());
    config.password = Some("admin".to_string());

    let client = PiWebApiClient::from_config(&config).expect("Failed to create client");
    let servers = client.data_servers().list().await.expect("Failed to list data servers");
    assert!(servers.is_empty());
}

/// The default kerberos config without a token fails before any request goes out
#[tokio::test]
async fn test_config_default_kerberos_without_token_fails_locally() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/piwebapi/dataservers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Items": []})))
        .expect(0)
        .mount(&server)
        .await;

    let config = ClientConfig::new(format!("{}/piwebapi", server.uri()));
    assert_eq!(config.auth_type, "kerberos");

    let client = PiWebApiClient::from_config(&config).expect("Failed to create client");
    let result = client.data_servers().list().await;

    match result {
        Err(PiWebApiError::Auth(msg)) => assert!(msg.contains("no Negotiate token")),
        other => panic!("Expected Auth error, got {:?}", other),
    }
    let received = server.received_requests().await.unwrap_or_default();
    assert!(received.is_empty());
}

/// A supplied SPNEGO token is sent as a Negotiate authorization header
#[tokio::test]
async fn test_negotiate_token_sets_authorization_header() {
    let _ = env_logger::try_init();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/piwebapi/dataservers"))
        .and(header("authorization", "Negotiate tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Items": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = PiWebApiClient::new(
        format!("{}/piwebapi", server.uri()),
        NegotiateAuth::with_token("tok"),
    )
    .expect("Failed to create client");

    let servers = client.data_servers().list().await.expect("Failed to list data servers");
    assert!(servers.is_empty());
}
