use portal_api::types::{SearchResponse, SearchResult};
use portal_api::{Api, Config, Error, HttpTransport, Params, SearchQuery, Transport};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SEARCH_PATH: &str = "/api/3/action/datastore_search";

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

fn config_for(server: &MockServer) -> Config {
    Config::default().with_base_url(&format!("{}/api/3", server.uri()))
}

#[test]
fn deserialize_search_fixture() {
    let resp: SearchResponse =
        serde_json::from_str(&load_fixture("datastore_search.json")).unwrap();
    assert!(resp.success);
    let result: SearchResult = serde_json::from_value(resp.result.unwrap()).unwrap();
    assert_eq!(result.total, 2);
    let records = result.records.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["catalogNumber"], "BM000521570");
}

#[test]
fn deserialize_error_fixture() {
    let resp: SearchResponse =
        serde_json::from_str(&load_fixture("datastore_search_error.json")).unwrap();
    assert!(!resp.success);
    assert!(resp.result.is_none());
    assert!(resp.error.is_some());
}

#[tokio::test]
async fn records_over_http() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("resource_id", "05ff2255-c38a-40c9-b657-4ccb55ab2feb"))
        .and(query_param("offset", "0"))
        .and(query_param("limit", "1000"))
        .and(query_param("q", "banana"))
        .and(header("authorization", "secret-key"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(load_fixture("datastore_search.json")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = config_for(&mock_server).with_api_key("secret-key");
    let records = tokio::task::spawn_blocking(move || {
        let api = Api::from_config(&config).unwrap();
        let query = SearchQuery::new("05ff2255-c38a-40c9-b657-4ccb55ab2feb").with_query("banana");
        let mut results = api.records(&query).unwrap();
        results.all().collect::<Vec<_>>()
    })
    .await
    .unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["_id"], 1712345);
    assert_eq!(records[1]["catalogNumber"], "BM000521571");
}

#[tokio::test]
async fn assets_over_http() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("filters", r#"{"_has_image":true}"#))
        .and(query_param("fields", "associatedMedia"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(load_fixture("datastore_search.json")),
        )
        .mount(&mock_server)
        .await;

    let config = config_for(&mock_server);
    let assets = tokio::task::spawn_blocking(move || {
        let api = Api::from_config(&config).unwrap();
        let mut assets = api.assets(&SearchQuery::new("abc")).unwrap();
        assets.advance()
    })
    .await
    .unwrap()
    .unwrap();

    assert_eq!(assets.len(), 1);
    assert_eq!(assets[0].record_id, "1712345");
    assert_eq!(
        assets[0].preview_urls(),
        vec!["https://www.nhm.ac.uk/services/media-store/asset/\
              f6b4a2c1d3e5f7a9b8c6d4e2f0a1b3c5d7e9f1a3/contents/preview"]
    );
}

#[tokio::test]
async fn server_error_is_reported_by_transport() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let config = config_for(&mock_server);
    let (direct, paged) = tokio::task::spawn_blocking(move || {
        let transport = HttpTransport::new(&config).unwrap();
        let url = format!("{}/action/datastore_search", config.base_url);
        let direct = transport.get(&url, None, &Params::new().with("resource_id", "abc"));

        let api = Api::from_config(&config).unwrap();
        let mut results = api.records(&SearchQuery::new("abc")).unwrap();
        (direct, results.advance())
    })
    .await
    .unwrap();

    match direct {
        Err(Error::HttpStatus { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "Internal Server Error");
        }
        other => panic!("expected HttpStatus, got {:?}", other),
    }
    assert!(paged.is_none());
}

#[tokio::test]
async fn validation_error_ends_iteration() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(
            ResponseTemplate::new(409).set_body_string(load_fixture("datastore_search_error.json")),
        )
        .mount(&mock_server)
        .await;

    let config = config_for(&mock_server);
    let (page, count) = tokio::task::spawn_blocking(move || {
        let api = Api::from_config(&config).unwrap();
        let mut results = api.records(&SearchQuery::new("does-not-exist")).unwrap();
        (results.advance(), results.count())
    })
    .await
    .unwrap();

    assert!(page.is_none());
    assert_eq!(count, 0);
}

#[tokio::test]
async fn malformed_json_is_a_request_failure() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not valid json}"))
        .mount(&mock_server)
        .await;

    let config = config_for(&mock_server);
    let direct = tokio::task::spawn_blocking(move || {
        let transport = HttpTransport::new(&config).unwrap();
        let url = format!("{}/action/datastore_search", config.base_url);
        transport.get(&url, None, &Params::new())
    })
    .await
    .unwrap();

    assert!(matches!(direct, Err(Error::RequestFailed)));
}

#[tokio::test]
async fn count_over_http() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("offset", "0"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(load_fixture("datastore_search.json")),
        )
        .mount(&mock_server)
        .await;

    let config = config_for(&mock_server);
    let count = tokio::task::spawn_blocking(move || {
        let api = Api::from_config(&config).unwrap();
        api.records(&SearchQuery::new("abc")).unwrap().count()
    })
    .await
    .unwrap();

    assert_eq!(count, 2);
}
