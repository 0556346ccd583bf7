use std::sync::Arc;
use std::time::Duration;

use kahuna_engine::{
    ApiError, ApiSettings, EngineEvent, EngineHandle, MediaApi, ReqwestMediaApi, SearchOptions,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn image(uri: &str, upload_time: &str) -> serde_json::Value {
    json!({
        "uri": uri,
        "data": { "uploadTime": upload_time, "description": "a cat" },
        "secureUrl": format!("{uri}/thumb"),
    })
}

fn api_for(server: &MockServer) -> ReqwestMediaApi {
    ReqwestMediaApi::new(ApiSettings::new(format!("{}/api", server.uri()))).expect("api client")
}

#[tokio::test]
async fn search_sends_bounds_and_parses_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/images"))
        .and(query_param("q", "cat"))
        .and(query_param("since", "2014-01-01T00:00:00Z"))
        .and(query_param("until", "2014-05-01T10:00:00Z"))
        .and(query_param("length", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                image("http://api/images/a", "2014-05-01T09:00:00Z"),
                image("http://api/images/b", "2014-05-01T08:00:00Z"),
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let options = SearchOptions {
        since: Some("2014-01-01T00:00:00Z".to_string()),
        until: Some("2014-05-01T10:00:00Z".to_string()),
        ..SearchOptions::default()
    };
    let images = api_for(&server).search("cat", &options).await.expect("search ok");

    assert_eq!(images.len(), 2);
    assert_eq!(images[0].uri, "http://api/images/a");
    assert_eq!(images[0].upload_time, "2014-05-01T09:00:00Z");
    assert_eq!(images[1].raw["data"]["description"], "a cat");
    assert_eq!(images[1].raw["secureUrl"], "http://api/images/b/thumb");
}

#[tokio::test]
async fn search_omits_unset_bounds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/images"))
        .and(query_param("q", ""))
        .and(query_param("length", "5"))
        .and(query_param_is_missing("since"))
        .and(query_param_is_missing("until"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let options = SearchOptions {
        page_size: 5,
        ..SearchOptions::default()
    };
    let images = api_for(&server).search("", &options).await.expect("search ok");
    assert!(images.is_empty());
}

#[test]
fn urls_keep_base_path_and_escape_ids() {
    let api = ReqwestMediaApi::new(ApiSettings::new("https://media.example.org/v1/")).unwrap();

    let url = api.search_url("big cat", &SearchOptions::default());
    assert_eq!(
        url.as_str(),
        "https://media.example.org/v1/images?q=big+cat&length=20"
    );
    assert_eq!(
        api.find_url("a/b").as_str(),
        "https://media.example.org/v1/images/a%2Fb"
    );
}

#[test]
fn rejects_invalid_base_uri() {
    let err = ReqwestMediaApi::new(ApiSettings::new("not a url")).unwrap_err();
    assert!(matches!(err, ApiError::InvalidBaseUri { .. }));
}

#[tokio::test]
async fn search_surfaces_non_success_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/images"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = api_for(&server)
        .search("cat", &SearchOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::Status { status: 500 });
}

#[tokio::test]
async fn search_rejects_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/images"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "uri": "http://api/images/a" }]
        })))
        .mount(&server)
        .await;

    let err = api_for(&server)
        .search("cat", &SearchOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Decode { status: 200, .. }));
}

#[tokio::test]
async fn find_returns_detail_and_maps_404() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/images/abc"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(image("http://api/images/abc", "2014-05-01T09:00:00Z")),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/images/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let api = api_for(&server);
    let found = api.find("abc").await.expect("find ok");
    assert_eq!(found.uri, "http://api/images/abc");

    let err = api.find("gone").await.unwrap_err();
    assert_eq!(
        err,
        ApiError::NotFound {
            id: "gone".to_string()
        }
    );
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/images"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(json!({ "data": [] })),
        )
        .mount(&server)
        .await;

    let settings = ApiSettings {
        request_timeout: Duration::from_millis(50),
        ..ApiSettings::new(format!("{}/api", server.uri()))
    };
    let api = ReqwestMediaApi::new(settings).unwrap();
    let err = api
        .search("cat", &SearchOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Timeout(_)));
}

#[tokio::test]
async fn oversized_response_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/images"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"data\": []}          "))
        .mount(&server)
        .await;

    let settings = ApiSettings {
        max_bytes: 10,
        ..ApiSettings::new(format!("{}/api", server.uri()))
    };
    let api = ReqwestMediaApi::new(settings).unwrap();
    let err = api
        .search("cat", &SearchOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::TooLarge { max_bytes: 10, .. }));
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    // Bind then release a port so nothing is listening on it.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}/api", listener.local_addr().unwrap());
    drop(listener);

    let api = ReqwestMediaApi::new(ApiSettings::new(base)).unwrap();
    let err = api
        .search("cat", &SearchOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Network(_) | ApiError::Timeout(_)));
}

#[tokio::test]
async fn engine_reports_completions_with_their_ticket() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/images"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [image("http://api/images/a", "2014-05-01T09:00:00Z")]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/images/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let api: Arc<dyn MediaApi> = Arc::new(api_for(&server));
    let engine = EngineHandle::new(api).expect("engine");
    engine.search(7, "cat", SearchOptions::default());
    engine.find(8, "missing");

    let events = tokio::task::spawn_blocking(move || {
        let mut events = Vec::new();
        while events.len() < 2 {
            match engine.recv_timeout(Duration::from_secs(5)) {
                Some(event) => events.push(event),
                None => break,
            }
        }
        events
    })
    .await
    .unwrap();

    assert_eq!(events.len(), 2);
    for event in events {
        match event {
            EngineEvent::SearchCompleted { ticket, result } => {
                assert_eq!(ticket, 7);
                assert_eq!(result.unwrap()[0].uri, "http://api/images/a");
            }
            EngineEvent::FindCompleted { ticket, result } => {
                assert_eq!(ticket, 8);
                assert!(matches!(result, Err(ApiError::NotFound { .. })));
            }
        }
    }
}
