//! Integration tests using wiremock to simulate HTTP servers.

use kofetch::{Client, Error, FaultKind, Interceptors, QueryParams, ResponseBody};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct TestData {
    id: u32,
    name: String,
}

fn client_for(server: &MockServer, interceptors: Interceptors) -> Client {
    Client::builder()
        .base_url(server.uri())
        .interceptors(interceptors)
        .build()
        .unwrap()
}

/// A base URL nothing is listening on.
fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

#[tokio::test]
async fn test_successful_get_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"a": 1})))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Interceptors::default());

    let value: Value = client.get("/test", None, None).await.unwrap();
    assert_eq!(value, json!({"a": 1}));
}

#[tokio::test]
async fn test_successful_post_request() {
    let mock_server = MockServer::start().await;

    let request_data = TestData {
        id: 0,
        name: "New".to_string(),
    };
    let response_data = TestData {
        id: 1,
        name: "New".to_string(),
    };

    Mock::given(method("POST"))
        .and(path("/test"))
        .and(body_json(&request_data))
        .respond_with(ResponseTemplate::new(201).set_body_json(&response_data))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Interceptors::default());

    let created: TestData = client.post("/test", &request_data, None).await.unwrap();
    assert_eq!(created, response_data);
}

#[tokio::test]
async fn test_http_error_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "x"})))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Interceptors::default());

    let result = client.get::<Value>("/missing", None, None).await;

    match result {
        Err(Error::Http(err)) => {
            assert_eq!(err.status_code, 404);
            assert_eq!(err.name, "Response failed: 404");
            assert_eq!(err.message, "Not Found");
            assert_eq!(err.response_body, ResponseBody::Json(json!({"error": "x"})));
            assert_eq!(err.request_url, format!("{}/missing", mock_server.uri()));
            assert!(err
                .request_headers
                .get("content-type")
                .unwrap()
                .to_str()
                .unwrap()
                .contains("application/json"));
        }
        other => panic!("Expected Http error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_http_error_plain_text_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/validate"))
        .respond_with(ResponseTemplate::new(400).set_body_raw("bad input", "text/plain"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Interceptors::default());

    let err = client
        .post::<_, Value>("/validate", &json!({"field": 1}), None)
        .await
        .unwrap_err();

    let normalized = err.normalized().expect("Expected Http error");
    assert_eq!(normalized.status_code, 400);
    assert_eq!(
        normalized.response_body,
        ResponseBody::Text("bad input".to_string())
    );
}

#[tokio::test]
async fn test_response_fail_hook_resolves_call() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Server error"))
        .mount(&mock_server)
        .await;

    let interceptors = Interceptors::builder()
        .on_response_fail(|_err| async { Ok(json!("fallback")) })
        .build();
    let client = client_for(&mock_server, interceptors);

    let value: String = client.get("/broken", None, None).await.unwrap();
    assert_eq!(value, "fallback");
}

#[tokio::test]
async fn test_response_fail_hook_can_reraise() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/locked"))
        .respond_with(ResponseTemplate::new(423).set_body_string("locked"))
        .mount(&mock_server)
        .await;

    let seen = Arc::new(AtomicUsize::new(0));
    let seen_clone = seen.clone();
    let interceptors = Interceptors::builder()
        .on_response_fail(move |err| {
            seen_clone.fetch_add(1, Ordering::SeqCst);
            async move { Err(Error::from(err)) }
        })
        .build();
    let client = client_for(&mock_server, interceptors);

    let err = client.delete::<Value>("/locked", None).await.unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(423));
    assert_eq!(seen.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_transport_fault_only_runs_request_fail_hook() {
    let request_fail = Arc::new(AtomicUsize::new(0));
    let response_fail = Arc::new(AtomicUsize::new(0));
    let request_fail_clone = request_fail.clone();
    let response_fail_clone = response_fail.clone();

    let interceptors = Interceptors::builder()
        .on_request_fail(move |fault| {
            request_fail_clone.fetch_add(1, Ordering::SeqCst);
            async move { Ok(json!({ "offline": fault.kind() == FaultKind::Connect })) }
        })
        .on_response_fail(move |_err| {
            response_fail_clone.fetch_add(1, Ordering::SeqCst);
            async { Ok(json!("fallback")) }
        })
        .build();

    let client = Client::builder()
        .base_url(closed_port_url())
        .interceptors(interceptors)
        .build()
        .unwrap();

    let value: Value = client.get("/anything", None, None).await.unwrap();

    assert_eq!(value, json!({"offline": true}));
    assert_eq!(request_fail.load(Ordering::SeqCst), 1);
    assert_eq!(response_fail.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_transport_fault_without_hook_propagates() {
    let client = Client::builder()
        .base_url(closed_port_url())
        .build()
        .unwrap();

    let err = client.get::<Value>("/anything", None, None).await.unwrap_err();

    match err {
        Error::Transport(fault) => assert_eq!(fault.kind(), FaultKind::Connect),
        other => panic!("Expected Transport error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_base_url_is_invalid_request() {
    let client = Client::builder().build().unwrap();

    let err = client.get::<Value>("/relative", None, None).await.unwrap_err();

    assert_eq!(
        err.transport_fault().map(|f| f.kind()),
        Some(FaultKind::InvalidRequest)
    );
    assert!(err.status().is_none());
}

#[tokio::test]
async fn test_success_hook_receives_parsed_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/wrapped"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": {"id": 7, "name": "Seven"}})),
        )
        .mount(&mock_server)
        .await;

    let interceptors = Interceptors::builder()
        .on_success(|body| async move {
            tokio::time::sleep(Duration::from_millis(5)).await;
            Ok(body["data"].clone())
        })
        .build();
    let client = client_for(&mock_server, interceptors);

    let data: TestData = client.get("/wrapped", None, None).await.unwrap();
    assert_eq!(
        data,
        TestData {
            id: 7,
            name: "Seven".to_string()
        }
    );
}

#[tokio::test]
async fn test_success_hook_not_run_on_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/test"))
        .respond_with(ResponseTemplate::new(503).set_body_string("down"))
        .mount(&mock_server)
        .await;

    let success = Arc::new(AtomicUsize::new(0));
    let success_clone = success.clone();
    let interceptors = Interceptors::builder()
        .on_success(move |body| {
            success_clone.fetch_add(1, Ordering::SeqCst);
            async move { Ok(body) }
        })
        .build();
    let client = client_for(&mock_server, interceptors);

    let result = client.get::<Value>("/test", None, None).await;
    assert!(matches!(result, Err(Error::Http(_))));
    assert_eq!(success.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_deserialization_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/test"))
        .respond_with(ResponseTemplate::new(200).set_body_string("invalid json"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Interceptors::default());

    let result = client.get::<Value>("/test", None, None).await;

    match result {
        Err(Error::DeserializationFailed {
            raw_response,
            serde_error,
            status,
        }) => {
            assert_eq!(status.as_u16(), 200);
            assert_eq!(raw_response, "invalid json");
            assert!(serde_error.contains("expected"));
        }
        _ => panic!("Expected DeserializationFailed, got {:?}", result),
    }
}

#[tokio::test]
async fn test_default_headers_and_overrides() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/test"))
        .and(header("x-api-key", "secret"))
        .and(header("x-trace", "per-call"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .base_url(mock_server.uri())
        .default_header("X-Api-Key", "secret")
        .unwrap()
        .default_header("X-Trace", "default")
        .unwrap()
        .build()
        .unwrap();

    let mut overrides = http::HeaderMap::new();
    overrides.insert("x-trace", http::HeaderValue::from_static("per-call"));

    let _: Value = client.get("/test", None, Some(&overrides)).await.unwrap();
}

#[tokio::test]
async fn test_before_request_replaces_headers_on_the_wire() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&mock_server)
        .await;

    let interceptors = Interceptors::builder()
        .before_request(|merged| {
            assert_eq!(merged.get("a").unwrap(), "1");
            assert_eq!(merged.get("x-override").unwrap(), "0");
            let mut headers = http::HeaderMap::new();
            headers.insert("x-override", http::HeaderValue::from_static("1"));
            headers
        })
        .build();

    let client = Client::builder()
        .base_url(mock_server.uri())
        .default_header("A", "1")
        .unwrap()
        .default_header("X-Override", "0")
        .unwrap()
        .interceptors(interceptors)
        .build()
        .unwrap();

    let _: Value = client.get("/test", None, None).await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let headers = &requests[0].headers;
    assert!(headers.get("a").is_none());
    assert_eq!(headers.get("x-override").unwrap(), "1");
}

#[tokio::test]
async fn test_query_parameters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "rust lang"))
        .and(query_param("page", "2"))
        .and(query_param("exact", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([1, 2, 3])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Interceptors::default());

    let params = QueryParams::new()
        .with("q", "rust lang")
        .with("page", 2)
        .with("exact", true);

    let results: Vec<u32> = client.get("/search", Some(&params), None).await.unwrap();
    assert_eq!(results, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_all_http_methods() {
    let mock_server = MockServer::start().await;

    let response_data = TestData {
        id: 1,
        name: "Test".to_string(),
    };

    for verb in ["GET", "POST", "PUT", "PATCH", "DELETE"] {
        Mock::given(method(verb))
            .and(path("/test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_data))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let client = client_for(&mock_server, Interceptors::default());

    let got: TestData = client.get("/test", None, None).await.unwrap();
    assert_eq!(got, response_data);

    let got: TestData = client.post("/test", &response_data, None).await.unwrap();
    assert_eq!(got, response_data);

    let got: TestData = client.put("/test", &response_data, None).await.unwrap();
    assert_eq!(got, response_data);

    let got: TestData = client.patch("/test", &response_data, None).await.unwrap();
    assert_eq!(got, response_data);

    let got: TestData = client.delete("/test", None).await.unwrap();
    assert_eq!(got, response_data);
}

#[tokio::test]
async fn test_empty_success_body_is_deserialization_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/test"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Interceptors::default());

    match client.delete::<Value>("/test", None).await {
        Err(Error::DeserializationFailed { status, .. }) => {
            assert_eq!(status.as_u16(), 204);
        }
        Ok(_) => panic!("Unexpected success for empty DELETE response"),
        Err(e) => panic!("Unexpected error: {:?}", e),
    }
}

#[tokio::test]
async fn test_concurrent_calls_share_client() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(8)
        .mount(&mock_server)
        .await;

    let hits = Arc::new(AtomicUsize::new(0));
    let hits_clone = hits.clone();
    let interceptors = Interceptors::builder()
        .on_success(move |body| {
            hits_clone.fetch_add(1, Ordering::SeqCst);
            async move { Ok(body) }
        })
        .build();
    let client = client_for(&mock_server, interceptors);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let client = client.clone();
            tokio::spawn(async move { client.get::<Value>("/test", None, None).await })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), json!({"ok": true}));
    }
    assert_eq!(hits.load(Ordering::SeqCst), 8);
}
