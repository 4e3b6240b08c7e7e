use assist_core_proxy::{ProxyState, router};
use serde_json::{Value, json};
use std::sync::Arc;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Serve the proxy on an ephemeral port and return its base URL.
async fn spawn_proxy(backend_url: String) -> String {
    let app = router(Arc::new(ProxyState::new(backend_url)));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn test_check_forwards_form_and_passes_body_through() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/check"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("text=He+go+to+market."))
        .and(body_string_contains("language=en-US"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "matches": [{
                "offset": 3,
                "length": 2,
                "message": "Subject-verb agreement",
                "rule": { "id": "SVA" },
                "replacements": [{ "value": "goes" }],
            }],
        })))
        .expect(1)
        .mount(&backend)
        .await;

    let proxy = spawn_proxy(backend.uri()).await;
    let response = reqwest::Client::new()
        .post(format!("{proxy}/check"))
        .json(&json!({ "text": "He go to market." }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["matches"][0]["offset"], 3);
    assert_eq!(body["matches"][0]["replacements"][0]["value"], "goes");
}

#[tokio::test]
async fn test_check_forwards_explicit_language() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/check"))
        .and(body_string_contains("language=de-DE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "matches": [] })))
        .expect(1)
        .mount(&backend)
        .await;

    let proxy = spawn_proxy(backend.uri()).await;
    let response = reqwest::Client::new()
        .post(format!("{proxy}/check"))
        .json(&json!({ "text": "Guten Tag", "language": "de-DE" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_check_rejects_missing_or_empty_text() {
    let proxy = spawn_proxy("http://127.0.0.1:9".to_string()).await;
    let client = reqwest::Client::new();

    for body in [json!({}), json!({ "text": "" })] {
        let response = client
            .post(format!("{proxy}/check"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 400);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Missing text parameter");
    }
}

#[tokio::test]
async fn test_check_reports_unreachable_backend() {
    // Nothing listens on the discard port.
    let proxy = spawn_proxy("http://127.0.0.1:9".to_string()).await;
    let response = reqwest::Client::new()
        .post(format!("{proxy}/check"))
        .json(&json!({ "text": "some text" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Analysis backend unreachable");
}

#[tokio::test]
async fn test_check_reports_invalid_backend_json() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/check"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&backend)
        .await;

    let proxy = spawn_proxy(backend.uri()).await;
    let response = reqwest::Client::new()
        .post(format!("{proxy}/check"))
        .json(&json!({ "text": "some text" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Invalid response from analysis backend");
}
