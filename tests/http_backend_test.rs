//! Wiremock integration tests for [`HttpAdviceBackend`].

use std::time::Duration;

use krishi_sakha::{AdviceBackend, HttpAdviceBackend, SakhaError};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn advice_json() -> serde_json::Value {
    serde_json::json!({
        "advice": "Apply 50 kg urea per acre in three splits.",
        "explanation": "Split doses reduce nitrogen loss.",
        "sources": ["ICAR package of practices"]
    })
}

#[tokio::test]
async fn posts_query_and_parses_advice() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/advice"))
        .and(body_json(serde_json::json!({
            "query": "धान में कौन सा उर्वरक डालें?",
            "language": "hi"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(advice_json()))
        .expect(1)
        .mount(&server)
        .await;

    let backend = HttpAdviceBackend::new(server.uri()).unwrap();
    let advice = backend
        .generate_advice("धान में कौन सा उर्वरक डालें?", "hi")
        .await
        .expect("request should succeed");

    assert_eq!(advice.advice, "Apply 50 kg urea per acre in three splits.");
    assert_eq!(advice.explanation, "Split doses reduce nitrogen loss.");
    assert_eq!(advice.sources, vec!["ICAR package of practices".to_string()]);
}

#[tokio::test]
async fn sends_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/advice"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(advice_json()))
        .expect(1)
        .mount(&server)
        .await;

    let backend = HttpAdviceBackend::new(server.uri())
        .unwrap()
        .api_key("test-key");
    assert!(backend.generate_advice("q", "en").await.is_ok());
}

#[tokio::test]
async fn trailing_slash_in_base_url_is_ignored() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/advice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(advice_json()))
        .expect(1)
        .mount(&server)
        .await;

    let backend = HttpAdviceBackend::new(format!("{}/", server.uri())).unwrap();
    assert_eq!(backend.base_url(), server.uri());
    assert!(backend.generate_advice("q", "en").await.is_ok());
}

#[tokio::test]
async fn missing_sources_defaults_to_empty() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/advice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "advice": "Irrigate every 4-5 days.",
            "explanation": ""
        })))
        .mount(&server)
        .await;

    let backend = HttpAdviceBackend::new(server.uri()).unwrap();
    let advice = backend.generate_advice("q", "en").await.unwrap();
    assert!(advice.sources.is_empty());
}

// ============================================================================
// Error classification
// ============================================================================

async fn error_for_status(status: u16) -> SakhaError {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/advice"))
        .respond_with(ResponseTemplate::new(status))
        .mount(&server)
        .await;

    HttpAdviceBackend::new(server.uri())
        .unwrap()
        .generate_advice("q", "en")
        .await
        .unwrap_err()
}

#[tokio::test]
async fn server_errors_are_transient() {
    let err = error_for_status(503).await;
    assert!(matches!(err, SakhaError::Api { status: 503, .. }));
    assert!(err.is_transient());

    let err = error_for_status(429).await;
    assert!(matches!(err, SakhaError::Api { status: 429, .. }));
    assert!(err.is_transient());
}

#[tokio::test]
async fn client_errors_are_not_transient() {
    let err = error_for_status(400).await;
    assert!(matches!(err, SakhaError::Api { status: 400, .. }));
    assert!(!err.is_transient());

    let err = error_for_status(401).await;
    assert!(err.to_string().contains("credentials"));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn empty_advice_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/advice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "advice": "   ",
            "explanation": "nothing"
        })))
        .mount(&server)
        .await;

    let err = HttpAdviceBackend::new(server.uri())
        .unwrap()
        .generate_advice("q", "en")
        .await
        .unwrap_err();
    assert!(matches!(err, SakhaError::InvalidResponse(_)));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn malformed_body_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/advice"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = HttpAdviceBackend::new(server.uri())
        .unwrap()
        .generate_advice("q", "en")
        .await
        .unwrap_err();
    assert!(matches!(err, SakhaError::InvalidResponse(_)));
    assert!(err.to_string().contains("malformed"));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn body_missing_required_fields_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/advice"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "answer": "wrong shape" })),
        )
        .mount(&server)
        .await;

    let err = HttpAdviceBackend::new(server.uri())
        .unwrap()
        .generate_advice("q", "en")
        .await
        .unwrap_err();
    assert!(matches!(err, SakhaError::InvalidResponse(_)));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn unreachable_endpoint_is_transient() {
    // Nothing listens on the discard port.
    let backend = HttpAdviceBackend::with_timeout("http://127.0.0.1:9", Duration::from_secs(2))
        .unwrap();
    let err = backend.generate_advice("q", "en").await.unwrap_err();
    assert!(matches!(err, SakhaError::Http(_)));
    assert!(err.is_transient());
}

#[tokio::test]
async fn slow_endpoint_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/advice"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(advice_json())
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let backend = HttpAdviceBackend::with_timeout(server.uri(), Duration::from_millis(200)).unwrap();
    let err = backend.generate_advice("q", "en").await.unwrap_err();
    assert!(err.is_transient());
}

#[test]
fn backend_name() {
    let backend = HttpAdviceBackend::new("http://localhost").unwrap();
    assert_eq!(backend.name(), "http");
}
