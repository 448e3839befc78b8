//! `EngineClient` against a local `tiny_http` stand-in for the engine service.

use std::collections::BTreeMap;
use std::io::Read;
use std::thread::JoinHandle;
use std::time::Duration;

use cafe_core::entities::ClassificationQuery;
use cafe_core::enums::AnalysisMethod;
use cafe_engine::{ClassificationEngine, EngineClient, EngineError};
use pretty_assertions::assert_eq;

struct Recorded {
    method: String,
    url: String,
    body: serde_json::Value,
}

/// Serve exactly one request with the given status and JSON body.
fn serve_once(status: u16, body: &'static str) -> (String, JoinHandle<Recorded>) {
    let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let handle = std::thread::spawn(move || {
        let mut request = server.recv().unwrap();
        let mut raw = String::new();
        request.as_reader().read_to_string(&mut raw).unwrap();
        let recorded = Recorded {
            method: request.method().to_string(),
            url: request.url().to_string(),
            body: serde_json::from_str(&raw).unwrap(),
        };
        let response = tiny_http::Response::from_string(body)
            .with_status_code(status)
            .with_header(
                tiny_http::Header::from_bytes("Content-Type", "application/json").unwrap(),
            );
        request.respond(response).unwrap();
        recorded
    });
    (format!("http://{addr}"), handle)
}

fn query() -> ClassificationQuery {
    ClassificationQuery {
        numeric: BTreeMap::from([(1, 9.0)]),
        categorical: BTreeMap::from([(2, "Brazil".to_string())]),
    }
}

fn client(base_url: &str) -> EngineClient {
    EngineClient::new(base_url, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn static_analysis_posts_wrapped_query() {
    let (base_url, server) = serve_once(
        200,
        r#"{"type":"Arabica","explanations":["acidity 9 outside 3-8"],"all_types_analysis":{"Arabica":{"matched":1}}}"#,
    );

    let response = client(&base_url).analyze_static(&query()).await.unwrap();
    assert_eq!(response.coffee_type.as_deref(), Some("Arabica"));
    assert_eq!(response.explanations, vec!["acidity 9 outside 3-8".to_string()]);
    assert!(response.all_types_analysis.unwrap().contains_key("Arabica"));
    assert!(response.probabilities.is_none());

    let recorded = server.join().unwrap();
    assert_eq!(recorded.method, "POST");
    assert_eq!(recorded.url, "/specialist/analyze-static");
    assert_eq!(
        recorded.body,
        serde_json::json!({
            "characteristics": {"numeric": {"1": 9.0}, "categorical": {"2": "Brazil"}}
        })
    );
}

#[tokio::test]
async fn ml_analysis_returns_probabilities() {
    let (base_url, server) = serve_once(
        200,
        r#"{"type":"Robusta","explanations":[],"probabilities":{"Arabica":0.25,"Robusta":0.75}}"#,
    );

    let response = client(&base_url)
        .analyze(AnalysisMethod::Ml, &query())
        .await
        .unwrap();
    assert_eq!(response.coffee_type.as_deref(), Some("Robusta"));
    assert_eq!(
        response.probabilities,
        Some(BTreeMap::from([
            ("Arabica".to_string(), 0.25),
            ("Robusta".to_string(), 0.75)
        ]))
    );

    assert_eq!(server.join().unwrap().url, "/specialist/analyze-ml");
}

#[tokio::test]
async fn server_error_surfaces_engine_message() {
    let (base_url, server) = serve_once(500, r#"{"error":"model not trained"}"#);

    let err = client(&base_url).analyze_ml(&query()).await.unwrap_err();
    match err {
        EngineError::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "model not trained");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
    server.join().unwrap();
}

#[tokio::test]
async fn error_payload_with_success_status_is_remote_error() {
    let (base_url, server) = serve_once(200, r#"{"error":"no coffee types defined"}"#);

    let err = client(&base_url).analyze_static(&query()).await.unwrap_err();
    assert!(matches!(err, EngineError::Remote(ref m) if m == "no coffee types defined"));
    server.join().unwrap();
}

#[tokio::test]
async fn unparsable_body_is_parse_error() {
    let (base_url, server) = serve_once(200, r#"{"explanations":"not a list"}"#);

    let err = client(&base_url).analyze_static(&query()).await.unwrap_err();
    assert!(matches!(err, EngineError::Parse(_)));
    server.join().unwrap();
}
