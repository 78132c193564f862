//! API surface tests
//!
//! Exercise the router end to end. Nothing here leaves the machine;
//! handlers either fail validation first, hit an unavailable service, or
//! talk to a loopback stand-in for the hosted inference endpoint.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use metrics_exporter_prometheus::PrometheusBuilder;
use serde_json::Value;
use tomascan_server::{AppState, DiseaseConfig, LlmConfig, ServerConfig};
use tower::ServiceExt;

fn router_with(config: ServerConfig) -> Router {
    // A per-test recorder avoids fighting over the global one.
    let handle = PrometheusBuilder::new().build_recorder().handle();
    tomascan_server::create_router(AppState::new(config, handle))
}

fn bare_router() -> Router {
    router_with(ServerConfig::default())
}

fn configured_router() -> Router {
    router_with(ServerConfig {
        llm: LlmConfig {
            api_key: Some("gsk_test".to_string()),
            ..Default::default()
        },
        disease: DiseaseConfig {
            api_token: Some("hf_test".to_string()),
            ..Default::default()
        },
        ..Default::default()
    })
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_api_test_endpoint() {
    let response = bare_router()
        .oneshot(Request::get("/api/test").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "success");
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let response = bare_router()
        .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_degraded_without_credentials() {
    let response = bare_router()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["overall"], "degraded");
    assert_eq!(body["llm"]["status"], "unavailable");
    assert_eq!(body["disease"]["status"], "unavailable");
}

#[tokio::test]
async fn test_health_healthy_with_credentials() {
    let response = configured_router()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["overall"], "healthy");
}

#[tokio::test]
async fn test_chat_rejects_missing_or_blank_message() {
    for body in [r#"{}"#, r#"{"message": ""}"#, r#"{"message": "   "}"#] {
        let response = configured_router()
            .oneshot(json_request("/api/chat", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
    }
}

#[tokio::test]
async fn test_chat_unavailable_without_key() {
    let response = bare_router()
        .oneshot(json_request("/api/chat", r#"{"message": "halo"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_detect_unavailable_without_token() {
    let response = bare_router()
        .oneshot(json_request("/api/disease/detect", r#"{"image": "abcd"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_detect_rejects_bad_base64() {
    let response = configured_router()
        .oneshot(json_request(
            "/api/disease/detect",
            r#"{"image": "!!!not base64!!!"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_detect_rejects_empty_payload() {
    let response = configured_router()
        .oneshot(json_request("/api/disease/detect", r#"{"image": ""}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Stand-in for the hosted inference endpoint that always reports the
/// model as warming up. Returns the URL to point the remote backend at.
async fn spawn_warming_up_backend() -> String {
    use axum::routing::post;

    let app = Router::new().route(
        "/models/leaf",
        post(|| async {
            axum::Json(serde_json::json!({
                "error": "Model leaf is currently loading",
                "estimated_time": 20.0
            }))
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}/models/leaf")
}

#[tokio::test]
async fn test_detect_reports_warm_up_as_202() {
    let model_url = spawn_warming_up_backend().await;
    let router = router_with(ServerConfig {
        disease: DiseaseConfig {
            api_token: Some("hf_test".to_string()),
            model_url,
            ..Default::default()
        },
        ..Default::default()
    });

    // base64 of "fake image bytes"; the remote path forwards bytes as-is.
    let response = router
        .oneshot(json_request(
            "/api/disease/detect",
            r#"{"image": "ZmFrZSBpbWFnZSBieXRlcw=="}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let body = body_json(response).await;
    assert_eq!(body["status"], "loading");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("currently loading"));
}

#[tokio::test]
async fn test_detect_file_rejects_missing_image_field() {
    let boundary = "testboundary";
    let body = format!(
        "--{boundary}\r\ncontent-disposition: form-data; name=\"other\"\r\n\r\nvalue\r\n--{boundary}--\r\n"
    );
    let request = Request::builder()
        .method("POST")
        .uri("/api/disease/detect-file")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();

    let response = configured_router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "No image file provided");
}

#[tokio::test]
async fn test_detect_file_rejects_empty_image() {
    let boundary = "testboundary";
    let body = format!(
        "--{boundary}\r\ncontent-disposition: form-data; name=\"image\"; filename=\"leaf.jpg\"\r\ncontent-type: image/jpeg\r\n\r\n\r\n--{boundary}--\r\n"
    );
    let request = Request::builder()
        .method("POST")
        .uri("/api/disease/detect-file")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();

    let response = configured_router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_disease_health_reports_unavailable() {
    let response = bare_router()
        .oneshot(
            Request::get("/api/disease/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "unavailable");
}

#[tokio::test]
async fn test_metrics_endpoint_renders() {
    let response = bare_router()
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
