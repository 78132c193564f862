//! HTTP routes and handlers

use axum::{
    extract::{Multipart, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tomascan_core::{Detection, Error};
use tomascan_llm::SuggestionLanguage;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/api/test", get(api_test))
        .route("/api/chat", post(chat))
        .route("/api/disease/detect", post(detect))
        .route("/api/disease/detect-file", post(detect_file))
        .route("/api/disease/health", get(disease_health))
        .fallback(fallback)
        .layer(cors_layer(&state.config.cors_allowed_origins))
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.iter().any(|origin| origin == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Overall service health, forcing construction of unbuilt services.
async fn health_check(State(state): State<AppState>) -> Response {
    let report = state.registry.health_check().await;
    (StatusCode::OK, Json(report)).into_response()
}

async fn metrics(State(state): State<AppState>) -> String {
    state.metrics_handle.render()
}

/// Connectivity probe used by the frontend during development.
async fn api_test() -> Json<serde_json::Value> {
    Json(json!({ "status": "success", "message": "API is working" }))
}

async fn fallback() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not found")
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    /// Optional so a missing field is a 400, not a deserialization reject.
    #[serde(default)]
    message: Option<String>,
}

/// Forum chat with the TomatBot assistant.
async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    metrics::counter!("tomascan_requests_total", "endpoint" => "chat").increment(1);

    let message = req
        .message
        .as_deref()
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .ok_or_else(|| Error::validation("Message cannot be empty"))?;

    let llm = state.registry.llm().await;
    let reply = llm.chat_response(message).await?;
    Ok(Json(json!({ "response": reply })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DetectRequest {
    /// Base64 image payload, optionally a `data:image/...;base64,` URI.
    image: String,
    /// Attach an LLM-generated disease explanation to the response.
    #[serde(default)]
    request_llm_info: bool,
    /// Attach LLM-generated treatment suggestions to the response.
    #[serde(default)]
    request_treatment: bool,
}

/// Disease detection from a base64-encoded image.
async fn detect(
    State(state): State<AppState>,
    Json(req): Json<DetectRequest>,
) -> Result<Response, AppError> {
    metrics::counter!("tomascan_requests_total", "endpoint" => "detect").increment(1);

    let disease = state.registry.disease().await;
    let detection = disease.detect_payload(&req.image).await?;
    detection_response(&state, detection, req.request_llm_info, req.request_treatment).await
}

/// Disease detection from a multipart file upload. The image goes in the
/// `image` field.
async fn detect_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    metrics::counter!("tomascan_requests_total", "endpoint" => "detect_file").increment(1);

    let mut image_bytes = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::validation(format!("invalid multipart body: {e}")))?
    {
        if field.name() == Some("image") {
            let data = field
                .bytes()
                .await
                .map_err(|e| Error::validation(format!("failed to read image field: {e}")))?;
            image_bytes = Some(data);
        }
    }

    let image_bytes =
        image_bytes.ok_or_else(|| Error::validation("No image file provided"))?;
    if image_bytes.is_empty() {
        return Err(Error::validation("Image file is empty").into());
    }

    let disease = state.registry.disease().await;
    let detection = disease.detect(&image_bytes).await?;
    detection_response(&state, detection, false, false).await
}

/// Availability of the disease detection service alone.
async fn disease_health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let disease = state.registry.disease().await;
    let status = if disease.is_available() {
        "available"
    } else {
        "unavailable"
    };
    Json(json!({ "status": status }))
}

/// Turn a detection into the wire response, optionally enriching the top
/// prediction with LLM commentary.
async fn detection_response(
    state: &AppState,
    detection: Detection,
    request_llm_info: bool,
    request_treatment: bool,
) -> Result<Response, AppError> {
    let predictions = match detection {
        Detection::Loading(message) => {
            info!("model is still loading");
            return Ok((
                StatusCode::ACCEPTED,
                Json(json!({ "status": "loading", "message": message })),
            )
                .into_response());
        }
        Detection::Predictions(predictions) => predictions,
    };

    let mut body = json!({ "prediction": &predictions });

    if request_llm_info {
        if let Some(top) = predictions.first() {
            let llm = state.registry.llm().await;
            match llm.disease_info(&top.label).await {
                Ok(info) => body["llmInfo"] = json!(info),
                Err(e) => {
                    warn!("failed to get disease information: {e}");
                    body["llmInfoError"] = json!("Failed to get disease information");
                }
            }
        }
    }

    if request_treatment {
        if let Some(top) = predictions.first() {
            let llm = state.registry.llm().await;
            match llm
                .treatment_suggestion(&top.label, SuggestionLanguage::default())
                .await
            {
                Ok(suggestion) => body["treatmentSuggestion"] = json!(suggestion),
                Err(e) => {
                    warn!("failed to get treatment suggestion: {e}");
                    body["treatmentSuggestionError"] = json!("Failed to get treatment suggestion");
                }
            }
        }
    }

    Ok(Json(body).into_response())
}

/// Maps domain errors onto HTTP responses.
pub struct AppError(Error);

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            Error::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Error::OutOfDomain { confidence } => {
                info!(confidence, "image rejected as out of domain");
                (
                    StatusCode::BAD_REQUEST,
                    "Please provide a clearer image of a tomato leaf".to_string(),
                )
            }
            Error::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            Error::Connectivity(msg)
            | Error::RemoteInference(msg)
            | Error::Inference(msg)
            | Error::Chat(msg) => {
                error!("request failed: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
            other => {
                error!("request failed: {other}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        metrics::counter!("tomascan_errors_total").increment(1);
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_request_camel_case() {
        let req: DetectRequest =
            serde_json::from_str(r#"{"image": "abcd", "requestLlmInfo": true}"#).unwrap();
        assert!(req.request_llm_info);
        assert!(!req.request_treatment);

        let req: DetectRequest = serde_json::from_str(r#"{"image": "abcd"}"#).unwrap();
        assert!(!req.request_llm_info);
    }

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (Error::validation("bad"), StatusCode::BAD_REQUEST),
            (
                Error::OutOfDomain { confidence: 0.4 },
                StatusCode::BAD_REQUEST,
            ),
            (
                Error::unavailable("down"),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                Error::connectivity("timeout"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                Error::remote_inference("bad response"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (Error::chat("api error"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            let response = AppError(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }
}
