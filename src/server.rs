// 🌐 Web Server - page route and Selection-Changed round trip
// Each request is handled by a pure function over the shared, read-only dataset.

use crate::chart::{build_chart, Figure};
use crate::dataset::{ContributionRecord, Dataset};
use crate::layout::{build_layout, render_page, Node};
use crate::selection::SelectionSet;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

const APP_JS: &str = include_str!("../web/app.js");
const STYLE_CSS: &str = include_str!("../web/style.css");

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
    pub default_selection: Arc<SelectionSet>,
    pub debug: bool,
}

impl AppState {
    pub fn new(dataset: Arc<Dataset>, debug: bool) -> Self {
        let default_selection = Arc::new(SelectionSet::default_for(&dataset));
        AppState {
            dataset,
            default_selection,
            debug,
        }
    }

    fn layout(&self) -> Node {
        build_layout(&self.dataset.sources(), &self.default_selection)
    }
}

/// API Response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: (),
            error: Some(message.into()),
        }
    }
}

const INVALID_SELECTION: &str = "Invalid selection message";

/// Selection-Changed message sent by the page whenever the checklist changes
#[derive(Debug, Deserialize)]
pub struct SelectionChanged {
    pub selected: SelectionSet,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub records: usize,
    pub sources: usize,
    pub fingerprint: String,
    pub loaded_at: DateTime<Utc>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET / - Serve the infographic page with the default chart already embedded
async fn serve_index(State(state): State<AppState>) -> impl IntoResponse {
    let initial = Figure::from(&build_chart(&state.dataset, &state.default_selection));

    match render_page(&state.layout(), &initial) {
        Ok(page) => Html(page).into_response(),
        Err(e) => {
            log::error!("Error rendering page: {}", e);
            let body = if state.debug {
                format!("Failed to render page: {}", e)
            } else {
                "Failed to render page".to_string()
            };
            (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
        }
    }
}

/// POST /api/chart - Recompute the waterfall for a new selection
///
/// A body that is not a Selection-Changed message gets an error envelope with
/// the rejection's status; the parser's message is only included in debug mode.
async fn update_chart(
    State(state): State<AppState>,
    payload: Result<Json<SelectionChanged>, JsonRejection>,
) -> Response {
    let message = match payload {
        Ok(Json(message)) => message,
        Err(rejection) => {
            log::warn!("Rejected selection message: {}", rejection.body_text());
            let detail = if state.debug {
                rejection.body_text()
            } else {
                INVALID_SELECTION.to_string()
            };
            return (rejection.status(), Json(ApiResponse::err(detail))).into_response();
        }
    };

    let unknown = message.selected.unknown_in(&state.dataset);
    if !unknown.is_empty() {
        log::debug!("Ignoring unknown sources in selection: {:?}", unknown);
    }

    let spec = build_chart(&state.dataset, &message.selected);
    log::debug!(
        "Selection changed: {} selected, {} bars",
        message.selected.len(),
        spec.len()
    );

    Json(ApiResponse::ok(Figure::from(&spec))).into_response()
}

/// GET /api/layout - Layout tree as JSON
async fn get_layout(State(state): State<AppState>) -> Json<ApiResponse<Node>> {
    Json(ApiResponse::ok(state.layout()))
}

/// GET /api/records - Every loaded record, in file order
async fn get_records(State(state): State<AppState>) -> Json<ApiResponse<Vec<ContributionRecord>>> {
    Json(ApiResponse::ok(state.dataset.records().to_vec()))
}

/// GET /api/health - Health check
async fn health_check(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::ok(HealthResponse {
        status: "OK",
        version: crate::VERSION,
        records: state.dataset.len(),
        sources: state.dataset.sources().len(),
        fingerprint: state.dataset.fingerprint(),
        loaded_at: state.dataset.loaded_at(),
    }))
}

async fn serve_app_js() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/javascript; charset=utf-8")], APP_JS)
}

async fn serve_style_css() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], STYLE_CSS)
}

// ============================================================================
// Router
// ============================================================================

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/chart", post(update_chart))
        .route("/layout", get(get_layout))
        .route("/records", get(get_records))
        .with_state(state.clone());

    Router::new()
        .route("/", get(serve_index))
        .route("/static/app.js", get(serve_app_js))
        .route("/static/style.css", get(serve_style_css))
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Measure;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn test_state() -> AppState {
        test_state_with_debug(false)
    }

    fn test_state_with_debug(debug: bool) -> AppState {
        let dataset = Dataset::from_records(vec![
            ContributionRecord::new("Carbon Dioxide", Measure::Relative, 1.68),
            ContributionRecord::new("Methane", Measure::Relative, 0.97),
            ContributionRecord::new("Aerosols", Measure::Relative, -0.27),
            ContributionRecord::new("Net total", Measure::Total, 2.38),
        ]);
        AppState::new(Arc::new(dataset), debug)
    }

    async fn send(request: Request<Body>) -> (StatusCode, Vec<u8>) {
        send_to(test_state(), request).await
    }

    async fn send_to(state: AppState, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = router(state).oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    fn post_chart(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/chart")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[test]
    fn test_default_selection_from_dataset() {
        let state = test_state();
        let names: Vec<&str> = state.default_selection.iter().collect();
        assert_eq!(names, vec!["Carbon Dioxide", "Methane", "Net total"]);
    }

    #[tokio::test]
    async fn test_update_chart_filters_in_order() {
        let (status, body) =
            send(post_chart(r#"{"selected": ["Net total", "Carbon Dioxide"]}"#)).await;
        assert_eq!(status, StatusCode::OK);

        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], true);
        let trace = &json["data"]["data"][0];
        assert_eq!(trace["x"], json!(["Carbon Dioxide", "Net total"]));
        assert_eq!(trace["measure"], json!(["relative", "total"]));
        assert_eq!(trace["y"], json!([1.68, 2.38]));
    }

    #[tokio::test]
    async fn test_update_chart_empty_and_unknown() {
        for body in [r#"{"selected": []}"#, r#"{"selected": ["Unknown Agent"]}"#] {
            let (status, bytes) = send(post_chart(body)).await;
            assert_eq!(status, StatusCode::OK);

            let json: Value = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(json["data"]["data"][0]["x"], json!([]));
        }
    }

    #[tokio::test]
    async fn test_update_chart_rejects_malformed_body() {
        let (status, body) = send(post_chart("{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["data"], Value::Null);
        assert_eq!(json["error"], INVALID_SELECTION);

        let (status, body) = send(post_chart(r#"{"selected": "Methane"}"#)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], INVALID_SELECTION);
    }

    #[tokio::test]
    async fn test_update_chart_error_detail_in_debug_mode() {
        let (status, body) = send_to(test_state_with_debug(true), post_chart("{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
        let error = json["error"].as_str().unwrap();
        assert_ne!(error, INVALID_SELECTION);
        assert!(error.contains("line 1 column 2"), "unexpected detail: {error}");
    }

    #[tokio::test]
    async fn test_update_chart_requires_json_content_type() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/chart")
            .body(Body::from(r#"{"selected": []}"#))
            .unwrap();
        let (status, body) = send(request).await;

        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn test_index_page() {
        let (status, body) = send(get_request("/")).await;
        assert_eq!(status, StatusCode::OK);

        let html = String::from_utf8(body).unwrap();
        assert!(html.contains("<h1>Radiative Forcing</h1>"));
        assert!(html.contains("value=\"Methane\" checked>"));
        assert!(html.contains("value=\"Aerosols\">"));
        assert!(html.contains("\"x\":[\"Carbon Dioxide\",\"Methane\",\"Net total\"]"));
    }

    #[tokio::test]
    async fn test_layout_endpoint() {
        let (status, body) = send(get_request("/api/layout")).await;
        assert_eq!(status, StatusCode::OK);

        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["data"]["type"], "div");
    }

    #[tokio::test]
    async fn test_records_endpoint() {
        let (_, body) = send(get_request("/api/records")).await;
        let json: Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["data"].as_array().unwrap().len(), 4);
        assert_eq!(json["data"][2]["Source"], "Aerosols");
        assert_eq!(json["data"][3]["Measure"], "total");
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (status, body) = send(get_request("/api/health")).await;
        assert_eq!(status, StatusCode::OK);

        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["data"]["status"], "OK");
        assert_eq!(json["data"]["records"], 4);
        assert_eq!(json["data"]["fingerprint"].as_str().unwrap().len(), 64);
    }

    #[tokio::test]
    async fn test_static_assets() {
        let response = router(test_state()).oneshot(get_request("/static/app.js")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/javascript; charset=utf-8"
        );

        let (status, _) = send(get_request("/static/style.css")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (status, _) = send(get_request("/api/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
