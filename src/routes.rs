use std::{path::Path, sync::Arc};

use axum::{
    extract::{
        rejection::{FormRejection, JsonRejection},
        FromRequest, Request, State,
    },
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tower_http::services::{ServeDir, ServeFile};
use tracing::warn;

use crate::{
    http_tracing::http_trace_layer,
    models::{types::UtcDateTime, Submission},
    repository::{FeedbackStore, StoreStatus},
    submission_handler::{handle_submit, SubmitResponse},
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn FeedbackStore>,
}

pub fn router(state: AppState, public_dir: impl AsRef<Path>) -> Router {
    let public_dir = public_dir.as_ref();

    Router::new()
        .route_service("/", ServeFile::new(public_dir.join("index.html")))
        .route("/health", get(health))
        .route("/submit", post(submit))
        .fallback_service(ServeDir::new(public_dir))
        .layer(http_trace_layer())
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    store: StoreStatus,
    timestamp: String,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "Server running",
        store: state.store.status().await,
        timestamp: UtcDateTime::now().to_string(),
    })
}

async fn submit(
    State(state): State<AppState>,
    SubmissionBody(submission): SubmissionBody,
) -> Json<SubmitResponse> {
    Json(handle_submit(state.store.as_ref(), submission).await)
}

/// A submission decoded from either a JSON or an url-encoded form body,
/// depending on the `Content-Type` header.
pub struct SubmissionBody(pub Submission);

impl<S> FromRequest<S> for SubmissionBody
where
    S: Send + Sync,
{
    type Rejection = SubmitRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_json(req.headers()) {
            let Json(submission) = Json::<Submission>::from_request(req, state).await?;
            Ok(SubmissionBody(submission))
        } else {
            let Form(submission) = Form::<Submission>::from_request(req, state).await?;
            Ok(SubmissionBody(submission))
        }
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| {
            let mime = value.split(';').next().unwrap_or_default().trim();
            mime == "application/json" || mime.ends_with("+json")
        })
}

#[derive(Debug, Error)]
pub enum SubmitRejection {
    #[error("{}", .0.body_text())]
    InvalidJson(#[from] JsonRejection),
    #[error("{}", .0.body_text())]
    InvalidForm(#[from] FormRejection),
}

impl IntoResponse for SubmitRejection {
    fn into_response(self) -> Response {
        warn!("Rejected submission body: {self}");

        (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "success": false,
                "message": format!("Invalid request body: {self}"),
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header::CONTENT_TYPE, Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use test_log::test;
    use tower::ServiceExt;

    use super::{router, AppState};
    use crate::{
        models::types::UtcDateTime,
        repository::{memory_pool, FeedbackRepository},
        submission_handler::{
            tests::{RecordingStore, StoreBehavior},
            PENDING_MESSAGE, SAVED_MESSAGE,
        },
        validation::{FULL_NAME_INVALID, RATING_INVALID, RATING_REQUIRED},
    };

    const VALID_FORM: &str = "fullName=Jane+Doe&email=jane%40example.com&phone=9876543210\
        &rollNo=R101&branch=CS&useful=yes&rating=4&suggestions=";

    fn app(store: Arc<RecordingStore>) -> Router {
        router(AppState { store }, "public")
    }

    fn valid_json() -> Value {
        json!({
            "fullName": "Jane Doe",
            "email": "jane@example.com",
            "phone": "9876543210",
            "rollNo": "R101",
            "branch": "CS",
            "useful": "yes",
            "rating": "4",
            "suggestions": "",
        })
    }

    fn post(content_type: &str, body: impl Into<Body>) -> Request<Body> {
        Request::post("/submit")
            .header(CONTENT_TYPE, content_type)
            .body(body.into())
            .unwrap()
    }

    fn post_json(body: &Value) -> Request<Body> {
        post("application/json", body.to_string())
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test(tokio::test)]
    async fn json_submission_is_persisted() {
        let repository = Arc::new(FeedbackRepository::connected(memory_pool().await));
        let app = router(
            AppState {
                store: repository.clone(),
            },
            "public",
        );
        let before = UtcDateTime::now();

        let response = app.oneshot(post_json(&valid_json())).await.unwrap();

        let after = UtcDateTime::now();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({ "success": true, "message": SAVED_MESSAGE })
        );

        let stored = repository.list_feedback().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].full_name, "Jane Doe");
        assert_eq!(stored[0].email, "jane@example.com");
        assert_eq!(stored[0].phone, "9876543210");
        assert_eq!(stored[0].roll_no, "R101");
        assert_eq!(stored[0].branch, "CS");
        assert_eq!(stored[0].useful, "yes");
        assert_eq!(stored[0].rating, 4);
        assert_eq!(stored[0].suggestions, "");
        assert!(before <= stored[0].created_at && stored[0].created_at <= after);
    }

    #[test(tokio::test)]
    async fn form_submission_is_saved() {
        let store = Arc::new(RecordingStore::new(StoreBehavior::Accept));

        let response = app(store.clone())
            .oneshot(post("application/x-www-form-urlencoded", VALID_FORM))
            .await
            .unwrap();

        assert_eq!(json_body(response).await["success"], json!(true));
        assert_eq!(store.saved().len(), 1);
        assert_eq!(store.saved()[0].email, "jane@example.com");
    }

    #[test(tokio::test)]
    async fn numeric_json_rating_is_accepted() {
        let store = Arc::new(RecordingStore::new(StoreBehavior::Accept));
        let mut body = valid_json();
        body["rating"] = json!(5);

        let response = app(store.clone()).oneshot(post_json(&body)).await.unwrap();

        assert_eq!(json_body(response).await["success"], json!(true));
        assert_eq!(store.saved()[0].rating, 5);
    }

    #[test(tokio::test)]
    async fn invalid_submission_is_echoed_without_saving() {
        let store = Arc::new(RecordingStore::new(StoreBehavior::Accept));
        let mut body = valid_json();
        body["fullName"] = json!("J4ne");
        body["rating"] = json!("7");

        let response = app(store.clone()).oneshot(post_json(&body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({
                "success": false,
                "errors": {
                    "fullName": FULL_NAME_INVALID,
                    "rating": RATING_INVALID,
                },
                "data": body,
            })
        );
        assert_eq!(store.save_calls(), 0);
    }

    #[test(tokio::test)]
    async fn boolean_json_values_are_accepted() {
        let store = Arc::new(RecordingStore::new(StoreBehavior::Accept));
        let mut body = valid_json();
        body["useful"] = json!(true);
        body["rating"] = json!(4.0);

        let response = app(store.clone()).oneshot(post_json(&body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({ "success": true, "message": SAVED_MESSAGE })
        );
        assert_eq!(store.saved()[0].useful, "true");
        assert_eq!(store.saved()[0].rating, 4);
    }

    #[test(tokio::test)]
    async fn zero_rating_counts_as_missing() {
        let store = Arc::new(RecordingStore::new(StoreBehavior::Accept));
        let mut body = valid_json();
        body["rating"] = json!(0);

        let response = app(store.clone()).oneshot(post_json(&body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["errors"], json!({ "rating": RATING_REQUIRED }));
        assert_eq!(store.save_calls(), 0);
    }

    #[test(tokio::test)]
    async fn disconnected_store_still_acknowledges() {
        let store = Arc::new(RecordingStore::new(StoreBehavior::Disconnected));

        let response = app(store.clone()).oneshot(post_json(&valid_json())).await.unwrap();

        assert_eq!(
            json_body(response).await,
            json!({ "success": true, "message": PENDING_MESSAGE })
        );
        assert_eq!(store.save_calls(), 0);
    }

    #[test(tokio::test)]
    async fn malformed_json_is_a_bad_request() {
        let store = Arc::new(RecordingStore::new(StoreBehavior::Accept));

        let response = app(store.clone())
            .oneshot(post("application/json", "{\"fullName\": "))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["success"], json!(false));
        assert_eq!(store.save_calls(), 0);
    }

    #[test(tokio::test)]
    async fn health_reports_store_status() {
        let store = Arc::new(RecordingStore::new(StoreBehavior::Disconnected));

        let response = app(store)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], json!("Server running"));
        assert_eq!(body["store"], json!("Disconnected"));
        assert!(body["timestamp"].is_string());
    }

    #[test(tokio::test)]
    async fn landing_page_is_served() {
        let store = Arc::new(RecordingStore::new(StoreBehavior::Accept));

        let response = app(store)
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let page = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(page.contains("action=\"/submit\""));
    }
}
