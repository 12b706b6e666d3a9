//! HTTP layer - axum router, shared state and server loop.
//!
//! Handlers only translate requests into calls to [`crate::core`] and wrap the
//! results in JSON. Status codes for failures are decided in [`error`].

/// Error-to-response translation and the JSON body extractor
pub mod error;
/// Expense, income, budget and category routes
pub mod finance;
/// Subject, exam and question routes
pub mod school;
/// Registration and login routes
pub mod users;

use crate::config::ServerSettings;
use crate::errors::Result;
use axum::{Router, routing::get};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    /// Connection pool
    pub db: Arc<DatabaseConnection>,
}

/// Builds the complete router.
pub fn router(state: AppState, cors: bool) -> Router {
    let mut router = Router::new()
        .route("/", get(|| async { "Welcome to the records API" }))
        .route("/health", get(|| async { "OK" }))
        .merge(users::routes())
        .merge(finance::routes())
        .merge(school::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if cors {
        router = router.layer(CorsLayer::permissive());
    }
    router
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down gracefully"),
        () = terminate => info!("Received SIGTERM, shutting down gracefully"),
    }
}

/// Binds the listener and serves requests until Ctrl+C or SIGTERM.
///
/// # Errors
/// Returns an error if the address is invalid or the socket cannot be bound.
pub async fn serve(settings: &ServerSettings, db: DatabaseConnection) -> Result<()> {
    let addr = settings.addr()?;
    let app = router(AppState { db: Arc::new(db) }, settings.cors);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::setup_test_db;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    async fn test_app() -> Router {
        let db = setup_test_db().await.unwrap();
        router(AppState { db: Arc::new(db) }, true)
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app().await;
        let (status, _) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_expense_round_trip() {
        let app = test_app().await;

        let (status, created) = send(
            &app,
            "POST",
            "/api/expenses",
            Some(json!({ "userId": "u1", "amount": 42, "category": "Food", "date": "2024-01-01" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["category"], "Food");

        let (status, listed) = send(&app, "GET", "/api/expenses?userId=u1", None).await;
        assert_eq!(status, StatusCode::OK);
        let listed = listed.as_array().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0]["category"], "Food");
        assert_eq!(listed[0]["amount"], 42.0);
        assert_eq!(listed[0]["userId"], "u1");
        assert!(listed[0].get("categoryName").is_none());

        let id = created["id"].as_i64().unwrap();
        let (status, body) = send(&app, "DELETE", &format!("/api/expenses/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Expense deleted successfully");

        let (status, body) = send(&app, "GET", &format!("/api/expenses/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Expense not found");
    }

    #[tokio::test]
    async fn test_bad_requests_are_400() {
        let app = test_app().await;

        let (status, body) = send(&app, "GET", "/api/expenses", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].is_string());

        let (status, _) = send(
            &app,
            "POST",
            "/api/expenses",
            Some(json!({ "userId": "u1", "category": "Food" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &app,
            "POST",
            "/api/incomes",
            Some(json!({ "userId": "u1", "amount": -5, "category": "Salary", "source": "ACME", "date": "2024-01-01" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_path_and_query_use_json_body() {
        let app = test_app().await;

        let (status, body) = send(&app, "GET", "/api/expenses/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].is_string());

        let (status, body) = send(&app, "DELETE", "/api/exams/question/not-a-number", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].is_string());

        let (status, body) = send(&app, "GET", "/api/budgets?userId=a&userId=b", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn test_exam_flow() {
        let app = test_app().await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/subjects/create-subject",
            Some(json!({ "name": "Biology", "schoolId": "s1" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let subject_id = body["subject"]["id"].as_i64().unwrap();

        let (status, _) = send(
            &app,
            "POST",
            "/api/subjects/create-subject",
            Some(json!({ "name": "Biology", "schoolId": "s1" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let exam = json!({
            "schoolId": "s1",
            "level": "JSS1",
            "termType": "FIRST",
            "subjectId": subject_id,
            "visible": true,
            "examDuration": 45,
        });
        let (status, created) = send(&app, "POST", "/api/exams/create-exam", Some(exam.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["subjectName"], "Biology");
        let exam_id = created["id"].as_i64().unwrap();

        let (status, _) = send(&app, "POST", "/api/exams/create-exam", Some(exam)).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = send(
            &app,
            "POST",
            "/api/exams/create-question",
            Some(json!({ "examId": exam_id, "question": "2 + 2?", "options": ["3", "4"], "correctAnswer": "5" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Correct answer must be one of the options");

        let (status, body) = send(
            &app,
            "POST",
            "/api/exams/create-question",
            Some(json!({ "examId": exam_id, "question": "2 + 2?", "options": ["3", "4"], "correctAnswer": "4" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["createdQuestion"]["correctAnswer"], "4");

        let (status, detail) = send(&app, "GET", &format!("/api/exams/exam/{exam_id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(detail["subjectName"], "Biology");
        assert_eq!(detail["questions"].as_array().unwrap().len(), 1);

        let (status, visible) = send(&app, "GET", "/api/exams/visible-true-exams/s1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(visible.as_array().unwrap().len(), 1);

        let (status, _) = send(
            &app,
            "PUT",
            "/api/exams/update-visibility-duration",
            Some(json!({ "updates": [{ "id": exam_id, "visible": false, "examDuration": 30 }] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, visible) = send(&app, "GET", "/api/exams/visible-true-exams/s1", None).await;
        assert!(visible.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_user_routes() {
        let app = test_app().await;
        let credentials = json!({ "username": "ada", "password": "s3cret" });

        let (status, user) = send(&app, "POST", "/api/users/create-user", Some(credentials.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(user.get("passwordHash").is_none());

        let (status, _) = send(&app, "POST", "/api/users/create-user", Some(credentials.clone())).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, logged_in) = send(&app, "POST", "/api/users/login", Some(credentials)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(logged_in["id"], user["id"]);

        let (status, _) = send(
            &app,
            "POST",
            "/api/users/login",
            Some(json!({ "username": "ada", "password": "nope" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
