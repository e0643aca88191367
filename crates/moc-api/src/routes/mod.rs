//! API route definitions and router builder.

pub mod health;
pub mod message;
pub mod stats;

use axum::Router;
use axum::routing::{get, post};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/message", post(message::post_message))
        .route("/stats", get(stats::get_stats));

    Router::new()
        .route("/health", get(health::health))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use moc_dialogue::{ChatService, DialogueEngine, FirstChoice, ManualKnowledge, MemoryStatsSink};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> Router {
        let engine =
            DialogueEngine::new(Arc::new(ManualKnowledge::empty()), Arc::new(FirstChoice));
        let chat = ChatService::new(engine, Arc::new(MemoryStatsSink::new()));
        build_router(AppState::new(chat))
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn message_returns_reply() {
        let response = app()
            .oneshot(post_json(
                "/api/message",
                serde_json::json!({
                    "message": "The APU of CC-AWN does not start",
                    "user_id": "tech-1"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert!(json["response"].as_str().unwrap().contains("CC-AWN"));
    }

    #[tokio::test]
    async fn user_id_defaults_to_web_user() {
        let app = app();
        app.clone()
            .oneshot(post_json("/api/message", serde_json::json!({"message": "APU does not start"})))
            .await
            .unwrap();
        let response = app
            .oneshot(post_json(
                "/api/message",
                serde_json::json!({"message": "CC-BAW", "user_id": "web_user"}),
            ))
            .await
            .unwrap();

        let json = json_body(response).await;
        assert!(json["response"].as_str().unwrap().contains("does not start on CC-BAW"));
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request() {
        let response = app()
            .oneshot(
                Request::post("/api/message")
                    .header("content-type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["status"], 400);
    }

    #[tokio::test]
    async fn blank_user_id_is_rejected() {
        let response = app()
            .oneshot(post_json(
                "/api/message",
                serde_json::json!({"message": "help", "user_id": "  "}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn stats_count_turns() {
        let app = app();
        for message in ["help", "urgent"] {
            app.clone()
                .oneshot(post_json("/api/message", serde_json::json!({"message": message})))
                .await
                .unwrap();
        }

        let response = app
            .oneshot(Request::get("/api/stats").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["total_turns"], 2);
        assert_eq!(json["urgent"], 1);
    }
}
