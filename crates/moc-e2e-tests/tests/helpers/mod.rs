//! Shared test harness for E2E conversation tests.
//!
//! Wires a real `ChatService` (deterministic phrasing, in-memory stats)
//! behind the Axum router and talks to it over HTTP via `tower::oneshot`.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use moc_api::routes::build_router;
use moc_api::state::AppState;
use moc_dialogue::{
    ChatService, DialogueEngine, FirstChoice, ManualKnowledge, MemoryStatsSink, SessionContext,
};

/// End-to-end harness: router + shared state + the stats sink behind it.
pub struct TestHarness {
    /// API state shared with the router.
    pub state: AppState,
    /// Axum router for HTTP requests via `tower::oneshot`.
    pub router: Router,
    /// In-memory stats sink, for inspecting recorded turns.
    pub sink: Arc<MemoryStatsSink>,
}

impl TestHarness {
    /// Harness with an empty knowledge table.
    pub fn new() -> Self {
        Self::with_knowledge(ManualKnowledge::empty())
    }

    /// Harness backed by the given manual knowledge table.
    pub fn with_knowledge(knowledge: ManualKnowledge) -> Self {
        let sink = Arc::new(MemoryStatsSink::new());
        let engine = DialogueEngine::new(Arc::new(knowledge), Arc::new(FirstChoice));
        let state = AppState::new(ChatService::new(engine, sink.clone()));
        let router = build_router(state.clone());
        Self {
            state,
            router,
            sink,
        }
    }

    /// POST /api/message with a raw JSON body.
    /// Returns (HTTP status code, response JSON body).
    pub async fn post_message(&self, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let response = self
            .router
            .clone()
            .oneshot(
                Request::post("/api/message")
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_vec(&body).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        (status, json)
    }

    /// Send `message` as `user_id` and return the assistant's reply.
    pub async fn say(&self, user_id: &str, message: &str) -> String {
        let (status, json) = self
            .post_message(serde_json::json!({ "message": message, "user_id": user_id }))
            .await;
        assert_eq!(status, StatusCode::OK, "unexpected status for {message:?}: {json}");
        json["response"].as_str().unwrap().to_string()
    }

    /// GET /api/stats as JSON.
    pub async fn stats(&self) -> serde_json::Value {
        let response = self
            .router
            .clone()
            .oneshot(Request::get("/api/stats").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// Current context of a session.
    pub async fn session(&self, user_id: &str) -> SessionContext {
        self.state
            .chat
            .session(user_id)
            .await
            .expect("session exists")
    }
}
