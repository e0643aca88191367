use serde::{Deserialize, Serialize};

/// Body of `POST /api/message`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageRequest {
    /// Free-text user message.
    #[serde(default)]
    pub message: String,
    /// Opaque session identifier.
    #[serde(default = "default_user_id")]
    pub user_id: String,
}

fn default_user_id() -> String {
    "web_user".to_string()
}

/// Reply to `POST /api/message`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub response: String,
}
