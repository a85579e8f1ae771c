use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Response body for `GET /health` when the server and its database answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Always `"ok"`.
    pub status: String,
    pub version: String,
    /// Always `"ok"`; an unreachable database yields 503 instead.
    pub database: String,
}

impl HealthResponse {
    pub fn ok(version: impl Into<String>) -> Self {
        Self {
            status: "ok".to_owned(),
            version: version.into(),
            database: "ok".to_owned(),
        }
    }
}
