use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Response body for `GET /api/quotes/daily`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DailyQuoteResponse {
    pub content: String,
}
