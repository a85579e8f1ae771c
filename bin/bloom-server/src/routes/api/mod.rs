pub mod messages;
pub mod quotes;

use crate::state::AppState;
use utoipa::OpenApi;

use axum::Router;
use std::sync::Arc;

/// Routes nested under `/api`, the prefix the greeting-site client calls.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(messages::router())
        .merge(quotes::router())
}

pub fn api_docs() -> utoipa::openapi::OpenApi {
    let mut spec = messages::MessagesApi::openapi();
    spec.merge(quotes::QuotesApi::openapi());
    spec
}
