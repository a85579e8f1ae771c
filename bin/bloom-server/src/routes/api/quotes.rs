//! Quote-of-the-day route.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use bloom_types::{DailyQuoteResponse, ErrorBody};
use utoipa::OpenApi;

use crate::error::ServerError;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(paths(daily_quote), components(schemas(DailyQuoteResponse)))]
pub struct QuotesApi;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/quotes/daily", get(daily_quote))
}

/// Today's quote (UTC date). Generated on the first request of the day and
/// served from the database afterwards.
#[utoipa::path(
    get,
    path = "/api/quotes/daily",
    tag = "quotes",
    responses(
        (status = 200, description = "Quote for today", body = DailyQuoteResponse),
        (status = 500, description = "Generation or storage failed", body = ErrorBody),
    )
)]
pub async fn daily_quote(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DailyQuoteResponse>, ServerError> {
    let quote = state.quotes.quote_for_today().await?;
    Ok(Json(quote.into()))
}
