//! Guestbook routes.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use bloom_types::{CreateMessageRequest, ErrorBody, Message};
use utoipa::OpenApi;
use validator::Validate;

use crate::error::ServerError;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(create_message, list_messages),
    components(schemas(CreateMessageRequest, Message, ErrorBody))
)]
pub struct MessagesApi;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/messages", post(create_message).get(list_messages))
}

#[utoipa::path(
    post,
    path = "/api/messages",
    tag = "messages",
    request_body = CreateMessageRequest,
    responses(
        (status = 201, description = "Message stored", body = Message),
        (status = 400, description = "Empty, overlong or malformed content", body = ErrorBody),
        (status = 413, description = "Request body over the size limit", body = ErrorBody),
        (status = 500, description = "Storage error", body = ErrorBody),
    )
)]
pub async fn create_message(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateMessageRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Message>), ServerError> {
    let Json(req) = payload?;
    req.validate()?;
    let record = state.guestbook.append(&req.content).await?;
    Ok((StatusCode::CREATED, Json(record.into())))
}

#[utoipa::path(
    get,
    path = "/api/messages",
    tag = "messages",
    responses(
        (status = 200, description = "Every message in insertion order", body = Vec<Message>),
        (status = 500, description = "Storage error", body = ErrorBody),
    )
)]
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Message>>, ServerError> {
    let records = state.guestbook.list_all().await?;
    Ok(Json(records.into_iter().map(Message::from).collect()))
}
