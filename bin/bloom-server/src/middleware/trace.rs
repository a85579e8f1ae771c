use crate::error::ServerError;
use axum::{
    BoxError,
    body::{Body, HttpBody},
    extract::Request,
    http::{HeaderMap, HeaderValue, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use std::time::Instant;
use tracing::{Instrument, debug, info, info_span};
use uuid::Uuid;

pub static X_TRACE_ID: &str = "x-trace-id";

/// JSON bodies up to this size are buffered and logged at debug level.
/// Anything larger, or of another type, streams through untouched.
const MAX_LOGGED_BODY: usize = 1024;

/// Run each request inside an `http_request` span and stamp the trace ID on
/// both the request and the response.
///
/// A valid UUID in the incoming `x-trace-id` header is reused; anything else
/// is replaced with a fresh one.
pub async fn trace_middleware(req: Request<Body>, next: Next) -> Response {
    let start_time = Instant::now();

    let trace_id = req
        .headers()
        .get(X_TRACE_ID)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4);

    let span = info_span!(
        "http_request",
        trace_id = %trace_id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    async move {
        info!("→ request started");
        let header_value = HeaderValue::from_str(&trace_id.to_string()).ok();

        let (parts, body) = req.into_parts();
        let mut response = match log_small_json("request", &parts.headers, body).await {
            Ok(body) => {
                let mut req = Request::from_parts(parts, body);
                if let Some(v) = &header_value {
                    req.headers_mut().insert(X_TRACE_ID, v.clone());
                }
                let response = next.run(req).await;

                let (parts, body) = response.into_parts();
                match log_small_json("response", &parts.headers, body).await {
                    Ok(body) => Response::from_parts(parts, body),
                    Err(e) => ServerError::Internal(format!("response body: {e}")).into_response(),
                }
            }
            Err(e) if e.is::<LengthLimitError>() => {
                ServerError::PayloadTooLarge("request body too large".to_owned()).into_response()
            }
            Err(e) => {
                ServerError::BadRequest(format!("failed to read request body: {e}")).into_response()
            }
        };

        if let Some(v) = header_value {
            response.headers_mut().insert(X_TRACE_ID, v);
        }

        info!(
            status = response.status().as_u16(),
            latency_ms = start_time.elapsed().as_millis() as u64,
            "← response finished"
        );
        response
    }
    .instrument(span)
    .await
}

/// Log a body when it is JSON and bounded by [`MAX_LOGGED_BODY`]; pass every
/// other body through without reading it.
async fn log_small_json(direction: &str, headers: &HeaderMap, body: Body) -> Result<Body, BoxError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let hint = body.size_hint();
    let bounded = hint.upper().is_some_and(|n| n <= MAX_LOGGED_BODY as u64);
    if !content_type.contains("application/json") || !bounded {
        if let Some(size) = hint.exact().filter(|n| *n > 0) {
            debug!("{direction} body: [skipped: type={content_type}, size={size}]");
        }
        return Ok(body);
    }

    let bytes = Limited::new(body, MAX_LOGGED_BODY).collect().await?.to_bytes();
    if let Ok(text) = std::str::from_utf8(&bytes) {
        debug!("{direction} body: {text}");
    }
    Ok(Body::from(bytes))
}
