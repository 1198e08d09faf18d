use axum::extract::{OriginalUri, Path, Query, State};
use axum::http::header::{HOST, LOCATION};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use gurl_core::{Origin, ShortKey};
use tracing::trace;

use crate::error::{AppError, Result};
use crate::model::{CreateLinkResponse, DeleteParams};
use crate::state::AppState;

const FORWARDED_PROTO: &str = "x-forwarded-proto";
const CREATE_PREFIX: &str = "/c/";

/// `GET /c/{*target}`: everything after `/c/`, plus the query string, is the
/// target to shorten. The target is taken verbatim, percent-escapes included.
pub async fn create_link_handler(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
) -> Result<Response> {
    let origin = request_origin(&headers, state.assume_tls())?;
    let target = raw_target(uri.path(), uri.query())?;
    trace!(host = %origin.host, target = %target, "create requested");

    let record = state.shortener().create(origin, target).await?;
    Ok((StatusCode::CREATED, Json(CreateLinkResponse::from(record))).into_response())
}

pub async fn resolve_link_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Response> {
    let key = parse_key(key)?;
    let record = state.shortener().resolve(&key).await?;
    Ok((StatusCode::FOUND, [(LOCATION, record.target_url)]).into_response())
}

pub async fn delete_link_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(params): Query<DeleteParams>,
) -> Result<Response> {
    let key = parse_key(key)?;
    let token = params.token.unwrap_or_default();
    state.shortener().delete(&key, &token).await?;
    Ok((StatusCode::OK, "done").into_response())
}

fn raw_target(path: &str, query: Option<&str>) -> Result<String> {
    let target = path
        .strip_prefix(CREATE_PREFIX)
        .ok_or_else(|| AppError::BadRequest(format!("expected a path under {CREATE_PREFIX}")))?;

    Ok(match query {
        Some(query) if !query.is_empty() => format!("{target}?{query}"),
        _ => target.to_string(),
    })
}

/// A key that could never have been issued is reported as missing.
fn parse_key(raw: String) -> Result<ShortKey> {
    ShortKey::new(raw).map_err(|_| AppError::NotFound("link not found".to_string()))
}

fn request_origin(headers: &HeaderMap, assume_tls: bool) -> Result<Origin> {
    let host = headers
        .get(HOST)
        .and_then(|value| value.to_str().ok())
        .filter(|host| !host.is_empty())
        .ok_or_else(|| AppError::BadRequest("missing Host header".to_string()))?;
    let forwarded_tls = headers
        .get(FORWARDED_PROTO)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|proto| proto.eq_ignore_ascii_case("https"));

    Ok(Origin::new(assume_tls || forwarded_tls, host))
}
