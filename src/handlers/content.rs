use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Path, State};
use axum::Json;
use serde_json::{json, Value};

use crate::envelope;
use crate::error::ApiError;
use crate::pipeline::RequestAttributes;
use crate::state::AppState;

const SERVICE: &str = "go.micro.srv.content";

/// GET /api/content - paginated, sorted listing scoped to the caller's
/// organisation. Every attribute read here was attached by the filter chain.
pub async fn content_list(
    State(state): State<AppState>,
    Extension(attrs): Extension<RequestAttributes>,
) -> Result<Json<Value>, ApiError> {
    let request = json!({
        "user_id": attrs.user_id()?,
        "org_id": attrs.org_id()?,
        "team_id": attrs.team_id(),
        "limit": attrs.paginate_limit()?,
        "offset": attrs.paginate_offset()?,
        "sort_field": attrs.sort_field()?,
        "sort_direction": attrs.sort_direction()?.as_str(),
    });

    let response = state.rpc.call(SERVICE, "ContentService.All", request).await?;
    Ok(Json(json!({ "success": true, "data": response })))
}

/// POST /api/content - create a content item. The polymorphic `item` field is
/// decoded to its typed variant before anything is forwarded, so malformed or
/// unknown payloads never reach the backend.
pub async fn content_create(
    State(state): State<AppState>,
    Extension(attrs): Extension<RequestAttributes>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = payload.map_err(|e| ApiError::bind(SERVICE, e.body_text()))?;
    let item_value = body
        .get("item")
        .ok_or_else(|| ApiError::bad_request(SERVICE, "missing item"))?;

    let item = envelope::decode(state.content.as_ref(), item_value)
        .map_err(|e| ApiError::envelope(SERVICE, e))?;

    let request = json!({
        "user_id": attrs.user_id()?,
        "org_id": attrs.org_id()?,
        "item": envelope::encode(state.content.as_ref(), &item)
            .map_err(|e| ApiError::envelope(SERVICE, e))?,
    });

    let response = state.rpc.call(SERVICE, "ContentService.Create", request).await?;
    Ok(Json(json!({ "success": true, "data": response })))
}

/// GET /api/content/:id - read one content item. The backend returns the
/// item as a typed envelope; it is decoded and re-encoded so a malformed
/// backend payload surfaces as a query failure instead of passing through.
pub async fn content_read(
    State(state): State<AppState>,
    Extension(attrs): Extension<RequestAttributes>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let request = json!({
        "user_id": attrs.user_id()?,
        "org_id": attrs.org_id()?,
        "id": id,
    });

    let response = state.rpc.call(SERVICE, "ContentService.Read", request).await?;

    let item_value = response
        .get("item")
        .ok_or_else(|| ApiError::query(SERVICE, "response missing item"))?;
    let item = envelope::decode(state.content.as_ref(), item_value)
        .map_err(|e| ApiError::query(SERVICE, format!("invalid item in response: {}", e)))?;
    let encoded = envelope::encode(state.content.as_ref(), &item)
        .map_err(|e| ApiError::envelope(SERVICE, e))?;

    Ok(Json(json!({ "success": true, "data": { "item": encoded } })))
}
