use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, State};
use axum::Json;
use serde_json::{json, Value};

use crate::envelope;
use crate::error::ApiError;
use crate::pipeline::RequestAttributes;
use crate::state::AppState;

const SERVICE: &str = "go.micro.srv.survey";

/// POST /api/survey/answers - submit a survey answer. The polymorphic
/// `answer` field is validated against the survey registry before the
/// forward.
pub async fn answer_create(
    State(state): State<AppState>,
    Extension(attrs): Extension<RequestAttributes>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = payload.map_err(|e| ApiError::bind(SERVICE, e.body_text()))?;
    let answer_value = body
        .get("answer")
        .ok_or_else(|| ApiError::bad_request(SERVICE, "missing answer"))?;

    let answer = envelope::decode(state.surveys.as_ref(), answer_value)
        .map_err(|e| ApiError::envelope(SERVICE, e))?;

    let request = json!({
        "user_id": attrs.user_id()?,
        "org_id": attrs.org_id()?,
        "answer": envelope::encode(state.surveys.as_ref(), &answer)
            .map_err(|e| ApiError::envelope(SERVICE, e))?,
    });

    let response = state.rpc.call(SERVICE, "SurveyService.SubmitAnswer", request).await?;
    Ok(Json(json!({ "success": true, "data": response })))
}
