use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::state::AppState;

use super::context::RequestContext;

/// Runs the route group's filter chain before the handler and injects the
/// resolved attributes into the request. Handlers behind this layer can rely
/// on a fully populated attribute set; any chain failure already became the
/// response.
pub async fn filter_chain_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let ctx = RequestContext::from_request(&request);
    let attrs = state.chain.run(&ctx).await?;
    request.extensions_mut().insert(attrs);
    Ok(next.run(request).await)
}
