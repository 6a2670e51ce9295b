use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::auth::SessionStore;
use crate::error::ApiError;
use crate::pipeline::attributes::RequestAttributes;
use crate::pipeline::chain::Filter;
use crate::pipeline::context::RequestContext;

const DOMAIN: &str = "go.micro.srv.auth";

/// Authenticates the caller's session and attaches `user_id`. The session id
/// is read from the configured query parameter, falling back to a bearer
/// token in the Authorization header.
pub struct SessionAuthenticate {
    store: Arc<dyn SessionStore>,
    query_param: String,
}

impl SessionAuthenticate {
    pub fn new(store: Arc<dyn SessionStore>, query_param: impl Into<String>) -> Self {
        Self { store, query_param: query_param.into() }
    }

    fn session_id<'a>(&self, ctx: &'a RequestContext) -> Option<&'a str> {
        ctx.query(&self.query_param)
            .filter(|id| !id.is_empty())
            .or_else(|| ctx.bearer_token())
    }
}

#[async_trait]
impl Filter for SessionAuthenticate {
    fn name(&self) -> &'static str {
        "session_authenticate"
    }

    async fn apply(
        &self,
        ctx: &RequestContext,
        attrs: &mut RequestAttributes,
    ) -> Result<(), ApiError> {
        let session_id = self
            .session_id(ctx)
            .ok_or_else(|| ApiError::unauthorized(DOMAIN, "no session supplied"))?;

        let session = self
            .store
            .fetch(session_id)
            .await
            .map_err(|e| ApiError::query(DOMAIN, e.to_string()))?
            .ok_or_else(|| ApiError::unauthorized(DOMAIN, "session not found"))?;

        if session.is_expired(Utc::now()) {
            tracing::debug!("Rejected expired session for user {}", session.user_id);
            return Err(ApiError::unauthorized(DOMAIN, "session expired"));
        }

        attrs.user_id = Some(session.user_id);
        Ok(())
    }
}
