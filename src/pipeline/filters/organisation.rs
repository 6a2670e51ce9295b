use std::sync::Arc;

use async_trait::async_trait;

use crate::auth::TenantDirectory;
use crate::error::ApiError;
use crate::pipeline::attributes::RequestAttributes;
use crate::pipeline::chain::Filter;
use crate::pipeline::context::RequestContext;

const DOMAIN: &str = "go.micro.srv.organisation";

/// Resolves the authenticated user's organisation and attaches `org_id`.
/// Requires `SessionAuthenticate` to have run first.
pub struct OrganisationAuthenticate {
    directory: Arc<dyn TenantDirectory>,
}

impl OrganisationAuthenticate {
    pub fn new(directory: Arc<dyn TenantDirectory>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl Filter for OrganisationAuthenticate {
    fn name(&self) -> &'static str {
        "organisation_authenticate"
    }

    async fn apply(
        &self,
        _ctx: &RequestContext,
        attrs: &mut RequestAttributes,
    ) -> Result<(), ApiError> {
        let user_id = attrs.user_id.ok_or_else(|| {
            ApiError::invariant(DOMAIN, "session authentication required before organisation resolution")
        })?;

        let organisation = self
            .directory
            .organisation_for_user(user_id)
            .await
            .map_err(|e| ApiError::query(DOMAIN, e.to_string()))?
            .ok_or_else(|| ApiError::forbidden(DOMAIN, "user has no organisation"))?;

        if !organisation.is_active {
            tracing::debug!("Rejected request for disabled organisation {}", organisation.id);
            return Err(ApiError::forbidden(
                DOMAIN,
                format!("organisation '{}' is disabled", organisation.name),
            ));
        }

        attrs.org_id = Some(organisation.id);
        Ok(())
    }
}
