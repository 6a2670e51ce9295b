use std::sync::Arc;

use async_trait::async_trait;

use crate::auth::{Role, TenantDirectory};
use crate::error::ApiError;
use crate::pipeline::attributes::RequestAttributes;
use crate::pipeline::chain::Filter;
use crate::pipeline::context::RequestContext;

const DOMAIN: &str = "go.micro.srv.organisation";

/// Checks the caller's role within the resolved organisation against the
/// route's minimum and attaches `team_id` when the membership carries one.
/// Requires session and organisation filters to have run first.
pub struct EmployeeAuthenticate {
    directory: Arc<dyn TenantDirectory>,
    min_role: Role,
}

impl EmployeeAuthenticate {
    pub fn new(directory: Arc<dyn TenantDirectory>, min_role: Role) -> Self {
        Self { directory, min_role }
    }
}

#[async_trait]
impl Filter for EmployeeAuthenticate {
    fn name(&self) -> &'static str {
        "employee_authenticate"
    }

    async fn apply(
        &self,
        _ctx: &RequestContext,
        attrs: &mut RequestAttributes,
    ) -> Result<(), ApiError> {
        let user_id = attrs.user_id.ok_or_else(|| {
            ApiError::invariant(DOMAIN, "session authentication required before role resolution")
        })?;
        let org_id = attrs.org_id.ok_or_else(|| {
            ApiError::invariant(DOMAIN, "organisation resolution required before role resolution")
        })?;

        let membership = self
            .directory
            .membership(org_id, user_id)
            .await
            .map_err(|e| ApiError::query(DOMAIN, e.to_string()))?
            .ok_or_else(|| ApiError::forbidden(DOMAIN, "not a member of the organisation"))?;

        if membership.role < self.min_role {
            tracing::debug!(
                "Rejected {} role for user {} (requires {})",
                membership.role.as_str(),
                user_id,
                self.min_role.as_str()
            );
            return Err(ApiError::forbidden(
                DOMAIN,
                format!("{} role required", self.min_role.as_str()),
            ));
        }

        attrs.team_id = membership.team_id;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Membership;
    use crate::testing::{request_context, MemoryDirectory};
    use uuid::Uuid;

    fn attrs_with_scope(user_id: Uuid, org_id: Uuid) -> RequestAttributes {
        let mut attrs = RequestAttributes::new();
        attrs.user_id = Some(user_id);
        attrs.org_id = Some(org_id);
        attrs
    }

    #[tokio::test]
    async fn non_member_is_forbidden() {
        let f = EmployeeAuthenticate::new(Arc::new(MemoryDirectory::new()), Role::Employee);
        let mut attrs = attrs_with_scope(Uuid::new_v4(), Uuid::new_v4());
        let result = f.apply(&request_context("/x"), &mut attrs).await;
        assert!(matches!(result, Err(ApiError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn insufficient_role_is_forbidden() {
        let user_id = Uuid::new_v4();
        let org_id = Uuid::new_v4();
        let directory = MemoryDirectory::new().with_membership(
            org_id,
            user_id,
            Membership { role: Role::User, team_id: None },
        );
        let f = EmployeeAuthenticate::new(Arc::new(directory), Role::Employee);

        let mut attrs = attrs_with_scope(user_id, org_id);
        let result = f.apply(&request_context("/x"), &mut attrs).await;
        assert!(matches!(result, Err(ApiError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn sufficient_role_attaches_team_scope() {
        let user_id = Uuid::new_v4();
        let org_id = Uuid::new_v4();
        let team_id = Uuid::new_v4();
        let directory = MemoryDirectory::new().with_membership(
            org_id,
            user_id,
            Membership { role: Role::Admin, team_id: Some(team_id) },
        );
        let f = EmployeeAuthenticate::new(Arc::new(directory), Role::Employee);

        let mut attrs = attrs_with_scope(user_id, org_id);
        f.apply(&request_context("/x"), &mut attrs).await.unwrap();
        assert_eq!(attrs.team_id(), Some(team_id));
    }
}
