use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::auth::{Membership, Organisation, Session, SessionStore, StoreError, TenantDirectory};
use crate::error::ApiError;
use crate::pipeline::{Filter, RequestAttributes, RequestContext};

/// In-memory capability implementations and pipeline probes for unit tests.

pub fn request_context(uri: &str) -> RequestContext {
    let request = axum::http::Request::builder()
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    RequestContext::from_request(&request)
}

/// A session expiring an hour from now.
pub fn session(id: &str, user_id: Uuid) -> Session {
    Session {
        id: id.to_string(),
        user_id,
        org_id: None,
        team_id: None,
        expires_at: Utc::now() + Duration::hours(1),
    }
}

#[derive(Default)]
pub struct MemorySessionStore {
    sessions: HashMap<String, Session>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(mut self, session: Session) -> Self {
        self.sessions.insert(session.id.clone(), session);
        self
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn fetch(&self, session_id: &str) -> Result<Option<Session>, StoreError> {
        Ok(self.sessions.get(session_id).cloned())
    }
}

#[derive(Default)]
pub struct MemoryDirectory {
    organisations: HashMap<Uuid, Organisation>,
    memberships: HashMap<(Uuid, Uuid), Membership>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_organisation(mut self, user_id: Uuid, organisation: Organisation) -> Self {
        self.organisations.insert(user_id, organisation);
        self
    }

    pub fn with_membership(mut self, org_id: Uuid, user_id: Uuid, membership: Membership) -> Self {
        self.memberships.insert((org_id, user_id), membership);
        self
    }
}

#[async_trait]
impl TenantDirectory for MemoryDirectory {
    async fn organisation_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<Organisation>, StoreError> {
        Ok(self.organisations.get(&user_id).cloned())
    }

    async fn membership(
        &self,
        org_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Membership>, StoreError> {
        Ok(self.memberships.get(&(org_id, user_id)).cloned())
    }
}

/// Filter that counts its invocations and always succeeds. Used to observe
/// whether the chain reached a given position.
pub struct CountingFilter {
    calls: Arc<AtomicUsize>,
}

impl CountingFilter {
    pub fn new() -> Self {
        Self { calls: Arc::new(AtomicUsize::new(0)) }
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

#[async_trait]
impl Filter for CountingFilter {
    fn name(&self) -> &'static str {
        "counting"
    }

    async fn apply(
        &self,
        _ctx: &RequestContext,
        _attrs: &mut RequestAttributes,
    ) -> Result<(), ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
