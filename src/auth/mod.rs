use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A login session as created by the external login flow. The gateway only
/// reads sessions; expired ones are rejected, never mutated here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub user_id: Uuid,
    pub org_id: Option<Uuid>,
    pub team_id: Option<Uuid>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Caller role within an organisation, ordered by privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Employee,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Employee => "employee",
            Role::Admin => "admin",
        }
    }
}

/// Organisation record as resolved by the tenant directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organisation {
    pub id: Uuid,
    pub name: String,
    pub is_active: bool,
}

/// A user's membership within an organisation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Membership {
    pub role: Role,
    pub team_id: Option<Uuid>,
}

/// Failure talking to an external capability (session store, directory).
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// External session storage. Must support safe concurrent reads; the gateway
/// treats it as an opaque capability.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Resolve a session by id. `Ok(None)` when the id is unknown.
    async fn fetch(&self, session_id: &str) -> Result<Option<Session>, StoreError>;
}

/// External organisation/role lookup backing tenant scope resolution.
#[async_trait]
pub trait TenantDirectory: Send + Sync {
    /// The organisation a user belongs to, if any.
    async fn organisation_for_user(&self, user_id: Uuid)
        -> Result<Option<Organisation>, StoreError>;

    /// The user's membership within an organisation, if any.
    async fn membership(
        &self,
        org_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Membership>, StoreError>;
}
