use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use axum::Router;
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use healum_api_rust::auth::{
    Membership, Organisation, Role, Session, SessionStore, StoreError, TenantDirectory,
};
use healum_api_rust::config::PaginationConfig;
use healum_api_rust::handlers;
use healum_api_rust::models::{content_registry, survey_registry};
use healum_api_rust::pipeline::{
    EmployeeAuthenticate, Filter, FilterChain, OrganisationAuthenticate, Paginate,
    SessionAuthenticate, SortFilter,
};
use healum_api_rust::rpc::{RpcClient, RpcError};
use healum_api_rust::state::AppState;

// Seeded identities: an employee in an active organisation, a plain user in
// the same organisation, a user with no organisation, and an expired session.
pub const EMPLOYEE_SESSION: &str = "s-employee";
pub const MEMBER_SESSION: &str = "s-member";
pub const ORPHAN_SESSION: &str = "s-orphan";
pub const EXPIRED_SESSION: &str = "s-expired";

pub fn employee_user_id() -> Uuid {
    Uuid::from_u128(0xA1)
}

pub fn member_user_id() -> Uuid {
    Uuid::from_u128(0xA2)
}

pub fn orphan_user_id() -> Uuid {
    Uuid::from_u128(0xA3)
}

pub fn org_id() -> Uuid {
    Uuid::from_u128(0xB1)
}

pub fn team_id() -> Uuid {
    Uuid::from_u128(0xC1)
}

fn session(id: &str, user_id: Uuid, expires_in: Duration) -> Session {
    Session {
        id: id.to_string(),
        user_id,
        org_id: Some(org_id()),
        team_id: None,
        expires_at: Utc::now() + expires_in,
    }
}

struct StubSessions {
    sessions: HashMap<String, Session>,
}

impl StubSessions {
    fn seeded() -> Self {
        let mut sessions = HashMap::new();
        for (id, user_id) in [
            (EMPLOYEE_SESSION, employee_user_id()),
            (MEMBER_SESSION, member_user_id()),
            (ORPHAN_SESSION, orphan_user_id()),
        ] {
            sessions.insert(id.to_string(), session(id, user_id, Duration::hours(1)));
        }
        sessions.insert(
            EXPIRED_SESSION.to_string(),
            session(EXPIRED_SESSION, employee_user_id(), Duration::hours(-1)),
        );
        Self { sessions }
    }
}

#[async_trait]
impl SessionStore for StubSessions {
    async fn fetch(&self, session_id: &str) -> Result<Option<Session>, StoreError> {
        Ok(self.sessions.get(session_id).cloned())
    }
}

struct StubDirectory;

#[async_trait]
impl TenantDirectory for StubDirectory {
    async fn organisation_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<Organisation>, StoreError> {
        if user_id == employee_user_id() || user_id == member_user_id() {
            Ok(Some(Organisation { id: org_id(), name: "acme-health".into(), is_active: true }))
        } else {
            Ok(None)
        }
    }

    async fn membership(
        &self,
        org: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Membership>, StoreError> {
        if org != org_id() {
            return Ok(None);
        }
        if user_id == employee_user_id() {
            Ok(Some(Membership { role: Role::Employee, team_id: Some(team_id()) }))
        } else if user_id == member_user_id() {
            Ok(Some(Membership { role: Role::User, team_id: None }))
        } else {
            Ok(None)
        }
    }
}

#[derive(Clone, Debug)]
pub struct RecordedCall {
    pub service: String,
    pub method: String,
    pub request: Value,
}

/// RPC client that records every call and answers with a settable canned
/// response or error. Used to assert both what reached the downstream
/// boundary and that short-circuited requests never did.
pub struct RecordingRpc {
    calls: Mutex<Vec<RecordedCall>>,
    response: Mutex<Value>,
    error: Mutex<Option<RpcError>>,
}

impl RecordingRpc {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            response: Mutex::new(Value::Object(Default::default())),
            error: Mutex::new(None),
        })
    }

    pub fn set_response(&self, response: Value) {
        *self.response.lock().unwrap() = response;
    }

    pub fn set_error(&self, error: RpcError) {
        *self.error.lock().unwrap() = Some(error);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl RpcClient for RecordingRpc {
    async fn call(&self, service: &str, method: &str, request: Value) -> Result<Value, RpcError> {
        self.calls.lock().unwrap().push(RecordedCall {
            service: service.to_string(),
            method: method.to_string(),
            request,
        });
        if let Some(error) = self.error.lock().unwrap().clone() {
            return Err(error);
        }
        Ok(self.response.lock().unwrap().clone())
    }
}

/// Build the real router over stub capabilities, mirroring the startup
/// wiring in `main`.
pub fn test_app() -> (Router, Arc<RecordingRpc>) {
    let rpc = RecordingRpc::new();
    let sessions: Arc<dyn SessionStore> = Arc::new(StubSessions::seeded());
    let directory: Arc<dyn TenantDirectory> = Arc::new(StubDirectory);

    let filters: Vec<Box<dyn Filter>> = vec![
        Box::new(SessionAuthenticate::new(sessions, "session")),
        Box::new(OrganisationAuthenticate::new(directory.clone())),
        Box::new(EmployeeAuthenticate::new(directory, Role::Employee)),
        Box::new(Paginate::new(PaginationConfig { default_limit: 10, max_limit: 100 })),
        Box::new(SortFilter::new(&["name", "created"], "created")),
    ];

    let state = AppState {
        content: Arc::new(content_registry().expect("content registry")),
        surveys: Arc::new(survey_registry().expect("survey registry")),
        chain: Arc::new(FilterChain::new(filters)),
        rpc: rpc.clone(),
    };

    (handlers::router(state), rpc)
}

pub async fn get(app: &Router, uri: &str) -> (u16, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> (u16, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_raw(app: &Router, uri: &str, body: &'static str) -> (u16, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

async fn send(app: &Router, request: Request<Body>) -> (u16, Value) {
    let response = app.clone().oneshot(request).await.expect("infallible");
    let status = response.status().as_u16();
    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}
