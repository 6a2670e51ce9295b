use std::sync::Arc;

use healum_api_rust::auth::Role;
use healum_api_rust::config;
use healum_api_rust::handlers;
use healum_api_rust::models::{content_registry, survey_registry};
use healum_api_rust::pipeline::{
    EmployeeAuthenticate, Filter, FilterChain, OrganisationAuthenticate, Paginate,
    SessionAuthenticate, SortFilter,
};
use healum_api_rust::state::AppState;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up PORT, APP_ENV, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting Healum API gateway in {:?} mode", config.environment);

    // Registries are populated once here; a duplicate discriminator is a
    // configuration fault and aborts boot.
    let content = Arc::new(content_registry().expect("content registry"));
    let surveys = Arc::new(survey_registry().expect("survey registry"));

    let (sessions, directory, rpc) = dev::capabilities();
    tracing::info!(
        "Using in-memory development backends; session id '{}' is pre-seeded",
        dev::SESSION_ID
    );

    let filters: Vec<Box<dyn Filter>> = vec![
        Box::new(SessionAuthenticate::new(sessions, &config.session.query_param)),
        Box::new(OrganisationAuthenticate::new(directory.clone())),
        Box::new(EmployeeAuthenticate::new(directory, Role::Employee)),
        Box::new(Paginate::new(config.pagination)),
        Box::new(SortFilter::new(&["name", "created", "updated"], "created")),
    ];

    let state = AppState {
        content,
        surveys,
        chain: Arc::new(FilterChain::new(filters)),
        rpc,
    };

    let app = handlers::router(state);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Healum API gateway listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

/// Development wiring. The session store, tenant directory and RPC transport
/// are deployment-owned capabilities; the standalone binary runs against
/// in-memory stand-ins seeded with one employee identity so the whole
/// pipeline can be exercised end to end.
mod dev {
    use std::collections::HashMap;
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use serde_json::{json, Value};
    use uuid::Uuid;

    use healum_api_rust::auth::{
        Membership, Organisation, Role, Session, SessionStore, StoreError, TenantDirectory,
    };
    use healum_api_rust::rpc::{RpcClient, RpcError};

    pub const SESSION_ID: &str = "dev-session";

    pub fn capabilities() -> (Arc<dyn SessionStore>, Arc<dyn TenantDirectory>, Arc<dyn RpcClient>) {
        let user_id = Uuid::new_v4();
        let org_id = Uuid::new_v4();

        let session = Session {
            id: SESSION_ID.to_string(),
            user_id,
            org_id: Some(org_id),
            team_id: None,
            expires_at: Utc::now() + Duration::hours(24),
        };

        let store = DevSessionStore {
            sessions: HashMap::from([(SESSION_ID.to_string(), session)]),
        };

        let directory = DevDirectory {
            user_id,
            organisation: Organisation {
                id: org_id,
                name: "dev".to_string(),
                is_active: true,
            },
            membership: Membership { role: Role::Admin, team_id: None },
        };

        (Arc::new(store), Arc::new(directory), Arc::new(EchoRpc))
    }

    struct DevSessionStore {
        sessions: HashMap<String, Session>,
    }

    #[async_trait]
    impl SessionStore for DevSessionStore {
        async fn fetch(&self, session_id: &str) -> Result<Option<Session>, StoreError> {
            Ok(self.sessions.get(session_id).cloned())
        }
    }

    struct DevDirectory {
        user_id: Uuid,
        organisation: Organisation,
        membership: Membership,
    }

    #[async_trait]
    impl TenantDirectory for DevDirectory {
        async fn organisation_for_user(
            &self,
            user_id: Uuid,
        ) -> Result<Option<Organisation>, StoreError> {
            Ok((user_id == self.user_id).then(|| self.organisation.clone()))
        }

        async fn membership(
            &self,
            _org_id: Uuid,
            user_id: Uuid,
        ) -> Result<Option<Membership>, StoreError> {
            Ok((user_id == self.user_id).then(|| self.membership.clone()))
        }
    }

    /// Echoes requests back instead of talking to a real backend, with a
    /// canned content item for reads so the decode path can be exercised.
    struct EchoRpc;

    #[async_trait]
    impl RpcClient for EchoRpc {
        async fn call(
            &self,
            service: &str,
            method: &str,
            request: Value,
        ) -> Result<Value, RpcError> {
            match method {
                "ContentService.Read" => Ok(json!({
                    "item": {
                        "@type": "healum.com/proto/go.micro.srv.static.App",
                        "name": "demo app"
                    }
                })),
                _ => Ok(json!({
                    "service": service,
                    "method": method,
                    "request": request,
                })),
            }
        }
    }
}
