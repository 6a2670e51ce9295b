use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Failure surfaced by a downstream service call. Carries the originating
/// service domain so the gateway can forward it verbatim in the error
/// envelope.
#[derive(Error, Debug, Clone)]
pub enum RpcError {
    #[error("{domain}: not found: {detail}")]
    NotFound { domain: String, detail: String },

    #[error("{domain}: {detail}")]
    Failed { domain: String, detail: String },
}

/// Abstract client for the backend RPC services. The concrete transport
/// (HTTP, gRPC, message bus) is wired in at startup; handlers only see this
/// trait. Retry and backoff policy live in the client configuration, not in
/// the gateway.
#[async_trait]
pub trait RpcClient: Send + Sync {
    /// Invoke `method` on `service` with a JSON request body.
    async fn call(&self, service: &str, method: &str, request: Value) -> Result<Value, RpcError>;
}
