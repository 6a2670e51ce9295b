// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::envelope::EnvelopeError;
use crate::rpc::RpcError;

/// Error domain for failures raised by the gateway itself rather than a
/// downstream service (parameter validation, attribute plumbing).
pub const GATEWAY_DOMAIN: &str = "go.micro.api.gateway";

/// Gateway error with the HTTP status it maps to and the service domain it
/// originated in. Every failure path - filter chain, envelope codec, route
/// handlers, downstream RPC - renders through this one type so clients see a
/// structurally identical error envelope everywhere.
#[derive(Debug, Clone)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest { domain: String, reason: String },
    Bind { domain: String, reason: String },
    MissingType { domain: String },
    UnknownType { domain: String, discriminator: String },

    // 401 Unauthorized
    Unauthorized { domain: String, reason: String },

    // 403 Forbidden
    Forbidden { domain: String, reason: String },

    // 404 Not Found
    NotFound { domain: String, reason: String },

    // 500 Internal Server Error - downstream RPC failure, surfaced verbatim
    Query { domain: String, reason: String },

    // 500 Internal Server Error - programming error, e.g. encoding an
    // unregistered variant or reading an attribute whose filter never ran
    Invariant { domain: String, reason: String },
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest { .. } => 400,
            ApiError::Bind { .. } => 400,
            ApiError::MissingType { .. } => 400,
            ApiError::UnknownType { .. } => 400,
            ApiError::Unauthorized { .. } => 401,
            ApiError::Forbidden { .. } => 403,
            ApiError::NotFound { .. } => 404,
            ApiError::Query { .. } => 500,
            ApiError::Invariant { .. } => 500,
        }
    }

    /// Service domain the error originated in
    pub fn domain(&self) -> &str {
        match self {
            ApiError::BadRequest { domain, .. }
            | ApiError::Bind { domain, .. }
            | ApiError::MissingType { domain }
            | ApiError::UnknownType { domain, .. }
            | ApiError::Unauthorized { domain, .. }
            | ApiError::Forbidden { domain, .. }
            | ApiError::NotFound { domain, .. }
            | ApiError::Query { domain, .. }
            | ApiError::Invariant { domain, .. } => domain,
        }
    }

    /// Client-facing reason line
    pub fn reason(&self) -> String {
        match self {
            ApiError::BadRequest { reason, .. }
            | ApiError::Bind { reason, .. }
            | ApiError::Unauthorized { reason, .. }
            | ApiError::Forbidden { reason, .. }
            | ApiError::NotFound { reason, .. }
            | ApiError::Query { reason, .. }
            | ApiError::Invariant { reason, .. } => reason.clone(),
            ApiError::MissingType { .. } => "missing \"@type\" discriminator".to_string(),
            ApiError::UnknownType { discriminator, .. } => {
                format!("unknown type discriminator: {}", discriminator)
            }
        }
    }

    /// Convert to the uniform JSON error envelope
    pub fn to_json(&self) -> Value {
        let reason = self.reason();
        json!({
            "code": self.status_code(),
            "message": reason,
            "errors": [{
                "domain": self.domain(),
                "reason": reason,
            }]
        })
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(domain: impl Into<String>, reason: impl Into<String>) -> Self {
        ApiError::BadRequest { domain: domain.into(), reason: reason.into() }
    }

    pub fn bind(domain: impl Into<String>, reason: impl Into<String>) -> Self {
        ApiError::Bind { domain: domain.into(), reason: reason.into() }
    }

    pub fn missing_type(domain: impl Into<String>) -> Self {
        ApiError::MissingType { domain: domain.into() }
    }

    pub fn unknown_type(domain: impl Into<String>, discriminator: impl Into<String>) -> Self {
        ApiError::UnknownType { domain: domain.into(), discriminator: discriminator.into() }
    }

    pub fn unauthorized(domain: impl Into<String>, reason: impl Into<String>) -> Self {
        ApiError::Unauthorized { domain: domain.into(), reason: reason.into() }
    }

    pub fn forbidden(domain: impl Into<String>, reason: impl Into<String>) -> Self {
        ApiError::Forbidden { domain: domain.into(), reason: reason.into() }
    }

    pub fn not_found(domain: impl Into<String>, reason: impl Into<String>) -> Self {
        ApiError::NotFound { domain: domain.into(), reason: reason.into() }
    }

    pub fn query(domain: impl Into<String>, reason: impl Into<String>) -> Self {
        ApiError::Query { domain: domain.into(), reason: reason.into() }
    }

    pub fn invariant(domain: impl Into<String>, reason: impl Into<String>) -> Self {
        ApiError::Invariant { domain: domain.into(), reason: reason.into() }
    }

    /// Map a codec failure into the taxonomy, stamped with the domain of the
    /// service whose payload was being decoded or encoded.
    pub fn envelope(domain: impl Into<String>, err: EnvelopeError) -> Self {
        let domain = domain.into();
        match err {
            EnvelopeError::MissingType => ApiError::MissingType { domain },
            EnvelopeError::UnknownType(discriminator) => {
                ApiError::UnknownType { domain, discriminator }
            }
            bind @ (EnvelopeError::NotAnObject | EnvelopeError::VariantDecode(_)) => {
                ApiError::Bind { domain, reason: bind.to_string() }
            }
            fault => ApiError::Invariant { domain, reason: fault.to_string() },
        }
    }
}

// Downstream RPC failures are forwarded as-is with their originating domain;
// retries, if any, belong to the RPC client configuration.
impl From<RpcError> for ApiError {
    fn from(err: RpcError) -> Self {
        match err {
            RpcError::NotFound { domain, detail } => ApiError::NotFound { domain, reason: detail },
            RpcError::Failed { domain, detail } => ApiError::Query { domain, reason: detail },
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.domain(), self.reason())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!("{}", self);
        }
        (status, Json(self.to_json())).into_response()
    }
}
