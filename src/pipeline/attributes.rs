use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ApiError, GATEWAY_DOMAIN};

/// Direction of a resolved sort attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        if raw.eq_ignore_ascii_case("asc") {
            Some(SortDirection::Asc)
        } else if raw.eq_ignore_ascii_case("desc") {
            Some(SortDirection::Desc)
        } else {
            None
        }
    }
}

/// Typed values attached by the filter chain. Each field is written by
/// exactly one filter; the checked accessors are what handlers use, so a
/// value whose producing filter never ran surfaces as an internal fault
/// instead of a silent default. The chain either completes fully or aborts
/// before the handler, so handlers never see a partial set.
#[derive(Debug, Clone, Default)]
pub struct RequestAttributes {
    pub(crate) user_id: Option<Uuid>,
    pub(crate) org_id: Option<Uuid>,
    pub(crate) team_id: Option<Uuid>,
    pub(crate) paginate_limit: Option<i64>,
    pub(crate) paginate_offset: Option<i64>,
    pub(crate) sort_field: Option<String>,
    pub(crate) sort_direction: Option<SortDirection>,
}

impl RequestAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_id(&self) -> Result<Uuid, ApiError> {
        self.user_id.ok_or_else(|| missing("user_id"))
    }

    pub fn org_id(&self) -> Result<Uuid, ApiError> {
        self.org_id.ok_or_else(|| missing("org_id"))
    }

    /// Team scope is genuinely optional: not every member belongs to a team.
    pub fn team_id(&self) -> Option<Uuid> {
        self.team_id
    }

    pub fn paginate_limit(&self) -> Result<i64, ApiError> {
        self.paginate_limit.ok_or_else(|| missing("paginate_limit"))
    }

    pub fn paginate_offset(&self) -> Result<i64, ApiError> {
        self.paginate_offset.ok_or_else(|| missing("paginate_offset"))
    }

    pub fn sort_field(&self) -> Result<&str, ApiError> {
        self.sort_field.as_deref().ok_or_else(|| missing("sort_field"))
    }

    pub fn sort_direction(&self) -> Result<SortDirection, ApiError> {
        self.sort_direction.ok_or_else(|| missing("sort_direction"))
    }
}

fn missing(attribute: &str) -> ApiError {
    ApiError::invariant(
        GATEWAY_DOMAIN,
        format!("attribute '{}' read before its filter ran", attribute),
    )
}
