use async_trait::async_trait;

use crate::error::{ApiError, GATEWAY_DOMAIN};
use crate::pipeline::attributes::{RequestAttributes, SortDirection};
use crate::pipeline::chain::Filter;
use crate::pipeline::context::RequestContext;

/// Derives `sort_field`/`sort_direction` from the `sort` and `dir` query
/// parameters against the route's allowed field set. A missing `sort` takes
/// the route's default field; a missing `dir` defaults to ascending.
pub struct SortFilter {
    allowed: Vec<String>,
    default_field: String,
}

impl SortFilter {
    pub fn new(allowed: &[&str], default_field: &str) -> Self {
        Self {
            allowed: allowed.iter().map(|f| f.to_string()).collect(),
            default_field: default_field.to_string(),
        }
    }
}

#[async_trait]
impl Filter for SortFilter {
    fn name(&self) -> &'static str {
        "sort"
    }

    async fn apply(
        &self,
        ctx: &RequestContext,
        attrs: &mut RequestAttributes,
    ) -> Result<(), ApiError> {
        let field = match ctx.query("sort") {
            Some(raw) if !raw.is_empty() => {
                if !self.allowed.iter().any(|f| f == raw) {
                    return Err(ApiError::bad_request(
                        GATEWAY_DOMAIN,
                        format!("cannot sort by '{}'", raw),
                    ));
                }
                raw.to_string()
            }
            _ => self.default_field.clone(),
        };

        let direction = match ctx.query("dir") {
            Some(raw) if !raw.is_empty() => SortDirection::parse(raw).ok_or_else(|| {
                ApiError::bad_request(GATEWAY_DOMAIN, format!("invalid sort direction: {}", raw))
            })?,
            _ => SortDirection::Asc,
        };

        attrs.sort_field = Some(field);
        attrs.sort_direction = Some(direction);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::request_context;

    fn filter() -> SortFilter {
        SortFilter::new(&["name", "created"], "created")
    }

    async fn run(uri: &str) -> Result<RequestAttributes, ApiError> {
        let mut attrs = RequestAttributes::new();
        filter().apply(&request_context(uri), &mut attrs).await?;
        Ok(attrs)
    }

    #[tokio::test]
    async fn allowed_field_and_direction_are_attached() {
        let attrs = run("/x?sort=name&dir=DESC").await.unwrap();
        assert_eq!(attrs.sort_field().unwrap(), "name");
        assert_eq!(attrs.sort_direction().unwrap(), SortDirection::Desc);
    }

    #[tokio::test]
    async fn unknown_field_is_rejected() {
        assert!(matches!(run("/x?sort=not_a_field").await, Err(ApiError::BadRequest { .. })));
    }

    #[tokio::test]
    async fn missing_direction_defaults_to_ascending() {
        let attrs = run("/x?sort=name").await.unwrap();
        assert_eq!(attrs.sort_direction().unwrap(), SortDirection::Asc);
    }

    #[tokio::test]
    async fn missing_field_takes_the_route_default() {
        let attrs = run("/x").await.unwrap();
        assert_eq!(attrs.sort_field().unwrap(), "created");
        assert_eq!(attrs.sort_direction().unwrap(), SortDirection::Asc);
    }

    #[tokio::test]
    async fn direction_is_case_insensitive() {
        let attrs = run("/x?sort=name&dir=desc").await.unwrap();
        assert_eq!(attrs.sort_direction().unwrap(), SortDirection::Desc);
    }

    #[tokio::test]
    async fn invalid_direction_is_rejected() {
        assert!(matches!(run("/x?sort=name&dir=sideways").await, Err(ApiError::BadRequest { .. })));
    }
}
