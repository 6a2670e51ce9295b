use async_trait::async_trait;

use crate::config::PaginationConfig;
use crate::error::{ApiError, GATEWAY_DOMAIN};
use crate::pipeline::attributes::RequestAttributes;
use crate::pipeline::chain::Filter;
use crate::pipeline::context::RequestContext;

/// Derives `paginate_limit`/`paginate_offset` from the `limit` and `offset`
/// query parameters. Missing values take the configured defaults; a limit
/// above the configured maximum is clamped; negative or non-numeric values
/// are rejected.
pub struct Paginate {
    config: PaginationConfig,
}

impl Paginate {
    pub fn new(config: PaginationConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Filter for Paginate {
    fn name(&self) -> &'static str {
        "paginate"
    }

    async fn apply(
        &self,
        ctx: &RequestContext,
        attrs: &mut RequestAttributes,
    ) -> Result<(), ApiError> {
        let limit = match ctx.query("limit") {
            Some(raw) if !raw.is_empty() => {
                parse_non_negative(raw, "limit")?.min(self.config.max_limit)
            }
            _ => self.config.default_limit,
        };

        let offset = match ctx.query("offset") {
            Some(raw) if !raw.is_empty() => parse_non_negative(raw, "offset")?,
            _ => 0,
        };

        attrs.paginate_limit = Some(limit);
        attrs.paginate_offset = Some(offset);
        Ok(())
    }
}

fn parse_non_negative(raw: &str, name: &str) -> Result<i64, ApiError> {
    match raw.parse::<i64>() {
        Ok(value) if value >= 0 => Ok(value),
        _ => Err(ApiError::bad_request(
            GATEWAY_DOMAIN,
            format!("invalid {} parameter: {}", name, raw),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::request_context;

    fn filter() -> Paginate {
        Paginate::new(PaginationConfig { default_limit: 10, max_limit: 100 })
    }

    async fn run(uri: &str) -> Result<RequestAttributes, ApiError> {
        let mut attrs = RequestAttributes::new();
        filter().apply(&request_context(uri), &mut attrs).await?;
        Ok(attrs)
    }

    #[tokio::test]
    async fn missing_parameters_take_defaults() {
        let attrs = run("/x").await.unwrap();
        assert_eq!(attrs.paginate_limit().unwrap(), 10);
        assert_eq!(attrs.paginate_offset().unwrap(), 0);
    }

    #[tokio::test]
    async fn explicit_values_are_attached() {
        let attrs = run("/x?limit=10&offset=0").await.unwrap();
        assert_eq!(attrs.paginate_limit().unwrap(), 10);
        assert_eq!(attrs.paginate_offset().unwrap(), 0);

        let attrs = run("/x?limit=25&offset=50").await.unwrap();
        assert_eq!(attrs.paginate_limit().unwrap(), 25);
        assert_eq!(attrs.paginate_offset().unwrap(), 50);
    }

    #[tokio::test]
    async fn oversized_limit_is_clamped_to_the_maximum() {
        let attrs = run("/x?limit=5000").await.unwrap();
        assert_eq!(attrs.paginate_limit().unwrap(), 100);
    }

    #[tokio::test]
    async fn negative_values_are_rejected() {
        assert!(matches!(run("/x?limit=-1").await, Err(ApiError::BadRequest { .. })));
        assert!(matches!(run("/x?offset=-5").await, Err(ApiError::BadRequest { .. })));
    }

    #[tokio::test]
    async fn non_numeric_values_are_rejected() {
        assert!(matches!(run("/x?limit=ten").await, Err(ApiError::BadRequest { .. })));
    }

    #[tokio::test]
    async fn zero_limit_is_allowed() {
        let attrs = run("/x?limit=0").await.unwrap();
        assert_eq!(attrs.paginate_limit().unwrap(), 0);
    }
}
