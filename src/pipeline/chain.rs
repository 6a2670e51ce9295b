use async_trait::async_trait;

use crate::error::ApiError;

use super::attributes::RequestAttributes;
use super::context::RequestContext;

/// One step of the pre-handler pipeline. A filter reads the request plus the
/// attributes accumulated so far, then either extends the attributes or
/// aborts the chain with a terminal error. Filters may call out to external
/// capabilities but never mutate domain state.
#[async_trait]
pub trait Filter: Send + Sync {
    /// Name used in pipeline logging.
    fn name(&self) -> &'static str;

    async fn apply(
        &self,
        ctx: &RequestContext,
        attrs: &mut RequestAttributes,
    ) -> Result<(), ApiError>;
}

/// Ordered, short-circuiting filter pipeline. Filters execute strictly in
/// the order supplied; the first failure stops the chain, and neither the
/// remaining filters nor the route handler run. Ordering is a hard contract:
/// later filters assume identity and scope are already resolved.
pub struct FilterChain {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterChain {
    pub fn new(filters: Vec<Box<dyn Filter>>) -> Self {
        Self { filters }
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub async fn run(&self, ctx: &RequestContext) -> Result<RequestAttributes, ApiError> {
        let mut attrs = RequestAttributes::new();

        for filter in &self.filters {
            match filter.apply(ctx, &mut attrs).await {
                Ok(()) => {
                    tracing::debug!("Filter '{}' completed", filter.name());
                }
                Err(error) => {
                    tracing::warn!("Filter '{}' aborted the chain: {}", filter.name(), error);
                    return Err(error);
                }
            }
        }

        Ok(attrs)
    }
}
