use std::sync::Arc;

use crate::envelope::TypeRegistry;
use crate::models::{ContentItem, SurveyAnswer};
use crate::pipeline::FilterChain;
use crate::rpc::RpcClient;

/// Everything the routes need, constructed once at startup and cloned into
/// each handler via axum state. The registries and the filter chain are
/// built in `main` and passed by reference; nothing here is a process-wide
/// mutable global.
#[derive(Clone)]
pub struct AppState {
    pub content: Arc<TypeRegistry<ContentItem>>,
    pub surveys: Arc<TypeRegistry<SurveyAnswer>>,
    pub chain: Arc<FilterChain>,
    pub rpc: Arc<dyn RpcClient>,
}
