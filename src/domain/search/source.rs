use async_trait::async_trait;
use std::fmt::Debug;

use super::{Category, ResultItem};
use crate::domain::ApiError;

/// One logical search backend. Adapters map their raw responses into
/// `ResultItem`s of a single category, in the backend's relevance order.
#[async_trait]
pub trait SearchSource: Send + Sync + Debug {
    fn category(&self) -> Category;

    /// Source name for logging
    fn name(&self) -> &'static str;

    async fn search(&self, text: &str) -> Result<Vec<ResultItem>, ApiError>;
}
