use async_trait::async_trait;

use crate::error::FetchResult;
use crate::types::{RepoPage, SearchResult};

/// The remote collection the controllers page through.
#[async_trait]
pub trait Directory: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &str;

    async fn search_users(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> FetchResult<Vec<SearchResult>>;

    async fn list_user_repos(&self, owner: &str, page: u32, per_page: u32)
        -> FetchResult<RepoPage>;
}
