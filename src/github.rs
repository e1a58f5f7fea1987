use async_trait::async_trait;
use tracing::{debug, warn};

use crate::directory::Directory;
use crate::error::{AppError, FetchError, FetchResult, Result};
use crate::types::{RepoPage, RepositoryItem, SearchResponse, SearchResult};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

pub struct GitHub {
    client: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

impl std::fmt::Debug for GitHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHub")
            .field("api_url", &self.api_url)
            .field("authenticated", &self.token.is_some())
            .finish_non_exhaustive()
    }
}

impl GitHub {
    /// `token` is sent as a bearer credential when present; without it
    /// requests go out unauthenticated and hit the stricter rate limit.
    pub fn new(api_url: impl Into<String>, token: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("ghseek")
            .build()
            .map_err(|e| AppError::Client(e.to_string()))?;

        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let builder = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github+json");
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send the request and return the body of a 2xx response.
    async fn fetch_body(&self, request: reqwest::RequestBuilder) -> FetchResult<String> {
        let response = request.send().await?;
        let status = response.status();
        if let Some(err) = FetchError::from_status(status) {
            warn!(%status, "GitHub request failed");
            return Err(err);
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl Directory for GitHub {
    fn name(&self) -> &str {
        "GitHub"
    }

    async fn search_users(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> FetchResult<Vec<SearchResult>> {
        let url = format!("{}/search/users", self.api_url);
        debug!(query, page, per_page, "searching users");
        let request = self.get(&url).query(&[
            ("q", query.to_string()),
            ("page", page.to_string()),
            ("per_page", per_page.to_string()),
        ]);

        let body = self.fetch_body(request).await?;
        let response: SearchResponse = serde_json::from_str(&body)
            .map_err(|e| FetchError::MalformedResponse(e.to_string()))?;
        Ok(response.items)
    }

    async fn list_user_repos(
        &self,
        owner: &str,
        page: u32,
        per_page: u32,
    ) -> FetchResult<RepoPage> {
        let url = format!(
            "{}/users/{}/repos",
            self.api_url,
            urlencoding::encode(owner)
        );
        debug!(owner, page, per_page, "listing repositories");
        let request = self.get(&url).query(&[
            ("page", page.to_string()),
            ("per_page", per_page.to_string()),
        ]);

        let body = self.fetch_body(request).await?;
        Ok(parse_repo_page(&body))
    }
}

/// Anything other than a JSON array of repositories ends the listing.
fn parse_repo_page(body: &str) -> RepoPage {
    let value = match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "repository page is not JSON");
            return RepoPage::Malformed;
        }
    };

    if !value.is_array() {
        warn!("repository page is not an array");
        return RepoPage::Malformed;
    }

    match serde_json::from_value::<Vec<RepositoryItem>>(value) {
        Ok(items) => RepoPage::Items(items),
        Err(e) => {
            warn!(error = %e, "repository page has unexpected entries");
            RepoPage::Malformed
        }
    }
}
