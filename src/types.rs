use serde::{Deserialize, Serialize};

/// A user returned by the search endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: u64,
    #[serde(rename = "login")]
    pub handle: String,
    #[serde(rename = "avatar_url", default)]
    pub avatar_ref: String,
    #[serde(rename = "html_url", default)]
    pub profile_ref: String,
}

/// Body of `GET /search/users`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub items: Vec<SearchResult>,
}

/// One repository in a user's listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryItem {
    pub id: u64,
    pub name: String,
    #[serde(rename = "html_url", default)]
    pub html_ref: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "stargazers_count", default)]
    pub star_count: u64,
}

/// What a successful repository page request produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoPage {
    Items(Vec<RepositoryItem>),
    /// 2xx with a body that is not a list of repositories
    Malformed,
}
