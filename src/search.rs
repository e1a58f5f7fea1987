use tracing::{debug, warn};

use crate::directory::Directory;
use crate::error::{FetchError, FetchResult};
use crate::pagination::SEARCH_PAGE_SIZE;
use crate::types::SearchResult;

/// Identifies one dispatched search. Only the latest ticket may settle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub id: u64,
    pub query: String,
}

/// State behind the search form: the current result set, the label of the
/// last successful search, and the outcome of the latest request.
#[derive(Debug, Default)]
pub struct SearchController {
    pub results: Vec<SearchResult>,
    pub submitted_label: Option<String>,
    pub loading: bool,
    pub error: Option<FetchError>,
    latest: u64,
    /// Ticket id that produced `results`
    results_id: u64,
}

impl SearchController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticket id of the search that produced the current results.
    pub fn results_id(&self) -> u64 {
        self.results_id
    }

    /// Start a search. A blank query is ignored and leaves state untouched.
    pub fn begin(&mut self, query: &str) -> Option<SearchTicket> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }

        self.latest += 1;
        self.loading = true;
        self.error = None;
        debug!(query, ticket = self.latest, "search dispatched");

        Some(SearchTicket {
            id: self.latest,
            query: query.to_string(),
        })
    }

    /// Apply the outcome of `ticket`. Returns false if a newer search has
    /// been dispatched since, in which case nothing changes.
    pub fn settle(&mut self, ticket: &SearchTicket, outcome: FetchResult<Vec<SearchResult>>) -> bool {
        if ticket.id != self.latest {
            debug!(
                ticket = ticket.id,
                latest = self.latest,
                "dropping stale search response"
            );
            return false;
        }

        self.loading = false;
        match outcome {
            Ok(results) => {
                self.results = results;
                self.results_id = ticket.id;
                self.submitted_label = Some(ticket.query.clone());
                self.error = None;
            }
            Err(err) => {
                warn!(query = %ticket.query, error = %err, "search failed");
                self.error = Some(err);
            }
        }
        true
    }

    /// Run one search to completion against `directory`.
    pub async fn search(&mut self, directory: &dyn Directory, query: &str) {
        let Some(ticket) = self.begin(query) else {
            return;
        };
        let outcome = run(directory, &ticket).await;
        self.settle(&ticket, outcome);
    }
}

/// Perform the request for `ticket`. Kept free of controller state so the
/// app can run it on a spawned task.
pub async fn run(directory: &dyn Directory, ticket: &SearchTicket) -> FetchResult<Vec<SearchResult>> {
    directory
        .search_users(&ticket.query, 1, SEARCH_PAGE_SIZE)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::fake::{user, Call, FakeDirectory};

    #[tokio::test]
    async fn trimmed_query_dispatches_exactly_once() {
        let directory = FakeDirectory::new();
        directory.push_search(Ok(vec![user(1, "octocat")]));
        let mut search = SearchController::new();

        search.search(&directory, "  octocat \t").await;

        assert_eq!(
            directory.calls(),
            vec![Call::Search {
                query: "octocat".to_string(),
                page: 1,
                per_page: 5,
            }]
        );
        assert_eq!(search.submitted_label.as_deref(), Some("octocat"));
    }

    #[tokio::test]
    async fn whitespace_query_is_a_silent_noop() {
        let directory = FakeDirectory::new();
        let mut search = SearchController::new();
        search.results = vec![user(7, "kept")];

        search.search(&directory, "   \n ").await;
        search.search(&directory, "").await;

        assert!(directory.calls().is_empty());
        assert_eq!(search.results, vec![user(7, "kept")]);
        assert!(!search.loading);
        assert_eq!(search.error, None);
        assert_eq!(search.submitted_label, None);
    }

    #[tokio::test]
    async fn success_replaces_results() {
        let directory = FakeDirectory::new();
        directory.push_search(Ok(vec![user(1, "octocat")]));
        directory.push_search(Ok(vec![user(2, "torvalds"), user(3, "tor")]));
        let mut search = SearchController::new();

        search.search(&directory, "octocat").await;
        search.search(&directory, "tor").await;

        assert_eq!(search.results, vec![user(2, "torvalds"), user(3, "tor")]);
        assert_eq!(search.submitted_label.as_deref(), Some("tor"));
    }

    #[tokio::test]
    async fn rate_limit_keeps_previous_results() {
        let directory = FakeDirectory::new();
        directory.push_search(Ok(vec![user(1, "octocat")]));
        directory.push_search(Err(FetchError::RateLimited));
        let mut search = SearchController::new();

        search.search(&directory, "octocat").await;
        search.search(&directory, "someone else").await;

        assert_eq!(search.error, Some(FetchError::RateLimited));
        assert_eq!(search.results, vec![user(1, "octocat")]);
        assert_eq!(search.submitted_label.as_deref(), Some("octocat"));
        assert!(!search.loading);
    }

    #[tokio::test]
    async fn error_then_success_clears_error() {
        let directory = FakeDirectory::new();
        directory.push_search(Err(FetchError::Unauthorized));
        directory.push_search(Ok(vec![]));
        let mut search = SearchController::new();

        search.search(&directory, "octocat").await;
        assert_eq!(search.error, Some(FetchError::Unauthorized));

        search.search(&directory, "octocat").await;
        assert_eq!(search.error, None);
        assert!(search.results.is_empty());
    }

    #[test]
    fn begin_clears_error_and_sets_loading() {
        let mut search = SearchController::new();
        search.error = Some(FetchError::NetworkFailure("offline".to_string()));

        let ticket = search.begin(" rust ").unwrap();

        assert_eq!(ticket.query, "rust");
        assert!(search.loading);
        assert_eq!(search.error, None);
    }

    #[test]
    fn every_outcome_clears_loading() {
        let outcomes = vec![
            Ok(vec![]),
            Err(FetchError::Unauthorized),
            Err(FetchError::RateLimited),
            Err(FetchError::Http {
                status: 500,
                status_text: "Internal Server Error".to_string(),
            }),
            Err(FetchError::NetworkFailure("reset".to_string())),
            Err(FetchError::MalformedResponse("eof".to_string())),
        ];

        for outcome in outcomes {
            let mut search = SearchController::new();
            let ticket = search.begin("octocat").unwrap();
            assert!(search.settle(&ticket, outcome));
            assert!(!search.loading);
        }
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut search = SearchController::new();
        let slow = search.begin("first").unwrap();
        let fast = search.begin("second").unwrap();

        assert!(search.settle(&fast, Ok(vec![user(2, "second")])));
        assert!(!search.settle(&slow, Ok(vec![user(1, "first")])));

        assert_eq!(search.results, vec![user(2, "second")]);
        assert_eq!(search.submitted_label.as_deref(), Some("second"));
        assert_eq!(search.results_id(), fast.id);
    }

    #[test]
    fn loading_stays_until_latest_settles() {
        let mut search = SearchController::new();
        let first = search.begin("first").unwrap();
        let second = search.begin("second").unwrap();

        search.settle(&first, Err(FetchError::RateLimited));
        assert!(search.loading);
        assert_eq!(search.error, None);

        search.settle(&second, Ok(vec![]));
        assert!(!search.loading);
    }
}
