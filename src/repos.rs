use tracing::{debug, warn};

use crate::directory::Directory;
use crate::error::{FetchError, FetchResult};
use crate::pagination::{PaginationCursor, ScrollMetrics, NEAR_BOTTOM_THRESHOLD, REPO_PAGE_SIZE};
use crate::types::{RepoPage, RepositoryItem};

/// Identifies one dispatched page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTicket {
    pub owner: String,
    pub page: u32,
    pub per_page: u32,
    generation: u64,
}

/// Lazily paginated repository listing for one owner.
///
/// Nothing is fetched until the list is expanded. Pages are appended in
/// arrival order and a short or malformed page ends the listing.
#[derive(Debug)]
pub struct RepoList {
    owner: String,
    items: Vec<RepositoryItem>,
    cursor: PaginationCursor,
    error: Option<FetchError>,
    expanded: bool,
    threshold: u32,
    /// Bumped on every reset so responses for an older sequence are dropped.
    generation: u64,
}

impl RepoList {
    pub fn new(owner: impl Into<String>) -> Self {
        Self::with_page_size(owner, REPO_PAGE_SIZE)
    }

    pub fn with_page_size(owner: impl Into<String>, page_size: u32) -> Self {
        Self {
            owner: owner.into(),
            items: Vec::new(),
            cursor: PaginationCursor::new(page_size),
            error: None,
            expanded: false,
            threshold: NEAR_BOTTOM_THRESHOLD,
            generation: 0,
        }
    }

    pub fn with_threshold(mut self, threshold: u32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn items(&self) -> &[RepositoryItem] {
        &self.items
    }

    pub fn loading(&self) -> bool {
        self.cursor.in_flight
    }

    pub fn has_more(&self) -> bool {
        self.cursor.has_more
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Bind the list to `owner`. Rebinding to a different owner starts
    /// over; rebinding to the same owner keeps everything.
    pub fn activate(&mut self, owner: &str) {
        if self.owner == owner {
            return;
        }
        debug!(from = %self.owner, to = owner, "repository list rebound");
        self.owner = owner.to_string();
        self.items.clear();
        self.error = None;
        self.expanded = false;
        self.restart();
    }

    fn restart(&mut self) {
        self.cursor = PaginationCursor::new(self.cursor.page_size);
        self.generation += 1;
    }

    /// Flip between collapsed and expanded. Expanding a list with no items
    /// starts again from page 1 and returns that request.
    pub fn toggle_expand(&mut self) -> Option<PageTicket> {
        self.expanded = !self.expanded;
        if !self.expanded || !self.items.is_empty() || self.cursor.in_flight {
            return None;
        }
        self.restart();
        self.load_next_page()
    }

    /// Request the next page unless one is already in flight or the
    /// listing is exhausted.
    pub fn load_next_page(&mut self) -> Option<PageTicket> {
        let page = self.cursor.dispatch()?;
        self.error = None;
        debug!(owner = %self.owner, page, "repository page dispatched");
        Some(PageTicket {
            owner: self.owner.clone(),
            page,
            per_page: self.cursor.page_size,
            generation: self.generation,
        })
    }

    /// Scroll signal from the expanded pane. Near the bottom it asks for
    /// the next page.
    pub fn on_scroll(&mut self, metrics: ScrollMetrics) -> Option<PageTicket> {
        if !self.expanded || !metrics.is_near_bottom(self.threshold) {
            return None;
        }
        self.load_next_page()
    }

    /// Apply the outcome of `ticket`. Returns false when the ticket belongs
    /// to another owner or an older sequence.
    pub fn settle(&mut self, ticket: &PageTicket, outcome: FetchResult<RepoPage>) -> bool {
        if ticket.owner != self.owner || ticket.generation != self.generation {
            debug!(
                owner = %ticket.owner,
                page = ticket.page,
                "dropping stale repository page"
            );
            return false;
        }

        match outcome {
            Ok(RepoPage::Items(items)) => {
                debug!(owner = %self.owner, page = ticket.page, received = items.len(), "repository page loaded");
                self.cursor.complete(items.len());
                self.items.extend(items);
            }
            Ok(RepoPage::Malformed) => {
                warn!(owner = %self.owner, page = ticket.page, "malformed repository page, treating as end of data");
                self.cursor.exhaust();
            }
            Err(err) => {
                warn!(owner = %self.owner, page = ticket.page, error = %err, "repository page failed");
                self.cursor.fail();
                self.error = Some(err);
            }
        }
        true
    }

    /// Fetch `ticket` from `directory` and apply it.
    pub async fn fetch(&mut self, directory: &dyn Directory, ticket: PageTicket) {
        let outcome = run(directory, &ticket).await;
        self.settle(&ticket, outcome);
    }

    /// `load_next_page` followed by `fetch`.
    pub async fn load_next(&mut self, directory: &dyn Directory) {
        if let Some(ticket) = self.load_next_page() {
            self.fetch(directory, ticket).await;
        }
    }
}

/// Perform the request for `ticket` without touching list state.
pub async fn run(directory: &dyn Directory, ticket: &PageTicket) -> FetchResult<RepoPage> {
    directory
        .list_user_repos(&ticket.owner, ticket.page, ticket.per_page)
        .await
}
