/// How close to the bottom counts as "near the bottom", in pane rows (one
/// row per repository).
pub const NEAR_BOTTOM_THRESHOLD: u32 = 2;

/// Repositories requested per page.
pub const REPO_PAGE_SIZE: u32 = 10;

/// Users requested by a search.
pub const SEARCH_PAGE_SIZE: u32 = 5;

/// Bookkeeping for one paginated sequence.
///
/// `page_number` is the next page to request. It only advances when a page
/// is applied, so retrying after a failure asks for the same page again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationCursor {
    pub page_number: u32,
    pub page_size: u32,
    pub has_more: bool,
    pub in_flight: bool,
}

impl PaginationCursor {
    pub fn new(page_size: u32) -> Self {
        Self {
            page_number: 1,
            page_size: page_size.max(1),
            has_more: true,
            in_flight: false,
        }
    }

    fn can_request(&self) -> bool {
        self.has_more && !self.in_flight
    }

    /// Mark a request as dispatched and return the page it should fetch.
    pub fn dispatch(&mut self) -> Option<u32> {
        if !self.can_request() {
            return None;
        }
        self.in_flight = true;
        Some(self.page_number)
    }

    /// A page of `received` items arrived.
    pub fn complete(&mut self, received: usize) {
        self.in_flight = false;
        self.page_number += 1;
        if received < self.page_size as usize {
            self.has_more = false;
        }
    }

    /// The page was unusable; treat it as the end of the data.
    pub fn exhaust(&mut self) {
        self.in_flight = false;
        self.has_more = false;
    }

    pub fn fail(&mut self) {
        self.in_flight = false;
    }
}

/// Scroll position of a viewport over a list, in rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollMetrics {
    pub offset: u32,
    pub viewport: u32,
    pub total: u32,
}

impl ScrollMetrics {
    pub fn is_near_bottom(&self, threshold: u32) -> bool {
        self.offset.saturating_add(self.viewport) >= self.total.saturating_sub(threshold)
    }
}
