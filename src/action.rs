use crate::error::FetchResult;
use crate::repos::PageTicket;
use crate::search::SearchTicket;
use crate::types::{RepoPage, SearchResult};

#[derive(Debug, Clone)]
pub enum Action {
    Quit,

    // Search input
    InputChar(char),
    InputBackspace,
    Submit,
    FocusNext,

    // Result list
    SelectUp,
    SelectDown,
    ToggleExpand,
    ScrollRepos(i32),

    // Request completions
    SearchSettled {
        ticket: SearchTicket,
        outcome: FetchResult<Vec<SearchResult>>,
    },
    PageSettled {
        /// Search whose result set the card belonged to
        search_id: u64,
        ticket: PageTicket,
        outcome: FetchResult<RepoPage>,
    },

    // Polish
    OpenProfile,
    OpenRepo,
    YankUrl,

    None,
}
