use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;
use tracing::debug;

use crate::action::Action;
use crate::directory::Directory;
use crate::event::Event;
use crate::pagination::ScrollMetrics;
use crate::repos::{self, PageTicket, RepoList};
use crate::search::{self, SearchController, SearchTicket};
use crate::types::SearchResult;

/// Longest query the input box accepts
pub const MAX_QUERY_LEN: usize = 35;

/// Repository rows visible in an expanded card
pub const REPO_VIEWPORT: u16 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    Results,
}

/// One search result together with its lazily loaded repositories
#[derive(Debug)]
pub struct UserCard {
    pub user: SearchResult,
    pub repos: RepoList,
    /// First repository row shown in the pane
    pub scroll_offset: usize,
}

impl UserCard {
    fn new(user: SearchResult, threshold: u32) -> Self {
        let repos = RepoList::new(user.handle.clone()).with_threshold(threshold);
        Self {
            user,
            repos,
            scroll_offset: 0,
        }
    }

    fn scroll_metrics(&self) -> ScrollMetrics {
        ScrollMetrics {
            offset: self.scroll_offset as u32,
            viewport: REPO_VIEWPORT as u32,
            total: self.repos.items().len() as u32,
        }
    }

    fn top_repo_url(&self) -> Option<&str> {
        self.repos
            .items()
            .get(self.scroll_offset)
            .map(|repo| repo.html_ref.as_str())
    }
}

pub struct App {
    pub focus: Focus,
    pub input: String,
    pub search: SearchController,
    pub cards: Vec<UserCard>,
    pub selected: usize,
    /// Short-lived message for the status bar (clipboard, browser)
    pub notice: Option<String>,
    pub should_quit: bool,
    scroll_threshold: u32,
    directory: Arc<dyn Directory>,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl App {
    pub fn new(
        directory: Arc<dyn Directory>,
        scroll_threshold: u32,
        action_tx: mpsc::UnboundedSender<Action>,
    ) -> Self {
        Self {
            focus: Focus::Input,
            input: String::new(),
            search: SearchController::new(),
            cards: Vec::new(),
            selected: 0,
            notice: None,
            should_quit: false,
            scroll_threshold,
            directory,
            action_tx,
        }
    }

    pub fn directory_name(&self) -> &str {
        self.directory.name()
    }

    pub fn selected_card(&self) -> Option<&UserCard> {
        self.cards.get(self.selected)
    }

    pub fn handle_event(&self, event: Event) -> Action {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Scroll(delta) if self.focus == Focus::Results => Action::ScrollRepos(delta),
            _ => Action::None,
        }
    }

    fn handle_key(&self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Tab | KeyCode::BackTab => return Action::FocusNext,
            KeyCode::Esc => return Action::Quit,
            _ => {}
        }

        match self.focus {
            Focus::Input => match key.code {
                KeyCode::Enter => Action::Submit,
                KeyCode::Backspace => Action::InputBackspace,
                KeyCode::Down => Action::FocusNext,
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    Action::InputChar(c)
                }
                _ => Action::None,
            },
            Focus::Results => match key.code {
                KeyCode::Char('q') => Action::Quit,
                KeyCode::Char('/') => Action::FocusNext,
                KeyCode::Char('j') | KeyCode::Down => Action::SelectDown,
                KeyCode::Char('k') | KeyCode::Up => Action::SelectUp,
                KeyCode::Enter | KeyCode::Char(' ') => Action::ToggleExpand,
                KeyCode::Char('J') | KeyCode::PageDown => Action::ScrollRepos(1),
                KeyCode::Char('K') | KeyCode::PageUp => Action::ScrollRepos(-1),
                KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    Action::ScrollRepos(i32::from(REPO_VIEWPORT / 2))
                }
                KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    Action::ScrollRepos(-i32::from(REPO_VIEWPORT / 2))
                }
                KeyCode::Char('o') => Action::OpenProfile,
                KeyCode::Char('O') => Action::OpenRepo,
                KeyCode::Char('y') => Action::YankUrl,
                _ => Action::None,
            },
        }
    }

    pub fn update(&mut self, action: Action) {
        if !matches!(
            action,
            Action::None | Action::SearchSettled { .. } | Action::PageSettled { .. }
        ) {
            self.notice = None;
        }

        match action {
            Action::Quit => {
                self.should_quit = true;
            }
            Action::InputChar(c) => {
                if self.input.chars().count() < MAX_QUERY_LEN {
                    self.input.push(c);
                }
            }
            Action::InputBackspace => {
                self.input.pop();
            }
            Action::Submit => {
                if let Some(ticket) = self.search.begin(&self.input) {
                    self.input = ticket.query.clone();
                    self.spawn_search(ticket);
                }
            }
            Action::FocusNext => {
                self.focus = match self.focus {
                    Focus::Input if !self.cards.is_empty() => Focus::Results,
                    _ => Focus::Input,
                };
            }
            Action::SelectUp => {
                self.selected = self.selected.saturating_sub(1);
            }
            Action::SelectDown => {
                if self.selected + 1 < self.cards.len() {
                    self.selected += 1;
                }
            }
            Action::ToggleExpand => {
                let ticket = self
                    .cards
                    .get_mut(self.selected)
                    .and_then(|card| card.repos.toggle_expand());
                if let Some(ticket) = ticket {
                    self.spawn_load_page(ticket);
                }
            }
            Action::ScrollRepos(delta) => {
                let ticket = self
                    .cards
                    .get_mut(self.selected)
                    .filter(|card| card.repos.is_expanded())
                    .and_then(|card| {
                        let max_offset = card
                            .repos
                            .items()
                            .len()
                            .saturating_sub(REPO_VIEWPORT as usize);
                        let offset = (card.scroll_offset as i64 + i64::from(delta))
                            .clamp(0, max_offset as i64);
                        card.scroll_offset = offset as usize;
                        let metrics = card.scroll_metrics();
                        card.repos.on_scroll(metrics)
                    });
                if let Some(ticket) = ticket {
                    self.spawn_load_page(ticket);
                }
            }
            Action::SearchSettled { ticket, outcome } => {
                let previous = self.search.results_id();
                if self.search.settle(&ticket, outcome) && self.search.results_id() != previous {
                    self.rebuild_cards();
                }
            }
            Action::PageSettled {
                search_id,
                ticket,
                outcome,
            } => {
                if search_id != self.search.results_id() {
                    debug!(owner = %ticket.owner, "dropping page for a superseded search");
                    return;
                }
                if let Some(card) = self
                    .cards
                    .iter_mut()
                    .find(|card| card.repos.owner() == ticket.owner)
                {
                    card.repos.settle(&ticket, outcome);
                }
            }
            Action::OpenProfile => {
                if let Some(url) = self.selected_card().map(|c| c.user.profile_ref.clone()) {
                    self.open_url(&url);
                }
            }
            Action::OpenRepo => {
                if let Some(url) = self
                    .selected_card()
                    .filter(|c| c.repos.is_expanded())
                    .and_then(|c| c.top_repo_url())
                    .map(str::to_string)
                {
                    self.open_url(&url);
                }
            }
            Action::YankUrl => {
                if let Some(url) = self.yank_target() {
                    match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(&url)) {
                        Ok(()) => self.notice = Some(format!("Copied {}", url)),
                        Err(e) => self.notice = Some(format!("Clipboard error: {}", e)),
                    }
                }
            }
            Action::None => {}
        }
    }

    fn rebuild_cards(&mut self) {
        self.cards = self
            .search
            .results
            .iter()
            .cloned()
            .map(|user| UserCard::new(user, self.scroll_threshold))
            .collect();
        self.selected = 0;
        if self.cards.is_empty() {
            self.focus = Focus::Input;
        }
    }

    /// URL of the top visible repository when the card is expanded,
    /// otherwise the user's profile.
    fn yank_target(&self) -> Option<String> {
        let card = self.selected_card()?;
        let url = if card.repos.is_expanded() {
            card.top_repo_url().unwrap_or(card.user.profile_ref.as_str())
        } else {
            card.user.profile_ref.as_str()
        };
        Some(url.to_string())
    }

    fn open_url(&mut self, url: &str) {
        if let Err(e) = open::that(url) {
            self.notice = Some(format!("Could not open browser: {}", e));
        }
    }

    fn spawn_search(&self, ticket: SearchTicket) {
        let tx = self.action_tx.clone();
        let directory = Arc::clone(&self.directory);
        tokio::spawn(async move {
            let outcome = search::run(directory.as_ref(), &ticket).await;
            tx.send(Action::SearchSettled { ticket, outcome }).ok();
        });
    }

    fn spawn_load_page(&self, ticket: PageTicket) {
        let tx = self.action_tx.clone();
        let directory = Arc::clone(&self.directory);
        let search_id = self.search.results_id();
        tokio::spawn(async move {
            let outcome = repos::run(directory.as_ref(), &ticket).await;
            tx.send(Action::PageSettled {
                search_id,
                ticket,
                outcome,
            })
            .ok();
        });
    }
}
