use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::{App, Focus, UserCard, REPO_VIEWPORT};

/// Header row + bordered pane with the repo rows and one status row
const PANE_HEIGHT: u16 = REPO_VIEWPORT + 3;

fn card_height(card: &UserCard) -> u16 {
    if card.repos.is_expanded() {
        1 + PANE_HEIGHT
    } else {
        1
    }
}

/// Index of the first card to draw so the selected one fits in `height`.
fn first_visible(app: &App, height: u16) -> usize {
    let mut used = 0u16;
    let mut first = app.selected;
    for (i, card) in app.cards.iter().enumerate().take(app.selected + 1).rev() {
        used = used.saturating_add(card_height(card));
        if used > height && i != app.selected {
            break;
        }
        first = i;
    }
    first
}

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let mut y = area.y;
    let bottom = area.bottom();

    for (i, card) in app.cards.iter().enumerate().skip(first_visible(app, area.height)) {
        if y >= bottom {
            break;
        }
        let selected = i == app.selected && app.focus == Focus::Results;
        render_card_header(frame, card, selected, Rect::new(area.x, y, area.width, 1));
        y += 1;

        if card.repos.is_expanded() && y < bottom {
            let height = PANE_HEIGHT.min(bottom - y);
            let pane = Rect::new(area.x + 2, y, area.width.saturating_sub(2), height);
            render_repo_pane(frame, card, pane);
            y += height;
        }
    }
}

fn render_card_header(frame: &mut Frame, card: &UserCard, selected: bool, area: Rect) {
    let chevron = if card.repos.is_expanded() { "▾" } else { "▸" };
    let style = if selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    let line = Line::from(vec![
        Span::styled(format!("{} ", chevron), Style::default().fg(Color::Gray)),
        Span::styled(card.user.handle.clone(), style),
        Span::raw("  "),
        Span::styled(
            card.user.profile_ref.clone(),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_repo_pane(frame: &mut Frame, card: &UserCard, area: Rect) {
    let repos = &card.repos;
    let width = area.width.saturating_sub(2) as usize;
    let name_width = 30.min(width / 2).max(1);

    let mut lines: Vec<Line> = repos
        .items()
        .iter()
        .skip(card.scroll_offset)
        .take(REPO_VIEWPORT as usize)
        .map(|repo| {
            let name = truncate(&repo.name, name_width);
            let stars = format!("★ {:>5}", repo.star_count);
            let desc_width = width.saturating_sub(name_width + stars.chars().count() + 4);
            let description = repo
                .description
                .as_deref()
                .map(|d| truncate(d, desc_width))
                .unwrap_or_default();
            Line::from(vec![
                Span::styled(
                    format!("{:<name_width$}", name),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled(stars, Style::default().fg(Color::Yellow)),
                Span::raw("  "),
                Span::styled(description, Style::default().fg(Color::Gray)),
            ])
        })
        .collect();

    while lines.len() < REPO_VIEWPORT as usize {
        lines.push(Line::default());
    }
    lines.push(status_line(card));

    let title = if repos.has_more() {
        format!("Repositories ({})", repos.items().len())
    } else {
        format!("Repositories ({}, all loaded)", repos.items().len())
    };
    let pane = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(pane, area);
}

fn status_line(card: &UserCard) -> Line<'static> {
    let repos = &card.repos;
    if repos.loading() {
        Line::from(Span::styled(
            "Loading...",
            Style::default().fg(Color::DarkGray),
        ))
    } else if let Some(err) = repos.error() {
        Line::from(Span::styled(
            format!("Error: {}", err),
            Style::default().fg(Color::Red),
        ))
    } else if repos.items().is_empty() {
        Line::from(Span::styled(
            "No repositories.",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::default()
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(3);
    format!("{}...", text.chars().take(keep).collect::<String>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::app::App;
    use crate::directory::fake::{repos, user};
    use crate::error::FetchError;
    use crate::types::{RepoPage, RepositoryItem};
    use crate::ui::test_support::{app, draw};

    fn searched(handles: &[&str]) -> App {
        let mut app = app();
        let ticket = app.search.begin("octo").unwrap();
        let users = handles
            .iter()
            .enumerate()
            .map(|(i, h)| user(i as u64 + 1, h))
            .collect();
        app.update(Action::SearchSettled {
            ticket,
            outcome: Ok(users),
        });
        app
    }

    fn expand_with(app: &mut App, index: usize, outcome: Result<RepoPage, FetchError>) {
        let ticket = app.cards[index].repos.toggle_expand().unwrap();
        app.update(Action::PageSettled {
            search_id: app.search.results_id(),
            ticket,
            outcome,
        });
    }

    #[test]
    fn collapsed_cards_list_handles() {
        let app = searched(&["octocat", "octodog"]);
        let screen = draw(&app, 80, 20);
        assert!(screen.contains("▸ octocat"));
        assert!(screen.contains("▸ octodog"));
        assert!(!screen.contains("Repositories"));
    }

    #[test]
    fn empty_repo_page_shows_no_repositories() {
        let mut app = searched(&["octocat"]);
        expand_with(&mut app, 0, Ok(RepoPage::Items(vec![])));

        let screen = draw(&app, 80, 24);
        assert!(screen.contains("▾ octocat"));
        assert!(screen.contains("No repositories."));
        assert!(screen.contains("all loaded"));
    }

    #[test]
    fn repositories_show_name_description_and_stars() {
        let mut app = searched(&["octocat"]);
        let repo = RepositoryItem {
            id: 101,
            name: "repo1".to_string(),
            html_ref: "https://github.com/octocat/repo1".to_string(),
            description: Some("A test repo".to_string()),
            star_count: 10,
        };
        expand_with(&mut app, 0, Ok(RepoPage::Items(vec![repo])));

        let screen = draw(&app, 100, 24);
        assert!(screen.contains("repo1"));
        assert!(screen.contains("A test repo"));
        assert!(screen.contains("10"));
        assert!(!screen.contains("No repositories."));
    }

    #[test]
    fn pane_error_keeps_loaded_rows() {
        let mut app = searched(&["octocat"]);
        expand_with(&mut app, 0, Ok(RepoPage::Items(repos(1, 10))));
        let ticket = app.cards[0].repos.load_next_page().unwrap();
        app.update(Action::PageSettled {
            search_id: app.search.results_id(),
            ticket,
            outcome: Err(FetchError::Unauthorized),
        });

        let screen = draw(&app, 100, 24);
        assert!(screen.contains("repo-1"));
        assert!(screen.contains("Error: Unauthorized"));
    }

    #[test]
    fn loading_row_while_page_in_flight() {
        let mut app = searched(&["octocat"]);
        app.cards[0].repos.toggle_expand();
        let screen = draw(&app, 80, 24);
        assert!(screen.contains("Loading..."));
    }

    #[test]
    fn truncate_adds_ellipsis() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a-very-long-name", 8), "a-ver...");
    }
}
