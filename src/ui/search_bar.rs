use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::{App, Focus};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Input;
    let border_style = if focused {
        Style::default().fg(Color::Blue)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title("Search");

    let text = if app.input.is_empty() {
        Span::styled("Enter username", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(app.input.as_str())
    };
    frame.render_widget(Paragraph::new(Line::from(text)).block(block), area);

    if focused {
        let x = area.x + 1 + app.input.chars().count() as u16;
        frame.set_cursor_position((x.min(area.right().saturating_sub(2)), area.y + 1));
    }
}

/// "Showing N users for ..." plus loading and error indicators. Errors sit
/// next to the last good result set rather than replacing it.
pub fn render_summary(frame: &mut Frame, app: &App, area: Rect) {
    let search = &app.search;
    let mut spans = Vec::new();

    if let Some(label) = &search.submitted_label {
        spans.push(Span::styled(
            format!("Showing {} users for \"{}\"", search.results.len(), label),
            Style::default().fg(Color::Gray),
        ));
    }
    if search.loading {
        if !spans.is_empty() {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled("Loading...", Style::default().fg(Color::Yellow)));
    }
    if let Some(err) = &search.error {
        if !spans.is_empty() {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(
            format!("Error: {}", err),
            Style::default().fg(Color::Red),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use crate::action::Action;
    use crate::directory::fake::user;
    use crate::error::FetchError;
    use crate::ui::test_support::{app, draw};

    #[test]
    fn placeholder_before_typing() {
        let screen = draw(&app(), 80, 20);
        assert!(screen.contains("Enter username"));
        assert!(!screen.contains("Showing"));
    }

    #[test]
    fn shows_result_count_for_submitted_query() {
        let mut app = app();
        let ticket = app.search.begin("octocat").unwrap();
        app.update(Action::SearchSettled {
            ticket,
            outcome: Ok(vec![user(1, "octocat")]),
        });

        let screen = draw(&app, 80, 20);
        assert!(screen.contains("Showing 1 users for \"octocat\""));
        assert!(screen.contains("octocat"));
    }

    #[test]
    fn loading_indicator_while_in_flight() {
        let mut app = app();
        app.search.begin("octocat");
        let screen = draw(&app, 80, 20);
        assert!(screen.contains("Loading..."));
    }

    #[test]
    fn error_is_shown_alongside_results() {
        let mut app = app();
        let ticket = app.search.begin("octocat").unwrap();
        app.update(Action::SearchSettled {
            ticket,
            outcome: Ok(vec![user(1, "octocat")]),
        });
        let ticket = app.search.begin("octocat").unwrap();
        app.update(Action::SearchSettled {
            ticket,
            outcome: Err(FetchError::RateLimited),
        });

        let screen = draw(&app, 120, 20);
        assert!(screen.contains("Showing 1 users for \"octocat\""));
        assert!(screen.contains("Rate limited"));
        assert!(!screen.contains("Loading..."));
    }
}
