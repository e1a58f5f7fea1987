mod results;
mod search_bar;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{App, Focus};

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    search_bar::render(frame, app, chunks[1]);
    search_bar::render_summary(frame, app, chunks[2]);
    results::render(frame, app, chunks[3]);
    render_status_bar(frame, app, chunks[4]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let title = match &app.search.submitted_label {
        Some(label) => format!("ghseek - {} users: {}", app.directory_name(), label),
        None => format!("ghseek - {} users", app.directory_name()),
    };

    let header = Paragraph::new(Line::from(vec![Span::styled(
        title,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )]))
    .style(Style::default().bg(Color::DarkGray));

    frame.render_widget(header, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status = if let Some(notice) = &app.notice {
        Line::from(vec![Span::styled(
            notice.clone(),
            Style::default().fg(Color::Yellow),
        )])
    } else {
        let help = match app.focus {
            Focus::Input => "type a username | Enter: search | Tab: results | Esc: quit",
            Focus::Results => {
                "j/k: select | Enter: expand | J/K/wheel: scroll repos | o/O: open | y: yank | /: search | q: quit"
            }
        };
        Line::from(vec![Span::styled(help, Style::default().fg(Color::Gray))])
    };

    let status_bar = Paragraph::new(status).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status_bar, area);
}
