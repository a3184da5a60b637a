pub mod feed_view;
pub mod modal_view;
pub mod status_row;
#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use super::app::{App, Mode};

/// Main render function, dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: title bar | feed | status row
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    render_title_bar(frame, app, chunks[0]);
    feed_view::render_feed_view(frame, app, chunks[1]);

    // Modal (rendered on top of the feed)
    if app.mode() == Mode::Modal {
        modal_view::render_modal(frame, app, area);
    }

    status_row::render_status_row(frame, app, chunks[2]);
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let count = app.post_cards().len();
    let mut spans = vec![
        Span::styled(
            " postedit",
            Style::default()
                .fg(app.theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {} posts", count),
            Style::default().fg(app.theme.dim).bg(bg),
        ),
    ];
    if !app.user_name.is_empty() {
        let used: usize = spans.iter().map(|s| s.content.chars().count()).sum();
        let name = format!("{} ", app.user_name);
        let width = area.width as usize;
        if used + name.chars().count() < width {
            spans.push(Span::styled(
                " ".repeat(width - used - name.chars().count()),
                Style::default().bg(bg),
            ));
            spans.push(Span::styled(name, Style::default().fg(app.theme.text).bg(bg)));
        }
    }
    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
