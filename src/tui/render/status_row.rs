use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::edit::Notice;
use crate::tui::app::{App, Mode};

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let mut spans: Vec<Span> = Vec::new();
    if let Some(toast) = &app.toast {
        let text = match &toast.notice {
            Notice::Success(msg) | Notice::Error(msg) => msg.clone(),
        };
        spans.push(Span::styled(
            format!(" {}", text),
            Style::default()
                .fg(app.theme.notice_color(&toast.notice))
                .bg(bg),
        ));
    } else if app.workflow.in_flight().is_some() {
        spans.push(Span::styled(
            " submitting\u{2026}",
            Style::default().fg(app.theme.highlight).bg(bg),
        ));
    }

    let hint = match app.mode() {
        Mode::Browse => "j/k move  Enter edit  q quit",
        Mode::Modal => "Tab next  ^S update  Esc close",
    };
    let content_width: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let hint_width = hint.chars().count();
    if content_width + hint_width < width {
        let padding = width - content_width - hint_width;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
