use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::edit::Field;
use crate::edit::modal::{CLOSE_ID, SUBMIT_ID, field_id};
use crate::tui::app::{App, MODAL_CONTROLS};
use crate::util::text::{single_line, tail_to_width, truncate_to_width};

/// Render the edit modal over the feed
pub fn render_modal(frame: &mut Frame, app: &App, area: Rect) {
    let popup_w: u16 = 60.min(area.width.saturating_sub(2));
    let inner_w = popup_w.saturating_sub(2) as usize;

    let theme = &app.theme;
    let bg = theme.background;
    let header_style = Style::default()
        .fg(theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let label_style = Style::default().fg(theme.dim).bg(bg);
    let focused_id = MODAL_CONTROLS[app.focus];

    let mut lines: Vec<Line> = Vec::new();
    let header = format!(" Edit post {}", app.workflow.session().id);
    lines.push(Line::from(Span::styled(header, header_style)));
    lines.push(Line::default());

    for field in Field::ALL {
        let id = field_id(field);
        let focused = id == focused_id;
        let value = app
            .doc
            .get_element_by_id(id)
            .map(|n| single_line(app.doc.value(n)))
            .unwrap_or_default();

        lines.push(Line::from(Span::styled(
            format!(" {}", field.label()),
            label_style,
        )));

        // Reserve space for the leading pad and the caret
        let room = inner_w.saturating_sub(3);
        let mut spans = vec![Span::styled(" ", Style::default().bg(bg))];
        if focused {
            spans.push(Span::styled(
                tail_to_width(&value, room),
                Style::default().fg(theme.text_bright).bg(theme.input_bg),
            ));
            spans.push(Span::styled(
                "\u{258C}",
                Style::default().fg(theme.highlight).bg(theme.input_bg),
            ));
        } else {
            spans.push(Span::styled(
                truncate_to_width(&value, room),
                Style::default().fg(theme.text).bg(bg),
            ));
        }
        lines.push(Line::from(spans));
    }
    lines.push(Line::default());

    let button = |label: &str, id: &str| {
        let style = if id == focused_id {
            Style::default()
                .fg(bg)
                .bg(theme.highlight)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text).bg(bg)
        };
        Span::styled(label.to_string(), style)
    };
    lines.push(Line::from(vec![
        Span::styled(" ", Style::default().bg(bg)),
        button("[ Update ]", SUBMIT_ID),
        Span::styled("  ", Style::default().bg(bg)),
        button("[ \u{00D7} Close ]", CLOSE_ID),
    ]));

    // Dynamic height from content + 2 for borders
    let popup_h = ((lines.len() as u16) + 2).min(area.height.saturating_sub(2));
    let overlay_area = centered_rect_fixed(popup_w, popup_h, area);
    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.highlight).bg(bg))
        .style(Style::default().bg(bg));
    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, overlay_area);
}

fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    use crate::tui::render::test_helpers::*;

    #[test]
    fn modal_shows_seeded_values() {
        let (mut app, _api) = app_with_posts(&sample_posts());
        app.cursor = 1;
        app.open_selected(Instant::now());
        let output = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_modal(frame, &app, area);
        });
        assert!(output.contains("Edit post 2"));
        assert!(output.contains("Second post\u{258C}"));
        assert!(output.contains("More words"));
        assert!(output.contains("https://img.test/2.png"));
        assert!(output.contains("[ Update ]"));
        assert!(output.contains("[ \u{00D7} Close ]"));
    }

    #[test]
    fn caret_follows_focus() {
        let (mut app, _api) = app_with_posts(&sample_posts());
        app.open_selected(Instant::now());
        app.focus = 1;
        let output = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_modal(frame, &app, area);
        });
        assert!(output.contains("Hello there\u{258C}"));
        assert!(!output.contains("First post\u{258C}"));
    }

    #[test]
    fn centered_rect() {
        let area = Rect::new(0, 0, 80, 24);
        assert_eq!(centered_rect_fixed(60, 10, area), Rect::new(10, 7, 60, 10));
    }
}
