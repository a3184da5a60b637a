use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::dom::{Document, NodeId};
use crate::tui::app::App;
use crate::util::text::{display_width, single_line, truncate_to_width};

/// Rows one card takes: title, body, tags/media, separator
const CARD_HEIGHT: usize = 4;

/// What a post card currently shows, read back from the document
#[derive(Debug, Default, PartialEq)]
struct CardView {
    title: String,
    body: String,
    media: Option<String>,
    tags: Vec<String>,
}

impl CardView {
    fn read(doc: &Document, card: NodeId) -> Self {
        let mut view = CardView::default();
        for &child in doc.children(card) {
            let el = doc.element(child);
            if el.has_class("post__title") {
                view.title = el.text.clone();
            } else if el.has_class("post__body") {
                view.body = el.text.clone();
            } else if el.has_class("post__media") {
                view.media = Some(el.text.clone());
            } else if el.has_class("post__tags") {
                view.tags = doc
                    .children(child)
                    .iter()
                    .map(|t| doc.text(*t).to_string())
                    .collect();
            }
        }
        view
    }
}

/// Render the list of post cards
pub fn render_feed_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let bg = app.theme.background;
    let cards = app.post_cards();

    if cards.is_empty() {
        let line = Line::from(Span::styled(
            " No posts",
            Style::default().fg(app.theme.dim).bg(bg),
        ));
        frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), area);
        return;
    }

    // Keep the selected card on screen
    let visible = (area.height as usize / CARD_HEIGHT).max(1);
    if app.cursor < app.scroll_offset {
        app.scroll_offset = app.cursor;
    } else if app.cursor >= app.scroll_offset + visible {
        app.scroll_offset = app.cursor + 1 - visible;
    }

    let width = area.width as usize;
    let mut lines: Vec<Line> = Vec::new();
    for (idx, &card) in cards
        .iter()
        .enumerate()
        .skip(app.scroll_offset)
        .take(visible)
    {
        let view = CardView::read(&app.doc, card);
        let selected = idx == app.cursor;
        lines.extend(card_lines(app, &view, selected, width));
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn card_lines<'a>(app: &App, view: &CardView, selected: bool, width: usize) -> Vec<Line<'a>> {
    let theme = &app.theme;
    let row_bg = if selected {
        theme.selection_bg
    } else {
        theme.background
    };
    let marker = if selected { "\u{25B8} " } else { "  " };
    let inner = width.saturating_sub(2);

    let title = if view.title.is_empty() {
        "(untitled)".to_string()
    } else {
        single_line(&view.title)
    };
    let title_text = format!("{}{}", marker, truncate_to_width(&title, inner));
    let pad = width.saturating_sub(display_width(&title_text));
    let title_style = if selected {
        Style::default()
            .fg(theme.highlight)
            .bg(row_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text_bright).bg(row_bg)
    };
    let title_line = Line::from(vec![
        Span::styled(title_text, title_style),
        Span::styled(" ".repeat(pad), Style::default().bg(row_bg)),
    ]);

    let body_line = Line::from(Span::styled(
        format!("  {}", truncate_to_width(&single_line(&view.body), inner)),
        Style::default().fg(theme.text).bg(theme.background),
    ));

    let mut meta: Vec<Span> = vec![Span::raw("  ")];
    let mut used = 2;
    for tag in view.tags.iter().filter(|t| !t.is_empty()) {
        let text = format!("#{} ", tag);
        used += display_width(&text);
        if used > width {
            break;
        }
        meta.push(Span::styled(
            text,
            Style::default().fg(theme.tag).bg(theme.background),
        ));
    }
    if let Some(media) = &view.media {
        let room = width.saturating_sub(used);
        meta.push(Span::styled(
            truncate_to_width(media, room),
            Style::default().fg(theme.dim).bg(theme.background),
        ));
    }

    vec![title_line, body_line, Line::from(meta), Line::default()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn card_view_reads_rendered_post() {
        let (app, _api) = app_with_posts(&sample_posts());
        let card = app.post_cards()[1];
        let view = CardView::read(&app.doc, card);
        assert_eq!(
            view,
            CardView {
                title: "Second post".into(),
                body: "More words".into(),
                media: Some("https://img.test/2.png".into()),
                tags: vec!["x".into()],
            }
        );
    }

    #[test]
    fn feed_shows_cards() {
        let (mut app, _api) = app_with_posts(&sample_posts());
        let output = render_to_string(TERM_W, 14, |frame, area| {
            render_feed_view(frame, &mut app, area);
        });
        assert!(output.contains("\u{25B8} First post"));
        assert!(output.contains("  Hello there"));
        assert!(output.contains("#intro #meta"));
        assert!(output.contains("#x https://img.test/2.png"));
        assert!(output.contains("  Third"));
    }

    #[test]
    fn empty_feed() {
        let (mut app, _api) = app_with_posts(&[]);
        let output = render_to_string(TERM_W, 5, |frame, area| {
            render_feed_view(frame, &mut app, area);
        });
        assert_eq!(output, " No posts");
    }

    #[test]
    fn scrolls_to_keep_cursor_visible() {
        let (mut app, _api) = app_with_posts(&sample_posts());
        app.cursor = 2;
        let output = render_to_string(TERM_W, 4, |frame, area| {
            render_feed_view(frame, &mut app, area);
        });
        assert_eq!(app.scroll_offset, 2);
        assert!(output.contains("\u{25B8} Third"));
        assert!(!output.contains("First post"));
    }
}
