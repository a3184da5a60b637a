use std::sync::{Arc, Mutex};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::api::{ApiError, Endpoints, Method, PostApi, RequestOptions};
use crate::model::{AppConfig, CurrentUser, Post, PostDraft, PostId};
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// In-memory backend. Records every call; a PUT echoes its payload back as
/// the updated post.
#[derive(Default)]
pub struct FakeApi {
    posts: Vec<Post>,
    calls: Mutex<Vec<(String, RequestOptions)>>,
}

impl FakeApi {
    pub fn with_posts(posts: &[Post]) -> Self {
        FakeApi {
            posts: posts.to_vec(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, RequestOptions)> {
        self.calls.lock().unwrap().clone()
    }
}

impl PostApi for FakeApi {
    fn call(&self, url: &str, options: &RequestOptions) -> Result<Post, ApiError> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), options.clone()));
        assert_eq!(options.method, Method::Put);
        let draft: PostDraft = serde_json::from_str(options.body.as_deref().unwrap_or("{}"))?;
        let id = url.rsplit('/').next().unwrap_or_default();
        Ok(Post {
            id: PostId::from(id),
            title: draft.title,
            body: draft.body,
            tags: draft.tags,
            media: draft.media,
        })
    }

    fn fetch_all(&self, url: &str, options: &RequestOptions) -> Result<Vec<Post>, ApiError> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), options.clone()));
        Ok(self.posts.clone())
    }
}

pub fn sample_posts() -> Vec<Post> {
    vec![
        Post {
            id: PostId::from(1),
            title: "First post".into(),
            body: "Hello there".into(),
            tags: vec!["intro".into(), "meta".into()],
            media: None,
        },
        Post {
            id: PostId::from(2),
            title: "Second post".into(),
            body: "More words".into(),
            tags: vec!["x".into()],
            media: Some("https://img.test/2.png".into()),
        },
        Post {
            id: PostId::from(3),
            title: "Third".into(),
            body: String::new(),
            tags: vec![],
            media: None,
        },
    ]
}

/// An app showing `posts`, backed by a [`FakeApi`] that already knows them.
pub fn app_with_posts(posts: &[Post]) -> (App, Arc<FakeApi>) {
    let config = AppConfig::default();
    let user = CurrentUser {
        name: "tester".into(),
        access_token: Some("tok".into()),
        api_base: None,
    };
    let endpoints = Endpoints::for_user(&config.api.base_url, &user);
    let api = Arc::new(FakeApi::with_posts(posts));
    let mut app = App::new(&config, endpoints, api.clone(), user.name);
    app.load_posts(posts);
    (app, api)
}

pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}
