use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::api::{Endpoints, HttpClient, Method, PostApi, build_options};
use crate::dom::{Document, NodeId, UPDATE_ID_ATTR, render_post};
use crate::edit::modal::{
    BODY_FIELD_ID, CLOSE_ID, MEDIA_FIELD_ID, SUBMIT_ID, TAGS_FIELD_ID, TITLE_FIELD_ID,
};
use crate::edit::{ModalBuilder, Notice, Outcome, UpdateWorkflow};
use crate::io::config_io::read_config;
use crate::io::local_storage::LocalStorage;
use crate::model::{AppConfig, Post};

use super::input;
use super::render;
use super::theme::Theme;
use super::worker::Submitter;

/// Modal controls in focus order
pub const MODAL_CONTROLS: [&str; 6] = [
    TITLE_FIELD_ID,
    BODY_FIELD_ID,
    MEDIA_FIELD_ID,
    TAGS_FIELD_ID,
    SUBMIT_ID,
    CLOSE_ID,
];

const TICK: Duration = Duration::from_millis(250);

/// Current interaction mode, derived from the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Browse,
    Modal,
}

/// A notification shown in the status row until it expires
#[derive(Debug, Clone)]
pub struct Toast {
    pub notice: Notice,
    pub expires: Instant,
}

/// Main application state
pub struct App {
    pub doc: Document,
    pub workflow: UpdateWorkflow,
    pub theme: Theme,
    pub should_quit: bool,
    /// Index of the selected post card
    pub cursor: usize,
    /// First visible post card
    pub scroll_offset: usize,
    /// Index into [`MODAL_CONTROLS`]
    pub focus: usize,
    pub toast: Option<Toast>,
    pub toast_ttl: Duration,
    pub user_name: String,
    submitter: Submitter,
}

impl App {
    pub fn new(
        config: &AppConfig,
        endpoints: Endpoints,
        api: Arc<dyn PostApi>,
        user_name: String,
    ) -> Self {
        Self::with_document(Document::new(), config, endpoints, api, user_name)
    }

    /// Build the app around an existing document
    pub fn with_document(
        mut doc: Document,
        config: &AppConfig,
        endpoints: Endpoints,
        api: Arc<dyn PostApi>,
        user_name: String,
    ) -> Self {
        let root = doc.root();
        let feed = doc.create("main", "", root, &[("id", "feed")], &["feed"]);
        let workflow = UpdateWorkflow::new(config, endpoints, feed);

        let mut app = App {
            doc,
            workflow,
            theme: Theme::from_config(&config.ui),
            should_quit: false,
            cursor: 0,
            scroll_offset: 0,
            focus: 0,
            toast: None,
            toast_ttl: Duration::from_secs(config.ui.toast_secs),
            user_name,
            submitter: Submitter::new(api),
        };
        let notices = app.workflow.prepare(&mut app.doc, Instant::now());
        app.notify_all(notices, Instant::now());
        app
    }

    pub fn mode(&self) -> Mode {
        if ModalBuilder::is_shown(&self.doc) {
            Mode::Modal
        } else {
            Mode::Browse
        }
    }

    pub fn load_posts(&mut self, posts: &[Post]) {
        let feed = self.workflow.feed();
        for post in posts {
            render_post(&mut self.doc, feed, post);
        }
    }

    /// Post cards in feed order
    pub fn post_cards(&self) -> Vec<NodeId> {
        self.doc.children(self.workflow.feed()).to_vec()
    }

    /// Stop pending modal retries and leave the event loop
    pub fn quit(&mut self) {
        self.workflow.cancel_build();
        self.should_quit = true;
    }

    pub fn notify(&mut self, notice: Notice, now: Instant) {
        self.toast = Some(Toast {
            notice,
            expires: now + self.toast_ttl,
        });
    }

    fn notify_all(&mut self, notices: Vec<Notice>, now: Instant) {
        for notice in notices {
            self.notify(notice, now);
        }
    }

    /// Apply what a document event produced
    pub fn apply(&mut self, outcome: Outcome, now: Instant) {
        self.notify_all(outcome.notices, now);
        if let Some(request) = outcome.submit {
            self.submitter.spawn(request);
        }
    }

    /// Click the edit trigger of the selected post
    pub fn open_selected(&mut self, now: Instant) {
        let Some(card) = self.post_cards().get(self.cursor).copied() else {
            return;
        };
        let trigger = self
            .doc
            .children(card)
            .iter()
            .copied()
            .find(|n| self.doc.attr(*n, UPDATE_ID_ATTR).is_some());
        if let Some(trigger) = trigger {
            self.focus = 0;
            let outcome = self.workflow.click(&mut self.doc, trigger, now);
            self.apply(outcome, now);
        }
    }

    pub fn focused_control(&self) -> Option<NodeId> {
        self.doc.get_element_by_id(MODAL_CONTROLS[self.focus])
    }

    pub fn focused_is_input(&self) -> bool {
        self.focused_control()
            .is_some_and(|n| matches!(self.doc.element(n).tag.as_str(), "input" | "textarea"))
    }

    /// Click a modal control by element id
    pub fn click_control(&mut self, id: &str, now: Instant) {
        if let Some(node) = self.doc.get_element_by_id(id) {
            let outcome = self.workflow.click(&mut self.doc, node, now);
            self.apply(outcome, now);
        }
    }

    /// Set the focused input's value, firing its input event
    pub fn edit_focused(&mut self, now: Instant, edit: impl FnOnce(&mut String)) {
        if !self.focused_is_input() {
            return;
        }
        let Some(node) = self.focused_control() else {
            return;
        };
        let mut value = self.doc.value(node).to_string();
        edit(&mut value);
        let outcome = self.workflow.input(&mut self.doc, node, &value, now);
        self.apply(outcome, now);
    }

    /// Run due retries, collect finished submits, expire the toast
    pub fn tick(&mut self, now: Instant) {
        let notices = self.workflow.tick(&mut self.doc, now);
        self.notify_all(notices, now);

        for finished in self.submitter.poll() {
            let notice = self
                .workflow
                .complete_submit(&mut self.doc, &finished.id, finished.result);
            self.notify(notice, now);
        }

        if self.toast.as_ref().is_some_and(|t| now >= t.expires) {
            self.toast = None;
        }
        let count = self.post_cards().len();
        if self.cursor >= count {
            self.cursor = count.saturating_sub(1);
        }
    }

    /// How long the event loop may block waiting for input
    fn poll_timeout(&self, now: Instant) -> Duration {
        match self.workflow.next_wakeup() {
            Some(due) => due.saturating_duration_since(now).min(TICK),
            None => TICK,
        }
    }

    #[cfg(test)]
    pub fn wait_for_submit(&mut self, timeout: Duration) -> bool {
        match self.submitter.wait(timeout) {
            Some(finished) => {
                let notice =
                    self.workflow
                        .complete_submit(&mut self.doc, &finished.id, finished.result);
                self.notify(notice, Instant::now());
                true
            }
            None => false,
        }
    }
}

/// Run the TUI application
pub fn run(data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = read_config(data_dir)?;
    let storage = LocalStorage::open(data_dir)?;
    let user = storage.current_user();
    let endpoints = Endpoints::for_user(&config.api.base_url, &user);
    let api: Arc<dyn PostApi> = Arc::new(HttpClient::new(Duration::from_secs(
        config.api.timeout_secs,
    ))?);

    let options = build_options(Method::Get, None, &endpoints)?;
    let feed = api.fetch_all(&endpoints.posts_url(), &options);

    let mut app = App::new(&config, endpoints, api, user.name);
    match feed {
        Ok(posts) => {
            tracing::info!(count = posts.len(), "loaded feed");
            app.load_posts(&posts);
        }
        Err(e) => {
            tracing::error!(error = %e, "could not load feed");
            app.notify(Notice::Error(format!("could not load posts: {}", e)), Instant::now());
        }
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(app.poll_timeout(Instant::now()))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key, Instant::now());
        }
        app.tick(Instant::now());

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit::BuildStatus;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn starts_with_modal_built_and_hidden() {
        let (app, _api) = app_with_posts(&sample_posts());
        assert_eq!(app.mode(), Mode::Browse);
        assert!(app.doc.get_element_by_id(BODY_FIELD_ID).is_some());
        assert_eq!(app.post_cards().len(), 3);
    }

    #[test]
    fn open_selected_shows_modal_for_that_post() {
        let (mut app, _api) = app_with_posts(&sample_posts());
        app.cursor = 1;
        app.open_selected(Instant::now());
        assert_eq!(app.mode(), Mode::Modal);
        assert_eq!(app.workflow.session().id.as_str(), "2");
        assert!(app.focused_is_input());
    }

    #[test]
    fn submit_round_trip_updates_card_and_hides_modal() {
        let (mut app, api) = app_with_posts(&sample_posts());
        let now = Instant::now();
        app.open_selected(now);
        app.edit_focused(now, |v| v.push_str(" (edited)"));
        app.click_control(SUBMIT_ID, now);

        assert!(app.wait_for_submit(Duration::from_secs(5)));
        assert_eq!(api.calls().len(), 1);
        assert_eq!(app.mode(), Mode::Browse);
        assert_eq!(app.doc.text_of("title1"), "First post (edited)");
        assert!(matches!(
            app.toast.as_ref().map(|t| &t.notice),
            Some(Notice::Success(_))
        ));
    }

    #[test]
    fn quit_cancels_a_pending_modal_build() {
        let config = AppConfig::default();
        let endpoints = Endpoints::for_user(&config.api.base_url, &Default::default());
        let api = Arc::new(FakeApi::default());
        let mut app = App::with_document(Document::loading(), &config, endpoints, api, String::new());
        assert!(matches!(
            app.workflow.build_status(),
            Some(BuildStatus::Pending { .. })
        ));

        app.quit();
        assert!(app.should_quit);
        assert_eq!(app.workflow.build_status(), Some(BuildStatus::Cancelled));
        assert_eq!(app.workflow.next_wakeup(), None);
    }

    #[test]
    fn toast_expires_on_tick() {
        let (mut app, _api) = app_with_posts(&[]);
        let now = Instant::now();
        app.notify(Notice::Success("hi".into()), now);
        app.tick(now + Duration::from_secs(1));
        assert!(app.toast.is_some());
        app.tick(now + app.toast_ttl);
        assert!(app.toast.is_none());
    }
}
