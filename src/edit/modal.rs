use std::time::{Duration, Instant};

use crate::dom::{Display, Document, EventKind, Handler, NodeId};
use crate::model::ModalConfig;

use super::session::Field;

pub const MODAL_ID: &str = "modalEdit";
pub const CLOSE_ID: &str = "close-modal--edit";
pub const SUBMIT_ID: &str = "modal-post-button";
pub const TITLE_FIELD_ID: &str = "title__modal--edit";
pub const BODY_FIELD_ID: &str = "body__modal--edit";
pub const MEDIA_FIELD_ID: &str = "media__modal--edit";
pub const TAGS_FIELD_ID: &str = "tags__modal--edit";

pub fn field_id(field: Field) -> &'static str {
    match field {
        Field::Title => TITLE_FIELD_ID,
        Field::Body => BODY_FIELD_ID,
        Field::Media => MEDIA_FIELD_ID,
        Field::Tags => TAGS_FIELD_ID,
    }
}

/// Result of one [`ModalBuilder::ensure_modal`] attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnsureOutcome {
    /// Past the retry ceiling; nothing was built
    Abandoned,
    /// The modal was already in the document; nothing changed
    AlreadyPresent,
    Built,
    /// The subtree was built but the body field is not queryable yet
    Deferred { next_attempt: u32 },
}

/// Builds the edit modal's subtree, at most once per document.
#[derive(Debug, Clone)]
pub struct ModalBuilder {
    max_attempts: u32,
    retry_delay: Duration,
}

impl Default for ModalBuilder {
    fn default() -> Self {
        Self::from_config(&ModalConfig::default())
    }
}

impl ModalBuilder {
    pub fn new(max_attempts: u32, retry_delay: Duration) -> Self {
        ModalBuilder {
            max_attempts,
            retry_delay,
        }
    }

    pub fn from_config(config: &ModalConfig) -> Self {
        Self::new(
            config.max_attempts,
            Duration::from_millis(config.retry_delay_ms),
        )
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn retry_delay(&self) -> Duration {
        self.retry_delay
    }

    /// Make sure the modal exists. `attempt` starts at 1.
    pub fn ensure_modal(&self, doc: &mut Document, attempt: u32) -> EnsureOutcome {
        if attempt > self.max_attempts {
            return EnsureOutcome::Abandoned;
        }
        if doc.get_element_by_id(MODAL_ID).is_some() {
            return EnsureOutcome::AlreadyPresent;
        }

        let modal = build_subtree(doc);

        if doc.get_element_by_id(BODY_FIELD_ID).is_some() {
            EnsureOutcome::Built
        } else {
            // The unmounted copy can never be reached; give its slots back
            doc.remove(modal);
            EnsureOutcome::Deferred {
                next_attempt: attempt + 1,
            }
        }
    }

    pub fn show(doc: &mut Document) -> bool {
        Self::set_display(doc, Display::Block)
    }

    pub fn hide(doc: &mut Document) -> bool {
        Self::set_display(doc, Display::None)
    }

    fn set_display(doc: &mut Document, display: Display) -> bool {
        match doc.get_element_by_id(MODAL_ID) {
            Some(modal) => {
                doc.set_display(modal, display);
                true
            }
            None => false,
        }
    }

    pub fn is_shown(doc: &Document) -> bool {
        doc.get_element_by_id(MODAL_ID)
            .is_some_and(|modal| doc.is_displayed(modal))
    }
}

fn build_subtree(doc: &mut Document) -> NodeId {
    let root = doc.root();
    let modal = doc.create("div", "", root, &[("id", MODAL_ID)], &["modal"]);
    doc.set_display(modal, Display::None);
    let content = doc.create("div", "", modal, &[], &["modal__content"]);

    let close = doc.create("span", "\u{00d7}", content, &[("id", CLOSE_ID)], &["modal__close"]);
    doc.add_listener(close, EventKind::Click, Handler::CloseModal);
    doc.create("h2", "Edit post", content, &[], &["modal__header"]);

    let form = doc.create("form", "", content, &[], &["modal__form"]);
    for field in Field::ALL {
        let id = field_id(field);
        doc.create("label", field.label(), form, &[("for", id)], &["modal__label"]);
        let tag = if field == Field::Body {
            "textarea"
        } else {
            "input"
        };
        let input = doc.create(tag, "", form, &[("id", id), ("name", id)], &["modal__input"]);
        doc.add_listener(input, EventKind::Input, Handler::FieldInput(field));
    }

    let submit = doc.create("button", "Update", form, &[("id", SUBMIT_ID)], &["modal__submit"]);
    doc.add_listener(submit, EventKind::Click, Handler::SubmitEdit);
    modal
}

/// Where a [`ModalBuild`] stands across all of its attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStatus {
    /// Waiting to run `attempt` at `due`
    Pending { attempt: u32, due: Instant },
    Ready,
    /// Every attempt was deferred
    Abandoned,
    Cancelled,
}

impl BuildStatus {
    pub fn is_finished(&self) -> bool {
        !matches!(self, BuildStatus::Pending { .. })
    }
}

/// A retrying modal build. Attempt 1 runs on [`start`](Self::start);
/// later attempts run from [`poll`](Self::poll) once their delay has
/// elapsed. The final outcome stays observable through
/// [`status`](Self::status).
#[derive(Debug, Clone)]
pub struct ModalBuild {
    builder: ModalBuilder,
    status: BuildStatus,
    attempts: u32,
}

impl ModalBuild {
    pub fn start(builder: ModalBuilder, doc: &mut Document, now: Instant) -> Self {
        let mut build = ModalBuild {
            builder,
            status: BuildStatus::Pending {
                attempt: 1,
                due: now,
            },
            attempts: 0,
        };
        build.run_attempt(doc, 1, now);
        build
    }

    pub fn status(&self) -> BuildStatus {
        self.status
    }

    /// Attempts that reached the document (1..=max)
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn next_due(&self) -> Option<Instant> {
        match self.status {
            BuildStatus::Pending { due, .. } => Some(due),
            _ => None,
        }
    }

    /// Run the pending attempt if it is due
    pub fn poll(&mut self, doc: &mut Document, now: Instant) -> BuildStatus {
        if let BuildStatus::Pending { attempt, due } = self.status
            && now >= due
        {
            self.run_attempt(doc, attempt, now);
        }
        self.status
    }

    /// Stop scheduling further attempts. A finished build is unaffected.
    pub fn cancel(&mut self) {
        if !self.status.is_finished() {
            tracing::debug!(attempts = self.attempts, "modal build cancelled");
            self.status = BuildStatus::Cancelled;
        }
    }

    fn run_attempt(&mut self, doc: &mut Document, attempt: u32, now: Instant) {
        let outcome = self.builder.ensure_modal(doc, attempt);
        if outcome != EnsureOutcome::Abandoned {
            self.attempts += 1;
        }
        self.status = match outcome {
            EnsureOutcome::Built | EnsureOutcome::AlreadyPresent => {
                tracing::debug!(attempt, ?outcome, "edit modal ready");
                BuildStatus::Ready
            }
            EnsureOutcome::Abandoned => BuildStatus::Abandoned,
            EnsureOutcome::Deferred { next_attempt } if next_attempt > self.builder.max_attempts => {
                tracing::error!(
                    attempts = self.attempts,
                    "edit modal never became available, giving up"
                );
                BuildStatus::Abandoned
            }
            EnsureOutcome::Deferred { next_attempt } => {
                let due = now + self.builder.retry_delay;
                tracing::warn!(
                    attempt,
                    next_attempt,
                    delay_ms = self.builder.retry_delay.as_millis() as u64,
                    "edit modal not mounted yet, retrying"
                );
                BuildStatus::Pending {
                    attempt: next_attempt,
                    due,
                }
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::ReadyState;

    const DELAY: Duration = Duration::from_secs(5);

    #[test]
    fn first_build_creates_full_subtree_hidden() {
        let mut doc = Document::new();
        let outcome = ModalBuilder::default().ensure_modal(&mut doc, 1);
        assert_eq!(outcome, EnsureOutcome::Built);
        for id in [
            MODAL_ID,
            CLOSE_ID,
            SUBMIT_ID,
            TITLE_FIELD_ID,
            BODY_FIELD_ID,
            MEDIA_FIELD_ID,
            TAGS_FIELD_ID,
        ] {
            assert!(doc.get_element_by_id(id).is_some(), "missing {}", id);
        }
        assert!(!ModalBuilder::is_shown(&doc));
        // close + submit + four fields
        assert_eq!(doc.listener_count(), 6);
    }

    #[test]
    fn ensure_is_idempotent() {
        let mut doc = Document::new();
        let builder = ModalBuilder::default();
        builder.ensure_modal(&mut doc, 1);
        let before = doc.mutation_count();
        let listeners = doc.listener_count();

        assert_eq!(builder.ensure_modal(&mut doc, 1), EnsureOutcome::AlreadyPresent);
        assert_eq!(doc.mutation_count(), before);
        assert_eq!(doc.listener_count(), listeners);
    }

    #[test]
    fn attempts_past_ceiling_do_nothing() {
        let mut doc = Document::new();
        let before = doc.mutation_count();
        assert_eq!(
            ModalBuilder::default().ensure_modal(&mut doc, 6),
            EnsureOutcome::Abandoned
        );
        assert_eq!(doc.mutation_count(), before);
        assert!(doc.get_element_by_id(MODAL_ID).is_none());
    }

    #[test]
    fn unmounted_build_is_deferred() {
        let mut doc = Document::loading();
        assert_eq!(
            ModalBuilder::default().ensure_modal(&mut doc, 2),
            EnsureOutcome::Deferred { next_attempt: 3 }
        );
    }

    #[test]
    fn deferred_attempts_do_not_accumulate_elements() {
        let mut doc = Document::loading();
        let builder = ModalBuilder::default();
        builder.ensure_modal(&mut doc, 1);
        let live = doc.live_count();
        for attempt in 2..=5 {
            builder.ensure_modal(&mut doc, attempt);
        }
        assert_eq!(doc.live_count(), live);
        assert_eq!(doc.listener_count(), 0);
    }

    #[test]
    fn show_and_hide_toggle_display_only() {
        let mut doc = Document::new();
        assert!(!ModalBuilder::show(&mut doc));
        ModalBuilder::default().ensure_modal(&mut doc, 1);
        let listeners = doc.listener_count();
        assert!(ModalBuilder::show(&mut doc));
        assert!(ModalBuilder::is_shown(&doc));
        assert!(ModalBuilder::hide(&mut doc));
        assert!(!ModalBuilder::is_shown(&doc));
        assert!(doc.get_element_by_id(BODY_FIELD_ID).is_some());
        assert_eq!(doc.listener_count(), listeners);
    }

    #[test]
    fn build_ready_on_first_attempt() {
        let mut doc = Document::new();
        let build = ModalBuild::start(ModalBuilder::default(), &mut doc, Instant::now());
        assert_eq!(build.status(), BuildStatus::Ready);
        assert_eq!(build.attempts(), 1);
    }

    #[test]
    fn retries_five_times_then_abandons() {
        let mut doc = Document::loading();
        let t0 = Instant::now();
        let mut build = ModalBuild::start(ModalBuilder::default(), &mut doc, t0);
        assert_eq!(
            build.status(),
            BuildStatus::Pending {
                attempt: 2,
                due: t0 + DELAY
            }
        );

        // Not yet due
        build.poll(&mut doc, t0 + DELAY - Duration::from_millis(1));
        assert_eq!(build.attempts(), 1);

        for n in 2..=5u32 {
            let now = t0 + DELAY * (n - 1);
            build.poll(&mut doc, now);
            assert_eq!(build.attempts(), n);
        }
        assert_eq!(build.status(), BuildStatus::Abandoned);

        build.poll(&mut doc, t0 + DELAY * 10);
        assert_eq!(build.attempts(), 5);
        assert_eq!(build.next_due(), None);
    }

    #[test]
    fn retry_succeeds_once_document_is_ready() {
        let mut doc = Document::loading();
        let t0 = Instant::now();
        let mut build = ModalBuild::start(ModalBuilder::default(), &mut doc, t0);
        build.poll(&mut doc, t0 + DELAY);
        assert!(!build.status().is_finished());

        doc.set_ready_state(ReadyState::Complete);
        assert_eq!(build.poll(&mut doc, t0 + DELAY * 2), BuildStatus::Ready);
        assert_eq!(build.attempts(), 3);
        assert!(doc.get_element_by_id(BODY_FIELD_ID).is_some());
    }

    #[test]
    fn cancel_stops_pending_retries() {
        let mut doc = Document::loading();
        let t0 = Instant::now();
        let mut build = ModalBuild::start(ModalBuilder::default(), &mut doc, t0);
        build.cancel();
        doc.set_ready_state(ReadyState::Complete);
        assert_eq!(build.poll(&mut doc, t0 + DELAY), BuildStatus::Cancelled);
        assert!(doc.get_element_by_id(MODAL_ID).is_none());
    }
}
