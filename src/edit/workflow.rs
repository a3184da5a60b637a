use std::time::Instant;

use crate::api::{ApiError, Endpoints, Method, RequestOptions, build_options};
use crate::dom::post_card::{body_id, media_id, tag_class, title_id};
use crate::dom::{Document, EventKind, Handler, NodeId, UPDATE_ID_ATTR, render_post};
use crate::model::{AppConfig, Post, PostDraft, PostId, TagSource};

use super::machine::{EditEvent, EditMachine, EditState};
use super::modal::{BODY_FIELD_ID, BuildStatus, ModalBuild, ModalBuilder, field_id};
use super::session::{EditSession, Field, join_tags};

pub const UPDATE_SUCCESS: &str = "update successful!";
pub const MODAL_UNAVAILABLE: &str = "edit form could not be loaded";
pub const UPDATE_IN_PROGRESS: &str = "an update is already in progress";

/// Transient feedback for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

/// A replace request ready to be sent. The draft is a copy of the session
/// taken when submit was clicked.
#[derive(Debug, Clone)]
pub struct SubmitRequest {
    pub url: String,
    pub options: RequestOptions,
    pub draft: PostDraft,
}

/// What handling an event produced
#[derive(Debug, Default)]
pub struct Outcome {
    pub notices: Vec<Notice>,
    pub submit: Option<SubmitRequest>,
}

/// Values shown in the modal when it opens
#[derive(Debug, Clone, Default)]
struct Prefill {
    title: String,
    body: String,
    media: String,
    tags: String,
}

/// Owns the edit session and drives the modal for one document.
pub struct UpdateWorkflow {
    session: EditSession,
    machine: EditMachine,
    builder: ModalBuilder,
    build: Option<ModalBuild>,
    /// Opened while the modal was still building
    pending_open: Option<Prefill>,
    abandon_reported: bool,
    in_flight: Option<PostId>,
    tag_source: TagSource,
    endpoints: Endpoints,
    feed: NodeId,
}

impl UpdateWorkflow {
    /// `feed` is the element updated posts are rendered under
    pub fn new(config: &AppConfig, endpoints: Endpoints, feed: NodeId) -> Self {
        UpdateWorkflow {
            session: EditSession::new(),
            machine: EditMachine::new(),
            builder: ModalBuilder::from_config(&config.modal),
            build: None,
            pending_open: None,
            abandon_reported: false,
            in_flight: None,
            tag_source: config.edit.tag_source,
            endpoints,
            feed,
        }
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn state(&self) -> EditState {
        self.machine.state()
    }

    pub fn feed(&self) -> NodeId {
        self.feed
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn build_status(&self) -> Option<BuildStatus> {
        self.build.as_ref().map(ModalBuild::status)
    }

    pub fn in_flight(&self) -> Option<&PostId> {
        self.in_flight.as_ref()
    }

    /// When the next modal retry is due, if one is scheduled
    pub fn next_wakeup(&self) -> Option<Instant> {
        self.build.as_ref().and_then(ModalBuild::next_due)
    }

    /// Start building the modal unless a build already exists
    pub fn prepare(&mut self, doc: &mut Document, now: Instant) -> Vec<Notice> {
        let restart = self
            .build
            .as_ref()
            .is_none_or(|b| b.status() == BuildStatus::Cancelled);
        if restart {
            self.build = Some(ModalBuild::start(self.builder.clone(), doc, now));
        }
        self.settle(doc)
    }

    /// Run a due modal retry
    pub fn tick(&mut self, doc: &mut Document, now: Instant) -> Vec<Notice> {
        match self.build.as_mut() {
            Some(build) if !build.status().is_finished() => {
                build.poll(doc, now);
                self.settle(doc)
            }
            _ => Vec::new(),
        }
    }

    pub fn cancel_build(&mut self) {
        if let Some(build) = self.build.as_mut() {
            build.cancel();
        }
        self.pending_open = None;
    }

    fn settle(&mut self, doc: &mut Document) -> Vec<Notice> {
        match self.build_status() {
            Some(BuildStatus::Ready) => {
                if let Some(prefill) = self.pending_open.take() {
                    present(doc, &prefill);
                }
                Vec::new()
            }
            Some(BuildStatus::Abandoned) => {
                let waiting = self.pending_open.take().is_some();
                if waiting || !self.abandon_reported {
                    self.abandon_reported = true;
                    vec![Notice::Error(MODAL_UNAVAILABLE.to_string())]
                } else {
                    Vec::new()
                }
            }
            _ => Vec::new(),
        }
    }

    /// Route an event on `target` to the handlers registered for it
    pub fn handle_event(
        &mut self,
        doc: &mut Document,
        target: NodeId,
        kind: EventKind,
        now: Instant,
    ) -> Outcome {
        let mut outcome = Outcome::default();
        for (node, handler) in doc.dispatch(target, kind) {
            match handler {
                Handler::OpenEdit => {
                    if let Some(id) = doc.attr(node, UPDATE_ID_ATTR).map(PostId::from) {
                        outcome.notices.extend(self.open_edit(doc, id, now));
                    }
                }
                Handler::CloseModal => self.close(doc),
                Handler::SubmitEdit if self.in_flight.is_some() => {
                    outcome
                        .notices
                        .push(Notice::Error(UPDATE_IN_PROGRESS.to_string()));
                }
                Handler::SubmitEdit => match self.submit() {
                    Ok(Some(request)) => outcome.submit = Some(request),
                    Ok(None) => {}
                    Err(err) => {
                        tracing::error!(error = %err, "could not prepare update");
                        outcome.notices.push(Notice::Error(format!("update failed: {}", err)));
                    }
                },
                Handler::FieldInput(field) => {
                    let value = doc.value(node).to_string();
                    self.field_input(doc, field, &value);
                }
            }
        }
        outcome
    }

    pub fn click(&mut self, doc: &mut Document, target: NodeId, now: Instant) -> Outcome {
        self.handle_event(doc, target, EventKind::Click, now)
    }

    /// Replace an input's value and fire its input event
    pub fn input(
        &mut self,
        doc: &mut Document,
        target: NodeId,
        value: &str,
        now: Instant,
    ) -> Outcome {
        doc.set_value(target, value);
        self.handle_event(doc, target, EventKind::Input, now)
    }

    /// Seed the session from the post's rendered values and show the modal,
    /// building it first if needed
    pub fn open_edit(&mut self, doc: &mut Document, id: PostId, now: Instant) -> Vec<Notice> {
        let key = id.as_str();
        let title = doc.text_of(&title_id(key));
        let body = doc.text_of(&body_id(key));
        let media = doc.text_of(&media_id(key));
        let tags: Vec<String> = doc
            .get_elements_by_class(&tag_class(key))
            .into_iter()
            .map(|n| doc.text(n).to_string())
            .collect();

        tracing::info!(post = %id, "editing post");
        let prefill = Prefill {
            title: title.clone(),
            body: body.clone(),
            media: media.clone(),
            tags: join_tags(&tags),
        };
        self.session.seed(id, &title, &body, tags, Some(media.as_str()));
        let _ = self.machine.transition(EditEvent::Open);

        self.pending_open = Some(prefill);
        self.prepare(doc, now)
    }

    /// Copy a field's live value into the session
    pub fn field_input(&mut self, doc: &Document, field: Field, value: &str) {
        if self.machine.transition(EditEvent::Input).is_err() {
            return;
        }
        match (field, self.tag_source) {
            (Field::Tags, TagSource::Body) => {
                let body = doc
                    .get_element_by_id(BODY_FIELD_ID)
                    .map(|n| doc.value(n).to_string())
                    .unwrap_or_default();
                self.session.apply_input(Field::Tags, &body);
            }
            _ => self.session.apply_input(field, value),
        }
    }

    /// Hide the modal; the session is kept
    pub fn close(&mut self, doc: &mut Document) {
        self.pending_open = None;
        ModalBuilder::hide(doc);
        tracing::debug!(post = %self.session.id, "edit modal closed");
    }

    /// Snapshot the session into a replace request. Returns `None` while a
    /// previous submit is still in flight or when no edit is open.
    pub fn submit(&mut self) -> Result<Option<SubmitRequest>, ApiError> {
        if let Some(pending) = &self.in_flight {
            tracing::debug!(post = %pending, "submit ignored, update in flight");
            return Ok(None);
        }
        if !self.session.is_assigned() || !self.machine.can_transition(EditEvent::Submit) {
            tracing::warn!(state = ?self.machine.state(), "submit without an open edit");
            return Ok(None);
        }

        let draft = self.session.snapshot();
        let options = build_options(Method::Put, Some(&draft), &self.endpoints)?;
        let url = self.endpoints.post_url(&draft.id);
        let _ = self.machine.transition(EditEvent::Submit);
        self.in_flight = Some(draft.id.clone());

        tracing::info!(post = %draft.id, url = %url, "submitting update");
        Ok(Some(SubmitRequest {
            url,
            options,
            draft,
        }))
    }

    /// Apply the backend's answer to a submit for post `id`
    pub fn complete_submit(
        &mut self,
        doc: &mut Document,
        id: &PostId,
        result: Result<Post, ApiError>,
    ) -> Notice {
        if self.in_flight.as_ref() == Some(id) {
            self.in_flight = None;
        }
        // A new cycle opened meanwhile keeps its own modal and state
        let current_cycle = self.machine.state() == EditState::Submitting;

        match result {
            Ok(post) => {
                tracing::info!(post = %post.id, "post updated");
                render_post(doc, self.feed, &post);
                if current_cycle {
                    let _ = self.machine.transition(EditEvent::SubmitSucceeded);
                    ModalBuilder::hide(doc);
                }
                Notice::Success(UPDATE_SUCCESS.to_string())
            }
            Err(err) => {
                tracing::error!(post = %id, error = %err, "update failed");
                if current_cycle {
                    let _ = self.machine.transition(EditEvent::SubmitFailed);
                }
                Notice::Error(format!("update failed: {}", err))
            }
        }
    }
}

fn present(doc: &mut Document, prefill: &Prefill) {
    for (field, value) in [
        (Field::Title, &prefill.title),
        (Field::Body, &prefill.body),
        (Field::Media, &prefill.media),
        (Field::Tags, &prefill.tags),
    ] {
        if let Some(node) = doc.get_element_by_id(field_id(field)) {
            doc.set_value(node, value);
        }
    }
    ModalBuilder::show(doc);
}
