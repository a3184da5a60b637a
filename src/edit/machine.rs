use thiserror::Error;

/// Phase of the current edit cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EditState {
    #[default]
    Idle,
    Seeded,
    Editing,
    Submitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditEvent {
    Open,
    Input,
    Submit,
    SubmitSucceeded,
    SubmitFailed,
}

pub type StateResult<T> = std::result::Result<T, StateError>;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("invalid edit transition: from {from:?} using event {event:?}")]
    InvalidTransition { from: EditState, event: EditEvent },
}

#[derive(Debug, Default)]
pub struct EditMachine {
    state: EditState,
}

impl EditMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> EditState {
        self.state
    }

    pub fn can_transition(&self, event: EditEvent) -> bool {
        self.next_state(event).is_some()
    }

    pub fn next_state(&self, event: EditEvent) -> Option<EditState> {
        use EditEvent::*;
        match (self.state, event) {
            // A new cycle may start at any time, even with a submit in flight
            (_, Open) => Some(EditState::Seeded),
            (EditState::Seeded | EditState::Editing, Input) => Some(EditState::Editing),
            (EditState::Submitting, Input) => Some(EditState::Submitting),
            (EditState::Seeded | EditState::Editing, Submit) => Some(EditState::Submitting),
            (EditState::Submitting, SubmitSucceeded) => Some(EditState::Idle),
            (EditState::Submitting, SubmitFailed) => Some(EditState::Editing),
            _ => None,
        }
    }

    pub fn transition(&mut self, event: EditEvent) -> StateResult<EditState> {
        tracing::debug!(from = ?self.state, event = ?event, "request edit transition");
        let next = self.next_state(event).ok_or_else(|| {
            let from = self.state;
            tracing::warn!(from = ?from, event = ?event, "invalid edit transition requested");
            StateError::InvalidTransition { from, event }
        })?;
        self.state = next;
        Ok(next)
    }
}
