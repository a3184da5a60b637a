pub mod machine;
pub mod modal;
pub mod session;
pub mod workflow;

pub use machine::{EditEvent, EditMachine, EditState, StateError};
pub use modal::{BuildStatus, EnsureOutcome, ModalBuild, ModalBuilder};
pub use session::{EditSession, Field, parse_tags};
pub use workflow::{Notice, Outcome, SubmitRequest, UpdateWorkflow};
