pub mod document;
pub mod event;
pub mod post_card;

pub use document::{Display, Document, Element, NodeId, ReadyState};
pub use event::{EventKind, Handler};
pub use post_card::{UPDATE_ID_ATTR, render_post};
