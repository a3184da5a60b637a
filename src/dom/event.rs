use crate::edit::Field;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Click,
    Input,
}

/// What a listener does when its event fires. The edit workflow interprets
/// these against its own session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    /// Start editing the post named by the element's `data-update-id`
    OpenEdit,
    CloseModal,
    SubmitEdit,
    FieldInput(Field),
}
