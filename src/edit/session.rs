use crate::model::{PostDraft, PostId};

/// Separator between tags in the modal's tags field
pub const TAG_SEPARATOR: char = '#';

/// An editable field of the modal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Body,
    Media,
    Tags,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Title, Field::Body, Field::Media, Field::Tags];

    pub fn label(self) -> &'static str {
        match self {
            Field::Title => "Title",
            Field::Body => "Body",
            Field::Media => "Media URL",
            Field::Tags => "Tags",
        }
    }
}

/// Split a tags string on `#`. Empty fragments and duplicates are kept.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(TAG_SEPARATOR).map(str::to_string).collect()
}

pub fn join_tags(tags: &[String]) -> String {
    tags.join(&TAG_SEPARATOR.to_string())
}

/// The post currently being edited and its live field values.
///
/// One session exists per workflow and is overwritten by each new edit
/// cycle; it is never queued or stacked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditSession {
    pub id: PostId,
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
    pub media: Option<String>,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_assigned(&self) -> bool {
        !self.id.is_unset()
    }

    /// Start an edit cycle: the id always changes, other fields follow
    /// [`set_all`](Self::set_all).
    pub fn seed(
        &mut self,
        id: PostId,
        title: &str,
        body: &str,
        tags: Vec<String>,
        media: Option<&str>,
    ) {
        self.id = id;
        self.set_all(title, body, tags, media);
    }

    /// Conditional merge: only non-empty incoming values overwrite.
    pub fn set_all(&mut self, title: &str, body: &str, tags: Vec<String>, media: Option<&str>) {
        if !title.is_empty() {
            self.title = title.to_string();
        }
        if !body.is_empty() {
            self.body = body.to_string();
        }
        if !tags.is_empty() {
            self.tags = tags;
        }
        if let Some(media) = media.filter(|m| !m.is_empty()) {
            self.media = Some(media.to_string());
        }
    }

    /// Overwrite one field with a live input value
    pub fn apply_input(&mut self, field: Field, value: &str) {
        match field {
            Field::Title => self.title = value.to_string(),
            Field::Body => self.body = value.to_string(),
            Field::Media => {
                self.media = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                }
            }
            Field::Tags => self.tags = parse_tags(value),
        }
    }

    /// Immutable copy for a submit request
    pub fn snapshot(&self) -> PostDraft {
        PostDraft {
            id: self.id.clone(),
            title: self.title.clone(),
            body: self.body.clone(),
            tags: self.tags.clone(),
            media: self.media.clone(),
        }
    }
}
