use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of a post, as carried by its rendered elements.
///
/// Backends hand these out as integers or strings; both are kept as text so
/// they can be spliced into element ids and URLs unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PostId(String);

impl PostId {
    pub fn new(id: impl Into<String>) -> Self {
        PostId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `0` and the empty string both mean "not yet assigned"
    pub fn is_unset(&self) -> bool {
        self.0.is_empty() || self.0 == "0"
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PostId {
    fn from(s: &str) -> Self {
        PostId(s.to_string())
    }
}

impl From<u64> for PostId {
    fn from(n: u64) -> Self {
        PostId(n.to_string())
    }
}

impl<'de> Deserialize<'de> for PostId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Num(serde_json::Number),
            Text(String),
        }
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Num(n) => PostId(number_text(&n)),
            Raw::Text(s) => PostId(s),
        })
    }
}

/// Integral numbers print without a fraction, so `7.0` and `7` name the
/// same post
fn number_text(n: &serde_json::Number) -> String {
    if n.is_f64()
        && let Some(f) = n.as_f64()
        && f.is_finite()
        && f.fract() == 0.0
        && f.abs() < 1e15
    {
        return format!("{:.0}", f);
    }
    n.to_string()
}

/// A post as returned by the backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<String>,
}

/// The payload sent when replacing a post. Taken as an immutable copy of the
/// edit session at the moment submit is clicked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDraft {
    #[serde(skip)]
    pub id: PostId,
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
    pub media: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_id_accepts_numbers_and_strings() {
        let post: Post = serde_json::from_str(r#"{"id":42,"title":"T"}"#).unwrap();
        assert_eq!(post.id, PostId::from(42));
        let post: Post = serde_json::from_str(r#"{"id":"abc"}"#).unwrap();
        assert_eq!(post.id.as_str(), "abc");
        assert!(post.tags.is_empty());
        assert_eq!(post.media, None);
    }

    #[test]
    fn post_id_accepts_large_and_float_numbers() {
        let post: Post = serde_json::from_str(r#"{"id":18446744073709551615}"#).unwrap();
        assert_eq!(post.id.as_str(), "18446744073709551615");
        let post: Post = serde_json::from_str(r#"{"id":7.0}"#).unwrap();
        assert_eq!(post.id, PostId::from(7));
        let post: Post = serde_json::from_str(r#"{"id":-3}"#).unwrap();
        assert_eq!(post.id.as_str(), "-3");
        let post: Post = serde_json::from_str(r#"{"id":1.5}"#).unwrap();
        assert_eq!(post.id.as_str(), "1.5");
    }

    #[test]
    fn unset_ids() {
        assert!(PostId::default().is_unset());
        assert!(PostId::from("0").is_unset());
        assert!(!PostId::from(7).is_unset());
    }

    #[test]
    fn draft_payload_omits_id() {
        let draft = PostDraft {
            id: PostId::from(42),
            title: "T".into(),
            body: "B".into(),
            tags: vec!["x".into()],
            media: None,
        };
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"title": "T", "body": "B", "tags": ["x"], "media": null})
        );
    }
}
