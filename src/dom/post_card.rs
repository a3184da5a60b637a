use crate::model::Post;

use super::document::{Document, NodeId};
use super::event::{EventKind, Handler};

/// Attribute on a post's edit trigger that names the post
pub const UPDATE_ID_ATTR: &str = "data-update-id";

pub fn card_id(id: &str) -> String {
    format!("post{}", id)
}

pub fn title_id(id: &str) -> String {
    format!("title{}", id)
}

pub fn body_id(id: &str) -> String {
    format!("body{}", id)
}

pub fn media_id(id: &str) -> String {
    format!("media{}", id)
}

pub fn tag_class(id: &str) -> String {
    format!("tag{}", id)
}

/// Render a post card under `parent`. A card already showing the same post
/// is replaced in place, so a re-render keeps its position in the feed.
pub fn render_post(doc: &mut Document, parent: NodeId, post: &Post) -> NodeId {
    let id = post.id.as_str();
    let card_key = card_id(id);
    let existing = doc.get_element_by_id(&card_key);

    let (title_key, body_key) = (title_id(id), body_id(id));
    let card = doc.create("article", "", parent, &[("id", card_key.as_str())], &["post"]);
    doc.create("h2", &post.title, card, &[("id", title_key.as_str())], &["post__title"]);
    doc.create("p", &post.body, card, &[("id", body_key.as_str())], &["post__body"]);
    if let Some(media) = post.media.as_deref().filter(|m| !m.is_empty()) {
        let media_key = media_id(id);
        doc.create(
            "a",
            media,
            card,
            &[("id", media_key.as_str()), ("href", media)],
            &["post__media"],
        );
    }
    let tags = doc.create("div", "", card, &[], &["post__tags"]);
    let class = tag_class(id);
    for tag in &post.tags {
        doc.create("span", tag, tags, &[], &["tag", class.as_str()]);
    }
    let edit = doc.create("button", "Edit", card, &[(UPDATE_ID_ATTR, id)], &["post__edit"]);
    doc.add_listener(edit, EventKind::Click, Handler::OpenEdit);

    if let Some(old) = existing {
        doc.replace(old, card);
    }
    card
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PostId;

    fn post(id: u64, title: &str) -> Post {
        Post {
            id: PostId::from(id),
            title: title.into(),
            body: "body".into(),
            tags: vec!["x".into(), "y".into()],
            media: None,
        }
    }

    #[test]
    fn exposes_the_post_surface() {
        let mut doc = Document::new();
        let root = doc.root();
        render_post(&mut doc, root, &post(7, "Hello"));

        assert_eq!(doc.text_of("title7"), "Hello");
        assert_eq!(doc.text_of("body7"), "body");
        assert_eq!(doc.get_elements_by_class("tag7").len(), 2);
        let triggers = doc.query_attr(UPDATE_ID_ATTR);
        assert_eq!(triggers.len(), 1);
        assert_eq!(doc.attr(triggers[0], UPDATE_ID_ATTR), Some("7"));
        assert_eq!(
            doc.dispatch(triggers[0], EventKind::Click),
            vec![(triggers[0], Handler::OpenEdit)]
        );
    }

    #[test]
    fn rerender_replaces_in_place() {
        let mut doc = Document::new();
        let root = doc.root();
        render_post(&mut doc, root, &post(1, "one"));
        render_post(&mut doc, root, &post(2, "two"));
        render_post(&mut doc, root, &post(1, "one, edited"));

        let cards = doc.get_elements_by_class("post");
        assert_eq!(cards.len(), 2);
        assert_eq!(doc.attr(cards[0], "id"), Some("post1"));
        assert_eq!(doc.text_of("title1"), "one, edited");
        // The old card's trigger listener went with it
        assert_eq!(doc.query_attr(UPDATE_ID_ATTR).len(), 2);
        assert_eq!(doc.listener_count(), 2);
    }
}
