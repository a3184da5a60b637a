use serde::Serialize;

use crate::edit::Notice;
use crate::model::{CurrentUser, Post};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct EditResultJson<'a> {
    pub ok: bool,
    pub message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<&'a Post>,
}

#[derive(Serialize)]
pub struct UserJson<'a> {
    pub name: &'a str,
    pub token_set: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<&'a str>,
}

pub fn user_to_json(user: &CurrentUser) -> UserJson<'_> {
    UserJson {
        name: &user.name,
        token_set: user.access_token.is_some(),
        api_base: user.api_base.as_deref(),
    }
}

pub fn edit_result_json<'a>(notice: &'a Notice, post: Option<&'a Post>) -> EditResultJson<'a> {
    match notice {
        Notice::Success(message) => EditResultJson {
            ok: true,
            message,
            post,
        },
        Notice::Error(message) => EditResultJson {
            ok: false,
            message,
            post: None,
        },
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

fn tags_suffix(tags: &[String]) -> String {
    let tags: Vec<String> = tags
        .iter()
        .filter(|t| !t.is_empty())
        .map(|t| format!("#{}", t))
        .collect();
    if tags.is_empty() {
        String::new()
    } else {
        format!(" {}", tags.join(" "))
    }
}

/// Format a single post as a one-line summary
pub fn format_post_line(post: &Post) -> String {
    format!("{} {}{}", post.id, post.title, tags_suffix(&post.tags))
}

/// Format detailed post view
pub fn format_post_detail(post: &Post) -> Vec<String> {
    let mut lines = vec![format!("{} {}", post.id, post.title)];
    if !post.body.is_empty() {
        lines.push(String::new());
        lines.extend(post.body.lines().map(|l| format!("  {}", l)));
    }
    if !post.tags.is_empty() {
        lines.push(format!("tags:{}", tags_suffix(&post.tags)));
    }
    if let Some(media) = &post.media {
        lines.push(format!("media: {}", media));
    }
    lines
}

/// Format the signed-in user. The token itself is never printed.
pub fn format_user(user: &CurrentUser) -> Vec<String> {
    let name = if user.name.is_empty() {
        "(anonymous)"
    } else {
        user.name.as_str()
    };
    vec![
        format!("user: {}", name),
        format!(
            "token: {}",
            if user.access_token.is_some() { "set" } else { "none" }
        ),
        format!("api base: {}", user.api_base.as_deref().unwrap_or("(config)")),
    ]
}
