use crate::model::{CurrentUser, PostId};

/// Resource URLs for the signed-in user
#[derive(Debug, Clone)]
pub struct Endpoints {
    base: String,
    access_token: Option<String>,
}

impl Endpoints {
    /// The user's own `api_base`, when set, wins over the configured one
    pub fn for_user(base_url: &str, user: &CurrentUser) -> Self {
        let base = user.api_base.as_deref().unwrap_or(base_url);
        Endpoints {
            base: base.trim_end_matches('/').to_string(),
            access_token: user.access_token.clone().filter(|t| !t.is_empty()),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn posts_url(&self) -> String {
        format!("{}/posts", self.base)
    }

    /// URL of a single post. The id is percent-encoded as one path segment.
    pub fn post_url(&self, id: &PostId) -> String {
        format!("{}/posts/{}", self.base, urlencoding::encode(id.as_str()))
    }
}
