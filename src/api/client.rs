use std::time::Duration;

use reqwest::blocking::Client;

use crate::model::Post;

use super::options::{Method, RequestOptions};

/// Error type for backend calls
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// The backend as seen by the editor. Implementations must be shareable
/// with the submit worker thread.
pub trait PostApi: Send + Sync {
    /// Issue a request whose response is a single post
    fn call(&self, url: &str, options: &RequestOptions) -> Result<Post, ApiError>;

    /// Issue a request whose response is a list of posts
    fn fetch_all(&self, url: &str, options: &RequestOptions) -> Result<Vec<Post>, ApiError>;
}

/// Blocking HTTP client. No retries; the timeout comes from config.
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("postedit/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(HttpClient { client })
    }

    fn send(&self, url: &str, options: &RequestOptions) -> Result<String, ApiError> {
        let mut request = match options.method {
            Method::Get => self.client.get(url),
            Method::Put => self.client.put(url),
        };
        for (name, value) in &options.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &options.body {
            request = request.body(body.clone());
        }

        tracing::debug!(method = %options.method, url, "sending request");
        let response = request.send()?;
        let status = response.status();
        let text = response.text()?;
        if !status.is_success() {
            tracing::warn!(method = %options.method, url, status = status.as_u16(), "request rejected");
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(text)
    }
}

impl PostApi for HttpClient {
    fn call(&self, url: &str, options: &RequestOptions) -> Result<Post, ApiError> {
        let text = self.send(url, options)?;
        Ok(serde_json::from_str(&text)?)
    }

    fn fetch_all(&self, url: &str, options: &RequestOptions) -> Result<Vec<Post>, ApiError> {
        let text = self.send(url, options)?;
        Ok(serde_json::from_str(&text)?)
    }
}
