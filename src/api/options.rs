use std::fmt;

use crate::model::PostDraft;

use super::client::ApiError;
use super::endpoints::Endpoints;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    /// Replace the resource
    Put,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => f.write_str("GET"),
            Method::Put => f.write_str("PUT"),
        }
    }
}

/// Everything needed to issue one request, apart from the URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: Vec<(String, String)>,
    /// JSON body
    pub body: Option<String>,
}

impl RequestOptions {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Build request options carrying `payload` as JSON and the user's
/// credentials from `endpoints`
pub fn build_options(
    method: Method,
    payload: Option<&PostDraft>,
    endpoints: &Endpoints,
) -> Result<RequestOptions, ApiError> {
    let mut headers = vec![("Accept".to_string(), "application/json".to_string())];
    let body = match payload {
        Some(draft) => {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
            Some(serde_json::to_string(draft)?)
        }
        None => None,
    };
    if let Some(token) = endpoints.access_token() {
        headers.push(("Authorization".to_string(), format!("Bearer {}", token)));
    }
    Ok(RequestOptions {
        method,
        headers,
        body,
    })
}
