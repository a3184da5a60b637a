use serde::{Deserialize, Serialize};

/// The signed-in user, as persisted in local storage under `currentUser`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub access_token: Option<String>,
    /// Overrides the configured API base URL for this user
    #[serde(default)]
    pub api_base: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_camel_case() {
        let user: CurrentUser =
            serde_json::from_str(r#"{"name":"ada","accessToken":"tok"}"#).unwrap();
        assert_eq!(user.name, "ada");
        assert_eq!(user.access_token.as_deref(), Some("tok"));
        assert_eq!(user.api_base, None);
    }
}
