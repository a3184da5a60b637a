use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration from config.toml. Every section may be omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub modal: ModalConfig,
    #[serde(default)]
    pub edit: EditConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:3000/api".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

/// Retry policy for building the edit modal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModalConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for ModalConfig {
    fn default() -> Self {
        ModalConfig {
            max_attempts: default_max_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

fn default_max_attempts() -> u32 {
    5
}

fn default_retry_delay_ms() -> u64 {
    5000
}

/// Which modal field feeds `tags` on input.
///
/// `Body` reproduces the legacy behaviour where typing in the tags field
/// re-parsed the body field's value. Kept selectable until the intended
/// behaviour is confirmed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagSource {
    #[default]
    Tags,
    Body,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EditConfig {
    #[serde(default)]
    pub tag_source: TagSource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub colors: HashMap<String, String>,
    /// How long notifications stay in the status row
    #[serde(default = "default_toast_secs")]
    pub toast_secs: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            colors: HashMap::new(),
            toast_secs: default_toast_secs(),
        }
    }
}

fn default_toast_secs() -> u64 {
    3
}
