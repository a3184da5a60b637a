use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::io::config_io::ConfigError;
use crate::model::CurrentUser;

pub const STORAGE_FILE: &str = "local_storage.json";
pub const CURRENT_USER_KEY: &str = "currentUser";

/// String key/value store persisted as JSON in the data directory. Values
/// are themselves usually JSON text.
#[derive(Debug, Clone, Default)]
pub struct LocalStorage {
    path: PathBuf,
    items: IndexMap<String, String>,
}

impl LocalStorage {
    /// Open the store in `data_dir`. A missing file is an empty store.
    pub fn open(data_dir: &Path) -> Result<Self, ConfigError> {
        let path = data_dir.join(STORAGE_FILE);
        let items = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => IndexMap::new(),
            Err(e) => return Err(ConfigError::ReadError { path, source: e }),
        };
        Ok(LocalStorage { path, items })
    }

    pub fn get_item(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(|s| s.as_str())
    }

    pub fn set_item(&mut self, key: &str, value: &str) {
        self.items.insert(key.to_string(), value.to_string());
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let content = serde_json::to_string_pretty(&self.items)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    /// The signed-in user. Absent or unreadable entries give an anonymous
    /// user.
    pub fn current_user(&self) -> CurrentUser {
        let Some(raw) = self.get_item(CURRENT_USER_KEY) else {
            tracing::warn!("no current user in local storage, continuing anonymously");
            return CurrentUser::default();
        };
        serde_json::from_str(raw).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "unreadable current user in local storage");
            CurrentUser::default()
        })
    }

    pub fn set_current_user(&mut self, user: &CurrentUser) -> Result<(), ConfigError> {
        let raw = serde_json::to_string(user)?;
        self.set_item(CURRENT_USER_KEY, &raw);
        Ok(())
    }
}
