//! JSON-file session store.
//!
//! The file is a flat JSON object; the session id lives under one fixed key
//! and any other keys are left alone. Writes go to a `.tmp` sibling first
//! and are renamed into place.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use nova_common::{SessionId, StoreError};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::SessionStore;

pub const DEFAULT_SESSION_KEY: &str = "nova_session";

pub struct FileSessionStore {
    path: PathBuf,
    key: String,
    /// Serializes read-modify-write cycles on the file.
    write_lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            key: DEFAULT_SESSION_KEY.to_string(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Like [`SessionStore::load`] but reports why nothing was loaded.
    ///
    /// A missing file or missing key is `Ok(None)`, not an error.
    pub fn try_load(&self) -> Result<Option<SessionId>, StoreError> {
        let Some(map) = self.read_map()? else {
            return Ok(None);
        };
        match map.get(&self.key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(raw)) => Ok(SessionId::parse(raw.as_str())),
            Some(other) => Err(StoreError::Corrupt(format!(
                "key {:?} holds {other}, expected a string",
                self.key
            ))),
        }
    }

    /// Like [`SessionStore::save`] but reports failures.
    pub fn try_save(&self, id: &SessionId) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        let mut map = match self.read_map() {
            Ok(map) => map.unwrap_or_default(),
            Err(StoreError::Corrupt(reason)) => {
                warn!(path = %self.path.display(), "replacing corrupt session file: {reason}");
                Map::new()
            }
            Err(e) => return Err(e),
        };
        map.insert(self.key.clone(), Value::String(id.as_str().to_string()));

        let content = serde_json::to_string_pretty(&Value::Object(map))
            .map_err(|e| StoreError::Corrupt(format!("failed to serialize session file: {e}")))?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, &content).map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;

        if let Err(e) = std::fs::rename(&tmp_path, &self.path) {
            // Rename failed -- try direct write as fallback (Windows compat)
            warn!("atomic rename failed ({e}), falling back to direct write");
            let _ = std::fs::remove_file(&tmp_path);
            std::fs::write(&self.path, &content).map_err(|source| StoreError::Io {
                path: self.path.clone(),
                source,
            })?;
        }

        debug!(path = %self.path.display(), "session id saved");
        Ok(())
    }

    fn read_map(&self) -> Result<Option<Map<String, Value>>, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => Ok(Some(map)),
            Ok(_) => Err(StoreError::Corrupt("expected a JSON object".into())),
            Err(e) => Err(StoreError::Corrupt(e.to_string())),
        }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Option<SessionId> {
        match self.try_load() {
            Ok(id) => id,
            Err(e) => {
                warn!("ignoring stored session: {e}");
                None
            }
        }
    }

    fn save(&self, id: &SessionId) {
        if let Err(e) = self.try_save(id) {
            warn!("failed to persist session id: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sid(raw: &str) -> SessionId {
        SessionId::parse(raw).unwrap()
    }

    #[test]
    fn missing_file_loads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));
        assert!(store.try_load().unwrap().is_none());
        assert!(store.load().is_none());
    }

    #[test]
    fn save_then_load_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        FileSessionStore::new(&path).save(&sid("s1"));
        assert!(path.exists());

        let reopened = FileSessionStore::new(&path);
        assert_eq!(reopened.load(), Some(sid("s1")));
    }

    #[test]
    fn save_overwrites_previous_value() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));
        store.save(&sid("s1"));
        store.save(&sid("s2"));
        assert_eq!(store.load(), Some(sid("s2")));
    }

    #[test]
    fn stores_under_configured_key_and_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, r#"{"theme":"dark"}"#).unwrap();

        let store = FileSessionStore::new(&path).with_key("widget_session");
        store.save(&sid("s9"));

        let raw: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["widget_session"], "s9");
        assert_eq!(raw["theme"], "dark");
        assert!(raw.get(DEFAULT_SESSION_KEY).is_none());
    }

    #[test]
    fn corrupt_file_loads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = FileSessionStore::new(&path);
        assert!(matches!(store.try_load(), Err(StoreError::Corrupt(_))));
        assert!(store.load().is_none());
    }

    #[test]
    fn non_object_file_loads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, r#"["s1"]"#).unwrap();

        assert!(FileSessionStore::new(&path).load().is_none());
    }

    #[test]
    fn non_string_or_blank_value_loads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        std::fs::write(&path, r#"{"nova_session": 42}"#).unwrap();
        let store = FileSessionStore::new(&path);
        assert!(matches!(store.try_load(), Err(StoreError::Corrupt(_))));
        assert!(store.load().is_none());

        std::fs::write(&path, r#"{"nova_session": "  "}"#).unwrap();
        assert!(store.load().is_none());

        std::fs::write(&path, r#"{"nova_session": null}"#).unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn save_replaces_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "garbage").unwrap();

        let store = FileSessionStore::new(&path);
        store.try_save(&sid("s1")).unwrap();
        assert_eq!(store.load(), Some(sid("s1")));
    }

    #[test]
    fn save_failure_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be makes every write fail.
        let path = dir.path().join("session.json");
        std::fs::create_dir_all(&path).unwrap();

        let store = FileSessionStore::new(&path);
        assert!(store.try_save(&sid("s1")).is_err());
        store.save(&sid("s1"));
        assert!(store.load().is_none());
    }

    #[test]
    fn no_tmp_file_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        FileSessionStore::new(&path).save(&sid("s1"));
        assert!(!path.with_extension("json.tmp").exists());
    }
}
