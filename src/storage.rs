//! Key/value storage and the request session built on it.

use crate::ids::SessionId;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Flat key/value store contract.
pub trait Storage {
    fn has(&self, key: &str) -> bool;

    /// Value for `key`, `None` when absent.
    fn get(&self, key: &str) -> Option<&Value>;

    fn set(&mut self, key: &str, value: Value);

    /// Remove one key. Returns the previous value.
    fn clear(&mut self, key: &str) -> Option<Value>;

    /// Remove every key.
    fn reset(&mut self);
}

/// In-memory [`Storage`] over JSON values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStorage {
    data: Map<String, Value>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Nested lookup with a dotted path: `get_path("user.address.city")`.
    ///
    /// Each step descends into a JSON object; a missing key or a non-object
    /// value along the way yields `None`.
    #[must_use]
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let mut current = self.data.get(parts.next()?)?;
        for part in parts {
            current = current.as_object()?.get(part)?;
        }
        Some(current)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(self.data.clone())
    }
}

impl Storage for MemoryStorage {
    fn has(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    fn set(&mut self, key: &str, value: Value) {
        self.data.insert(key.to_string(), value);
    }

    fn clear(&mut self, key: &str) -> Option<Value> {
        self.data.remove(key)
    }

    fn reset(&mut self) {
        self.data.clear();
    }
}

impl From<Map<String, Value>> for MemoryStorage {
    fn from(data: Map<String, Value>) -> Self {
        Self { data }
    }
}

/// Session data shared by a request and every request forwarded from it.
///
/// Cloning a `Session` clones the handle, not the data.
#[derive(Debug, Clone, Default)]
pub struct Session {
    inner: Arc<Mutex<MemoryStorage>>,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_storage(storage: MemoryStorage) -> Self {
        Self {
            inner: Arc::new(Mutex::new(storage)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MemoryStorage> {
        // a panicking action must not poison the session for the rest of the request
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.lock().has(key)
    }

    /// Owned copy of the value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.lock().get(key).cloned()
    }

    #[must_use]
    pub fn get_path(&self, path: &str) -> Option<Value> {
        self.lock().get_path(path).cloned()
    }

    pub fn set(&self, key: &str, value: impl Into<Value>) {
        self.lock().set(key, value.into());
    }

    pub fn clear(&self, key: &str) -> Option<Value> {
        self.lock().clear(key)
    }

    pub fn reset(&self) {
        self.lock().reset();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// True when both handles point at the same data.
    #[must_use]
    pub fn ptr_eq(&self, other: &Session) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Sessions kept across requests, keyed by the id sent in the session cookie.
///
/// Held by the application for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<SessionId, Session>>>,
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SessionId, Session>> {
        self.sessions.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Handle to the stored session, `None` for an unknown id.
    #[must_use]
    pub fn get(&self, id: SessionId) -> Option<Session> {
        self.lock().get(&id).cloned()
    }

    pub fn insert(&self, id: SessionId, session: Session) {
        self.lock().insert(id, session);
    }

    pub fn remove(&self, id: SessionId) -> Option<Session> {
        self.lock().remove(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_memory_storage_basics() {
        let mut storage = MemoryStorage::new();
        assert!(!storage.has("a"));
        storage.set("a", json!(1));
        assert!(storage.has("a"));
        assert_eq!(storage.get("a"), Some(&json!(1)));
        assert_eq!(storage.clear("a"), Some(json!(1)));
        assert!(storage.is_empty());
    }

    #[test]
    fn test_reset() {
        let mut storage = MemoryStorage::new();
        storage.set("a", json!(1));
        storage.set("b", json!(2));
        storage.reset();
        assert_eq!(storage.len(), 0);
    }

    #[test]
    fn test_get_path() {
        let mut storage = MemoryStorage::new();
        storage.set("user", json!({"address": {"city": "Oslo"}, "age": 3}));
        assert_eq!(storage.get_path("user.address.city"), Some(&json!("Oslo")));
        assert_eq!(storage.get_path("user.age.years"), None);
        assert_eq!(storage.get_path("user.missing"), None);
        assert_eq!(storage.get_path("user").map(Value::is_object), Some(true));
    }

    #[test]
    fn test_session_handles_share_data() {
        let session = Session::new();
        let forwarded = session.clone();
        forwarded.set("flash", "saved");
        assert_eq!(session.get("flash"), Some(json!("saved")));
        assert!(session.ptr_eq(&forwarded));
        session.reset();
        assert!(!forwarded.has("flash"));
    }

    #[test]
    fn test_session_store_returns_shared_handle() {
        let store = SessionStore::new();
        let id = SessionId::new();
        let session = Session::new();
        store.insert(id, session.clone());

        let loaded = store.get(id).unwrap();
        assert!(loaded.ptr_eq(&session));
        loaded.set("cart", json!([1, 2]));
        assert_eq!(store.get(id).unwrap().get("cart"), Some(json!([1, 2])));

        assert!(store.get(SessionId::new()).is_none());
        assert!(store.remove(id).is_some());
        assert!(store.is_empty());
    }
}
