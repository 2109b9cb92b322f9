//! Durable client storage abstraction.
//!
//! State holders never touch the file system directly. They persist through a
//! [`DurableStore`], a string-valued key/value store that outlives a single
//! process run, so their logic can be exercised against [`MemoryStore`].

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;

use crate::error::Result;

/// Key of the persisted session record.
pub const USER_KEY: &str = "user";
/// Key of the persisted catalog snapshot.
pub const MEALS_KEY: &str = "allMeals";
/// Key of the persisted cart lines (host-chosen persistence).
pub const CART_KEY: &str = "cart";
/// Key of the locally recorded orders.
pub const ORDERS_KEY: &str = "orders";

/// Computes a record's new value from its current one (`None` if absent).
pub type UpdateFn = Box<dyn FnOnce(Option<String>) -> Result<String> + Send>;

/// Key/value storage scoped to one client.
///
/// Values are opaque strings; callers decide on the encoding (JSON via
/// [`load_json`] / [`save_json`]).
#[async_trait]
pub trait DurableStore: Send + Sync {
    /// Returns the stored value, or `None` when the key is absent.
    async fn load(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn save(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Replaces the value under `key` with `f(current)`.
    ///
    /// No other write to `key` lands between the read and the write. If `f`
    /// fails, nothing is written and its error is returned.
    async fn update(&self, key: &str, f: UpdateFn) -> Result<()>;
}

/// Loads and decodes a JSON record.
///
/// `Ok(None)` when the key is absent; a decoding failure is returned as a
/// serialization error so the caller can decide to fail closed.
pub async fn load_json<T>(store: &dyn DurableStore, key: &str) -> Result<Option<T>>
where
    T: DeserializeOwned,
{
    decode(store.load(key).await?.as_deref())
}

fn decode<T>(raw: Option<&str>) -> Result<Option<T>>
where
    T: DeserializeOwned,
{
    match raw {
        Some(raw) if !raw.trim().is_empty() => Ok(Some(serde_json::from_str(raw)?)),
        _ => Ok(None),
    }
}

/// Encodes `value` as JSON and stores it under `key`.
pub async fn save_json<T>(store: &dyn DurableStore, key: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    store.save(key, &raw).await
}

/// Loads a JSON record, treating malformed data as absent.
///
/// Storage errors and decoding failures are logged and swallowed.
pub async fn load_json_or_none<T>(store: &dyn DurableStore, key: &str) -> Option<T>
where
    T: DeserializeOwned,
{
    match load_json(store, key).await {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key, error = %e, "Ignoring unreadable stored record");
            None
        }
    }
}

/// Stores a JSON record without surfacing failures to the caller.
///
/// Durable writes are fire-and-forget; a failure is only logged.
pub async fn persist_json<T>(store: &dyn DurableStore, key: &str, value: &T)
where
    T: Serialize + ?Sized,
{
    if let Err(e) = save_json(store, key, value).await {
        tracing::warn!(key, error = %e, "Failed to persist record");
    }
}

/// Read-modify-write of a JSON record through [`DurableStore::update`].
///
/// `f` receives the decoded record; a malformed one is passed as `None`
/// with a warning, as [`load_json_or_none`] does.
pub async fn update_json<T, F>(store: &dyn DurableStore, key: &str, f: F) -> Result<()>
where
    T: Serialize + DeserializeOwned + 'static,
    F: FnOnce(Option<T>) -> T + Send + 'static,
{
    let owned_key = key.to_string();
    store
        .update(
            key,
            Box::new(move |raw: Option<String>| -> Result<String> {
                let current = decode(raw.as_deref()).unwrap_or_else(|e| {
                    tracing::warn!(key = %owned_key, error = %e, "Replacing unreadable stored record");
                    None
                });
                Ok(serde_json::to_string(&f(current))?)
            }),
        )
        .await
}

/// In-process [`DurableStore`] backed by a map.
///
/// Used by tests and by hosts that do not need state to survive a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with raw entries.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: RwLock::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Returns true if `key` currently holds a value.
    pub async fn contains(&self, key: &str) -> bool {
        self.entries.read().await.contains_key(key)
    }
}

#[async_trait]
impl DurableStore for MemoryStore {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn save(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn update(&self, key: &str, f: UpdateFn) -> Result<()> {
        let mut entries = self.entries.write().await;
        let value = f(entries.get(key).cloned())?;
        entries.insert(key.to_string(), value);
        Ok(())
    }
}
