use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use http::Extensions;

use crate::Error;

/// Key/value storage scoped to one client session.
///
/// The guard only ever reads and writes its own token key. Expiry and
/// destruction of sessions belong to whatever implements this trait. Failures
/// are reported as [`Error::SessionStore`].
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, Error>;

    async fn set(&self, key: &str, value: String) -> Result<(), Error>;

    /// Returns the value under `key`, storing the result of `f` first when
    /// there is none.
    ///
    /// The provided implementation is a plain read followed by a write.
    /// Stores shared by concurrent requests of one session should override it
    /// so that both happen under the same lock.
    async fn get_or_insert_with(
        &self,
        key: &str,
        f: &mut (dyn FnMut() -> String + Send),
    ) -> Result<String, Error> {
        match self.get(key).await? {
            Some(value) => Ok(value),
            None => {
                let value = f();
                self.set(key, value.clone()).await?;
                Ok(value)
            }
        }
    }
}

/// Handle to the active session of a request.
///
/// A session layer running before `CsrfGuard` inserts this into the request
/// extensions. With the `tower-sessions` feature a `tower_sessions::Session`
/// works as well. A request with neither has no active session.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn SessionStore>,
}

impl Session {
    pub fn new(store: impl SessionStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Wraps a store that is already shared, e.g. with a session layer that
    /// keeps its own handle.
    pub fn from_arc(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub(crate) fn from_extensions(extensions: &Extensions) -> Option<Self> {
        if let Some(session) = extensions.get::<Session>() {
            return Some(session.clone());
        }

        #[cfg(feature = "tower-sessions")]
        if let Some(session) = extensions.get::<tower_sessions::Session>() {
            return Some(Self::new(session.clone()));
        }

        None
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        self.store.get(key).await
    }

    pub async fn set(&self, key: &str, value: impl Into<String>) -> Result<(), Error> {
        self.store.set(key, value.into()).await
    }

    pub async fn get_or_insert_with(
        &self,
        key: &str,
        mut f: impl FnMut() -> String + Send,
    ) -> Result<String, Error> {
        self.store.get_or_insert_with(key, &mut f).await
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}

/// In-memory session storage.
#[derive(Debug, Default)]
pub struct MemorySession {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    fn values(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A panic while holding the lock can't leave the map half-written.
        self.values.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl SessionStore for MemorySession {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let value = self.values().get(key).cloned();

        Ok(value)
    }

    async fn set(&self, key: &str, value: String) -> Result<(), Error> {
        self.values().insert(key.to_owned(), value);

        Ok(())
    }

    async fn get_or_insert_with(
        &self,
        key: &str,
        f: &mut (dyn FnMut() -> String + Send),
    ) -> Result<String, Error> {
        let value = self
            .values()
            .entry(key.to_owned())
            .or_insert_with(|| f())
            .clone();

        Ok(value)
    }
}

#[cfg(feature = "tower-sessions")]
#[async_trait]
impl SessionStore for tower_sessions::Session {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        tower_sessions::Session::get::<String>(self, key)
            .await
            .map_err(|err| Error::SessionStore(err.to_string()))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), Error> {
        self.insert(key, value)
            .await
            .map_err(|err| Error::SessionStore(err.to_string()))
    }
}
