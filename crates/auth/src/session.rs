//! Session token holders.
//!
//! The guard never reaches into ambient state: callers hand it a
//! [`SessionStore`] to read from and, on specific failures, invalidate.

use std::sync::{Arc, Mutex, MutexGuard};

/// Holder of the current bearer token.
pub trait SessionStore: Send + Sync {
    /// Current token, if any.
    fn get(&self) -> Option<String>;

    /// Replace the current token.
    fn set(&self, token: String);

    /// Invalidate the current token. Idempotent.
    fn clear(&self);
}

impl<S: SessionStore + ?Sized> SessionStore for Arc<S> {
    fn get(&self) -> Option<String> {
        (**self).get()
    }

    fn set(&self, token: String) {
        (**self).set(token)
    }

    fn clear(&self) {
        (**self).clear()
    }
}

impl<S: SessionStore + ?Sized> SessionStore for &S {
    fn get(&self) -> Option<String> {
        (**self).get()
    }

    fn set(&self, token: String) {
        (**self).set(token)
    }

    fn clear(&self) {
        (**self).clear()
    }
}

/// Process-local session store.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    token: Mutex<Option<String>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<String>> {
        // Poisoning cannot leave an `Option<String>` half-written.
        self.token.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self) -> Option<String> {
        self.slot().clone()
    }

    fn set(&self, token: String) {
        *self.slot() = Some(token);
    }

    fn clear(&self) {
        *self.slot() = None;
    }
}

/// A primary store backed by a lower-priority fallback lookup.
///
/// `get` prefers the primary and only consults the fallback when the primary
/// holds nothing. `set` writes the primary only. `clear` clears both, so an
/// invalidated token cannot resurface from the fallback on the next read.
#[derive(Debug, Default)]
pub struct LayeredSessionStore<P, F> {
    primary: P,
    fallback: F,
}

impl<P: SessionStore, F: SessionStore> LayeredSessionStore<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }

    pub fn primary(&self) -> &P {
        &self.primary
    }

    pub fn fallback(&self) -> &F {
        &self.fallback
    }
}

impl<P: SessionStore, F: SessionStore> SessionStore for LayeredSessionStore<P, F> {
    fn get(&self) -> Option<String> {
        self.primary.get().or_else(|| self.fallback.get())
    }

    fn set(&self, token: String) {
        self.primary.set(token);
    }

    fn clear(&self) {
        self.primary.clear();
        self.fallback.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_set_get_clear() {
        let store = InMemorySessionStore::new();
        assert_eq!(store.get(), None);

        store.set("abc".to_string());
        assert_eq!(store.get().as_deref(), Some("abc"));

        store.clear();
        store.clear();
        assert_eq!(store.get(), None);
    }

    #[test]
    fn layered_prefers_primary() {
        let store = LayeredSessionStore::new(
            InMemorySessionStore::with_token("primary"),
            InMemorySessionStore::with_token("fallback"),
        );
        assert_eq!(store.get().as_deref(), Some("primary"));
    }

    #[test]
    fn layered_falls_back_when_primary_is_empty() {
        let store = LayeredSessionStore::new(
            InMemorySessionStore::new(),
            InMemorySessionStore::with_token("fallback"),
        );
        assert_eq!(store.get().as_deref(), Some("fallback"));

        store.set("fresh".to_string());
        assert_eq!(store.primary().get().as_deref(), Some("fresh"));
        assert_eq!(store.fallback().get().as_deref(), Some("fallback"));
    }

    #[test]
    fn layered_clear_empties_both_layers() {
        let store = LayeredSessionStore::new(
            InMemorySessionStore::with_token("primary"),
            InMemorySessionStore::with_token("fallback"),
        );
        store.clear();
        assert_eq!(store.get(), None);
    }
}
