//! The external key→value store boundary (spec §6).
//!
//! The store is a pluggable collaborator, not part of the filter engine —
//! this module ships only the trait and a minimal in-memory reference
//! implementation used by this crate's own tests and doc examples. A real
//! deployment attaches a durable store (e.g. a Bolt- or Badger-like engine,
//! per spec §9) that satisfies the same five methods.

use std::collections::HashMap;
use std::sync::Mutex;

/// A durable key→value collaborator that [`crate::BloomFilter::put`]/`get`
/// and [`crate::ScalableBloomFilter::put`]/`get` delegate to once the
/// filter itself has answered a membership query.
pub trait Store: Send + Sync {
    /// Store `value` under `key`.
    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Fetch the value stored under `key`, if any.
    ///
    /// A cache miss here after a positive filter reply is expected — that
    /// is the Bloom false-positive case, not an error.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, Box<dyn std::error::Error + Send + Sync>>;

    /// Flush and release any resources held by the store.
    fn close(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Whether the store is open and able to serve requests.
    fn ready(&self) -> bool;

    /// An opaque handle for host introspection (e.g. the store's own
    /// connection object), exposed to callers that need to reach past this
    /// crate's narrow interface.
    fn handle(&self) -> &dyn std::any::Any;
}

/// A `HashMap`-backed [`Store`] used by this crate's tests and examples.
///
/// Not a production store: it holds everything in memory and is dropped
/// with the process. Real deployments attach a durable implementation.
#[derive(Debug)]
pub struct InMemoryStore {
    data: Mutex<HashMap<Vec<u8>, Vec<u8>>>,
    open: Mutex<bool>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            data: Mutex::new(HashMap::new()),
            open: Mutex::new(true),
        }
    }
}

impl Store for InMemoryStore {
    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.data.lock().unwrap().insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.data.lock().unwrap().get(key).cloned())
    }

    fn close(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        *self.open.lock().unwrap() = false;
        Ok(())
    }

    fn ready(&self) -> bool {
        *self.open.lock().unwrap()
    }

    fn handle(&self) -> &dyn std::any::Any {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_then_get() {
        let store = InMemoryStore::new();
        store.put(b"foo", b"bar").unwrap();
        assert_eq!(store.get(b"foo").unwrap(), Some(b"bar".to_vec()));
        assert_eq!(store.get(b"missing").unwrap(), None);
    }

    #[test]
    fn close_marks_not_ready() {
        let store = InMemoryStore::new();
        assert!(store.ready());
        store.close().unwrap();
        assert!(!store.ready());
    }
}
