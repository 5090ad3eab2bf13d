//! Shared service instances.
//!
//! Service registrations put values here during the build phase; handlers
//! read them back per request through [`Request::service`](crate::Request::service).
//! This is a type map, not a container: no scopes, no lifetimes, no
//! resolution graph. One value per type, shared behind an `Arc`.

use std::fmt;
use std::sync::Arc;

use http::Extensions;

/// A type-keyed set of shared services.
#[derive(Default)]
pub struct Services {
    inner: Extensions,
    len: usize,
}

impl Services {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value`, replacing any previous value of the same type.
    pub fn insert<T: Send + Sync + 'static>(&mut self, value: T) {
        if self.inner.insert(Arc::new(value)).is_none() {
            self.len += 1;
        }
    }

    pub fn get<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.inner.get::<Arc<T>>().map(Arc::clone)
    }

    pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
        self.inner.get::<Arc<T>>().is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl fmt::Debug for Services {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Services").field("len", &self.len).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Pool(u32);

    #[test]
    fn insert_replaces_same_type() {
        let mut services = Services::new();
        services.insert(Pool(1));
        services.insert(Pool(2));
        services.insert("name");

        assert_eq!(services.len(), 2);
        assert_eq!(services.get::<Pool>().as_deref(), Some(&Pool(2)));
        assert!(services.contains::<&'static str>());
        assert!(!services.contains::<u64>());
    }
}
