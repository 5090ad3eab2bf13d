//! Radix-tree request router.
//!
//! One tree per HTTP method. O(path-length) lookup. Routing is the innermost
//! step of the pipeline: every layered middleware runs before it.

use std::collections::HashMap;
use std::sync::Arc;

use http::Method;
use matchit::Router as MatchitRouter;

use crate::handler::{BoxedHandler, Handler};

/// The application router.
///
/// Usually filled through [`AppBuilder::route`](crate::AppBuilder::route) or
/// by a service registration; standalone use chains with [`Router::on`].
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
    len: usize,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new(), len: 0 }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route pattern or conflicts with an
    /// existing route. Routes are registered at startup, so this surfaces
    /// before any traffic is served.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.add(method, path, handler);
        self
    }

    pub(crate) fn add(&mut self, method: Method, path: &str, handler: impl Handler) {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self.len += 1;
    }

    /// Number of registered method + path pairs.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn lookup(
        &self,
        method: &Method,
        path: &str,
    ) -> Option<(BoxedHandler, HashMap<String, String>)> {
        let tree = self.routes.get(method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((handler, params))
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}
