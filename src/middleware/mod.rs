//! Middleware layer.
//!
//! Middleware intercepts requests and responses and is the right place for
//! cross-cutting concerns: structured tracing, request-id injection, and
//! authentication-header inspection.
//!
//! Middleware is layered onto an [`App`](crate::App), normally from a
//! [`MiddlewareRegistration`](crate::MiddlewareRegistration)'s `install`. The
//! first layer added is the outermost; routing is always the innermost step.
//!
//! ```text
//! request → layer 0 → layer 1 → … → router → handler
//! response ←────────────────────────────────┘
//! ```
//!
//! A middleware either answers on its own or calls [`Next::run`] to continue:
//!
//! ```rust
//! use enlist::{Next, Request, Response, StatusCode};
//!
//! async fn require_token(req: Request, next: Next) -> Response {
//!     if req.header("authorization").is_none() {
//!         return Response::status(StatusCode::UNAUTHORIZED);
//!     }
//!     next.run(req).await
//! }
//! ```

pub mod trace;

use std::future::Future;
use std::sync::Arc;

use http::StatusCode;

use crate::handler::BoxFuture;
use crate::request::Request;
use crate::response::{IntoResponse, Response};
use crate::router::Router;

/// One step of the request pipeline.
///
/// Implemented for every `Fn(Request, Next) -> impl Future<Output = impl IntoResponse>`,
/// so an `async fn` is usually enough.
pub trait Middleware: Send + Sync + 'static {
    fn call(&self, req: Request, next: Next) -> BoxFuture;
}

impl<F, Fut, R> Middleware for F
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request, next: Next) -> BoxFuture {
        let fut = self(req, next);
        Box::pin(async move { fut.await.into_response() })
    }
}

pub(crate) type BoxedMiddleware = Arc<dyn Middleware>;

/// The frozen pipeline an app serves: middleware in order, then the router.
pub(crate) struct Pipeline {
    layers: Vec<BoxedMiddleware>,
    router: Router,
}

impl Pipeline {
    pub(crate) fn new(layers: Vec<BoxedMiddleware>, router: Router) -> Self {
        Self { layers, router }
    }

    /// Runs `req` through every layer and the router.
    pub(crate) async fn handle(self: &Arc<Self>, req: Request) -> Response {
        Next { pipeline: Arc::clone(self), index: 0 }.run(req).await
    }

    async fn route(&self, mut req: Request) -> Response {
        match self.router.lookup(&req.method, &req.path) {
            Some((handler, params)) => {
                req.params = params;
                handler.call(req).await
            }
            None => Response::status(StatusCode::NOT_FOUND),
        }
    }
}

/// The rest of the pipeline after the current middleware.
pub struct Next {
    pipeline: Arc<Pipeline>,
    index: usize,
}

impl Next {
    /// Passes `req` to the next layer, or to the router after the last one.
    pub fn run(self, req: Request) -> BoxFuture {
        Box::pin(async move {
            match self.pipeline.layers.get(self.index) {
                Some(layer) => {
                    let next = Next { pipeline: Arc::clone(&self.pipeline), index: self.index + 1 };
                    layer.call(req, next).await
                }
                None => self.pipeline.route(req).await,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use http::Method;

    use super::*;

    async fn hello(_req: Request) -> Response {
        Response::text("hello")
    }

    fn tag(label: &'static str) -> impl Middleware {
        move |req: Request, next: Next| async move {
            let mut res = next.run(req).await;
            res.insert_header("x-layer", label);
            res
        }
    }

    #[tokio::test]
    async fn layers_wrap_in_order_and_route_last() {
        let router = Router::new().on(Method::GET, "/", hello);
        let layers: Vec<BoxedMiddleware> = vec![Arc::new(tag("outer")), Arc::new(tag("inner"))];
        let pipeline = Arc::new(Pipeline::new(layers, router));

        let res = pipeline.handle(Request::test(Method::GET, "/")).await;

        assert_eq!(res.body(), b"hello");
        let order: Vec<_> = res.headers.iter()
            .filter(|(k, _)| k == "x-layer")
            .map(|(_, v)| v.as_str())
            .collect();
        assert_eq!(order, ["inner", "outer"]);
    }

    #[tokio::test]
    async fn middleware_can_short_circuit() {
        let router = Router::new().on(Method::GET, "/", hello);
        let deny = |_req: Request, _next: Next| async { StatusCode::FORBIDDEN };
        let layers: Vec<BoxedMiddleware> = vec![Arc::new(deny)];
        let pipeline = Arc::new(Pipeline::new(layers, router));

        let res = pipeline.handle(Request::test(Method::GET, "/")).await;
        assert_eq!(res.status_code(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn unmatched_route_is_not_found() {
        let pipeline = Arc::new(Pipeline::new(Vec::new(), Router::new()));
        let res = pipeline.handle(Request::test(Method::GET, "/missing")).await;
        assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
    }
}
