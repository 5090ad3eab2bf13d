//! Per-request tracing.
//!
//! Opens an `info` span per request with the method and path, and emits one
//! event when the response is ready with its status and latency:
//!
//! ```text
//! INFO request{method=GET path=/users/42}: enlist::middleware::trace: finished status=200 latency_us=84
//! ```

use std::time::Instant;

use tracing::{Instrument, info, info_span};

use crate::app::App;
use crate::handler::BoxFuture;
use crate::registration::{MiddlewareRegistration, Registration};
use crate::request::Request;

use super::{Middleware, Next};

/// The tracing middleware.
#[derive(Clone, Copy, Debug, Default)]
pub struct Trace;

impl Middleware for Trace {
    fn call(&self, req: Request, next: Next) -> BoxFuture {
        let span = info_span!("request", method = %req.method(), path = req.path());
        Box::pin(
            async move {
                let started = Instant::now();
                let res = next.run(req).await;
                info!(
                    status = res.status_code().as_u16(),
                    latency_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX),
                    "finished"
                );
                res
            }
            .instrument(span),
        )
    }
}

/// Registration that installs [`Trace`]. Declare it early and activate it
/// first so the span covers every other layer.
#[derive(Debug, Default)]
pub struct TraceRegistration;

impl Registration for TraceRegistration {}

impl MiddlewareRegistration for TraceRegistration {
    fn install(&self, app: &mut App) {
        app.layer(Trace);
    }
}
