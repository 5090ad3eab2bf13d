//! Built-in Kubernetes health-check handlers.
//!
//! | Probe | Path | Question |
//! |---|---|---|
//! | **Liveness** | `/healthz` | Is the process alive? Failure → restart. |
//! | **Readiness** | `/readyz` | Can the pod serve traffic? Failure → pulled from load-balancer. |
//!
//! Declare [`HealthChecks`] in an assembly to map both:
//!
//! ```rust
//! use enlist::{Assembly, Catalog, health::HealthChecks};
//!
//! struct Api;
//! impl Assembly for Api {
//!     fn declare(catalog: &mut Catalog) {
//!         catalog.service::<HealthChecks>();
//!     }
//! }
//! ```
//!
//! To gate readiness on dependencies, map your own handler at `/readyz`
//! instead and leave `HealthChecks` out.

use http::Method;

use crate::builder::AppBuilder;
use crate::error::BoxError;
use crate::registration::{Registration, ServiceRegistration};
use crate::{Request, Response};

/// Liveness probe handler. Always `200 OK` with body `"ok"`.
pub async fn liveness(_req: Request) -> Response {
    Response::text("ok")
}

/// Readiness probe handler (default implementation). `200 OK` with body `"ready"`.
pub async fn readiness(_req: Request) -> Response {
    Response::text("ready")
}

/// Service registration mapping `GET /healthz` and `GET /readyz`.
#[derive(Debug, Default)]
pub struct HealthChecks;

impl Registration for HealthChecks {}

impl ServiceRegistration for HealthChecks {
    fn configure(&self, builder: &mut AppBuilder) -> Result<(), BoxError> {
        builder
            .route(Method::GET, "/healthz", liveness)
            .route(Method::GET, "/readyz", readiness);
        Ok(())
    }
}
