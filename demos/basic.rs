//! Minimal enlist example: registrations for a users API, health checks and
//! request tracing.
//!
//! Run with:
//!   RUST_LOG=debug ENLIST_ADDR=127.0.0.1:3000 cargo run --example basic
//!
//! Try:
//!   curl http://localhost:3000/users/42
//!   curl -X POST http://localhost:3000/users -d '{"name":"alice"}'
//!   curl -X DELETE http://localhost:3000/users/42
//!   curl http://localhost:3000/healthz
//!
//! Comment out the `use_registration::<RequestId>()` line to see startup
//! refuse a declared-but-unused middleware.

use enlist::health::HealthChecks;
use enlist::middleware::trace::TraceRegistration;
use enlist::{
    App, AppBuilder, Assembly, BoxError, Catalog, Method, MiddlewareRegistration, Next,
    Registration, Request, Response, Server, ServiceRegistration, StatusCode,
};

struct Api;

impl Assembly for Api {
    fn declare(catalog: &mut Catalog) {
        catalog
            .service::<Users>()
            .service::<HealthChecks>()
            .middleware::<TraceRegistration>()
            .middleware::<RequestId>();
    }
}

// ── Services ──────────────────────────────────────────────────────────────────

struct UserStore {
    default_name: String,
}

#[derive(Default)]
struct Users;

impl Registration for Users {}

impl ServiceRegistration for Users {
    fn configure(&self, builder: &mut AppBuilder) -> Result<(), BoxError> {
        let default_name = builder.settings().get_or("default_name", "alice").to_owned();
        builder
            .service(UserStore { default_name })
            .route(Method::GET, "/users/{id}", get_user)
            .route(Method::POST, "/users", create_user)
            .route(Method::DELETE, "/users/{id}", delete_user);
        Ok(())
    }
}

// GET /users/{id}
async fn get_user(req: Request) -> Response {
    let id = req.param("id").unwrap_or("unknown");
    let name = req.service::<UserStore>()
        .map(|store| store.default_name.clone())
        .unwrap_or_default();
    Response::json(format!(r#"{{"id":"{id}","name":"{name}"}}"#))
}

// POST /users
async fn create_user(req: Request) -> Response {
    if req.body().is_empty() {
        return Response::status(StatusCode::BAD_REQUEST);
    }
    Response::builder()
        .status(StatusCode::CREATED)
        .header("location", "/users/99")
        .json(r#"{"id":"99","name":"new_user"}"#)
}

// DELETE /users/{id} → 204 No Content
async fn delete_user(_req: Request) -> StatusCode {
    StatusCode::NO_CONTENT
}

// ── Middleware ────────────────────────────────────────────────────────────────

#[derive(Default)]
struct RequestId;

impl Registration for RequestId {}

impl MiddlewareRegistration for RequestId {
    fn install(&self, app: &mut App) {
        app.layer(|req: Request, next: Next| async move {
            let id = req.header("x-request-id").unwrap_or("none").to_owned();
            let mut res = next.run(req).await;
            res.insert_header("x-request-id", &id);
            res
        });
    }
}

#[tokio::main]
async fn main() -> Result<(), enlist::Error> {
    tracing_subscriber::fmt::init();

    let builder = AppBuilder::from_env().add_registrations::<Api>()?;
    let server = Server::from_settings(builder.settings())?;

    let mut app = builder.build();
    app.use_registration::<TraceRegistration>()?
        .use_registration::<RequestId>()?
        .validate_registration()?;

    server.serve(app).await
}
