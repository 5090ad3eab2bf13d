//! # enlist
//!
//! A minimal HTTP host where startup wiring is declared, not implied.
//!
//! ## The contract
//!
//! Application code is split into *registrations*. An [`Assembly`] lists them.
//! At startup:
//!
//! 1. [`AppBuilder::add_registrations`] configures every service registration
//!    against the builder, and declares every middleware registration.
//! 2. [`App::use_registration`] activates one middleware registration, in the
//!    order you call it. Pipeline order is yours, never discovery's.
//!    Activating the same one twice is an error.
//! 3. [`App::validate_registration`] fails if a declared middleware was never
//!    activated. A forgotten pipeline step stops startup instead of silently
//!    shipping.
//!
//! Everything else is plumbing kept deliberately small: radix-tree routing
//! via [`matchit`], hyper for HTTP/1.1 and HTTP/2, graceful shutdown on
//! SIGTERM / Ctrl-C.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use enlist::{AppBuilder, Assembly, Catalog, Method, Request, Response, Server};
//! use enlist::{BoxError, Registration, ServiceRegistration};
//! use enlist::health::HealthChecks;
//! use enlist::middleware::trace::TraceRegistration;
//!
//! #[derive(Default)]
//! struct Users;
//! impl Registration for Users {}
//! impl ServiceRegistration for Users {
//!     fn configure(&self, builder: &mut AppBuilder) -> Result<(), BoxError> {
//!         builder.route(Method::GET, "/users/{id}", get_user);
//!         Ok(())
//!     }
//! }
//!
//! async fn get_user(req: Request) -> Response {
//!     let id = req.param("id").unwrap_or("unknown");
//!     Response::json(format!(r#"{{"id":"{id}"}}"#))
//! }
//!
//! struct Api;
//! impl Assembly for Api {
//!     fn declare(catalog: &mut Catalog) {
//!         catalog
//!             .service::<Users>()
//!             .service::<HealthChecks>()
//!             .middleware::<TraceRegistration>();
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), enlist::Error> {
//!     let builder = AppBuilder::from_env().add_registrations::<Api>()?;
//!     let server = Server::from_settings(builder.settings())?;
//!
//!     let mut app = builder.build();
//!     app.use_registration::<TraceRegistration>()?.validate_registration()?;
//!
//!     server.serve(app).await
//! }
//! ```

mod app;
mod builder;
mod error;
mod handler;
mod request;
mod response;
mod router;
mod server;
mod services;

pub mod config;
pub mod health;
pub mod middleware;
pub mod registration;

pub use app::{App, AppService};
pub use builder::AppBuilder;
pub use config::Settings;
pub use error::{BoxError, Error};
pub use handler::{BoxFuture, Handler};
pub use http::{Method, StatusCode};
pub use middleware::{Middleware, Next};
pub use registration::{
    Assembly, Catalog, MiddlewareRegistration, Registration, RegistrationState,
    ServiceRegistration, TypeKey,
};
pub use request::Request;
pub use response::{ContentType, IntoResponse, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
pub use services::Services;
