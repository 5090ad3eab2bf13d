//! Build phase: everything that happens before the app exists.

use std::fmt;

use http::Method;
use tracing::debug;

use crate::app::App;
use crate::config::{ENV_PREFIX, Settings};
use crate::error::Error;
use crate::handler::Handler;
use crate::registration::{Assembly, Catalog, RegistrationState};
use crate::router::Router;
use crate::services::Services;

/// Accumulates settings, services, routes and declared middleware before the
/// app is built.
///
/// ```rust
/// use enlist::{AppBuilder, Method, Request, Response};
///
/// async fn hello(_req: Request) -> Response { Response::text("hello") }
///
/// let mut builder = AppBuilder::new();
/// builder.route(Method::GET, "/", hello).service(42_u32);
/// let app = builder.build();
/// assert_eq!(app.services().get::<u32>().as_deref(), Some(&42));
/// ```
#[derive(Default)]
pub struct AppBuilder {
    settings: Settings,
    services: Services,
    router: Router,
    registrations: RegistrationState,
}

impl AppBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with settings read from `ENLIST_*` environment variables.
    pub fn from_env() -> Self {
        Self { settings: Settings::from_env(ENV_PREFIX), ..Self::default() }
    }

    pub fn settings(&self) -> &Settings { &self.settings }
    pub fn settings_mut(&mut self) -> &mut Settings { &mut self.settings }
    pub fn services(&self) -> &Services { &self.services }
    pub fn registrations(&self) -> &RegistrationState { &self.registrations }

    /// Stores a shared service, replacing any previous value of the same type.
    pub fn service<T: Send + Sync + 'static>(&mut self, value: T) -> &mut Self {
        self.services.insert(value);
        self
    }

    /// Maps a route. Panics on an invalid or conflicting pattern, see [`Router::on`].
    pub fn route(&mut self, method: Method, path: &str, handler: impl Handler) -> &mut Self {
        self.router.add(method, path, handler);
        self
    }

    /// Discovers the registrations declared by assembly `A`.
    ///
    /// Every service registration is constructed and configured against this
    /// builder, once, in declaration order. Every middleware registration is
    /// added to the declared set and waits for an explicit
    /// [`App::use_registration`]. The first configure error aborts with
    /// [`Error::Configure`].
    ///
    /// Calling this again, for the same or another assembly, adds to the
    /// declared set; nothing already declared or used is cleared.
    pub fn add_registrations<A: Assembly>(mut self) -> Result<Self, Error> {
        let catalog = Catalog::scan::<A>();
        debug!(
            assembly = std::any::type_name::<A>(),
            declared = catalog.len(),
            "scanned registrations"
        );

        for declaration in catalog.services() {
            let Some(configure) = declaration.configurator() else {
                continue;
            };
            let key = declaration.key();
            configure(&mut self).map_err(|source| Error::Configure {
                registration: key.name(),
                source,
            })?;
            debug!(registration = key.name(), "configured service");
        }

        for declaration in catalog.middlewares() {
            if self.registrations.declare(declaration.key()) {
                debug!(registration = declaration.key().name(), "declared middleware");
            }
        }

        Ok(self)
    }

    pub fn build(self) -> App {
        App::new(self.settings, self.services, self.router, self.registrations)
    }
}

impl fmt::Debug for AppBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppBuilder")
            .field("settings", &self.settings.len())
            .field("services", &self.services.len())
            .field("routes", &self.router.len())
            .field("registrations", &self.registrations)
            .finish()
    }
}
