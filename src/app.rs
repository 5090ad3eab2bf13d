//! The running-application handle.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use http::Method;
use tracing::{debug, info};

use crate::config::Settings;
use crate::error::Error;
use crate::handler::Handler;
use crate::middleware::{BoxedMiddleware, Middleware, Pipeline};
use crate::registration::{MiddlewareRegistration, RegistrationState, TypeKey};
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;
use crate::services::Services;

/// A built application: routes, services and the middleware pipeline.
///
/// Produced by [`AppBuilder::build`](crate::AppBuilder::build). Declared
/// middleware registrations are activated here, in the order they should run,
/// and then checked with [`validate_registration`](App::validate_registration)
/// before the app is handed to [`Server::serve`](crate::Server::serve).
pub struct App {
    settings: Settings,
    services: Arc<Services>,
    router: Router,
    layers: Vec<BoxedMiddleware>,
    registrations: RegistrationState,
}

impl App {
    pub(crate) fn new(
        settings: Settings,
        services: Services,
        router: Router,
        registrations: RegistrationState,
    ) -> Self {
        Self {
            settings,
            services: Arc::new(services),
            router,
            layers: Vec::new(),
            registrations,
        }
    }

    pub fn settings(&self) -> &Settings { &self.settings }
    pub fn services(&self) -> &Services { &self.services }
    pub fn registrations(&self) -> &RegistrationState { &self.registrations }
    pub fn middleware_count(&self) -> usize { self.layers.len() }

    /// Appends a pipeline step. Layers run in the order they were added.
    pub fn layer(&mut self, middleware: impl Middleware) -> &mut Self {
        self.layers.push(Arc::new(middleware));
        self
    }

    /// Maps a route. Panics on an invalid or conflicting pattern, see
    /// [`Router::on`](crate::Router::on).
    pub fn route(&mut self, method: Method, path: &str, handler: impl Handler) -> &mut Self {
        self.router.add(method, path, handler);
        self
    }

    /// Activates middleware registration `M`: constructs it and calls its
    /// `install` on this app.
    ///
    /// Fails with [`Error::DuplicateActivation`] if `M` was already activated,
    /// before anything is constructed or installed. Activating a type no
    /// assembly declared is allowed.
    pub fn use_registration<M>(&mut self) -> Result<&mut Self, Error>
    where
        M: MiddlewareRegistration + Default,
    {
        let key = TypeKey::of::<M>();
        self.registrations.ensure_unused(key)?;

        M::default().install(self);
        self.registrations.mark_used(key);

        debug!(
            registration = key.name(),
            declared = self.registrations.is_declared(key),
            "activated middleware"
        );
        Ok(self)
    }

    /// Fails with [`Error::IncompleteRegistration`] if any declared middleware
    /// registration was never activated.
    pub fn validate_registration(&self) -> Result<&Self, Error> {
        self.registrations.validate()?;
        info!(
            middleware = self.registrations.used().len(),
            services = self.services.len(),
            "registrations validated"
        );
        Ok(self)
    }

    /// Freezes routes and middleware into the service the server runs.
    ///
    /// Validates first: an app with a declared but unactivated middleware
    /// never freezes and fails with [`Error::IncompleteRegistration`]. Useful
    /// on its own to drive requests through the full pipeline without a
    /// socket, e.g. in tests.
    pub fn into_service(self) -> Result<AppService, Error> {
        self.registrations.validate()?;
        Ok(AppService {
            pipeline: Arc::new(Pipeline::new(self.layers, self.router)),
            services: self.services,
        })
    }
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("routes", &self.router.len())
            .field("middleware", &self.layers.len())
            .field("services", &self.services.len())
            .field("registrations", &self.registrations)
            .finish()
    }
}

/// A frozen [`App`], cheap to clone and shared across connections.
#[derive(Clone)]
pub struct AppService {
    pipeline: Arc<Pipeline>,
    services: Arc<Services>,
}

impl AppService {
    /// Runs one request with a fully read body through every layer and the router.
    pub async fn call(&self, req: http::Request<Bytes>) -> Response {
        let (parts, body) = req.into_parts();
        let req = Request::new(
            parts.method,
            parts.uri.path().to_owned(),
            parts.headers,
            body,
            Arc::clone(&self.services),
        );
        self.pipeline.handle(req).await
    }
}
