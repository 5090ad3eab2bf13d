//! Declared registrations.
//!
//! A registration is a type that takes part in startup wiring. It carries one
//! of two capabilities:
//!
//! | Capability | Runs | Driven by |
//! |---|---|---|
//! | [`ServiceRegistration`] | once, against the [`AppBuilder`] | [`AppBuilder::add_registrations`] |
//! | [`MiddlewareRegistration`] | once, against the [`App`] | [`App::use_registration`] |
//!
//! Service registrations are configured as soon as they are discovered; their
//! relative order is not something to rely on. Middleware registrations are
//! only *declared* by discovery. Pipeline order matters, so the integrator
//! activates each one explicitly, and [`App::validate_registration`] refuses
//! to start an app that left a declared middleware out.
//!
//! Rust has no assembly scanning, so discovery is an explicit list: a type
//! implementing [`Assembly`] declares everything it contributes.
//!
//! ```rust
//! use enlist::{App, AppBuilder, Assembly, BoxError, Catalog};
//! use enlist::{MiddlewareRegistration, Registration, ServiceRegistration};
//!
//! #[derive(Default)]
//! struct Database;
//! impl Registration for Database {}
//! impl ServiceRegistration for Database {
//!     fn configure(&self, builder: &mut AppBuilder) -> Result<(), BoxError> {
//!         let url = builder.settings().get_or("database_url", "sqlite::memory:").to_owned();
//!         builder.service(url);
//!         Ok(())
//!     }
//! }
//!
//! #[derive(Default)]
//! struct Cors;
//! impl Registration for Cors {}
//! impl MiddlewareRegistration for Cors {
//!     fn install(&self, app: &mut App) {
//!         app.layer(|req: enlist::Request, next: enlist::Next| next.run(req));
//!     }
//! }
//!
//! struct Api;
//! impl Assembly for Api {
//!     fn declare(catalog: &mut Catalog) {
//!         catalog.service::<Database>().middleware::<Cors>();
//!     }
//! }
//!
//! # fn main() -> Result<(), enlist::Error> {
//! let mut app = AppBuilder::new().add_registrations::<Api>()?.build();
//! app.use_registration::<Cors>()?.validate_registration()?;
//! # Ok(())
//! # }
//! ```
//!
//! [`AppBuilder`]: crate::AppBuilder
//! [`AppBuilder::add_registrations`]: crate::AppBuilder::add_registrations
//! [`App`]: crate::App
//! [`App::use_registration`]: crate::App::use_registration
//! [`App::validate_registration`]: crate::App::validate_registration

mod catalog;
mod state;

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

pub use catalog::{Assembly, Capabilities, Catalog, Declaration};
pub use state::RegistrationState;

use crate::app::App;
use crate::builder::AppBuilder;
use crate::error::BoxError;

/// Base capability: the type takes part in startup wiring.
pub trait Registration: Any + Send + Sync {}

/// Configures the builder during the build phase.
pub trait ServiceRegistration: Registration {
    /// Called exactly once per discovery. An error aborts startup.
    fn configure(&self, builder: &mut AppBuilder) -> Result<(), BoxError>;
}

/// Installs a request-pipeline step into the running application.
pub trait MiddlewareRegistration: Registration {
    /// Called exactly once, by [`App::use_registration`](crate::App::use_registration).
    fn install(&self, app: &mut App);
}

/// Identity of a registration type.
///
/// Compares by [`TypeId`]; carries the type's path for messages.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    pub fn of<T: Any>() -> Self {
        Self { id: TypeId::of::<T>(), name: std::any::type_name::<T>() }
    }

    /// Fully-qualified type name, e.g. `my_app::middleware::Cors`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type name without its module path, e.g. `Cors`.
    ///
    /// Generic arguments are kept as written by the compiler.
    pub fn short_name(&self) -> &'static str {
        let base_end = self.name.find('<').unwrap_or(self.name.len());
        let start = self.name[..base_end].rfind("::").map_or(0, |i| i + 2);
        &self.name[start..]
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
