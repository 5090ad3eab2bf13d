//! Explicit discovery: the list of registrations an assembly declares.

use crate::builder::AppBuilder;
use crate::error::BoxError;

use super::{MiddlewareRegistration, Registration, ServiceRegistration, TypeKey};

/// A unit of code that contributes registrations.
///
/// The type itself is only a token; [`AppBuilder::add_registrations::<T>`]
/// uses it to find the declarations to scan.
///
/// [`AppBuilder::add_registrations::<T>`]: crate::AppBuilder::add_registrations
pub trait Assembly {
    fn declare(catalog: &mut Catalog);
}

/// Constructs a default instance and configures the builder with it.
pub(crate) type Configurator = fn(&mut AppBuilder) -> Result<(), BoxError>;

fn configure_default<S: ServiceRegistration + Default>(
    builder: &mut AppBuilder,
) -> Result<(), BoxError> {
    S::default().configure(builder)
}

/// Capabilities a declaration carries beyond the base registration marker.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Capabilities {
    service: bool,
    middleware: bool,
}

impl Capabilities {
    pub fn is_service(&self) -> bool { self.service }
    pub fn is_middleware(&self) -> bool { self.middleware }
}

/// One discovered registration type.
#[derive(Clone, Debug)]
pub struct Declaration {
    key: TypeKey,
    capabilities: Capabilities,
    configurator: Option<Configurator>,
}

impl Declaration {
    pub fn key(&self) -> TypeKey { self.key }
    pub fn capabilities(&self) -> Capabilities { self.capabilities }

    pub(crate) fn configurator(&self) -> Option<Configurator> {
        self.configurator
    }
}

/// The declarations found in one scan.
///
/// Declaring a type again merges capabilities into its existing entry, so a
/// type that is both a service and a middleware registration appears once.
#[derive(Debug, Default)]
pub struct Catalog {
    declarations: Vec<Declaration>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the catalog for assembly `A`.
    pub fn scan<A: Assembly>() -> Self {
        let mut catalog = Self::new();
        A::declare(&mut catalog);
        catalog
    }

    /// Declares a registration with no further capability. It is discovered
    /// but neither configured nor expected in the pipeline.
    pub fn registration<R: Registration>(&mut self) -> &mut Self {
        self.entry(TypeKey::of::<R>());
        self
    }

    pub fn service<S: ServiceRegistration + Default>(&mut self) -> &mut Self {
        let entry = self.entry(TypeKey::of::<S>());
        entry.capabilities.service = true;
        entry.configurator = Some(configure_default::<S> as Configurator);
        self
    }

    pub fn middleware<M: MiddlewareRegistration + Default>(&mut self) -> &mut Self {
        self.entry(TypeKey::of::<M>()).capabilities.middleware = true;
        self
    }

    fn entry(&mut self, key: TypeKey) -> &mut Declaration {
        let index = match self.declarations.iter().position(|d| d.key == key) {
            Some(index) => index,
            None => {
                self.declarations.push(Declaration {
                    key,
                    capabilities: Capabilities::default(),
                    configurator: None,
                });
                self.declarations.len() - 1
            }
        };
        &mut self.declarations[index]
    }

    /// All declarations, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter()
    }

    pub fn services(&self) -> impl Iterator<Item = &Declaration> {
        self.iter().filter(|d| d.capabilities.service)
    }

    pub fn middlewares(&self) -> impl Iterator<Item = &Declaration> {
        self.iter().filter(|d| d.capabilities.middleware)
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::App;

    #[derive(Default)]
    struct Config;
    impl Registration for Config {}
    impl ServiceRegistration for Config {
        fn configure(&self, _: &mut AppBuilder) -> Result<(), BoxError> { Ok(()) }
    }

    #[derive(Default)]
    struct Cors;
    impl Registration for Cors {}
    impl MiddlewareRegistration for Cors {
        fn install(&self, _: &mut App) {}
    }

    #[derive(Default)]
    struct Both;
    impl Registration for Both {}
    impl ServiceRegistration for Both {
        fn configure(&self, _: &mut AppBuilder) -> Result<(), BoxError> { Ok(()) }
    }
    impl MiddlewareRegistration for Both {
        fn install(&self, _: &mut App) {}
    }

    struct Marker;
    impl Registration for Marker {}

    struct Mixed;
    impl Assembly for Mixed {
        fn declare(catalog: &mut Catalog) {
            catalog
                .service::<Config>()
                .middleware::<Cors>()
                .service::<Both>()
                .middleware::<Both>()
                .registration::<Marker>();
        }
    }

    struct Empty;
    impl Assembly for Empty {
        fn declare(_: &mut Catalog) {}
    }

    #[test]
    fn capability_subsets_are_within_all_declarations() {
        let catalog = Catalog::scan::<Mixed>();
        let all: Vec<_> = catalog.iter().map(Declaration::key).collect();

        for d in catalog.services().chain(catalog.middlewares()) {
            assert!(all.contains(&d.key()));
        }
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.services().count(), 2);
        assert_eq!(catalog.middlewares().count(), 2);
    }

    #[test]
    fn redeclaring_merges_capabilities() {
        let catalog = Catalog::scan::<Mixed>();
        let both = catalog.iter().find(|d| d.key() == TypeKey::of::<Both>()).unwrap();
        assert!(both.capabilities().is_service());
        assert!(both.capabilities().is_middleware());
        assert!(both.configurator().is_some());
    }

    #[test]
    fn marker_only_has_no_capabilities() {
        let catalog = Catalog::scan::<Mixed>();
        let marker = catalog.iter().find(|d| d.key() == TypeKey::of::<Marker>()).unwrap();
        assert_eq!(marker.capabilities(), Capabilities::default());
        assert!(marker.configurator().is_none());
    }

    #[test]
    fn empty_assembly_is_not_an_error() {
        assert!(Catalog::scan::<Empty>().is_empty());
    }
}
