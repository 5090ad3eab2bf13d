//! Integration tests for declared registrations: discovery, activation and
//! validation across the build and startup phases.

use std::sync::atomic::{AtomicUsize, Ordering};

use enlist::{
    App, AppBuilder, Assembly, BoxError, Catalog, Error, MiddlewareRegistration, Registration,
    ServiceRegistration, TypeKey,
};
use static_assertions::assert_impl_all;

#[test]
fn assert_types() {
    assert_impl_all!(App: Send);
    assert_impl_all!(AppBuilder: Send);
    assert_impl_all!(Error: Send, Sync, std::error::Error);
}

// ── ServiceX / MiddlewareY scenario ───────────────────────────────────────────

static SERVICE_X_CONFIGURED: AtomicUsize = AtomicUsize::new(0);

#[derive(Default)]
struct ServiceX;
impl Registration for ServiceX {}
impl ServiceRegistration for ServiceX {
    fn configure(&self, builder: &mut AppBuilder) -> Result<(), BoxError> {
        SERVICE_X_CONFIGURED.fetch_add(1, Ordering::Relaxed);
        builder.service("x");
        Ok(())
    }
}

#[derive(Default)]
struct MiddlewareY;
impl Registration for MiddlewareY {}
impl MiddlewareRegistration for MiddlewareY {
    fn install(&self, _app: &mut App) {}
}

struct Scenario;
impl Assembly for Scenario {
    fn declare(catalog: &mut Catalog) {
        catalog.service::<ServiceX>().middleware::<MiddlewareY>();
    }
}

#[test]
fn service_configured_once_middleware_declared_then_used() {
    let builder = AppBuilder::new().add_registrations::<Scenario>().unwrap();

    assert_eq!(SERVICE_X_CONFIGURED.load(Ordering::Relaxed), 1);
    assert!(builder.services().contains::<&'static str>());
    assert_eq!(builder.registrations().declared(), [TypeKey::of::<MiddlewareY>()]);
    assert!(builder.registrations().used().is_empty());

    let mut app = builder.build();
    app.use_registration::<MiddlewareY>().unwrap();
    assert_eq!(app.registrations().used(), [TypeKey::of::<MiddlewareY>()]);

    app.validate_registration().unwrap();
}

// ── Duplicate activation ──────────────────────────────────────────────────────

static COUNTED_CONSTRUCTED: AtomicUsize = AtomicUsize::new(0);
static COUNTED_INSTALLS: AtomicUsize = AtomicUsize::new(0);

struct Counted;
impl Default for Counted {
    fn default() -> Self {
        COUNTED_CONSTRUCTED.fetch_add(1, Ordering::Relaxed);
        Counted
    }
}
impl Registration for Counted {}
impl MiddlewareRegistration for Counted {
    fn install(&self, app: &mut App) {
        COUNTED_INSTALLS.fetch_add(1, Ordering::Relaxed);
        app.layer(|req: enlist::Request, next: enlist::Next| next.run(req));
    }
}

#[test]
fn second_activation_fails_without_constructing_or_installing() {
    let mut app = AppBuilder::new().build();
    app.use_registration::<Counted>().unwrap();
    assert_eq!(app.registrations().used().len(), 1);

    let err = app.use_registration::<Counted>().unwrap_err();

    assert!(matches!(err, Error::DuplicateActivation { name: "Counted" }));
    assert_eq!(err.to_string(), "middleware Counted is already used");
    assert_eq!(app.registrations().used().len(), 1);
    assert_eq!(app.middleware_count(), 1);
    assert_eq!(COUNTED_CONSTRUCTED.load(Ordering::Relaxed), 1);
    assert_eq!(COUNTED_INSTALLS.load(Ordering::Relaxed), 1);
}

// ── Validation ────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Alpha;
impl Registration for Alpha {}
impl MiddlewareRegistration for Alpha {
    fn install(&self, _app: &mut App) {}
}

#[derive(Default)]
struct Bravo;
impl Registration for Bravo {}
impl MiddlewareRegistration for Bravo {
    fn install(&self, _app: &mut App) {}
}

struct TwoMiddlewares;
impl Assembly for TwoMiddlewares {
    fn declare(catalog: &mut Catalog) {
        catalog.middleware::<Alpha>().middleware::<Bravo>();
    }
}

#[test]
fn validate_passes_when_every_declared_middleware_is_used() {
    let mut app = AppBuilder::new().add_registrations::<TwoMiddlewares>().unwrap().build();
    app.use_registration::<Bravo>()
        .and_then(App::use_registration::<Alpha>)
        .unwrap();

    app.validate_registration().unwrap();
    assert_eq!(app.registrations().used().len(), 2);
}

#[test]
fn validate_names_only_unused_middleware() {
    let mut app = AppBuilder::new().add_registrations::<TwoMiddlewares>().unwrap().build();
    app.use_registration::<Alpha>().unwrap();

    let err = app.validate_registration().unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("the following middlewares were registered but not used: "));
    assert!(message.contains(TypeKey::of::<Bravo>().name()));
    assert!(!message.contains(TypeKey::of::<Alpha>().name()));
}

#[test]
fn rescanning_unions_declared_and_keeps_used() {
    let builder = AppBuilder::new()
        .add_registrations::<TwoMiddlewares>()
        .and_then(AppBuilder::add_registrations::<TwoMiddlewares>)
        .unwrap();
    assert_eq!(builder.registrations().declared().len(), 2);

    let mut app = builder.build();
    app.use_registration::<Alpha>().unwrap();
    assert_eq!(app.registrations().used(), [TypeKey::of::<Alpha>()]);
    assert_eq!(app.registrations().unused().collect::<Vec<_>>(), [TypeKey::of::<Bravo>()]);
}

#[test]
fn no_registrations_validates_trivially() {
    struct Nothing;
    impl Assembly for Nothing {
        fn declare(_: &mut Catalog) {}
    }

    let app = AppBuilder::new().add_registrations::<Nothing>().unwrap().build();
    app.validate_registration().unwrap();
}

// ── Configure failures ────────────────────────────────────────────────────────

static AFTER_FAILURE_CONFIGURED: AtomicUsize = AtomicUsize::new(0);

#[derive(Default)]
struct NeedsPort;
impl Registration for NeedsPort {}
impl ServiceRegistration for NeedsPort {
    fn configure(&self, builder: &mut AppBuilder) -> Result<(), BoxError> {
        let port: u16 = builder.settings().parse("port")?.ok_or("port is not set")?;
        builder.service(port);
        Ok(())
    }
}

#[derive(Default)]
struct AfterFailure;
impl Registration for AfterFailure {}
impl ServiceRegistration for AfterFailure {
    fn configure(&self, _builder: &mut AppBuilder) -> Result<(), BoxError> {
        AFTER_FAILURE_CONFIGURED.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

struct Misconfigured;
impl Assembly for Misconfigured {
    fn declare(catalog: &mut Catalog) {
        catalog.service::<NeedsPort>().service::<AfterFailure>();
    }
}

#[test]
fn configure_error_aborts_discovery() {
    let Err(err) = AppBuilder::new().add_registrations::<Misconfigured>() else {
        panic!("configure must fail");
    };

    assert!(matches!(err, Error::Configure { registration, .. } if registration.ends_with("NeedsPort")));
    assert!(err.to_string().ends_with("port is not set"));
    assert_eq!(AFTER_FAILURE_CONFIGURED.load(Ordering::Relaxed), 0);
}

struct PortOnly;
impl Assembly for PortOnly {
    fn declare(catalog: &mut Catalog) {
        catalog.service::<NeedsPort>();
    }
}

#[test]
fn configure_binds_options_from_settings() {
    let mut builder = AppBuilder::new();
    builder.settings_mut().set("port", "8080");

    let builder = builder.add_registrations::<PortOnly>().unwrap();
    assert_eq!(builder.services().get::<u16>().as_deref(), Some(&8080));
}
