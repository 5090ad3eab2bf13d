//! Unified error type.

use std::fmt;
use std::net::AddrParseError;

/// Boxed error returned by fallible registration code.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error type returned by enlist's fallible operations.
///
/// Application-level errors (404, 422, etc.) are expressed as HTTP
/// [`Response`](crate::Response) values, not as `Error`s. This type surfaces
/// startup failures: a broken registration, a bad setting, or a socket that
/// cannot be bound. Every variant is fatal to startup.
#[derive(Debug)]
pub enum Error {
    /// Binding or accepting on the listening socket failed.
    Io(std::io::Error),
    /// The listen address is not a valid `host:port`.
    Addr(AddrParseError),
    /// A setting exists but cannot be parsed into the requested type.
    Setting { key: String, value: String },
    /// A service registration's `configure` failed.
    Configure {
        registration: &'static str,
        source: BoxError,
    },
    /// The same middleware registration was activated twice.
    DuplicateActivation { name: &'static str },
    /// Declared middleware registrations were never activated.
    IncompleteRegistration { names: Vec<&'static str> },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Addr(e) => write!(f, "invalid socket address: {e}"),
            Self::Setting { key, value } => {
                write!(f, "setting `{key}` has invalid value `{value}`")
            }
            Self::Configure { registration, source } => {
                write!(f, "service registration {registration} failed: {source}")
            }
            Self::DuplicateActivation { name } => {
                write!(f, "middleware {name} is already used")
            }
            Self::IncompleteRegistration { names } => write!(
                f,
                "the following middlewares were registered but not used: {}",
                names.join(", ")
            ),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Addr(e) => Some(e),
            Self::Configure { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<AddrParseError> for Error {
    fn from(e: AddrParseError) -> Self {
        Self::Addr(e)
    }
}
