//! Build-phase settings.
//!
//! A flat string map. Service registrations read it in `configure` to bind
//! their options; the server reads `addr` from it. Values normally come from
//! the environment:
//!
//! ```text
//! ENLIST_ADDR=0.0.0.0:8080        → settings.get("addr")
//! ENLIST_DATABASE_URL=postgres:// → settings.get("database_url")
//! ```

use std::collections::HashMap;
use std::str::FromStr;

use crate::error::Error;

/// Prefix used by [`Settings::from_env`] when called through
/// [`AppBuilder::from_env`](crate::AppBuilder::from_env).
pub const ENV_PREFIX: &str = "ENLIST_";

/// String key/value settings.
#[derive(Clone, Debug, Default)]
pub struct Settings {
    values: HashMap<String, String>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects every environment variable starting with `prefix`.
    ///
    /// The prefix is stripped and the rest lower-cased, so `ENLIST_ADDR`
    /// becomes `addr`. Variables whose name or value is not valid unicode are
    /// skipped.
    pub fn from_env(prefix: &str) -> Self {
        Self::from_pairs(prefix, std::env::vars_os().filter_map(|(k, v)| {
            Some((k.into_string().ok()?, v.into_string().ok()?))
        }))
    }

    fn from_pairs(prefix: &str, pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let values = pairs
            .into_iter()
            .filter_map(|(key, value)| {
                let key = key.strip_prefix(prefix)?;
                (!key.is_empty()).then(|| (key.to_ascii_lowercase(), value))
            })
            .collect();
        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Sets `key`, returning the previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.values.insert(key.into(), value.into())
    }

    /// Parses `key` into `T`. A missing key is `Ok(None)`; a present but
    /// unparsable one is [`Error::Setting`].
    pub fn parse<T: FromStr>(&self, key: &str) -> Result<Option<T>, Error> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        value.parse().map(Some).map_err(|_| Error::Setting {
            key: key.to_owned(),
            value: value.to_owned(),
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
