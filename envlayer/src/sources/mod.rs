//! Boundary collaborators that feed layers into the assembler.
//!
//! Each source sits behind a small interface so the loader can be exercised
//! without touching process state:
//!
//! - [`EnvSource`] reads variables, from the process ([`ProcessEnv`]) or from
//!   memory ([`MapEnv`]);
//! - [`Argv`] parses command-line arguments once and keeps the result;
//! - [`FileLoader`] turns an override file into a mapping ([`FsLoader`]).

mod argv;
mod env;
pub mod file;

use std::collections::BTreeMap;

pub use argv::Argv;
pub use env::env_snapshot;
pub use file::{FileLoader, FsLoader};

/// Read access to a set of environment variables.
pub trait EnvSource {
    /// Value of `name`, if set and valid UTF-8.
    fn var(&self, name: &str) -> Option<String>;

    /// Every variable with a UTF-8 name and value.
    fn vars(&self) -> Vec<(String, String)>;
}

impl<T: EnvSource + ?Sized> EnvSource for &T {
    fn var(&self, name: &str) -> Option<String> {
        (**self).var(name)
    }

    fn vars(&self) -> Vec<(String, String)> {
        (**self).vars()
    }
}

/// The environment of the running process.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn vars(&self) -> Vec<(String, String)> {
        std::env::vars_os()
            .filter_map(|(name, value)| Some((name.into_string().ok()?, value.into_string().ok()?)))
            .collect()
    }
}

/// An in-memory variable set.
///
/// ```rust
/// use envlayer::sources::{EnvSource, MapEnv};
///
/// let env = MapEnv::from_iter([("APP_ENV", "staging")]);
/// assert_eq!(env.var("APP_ENV").as_deref(), Some("staging"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MapEnv(BTreeMap<String, String>);

impl MapEnv {
    /// Create an empty variable set.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Set `name` to `value`, returning the updated set.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}

impl EnvSource for MapEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.0.get(name).cloned()
    }

    fn vars(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }
}
