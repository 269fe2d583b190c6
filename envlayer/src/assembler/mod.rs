//! Environment-gated accumulation of configuration layers.
//!
//! An [`Assembler`] resolves its environment name once, at construction.
//! Every layer is declared with the environment it belongs to and only the
//! layers for the resolved environment are merged, so a single program can
//! describe all of its profiles and still apply exactly one.
//!
//! ```rust
//! use envlayer::{Assembler, ConfigValue};
//! use serde_json::json;
//!
//! let mut assembler = Assembler::for_environment("development");
//! assembler
//!     .set("development", [ConfigValue::from(json!({"x": 1, "y": 1}))])?
//!     .set("staging", [ConfigValue::from(json!({"x": 2}))])?
//!     .merge([ConfigValue::from(json!({"y": 2}))])?;
//! assert_eq!(assembler.config().to_json(), json!({"x": 1, "y": 2}));
//! # Ok::<_, std::sync::Arc<envlayer::EnvLayerError>>(())
//! ```

use std::borrow::Borrow;

use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::merge::deep_merge;
use crate::sources::{EnvSource, ProcessEnv};
use crate::value::ConfigValue;
use crate::{EnvLayerError, EnvLayerResult};

/// Environment used when neither a lookup nor a default supplies one.
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Variable consulted when the caller names neither a selector nor a default.
pub const DEFAULT_SELECTOR: &str = "APP_ENV";

/// Accumulates configuration layers for one resolved environment.
#[derive(Clone, Debug)]
pub struct Assembler {
    environment: String,
    config: ConfigValue,
}

impl Assembler {
    /// Resolve the environment from the process environment.
    ///
    /// See [`Assembler::with_source`] for the resolution rules.
    #[must_use]
    pub fn new(selector: Option<&str>, default: Option<&str>) -> Self {
        Self::with_source(selector, default, &ProcessEnv)
    }

    /// Resolve the environment by reading `selector` from `source`.
    ///
    /// Empty arguments count as missing. Without a default, the default
    /// becomes [`DEFAULT_ENVIRONMENT`] and a missing selector becomes
    /// [`DEFAULT_SELECTOR`]. With a default but no selector, nothing is looked
    /// up and the default is used. An empty variable value counts as unset.
    #[must_use]
    pub fn with_source(
        selector: Option<&str>,
        default: Option<&str>,
        source: &dyn EnvSource,
    ) -> Self {
        let environment = resolve_environment(selector, default, source);
        debug!(environment = %environment, "resolved configuration environment");
        Self::for_environment(environment)
    }

    /// Create an assembler pinned to `environment`.
    #[must_use]
    pub fn for_environment(environment: impl Into<String>) -> Self {
        Self {
            environment: environment.into(),
            config: ConfigValue::mapping(),
        }
    }

    /// The resolved environment name.
    #[must_use]
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// The accumulated configuration mapping.
    #[must_use]
    pub const fn config(&self) -> &ConfigValue {
        &self.config
    }

    /// Consume the assembler, returning the accumulated mapping.
    #[must_use]
    pub fn into_config(self) -> ConfigValue {
        self.config
    }

    /// Deep-merge `sources`, in order, when `environment` is the resolved
    /// environment. Any other environment leaves the assembler untouched.
    ///
    /// # Errors
    ///
    /// Returns [`EnvLayerError::Argument`] when `environment` is empty or
    /// `sources` yields nothing. The arguments are checked before the
    /// environment gate, so the error is raised for every environment.
    pub fn set<I, S>(&mut self, environment: &str, sources: I) -> EnvLayerResult<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Borrow<ConfigValue>,
    {
        if environment.is_empty() {
            return Err(EnvLayerError::argument("environment name").into());
        }
        let mut layers = sources.into_iter().peekable();
        if layers.peek().is_none() {
            return Err(EnvLayerError::argument("one or more source objects").into());
        }
        if environment != self.environment {
            trace!(
                requested = environment,
                active = %self.environment,
                "skipping layers for inactive environment"
            );
            return Ok(self);
        }
        for layer in layers {
            deep_merge(&mut self.config, layer.borrow());
        }
        Ok(self)
    }

    /// Deep-merge `sources` into the resolved environment unconditionally.
    ///
    /// # Errors
    ///
    /// Returns [`EnvLayerError::Argument`] when `sources` yields nothing.
    pub fn merge<I, S>(&mut self, sources: I) -> EnvLayerResult<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Borrow<ConfigValue>,
    {
        let environment = self.environment.clone();
        self.set(&environment, sources)
    }

    /// Deserialise the accumulated configuration into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`EnvLayerError::Extract`] when the configuration does not
    /// match `T`.
    pub fn extract<T: DeserializeOwned>(&self) -> EnvLayerResult<T> {
        serde_json::from_value(self.config.to_json())
            .map_err(|err| EnvLayerError::Extract(err).into())
    }
}

fn resolve_environment(
    selector: Option<&str>,
    default: Option<&str>,
    source: &dyn EnvSource,
) -> String {
    let named_selector = selector.filter(|name| !name.is_empty());
    let (lookup, fallback) = match default.filter(|name| !name.is_empty()) {
        Some(fallback) => (named_selector, fallback),
        None => (
            named_selector.or(Some(DEFAULT_SELECTOR)),
            DEFAULT_ENVIRONMENT,
        ),
    };
    lookup
        .and_then(|name| source.var(name))
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| fallback.to_owned())
}

#[cfg(test)]
mod tests;
