//! Declarative layering of configuration sources.
//!
//! A configuration mapping may embed its own assembly instructions under the
//! reserved [`RESERVED_KEY`]:
//!
//! ```json
//! {
//!   "_layers": {
//!     "options": { "envSelector": "APP_ENV", "defaultEnv": "development" },
//!     "envs": {
//!       "development": "common ARGV ENV",
//!       "test": "common test site.toml ARGV ENV"
//!     }
//!   },
//!   "common": { "name": "foo" },
//!   "test": { "name": "bar" }
//! }
//! ```
//!
//! Each environment lists whitespace-separated [`SourceToken`]s. The
//! [`Loader`] merges the tokens of the resolved environment in order, so
//! later tokens win.

mod loader;
mod token;

use std::collections::BTreeMap;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use crate::value::ConfigValue;
use crate::{EnvLayerError, EnvLayerResult};

pub use loader::Loader;
pub use token::{SITE_CONFIG_PLACEHOLDER, SourceToken, split_site_config, tokenize};

/// Top-level key holding the embedded [`LayerSpec`].
pub const RESERVED_KEY: &str = "_layers";

/// How the assembler is built and which tokens feed each environment.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerSpec {
    /// Assembler construction options.
    pub options: LoadOptions,
    /// Environment name to its whitespace-separated source tokens.
    pub envs: BTreeMap<String, String>,
}

/// Options controlling environment resolution and file lookup.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoadOptions {
    /// Variable naming the active environment.
    pub env_selector: Option<String>,
    /// Environment used when the selector is unset.
    pub default_env: Option<String>,
    /// Directory that relative file tokens resolve against.
    pub wd: Option<Utf8PathBuf>,
    /// Files substituted for the `SITE_CONFIG` placeholder, separated by
    /// whitespace or commas.
    pub site_config: Option<String>,
}

impl LayerSpec {
    /// Create an empty specification.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the specification embedded under [`RESERVED_KEY`] in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`EnvLayerError::LayerSpec`] when the key is missing or its
    /// value does not describe a specification.
    ///
    /// ```rust
    /// use envlayer::ConfigValue;
    /// use envlayer::layers::LayerSpec;
    /// use serde_json::json;
    ///
    /// let config = ConfigValue::from(json!({
    ///     "_layers": {"options": {"defaultEnv": "dev"}, "envs": {"dev": "common"}},
    ///     "common": {"port": 8080}
    /// }));
    /// let spec = LayerSpec::from_config(&config)?;
    /// assert_eq!(spec.options.default_env.as_deref(), Some("dev"));
    /// assert_eq!(spec.envs["dev"], "common");
    /// # Ok::<_, std::sync::Arc<envlayer::EnvLayerError>>(())
    /// ```
    pub fn from_config(config: &ConfigValue) -> EnvLayerResult<Self> {
        let embedded = config
            .get(RESERVED_KEY)
            .filter(|value| !value.is_absent())
            .ok_or_else(|| EnvLayerError::layer_spec(format!("missing `{RESERVED_KEY}` key")))?;
        serde_json::from_value(embedded.to_json())
            .map_err(|err| EnvLayerError::LayerSpec(err).into())
    }

    /// Replace the options, returning the updated specification.
    #[must_use]
    pub fn with_options(mut self, options: LoadOptions) -> Self {
        self.options = options;
        self
    }

    /// Declare the tokens for `environment`, returning the updated
    /// specification.
    #[must_use]
    pub fn with_env(mut self, environment: impl Into<String>, tokens: impl Into<String>) -> Self {
        self.envs.insert(environment.into(), tokens.into());
        self
    }
}

impl LoadOptions {
    /// Set the selector variable.
    #[must_use]
    pub fn with_env_selector(mut self, selector: impl Into<String>) -> Self {
        self.env_selector = Some(selector.into());
        self
    }

    /// Set the default environment.
    #[must_use]
    pub fn with_default_env(mut self, environment: impl Into<String>) -> Self {
        self.default_env = Some(environment.into());
        self
    }

    /// Set the working directory for file tokens.
    #[must_use]
    pub fn with_wd(mut self, wd: impl Into<Utf8PathBuf>) -> Self {
        self.wd = Some(wd.into());
        self
    }

    /// Set the site config file list.
    #[must_use]
    pub fn with_site_config(mut self, files: impl Into<String>) -> Self {
        self.site_config = Some(files.into());
        self
    }
}
