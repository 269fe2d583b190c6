//! Applying a [`LayerSpec`] to an [`Assembler`].

use std::borrow::Cow;

use camino::Utf8Path;
use tracing::{debug, trace};

use super::token::{SITE_CONFIG_PLACEHOLDER, SourceToken, split_site_config, tokenize};
use super::{LayerSpec, LoadOptions};
use crate::assembler::Assembler;
use crate::sources::{Argv, EnvSource, FileLoader, FsLoader, ProcessEnv, env_snapshot};
use crate::value::ConfigValue;
use crate::{EnvLayerError, EnvLayerResult};

/// Command-line option naming the site config file list.
const SITE_CONFIG_ARG: &str = "site-config";

/// Resolves layer tokens against its sources and merges them.
///
/// The default loader reads the process environment, the process arguments
/// and the filesystem. Tests swap any of them out:
///
/// ```rust
/// use envlayer::ConfigValue;
/// use envlayer::layers::Loader;
/// use envlayer::sources::{Argv, MapEnv};
/// use serde_json::json;
///
/// let config = ConfigValue::from(json!({
///     "_layers": {"envs": {
///         "development": "common ARGV ENV",
///         "test": "common test ARGV ENV"
///     }},
///     "common": {"name": "foo", "port": 80},
///     "test": {"name": "bar"}
/// }));
/// let loader = Loader::new()
///     .with_env(MapEnv::from_iter([("APP_ENV", "test")]))
///     .with_argv(Argv::from_args(["--port", "8080"]));
/// let assembler = loader.load(&config, None)?;
/// assert_eq!(assembler.environment(), "test");
/// assert_eq!(assembler.config()["name"].as_str(), Some("bar"));
/// assert_eq!(assembler.config()["port"].as_str(), Some("8080"));
/// # Ok::<_, std::sync::Arc<envlayer::EnvLayerError>>(())
/// ```
#[derive(Clone, Debug)]
pub struct Loader<E = ProcessEnv, F = FsLoader> {
    env: E,
    files: F,
    argv: Argv,
}

impl Loader {
    /// Create a loader over the running process and the filesystem.
    #[must_use]
    pub fn new() -> Self {
        Self {
            env: ProcessEnv,
            files: FsLoader,
            argv: Argv::from_process(),
        }
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: EnvSource, F: FileLoader> Loader<E, F> {
    /// Replace the variable source.
    #[must_use]
    pub fn with_env<E2: EnvSource>(self, env: E2) -> Loader<E2, F> {
        Loader {
            env,
            files: self.files,
            argv: self.argv,
        }
    }

    /// Replace the file loader.
    #[must_use]
    pub fn with_files<F2: FileLoader>(self, files: F2) -> Loader<E, F2> {
        Loader {
            env: self.env,
            files,
            argv: self.argv,
        }
    }

    /// Replace the command-line arguments.
    #[must_use]
    pub fn with_argv(mut self, argv: Argv) -> Self {
        self.argv = argv;
        self
    }

    /// The command-line arguments used for `ARGV` tokens.
    #[must_use]
    pub const fn argv(&self) -> &Argv {
        &self.argv
    }

    /// The variable source used for `ENV` tokens and environment selection.
    #[must_use]
    pub const fn env(&self) -> &E {
        &self.env
    }

    /// The loader used for file tokens.
    #[must_use]
    pub const fn files(&self) -> &F {
        &self.files
    }

    /// Build an assembler using the selector and default from `options`.
    #[must_use]
    pub fn assembler(&self, options: &LoadOptions) -> Assembler {
        Assembler::with_source(
            options.env_selector.as_deref(),
            options.default_env.as_deref(),
            &self.env,
        )
    }

    /// Files substituted for the `SITE_CONFIG` placeholder.
    ///
    /// The first non-empty list wins: the `siteConfig` option, the
    /// `--site-config` argument, then the `SITE_CONFIG` variable. A repeated
    /// `--site-config` contributes every occurrence in order.
    #[must_use]
    pub fn site_config(&self, options: &LoadOptions) -> Vec<String> {
        let from_argv = || match self.argv.parsed().get(SITE_CONFIG_ARG)? {
            ConfigValue::String(list) => Some(list.clone()),
            ConfigValue::Sequence(items) => Some(
                items
                    .iter()
                    .filter_map(ConfigValue::as_str)
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            _ => None,
        };
        options
            .site_config
            .clone()
            .filter(|list| !list.trim().is_empty())
            .or_else(from_argv)
            .filter(|list| !list.trim().is_empty())
            .or_else(|| self.env.var(SITE_CONFIG_PLACEHOLDER))
            .map(|list| split_site_config(&list))
            .unwrap_or_default()
    }

    /// Assemble `config` according to `spec`, or to the specification
    /// embedded in `config` when `spec` is `None`.
    ///
    /// Tokens of every environment are checked, so an unknown name fails the
    /// load whichever environment is active. Sources are read only for the
    /// active environment and nothing is merged until all of them resolved.
    ///
    /// # Errors
    ///
    /// Returns [`EnvLayerError::LayerSpec`] when no specification is given or
    /// embedded, [`EnvLayerError::Argument`] for an empty environment name,
    /// [`EnvLayerError::UnresolvedToken`] for a name missing from `config`,
    /// and [`EnvLayerError::File`] when an override file fails to load.
    pub fn load(
        &self,
        config: &ConfigValue,
        spec: Option<&LayerSpec>,
    ) -> EnvLayerResult<Assembler> {
        let embedded;
        let layer_spec = match spec {
            Some(explicit) => explicit,
            None => {
                embedded = LayerSpec::from_config(config)?;
                &embedded
            }
        };
        let options = &layer_spec.options;

        let mut assembler = self.assembler(options);
        let site_config = self.site_config(options);
        let wd = options.wd.as_deref().unwrap_or_else(|| Utf8Path::new("."));

        let mut layers = Vec::new();
        for (environment, words) in &layer_spec.envs {
            if environment.is_empty() {
                return Err(EnvLayerError::argument("environment name").into());
            }
            let tokens = tokenize(words, &site_config);
            check_names(config, environment, &tokens)?;
            if environment != assembler.environment() {
                trace!(environment = %environment, "skipping tokens for inactive environment");
                continue;
            }
            for token in tokens {
                let layer = self.resolve(config, wd, &token)?;
                layers.push((token, layer));
            }
        }

        let environment = assembler.environment().to_owned();
        for (token, layer) in &layers {
            assembler.set(&environment, [&**layer])?;
            debug!(environment = %environment, token = %token, "applied configuration layer");
        }
        Ok(assembler)
    }

    fn resolve<'a>(
        &'a self,
        config: &'a ConfigValue,
        wd: &Utf8Path,
        token: &SourceToken,
    ) -> EnvLayerResult<Cow<'a, ConfigValue>> {
        Ok(match token {
            SourceToken::Argv => Cow::Borrowed(self.argv.parsed()),
            SourceToken::Env => Cow::Owned(env_snapshot(&self.env)),
            SourceToken::File(path) => Cow::Owned(self.files.load(&wd.join(path))?),
            SourceToken::Named(name) => Cow::Borrowed(&config[name.as_str()]),
        })
    }
}

/// Fail on the first named token that `config` does not define.
fn check_names(
    config: &ConfigValue,
    environment: &str,
    tokens: &[SourceToken],
) -> EnvLayerResult<()> {
    let missing = tokens.iter().find_map(|token| match token {
        SourceToken::Named(name) if config[name.as_str()].is_absent() => Some(name),
        _ => None,
    });
    match missing {
        Some(name) => Err(EnvLayerError::unresolved_token(environment, name.as_str()).into()),
        None => Ok(()),
    }
}
