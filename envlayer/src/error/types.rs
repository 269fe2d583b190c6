//! Primary error enum for assembly and loading flows.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur while assembling configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EnvLayerError {
    /// A required argument was missing or empty.
    #[error("Missing required argument: {message}")]
    Argument {
        /// Description of the missing argument.
        message: String,
    },

    /// A layer token named no known source.
    #[error(
        "Layer token '{token}' for environment '{environment}' is not ARGV, ENV, a configuration file or a top-level key"
    )]
    UnresolvedToken {
        /// Environment whose layer list contained the token.
        environment: String,
        /// The offending token.
        token: String,
    },

    /// An override file could not be read or parsed.
    #[error("Configuration file error in '{path}': {source}")]
    File {
        /// Path that triggered the failure.
        path: Utf8PathBuf,
        /// Underlying error reported by the file loader.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The embedded layer specification is missing or malformed.
    #[error("Invalid layer specification: {0}")]
    LayerSpec(#[source] serde_json::Error),

    /// The assembled configuration does not fit the requested type.
    #[error("Failed to extract configuration: {0}")]
    Extract(#[source] serde_json::Error),
}
