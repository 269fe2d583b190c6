//! Convenience constructors for `EnvLayerError`.

use std::sync::Arc;

use camino::Utf8Path;

use super::EnvLayerError;

impl EnvLayerError {
    /// Construct an argument error.
    ///
    /// # Examples
    ///
    /// ```
    /// use envlayer::EnvLayerError;
    /// let err = EnvLayerError::argument("environment name");
    /// assert_eq!(err.to_string(), "Missing required argument: environment name");
    /// ```
    #[must_use]
    pub fn argument(message: impl Into<String>) -> Self {
        Self::Argument {
            message: message.into(),
        }
    }

    /// Construct an unresolved token error.
    #[must_use]
    pub fn unresolved_token(environment: impl Into<String>, token: impl Into<String>) -> Self {
        Self::UnresolvedToken {
            environment: environment.into(),
            token: token.into(),
        }
    }

    /// Construct a file error for `path` wrapped in an [`Arc`].
    ///
    /// File loaders return [`crate::EnvLayerResult`], so this saves call
    /// sites from wrapping the error themselves.
    #[must_use]
    pub fn file_arc(
        path: &Utf8Path,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Arc<Self> {
        Arc::new(Self::File {
            path: path.to_path_buf(),
            source: source.into(),
        })
    }

    /// Construct a layer specification error from a message.
    #[must_use]
    pub fn layer_spec(message: impl std::fmt::Display) -> Self {
        Self::LayerSpec(<serde_json::Error as serde::de::Error>::custom(message))
    }
}
