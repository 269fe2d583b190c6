//! Conversions between `EnvLayerError` and external error types.

use super::EnvLayerError;

impl From<EnvLayerError> for figment::Error {
    /// Allow using `?` inside `figment::Jail` closures.
    fn from(e: EnvLayerError) -> Self {
        Self::from(e.to_string())
    }
}
