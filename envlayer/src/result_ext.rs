//! Extensions for moving between `EnvLayerResult` and Figment's error type.
//!
//! Tests and integrations that run inside `figment::Jail` need closures that
//! return `figment::Result`. These helpers keep those call sites to a single
//! `?`.
//!
//! # Examples
//!
//! ```
//! use envlayer::{Assembler, ResultIntoFigment};
//!
//! figment::Jail::expect_with(|_jail| {
//!     let mut assembler = Assembler::for_environment("development");
//!     assembler.set("development", [envlayer::ConfigValue::mapping()]).to_figment()?;
//!     Ok(())
//! });
//! ```

use std::sync::Arc;

use crate::EnvLayerError;

/// Convert shared errors into `figment::Error`, preserving the message text.
pub trait IntoFigmentError {
    /// Convert into a `figment::Error`.
    fn into_figment(self) -> figment::Error;
}

impl IntoFigmentError for Arc<EnvLayerError> {
    fn into_figment(self) -> figment::Error {
        figment::Error::from(self.to_string())
    }
}

/// Extension to convert `Result<T, Arc<EnvLayerError>>` into
/// `Result<T, figment::Error>`.
pub trait ResultIntoFigment<T> {
    /// Map the error into a `figment::Error` using [`IntoFigmentError`].
    ///
    /// # Errors
    ///
    /// Returns a `figment::Error` containing the original message.
    fn to_figment(self) -> Result<T, figment::Error>;
}

impl<T> ResultIntoFigment<T> for Result<T, Arc<EnvLayerError>> {
    fn to_figment(self) -> Result<T, figment::Error> {
        self.map_err(IntoFigmentError::into_figment)
    }
}
