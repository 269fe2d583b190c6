//! Environment-selected, layered configuration assembly.
//!
//! `envlayer` merges partial configuration mappings into one result. Each
//! layer is declared for a named environment and only the layers of the
//! environment resolved at start-up are applied. Layers may come from the
//! caller, from command-line arguments, from environment variables, or from
//! override files on disk.
//!
//! Merging is deep and positional: mappings merge key by key, sequences merge
//! index by index, and later layers win.
//!
//! ```rust,no_run
//! use envlayer::ConfigValue;
//! use serde_json::json;
//!
//! let config = ConfigValue::from(json!({
//!     "_layers": {"envs": {
//!         "development": "common ARGV ENV",
//!         "production": "common production.toml ENV"
//!     }},
//!     "common": {"port": 8080}
//! }));
//! let assembler = envlayer::load(&config)?;
//! println!("{}", assembler.config().to_json());
//! # Ok::<_, std::sync::Arc<envlayer::EnvLayerError>>(())
//! ```

use std::sync::Arc;

mod assembler;
mod error;
pub mod layers;
pub mod merge;
mod result_ext;
pub mod sources;
mod value;

pub use assembler::{Assembler, DEFAULT_ENVIRONMENT, DEFAULT_SELECTOR};
pub use error::EnvLayerError;
pub use layers::{LayerSpec, LoadOptions, Loader};
pub use result_ext::{IntoFigmentError, ResultIntoFigment};
pub use value::{ConfigMap, ConfigValue, OpaqueHandle, OpaqueValue};

/// Result type used throughout the crate.
pub type EnvLayerResult<T> = Result<T, Arc<EnvLayerError>>;

/// Assemble `config` from its embedded layer specification using the process
/// environment, the process arguments and the filesystem.
///
/// # Errors
///
/// See [`Loader::load`].
pub fn load(config: &ConfigValue) -> EnvLayerResult<Assembler> {
    Loader::new().load(config, None)
}
