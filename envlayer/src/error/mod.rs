//! Error types produced while assembling configuration.

mod constructors;
mod conversions;
mod types;

pub use types::EnvLayerError;

#[cfg(test)]
mod tests;
