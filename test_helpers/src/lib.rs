//! Test helpers shared across the workspace.
//!
//! - [`env`] serialises process environment mutation behind RAII guards;
//! - [`figment`] runs setup closures inside a `figment::Jail` sandbox.

pub mod env;
pub mod figment;
