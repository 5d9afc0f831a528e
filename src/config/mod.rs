//! Configuration model for shpfiles.
//!
//! A [`Config`] tunes how a locator set opens and audits its components. It
//! is usually built with `Config::default()`; the CLI can also load one from
//! a YAML file (`--config`) or from the path in `SHPFILES_CONFIG`. Parsing is
//! forward compatible (unknown fields are ignored) and every value is
//! validated after loading.

mod model;
mod operations;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export public API
pub use model::Config;
pub use operations::CONFIG_ENV_VAR;
