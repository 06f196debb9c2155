//! Configuration loader and schema types.
//!
//! Settings come from struct defaults, an optional TOML file and
//! `PODPLAY__`-prefixed environment variables, in increasing precedence.

mod load;
mod schema;

pub use load::{default_config_path, default_log_path};
pub use schema::*;

#[cfg(test)]
mod tests;
