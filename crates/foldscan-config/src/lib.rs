//! Configuration for foldscan.
//!
//! TOML files with `${ENV_VAR}` substitution, plus the built-in selector
//! lists and shipping keyword defaults. Selector lists are configuration
//! data, not logic: the detectors in `foldscan-core` take whatever lists
//! they are handed.

mod defaults;
mod error;
mod loader;
mod schema;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{BrowserConfig, Config, ScanConfig, SelectorConfig, ServerConfig};
