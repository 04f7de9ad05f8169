//! Configuration types and loading
//!
//! The board ships with an embedded `kitchen.toml`. A copy written to
//! storage by the BSP takes precedence when present.

pub mod loader;
pub mod types;

pub use loader::{ConfigError, EMBEDDED_CONFIG};
pub use types::*;
