//! Harness configuration subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize, semantic checks)
//!     → HarnessConfig (validated, immutable)
//!     → read by supervisor, fetch client, comparators
//! ```
//!
//! # Design Decisions
//! - Every field has a default matching the reference grading setup, so
//!   running with no config file at all is the common case
//! - Config is immutable once loaded; there is no reload path

pub mod loader;
pub mod schema;

pub use loader::{load_config, ConfigError};
pub use schema::HarnessConfig;
