//! Common utilities and types shared by the lexikon crates
//!
//! - [`LexikonError`] and the [`Result`] alias used at crate boundaries
//! - Structured logging bootstrap built on `tracing-subscriber`
//! - TOML settings with environment variable overrides

pub mod config;
pub mod error;
pub mod logging;
pub mod macros;

// Re-export commonly used types
pub use config::{Settings, SettingsLoader, DEFAULT_NAMESPACE};
pub use error::{LexikonError, Result};
pub use logging::{init_default_logging, init_logging, LoggingConfig};
