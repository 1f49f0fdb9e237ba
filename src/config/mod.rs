//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (read & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServerConfig (validated, immutable)
//!     → Engine::from_config / HttpServer::new / observability::logging::init
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; routes are code, not config
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    DispatchConfig, ListenerConfig, LoggingConfig, ServerConfig, StaticMountConfig, TimeoutConfig,
};
pub use validation::{validate_config, ValidationError};
