//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::dispatch::DEFAULT_FAILURE_MESSAGE;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address, body limit).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Handler chain settings.
    pub dispatch: DispatchConfig,

    /// Log output settings.
    pub logging: LoggingConfig,

    /// Static directories mounted on the root group.
    pub statics: Vec<StaticMountConfig>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:9999").
    pub bind_address: String,

    /// Largest request body buffered for a handler, in bytes.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:9999".to_string(),
            max_body_bytes: 1024 * 1024,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Whole-request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Handler chain configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct DispatchConfig {
    /// Body of the 500 response written when a chain is aborted.
    pub failure_message: String,

    /// Install the logger and recovery middleware on the root group.
    pub default_middleware: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            failure_message: DEFAULT_FAILURE_MESSAGE.to_string(),
            default_middleware: true,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives, used when `RUST_LOG` is unset.
    pub filter: String,

    /// Colored output.
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "gee=info,tower_http=info".to_string(),
            ansi: true,
        }
    }
}

/// One static directory mount.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct StaticMountConfig {
    /// URL prefix, e.g. "/assets".
    pub prefix: String,

    /// Directory served under the prefix.
    pub root: String,
}
