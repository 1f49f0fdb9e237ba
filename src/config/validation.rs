//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, body limit > 0)
//! - Check static mounts produce a valid wildcard pattern
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ServerConfig;
use crate::routing::{split_path, SegmentKind};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a socket address")]
    BindAddress(String),
    #[error("listener.max_body_bytes must be greater than zero")]
    ZeroBodyLimit,
    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,
    #[error("dispatch.failure_message must not be empty")]
    EmptyFailureMessage,
    #[error("static prefix {0:?} must start with '/' and contain no ':' or '*' segments")]
    StaticPrefix(String),
    #[error("static mount {0:?} has an empty root")]
    StaticRoot(String),
}

/// Check every rule and collect all violations.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if config.listener.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }
    if config.dispatch.failure_message.is_empty() {
        errors.push(ValidationError::EmptyFailureMessage);
    }

    for mount in &config.statics {
        let has_placeholder = split_path(&mount.prefix)
            .into_iter()
            .any(|part| SegmentKind::of(part).is_wild());
        if !mount.prefix.starts_with('/') || has_placeholder {
            errors.push(ValidationError::StaticPrefix(mount.prefix.clone()));
        }
        if mount.root.trim().is_empty() {
            errors.push(ValidationError::StaticRoot(mount.prefix.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::StaticMountConfig;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&ServerConfig::default()), Ok(()));
    }

    #[test]
    fn test_reports_every_violation() {
        let mut config = ServerConfig::default();
        config.listener.bind_address = "localhost".into();
        config.listener.max_body_bytes = 0;
        config.timeouts.request_secs = 0;
        config.dispatch.failure_message = String::new();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::BindAddress("localhost".into()),
                ValidationError::ZeroBodyLimit,
                ValidationError::ZeroRequestTimeout,
                ValidationError::EmptyFailureMessage,
            ]
        );
    }

    #[test]
    fn test_static_mounts() {
        let mut config = ServerConfig::default();
        config.statics = vec![
            StaticMountConfig {
                prefix: "/assets".into(),
                root: "./static".into(),
            },
            StaticMountConfig {
                prefix: "assets".into(),
                root: "./static".into(),
            },
            StaticMountConfig {
                prefix: "/files/:id".into(),
                root: " ".into(),
            },
        ];

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::StaticPrefix("assets".into()),
                ValidationError::StaticPrefix("/files/:id".into()),
                ValidationError::StaticRoot("/files/:id".into()),
            ]
        );
    }
}
