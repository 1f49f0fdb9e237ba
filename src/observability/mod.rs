//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! routing / dispatch / middleware / http
//!     → tracing events (route registration, request handled, panics)
//!     → logging.rs (EnvFilter + fmt subscriber)
//!     → stdout
//! ```
//!
//! # Design Decisions
//! - Structured fields, not formatted strings
//! - Request ID flows from the HTTP layer into the logger middleware

pub mod logging;
