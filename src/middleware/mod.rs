//! Built-in middleware.
//!
//! # Data Flow
//! ```text
//! logger.rs:   start timer → next() → log status/uri/latency
//! recovery.rs: catch_unwind(next()) → on panic: log + abort (500)
//! ```
//!
//! # Design Decisions
//! - Both are plain `HandlerFunc`s; nothing distinguishes them from user middleware
//! - `Engine::default_configuration` installs logger first so it observes the
//!   status written by recovery

pub mod logger;
pub mod recovery;

pub use logger::logger;
pub use recovery::recovery;
