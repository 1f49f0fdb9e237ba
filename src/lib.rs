//! Gee: a small HTTP toolkit built around a trie router and an onion-style
//! handler chain.
//!
//! ```text
//! (method, path) → routing::Router (trie, static-first)
//!               → dispatch::Engine (group middleware + route handler)
//!               → dispatch::Context::next (cooperative chain)
//! ```

// Core subsystems
pub mod dispatch;
pub mod middleware;
pub mod routing;

// Transport and process concerns
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::ServerConfig;
pub use dispatch::{handler, Context, ContextError, Engine, HandlerFunc, RouterGroup};
pub use http::HttpServer;
pub use lifecycle::{Shutdown, ShutdownSignal};
