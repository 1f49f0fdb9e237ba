//! HTTP transport adapter.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID / trace / timeout layers)
//!     → request.rs (assign or keep x-request-id)
//!     → server.rs (buffer body, spawn_blocking)
//!     → dispatch::Engine::handle (group middleware + route chain)
//!     → Send response to client
//! ```

pub mod request;
pub mod server;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use server::HttpServer;
