//! Request dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! Buffered request (method, uri, headers, body)
//!     → engine.rs (create Context)
//!     → group.rs (middleware of every group whose prefix matches the path)
//!     → routing (resolve pattern + params, or miss)
//!     → engine.rs (append route handler, or the 404 handler)
//!     → context.rs (first `next`; each handler advances the chain itself)
//!     → Context::into_response (exactly one response)
//! ```
//!
//! # Design Decisions
//! - Handlers are synchronous and receive `&mut Context`
//! - Onion ordering: pre-`next` code runs in chain order, post-`next` code in reverse
//! - `abort` is the only fast exit: cursor to the end, 500 with the failure message

pub mod context;
pub mod engine;
pub mod group;
pub mod handler;
pub mod static_files;

pub use context::{Context, ContextError};
pub use engine::{DispatchSettings, Engine, DEFAULT_FAILURE_MESSAGE};
pub use group::{GroupTable, RouterGroup};
pub use handler::{handler, HandlerFunc};
