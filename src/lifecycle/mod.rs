//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Register routes → Freeze engine → Bind listener
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain connections → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Routes are registered before the listener binds (no registration while serving)
//! - One broadcast channel fans the shutdown event out to every server task
//! - A trigger is sticky: tasks that subscribe after it still stop

pub mod shutdown;
pub mod signals;

pub use shutdown::{Shutdown, ShutdownSignal};
