//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (setup phase):
//!     (method, pattern, handler)
//!     → pattern.rs (split into parts, stop at first wildcard)
//!     → trie.rs (insert parts under the method's root)
//!     → router.rs (record METHOD-pattern → handler)
//!
//! Incoming request (method, path):
//!     → pattern.rs (split full path)
//!     → trie.rs (static-first depth-first search)
//!     → router.rs (re-split matched pattern, bind params, resolve handler)
//!     → Return: RouteMatch or None
//! ```
//!
//! # Design Decisions
//! - Routes registered before serving, immutable at runtime
//! - No regex; matching is a walk over segments
//! - Deterministic precedence: literal, then `:param`, then `*wildcard`

pub mod pattern;
pub mod router;
pub mod trie;

pub use pattern::{parse_pattern, split_path, SegmentKind};
pub use router::{Params, RouteMatch, Router};
pub use trie::Node;
