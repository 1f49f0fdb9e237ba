//! Route registration and lookup.
//!
//! # Responsibilities
//! - Keep one trie root per HTTP method
//! - Map `METHOD-pattern` keys to handlers
//! - Resolve a request path to its pattern, handler and bound parameters
//!
//! # Design Decisions
//! - The trie only answers "which pattern"; the flat table answers "which handler"
//! - Populated during setup, read-only while serving (no locks)
//! - Generic over the handler type so matching can be tested on its own

use std::collections::HashMap;

use axum::http::Method;

use super::pattern::{parse_pattern, split_path, SegmentKind};
use super::trie::Node;

/// Parameters bound from the request path, keyed by placeholder name.
pub type Params = HashMap<String, String>;

/// A successful lookup.
#[derive(Debug)]
pub struct RouteMatch<'r, H> {
    /// The registered pattern that matched.
    pub pattern: &'r str,
    /// Handler registered for `(method, pattern)`.
    pub handler: &'r H,
    /// Placeholder bindings for this request.
    pub params: Params,
}

/// Method-aware trie router.
#[derive(Debug)]
pub struct Router<H> {
    roots: HashMap<Method, Node>,
    handlers: HashMap<String, H>,
}

impl<H> Default for Router<H> {
    fn default() -> Self {
        Self::new()
    }
}

fn route_key(method: &Method, pattern: &str) -> String {
    format!("{}-{}", method, pattern)
}

impl<H> Router<H> {
    pub fn new() -> Self {
        Self {
            roots: HashMap::new(),
            handlers: HashMap::new(),
        }
    }

    /// Register `handler` for `(method, pattern)`. Re-registering replaces the handler.
    pub fn add_route(&mut self, method: Method, pattern: &str, handler: H) {
        let parts = parse_pattern(pattern);
        let key = route_key(&method, pattern);

        let root = self.roots.entry(method.clone()).or_default();
        if let Some(previous) = root.insert(pattern, &parts) {
            if previous != pattern {
                tracing::warn!(
                    method = %method,
                    pattern = %pattern,
                    shadowed = %previous,
                    "Pattern collides structurally with an existing route"
                );
            }
        }

        if self.handlers.insert(key, handler).is_some() {
            tracing::warn!(method = %method, pattern = %pattern, "Route handler replaced");
        } else {
            tracing::debug!(method = %method, pattern = %pattern, "Route registered");
        }
    }

    /// Find the terminal trie node for `path` and bind its parameters.
    ///
    /// `None` means no match, which is distinct from a match with no params.
    pub fn get_route(&self, method: &Method, path: &str) -> Option<(&Node, Params)> {
        let root = self.roots.get(method)?;
        let search_parts = split_path(path);
        let node = root.search(&search_parts, 0)?;
        let pattern = node.pattern()?;
        Some((node, bind_params(pattern, &search_parts)))
    }

    /// Resolve `path` all the way to its handler.
    pub fn lookup(&self, method: &Method, path: &str) -> Option<RouteMatch<'_, H>> {
        let (node, params) = self.get_route(method, path)?;
        let pattern = node.pattern()?;
        let handler = self.handlers.get(&route_key(method, pattern))?;
        Some(RouteMatch {
            pattern,
            handler,
            params,
        })
    }

    /// Trie root for `method`, if any route was registered for it.
    pub fn root(&self, method: &Method) -> Option<&Node> {
        self.roots.get(method)
    }

    /// Number of entries in the resolution table.
    pub fn route_count(&self) -> usize {
        self.handlers.len()
    }
}

/// Pair each placeholder of `pattern` with the path part at the same index.
fn bind_params(pattern: &str, path_parts: &[&str]) -> Params {
    let mut params = Params::new();
    for (index, part) in parse_pattern(pattern).into_iter().enumerate() {
        match SegmentKind::of(part) {
            SegmentKind::Static => {}
            SegmentKind::Param => {
                if let Some(value) = path_parts.get(index) {
                    params.insert(part[1..].to_string(), value.to_string());
                }
            }
            SegmentKind::Wildcard => {
                if part.len() > 1 {
                    let tail = path_parts
                        .get(index..)
                        .map(|rest| rest.join("/"))
                        .unwrap_or_default();
                    params.insert(part[1..].to_string(), tail);
                }
                break;
            }
        }
    }
    params
}
