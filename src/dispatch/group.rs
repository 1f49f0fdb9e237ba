//! Route groups: prefix scopes carrying middleware.
//!
//! # Design Decisions
//! - Groups live in a flat table owned by the engine; a [`RouterGroup`] is a
//!   short-lived registration handle pointing into it
//! - Membership is a literal string-prefix test against the request path, so
//!   several groups (e.g. `""` and `/v1`) can apply to one request
//! - Matching groups contribute middleware in group-registration order

use std::path::PathBuf;

use axum::http::Method;

use super::context::Context;
use super::engine::Engine;
use super::handler::{handler, HandlerFunc};
use super::static_files::{static_handler, FILEPATH_PARAM};
use crate::routing::pattern::join_paths;

/// Index of a group inside the [`GroupTable`].
pub type GroupId = usize;

/// The root group every engine starts with; its empty prefix matches every path.
pub const ROOT_GROUP: GroupId = 0;

#[derive(Clone)]
struct Group {
    prefix: String,
    middlewares: Vec<HandlerFunc>,
}

/// All registered groups, in registration order.
#[derive(Clone)]
pub struct GroupTable {
    groups: Vec<Group>,
}

impl Default for GroupTable {
    fn default() -> Self {
        Self::new()
    }
}

impl GroupTable {
    pub fn new() -> Self {
        Self {
            groups: vec![Group {
                prefix: String::new(),
                middlewares: Vec::new(),
            }],
        }
    }

    /// Register a group with an absolute prefix.
    pub fn add(&mut self, prefix: String) -> GroupId {
        self.groups.push(Group {
            prefix,
            middlewares: Vec::new(),
        });
        self.groups.len() - 1
    }

    pub fn prefix(&self, id: GroupId) -> &str {
        &self.groups[id].prefix
    }

    pub fn use_middleware<I>(&mut self, id: GroupId, middlewares: I)
    where
        I: IntoIterator<Item = HandlerFunc>,
    {
        self.groups[id].middlewares.extend(middlewares);
    }

    /// Middleware of every group whose prefix is a prefix of `path`.
    pub fn middlewares_for(&self, path: &str) -> Vec<HandlerFunc> {
        self.groups
            .iter()
            .filter(|group| path.starts_with(&group.prefix))
            .flat_map(|group| group.middlewares.iter().cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Registration handle for one group.
pub struct RouterGroup<'e> {
    engine: &'e mut Engine,
    id: GroupId,
}

impl<'e> RouterGroup<'e> {
    pub(crate) fn new(engine: &'e mut Engine, id: GroupId) -> Self {
        Self { engine, id }
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn prefix(&self) -> &str {
        self.engine.groups().prefix(self.id)
    }

    /// Create a nested group; its prefix is this group's prefix plus `prefix`.
    pub fn group(&mut self, prefix: &str) -> RouterGroup<'_> {
        let full = format!("{}{}", self.prefix(), prefix);
        self.engine.new_group(full)
    }

    /// Append middleware to this group.
    pub fn use_middleware<I>(&mut self, middlewares: I) -> &mut Self
    where
        I: IntoIterator<Item = HandlerFunc>,
    {
        self.engine.groups_mut().use_middleware(self.id, middlewares);
        self
    }

    /// Register `f` for `method` at this group's prefix plus `path`.
    pub fn add_route<F>(&mut self, method: Method, path: &str, f: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.route(method, path, handler(f))
    }

    fn route(&mut self, method: Method, path: &str, handler: HandlerFunc) -> &mut Self {
        let pattern = format!("{}{}", self.prefix(), path);
        self.engine.register(method, &pattern, handler);
        self
    }

    pub fn get<F>(&mut self, path: &str, f: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route(Method::GET, path, f)
    }

    pub fn post<F>(&mut self, path: &str, f: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route(Method::POST, path, f)
    }

    pub fn put<F>(&mut self, path: &str, f: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route(Method::PUT, path, f)
    }

    pub fn delete<F>(&mut self, path: &str, f: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route(Method::DELETE, path, f)
    }

    pub fn patch<F>(&mut self, path: &str, f: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route(Method::PATCH, path, f)
    }

    /// Serve files under `root` at `GET <prefix><relative_path>/*filepath`.
    pub fn static_files(&mut self, relative_path: &str, root: impl Into<PathBuf>) -> &mut Self {
        let wildcard = format!("/*{}", FILEPATH_PARAM);
        let pattern = join_paths(relative_path, &wildcard);
        let root = root.into();
        tracing::info!(
            prefix = %join_paths(self.prefix(), relative_path),
            root = %root.display(),
            "Static mount"
        );
        self.route(Method::GET, &pattern, static_handler(root))
    }
}
