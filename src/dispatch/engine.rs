//! Dispatch entry point.
//!
//! # Responsibilities
//! - Own the router, the group table and the settings every context reads
//! - Offer the root group's registration API directly on the engine
//! - Turn one buffered request into exactly one response
//!
//! # Design Decisions
//! - Built mutably during setup, then shared immutably (`Arc<Engine>`) while serving
//! - Contexts get a read-only `Arc<DispatchSettings>` instead of a back-pointer
//!   to the engine

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::http::{Method, Request, Response, StatusCode};

use super::context::Context;
use super::group::{GroupTable, RouterGroup, ROOT_GROUP};
use super::handler::{handler, HandlerFunc};
use crate::config::DispatchConfig;
use crate::middleware::{logger, recovery};
use crate::routing::Router;

/// Body written by [`Context::abort`] when nothing else is configured.
pub const DEFAULT_FAILURE_MESSAGE: &str = "Request Error";

/// Read-only settings shared by every request context.
#[derive(Debug, Clone)]
pub struct DispatchSettings {
    /// 500 body written when the chain is aborted.
    pub failure_message: String,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            failure_message: DEFAULT_FAILURE_MESSAGE.to_string(),
        }
    }
}

impl From<&DispatchConfig> for DispatchSettings {
    fn from(config: &DispatchConfig) -> Self {
        Self {
            failure_message: config.failure_message.clone(),
        }
    }
}

/// Router, groups and dispatch settings for one server.
pub struct Engine {
    router: Router<HandlerFunc>,
    groups: GroupTable,
    settings: Arc<DispatchSettings>,
    not_found: HandlerFunc,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::with_settings(DispatchSettings::default())
    }

    pub fn with_settings(settings: DispatchSettings) -> Self {
        Self {
            router: Router::new(),
            groups: GroupTable::new(),
            settings: Arc::new(settings),
            not_found: handler(|ctx: &mut Context| {
                let body = format!("404 NOT FOUND: {}\n", ctx.path());
                ctx.string(StatusCode::NOT_FOUND, body);
            }),
        }
    }

    /// Build an engine from configuration, installing the default middleware if enabled.
    pub fn from_config(config: &DispatchConfig) -> Self {
        let mut engine = Self::with_settings(DispatchSettings::from(config));
        if config.default_middleware {
            engine.default_configuration();
        }
        engine
    }

    /// Install [`logger`] and [`recovery`] on the root group.
    pub fn default_configuration(&mut self) -> &mut Self {
        self.use_middleware([logger(), recovery()])
    }

    pub fn settings(&self) -> &DispatchSettings {
        &self.settings
    }

    pub fn router(&self) -> &Router<HandlerFunc> {
        &self.router
    }

    pub fn groups(&self) -> &GroupTable {
        &self.groups
    }

    pub(crate) fn groups_mut(&mut self) -> &mut GroupTable {
        &mut self.groups
    }

    pub(crate) fn register(&mut self, method: Method, pattern: &str, handler: HandlerFunc) {
        self.router.add_route(method, pattern, handler);
    }

    pub(crate) fn new_group(&mut self, prefix: String) -> RouterGroup<'_> {
        tracing::debug!(prefix = %prefix, "Group created");
        let id = self.groups.add(prefix);
        RouterGroup::new(self, id)
    }

    /// Create a top-level group.
    pub fn group(&mut self, prefix: &str) -> RouterGroup<'_> {
        self.new_group(prefix.to_string())
    }

    /// Handle to the root group (empty prefix).
    pub fn root_group(&mut self) -> RouterGroup<'_> {
        RouterGroup::new(self, ROOT_GROUP)
    }

    pub fn use_middleware<I>(&mut self, middlewares: I) -> &mut Self
    where
        I: IntoIterator<Item = HandlerFunc>,
    {
        self.groups.use_middleware(ROOT_GROUP, middlewares);
        self
    }

    pub fn add_route<F>(&mut self, method: Method, pattern: &str, f: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.register(method, pattern, handler(f));
        self
    }

    pub fn get<F>(&mut self, pattern: &str, f: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route(Method::GET, pattern, f)
    }

    pub fn post<F>(&mut self, pattern: &str, f: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route(Method::POST, pattern, f)
    }

    pub fn put<F>(&mut self, pattern: &str, f: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route(Method::PUT, pattern, f)
    }

    pub fn delete<F>(&mut self, pattern: &str, f: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route(Method::DELETE, pattern, f)
    }

    pub fn patch<F>(&mut self, pattern: &str, f: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route(Method::PATCH, pattern, f)
    }

    pub fn static_files(&mut self, relative_path: &str, root: impl Into<PathBuf>) -> &mut Self {
        self.root_group().static_files(relative_path, root);
        self
    }

    /// Dispatch one request: group middleware, then the route handler or the
    /// not-found handler, driven from the first `next`.
    pub fn handle(&self, request: Request<Bytes>) -> Response<Body> {
        let mut ctx = Context::new(request, self.settings.clone());
        ctx.push_handlers(self.groups.middlewares_for(ctx.path()));

        match self.router.lookup(ctx.method(), ctx.path()) {
            Some(found) => {
                tracing::trace!(pattern = %found.pattern, "Route matched");
                let route_handler = found.handler.clone();
                ctx.set_params(found.params);
                ctx.push_handlers([route_handler]);
            }
            None => ctx.push_handlers([self.not_found.clone()]),
        }

        ctx.next();
        ctx.into_response()
    }
}
