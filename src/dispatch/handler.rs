//! Handler type shared by routes and middleware.

use std::sync::Arc;

use super::context::Context;

/// A route handler or middleware.
///
/// Middleware runs its pre-processing, calls [`Context::next`], then runs its
/// post-processing. Not calling `next` ends the chain at this handler.
pub type HandlerFunc = Arc<dyn Fn(&mut Context) + Send + Sync>;

/// Box a closure as a [`HandlerFunc`].
pub fn handler<F>(f: F) -> HandlerFunc
where
    F: Fn(&mut Context) + Send + Sync + 'static,
{
    Arc::new(f)
}
