//! Panic recovery middleware.
//!
//! Runs the downstream chain under `catch_unwind`. A panic is logged and turned
//! into an abort, so the request still ends with the configured 500 response.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::dispatch::{handler, Context, HandlerFunc};

pub fn recovery() -> HandlerFunc {
    handler(|ctx: &mut Context| {
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| ctx.next())) {
            tracing::error!(
                method = %ctx.method(),
                path = %ctx.path(),
                panic = %panic_message(payload.as_ref()),
                "Handler panicked"
            );
            ctx.abort();
        }
    })
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic"
    }
}
