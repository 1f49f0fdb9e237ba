//! Request logging middleware.

use std::time::Instant;

use crate::dispatch::{handler, Context, HandlerFunc};
use crate::http::X_REQUEST_ID;

/// Log status, method, uri and latency after the rest of the chain has run.
pub fn logger() -> HandlerFunc {
    handler(|ctx: &mut Context| {
        let started = Instant::now();
        ctx.next();
        tracing::info!(
            status = ctx.status_code().as_u16(),
            method = %ctx.method(),
            uri = %ctx.uri(),
            request_id = ctx.request_header(X_REQUEST_ID).unwrap_or("-"),
            elapsed = ?started.elapsed(),
            aborted = ctx.is_aborted(),
            "Request handled"
        );
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::Engine;
    use axum::body::Bytes;
    use axum::http::{Request, StatusCode};

    #[test]
    fn test_logger_is_transparent() {
        let mut engine = Engine::new();
        engine.use_middleware([logger()]);
        engine.get("/hello", |ctx: &mut Context| ctx.string(StatusCode::OK, "hi"));

        let ok = engine.handle(Request::builder().uri("/hello").body(Bytes::new()).unwrap());
        assert_eq!(ok.status(), StatusCode::OK);

        let missing = engine.handle(Request::builder().uri("/nope").body(Bytes::new()).unwrap());
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }
}
