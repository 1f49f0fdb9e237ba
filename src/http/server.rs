//! HTTP server setup.
//!
//! # Responsibilities
//! - Freeze the engine and wrap it in an Axum router
//! - Wire up middleware (request ID, tracing, timeout)
//! - Buffer request bodies and hand each request to `Engine::handle`
//! - Act as the last recovery boundary for panics no middleware caught
//! - Serve with graceful shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{header::CONTENT_TYPE, Request, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServerConfig;
use crate::dispatch::Engine;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::lifecycle::ShutdownSignal;
use crate::middleware::recovery::panic_message;

/// Application state injected into the dispatch handler.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
    pub max_body_bytes: usize,
}

/// HTTP front end for an [`Engine`].
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Freeze `engine` and build the Axum router around it.
    pub fn new(engine: Engine, config: ServerConfig) -> Self {
        tracing::info!(
            routes = engine.router().route_count(),
            groups = engine.groups().len(),
            "Engine ready"
        );

        let state = AppState {
            engine: Arc::new(engine),
            max_body_bytes: config.listener.max_body_bytes,
        };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        Router::new()
            .fallback(dispatch_handler)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http())
            .layer(propagate_request_id_layer())
            .layer(set_request_id_layer())
    }

    /// A clone of the Axum router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Buffer the body and run the engine on a blocking worker.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let (parts, body) = request.into_parts();
    let body = match axum::body::to_bytes(body, state.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(path = %parts.uri.path(), error = %err, "Request body rejected");
            return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
        }
    };

    let request = Request::from_parts(parts, body);
    let engine = state.engine.clone();
    match tokio::task::spawn_blocking(move || engine.handle(request)).await {
        Ok(response) => response,
        Err(err) => {
            if err.is_panic() {
                let payload = err.into_panic();
                tracing::error!(panic = %panic_message(payload.as_ref()), "Unrecovered handler panic");
            } else {
                tracing::error!(error = %err, "Dispatch worker failed");
            }
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(CONTENT_TYPE, "text/html; charset=utf-8")],
                state.engine.settings().failure_message.clone(),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::Context;
    use crate::http::X_REQUEST_ID;
    use tower::ServiceExt;

    fn server(engine: Engine) -> HttpServer {
        let mut config = ServerConfig::default();
        config.listener.max_body_bytes = 16;
        HttpServer::new(engine, config)
    }

    async fn text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_dispatches_through_engine() {
        let mut engine = Engine::new();
        engine.post("/echo", |ctx: &mut Context| {
            let body = ctx.body().clone();
            ctx.data(StatusCode::OK, body);
        });

        let response = server(engine)
            .router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/echo")
                    .body(Body::from("ping"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(X_REQUEST_ID));
        assert_eq!(text(response).await, "ping");
    }

    #[tokio::test]
    async fn test_client_request_id_is_echoed() {
        let response = server(Engine::new())
            .router()
            .oneshot(
                Request::builder()
                    .uri("/missing")
                    .header(X_REQUEST_ID, "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()[X_REQUEST_ID], "abc-123");
        assert_eq!(text(response).await, "404 NOT FOUND: /missing\n");
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let mut engine = Engine::new();
        engine.post("/upload", |ctx: &mut Context| ctx.string(StatusCode::OK, "stored"));

        let response = server(engine)
            .router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/upload")
                    .body(Body::from(vec![b'x'; 64]))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_unrecovered_panic_becomes_500() {
        let mut engine = Engine::new();
        engine.get("/panic", |_ctx: &mut Context| panic!("no recovery installed"));

        let response = server(engine)
            .router()
            .oneshot(Request::builder().uri("/panic").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(text(response).await, "Request Error");
    }

    #[tokio::test]
    async fn test_run_returns_when_shutdown_preceded_it() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let shutdown = crate::lifecycle::Shutdown::new();
        shutdown.trigger();

        let run = server(Engine::new()).run(listener, shutdown.subscribe());
        let result = tokio::time::timeout(Duration::from_secs(5), run).await;
        assert!(matches!(result, Ok(Ok(()))));
    }
}
