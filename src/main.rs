//! Gee demo server.
//!
//! Registers a handful of routes showing static, parameter and wildcard
//! patterns, group middleware and recovery, then serves until Ctrl-C.

use std::path::PathBuf;
use std::time::Instant;

use axum::http::StatusCode;
use clap::Parser;
use serde_json::json;
use tokio::net::TcpListener;

use gee::config::{load_config, ServerConfig};
use gee::lifecycle::signals::wait_for_signal;
use gee::observability::logging;
use gee::{handler, Context, Engine, HandlerFunc, HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "gee")]
#[command(about = "Trie-routed HTTP demo server", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,
}

/// Middleware scoped to `/v2`: logs the status and latency of every v2 request.
fn only_for_v2() -> HandlerFunc {
    handler(|ctx: &mut Context| {
        let started = Instant::now();
        ctx.next();
        tracing::info!(
            status = ctx.status_code().as_u16(),
            uri = %ctx.uri(),
            elapsed = ?started.elapsed(),
            "v2 group"
        );
    })
}

fn build_engine(config: &ServerConfig) -> Engine {
    let mut engine = Engine::from_config(&config.dispatch);

    engine
        .get("/", |ctx: &mut Context| {
            ctx.string(StatusCode::OK, "<h1>Hello Gee</h1>");
        })
        .get("/panic", |ctx: &mut Context| {
            let names = ["geektutu"];
            let index = ctx.query("i").parse::<usize>().unwrap_or(100);
            ctx.string(StatusCode::OK, names[index]);
        });

    engine
        .group("/v1")
        .get("/hello", |ctx: &mut Context| {
            let body = format!("hello {}, you're at {}\n", ctx.query("name"), ctx.path());
            ctx.string(StatusCode::OK, body);
        })
        .get("/hello/:name", |ctx: &mut Context| {
            let body = format!("hello {}, you're at {}\n", ctx.param("name"), ctx.path());
            ctx.string(StatusCode::OK, body);
        })
        .post("/login", |ctx: &mut Context| {
            let payload = json!({
                "username": ctx.post_form("username"),
                "password": ctx.post_form("password"),
            });
            if let Err(err) = ctx.json(StatusCode::OK, &payload) {
                tracing::error!(error = %err, "Login response not encoded");
                ctx.abort();
            }
        });

    engine
        .group("/v2")
        .use_middleware([only_for_v2()])
        .get("/hello/:name", |ctx: &mut Context| {
            let body = format!("hello {}, you're at {}\n", ctx.param("name"), ctx.path());
            ctx.string(StatusCode::OK, body);
        })
        .get("/assets/*filepath", |ctx: &mut Context| {
            let payload = json!({ "filepath": ctx.param("filepath") });
            if ctx.json(StatusCode::OK, &payload).is_err() {
                ctx.abort();
            }
        });

    for mount in &config.statics {
        engine.static_files(&mount.prefix, &mount.root);
    }

    engine
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    if !logging::init(&config.logging) {
        tracing::warn!("Tracing subscriber already installed; keeping the existing one");
    }
    tracing::info!("gee v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        static_mounts = config.statics.len(),
        "Configuration loaded"
    );

    let engine = build_engine(&config);

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(engine, config);
    let server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    shutdown.trigger_on(wait_for_signal()).await;
    server_task.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}
