//! End-to-end dispatch tests over a real socket.

use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use gee::config::ServerConfig;
use gee::{handler, Context, Engine};

mod common;

type Trace = Arc<Mutex<Vec<&'static str>>>;

fn engine_with_groups(trace: &Trace) -> Engine {
    let mut engine = Engine::new();
    engine.default_configuration();

    let a = trace.clone();
    engine.group("/").use_middleware([handler(move |ctx: &mut Context| {
        a.lock().unwrap().push("A");
        ctx.next();
    })]);

    let b = trace.clone();
    let route = trace.clone();
    engine
        .group("/v1")
        .use_middleware([handler(move |ctx: &mut Context| {
            b.lock().unwrap().push("B");
            ctx.next();
        })])
        .get("/hello", move |ctx: &mut Context| {
            route.lock().unwrap().push("route");
            ctx.string(StatusCode::OK, "hello");
        })
        .get("/hello/:name", |ctx: &mut Context| {
            let body = format!("hello {}", ctx.param("name"));
            ctx.string(StatusCode::OK, body);
        })
        .post("/login", |ctx: &mut Context| {
            let payload = serde_json::json!({
                "username": ctx.post_form("username"),
                "password": ctx.post_form("password"),
            });
            if ctx.json(StatusCode::OK, &payload).is_err() {
                ctx.abort();
            }
        });

    engine.get("/user/:id", |ctx: &mut Context| {
        let body = format!("user {}", ctx.param("id"));
        ctx.string(StatusCode::OK, body);
    });
    engine.get("/user/create", |ctx: &mut Context| {
        ctx.string(StatusCode::OK, "create form");
    });

    engine
}

#[tokio::test]
async fn test_group_chain_order_over_http() {
    let trace = Trace::default();
    let server = common::spawn_server(engine_with_groups(&trace), ServerConfig::default()).await;
    let client = common::client();

    let res = client.get(server.url("/v1/hello")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert!(res.headers().contains_key("x-request-id"));
    assert_eq!(res.text().await.unwrap(), "hello");
    assert_eq!(*trace.lock().unwrap(), vec!["A", "B", "route"]);

    server.stop().await;
}

#[tokio::test]
async fn test_not_found_body_and_middleware() {
    let trace = Trace::default();
    let server = common::spawn_server(engine_with_groups(&trace), ServerConfig::default()).await;
    let client = common::client();

    let res = client.get(server.url("/no/such/path")).send().await.unwrap();
    assert_eq!(res.status(), 404);
    assert_eq!(res.text().await.unwrap(), "404 NOT FOUND: /no/such/path\n");
    assert_eq!(*trace.lock().unwrap(), vec!["A"]);

    server.stop().await;
}

#[tokio::test]
async fn test_params_static_precedence_and_form() {
    let trace = Trace::default();
    let server = common::spawn_server(engine_with_groups(&trace), ServerConfig::default()).await;
    let client = common::client();

    let res = client.get(server.url("/v1/hello/geektutu")).send().await.unwrap();
    assert_eq!(res.text().await.unwrap(), "hello geektutu");

    let res = client.get(server.url("/user/create")).send().await.unwrap();
    assert_eq!(res.text().await.unwrap(), "create form");
    let res = client.get(server.url("/user/42")).send().await.unwrap();
    assert_eq!(res.text().await.unwrap(), "user 42");

    let res = client
        .post(server.url("/v1/login"))
        .header("content-type", "application/x-www-form-urlencoded")
        .body("username=geektutu&password=1234")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: serde_json::Value = serde_json::from_str(&res.text().await.unwrap()).unwrap();
    assert_eq!(body["username"], "geektutu");
    assert_eq!(body["password"], "1234");

    server.stop().await;
}

#[tokio::test]
async fn test_recovery_answers_failure_message() {
    let mut config = ServerConfig::default();
    config.dispatch.failure_message = "Internal Server Error".into();

    let mut engine = Engine::from_config(&config.dispatch);
    engine.get("/panic", |_ctx: &mut Context| panic!("handler bug"));

    let server = common::spawn_server(engine, config).await;
    let client = common::client();

    let res = client.get(server.url("/panic")).send().await.unwrap();
    assert_eq!(res.status(), 500);
    assert_eq!(res.text().await.unwrap(), "Internal Server Error");

    // the worker survived the panic
    let res = client.get(server.url("/missing")).send().await.unwrap();
    assert_eq!(res.status(), 404);

    server.stop().await;
}

#[tokio::test]
async fn test_static_mount_over_http() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>assets</h1>").unwrap();

    let mut engine = Engine::new();
    engine.static_files("/assets", dir.path());
    let server = common::spawn_server(engine, ServerConfig::default()).await;
    let client = common::client();

    let res = client.get(server.url("/assets/index.html")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(
        res.headers()["content-type"],
        "text/html; charset=utf-8"
    );
    assert_eq!(res.text().await.unwrap(), "<h1>assets</h1>");

    let res = client.get(server.url("/assets/missing.css")).send().await.unwrap();
    assert_eq!(res.status(), 404);

    server.stop().await;
}
