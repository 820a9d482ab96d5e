use http::Method;
use std::sync::Arc;
use viaduct::middleware::{cors, logger, CorsConfig};
use viaduct::{Dispatcher, HandlerKind, MethodFilter, Request, Response, RouteTable};

use tracing_util::TestTracing;

fn dispatch(dispatcher: &Dispatcher, method: Method, path: &str) -> Response {
    let mut req = Request::new(method, path);
    let mut res = Response::new();
    dispatcher.handle(&mut req, &mut res);
    res
}

fn table_with_cors(config: CorsConfig) -> RouteTable {
    let mut table = RouteTable::new();
    table
        .register(
            MethodFilter::Any,
            "/(.*)",
            HandlerKind::Middleware,
            cors(config),
        )
        .unwrap();
    table
        .register(
            MethodFilter::Only(Method::GET),
            "/items",
            HandlerKind::Endpoint,
            Arc::new(|_req, res, _next| {
                res.status(200).send("items");
            }),
        )
        .unwrap();
    table
}

#[test]
fn test_cors_headers_added_and_chain_continues() {
    let _tracing = TestTracing::init();
    let dispatcher = Dispatcher::new(table_with_cors(CorsConfig::default()));

    let res = dispatch(&dispatcher, Method::GET, "/items");

    assert_eq!(res.status_code(), 200);
    assert_eq!(res.body_bytes(), b"items");
    assert_eq!(res.get_header("Access-Control-Allow-Origin"), Some("*"));
    assert!(res
        .get_header("Access-Control-Allow-Methods")
        .unwrap()
        .contains("GET"));
}

#[test]
fn test_cors_preflight_short_circuits() {
    let _tracing = TestTracing::init();
    let dispatcher = Dispatcher::new(table_with_cors(CorsConfig::default()));

    let res = dispatch(&dispatcher, Method::OPTIONS, "/items");

    assert_eq!(res.status_code(), 204);
    assert!(res.is_ended());
    assert!(res.body_bytes().is_empty());
}

#[test]
fn test_cors_restricted_origins() {
    let _tracing = TestTracing::init();
    let config = CorsConfig::for_origins(vec!["https://example.com".to_string()]);
    let dispatcher = Dispatcher::new(table_with_cors(config));

    let res = dispatch(&dispatcher, Method::GET, "/items");

    assert_eq!(
        res.get_header("Access-Control-Allow-Origin"),
        Some("https://example.com")
    );
}

#[test]
fn test_logger_continues_chain_and_sees_final_status() {
    let _tracing = TestTracing::init();
    let mut table = RouteTable::new();
    table
        .register(MethodFilter::Any, "/(.*)", HandlerKind::Middleware, logger())
        .unwrap();
    table
        .register(
            MethodFilter::Only(Method::GET),
            "/ok",
            HandlerKind::Endpoint,
            Arc::new(|_req, res, _next| {
                res.status(200).send("ok");
            }),
        )
        .unwrap();
    let dispatcher = Dispatcher::new(table);

    let res = dispatch(&dispatcher, Method::GET, "/ok");
    assert_eq!(res.status_code(), 200);

    // An unmatched path still resolves through the fallback; the logger
    // wrapping the chain must not disturb that.
    let res = dispatch(&dispatcher, Method::GET, "/missing");
    assert_eq!(res.status_code(), 400);
    assert!(res.is_ended());
}
