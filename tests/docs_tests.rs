use http::Method;
use std::sync::Arc;
use viaduct::docs;
use viaduct::{
    App, AppConfig, AppInfo, Dispatcher, HandlerKind, MethodFilter, Request, Response, RouteTable,
};

use tracing_util::TestTracing;

fn dispatch(dispatcher: &Dispatcher, method: Method, path: &str) -> Response {
    let mut req = Request::new(method, path);
    let mut res = Response::new();
    dispatcher.handle(&mut req, &mut res);
    res
}

fn sample_app() -> App {
    let mut app = App::new(AppConfig {
        name: "Petstore".to_string(),
        version: "2.0.0".to_string(),
        description: "A sample API".to_string(),
        host: "localhost:9999".to_string(),
        ..AppConfig::default()
    })
    .unwrap();
    app.get(
        "/pets/:id",
        Arc::new(|_req, res, _next| {
            res.status(200).send("pet");
        }),
    )
    .unwrap();
    app.post(
        "/pets",
        Arc::new(|_req, res, _next| {
            res.status(201).send("created");
        }),
    )
    .unwrap();
    app
}

#[test]
fn test_describe_reflects_registered_routes() {
    let _tracing = TestTracing::init();
    let info = AppInfo {
        name: "Petstore".to_string(),
        version: "2.0.0".to_string(),
        description: "A sample API".to_string(),
        host: "localhost:9999".to_string(),
    };
    let mut table = RouteTable::new();
    table
        .register(
            MethodFilter::Only(Method::GET),
            "/pets/:id",
            HandlerKind::Endpoint,
            Arc::new(|_req, _res, _next| {}),
        )
        .unwrap();
    table
        .register(
            MethodFilter::Only(Method::POST),
            "/pets",
            HandlerKind::Endpoint,
            Arc::new(|_req, _res, _next| {}),
        )
        .unwrap();
    let catalog = docs::describe(&table, &info);

    assert_eq!(catalog.name, "Petstore");
    assert_eq!(catalog.version, "2.0.0");
    assert_eq!(catalog.routes.len(), 2);
    assert_eq!(catalog.routes[0].method, "GET");
    assert_eq!(catalog.routes[0].path, "/pets/:id");
    assert_eq!(catalog.routes[0].kind, "endpoint");
    assert_eq!(catalog.routes[1].method, "POST");
}

#[test]
fn test_catalog_json_endpoint() {
    let _tracing = TestTracing::init();
    let dispatcher = sample_app().build().unwrap();

    let res = dispatch(&dispatcher, Method::GET, "/docs.json");

    assert_eq!(res.status_code(), 200);
    assert_eq!(res.get_header("Content-Type"), Some("application/json"));
    let body: serde_json::Value = serde_json::from_slice(res.body_bytes()).unwrap();
    assert_eq!(body["name"], "Petstore");
    assert_eq!(body["host"], "localhost:9999");
    let routes = body["routes"].as_array().unwrap();
    assert_eq!(routes.len(), 2);
    assert_eq!(routes[0]["path"], "/pets/:id");
}

#[test]
fn test_viewer_page_and_script() {
    let _tracing = TestTracing::init();
    let dispatcher = sample_app().build().unwrap();

    let page = dispatch(&dispatcher, Method::GET, "/docs");
    assert_eq!(page.status_code(), 200);
    assert_eq!(page.get_header("Content-Type"), Some("text/html"));
    assert!(String::from_utf8_lossy(page.body_bytes()).contains("/docs/viewer.js"));

    let script = dispatch(&dispatcher, Method::GET, "/docs/viewer.js");
    assert_eq!(script.status_code(), 200);
    assert_eq!(
        script.get_header("Content-Type"),
        Some("application/javascript")
    );
    assert!(String::from_utf8_lossy(script.body_bytes()).contains("/docs.json"));
}

#[test]
fn test_user_route_shadows_catalog_page() {
    // Catalog entries are appended last, so a user route on the same path
    // wins by registration order.
    let _tracing = TestTracing::init();
    let mut app = sample_app();
    app.get(
        "/docs",
        Arc::new(|_req, res, _next| {
            res.status(200).send("my own docs");
        }),
    )
    .unwrap();
    let dispatcher = app.build().unwrap();

    let res = dispatch(&dispatcher, Method::GET, "/docs");
    assert_eq!(res.body_bytes(), b"my own docs");
}

#[test]
fn test_docs_disabled_leaves_no_catalog() {
    let _tracing = TestTracing::init();
    let mut app = App::new(AppConfig {
        docs: false,
        ..AppConfig::default()
    })
    .unwrap();
    app.get(
        "/only",
        Arc::new(|_req, res, _next| {
            res.status(200).send("only");
        }),
    )
    .unwrap();
    let dispatcher = app.build().unwrap();

    let res = dispatch(&dispatcher, Method::GET, "/docs.json");
    assert_eq!(res.status_code(), 400);
}

#[test]
fn test_catalog_snapshot_excludes_its_own_entries() {
    // The JSON served is the table as it stood before the catalog routes
    // were appended.
    let _tracing = TestTracing::init();
    let dispatcher = sample_app().build().unwrap();
    assert_eq!(dispatcher.routes().len(), 5);

    let res = dispatch(&dispatcher, Method::GET, "/docs.json");
    let body: serde_json::Value = serde_json::from_slice(res.body_bytes()).unwrap();
    assert_eq!(body["routes"].as_array().unwrap().len(), 2);
}
