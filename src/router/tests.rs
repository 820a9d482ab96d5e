use super::{HandlerKind, MethodFilter, RouteTable};
use crate::dispatcher::Handler;
use http::Method;
use std::sync::Arc;

fn noop() -> Handler {
    Arc::new(|_req, _res, _next| {})
}

#[test]
fn test_method_filter() {
    assert!(MethodFilter::Any.matches(&Method::GET));
    assert!(MethodFilter::Any.matches(&Method::DELETE));
    assert!(MethodFilter::Only(Method::GET).matches(&Method::GET));
    assert!(!MethodFilter::Only(Method::GET).matches(&Method::POST));
}

#[test]
fn test_candidates_follow_registration_order() {
    let mut table = RouteTable::new();
    table
        .register(MethodFilter::Any, "/(.*)", HandlerKind::Middleware, noop())
        .unwrap();
    table
        .register(
            MethodFilter::Only(Method::GET),
            "/hello/:name",
            HandlerKind::Endpoint,
            noop(),
        )
        .unwrap();
    table
        .register(
            MethodFilter::Any,
            "/hello/(.*)",
            HandlerKind::Middleware,
            noop(),
        )
        .unwrap();

    let candidates = table.candidates(&Method::GET, "/hello/world");
    assert_eq!(candidates.len(), 3);
    assert_eq!(candidates[0].0.pattern.as_str(), "/(.*)");
    assert_eq!(candidates[1].0.pattern.as_str(), "/hello/:name");
    assert_eq!(candidates[2].0.pattern.as_str(), "/hello/(.*)");
    assert_eq!(candidates[1].1[0].1, "world");
}

#[test]
fn test_method_predicate_filters_candidates() {
    let mut table = RouteTable::new();
    table
        .register(
            MethodFilter::Only(Method::GET),
            "/hello/:name",
            HandlerKind::Endpoint,
            noop(),
        )
        .unwrap();

    assert_eq!(table.candidates(&Method::POST, "/hello/world").len(), 0);
    assert_eq!(table.candidates(&Method::GET, "/hello/world").len(), 1);
}

#[test]
fn test_duplicate_registration_is_allowed() {
    let mut table = RouteTable::new();
    for _ in 0..3 {
        table
            .register(
                MethodFilter::Only(Method::GET),
                "/same",
                HandlerKind::Endpoint,
                noop(),
            )
            .unwrap();
    }
    assert_eq!(table.len(), 3);
    assert_eq!(table.candidates(&Method::GET, "/same").len(), 3);
}

#[test]
fn test_malformed_pattern_rejected_at_registration() {
    let mut table = RouteTable::new();
    let err = table.register(MethodFilter::Any, "no-slash", HandlerKind::Endpoint, noop());
    assert!(err.is_err());
    assert!(table.is_empty());
}
