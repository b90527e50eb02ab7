#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Registration, lookup and removal through the public API.

use http::Method;
use routematch::{ConditionSet, RegistrationError, Request, RouteError, Router};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Handler {
    First,
    Second,
}

fn get(path: &str) -> Request {
    Request::new(Method::GET, path)
}

#[test]
fn test_register_duplicates() {
    let router = Router::new();
    router
        .register_patterns(["foo"], ConditionSet::new(), Handler::First)
        .unwrap();
    let err = router
        .register_patterns(["foo"], ConditionSet::new(), Handler::Second)
        .unwrap_err();
    match err {
        RegistrationError::DuplicateMapping { mapping } => assert!(mapping.contains("/foo")),
        other => panic!("expected duplicate, got {:?}", other),
    }
    assert_eq!(router.len(), 1);
}

#[test]
fn test_direct_match() {
    let router = Router::new();
    router
        .register_patterns(["foo"], ConditionSet::new(), Handler::First)
        .unwrap();
    let found = router.route(&get("/foo")).unwrap();
    assert_eq!(found.handler, Handler::First);
    assert_eq!(found.best_pattern, "/foo");
}

#[test]
fn test_pattern_match() {
    let router = Router::new();
    router
        .register_patterns(["/fo*"], ConditionSet::new(), Handler::First)
        .unwrap();
    router
        .register_patterns(["/f*"], ConditionSet::new(), Handler::Second)
        .unwrap();
    assert_eq!(router.route(&get("/foo")).unwrap().handler, Handler::First);
}

#[test]
fn test_ambiguous_match() {
    let router = Router::new();
    router
        .register_patterns(["/f?o"], ConditionSet::new(), Handler::First)
        .unwrap();
    router
        .register_patterns(["/fo?"], ConditionSet::new(), Handler::Second)
        .unwrap();
    let err = router.route(&get("/foo")).unwrap_err();
    assert!(matches!(err, RouteError::Ambiguous { .. }));
    assert_eq!(err.status_code(), http::StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn test_register_mapping() {
    let router = Router::new();
    let exact = router
        .register_patterns(["/foo"], ConditionSet::new(), Handler::First)
        .unwrap();
    let wildcard = router
        .register_patterns(["/foo*"], ConditionSet::new(), Handler::First)
        .unwrap();

    let mappings: Vec<_> = router.mappings().into_iter().map(|(m, _)| m).collect();
    assert!(mappings.contains(&exact));
    assert!(mappings.contains(&wildcard));
}

#[test]
fn test_same_handler_under_two_keys() {
    let router = Router::new();
    let foo = router
        .register_patterns(["foo"], ConditionSet::new(), Handler::First)
        .unwrap();
    let bar = router
        .register_patterns(["bar"], ConditionSet::new(), Handler::First)
        .unwrap();

    let mappings = router.mappings();
    assert_eq!(mappings.len(), 2);
    assert!(mappings.contains(&(foo, Handler::First)));
    assert!(mappings.contains(&(bar, Handler::First)));
}

#[test]
fn test_unregister_mapping() {
    let router = Router::new();
    let key = router
        .register_patterns(["/foo"], ConditionSet::new(), Handler::First)
        .unwrap();
    assert_eq!(router.unregister(&key), Some(Handler::First));

    assert!(matches!(
        router.route(&get("/foo")),
        Err(RouteError::NotFound { .. })
    ));
    assert!(router.mappings().is_empty());
}

#[test]
fn test_unregister_unknown_is_noop() {
    let router = Router::new();
    router
        .register_patterns(["/foo"], ConditionSet::new(), Handler::First)
        .unwrap();
    let other = router.mapping(["/bar"], ConditionSet::new()).unwrap();
    assert_eq!(router.unregister(&other), None);
    assert_eq!(router.len(), 1);
}

#[test]
fn test_reregister_after_unregister() {
    let router = Router::new();
    let key = router
        .register_patterns(["/foo"], ConditionSet::new(), Handler::First)
        .unwrap();
    router.unregister(&key);
    router
        .register_patterns(["/foo"], ConditionSet::new(), Handler::Second)
        .unwrap();
    assert_eq!(router.route(&get("/foo")).unwrap().handler, Handler::Second);
}

#[test]
fn test_name_does_not_distinguish_mappings() {
    let router = Router::new();
    router
        .register_patterns(["/foo"], ConditionSet::new().name("a"), Handler::First)
        .unwrap();
    let err = router
        .register_patterns(["/foo"], ConditionSet::new().name("b"), Handler::Second)
        .unwrap_err();
    assert!(matches!(err, RegistrationError::DuplicateMapping { .. }));
}
