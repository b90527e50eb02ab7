use super::PathMatcher;
use crate::config::RouterConfig;
use crate::error::PatternError;
use std::sync::Arc;

fn assert_matches(matcher: &PathMatcher, cases: &[(&str, &str, bool)]) {
    for (pattern, path, expected) in cases {
        assert_eq!(
            matcher.matches(pattern, path),
            *expected,
            "pattern {:?} against path {:?}",
            pattern,
            path
        );
    }
}

fn vars(matcher: &PathMatcher, pattern: &str, path: &str) -> Vec<(String, String)> {
    matcher
        .extract_uri_template_variables(pattern, path)
        .unwrap()
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

fn pair(k: &str, v: &str) -> (String, String) {
    (k.to_string(), v.to_string())
}

#[test]
fn test_literal_patterns() {
    let m = PathMatcher::default();
    assert_matches(
        &m,
        &[
            ("test", "test", true),
            ("/test", "/test", true),
            ("/test.jpg", "test.jpg", false),
            ("test", "/test", false),
            ("/test", "test", false),
            ("", "", true),
        ],
    );
}

#[test]
fn test_question_mark() {
    let m = PathMatcher::default();
    assert_matches(
        &m,
        &[
            ("t?st", "test", true),
            ("??st", "test", true),
            ("tes?", "tes", false),
            ("tes?", "testt", false),
            ("/?", "/a", true),
            ("/?/a", "/a/a", true),
            ("/a/?", "/a/b", true),
            ("/??/a", "/aa/a", true),
            ("/a/??", "/a/bb", true),
            ("/????", "/bala/bla", false),
        ],
    );
}

#[test]
fn test_single_star() {
    let m = PathMatcher::default();
    assert_matches(
        &m,
        &[
            ("*", "test", true),
            ("test*", "test", true),
            ("test*", "testTest", true),
            ("test/*", "test/Test", true),
            ("test/*", "test/t", true),
            ("test/*", "test/", true),
            ("*test*", "AnothertestTest", true),
            ("*test", "Anothertest", true),
            ("*.*", "test.", true),
            ("*.*", "test.test.test", true),
            ("test*aaa", "testblaaaa", true),
            ("test*", "tst", false),
            ("test*", "test/", false),
            ("test*", "test/t", false),
            ("test/*", "test", false),
            ("*test*", "tsttst", false),
            ("*.*", "tsttst", false),
            ("test*aaa", "test", false),
            ("test*aaa", "testblaaab", false),
        ],
    );
}

#[test]
fn test_double_star() {
    let m = PathMatcher::default();
    assert_matches(
        &m,
        &[
            ("/**", "/testing/testing", true),
            ("/*/**", "/testing/testing", true),
            ("/**/*", "/testing/testing", true),
            ("/bla/**/bla", "/bla/testing/testing/bla", true),
            ("/bla/**/bla", "/bla/testing/testing/bla/bla", true),
            ("/**/test", "/bla/bla/test", true),
            ("/bla/**/**/bla", "/bla/bla/bla/bla/bla/bla", true),
            ("/bla*bla/test", "/blaXXXbla/test", true),
            ("/*bla/test", "/XXXbla/test", true),
            ("/bla*bla/test", "/blaXXXbl/test", false),
            ("/*bla/test", "XXXblab/test", false),
            ("/*bla/test", "XXXbl/test", false),
            ("/**/*bla", "/bla/bla/bla/bbb", false),
            ("/x/x/**/bla", "/x/x/x/", false),
            ("/foo/bar/**", "/foo/bar", true),
        ],
    );
}

#[test]
fn test_double_star_with_globs_in_between() {
    let m = PathMatcher::default();
    assert_matches(
        &m,
        &[
            (
                "/*bla*/**/bla/**",
                "/XXXblaXXXX/testing/testing/bla/testing/testing/",
                true,
            ),
            (
                "/*bla*/**/bla/*",
                "/XXXblaXXXX/testing/testing/bla/testing",
                true,
            ),
            (
                "/*bla*/**/bla/**",
                "/XXXblaXXXX/testing/testing/bla/testing/testing.jpg",
                true,
            ),
            (
                "*bla*/**/bla/**",
                "XXXblaXXXX/testing/testing/bla/testing/testing/",
                true,
            ),
            (
                "*bla*/**/bla/*",
                "XXXblaXXXX/testing/testing/bla/testing/testing",
                false,
            ),
        ],
    );
}

#[test]
fn test_variable_matching() {
    let m = PathMatcher::default();
    assert_matches(
        &m,
        &[
            ("/{bla}.*", "/testing.html", true),
            ("/{bla}", "//x\ny", true),
            ("/users/{id:\\d+}", "/users/42", true),
            ("/users/{id:\\d+}", "/users/abc", false),
        ],
    );
}

#[test]
fn test_invalid_pattern_never_matches() {
    let m = PathMatcher::default();
    assert!(!m.matches("/users/{id", "/users/{id"));
    assert!(matches!(
        m.compile("/users/{id"),
        Err(PatternError::InvalidPattern { .. })
    ));
}

#[test]
fn test_extract_uri_template_variables() {
    let m = PathMatcher::default();
    assert_eq!(vars(&m, "/hotels/{hotel}", "/hotels/1"), vec![pair("hotel", "1")]);
    assert_eq!(vars(&m, "/h?tels/{hotel}", "/hotels/1"), vec![pair("hotel", "1")]);
    assert_eq!(
        vars(&m, "/hotels/{hotel}/bookings/{booking}", "/hotels/1/bookings/2"),
        vec![pair("hotel", "1"), pair("booking", "2")]
    );
    assert_eq!(vars(&m, "/**/hotels/**/{hotel}", "/foo/hotels/bar/1"), vec![pair("hotel", "1")]);
    assert_eq!(vars(&m, "/{page}.html", "/42.html"), vec![pair("page", "42")]);
    assert_eq!(vars(&m, "/{page}.*", "/42.html"), vec![pair("page", "42")]);
    assert_eq!(vars(&m, "/A-{B}-C", "/A-b-C"), vec![pair("B", "b")]);
    assert_eq!(
        vars(&m, "/{name}.{extension}", "/test.html"),
        vec![pair("name", "test"), pair("extension", "html")]
    );
    assert!(vars(&m, "/hotels", "/hotels").is_empty());
}

#[test]
fn test_extract_with_constraints() {
    let m = PathMatcher::default();
    assert_eq!(
        vars(
            &m,
            "{symbolicName:[\\w\\.]+}-{version:[\\w\\.]+}.jar",
            "com.example-1.0.0.jar"
        ),
        vec![pair("symbolicName", "com.example"), pair("version", "1.0.0")]
    );
}

#[test]
fn test_extract_on_mismatch_fails() {
    let m = PathMatcher::default();
    let err = m
        .extract_uri_template_variables("/hotels/{hotel}", "/bookings/1")
        .unwrap_err();
    assert!(matches!(err, PatternError::NoMatch { .. }));
}

#[test]
fn test_combine() {
    let m = PathMatcher::default();
    let cases = [
        ("", "", ""),
        ("/hotels", "", "/hotels"),
        ("", "/hotels", "/hotels"),
        ("/hotels/*", "booking", "/hotels/booking"),
        ("/hotels/*", "/booking", "/hotels/booking"),
        ("/hotels/**", "booking", "/hotels/**/booking"),
        ("/hotels/**", "/booking", "/hotels/**/booking"),
        ("/hotels", "/booking", "/hotels/booking"),
        ("/hotels", "booking", "/hotels/booking"),
        ("/hotels/", "booking", "/hotels/booking"),
        ("/hotels/*", "{hotel}", "/hotels/{hotel}"),
        ("/hotels/**", "{hotel}", "/hotels/**/{hotel}"),
        ("/hotels", "{hotel}", "/hotels/{hotel}"),
        ("/hotels", "{hotel}.*", "/hotels/{hotel}.*"),
        ("/hotels/*/booking", "{booking}", "/hotels/*/booking/{booking}"),
        ("/*.html", "/hotel.html", "/hotel.html"),
        ("/*.html", "/hotel", "/hotel.html"),
        ("/*.html", "/hotel.*", "/hotel.html"),
        ("/**", "/*.html", "/*.html"),
        ("/*", "/*.html", "/*.html"),
        ("/*.*", "/*.html", "/*.html"),
        ("/{foo}", "/bar", "/{foo}/bar"),
        ("/user", "/user", "/user/user"),
        ("/{foo:.*[^0-9].*}", "/edit/", "/{foo:.*[^0-9].*}/edit/"),
        ("/1.0", "/foo/test", "/1.0/foo/test"),
        ("/", "/hotel", "/hotel"),
        ("/hotel/", "/booking", "/hotel/booking"),
    ];
    for (p1, p2, expected) in cases {
        assert_eq!(m.combine(p1, p2).unwrap(), expected, "combine({:?}, {:?})", p1, p2);
    }
}

#[test]
fn test_combine_incompatible_extensions() {
    let m = PathMatcher::default();
    let err = m.combine("/*.html", "/*.txt").unwrap_err();
    assert!(matches!(err, PatternError::IncompatibleCombine { .. }));
}

#[test]
fn test_case_insensitive_matcher() {
    let m = PathMatcher::new(RouterConfig::default().with_case_sensitive(false));
    assert!(m.matches("/group/{groupName}/members", "/Group/sales/Members"));
    assert!(m.matches("/Group/*", "/group/sales"));
    assert!(!PathMatcher::default().matches("/group/{groupName}/members", "/Group/sales/Members"));
}

#[test]
fn test_is_pattern() {
    let m = PathMatcher::default();
    assert!(m.is_pattern("/users/*"));
    assert!(m.is_pattern("/users/{id}"));
    assert!(m.is_pattern("/us?rs"));
    assert!(!m.is_pattern("/users"));
}

#[test]
fn test_compiled_pattern_is_cached() {
    let m = PathMatcher::default();
    let a = m.compile("/users/{id}").unwrap();
    let b = m.compile("/users/{id}").unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(m.cached_patterns(), 1);
}

#[test]
fn test_cache_turns_off_at_limit() {
    let config = RouterConfig {
        cache_limit: 2,
        ..RouterConfig::default()
    };
    let m = PathMatcher::new(config);
    m.compile("/a").unwrap();
    m.compile("/b").unwrap();
    assert_eq!(m.cached_patterns(), 2);

    m.compile("/c").unwrap();
    assert_eq!(m.cached_patterns(), 0);

    // Stays off: later compilations are not stored
    m.compile("/d").unwrap();
    assert_eq!(m.cached_patterns(), 0);
    assert!(m.matches("/a", "/a"));
}

#[test]
fn test_cache_disabled_by_config() {
    let config = RouterConfig {
        cache_patterns: false,
        ..RouterConfig::default()
    };
    let m = PathMatcher::new(config);
    let a = m.compile("/users").unwrap();
    let b = m.compile("/users").unwrap();
    assert!(!Arc::ptr_eq(&a, &b));
    assert_eq!(m.cached_patterns(), 0);
}

#[test]
fn test_comparator_from_matcher() {
    let m = PathMatcher::default();
    let cmp = m.comparator("/foo");
    let mut patterns = vec!["/f*", "/**", "/fo*", "/foo"];
    cmp.sort(&mut patterns);
    assert_eq!(patterns, vec!["/foo", "/fo*", "/f*", "/**"]);
}
