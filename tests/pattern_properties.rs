#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Property checks for pattern matching and the specificity ordering.

use proptest::prelude::*;
use routematch::PathMatcher;
use std::cmp::Ordering;

const PATHS: &[&str] = &["/a/b", "/a/1", "/x", "/a/b/c.html", "/"];

fn segment() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("a"),
        Just("b"),
        Just("x"),
        Just("*"),
        Just("a*"),
        Just("?"),
        Just("{id}"),
        Just("{id:[0-9]+}"),
        Just("*.html"),
        Just("**"),
    ]
}

fn pattern() -> impl Strategy<Value = String> {
    prop::collection::vec(segment(), 0..4).prop_map(|segments| format!("/{}", segments.join("/")))
}

fn literal_path() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z0-9]{1,6}", 1..4).prop_map(|segments| format!("/{}", segments.join("/")))
}

proptest! {
    #[test]
    fn prop_comparator_is_antisymmetric(
        a in pattern(),
        b in pattern(),
        path in prop::sample::select(PATHS),
    ) {
        let matcher = PathMatcher::default();
        let cmp = matcher.comparator(path);
        prop_assert_eq!(cmp.compare(&a, &b), cmp.compare(&b, &a).reverse());
        prop_assert_eq!(cmp.compare(&a, &a), Ordering::Equal);
    }

    #[test]
    fn prop_comparator_is_transitive(
        a in pattern(),
        b in pattern(),
        c in pattern(),
        path in prop::sample::select(PATHS),
    ) {
        let matcher = PathMatcher::default();
        let cmp = matcher.comparator(path);
        let ab = cmp.compare(&a, &b);
        let bc = cmp.compare(&b, &c);
        let ac = cmp.compare(&a, &c);
        if ab != Ordering::Greater && bc != Ordering::Greater {
            prop_assert_ne!(ac, Ordering::Greater, "{} <= {} <= {} but not {} <= {}", a, b, c, a, c);
        }
        if ab == Ordering::Equal && bc == Ordering::Equal {
            prop_assert_eq!(ac, Ordering::Equal);
        }
    }

    #[test]
    fn prop_sort_puts_exact_path_first(
        mut patterns in prop::collection::vec(pattern(), 1..6),
        path in literal_path(),
    ) {
        let matcher = PathMatcher::default();
        patterns.push(path.clone());
        matcher.comparator(&path).sort(&mut patterns);
        prop_assert_eq!(&patterns[0], &path);
    }

    #[test]
    fn prop_literal_pattern_matches_itself(path in literal_path()) {
        let matcher = PathMatcher::default();
        prop_assert!(matcher.matches(&path, &path));
        prop_assert!(matcher.matches("/**", &path));
        let other = format!("{}/extra", path);
        prop_assert!(!matcher.matches(&path, &other));
    }

    #[test]
    fn prop_uri_variables_round_trip(
        first in "[a-z0-9]{1,8}",
        second in "[a-z0-9]{1,8}",
    ) {
        let matcher = PathMatcher::default();
        let path = format!("/hotels/{}/bookings/{}", first, second);
        let vars = matcher
            .extract_uri_template_variables("/hotels/{hotel}/bookings/{booking}", &path)
            .unwrap();
        prop_assert_eq!(vars.len(), 2);
        prop_assert_eq!(vars[0].0.as_ref(), "hotel");
        prop_assert_eq!(&vars[0].1, &first);
        prop_assert_eq!(vars[1].0.as_ref(), "booking");
        prop_assert_eq!(&vars[1].1, &second);
    }

    #[test]
    fn prop_combined_literals_match_joined_path(
        outer in literal_path(),
        inner in literal_path(),
    ) {
        let matcher = PathMatcher::default();
        let combined = matcher.combine(&outer, &inner).unwrap();
        let joined = format!("{}{}", outer, inner);
        prop_assert!(matcher.matches(&combined, &joined), "{} does not match {}", combined, joined);
    }
}
