use criterion::{criterion_group, criterion_main, Criterion};
use http::Method;
use routematch::{ConditionSet, PathMatcher, Request, Router};
use std::hint::black_box;

const ROUTES: &[(&str, &str, &str)] = &[
    ("GET", "/", "root_handler"),
    ("GET", "/zoo/animals", "get_animals"),
    ("POST", "/zoo/animals", "create_animal"),
    ("GET", "/zoo/animals/{id}", "get_animal"),
    ("PUT", "/zoo/animals/{id}", "update_animal"),
    ("PATCH", "/zoo/animals/{id}", "patch_animal"),
    ("DELETE", "/zoo/animals/{id}", "delete_animal"),
    ("GET", "/zoo/animals/{id}/toys/{toy_id}", "animal_toy"),
    (
        "GET",
        "/zoo/{category}/animals/{id}/habitats/{habitat_id}/sections/{section_id}",
        "habitat_section",
    ),
    (
        "POST",
        "/inventory/{warehouse_id}/feeds/{feed_id}/items/{item_id}/batches/{batch_id}",
        "post_item_batch",
    ),
    ("GET", "/complex/{a}/{b}/{c}/{d}/{e}/{f}/{g}/{h}/{i}", "complex_many_params"),
    ("HEAD", "/zoo/health", "health_check"),
    ("OPTIONS", "/zoo/health", "supported_ops"),
    ("GET", "/static/**", "static_files"),
    ("GET", "/static/*.css", "stylesheets"),
];

fn zoo_router() -> Router<&'static str> {
    let router = Router::new();
    for (method, pattern, handler) in ROUTES {
        let method: Method = method.parse().expect("valid method");
        router
            .register_patterns([*pattern], ConditionSet::new().methods([method]), *handler)
            .expect("valid route");
    }
    router
}

fn bench_route_throughput(c: &mut Criterion) {
    let router = zoo_router();
    let requests = [
        Request::new(Method::GET, "/zoo/animals"),
        Request::new(Method::GET, "/zoo/animals/123"),
        Request::new(Method::GET, "/zoo/animals/123/toys/456"),
        Request::new(Method::GET, "/zoo/cats/animals/123/habitats/88/sections/5"),
        Request::new(Method::POST, "/inventory/1/feeds/2/items/3/batches/4"),
        Request::new(Method::GET, "/complex/1/2/3/4/5/6/7/8/9"),
        Request::new(Method::GET, "/static/site.css"),
    ];
    c.bench_function("route_match", |b| {
        b.iter(|| {
            for request in &requests {
                let res = router.route(request);
                black_box(&res);
            }
        })
    });
}

fn bench_not_found(c: &mut Criterion) {
    let router = zoo_router();
    let request = Request::new(Method::GET, "/nowhere/to/be/found");
    c.bench_function("route_not_found", |b| {
        b.iter(|| black_box(router.route(&request)))
    });
}

fn bench_pattern_match(c: &mut Criterion) {
    let matcher = PathMatcher::default();
    c.bench_function("pattern_match_double_wildcard", |b| {
        b.iter(|| {
            black_box(matcher.matches(
                black_box("/static/**/img/*.png"),
                black_box("/static/a/b/c/img/logo.png"),
            ))
        })
    });
    c.bench_function("extract_uri_variables", |b| {
        b.iter(|| {
            black_box(matcher.extract_uri_template_variables(
                black_box("/hotels/{hotel}/bookings/{booking}"),
                black_box("/hotels/42/bookings/7"),
            ))
        })
    });
}

criterion_group!(benches, bench_route_throughput, bench_not_found, bench_pattern_match);
criterion_main!(benches);
