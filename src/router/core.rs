//! Router core: registration under a write lock, resolution under a read
//! lock, and the no-match refinement.

use http::Method;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use crate::condition::{RequestCondition, DEFAULT_CONTENT_TYPE};
use crate::config::RouterConfig;
use crate::error::{PatternError, RegistrationError, RouteError};
use crate::mapping::{ConditionSet, MappingInfo, MappingRegistry, Registration};
use crate::pattern::{PathMatcher, UriVariables};
use crate::request::Request;

/// Resolution slower than this is logged as a warning.
const SLOW_MATCH_THRESHOLD: Duration = Duration::from_millis(1);

/// Result of successfully routing a request.
#[derive(Debug, Clone)]
pub struct RouteMatch<H> {
    /// Handler registered for the winning mapping
    pub handler: H,
    /// The winning mapping narrowed to the request (matched patterns,
    /// matched method, ...)
    pub mapping: MappingInfo,
    /// The winning mapping as registered; pass it to
    /// [`Router::unregister`] to remove the registration
    pub registered: MappingInfo,
    /// Closest matching pattern, in the variant that matched (`/users.*`,
    /// `/users/`)
    pub best_pattern: String,
    /// URI template variables captured by `best_pattern`
    pub uri_variables: UriVariables,
}

impl<H> RouteMatch<H> {
    /// Get a URI variable by name.
    ///
    /// Uses "last write wins" semantics if the same name were captured more
    /// than once.
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.uri_variables
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Convert uri_variables to HashMap
    /// Note: This allocates - use get_path_param() in hot paths instead
    #[must_use]
    pub fn uri_variables_map(&self) -> HashMap<String, String> {
        self.uri_variables
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }
}

/// A pair of registrations that tie for a request they both accept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmbiguousMapping {
    pub method: Method,
    pub path: String,
    pub first: String,
    pub second: String,
}

impl fmt::Display for AmbiguousMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {} and {}",
            self.method, self.path, self.first, self.second
        )
    }
}

struct Candidate<'a, H> {
    matched: MappingInfo,
    registration: &'a Registration<H>,
}

/// Maps requests to the single most specific registered handler.
///
/// `H` is whatever the caller wants back: a handler name, an
/// `Arc<dyn Fn ..>`, a channel sender. Clones of a `Router` share the same
/// registry, so registrations made through one clone are visible to all.
///
/// # Concurrency
///
/// Routing takes a read lock; `register` and `unregister` take the write
/// lock. A lock poisoned by a panicking thread is recovered since every
/// registry mutation completes before it becomes visible.
pub struct Router<H> {
    registry: Arc<RwLock<MappingRegistry<H>>>,
    matcher: Arc<PathMatcher>,
}

impl<H> Clone for Router<H> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            matcher: Arc::clone(&self.matcher),
        }
    }
}

impl<H> Default for Router<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> fmt::Debug for Router<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("registrations", &self.len())
            .field("config", self.matcher.config())
            .finish()
    }
}

impl<H> Router<H> {
    /// Router with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RouterConfig::default())
    }

    /// Router with explicit matching flags.
    #[must_use]
    pub fn with_config(config: RouterConfig) -> Self {
        Self::with_matcher(Arc::new(PathMatcher::new(config)))
    }

    /// Router sharing an existing matcher (and its pattern cache).
    #[must_use]
    pub fn with_matcher(matcher: Arc<PathMatcher>) -> Self {
        debug!(config = ?matcher.config(), "Router created");
        Self {
            registry: Arc::new(RwLock::new(MappingRegistry::new())),
            matcher,
        }
    }

    /// The matcher used by this router's pattern conditions.
    #[must_use]
    pub fn matcher(&self) -> &Arc<PathMatcher> {
        &self.matcher
    }

    /// Build a [`MappingInfo`] bound to this router's matcher.
    pub fn mapping<I, S>(
        &self,
        patterns: I,
        conditions: ConditionSet,
    ) -> Result<MappingInfo, PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        conditions.build(patterns, &self.matcher)
    }

    /// Register `mapping → handler`. Any second registration of an equal
    /// mapping fails with [`RegistrationError::DuplicateMapping`], even
    /// with the same handler.
    pub fn register(&self, mapping: MappingInfo, handler: H) -> Result<MappingInfo, RegistrationError> {
        let mut registry = self.write();
        if let Err(err) = registry.register(mapping.clone(), handler) {
            warn!(mapping = %mapping, error = %err, "Registration rejected");
            return Err(err);
        }
        Ok(mapping)
    }

    /// Compile `patterns` with `conditions` and register the result.
    ///
    /// Returns the key to pass to [`Router::unregister`].
    pub fn register_patterns<I, S>(
        &self,
        patterns: I,
        conditions: ConditionSet,
        handler: H,
    ) -> Result<MappingInfo, RegistrationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mapping = self.mapping(patterns, conditions)?;
        self.register(mapping, handler)
    }

    /// Remove a registration. Unknown mappings are ignored.
    pub fn unregister(&self, mapping: &MappingInfo) -> Option<H> {
        self.write().unregister(mapping)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Print all registered mappings to stdout
    ///
    /// Useful for debugging and verifying that mappings are registered
    /// correctly.
    pub fn dump_routes(&self) {
        let registry = self.read();
        println!("[routes] count={}", registry.len());
        for registration in registry.iter() {
            println!(
                "[route] {} direct={:?}",
                registration.mapping(),
                registration.direct_paths()
            );
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, MappingRegistry<H>> {
        self.registry.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, MappingRegistry<H>> {
        self.registry.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<H: Clone> Router<H> {
    /// Snapshot of every `(mapping, handler)` pair, in registration order.
    #[must_use]
    pub fn mappings(&self) -> Vec<(MappingInfo, H)> {
        self.read().mappings()
    }

    /// Resolve `request` to exactly one handler.
    ///
    /// 1. registrations indexed under the exact lookup path are tried; if
    ///    none applies, every registration is evaluated
    /// 2. applicable registrations are ranked by patterns, params, headers,
    ///    consumes, then methods
    /// 3. a tie between the top two is [`RouteError::Ambiguous`]
    ///
    /// When nothing applies, the error names the closest miss:
    /// [`RouteError::MethodNotAllowed`], [`RouteError::UnsupportedMediaType`],
    /// [`RouteError::UnsatisfiedParams`] or [`RouteError::NotFound`].
    pub fn route(&self, request: &Request) -> Result<RouteMatch<H>, RouteError> {
        let lookup_path = request.lookup_path();
        debug!(
            method = %request.method(),
            path = %lookup_path,
            "Route match attempt"
        );

        let match_start = Instant::now();
        let result = {
            let registry = self.read();
            self.resolve(&registry, request)
        };
        let match_duration = match_start.elapsed();

        match &result {
            Ok(found) if match_duration > SLOW_MATCH_THRESHOLD => warn!(
                method = %request.method(),
                path = %lookup_path,
                mapping = %found.registered,
                best_pattern = %found.best_pattern,
                uri_variables = ?found.uri_variables,
                duration_us = match_duration.as_micros(),
                "Slow route matching detected"
            ),
            Ok(found) => info!(
                method = %request.method(),
                path = %lookup_path,
                mapping = %found.registered,
                best_pattern = %found.best_pattern,
                uri_variables = ?found.uri_variables,
                duration_us = match_duration.as_micros(),
                "Route matched"
            ),
            Err(err @ RouteError::Ambiguous { .. }) => error!(
                method = %request.method(),
                path = %lookup_path,
                error = %err,
                "Ambiguous handler methods"
            ),
            Err(err) => warn!(
                method = %request.method(),
                path = %lookup_path,
                status = err.status_code().as_u16(),
                duration_us = match_duration.as_micros(),
                "No route matched"
            ),
        }
        result
    }

    /// Look for mappings that tie for a request one of them accepts.
    ///
    /// For every registration with literal patterns, a request is built per
    /// literal path and declared method and routed; each tie found is
    /// reported once. Registrations made only of wildcard patterns are not
    /// probed.
    #[must_use]
    pub fn check_consistency(&self) -> Vec<AmbiguousMapping> {
        let registry = self.read();
        let mut found: Vec<AmbiguousMapping> = Vec::new();
        for registration in registry.iter() {
            for request in registration.mapping().representative_requests() {
                let Err(RouteError::Ambiguous { path, first, second }) =
                    self.resolve(&registry, &request)
                else {
                    continue;
                };
                let method = request.method().clone();
                let seen = found.iter().any(|a| {
                    a.method == method
                        && a.path == path
                        && ((a.first == first && a.second == second)
                            || (a.first == second && a.second == first))
                });
                if !seen {
                    found.push(AmbiguousMapping {
                        method,
                        path,
                        first,
                        second,
                    });
                }
            }
        }
        if found.is_empty() {
            info!(mappings = registry.len(), "No ambiguous mappings");
        } else {
            for ambiguous in &found {
                warn!(ambiguous = %ambiguous, "Ambiguous mapping");
            }
        }
        found
    }

    fn resolve(
        &self,
        registry: &MappingRegistry<H>,
        request: &Request,
    ) -> Result<RouteMatch<H>, RouteError> {
        let lookup_path = request.lookup_path();

        let mut matches = collect_matching(registry.mappings_by_direct_path(lookup_path), request);
        if matches.is_empty() {
            matches = collect_matching(registry.iter(), request);
        }
        if matches.is_empty() {
            return Err(no_match(registry, request));
        }

        if matches.len() > 1 {
            matches.sort_by(|a, b| a.matched.compare_to(&b.matched, request));
            let (best, second) = (&matches[0], &matches[1]);
            if best.matched.compare_to(&second.matched, request) == Ordering::Equal {
                return Err(RouteError::Ambiguous {
                    path: lookup_path.to_string(),
                    first: best.registration.mapping().to_string(),
                    second: second.registration.mapping().to_string(),
                });
            }
        }

        let best = &matches[0];
        let best_pattern = best
            .matched
            .patterns()
            .patterns()
            .first()
            .cloned()
            .unwrap_or_default();
        let uri_variables = if best_pattern.is_empty() {
            UriVariables::new()
        } else {
            self.matcher
                .extract_uri_template_variables(&best_pattern, lookup_path)
                .unwrap_or_else(|err| {
                    debug!(error = %err, "No URI variables extracted");
                    UriVariables::new()
                })
        };

        Ok(RouteMatch {
            handler: best.registration.handler().clone(),
            mapping: best.matched.clone(),
            registered: best.registration.mapping().clone(),
            best_pattern,
            uri_variables,
        })
    }
}

fn collect_matching<'a, H, I>(registrations: I, request: &Request) -> Vec<Candidate<'a, H>>
where
    I: Iterator<Item = &'a Registration<H>>,
    H: 'a,
{
    registrations
        .filter_map(|registration| {
            registration
                .mapping()
                .get_matching_condition(request)
                .map(|matched| Candidate {
                    matched,
                    registration,
                })
        })
        .collect()
}

/// Work out which condition ruled out the registrations whose patterns
/// matched, checking methods, then consumes, then params and headers.
fn no_match<H>(registry: &MappingRegistry<H>, request: &Request) -> RouteError {
    let lookup_path = request.lookup_path();
    let by_pattern: Vec<&MappingInfo> = registry
        .iter()
        .map(Registration::mapping)
        .filter(|m| m.patterns().get_matching_condition(request).is_some())
        .collect();
    if by_pattern.is_empty() {
        return RouteError::NotFound {
            path: lookup_path.to_string(),
        };
    }

    let by_method: Vec<&MappingInfo> = by_pattern
        .iter()
        .copied()
        .filter(|m| m.methods().get_matching_condition(request).is_some())
        .collect();
    if by_method.is_empty() {
        let mut allowed: Vec<Method> = Vec::new();
        for method in by_pattern.iter().flat_map(|m| m.methods().methods()) {
            if !allowed.contains(method) {
                allowed.push(method.clone());
            }
        }
        return RouteError::MethodNotAllowed {
            method: request.method().clone(),
            allowed,
        };
    }

    let by_consumes: Vec<&MappingInfo> = by_method
        .iter()
        .copied()
        .filter(|m| m.consumes().get_matching_condition(request).is_some())
        .collect();
    if by_consumes.is_empty() {
        let mut supported: Vec<String> = Vec::new();
        for media_type in by_method
            .iter()
            .flat_map(|m| m.consumes().consumable_media_types())
        {
            if !supported.contains(&media_type) {
                supported.push(media_type);
            }
        }
        return RouteError::UnsupportedMediaType {
            content_type: request
                .content_type()
                .unwrap_or(DEFAULT_CONTENT_TYPE)
                .to_string(),
            supported,
        };
    }

    let conditions: Vec<String> = by_consumes
        .iter()
        .filter_map(|m| {
            let mut parts = Vec::new();
            if !m.params().is_empty() {
                parts.push(format!("params {}", m.params()));
            }
            if !m.headers().is_empty() {
                parts.push(format!("headers {}", m.headers()));
            }
            (!parts.is_empty()).then(|| parts.join(", "))
        })
        .collect();
    if conditions.is_empty() {
        return RouteError::NotFound {
            path: lookup_path.to_string(),
        };
    }
    RouteError::UnsatisfiedParams { conditions }
}
