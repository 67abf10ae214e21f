//! Router core: ordered first-match resolution over registered matchers.

use super::{Matcher, Route};
use std::sync::Arc;
use tracing::{debug, info};

/// Ordered collection of [`Matcher`]s.
///
/// Matchers are tried in registration order and the first one that accepts
/// the uri decides the route. Once the application is built the router is
/// frozen behind an `Arc` and only read from request threads.
#[derive(Debug, Clone, Default)]
pub struct Router {
    matchers: Vec<Matcher>,
}

impl Router {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a matcher. Duplicates are allowed; only the first can ever win.
    pub fn add_matcher(&mut self, matcher: Matcher) -> &mut Self {
        debug!(pattern = %matcher.pattern(), position = self.matchers.len(), "Matcher registered");
        self.matchers.push(matcher);
        self
    }

    /// Owned variant of [`add_matcher`](Self::add_matcher) for builder chains.
    #[must_use]
    pub fn with_matcher(mut self, matcher: Matcher) -> Self {
        self.add_matcher(matcher);
        self
    }

    /// Resolve `uri` to a route.
    ///
    /// Returns the result of the first matcher that accepts the uri. Later
    /// matchers are not evaluated. An empty router never matches.
    #[must_use]
    pub fn get_route(&self, uri: &str) -> Option<Route> {
        let found = self
            .matchers
            .iter()
            .enumerate()
            .find_map(|(index, matcher)| matcher.match_uri(uri).map(|route| (index, route)));

        match found {
            Some((index, route)) => {
                debug!(
                    uri = %uri,
                    pattern = %self.matchers[index].pattern(),
                    route = %route,
                    "Route matched"
                );
                Some(route)
            }
            None => {
                debug!(uri = %uri, matchers = self.matchers.len(), "No route matched");
                None
            }
        }
    }

    #[must_use]
    pub fn matchers(&self) -> &[Matcher] {
        &self.matchers
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    /// Move the router behind a shared read-only handle.
    #[must_use]
    pub fn freeze(self) -> Arc<Router> {
        info!(matchers_count = self.matchers.len(), "Router frozen");
        Arc::new(self)
    }
}
