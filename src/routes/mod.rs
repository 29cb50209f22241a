//! The static route table of the admin console.

mod filter;

use std::collections::BTreeMap;

pub use filter::{PassThrough, PermissionFilter, RouteFilter, RouteFilterKind};

use crate::error::RouteError;
use crate::models::{MatchedRoute, Permission, RouteMatch, RouteRecord, ViewRef};

#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<RouteRecord>,
}

impl Default for RouteTable {
    /// The console's routes: the authenticated shell at `/` with `Home`
    /// nested under it, plus the public login and registration pages.
    fn default() -> Self {
        Self::new(vec![
            RouteRecord::new("/", "Root", ViewRef::lazy("Root")).with_children(vec![
                RouteRecord::new("home", "Home", ViewRef::lazy("Home")),
            ]),
            RouteRecord::new("/login", "Login", ViewRef::lazy("Login")).public(),
            RouteRecord::new("/register", "Register", ViewRef::lazy("Register")).public(),
        ])
    }
}

impl RouteTable {
    pub fn new(routes: Vec<RouteRecord>) -> Self {
        Self { routes }
    }

    pub fn routes(&self) -> &[RouteRecord] {
        &self.routes
    }

    /// Update hook: the table as seen by a principal holding `permissions`.
    pub fn filtered(&self, filter: &dyn RouteFilter, permissions: &[Permission]) -> Vec<RouteRecord> {
        let routes = filter.filter(&self.routes, permissions);
        tracing::debug!(
            "Route filter {} kept {} of {} top-level routes",
            filter.kind(),
            routes.len(),
            self.routes.len()
        );
        routes
    }

    /// Find the route for `path`, preferring the deepest nested match.
    ///
    /// Views along the matched chain are resolved here, on first navigation.
    pub fn resolve(&self, path: &str) -> Result<RouteMatch, RouteError> {
        let normalized = normalize_path(path);
        let segments: Vec<&str> = normalized.split('/').filter(|s| !s.is_empty()).collect();

        let (chain, params) = find_chain(&self.routes, &[], &segments)
            .ok_or_else(|| RouteError::NotFound(normalized.clone()))?;

        let matched = chain
            .iter()
            .map(|record| MatchedRoute {
                path: record.path.clone(),
                name: record.name.clone(),
                component: record.view.resolve().component.clone(),
            })
            .collect();

        // find_chain never returns an empty chain
        let leaf = chain[chain.len() - 1];
        Ok(RouteMatch {
            path: normalized,
            name: leaf.name.clone(),
            matched,
            params,
            view: leaf.view.resolve().clone(),
        })
    }

    /// Find a route by its symbolic name anywhere in the table.
    pub fn find_by_name(&self, name: &str) -> Option<&RouteRecord> {
        fn go<'r>(routes: &'r [RouteRecord], name: &str) -> Option<&'r RouteRecord> {
            routes
                .iter()
                .find_map(|r| if r.name == name { Some(r) } else { go(&r.children, name) })
        }
        go(&self.routes, name)
    }
}

fn normalize_path(path: &str) -> String {
    let trimmed = path.split(['?', '#']).next().unwrap_or_default();
    let inner = trimmed.trim_matches('/');
    format!("/{}", inner)
}

type Chain<'r> = (Vec<&'r RouteRecord>, BTreeMap<String, String>);

fn find_chain<'r>(routes: &'r [RouteRecord], base: &[&'r str], segments: &[&str]) -> Option<Chain<'r>> {
    for record in routes {
        let pattern = full_pattern(base, &record.path);

        if let Some((mut chain, params)) = find_chain(&record.children, &pattern, segments) {
            chain.insert(0, record);
            return Some((chain, params));
        }

        if let Some(params) = match_segments(&pattern, segments) {
            return Some((vec![record], params));
        }
    }
    None
}

fn full_pattern<'r>(base: &[&'r str], path: &'r str) -> Vec<&'r str> {
    let mut pattern = if path.starts_with('/') {
        Vec::new()
    } else {
        base.to_vec()
    };
    pattern.extend(path.split('/').filter(|s| !s.is_empty()));
    pattern
}

fn match_segments(pattern: &[&str], segments: &[&str]) -> Option<BTreeMap<String, String>> {
    if pattern.len() != segments.len() {
        return None;
    }

    let mut params = BTreeMap::new();
    for (expected, actual) in pattern.iter().zip(segments) {
        match expected.strip_prefix(':') {
            Some(name) => {
                params.insert(name.to_string(), actual.to_string());
            }
            None if expected == actual => {}
            None => return None,
        }
    }
    Some(params)
}
