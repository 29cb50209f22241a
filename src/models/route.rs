use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// A declarative route: a URL path pattern mapped to a view, with optional
/// nested children.
///
/// Child paths without a leading `/` are relative to the parent path.
/// Segments of the form `:name` capture a parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRecord {
    pub path: String,
    pub name: String,
    pub view: ViewRef,
    /// Reachable without any permission (login, registration).
    #[serde(default)]
    pub public: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RouteRecord>,
}

impl RouteRecord {
    pub fn new(path: impl Into<String>, name: impl Into<String>, view: ViewRef) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            view,
            public: false,
            children: Vec::new(),
        }
    }

    pub fn public(mut self) -> Self {
        self.public = true;
        self
    }

    pub fn with_children(mut self, children: Vec<RouteRecord>) -> Self {
        self.children = children;
        self
    }
}

/// Reference to the view a route renders.
///
/// Only the component name is known up front. The bundle location is
/// computed the first time the route is navigated to and cached from then on.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewRef {
    pub component: String,
    #[serde(skip)]
    resolved: OnceLock<ResolvedView>,
}

impl PartialEq for ViewRef {
    fn eq(&self, other: &Self) -> bool {
        self.component == other.component
    }
}

impl ViewRef {
    pub fn lazy(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            resolved: OnceLock::new(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.get().is_some()
    }

    pub fn resolve(&self) -> &ResolvedView {
        self.resolved.get_or_init(|| {
            tracing::debug!(component = %self.component, "Resolving view");
            ResolvedView {
                component: self.component.clone(),
                chunk: format!("/assets/views/{}.js", self.component),
            }
        })
    }
}

/// A view after lazy resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedView {
    pub component: String,
    /// Location of the code chunk that renders the view.
    pub chunk: String,
}

/// An authorization record from the server-side permission check.
///
/// Only `route_name` is interpreted; any other fields are carried through
/// untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    pub route_name: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Permission {
    pub fn for_route(route_name: impl Into<String>) -> Self {
        Self {
            route_name: route_name.into(),
            extra: serde_json::Map::new(),
        }
    }
}

/// A single record in a match chain, without its children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedRoute {
    pub path: String,
    pub name: String,
    pub component: String,
}

/// The outcome of resolving a path against the route table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteMatch {
    /// Normalized request path.
    pub path: String,
    /// Name of the deepest matched route.
    pub name: String,
    /// Matched records from the outermost route down to the leaf.
    pub matched: Vec<MatchedRoute>,
    pub params: BTreeMap<String, String>,
    pub view: ResolvedView,
}

impl RouteMatch {
    /// Names along the match chain, outermost first.
    pub fn chain(&self) -> Vec<&str> {
        self.matched.iter().map(|m| m.name.as_str()).collect()
    }
}
