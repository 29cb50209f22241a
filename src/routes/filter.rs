//! Permission-driven reshaping of the route table.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::models::{Permission, RouteRecord};

/// Computes the part of the route table a principal may navigate, given the
/// permission records returned by the server-side authorization check.
pub trait RouteFilter: Send + Sync + fmt::Debug {
    fn filter(&self, routes: &[RouteRecord], permissions: &[Permission]) -> Vec<RouteRecord>;

    fn kind(&self) -> RouteFilterKind;
}

/// Returns the full table regardless of permissions.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl RouteFilter for PassThrough {
    fn filter(&self, routes: &[RouteRecord], _permissions: &[Permission]) -> Vec<RouteRecord> {
        routes.to_vec()
    }

    fn kind(&self) -> RouteFilterKind {
        RouteFilterKind::PassThrough
    }
}

/// Keeps public routes, routes named by a permission, and every ancestor of
/// a kept route. A permitted parent does not grant its children.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissionFilter;

impl PermissionFilter {
    fn keep(record: &RouteRecord, allowed: &HashSet<&str>) -> Option<RouteRecord> {
        let children: Vec<RouteRecord> = record
            .children
            .iter()
            .filter_map(|child| Self::keep(child, allowed))
            .collect();

        if record.public || allowed.contains(record.name.as_str()) || !children.is_empty() {
            Some(RouteRecord {
                path: record.path.clone(),
                name: record.name.clone(),
                view: record.view.clone(),
                public: record.public,
                children,
            })
        } else {
            None
        }
    }
}

impl RouteFilter for PermissionFilter {
    fn filter(&self, routes: &[RouteRecord], permissions: &[Permission]) -> Vec<RouteRecord> {
        let allowed: HashSet<&str> = permissions.iter().map(|p| p.route_name.as_str()).collect();
        routes
            .iter()
            .filter_map(|record| Self::keep(record, &allowed))
            .collect()
    }

    fn kind(&self) -> RouteFilterKind {
        RouteFilterKind::Permission
    }
}

/// Configuration switch selecting the active [`RouteFilter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RouteFilterKind {
    #[default]
    PassThrough,
    Permission,
}

impl RouteFilterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PassThrough => "pass-through",
            Self::Permission => "permission",
        }
    }

    pub fn build(self) -> Arc<dyn RouteFilter> {
        match self {
            Self::PassThrough => Arc::new(PassThrough),
            Self::Permission => Arc::new(PermissionFilter),
        }
    }
}

impl FromStr for RouteFilterKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pass-through" => Ok(Self::PassThrough),
            "permission" => Ok(Self::Permission),
            other => Err(format!("unknown route filter '{}'", other)),
        }
    }
}

impl fmt::Display for RouteFilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
