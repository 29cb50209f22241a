use std::time::Duration;

use thiserror::Error;

use crate::models::MenuViolation;

/// Failure to obtain a menu tree from its source.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("menu source unreachable: {0}")]
    Unreachable(String),

    #[error("menu source did not answer within {0:?}")]
    Timeout(Duration),

    #[error("menu source returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("menu source returned undecodable data: {0}")]
    Decode(String),
}

/// Errors surfaced by [`MenuStore::load_menus`](crate::menu::MenuStore::load_menus).
///
/// Every variant leaves the store state untouched.
#[derive(Debug, Error)]
pub enum MenuError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("menu data is malformed: {}", join_violations(.0))]
    MalformedData(Vec<MenuViolation>),

    #[error("menu load was superseded by a newer request")]
    Superseded,
}

fn join_violations(violations: &[MenuViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("no route matches path '{0}'")]
    NotFound(String),
}
