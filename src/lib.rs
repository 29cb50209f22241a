//! Navigation backend for the job administration console.
//!
//! - [`models`]: menu tree and route records.
//! - [`menu`]: the menu store and its sources.
//! - [`routes`]: the static route table and permission filters.
//! - [`app`]: bootstrap wiring the above from [`config`].
//! - [`api`]: the JSON HTTP surface.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod menu;
pub mod models;
pub mod routes;
