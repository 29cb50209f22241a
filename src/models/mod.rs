//! Domain models for the admin console navigation.
//!
//! - [`MenuEntry`]: one node of the navigation menu tree. Containment through
//!   `children` is the ownership relation; `parent_menu_id` is a redundant
//!   back-link kept consistent by [`validate_tree`].
//! - [`RouteRecord`]: a declarative route mapping a path to a lazily resolved
//!   [`ViewRef`], with nested children.
//! - [`Permission`]: an opaque authorization record consumed by route filters.

mod menu;
mod route;

pub use menu::*;
pub use route::*;
