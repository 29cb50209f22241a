use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::app::App;
use crate::error::{FetchError, MenuError, RouteError};
use crate::menu::MenuStatus;
use crate::models::*;

// ============================================================
// Error Handling
// ============================================================

/// Map a menu load failure to a response. Source faults are logged as errors,
/// rejected data and lost races as warnings.
fn menu_error(e: MenuError) -> (StatusCode, String) {
    let status = match &e {
        MenuError::Fetch(FetchError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
        MenuError::Fetch(_) => StatusCode::BAD_GATEWAY,
        MenuError::MalformedData(_) => StatusCode::UNPROCESSABLE_ENTITY,
        MenuError::Superseded => StatusCode::CONFLICT,
    };

    if status.is_server_error() {
        tracing::error!("Menu load failed: {}", e);
    } else {
        tracing::warn!("Menu load rejected: {}", e);
    }
    (status, e.to_string())
}

fn route_error(e: RouteError) -> (StatusCode, String) {
    match e {
        RouteError::NotFound(_) => (StatusCode::NOT_FOUND, e.to_string()),
    }
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Menus
// ============================================================

pub async fn get_menus(State(app): State<App>) -> Json<Vec<MenuEntry>> {
    Json(app.menus.state().to_vec())
}

pub async fn set_menus(
    State(app): State<App>,
    Json(menus): Json<Vec<MenuEntry>>,
) -> StatusCode {
    app.menus.set_menus(menus);
    StatusCode::NO_CONTENT
}

pub async fn load_menus(
    State(app): State<App>,
) -> Result<Json<Vec<MenuEntry>>, (StatusCode, String)> {
    app.menus
        .load_menus()
        .await
        .map(|menus| Json(menus.to_vec()))
        .map_err(menu_error)
}

pub async fn get_menu_status(State(app): State<App>) -> Json<MenuStatus> {
    Json(app.menus.status())
}

pub async fn get_menu_entry(
    State(app): State<App>,
    Path(id): Path<String>,
) -> Result<Json<MenuEntry>, (StatusCode, String)> {
    app.menus
        .find(&id)
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Menu entry not found".to_string()))
}

// ============================================================
// Routes
// ============================================================

pub async fn list_routes(State(app): State<App>) -> Json<Vec<RouteRecord>> {
    Json(app.routes.routes().to_vec())
}

pub async fn filter_routes(
    State(app): State<App>,
    Json(permissions): Json<Vec<Permission>>,
) -> Json<Vec<RouteRecord>> {
    Json(app.routes.filtered(app.route_filter.as_ref(), &permissions))
}

/// Query parameters for resolving a path.
#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    pub path: String,
}

pub async fn resolve_route(
    State(app): State<App>,
    Query(query): Query<ResolveQuery>,
) -> Result<Json<RouteMatch>, (StatusCode, String)> {
    app.routes.resolve(&query.path).map(Json).map_err(route_error)
}
