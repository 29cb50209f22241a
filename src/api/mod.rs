mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::app::App;

pub fn create_router(app: App) -> Router {
    let api = Router::new()
        // Menus
        .route("/menus", get(handlers::get_menus).put(handlers::set_menus))
        .route("/menus/load", post(handlers::load_menus))
        .route("/menus/status", get(handlers::get_menu_status))
        .route("/menus/{id}", get(handlers::get_menu_entry))
        // Routes
        .route("/routes", get(handlers::list_routes))
        .route("/routes/filter", post(handlers::filter_routes))
        .route("/routes/resolve", get(handlers::resolve_route))
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(app)
}
