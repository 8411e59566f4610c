//! API route definitions

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{self, ErrorResponse, HealthResponse, MenuResponse, MessageResponse};
use crate::config::Config;
use crate::error::Result;
use crate::store::MenuDb;
use crate::types::{Meal, Meals, MenuEntry, NewMenuEntry, Team};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Cafeteria Menu API",
        version = "0.1.0",
        description = "Daily lunch and dinner menus with serving-team rotation"
    ),
    tags(
        (name = "menu", description = "Menu management"),
        (name = "health", description = "Health checks")
    ),
    paths(
        handlers::health,
        handlers::list_menus,
        handlers::get_menu,
        handlers::create_menu,
    ),
    components(schemas(
        Team,
        Meal,
        Meals,
        MenuEntry,
        NewMenuEntry,
        MenuResponse,
        MessageResponse,
        HealthResponse,
        ErrorResponse,
    ))
)]
pub struct ApiDoc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<MenuDb>,
}

impl AppState {
    /// Open the configured database, creating the table if needed
    pub fn open(config: &Config) -> Result<Self> {
        let db = MenuDb::open(&config.database_path)?;
        Ok(Self { db: Arc::new(db) })
    }
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let openapi = ApiDoc::openapi();

    Router::new()
        // Menus
        .route("/menu", get(handlers::list_menus).post(handlers::create_menu))
        .route("/menu/{date}", get(handlers::get_menu))

        // Health
        .route("/health", get(handlers::health))

        // OpenAPI spec and Swagger UI
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", openapi))

        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
