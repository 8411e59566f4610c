//! API request handlers

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use super::routes::AppState;
use crate::error::Error;
use crate::store::MenuDb;
use crate::types::{Meals, MenuEntry, NewMenuEntry, ServingOrder, Team};

// Response types

#[derive(Debug, Serialize, ToSchema)]
pub struct MenuResponse {
    /// Requested date
    pub date: String,
    /// Lunch and dinner composition
    pub meals: Meals,
    /// Serving rotation
    #[schema(value_type = Vec<Team>)]
    pub order: ServingOrder,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    /// Confirmation message
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// API version
    pub version: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_response(err: Error) -> ApiError {
    let status = err.status_code();
    if status.is_server_error() {
        tracing::error!("Request failed: {}", err);
    } else {
        tracing::warn!("Request rejected: {}", err);
    }

    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

/// Run a blocking database call off the async runtime
async fn with_db<T, F>(state: &AppState, f: F) -> Result<T, Error>
where
    F: FnOnce(&MenuDb) -> Result<T, Error> + Send + 'static,
    T: Send + 'static,
{
    let db = state.db.clone();
    tokio::task::spawn_blocking(move || f(db.as_ref())).await?
}

// Handlers

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

/// List every stored menu
#[utoipa::path(
    get,
    path = "/menu",
    responses(
        (status = 200, description = "All menus", body = [MenuEntry]),
        (status = 500, description = "Internal error", body = ErrorResponse)
    ),
    tag = "menu"
)]
pub async fn list_menus(
    State(state): State<AppState>,
) -> Result<Json<Vec<MenuEntry>>, ApiError> {
    let menus = with_db(&state, |db| db.list()).await.map_err(error_response)?;
    tracing::debug!("Listing {} menus", menus.len());
    Ok(Json(menus))
}

/// Get the menu for one date
#[utoipa::path(
    get,
    path = "/menu/{date}",
    params(
        ("date" = String, Path, description = "Date identifier, matched exactly")
    ),
    responses(
        (status = 200, description = "Menu found", body = MenuResponse),
        (status = 404, description = "No menu for this date", body = ErrorResponse),
        (status = 500, description = "Internal error", body = ErrorResponse)
    ),
    tag = "menu"
)]
pub async fn get_menu(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<MenuResponse>, ApiError> {
    let lookup = date.clone();
    let entry = with_db(&state, move |db| db.get_by_date(&lookup))
        .await
        .map_err(error_response)?
        .ok_or_else(|| {
            tracing::debug!("No menu stored for {}", date);
            error_response(Error::MenuNotFound)
        })?;

    Ok(Json(MenuResponse {
        date: entry.date,
        meals: entry.meals,
        order: entry.order,
    }))
}

/// Create the menu for a new date
#[utoipa::path(
    post,
    path = "/menu",
    request_body = NewMenuEntry,
    responses(
        (status = 201, description = "Menu created", body = MessageResponse),
        (status = 400, description = "Invalid menu", body = ErrorResponse),
        (status = 409, description = "A menu for this date already exists", body = ErrorResponse),
        (status = 500, description = "Internal error", body = ErrorResponse)
    ),
    tag = "menu"
)]
pub async fn create_menu(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let Json(body) = payload.map_err(|e| error_response(Error::InvalidBody(e.body_text())))?;
    let entry = NewMenuEntry::from_json(&body).map_err(error_response)?;

    let date = entry.date.clone();
    let id = with_db(&state, move |db| db.insert(&entry))
        .await
        .map_err(error_response)?;
    tracing::info!("Created menu {} for {}", id, date);

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Menu added successfully".into(),
        }),
    ))
}
