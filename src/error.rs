//! Error types for the menu service

use axum::http::StatusCode;
use thiserror::Error;

use crate::types::MealType;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Missing required field: '{0}'")]
    MissingField(&'static str),

    #[error("Invalid field: {0}")]
    InvalidField(String),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Invalid order: must list each of 1조, 2조 and 3조 exactly once")]
    InvalidOrder,

    #[error("meals must include '{0}'")]
    MissingMealType(MealType),

    #[error("'{meal}' is missing the '{field}' field")]
    MissingMealField { meal: MealType, field: &'static str },

    #[error("No menu found for this date")]
    MenuNotFound,

    #[error("A menu for {0} already exists")]
    DuplicateDate(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Background task failed: {0}")]
    Task(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// HTTP status this error is reported with
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::MissingField(_)
            | Error::InvalidField(_)
            | Error::InvalidBody(_)
            | Error::InvalidOrder
            | Error::MissingMealType(_)
            | Error::MissingMealField { .. } => StatusCode::BAD_REQUEST,
            Error::MenuNotFound => StatusCode::NOT_FOUND,
            Error::DuplicateDate(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::Task(err.to_string())
    }
}
