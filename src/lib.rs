//! Cafeteria menu - HTTP API for daily menus and serving-team rotation

pub mod config;
pub mod error;
pub mod types;

pub mod store;
pub mod api;

pub use config::Config;
pub use error::{Error, Result};
pub use types::*;
