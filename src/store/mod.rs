//! Storage layer for menus

mod menu_db;

pub use menu_db::MenuDb;
