//! SQLite menu database

use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::types::{MenuEntry, NewMenuEntry};

/// How long a connection waits on a locked database before giving up
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite database holding one row per menu date.
///
/// Only the path is kept; every call opens its own connection and closes it
/// on return.
#[derive(Debug, Clone)]
pub struct MenuDb {
    path: PathBuf,
}

impl MenuDb {
    /// Open or create the database
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let db = Self {
            path: path.to_path_buf(),
        };
        db.init_schema()?;
        Ok(db)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Ok(conn)
    }

    /// Initialize database schema
    fn init_schema(&self) -> Result<()> {
        let conn = self.connect()?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS menu (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL UNIQUE,
                meals TEXT NOT NULL,
                order_seq TEXT NOT NULL
            );
            "#,
        )?;

        Ok(())
    }

    /// All menus in insertion order
    pub fn list(&self) -> Result<Vec<MenuEntry>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare("SELECT id, date, meals, order_seq FROM menu ORDER BY id")?;

        let rows = stmt
            .query_map([], RawRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter().map(RawRow::decode).collect()
    }

    /// The menu stored for exactly `date`, if any
    pub fn get_by_date(&self, date: &str) -> Result<Option<MenuEntry>> {
        let conn = self.connect()?;

        let row = conn
            .query_row(
                "SELECT id, date, meals, order_seq FROM menu WHERE date = ?1",
                params![date],
                RawRow::from_row,
            )
            .optional()?;

        row.map(RawRow::decode).transpose()
    }

    /// Insert a validated menu and return its new id
    pub fn insert(&self, entry: &NewMenuEntry) -> Result<i64> {
        let meals = serde_json::to_string(&entry.meals)?;
        let order = serde_json::to_string(&entry.order)?;
        let conn = self.connect()?;

        conn.execute(
            "INSERT INTO menu (date, meals, order_seq) VALUES (?1, ?2, ?3)",
            params![entry.date, meals, order],
        )
        .map_err(|e| {
            if is_unique_violation(&e) {
                Error::DuplicateDate(entry.date.clone())
            } else {
                Error::Database(e)
            }
        })?;

        Ok(conn.last_insert_rowid())
    }

    /// Number of stored menus
    pub fn count(&self) -> Result<usize> {
        let conn = self.connect()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM menu", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

/// A row before its JSON columns are decoded
struct RawRow {
    id: i64,
    date: String,
    meals: String,
    order: String,
}

impl RawRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            date: row.get(1)?,
            meals: row.get(2)?,
            order: row.get(3)?,
        })
    }

    fn decode(self) -> Result<MenuEntry> {
        Ok(MenuEntry {
            id: self.id,
            date: self.date,
            meals: serde_json::from_str(&self.meals)?,
            order: serde_json::from_str(&self.order)?,
        })
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}
