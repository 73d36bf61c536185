//! SQLite settings store
//!
//! A single key/value `settings` table. The switcher keeps its last query here
//! so the next session can start where the previous one left off.
//! Uses r2d2 connection pooling like the rest of the storage layer.

use chrono::{DateTime, TimeZone, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension};
use std::path::Path;
use thiserror::Error;

/// Settings key for the query restored at session start
pub const LAST_SEARCH_KEY: &str = "lastSearch";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// A stored setting value and when it was last written
#[derive(Debug, Clone, PartialEq)]
pub struct Setting {
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

/// Parse timestamp string from database to DateTime<Utc>
fn parse_db_timestamp(timestamp_str: &str) -> DateTime<Utc> {
    chrono::NaiveDateTime::parse_from_str(timestamp_str, TIMESTAMP_FORMAT)
        .or_else(|_| chrono::NaiveDateTime::parse_from_str(timestamp_str, "%Y-%m-%d %H:%M:%S"))
        .map(|dt| Utc.from_utc_datetime(&dt))
        .unwrap_or_else(|_| Utc::now())
}

/// Thread-safe database wrapper using connection pooling
pub struct Database {
    pool: Pool<SqliteConnectionManager>,
}

impl Database {
    /// Open or create a database at the given path with connection pooling
    pub fn open<P: AsRef<Path>>(path: P) -> DatabaseResult<Self> {
        let manager = SqliteConnectionManager::file(path).with_init(|conn| {
            conn.execute_batch(
                "
                PRAGMA journal_mode=WAL;
                PRAGMA synchronous=NORMAL;
            ",
            )?;
            Ok(())
        });

        let pool = Pool::builder().max_size(2).build(manager)?;

        let db = Self { pool };
        db.setup_schema()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests and throwaway sessions)
    pub fn open_in_memory() -> DatabaseResult<Self> {
        let manager = SqliteConnectionManager::memory();

        // In-memory needs single connection to maintain state
        let pool = Pool::builder().max_size(1).build(manager)?;

        let db = Self { pool };
        db.setup_schema()?;
        Ok(db)
    }

    /// Get a connection from the pool
    fn get_conn(&self) -> DatabaseResult<PooledConnection<SqliteConnectionManager>> {
        Ok(self.pool.get()?)
    }

    fn setup_schema(&self) -> DatabaseResult<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL,
                updatedAt TEXT NOT NULL
            );
        "#,
        )?;
        Ok(())
    }

    /// Read one setting
    pub fn load_setting(&self, key: &str) -> DatabaseResult<Option<Setting>> {
        let conn = self.get_conn()?;
        let row = conn
            .query_row(
                "SELECT value, updatedAt FROM settings WHERE key = ?1",
                params![key],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;

        Ok(row.map(|(value, updated_at)| Setting {
            value,
            updated_at: parse_db_timestamp(&updated_at),
        }))
    }

    /// Insert or replace one setting
    pub fn save_setting(&self, key: &str, value: &str) -> DatabaseResult<()> {
        let conn = self.get_conn()?;
        let now = Utc::now().format(TIMESTAMP_FORMAT).to_string();
        conn.execute(
            "INSERT INTO settings (key, value, updatedAt) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updatedAt = excluded.updatedAt",
            params![key, value, now],
        )?;
        Ok(())
    }

    pub fn delete_setting(&self, key: &str) -> DatabaseResult<()> {
        let conn = self.get_conn()?;
        conn.execute("DELETE FROM settings WHERE key = ?1", params![key])?;
        Ok(())
    }

    /// Last query typed into the switcher, if any
    pub fn load_last_query(&self) -> DatabaseResult<Option<String>> {
        Ok(self.load_setting(LAST_SEARCH_KEY)?.map(|s| s.value))
    }

    pub fn save_last_query(&self, query: &str) -> DatabaseResult<()> {
        self.save_setting(LAST_SEARCH_KEY, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_setting_is_none() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.load_setting("nope").unwrap(), None);
        assert_eq!(db.load_last_query().unwrap(), None);
    }

    #[test]
    fn test_save_and_overwrite() {
        let db = Database::open_in_memory().unwrap();
        db.save_last_query("git").unwrap();
        assert_eq!(db.load_last_query().unwrap().as_deref(), Some("git"));

        db.save_last_query("github @pinned").unwrap();
        assert_eq!(db.load_last_query().unwrap().as_deref(), Some("github @pinned"));
    }

    #[test]
    fn test_updated_at_is_recent() {
        let db = Database::open_in_memory().unwrap();
        let before = Utc::now() - chrono::Duration::seconds(5);
        db.save_setting("k", "v").unwrap();
        let setting = db.load_setting("k").unwrap().unwrap();
        assert_eq!(setting.value, "v");
        assert!(setting.updated_at >= before);
    }

    #[test]
    fn test_delete_setting() {
        let db = Database::open_in_memory().unwrap();
        db.save_setting("k", "v").unwrap();
        db.delete_setting("k").unwrap();
        assert_eq!(db.load_setting("k").unwrap(), None);
    }

    #[test]
    fn test_file_database_persists() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("settings.db");
        {
            let db = Database::open(&path).unwrap();
            db.save_last_query("résumé").unwrap();
        }
        let db = Database::open(&path).unwrap();
        assert_eq!(db.load_last_query().unwrap().as_deref(), Some("résumé"));
    }

    #[test]
    fn test_parse_db_timestamp_without_fraction() {
        let ts = parse_db_timestamp("2024-05-01 12:30:00");
        assert_eq!(ts.to_rfc3339(), "2024-05-01T12:30:00+00:00");
    }
}
