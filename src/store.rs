//! User persistence
//!
//! Maps a platform caller id to the study group the user confirmed.
//! The engine only needs three operations, expressed as a trait so
//! dialog tests can run against an in-memory double.

use crate::turn::Platform;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("user not found: {0}")]
    UserNotFound(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// One caller's record. `study_group` is the empty string until the
/// user confirms a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub user_id: String,
    pub study_group: String,
    pub platform: String,
}

/// Storage for the user → group mapping.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_user(&self, user_id: &str) -> StoreResult<Option<User>>;

    /// Returns `false` when the user already exists (no mutation).
    async fn create_user(&self, user_id: &str, group: &str, platform: Platform)
        -> StoreResult<bool>;

    /// Fails with [`StoreError::UserNotFound`] for unknown callers.
    async fn update_user(&self, user_id: &str, group: &str) -> StoreResult<()>;
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL UNIQUE,
    study_group TEXT NOT NULL DEFAULT '',
    platform TEXT NOT NULL
);
";

/// Thread-safe SQLite-backed store. Statements are short and run
/// under a single mutex; webhook traffic is far below where that
/// matters.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create the database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        Self::from_conn(Connection::open(path)?)
    }

    /// In-memory database for tests.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::from_conn(Connection::open_in_memory()?)
    }

    fn from_conn(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

#[async_trait]
impl UserStore for Database {
    async fn get_user(&self, user_id: &str) -> StoreResult<Option<User>> {
        let conn = self.conn.lock().unwrap();
        let user = conn
            .query_row(
                "SELECT user_id, study_group, platform FROM users WHERE user_id = ?1",
                params![user_id],
                |row| {
                    Ok(User {
                        user_id: row.get(0)?,
                        study_group: row.get(1)?,
                        platform: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(user)
    }

    async fn create_user(
        &self,
        user_id: &str,
        group: &str,
        platform: Platform,
    ) -> StoreResult<bool> {
        let conn = self.conn.lock().unwrap();
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO users (user_id, study_group, platform) VALUES (?1, ?2, ?3)",
            params![user_id, group, platform.as_db_str()],
        )?;
        Ok(inserted > 0)
    }

    async fn update_user(&self, user_id: &str, group: &str) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        let updated = conn.execute(
            "UPDATE users SET study_group = ?1 WHERE user_id = ?2",
            params![group, user_id],
        )?;
        if updated == 0 {
            return Err(StoreError::UserNotFound(user_id.to_string()));
        }
        Ok(())
    }
}
