//! HackHub Store
//!
//! SQLite-backed persistence for users, teams, results and payment
//! screenshots.
//!
//! - **users**: accounts and team membership
//! - **teams**: team records, cascading deletes
//! - **results**: judged scores per round
//! - **payments**: uploaded payment screenshots and their review state
//!
//! The connection lives behind a `std::sync::Mutex` (a rusqlite
//! `Connection` is not `Sync`). Every operation is a short statement, so
//! handlers call the store directly from async code.
//!
//! # Example
//!
//! ```rust,no_run
//! use hackhub::model::{Team, User, UserRole};
//! use hackhub::store::Store;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Store::open("./hackhub_data/hackhub.db")?;
//!
//!     let team = Team::new("Null Pointers").project_title("Campus Rideshare");
//!     store.insert_team(&team)?;
//!     store.insert_user(&User::new("Ira", "ira@example.com", UserRole::TeamLeader).team(&team.id))?;
//!
//!     let members = store.team_members(&team.id)?;
//!     println!("{} on roster", members.len());
//!     Ok(())
//! }
//! ```

mod error;
mod payments;
mod results;
mod teams;
mod users;

pub use error::{StoreError, StoreResult};
pub use users::UserFilter;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::model::{PaymentStatus, UserRole};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS teams (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        project_title TEXT,
        track TEXT,
        created_at INTEGER NOT NULL
    );

    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        role TEXT NOT NULL,
        team_id TEXT REFERENCES teams(id),
        phone TEXT,
        college TEXT,
        created_at INTEGER NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_users_team ON users(team_id);

    CREATE TABLE IF NOT EXISTS results (
        id TEXT PRIMARY KEY,
        team_id TEXT NOT NULL REFERENCES teams(id),
        round TEXT NOT NULL,
        score REAL NOT NULL,
        remarks TEXT,
        published_at INTEGER NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_results_team ON results(team_id);

    CREATE TABLE IF NOT EXISTS payments (
        id TEXT PRIMARY KEY,
        team_id TEXT NOT NULL REFERENCES teams(id),
        image_url TEXT NOT NULL,
        public_id TEXT,
        status TEXT NOT NULL,
        uploaded_at INTEGER NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_payments_team ON payments(team_id);
";

/// Handle to the HackHub database
pub struct Store {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl Store {
    /// Create or open a database file
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(&path)?;
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            ",
        )?;

        let store = Self {
            conn: Mutex::new(conn),
            path: Some(path),
        };
        store.migrate()?;

        tracing::info!(path = ?store.path, "Store opened");
        Ok(store)
    }

    /// Open a throwaway in-memory database
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        let store = Self {
            conn: Mutex::new(conn),
            path: None,
        };
        store.migrate()?;
        Ok(store)
    }

    /// Database file path, `None` for in-memory stores
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Cheap round trip used by readiness probes
    pub fn ping(&self) -> StoreResult<()> {
        let conn = self.conn()?;
        conn.query_row("SELECT 1", [], |_| Ok(()))?;
        Ok(())
    }

    /// Record counts for the admin overview
    pub fn stats(&self) -> StoreResult<StoreStats> {
        let conn = self.conn()?;
        let count = |sql: &str| -> rusqlite::Result<u64> {
            conn.query_row(sql, [], |row| row.get::<_, i64>(0))
                .map(|n| n as u64)
        };

        Ok(StoreStats {
            users: count("SELECT COUNT(*) FROM users")?,
            teams: count("SELECT COUNT(*) FROM teams")?,
            results: count("SELECT COUNT(*) FROM results")?,
            payments_pending: count("SELECT COUNT(*) FROM payments WHERE status = 'pending'")?,
            payments_verified: count("SELECT COUNT(*) FROM payments WHERE status = 'verified'")?,
        })
    }

    fn migrate(&self) -> StoreResult<()> {
        self.conn()?.execute_batch(SCHEMA)?;
        Ok(())
    }

    pub(crate) fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Lock(format!("Failed to lock connection: {}", e)))
    }
}

/// Record counts across the database
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub users: u64,
    pub teams: u64,
    pub results: u64,
    pub payments_pending: u64,
    pub payments_verified: u64,
}

impl ToSql for UserRole {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for UserRole {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        UserRole::parse(s).ok_or_else(|| FromSqlError::Other(format!("unknown role '{}'", s).into()))
    }
}

impl ToSql for PaymentStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for PaymentStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        PaymentStatus::parse(s)
            .ok_or_else(|| FromSqlError::Other(format!("unknown payment status '{}'", s).into()))
    }
}
