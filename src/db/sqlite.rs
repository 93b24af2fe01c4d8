//! SQLite-backed dictionary store
//!
//! Schema:
//! ```sql
//! CREATE TABLE medicines (
//!     id INTEGER PRIMARY KEY,
//!     name TEXT UNIQUE NOT NULL,
//!     seeded_at TEXT NOT NULL
//! )
//! ```
//!
//! Names are returned in insertion order (`ORDER BY id`). Every call opens its
//! own connection and drops it before returning; nothing is held between
//! batches.

use super::{DictionaryStore, SeedSummary};
use crate::config::{ResolverConfig, DEFAULT_STORE_OPEN_ATTEMPTS};
use crate::error::{ResolveError, Result};
use crate::tokenizer::normalize;
use chrono::Utc;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

const RETRY_BACKOFF: Duration = Duration::from_millis(50);
const BUSY_TIMEOUT: Duration = Duration::from_millis(250);

pub struct SqliteDictionaryStore {
    path: PathBuf,
    open_attempts: u32,
}

impl SqliteDictionaryStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            open_attempts: DEFAULT_STORE_OPEN_ATTEMPTS,
        }
    }

    pub fn from_config(config: &ResolverConfig) -> Self {
        Self::new(&config.db_path).with_open_attempts(config.store_open_attempts)
    }

    pub fn with_open_attempts(mut self, attempts: u32) -> Self {
        self.open_attempts = attempts.max(1);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run one read against a fresh read-only connection.
    ///
    /// Opening and querying form one attempt. A failed attempt is retried up
    /// to `open_attempts` times before the store is reported unavailable. A
    /// missing file is reported at once and never created.
    fn read_with_retry<T>(
        &self,
        what: &str,
        mut op: impl FnMut(&Connection) -> rusqlite::Result<T>,
    ) -> Result<T> {
        if !self.path.exists() {
            return Err(ResolveError::StoreUnavailable(format!(
                "database file {} not found, run the seed command first",
                self.path.display()
            )));
        }

        let mut last_error = None;
        for attempt in 1..=self.open_attempts {
            let result =
                Connection::open_with_flags(&self.path, OpenFlags::SQLITE_OPEN_READ_ONLY).and_then(
                    |conn| {
                        conn.busy_timeout(BUSY_TIMEOUT)?;
                        op(&conn)
                    },
                );
            match result {
                Ok(value) => return Ok(value),
                Err(e) => {
                    warn!(
                        "Failed to {} from {} (attempt {}/{}): {}",
                        what,
                        self.path.display(),
                        attempt,
                        self.open_attempts,
                        e
                    );
                    last_error = Some(e);
                    if attempt < self.open_attempts {
                        thread::sleep(RETRY_BACKOFF);
                    }
                }
            }
        }

        Err(ResolveError::StoreUnavailable(format!(
            "failed to {} from {} after {} attempts: {}",
            what,
            self.path.display(),
            self.open_attempts,
            last_error.map(|e| e.to_string()).unwrap_or_default()
        )))
    }

    /// Open for seeding, creating the file and schema if needed.
    fn open_read_write(&self) -> Result<Connection> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(&self.path)
            .map_err(|e| ResolveError::Seed(format!("Failed to open database: {}", e)))?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS medicines (
                id INTEGER PRIMARY KEY,
                name TEXT UNIQUE NOT NULL,
                seeded_at TEXT NOT NULL
            )
            "#,
            [],
        )
        .map_err(|e| ResolveError::Seed(format!("Failed to create table: {}", e)))?;

        Ok(conn)
    }

    /// Insert-or-ignore every name in one transaction.
    pub fn seed<I, S>(&self, names: I) -> Result<SeedSummary>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut conn = self.open_read_write()?;
        let tx = conn
            .transaction()
            .map_err(|e| ResolveError::Seed(format!("Failed to start transaction: {}", e)))?;

        let seeded_at = Utc::now().to_rfc3339();
        let mut summary = SeedSummary::default();
        {
            let mut stmt = tx
                .prepare("INSERT OR IGNORE INTO medicines (name, seeded_at) VALUES (?1, ?2)")
                .map_err(|e| ResolveError::Seed(format!("Failed to prepare insert: {}", e)))?;

            for name in names {
                let name = normalize(name.as_ref());
                if name.is_empty() {
                    continue;
                }
                summary.offered += 1;
                summary.inserted += stmt
                    .execute(params![name, seeded_at])
                    .map_err(|e| ResolveError::Seed(format!("Failed to insert '{}': {}", name, e)))?;
            }
        }

        summary.total = count_rows(&tx).map_err(|e| ResolveError::Seed(e.to_string()))?;
        tx.commit()
            .map_err(|e| ResolveError::Seed(format!("Failed to commit transaction: {}", e)))?;

        info!(
            "Seeded {}: {} offered, {} inserted, {} total",
            self.path.display(),
            summary.offered,
            summary.inserted,
            summary.total
        );
        Ok(summary)
    }

    pub fn count(&self) -> Result<usize> {
        self.read_with_retry("count medicines", count_rows)
    }
}

fn count_rows(conn: &Connection) -> rusqlite::Result<usize> {
    conn.query_row("SELECT COUNT(*) FROM medicines", [], |row| row.get::<_, i64>(0))
        .map(|n| n as usize)
}

impl DictionaryStore for SqliteDictionaryStore {
    fn load_all(&self) -> Result<Vec<String>> {
        let names = self.read_with_retry("load medicines", |conn| {
            let mut stmt = conn.prepare("SELECT name FROM medicines ORDER BY id")?;
            let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
            rows.collect::<rusqlite::Result<Vec<_>>>()
        })?;

        debug!("Loaded {} names from {}", names.len(), self.path.display());
        Ok(names)
    }

    fn exact_lookup(&self, normalized_word: &str) -> Result<Option<String>> {
        self.read_with_retry("look up medicine", |conn| {
            conn.query_row(
                "SELECT name FROM medicines WHERE name = ?1",
                params![normalized_word],
                |row| row.get::<_, String>(0),
            )
            .optional()
        })
    }
}
