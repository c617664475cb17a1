use std::path::Path;
#[cfg(unix)]
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::error::{HotTermsError, Result};
use crate::models::{BackendKind, TermRecord, TermStats};
use crate::ranking::RANK_ORDER_SQL;

use super::TermBackend;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA_SQL: &str = r"
    PRAGMA journal_mode = WAL;
    CREATE TABLE IF NOT EXISTS search_terms (
        term TEXT PRIMARY KEY NOT NULL,
        score INTEGER NOT NULL DEFAULT 1 CHECK (score >= 1),
        last_searched INTEGER NOT NULL,
        created_at INTEGER NOT NULL
    );
";

const INDEX_SQL: &str = r"
    CREATE INDEX IF NOT EXISTS idx_search_terms_rank
    ON search_terms(score DESC, last_searched DESC, term ASC);
";

const REQUIRED_COLUMNS: &[&str] = &["term", "score", "last_searched", "created_at"];

/// Durable backend: one `search_terms` table in a local SQLite file.
#[derive(Clone)]
pub struct SqliteTermBackend {
    conn: Arc<Mutex<Connection>>,
}

impl std::fmt::Debug for SqliteTermBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteTermBackend").finish_non_exhaustive()
    }
}

impl SqliteTermBackend {
    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| HotTermsError::mutex_poisoned("sqlite"))?;
        f(&conn)
    }

    /// Opens (creating if needed) the database file and its parent directory.
    /// Safe to call repeatedly against the same file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        let backend = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        backend.migrate()?;
        #[cfg(unix)]
        harden_sqlite_permissions(path)?;
        Ok(backend)
    }

    fn migrate(&self) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute_batch(SCHEMA_SQL)?;
            for column in REQUIRED_COLUMNS {
                if !has_column(conn, "search_terms", column)? {
                    return Err(HotTermsError::Validation(format!(
                        "unsupported search_terms schema: {column} is missing; reset the data directory"
                    )));
                }
            }
            conn.execute_batch(INDEX_SQL)?;
            Ok(())
        })
    }
}

impl TermBackend for SqliteTermBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Sqlite
    }

    fn upsert_increment(&self, term: &str, now_ms: i64) -> Result<TermRecord> {
        self.with_conn(|conn| {
            let record = conn.query_row(
                r"
                INSERT INTO search_terms(term, score, last_searched, created_at)
                VALUES (?1, 1, ?2, ?2)
                ON CONFLICT(term) DO UPDATE SET
                  score = search_terms.score + 1,
                  last_searched = excluded.last_searched
                RETURNING term, score, last_searched, created_at
                ",
                params![term, now_ms],
                map_record,
            )?;
            Ok(record)
        })
    }

    fn get(&self, term: &str) -> Result<Option<TermRecord>> {
        self.with_conn(|conn| {
            let record = conn
                .query_row(
                    r"
                    SELECT term, score, last_searched, created_at
                    FROM search_terms
                    WHERE term = ?1
                    ",
                    params![term],
                    map_record,
                )
                .optional()?;
            Ok(record)
        })
    }

    fn list_ranked(&self, limit: usize) -> Result<Vec<TermRecord>> {
        self.with_conn(|conn| ranked_rows(conn, limit))
    }

    fn count(&self) -> Result<usize> {
        self.with_conn(count_rows)
    }

    fn snapshot(&self, limit: usize) -> Result<TermStats> {
        self.with_conn(|conn| {
            // One read transaction so writers on other connections cannot land between
            // the count and the listing.
            let tx = conn.unchecked_transaction()?;
            let total = count_rows(&tx)?;
            let top_terms = ranked_rows(&tx, limit)?;
            tx.commit()?;
            Ok(TermStats { total, top_terms })
        })
    }

    fn delete(&self, term: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let affected = conn.execute("DELETE FROM search_terms WHERE term = ?1", params![term])?;
            Ok(affected > 0)
        })
    }

    fn clear(&self) -> Result<usize> {
        self.with_conn(|conn| {
            let affected = conn.execute("DELETE FROM search_terms", [])?;
            Ok(affected)
        })
    }

    fn retain_top(&self, keep: usize) -> Result<usize> {
        self.with_conn(|conn| {
            let affected = conn.execute(
                &format!(
                    r"
                    DELETE FROM search_terms
                    WHERE term NOT IN (
                        SELECT term FROM search_terms
                        ORDER BY {RANK_ORDER_SQL}
                        LIMIT ?1
                    )
                    "
                ),
                params![usize_to_i64_saturating(keep)],
            )?;
            Ok(affected)
        })
    }

    fn close(self: Box<Self>) -> Result<()> {
        let Self { conn } = *self;
        let Ok(mutex) = Arc::try_unwrap(conn) else {
            // Another clone still holds the connection; it closes on last drop.
            return Ok(());
        };
        let conn = mutex
            .into_inner()
            .map_err(|_| HotTermsError::mutex_poisoned("sqlite"))?;
        conn.close().map_err(|(_, err)| HotTermsError::Sqlite(err))
    }
}

fn ranked_rows(conn: &Connection, limit: usize) -> Result<Vec<TermRecord>> {
    let mut stmt = conn.prepare(&format!(
        r"
        SELECT term, score, last_searched, created_at
        FROM search_terms
        ORDER BY {RANK_ORDER_SQL}
        LIMIT ?1
        "
    ))?;
    let rows = stmt.query_map(params![usize_to_i64_saturating(limit)], map_record)?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

fn count_rows(conn: &Connection) -> Result<usize> {
    let count = conn.query_row("SELECT COUNT(*) FROM search_terms", [], |row| {
        row.get::<_, i64>(0)
    })?;
    Ok(i64_to_usize_saturating(count))
}

fn map_record(row: &Row<'_>) -> rusqlite::Result<TermRecord> {
    Ok(TermRecord {
        term: row.get(0)?,
        score: i64_to_u64_saturating(row.get::<_, i64>(1)?),
        last_searched: row.get(2)?,
        created_at: row.get(3)?,
    })
}

fn has_column(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(1))?;
    for row in rows {
        if row? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

fn usize_to_i64_saturating(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn i64_to_usize_saturating(value: i64) -> usize {
    if value <= 0 {
        0
    } else {
        usize::try_from(value).unwrap_or(usize::MAX)
    }
}

fn i64_to_u64_saturating(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

#[cfg(unix)]
fn harden_sqlite_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    for suffix in ["", "-wal", "-shm"] {
        let mut os = path.as_os_str().to_os_string();
        os.push(suffix);
        let candidate = PathBuf::from(os);
        if candidate.exists() {
            std::fs::set_permissions(candidate, std::fs::Permissions::from_mode(0o600))?;
        }
    }
    Ok(())
}
