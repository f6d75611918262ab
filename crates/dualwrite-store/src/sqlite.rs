//! SQLite implementation of the LegacyStore trait.
//!
//! Uses rusqlite with bundled SQLite, wrapped in async via
//! tokio::spawn_blocking.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::Connection;

use crate::dialect::{Dialect, SqliteDialect};
use crate::error::{Result, StoreError};
use crate::row::{Row, Value};
use crate::schema;
use crate::traits::LegacyStore;

/// SQLite-based legacy store.
///
/// Thread-safe via internal Mutex. Queries run on the blocking pool.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
    dialect: Arc<dyn Dialect>,
}

impl SqliteStore {
    /// Open an existing legacy database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        Ok(Self::from_connection(conn))
    }

    /// Open an in-memory database with the legacy schema in place.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        schema::bootstrap(&mut conn)?;
        Ok(Self::from_connection(conn))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
            dialect: Arc::new(SqliteDialect),
        }
    }

    /// Replace the quoting dialect.
    pub fn with_dialect(mut self, dialect: impl Dialect + 'static) -> Self {
        self.dialect = Arc::new(dialect);
        self
    }

    /// Create the legacy schema if it is missing.
    pub fn bootstrap(&self) -> Result<()> {
        let mut conn = lock(&self.conn)?;
        schema::bootstrap(&mut conn)
    }

    /// Run a blocking operation on the connection.
    ///
    /// Intended for seeding and inspection; collectors go through
    /// [`LegacyStore::query`].
    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = lock(&self.conn)?;
        f(&conn)
    }
}

fn lock(conn: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>> {
    conn.lock().map_err(|e| {
        StoreError::Database(rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_LOCKED),
            Some(format!("mutex poisoned: {e}")),
        ))
    })
}

fn to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Integer(v) => SqlValue::Integer(*v),
        Value::Text(s) => SqlValue::Text(s.clone()),
    }
}

fn from_sql(column: &str, value: ValueRef<'_>) -> Result<Value> {
    match value {
        ValueRef::Null => Ok(Value::Null),
        ValueRef::Integer(v) => Ok(Value::Integer(v)),
        ValueRef::Text(bytes) => std::str::from_utf8(bytes)
            .map(|s| Value::Text(s.to_string()))
            .map_err(|_| StoreError::TypeMismatch {
                column: column.to_string(),
                expected: "utf-8 text",
                found: "invalid utf-8",
            }),
        ValueRef::Real(_) => Err(StoreError::TypeMismatch {
            column: column.to_string(),
            expected: "integer or text",
            found: "real",
        }),
        ValueRef::Blob(_) => Err(StoreError::TypeMismatch {
            column: column.to_string(),
            expected: "integer or text",
            found: "blob",
        }),
    }
}

fn run_query(conn: &Connection, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>> {
    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

    let mut rows = stmt.query(rusqlite::params_from_iter(params.iter()))?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let mut record = Row::new();
        for (i, name) in columns.iter().enumerate() {
            record.push(name.as_str(), from_sql(name, row.get_ref(i)?)?);
        }
        out.push(record);
    }
    Ok(out)
}

#[async_trait]
impl LegacyStore for SqliteStore {
    fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    async fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>> {
        let sql = sql.to_string();
        let params: Vec<SqlValue> = params.iter().map(to_sql).collect();
        let conn = self.conn.clone();

        tokio::task::spawn_blocking(move || {
            let conn = lock(&conn)?;
            let rows = run_query(&conn, &sql, &params)?;
            tracing::trace!(rows = rows.len(), "legacy query complete");
            Ok(rows)
        })
        .await
        .map_err(|e| StoreError::Task(format!("spawn_blocking failed: {e}")))?
    }
}
