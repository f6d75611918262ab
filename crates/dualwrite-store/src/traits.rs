//! LegacyStore trait: the abstract interface for reading the legacy schema.

use async_trait::async_trait;

use crate::dialect::Dialect;
use crate::error::Result;
use crate::row::{FromRow, Row, Value};

/// Query execution against the legacy relational store.
///
/// Implementations run a caller-supplied statement with positional `?`
/// parameters and hand back every row. Errors are returned as-is; the store
/// never retries.
#[async_trait]
pub trait LegacyStore: Send + Sync {
    /// The quoting capability for this store's SQL dialect.
    fn dialect(&self) -> &dyn Dialect;

    /// Run a query and return all rows.
    async fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>>;
}

/// Extension trait for scanning rows into records.
pub trait LegacyStoreExt: LegacyStore {
    /// Run a query and scan every row into `R`.
    ///
    /// The first row that fails to scan fails the whole call.
    fn query_as<R: FromRow + Send>(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl std::future::Future<Output = Result<Vec<R>>> + Send;

    /// Quote an identifier with the store's dialect.
    fn quote(&self, identifier: &str) -> String {
        self.dialect().quote(identifier)
    }
}

impl<S: LegacyStore + ?Sized> LegacyStoreExt for S {
    async fn query_as<R: FromRow + Send>(&self, sql: &str, params: &[Value]) -> Result<Vec<R>> {
        let rows = self.query(sql, params).await?;
        rows.iter().map(R::from_row).collect()
    }
}
