//! # Dual-write Store
//!
//! Read access to the legacy relational permission store.
//!
//! ## Overview
//!
//! Collectors describe what they need as a SQL string plus parameters and get
//! back driver-neutral [`Row`]s, which they scan into statically-typed records
//! through [`FromRow`]. The [`LegacyStore`] trait is that seam; [`SqliteStore`]
//! is the bundled implementation.
//!
//! Reserved words (the legacy `user` table) are quoted through the store's
//! [`Dialect`], so queries stay dialect-agnostic.
//!
//! ## Key Types
//!
//! - [`LegacyStore`] - Query execution and the store's quoting capability
//! - [`LegacyStoreExt`] - `query_as` for typed records
//! - [`Row`], [`Value`], [`FromRow`] - Result rows and scanning
//! - [`Dialect`] - Identifier quoting
//! - [`SqliteStore`] - rusqlite-backed store
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dualwrite_store::{FromRow, LegacyStoreExt, Row, SqliteStore, Value};
//!
//! struct FolderRow {
//!     uid: String,
//! }
//!
//! impl FromRow for FolderRow {
//!     fn from_row(row: &Row) -> dualwrite_store::Result<Self> {
//!         Ok(Self { uid: row.get_string("uid")? })
//!     }
//! }
//!
//! async fn example() {
//!     let store = SqliteStore::open_memory().unwrap();
//!     let folders: Vec<FolderRow> = store
//!         .query_as("SELECT uid FROM folder WHERE org_id = ?", &[Value::Integer(1)])
//!         .await
//!         .unwrap();
//! }
//! ```

pub mod dialect;
pub mod error;
pub mod row;
pub mod schema;
pub mod sqlite;
pub mod traits;

pub use dialect::{Dialect, MySqlDialect, PostgresDialect, SqliteDialect};
pub use error::{Result, StoreError};
pub use row::{FromRow, Row, Value};
pub use sqlite::SqliteStore;
pub use traits::{LegacyStore, LegacyStoreExt};
