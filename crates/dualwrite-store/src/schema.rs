//! Legacy schema bootstrap for SQLite.
//!
//! Creates the subset of the legacy permission schema the collectors read.
//! Versioned like a migration so repeated bootstraps are no-ops, and every
//! statement is `IF NOT EXISTS` so bootstrapping a real legacy database leaves
//! its tables alone.

use rusqlite::Connection;

use crate::error::{Result, StoreError};

/// Current schema version.
pub const CURRENT_VERSION: u32 = 1;

/// Create or upgrade the legacy schema.
///
/// This function is idempotent - it can be called multiple times safely.
pub fn bootstrap(conn: &mut Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at INTEGER NOT NULL
        )",
        [],
    )?;

    let current: u32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;

    if current < CURRENT_VERSION {
        let tx = conn.transaction()?;

        for version in (current + 1)..=CURRENT_VERSION {
            apply(&tx, version)?;

            tx.execute(
                "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
                rusqlite::params![version, now_millis()],
            )?;
        }

        tx.commit()?;
        tracing::debug!(from = current, to = CURRENT_VERSION, "legacy schema bootstrapped");
    }

    Ok(())
}

fn apply(conn: &Connection, version: u32) -> Result<()> {
    match version {
        1 => apply_v1(conn),
        _ => Err(StoreError::Schema(format!("unknown schema version: {version}"))),
    }
}

/// v1: identities, teams, folders, and role-based permissions.
fn apply_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS "user" (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            uid TEXT NOT NULL UNIQUE,
            login TEXT NOT NULL,
            org_id INTEGER NOT NULL DEFAULT 1
        );

        CREATE TABLE IF NOT EXISTS team (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            uid TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            org_id INTEGER NOT NULL DEFAULT 1
        );

        -- permission: 4 = admin, anything else = member
        CREATE TABLE IF NOT EXISTS team_member (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            org_id INTEGER NOT NULL DEFAULT 1,
            team_id INTEGER NOT NULL,
            user_id INTEGER NOT NULL,
            permission INTEGER NOT NULL DEFAULT 0,
            UNIQUE(team_id, user_id)
        );

        CREATE TABLE IF NOT EXISTS folder (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            uid TEXT NOT NULL,
            org_id INTEGER NOT NULL DEFAULT 1,
            title TEXT NOT NULL DEFAULT '',
            parent_uid TEXT,
            UNIQUE(org_id, uid)
        );

        CREATE TABLE IF NOT EXISTS role (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            uid TEXT NOT NULL,
            name TEXT NOT NULL,
            org_id INTEGER NOT NULL DEFAULT 1,
            UNIQUE(org_id, name)
        );

        CREATE TABLE IF NOT EXISTS permission (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            role_id INTEGER NOT NULL,
            action TEXT NOT NULL,
            scope TEXT NOT NULL DEFAULT '',
            kind TEXT NOT NULL DEFAULT '',
            attribute TEXT NOT NULL DEFAULT '',
            identifier TEXT NOT NULL DEFAULT ''
        );

        CREATE TABLE IF NOT EXISTS user_role (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            org_id INTEGER NOT NULL DEFAULT 1,
            role_id INTEGER NOT NULL,
            user_id INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS team_role (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            org_id INTEGER NOT NULL DEFAULT 1,
            role_id INTEGER NOT NULL,
            team_id INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS builtin_role (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            role TEXT NOT NULL,
            role_id INTEGER NOT NULL,
            org_id INTEGER NOT NULL DEFAULT 1
        );

        CREATE INDEX IF NOT EXISTS idx_permission_role_kind ON permission(role_id, kind);
        CREATE INDEX IF NOT EXISTS idx_user_role_role ON user_role(role_id);
        CREATE INDEX IF NOT EXISTS idx_team_role_role ON team_role(role_id);
        "#,
    )?;

    Ok(())
}

fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}
