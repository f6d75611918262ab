//! Test fixtures and helpers.
//!
//! Seeding code for collector tests. Helpers panic on failure; a broken
//! fixture is a broken test.

use dualwrite_store::SqliteStore;
use rusqlite::{params, Connection};

/// An in-memory legacy database with the schema in place.
pub struct LegacyFixture {
    pub store: SqliteStore,
}

impl LegacyFixture {
    pub fn new() -> Self {
        Self {
            store: SqliteStore::open_memory().expect("open in-memory legacy store"),
        }
    }

    fn insert(&self, sql: &str, params: impl rusqlite::Params) -> i64 {
        self.store
            .with_conn(|conn: &Connection| {
                conn.execute(sql, params)?;
                Ok(conn.last_insert_rowid())
            })
            .expect("seed legacy row")
    }

    /// Insert a user; returns its row id.
    pub fn add_user(&self, uid: &str) -> i64 {
        self.insert(
            r#"INSERT INTO "user" (uid, login) VALUES (?1, ?1)"#,
            params![uid],
        )
    }

    /// Insert a team; returns its row id.
    pub fn add_team(&self, uid: &str) -> i64 {
        self.insert(
            "INSERT INTO team (uid, name) VALUES (?1, ?1)",
            params![uid],
        )
    }

    /// Add a user to a team at a membership level (4 is admin).
    pub fn add_team_member(&self, team_id: i64, user_id: i64, permission: i64) {
        self.insert(
            "INSERT INTO team_member (team_id, user_id, permission) VALUES (?1, ?2, ?3)",
            params![team_id, user_id, permission],
        );
    }

    /// Insert a folder. `None` stores a NULL parent.
    pub fn add_folder(&self, uid: &str, parent_uid: Option<&str>) -> i64 {
        self.insert(
            "INSERT INTO folder (uid, title, parent_uid) VALUES (?1, ?1, ?2)",
            params![uid, parent_uid],
        )
    }

    /// Insert a role; returns its row id.
    pub fn add_role(&self, name: &str) -> i64 {
        self.insert(
            "INSERT INTO role (uid, name) VALUES (?1, ?1)",
            params![name],
        )
    }

    /// Grant `action` on `kind:identifier` through a role.
    pub fn add_permission(&self, role_id: i64, action: &str, kind: &str, identifier: &str) {
        let scope = format!("{kind}:uid:{identifier}");
        self.insert(
            "INSERT INTO permission (role_id, action, scope, kind, attribute, identifier)
             VALUES (?1, ?2, ?3, ?4, 'uid', ?5)",
            params![role_id, action, scope, kind, identifier],
        );
    }

    pub fn assign_user_role(&self, role_id: i64, user_id: i64) {
        self.insert(
            "INSERT INTO user_role (role_id, user_id) VALUES (?1, ?2)",
            params![role_id, user_id],
        );
    }

    pub fn assign_team_role(&self, role_id: i64, team_id: i64) {
        self.insert(
            "INSERT INTO team_role (role_id, team_id) VALUES (?1, ?2)",
            params![role_id, team_id],
        );
    }

    /// Bind a role to a basic organization role such as `Editor`.
    pub fn assign_builtin_role(&self, role_id: i64, builtin: &str) {
        self.insert(
            "INSERT INTO builtin_role (role, role_id) VALUES (?1, ?2)",
            params![builtin, role_id],
        );
    }
}

impl Default for LegacyFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dualwrite_store::LegacyStore;

    #[tokio::test]
    async fn test_seeded_rows_are_queryable() {
        let fx = LegacyFixture::new();
        let u1 = fx.add_user("u1");
        let t1 = fx.add_team("t1");
        fx.add_team_member(t1, u1, 4);
        fx.add_folder("f1", None);

        let rows = fx
            .store
            .query("SELECT uid, parent_uid FROM folder", &[])
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get_opt_string("parent_uid").unwrap(), None);

        let members = fx
            .store
            .query("SELECT permission FROM team_member", &[])
            .await
            .unwrap();
        assert_eq!(members[0].get_i64("permission").unwrap(), 4);
    }

    #[test]
    fn test_ids_increase() {
        let fx = LegacyFixture::new();
        let a = fx.add_role("managed:a");
        let b = fx.add_role("managed:b");
        assert!(b > a);
    }
}
