//! Managed role permissions → resource tuples.
//!
//! Managed roles are generated per user or team binding, so a permission on
//! one can be written straight against the bound subject without modelling
//! the role itself. Only actions the [`Translator`] knows are collected.

use std::sync::Arc;

use async_trait::async_trait;
use dualwrite_core::{Entry, ResourceTranslator, Translator, TupleCollection};
use dualwrite_store::{FromRow, LegacyStore, LegacyStoreExt, Row, Value};

use crate::collector::LegacyCollector;
use crate::config::DEFAULT_MANAGED_ROLE_PATTERN;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Permission {
    user_uid: Option<String>,
    team_uid: Option<String>,
    action: String,
    kind: String,
    identifier: String,
    org_id: i64,
}

impl FromRow for Permission {
    fn from_row(row: &Row) -> dualwrite_store::Result<Self> {
        Ok(Self {
            user_uid: row.get_opt_string("user_uid")?,
            team_uid: row.get_opt_string("team_uid")?,
            action: row.get_string("action")?,
            kind: row.get_string("kind")?,
            identifier: row.get_string("identifier")?,
            org_id: row.get_i64("org_id")?,
        })
    }
}

impl Permission {
    /// The bound user, else the bound team's members.
    ///
    /// `None` for roles bound only through a basic (organization) role, which
    /// has no tuple representation yet.
    fn subject(&self) -> Option<Entry> {
        let non_empty = |uid: &Option<String>| uid.clone().filter(|uid| !uid.is_empty());
        match (non_empty(&self.user_uid), non_empty(&self.team_uid)) {
            (Some(user), _) => Some(Entry::user(user)),
            (None, Some(team)) => Some(Entry::team_members(team)),
            (None, None) => None,
        }
    }
}

/// Collects permissions of one kind granted through managed roles.
///
/// Folder-resource grants for the same subject, folder and relation are merged
/// into a single tuple whose condition lists every group resource granted.
pub struct ManagedPermissionsCollector {
    name: String,
    kind: String,
    role_pattern: String,
    translator: Arc<dyn Translator>,
}

impl ManagedPermissionsCollector {
    /// A collector for `kind` using the default translation table.
    pub fn new(kind: impl Into<String>) -> Self {
        let kind = kind.into();
        Self {
            name: format!("managed_permissions:{kind}"),
            kind,
            role_pattern: DEFAULT_MANAGED_ROLE_PATTERN.to_string(),
            translator: Arc::new(ResourceTranslator::default()),
        }
    }

    /// Override the `LIKE` pattern identifying managed roles.
    pub fn with_role_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.role_pattern = pattern.into();
        self
    }

    pub fn with_translator(mut self, translator: impl Translator + 'static) -> Self {
        self.translator = Arc::new(translator);
        self
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    fn query(store: &dyn LegacyStore) -> String {
        format!(
            "SELECT u.uid AS user_uid, t.uid AS team_uid, p.action, p.kind, p.identifier, r.org_id
             FROM permission p
             INNER JOIN role r ON p.role_id = r.id
             LEFT JOIN user_role ur ON r.id = ur.role_id
             LEFT JOIN {user} u ON u.id = ur.user_id
             LEFT JOIN team_role tr ON r.id = tr.role_id
             LEFT JOIN team t ON tr.team_id = t.id
             LEFT JOIN builtin_role br ON r.id = br.role_id
             WHERE r.name LIKE ?
             AND p.kind = ?",
            user = store.quote("user")
        )
    }
}

impl std::fmt::Debug for ManagedPermissionsCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagedPermissionsCollector")
            .field("kind", &self.kind)
            .field("role_pattern", &self.role_pattern)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl LegacyCollector for ManagedPermissionsCollector {
    fn name(&self) -> &str {
        &self.name
    }

    #[tracing::instrument(name = "managed_permissions_collector", skip(self, store), fields(kind = %self.kind))]
    async fn collect(&self, store: &dyn LegacyStore, org_id: i64) -> Result<TupleCollection> {
        let params = [
            Value::from(self.role_pattern.as_str()),
            Value::from(self.kind.as_str()),
        ];
        let permissions: Vec<Permission> = store.query_as(&Self::query(store), &params).await?;

        let mut tuples = TupleCollection::new();
        let mut unbound = 0usize;
        let mut untranslated = 0usize;

        for p in &permissions {
            let Some(subject) = p.subject() else {
                tracing::trace!(action = %p.action, org_id = p.org_id, "skipping basic role binding");
                unbound += 1;
                continue;
            };

            let subject = subject.to_string();
            let Some(tuple) = self
                .translator
                .translate(&subject, &p.action, &p.kind, &p.identifier)
            else {
                tracing::trace!(action = %p.action, kind = %p.kind, "no tuple for action");
                untranslated += 1;
                continue;
            };

            tuples.insert_merged(tuple);
        }

        tracing::debug!(
            org_id,
            rows = permissions.len(),
            objects = tuples.len(),
            tuples = tuples.tuple_count(),
            unbound,
            untranslated,
            "collected managed permissions"
        );
        Ok(tuples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dualwrite_core::{Condition, Tuple};
    use dualwrite_testkit::{FailingStore, LegacyFixture};

    const DASHBOARDS: &str = "dashboard.grafana.app/dashboards";
    const DASHBOARD_PERMISSIONS: &str = "dashboard.grafana.app/dashboards/permissions";

    async fn collect(fx: &LegacyFixture, kind: &str) -> TupleCollection {
        ManagedPermissionsCollector::new(kind)
            .collect(&fx.store, 1)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_user_binding() {
        let fx = LegacyFixture::new();
        let u1 = fx.add_user("u1");
        let role = fx.add_role("managed:users:1:permissions");
        fx.assign_user_role(role, u1);
        fx.add_permission(role, "folders:read", "folders", "f1");

        let tuples = collect(&fx, "folders").await;
        assert!(tuples
            .get("folder:f1")
            .unwrap()
            .contains_key("folder:f1#get@user:u1"));
    }

    #[tokio::test]
    async fn test_team_binding_uses_member_userset() {
        let fx = LegacyFixture::new();
        let t1 = fx.add_team("t1");
        let role = fx.add_role("managed:teams:1:permissions");
        fx.assign_team_role(role, t1);
        fx.add_permission(role, "folders:write", "folders", "f1");

        let tuples = collect(&fx, "folders").await;
        assert!(tuples
            .get("folder:f1")
            .unwrap()
            .contains_key("folder:f1#update@team:t1#member"));
    }

    #[tokio::test]
    async fn test_basic_role_binding_is_skipped() {
        let fx = LegacyFixture::new();
        let role = fx.add_role("managed:builtins:editor:permissions");
        fx.assign_builtin_role(role, "Editor");
        fx.add_permission(role, "folders:read", "folders", "f1");

        let tuples = collect(&fx, "folders").await;
        assert!(tuples.is_empty());
    }

    #[tokio::test]
    async fn test_folder_resource_grants_merge() {
        let fx = LegacyFixture::new();
        let u1 = fx.add_user("u1");
        let role = fx.add_role("managed:users:1:permissions");
        fx.assign_user_role(role, u1);
        fx.add_permission(role, "dashboards:read", "folders", "f1");
        fx.add_permission(role, "dashboards.permissions:read", "folders", "f1");

        let tuples = collect(&fx, "folders").await;
        let f1 = tuples.get("folder:f1").unwrap();
        assert_eq!(f1.len(), 1);

        let merged = f1.get("folder:f1#resource_get@user:u1").unwrap();
        assert_eq!(
            merged.condition,
            Some(Condition::subresource_filter([DASHBOARDS, DASHBOARD_PERMISSIONS]))
        );
    }

    #[tokio::test]
    async fn test_merge_with_custom_group_resources() {
        let fx = LegacyFixture::new();
        let u1 = fx.add_user("u1");
        let role = fx.add_role("managed:users:1:permissions");
        fx.assign_user_role(role, u1);
        fx.add_permission(role, "g1:read", "folders", "f1");
        fx.add_permission(role, "g2:read", "folders", "f1");

        let translator = |subject: &str, action: &str, _: &str, id: &str| {
            let group = action.split(':').next().unwrap_or_default();
            Some(
                Tuple::new(
                    &Entry::parse(subject).ok()?,
                    "resource_get",
                    &Entry::folder(id),
                )
                .with_condition(Condition::subresource_filter([group])),
            )
        };

        let tuples = ManagedPermissionsCollector::new("folders")
            .with_translator(translator)
            .collect(&fx.store, 1)
            .await
            .unwrap();

        let f1 = tuples.get("folder:f1").unwrap();
        assert_eq!(f1.len(), 1);
        let tuple = f1.tuples().next().unwrap();
        assert_eq!(tuple.condition, Some(Condition::subresource_filter(["g1", "g2"])));
    }

    #[tokio::test]
    async fn test_different_relations_do_not_merge() {
        let fx = LegacyFixture::new();
        let u1 = fx.add_user("u1");
        let role = fx.add_role("managed:users:1:permissions");
        fx.assign_user_role(role, u1);
        fx.add_permission(role, "dashboards:read", "folders", "f1");
        fx.add_permission(role, "dashboards:write", "folders", "f1");

        let tuples = collect(&fx, "folders").await;
        let f1 = tuples.get("folder:f1").unwrap();
        assert_eq!(f1.len(), 2);
        assert!(f1.contains_key("folder:f1#resource_get@user:u1"));
        assert!(f1.contains_key("folder:f1#resource_update@user:u1"));
    }

    #[tokio::test]
    async fn test_unsupported_action_is_skipped() {
        let fx = LegacyFixture::new();
        let u1 = fx.add_user("u1");
        let role = fx.add_role("managed:users:1:permissions");
        fx.assign_user_role(role, u1);
        fx.add_permission(role, "alert.rules:read", "folders", "f1");
        fx.add_permission(role, "folders:read", "folders", "f1");

        let tuples = collect(&fx, "folders").await;
        assert_eq!(tuples.tuple_count(), 1);
    }

    #[tokio::test]
    async fn test_filters_by_kind_and_role_name() {
        let fx = LegacyFixture::new();
        let u1 = fx.add_user("u1");

        let managed = fx.add_role("managed:users:1:permissions");
        fx.assign_user_role(managed, u1);
        fx.add_permission(managed, "dashboards:read", "dashboards", "d1");
        fx.add_permission(managed, "folders:read", "folders", "f1");

        let custom = fx.add_role("custom:viewer");
        fx.assign_user_role(custom, u1);
        fx.add_permission(custom, "dashboards:read", "dashboards", "d2");

        let tuples = collect(&fx, "dashboards").await;
        assert_eq!(tuples.tuple_count(), 1);
        assert!(tuples
            .get("resource:dashboard.grafana.app/dashboards/d1")
            .unwrap()
            .contains_key("resource:dashboard.grafana.app/dashboards/d1#get@user:u1"));
    }

    #[tokio::test]
    async fn test_custom_role_pattern() {
        let fx = LegacyFixture::new();
        let u1 = fx.add_user("u1");
        let custom = fx.add_role("custom:viewer");
        fx.assign_user_role(custom, u1);
        fx.add_permission(custom, "dashboards:read", "dashboards", "d2");

        let tuples = ManagedPermissionsCollector::new("dashboards")
            .with_role_pattern("custom:%")
            .collect(&fx.store, 1)
            .await
            .unwrap();
        assert_eq!(tuples.tuple_count(), 1);
    }

    #[tokio::test]
    async fn test_query_error_propagates() {
        let result = ManagedPermissionsCollector::new("folders")
            .collect(&FailingStore::new("deadlock"), 1)
            .await;
        assert!(result.is_err());
    }

    #[test]
    fn test_subject_preference() {
        let mut p = Permission {
            user_uid: Some("u1".into()),
            team_uid: Some("t1".into()),
            action: String::new(),
            kind: String::new(),
            identifier: String::new(),
            org_id: 1,
        };
        assert_eq!(p.subject(), Some(Entry::user("u1")));

        p.user_uid = Some(String::new());
        assert_eq!(p.subject(), Some(Entry::team_members("t1")));

        p.team_uid = None;
        assert_eq!(p.subject(), None);
    }
}
