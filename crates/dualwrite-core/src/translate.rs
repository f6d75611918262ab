//! Translation of legacy permissions into tuples.
//!
//! A legacy permission is an `(action, kind, identifier)` triple such as
//! `("dashboards:read", "folders", "abc")`: "read dashboards inside folder
//! abc". [`ResourceTranslator`] holds a table per kind describing which
//! relation each action becomes and whether it targets the object itself or
//! the resources inside a folder.

use std::collections::HashMap;

use crate::condition::{group_resource, Condition};
use crate::entry::{relations, types, Entry};
use crate::tuple::Tuple;

/// Kind discriminators understood by the default table.
pub mod kinds {
    pub const FOLDERS: &str = "folders";
    pub const DASHBOARDS: &str = "dashboards";
}

const FOLDER_GROUP: &str = "folder.grafana.app";
const FOLDER_RESOURCE: &str = "folders";
const DASHBOARD_GROUP: &str = "dashboard.grafana.app";
const DASHBOARD_RESOURCE: &str = "dashboards";
const PERMISSIONS: &str = "permissions";

/// Identifier granting an action on every object of a kind.
pub const WILDCARD: &str = "*";

/// Maps a legacy permission onto a tuple.
pub trait Translator: Send + Sync {
    /// Returns `None` when the combination has no tuple representation.
    fn translate(&self, subject: &str, action: &str, kind: &str, identifier: &str)
        -> Option<Tuple>;
}

impl<F> Translator for F
where
    F: Fn(&str, &str, &str, &str) -> Option<Tuple> + Send + Sync,
{
    fn translate(
        &self,
        subject: &str,
        action: &str,
        kind: &str,
        identifier: &str,
    ) -> Option<Tuple> {
        self(subject, action, kind, identifier)
    }
}

/// What a single action becomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionMapping {
    /// Base relation (`get`, `update`, ...).
    pub relation: String,
    /// Subresource the action is about, empty for the object itself.
    pub subresource: String,
    /// `(group, resource)` when the action targets resources inside a folder.
    pub folder_resource: Option<(String, String)>,
}

impl ActionMapping {
    pub fn new(relation: &str, subresource: &str) -> Self {
        Self {
            relation: relation.to_string(),
            subresource: subresource.to_string(),
            folder_resource: None,
        }
    }

    pub fn folder_resource(relation: &str, group: &str, resource: &str, subresource: &str) -> Self {
        Self {
            relation: relation.to_string(),
            subresource: subresource.to_string(),
            folder_resource: Some((group.to_string(), resource.to_string())),
        }
    }
}

/// Translation table for one kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindTranslation {
    /// Object type tuples for this kind are written against.
    pub object_type: String,
    pub group: String,
    pub resource: String,
    pub actions: HashMap<String, ActionMapping>,
}

impl KindTranslation {
    pub fn new(object_type: &str, group: &str, resource: &str) -> Self {
        Self {
            object_type: object_type.to_string(),
            group: group.to_string(),
            resource: resource.to_string(),
            actions: HashMap::new(),
        }
    }

    pub fn action(mut self, action: &str, mapping: ActionMapping) -> Self {
        self.actions.insert(action.to_string(), mapping);
        self
    }

    fn translate(&self, subject: &str, mapping: &ActionMapping, identifier: &str) -> Tuple {
        if identifier == WILDCARD {
            let (group, resource) = match &mapping.folder_resource {
                Some((group, resource)) => (group.as_str(), resource.as_str()),
                None => (self.group.as_str(), self.resource.as_str()),
            };
            return raw_tuple(
                subject,
                mapping.relation.clone(),
                Entry::new(
                    types::GROUP_RESOURCE,
                    group_resource(group, resource, &mapping.subresource),
                ),
            );
        }

        if self.object_type == types::FOLDER {
            if let Some((group, resource)) = &mapping.folder_resource {
                return raw_tuple(
                    subject,
                    relations::folder_resource(&mapping.relation),
                    Entry::folder(identifier),
                )
                .with_condition(Condition::subresource_filter([group_resource(
                    group,
                    resource,
                    &mapping.subresource,
                )]));
            }
        }

        let relation = relations::subresource(&mapping.relation, &mapping.subresource);
        let object = if self.object_type == types::RESOURCE {
            Entry::new(
                types::RESOURCE,
                format!("{}/{}/{identifier}", self.group, self.resource),
            )
        } else {
            Entry::new(self.object_type.as_str(), identifier)
        };
        raw_tuple(subject, relation, object)
    }
}

fn raw_tuple(subject: &str, relation: String, object: Entry) -> Tuple {
    Tuple {
        subject: subject.to_string(),
        relation,
        object: object.to_string(),
        condition: None,
    }
}

/// Table-driven [`Translator`].
///
/// `Default` carries the folder and dashboard tables; further kinds can be
/// registered with [`with_kind`](Self::with_kind).
#[derive(Debug, Clone)]
pub struct ResourceTranslator {
    kinds: HashMap<String, KindTranslation>,
}

impl ResourceTranslator {
    /// A translator with no kinds registered.
    pub fn empty() -> Self {
        Self {
            kinds: HashMap::new(),
        }
    }

    pub fn with_kind(mut self, kind: &str, translation: KindTranslation) -> Self {
        self.kinds.insert(kind.to_string(), translation);
        self
    }

    pub fn kind(&self, kind: &str) -> Option<&KindTranslation> {
        self.kinds.get(kind)
    }

    fn folders() -> KindTranslation {
        let dashboards = |relation, subresource| {
            ActionMapping::folder_resource(relation, DASHBOARD_GROUP, DASHBOARD_RESOURCE, subresource)
        };
        KindTranslation::new(types::FOLDER, FOLDER_GROUP, FOLDER_RESOURCE)
            .action("folders:read", ActionMapping::new(relations::GET, ""))
            .action("folders:write", ActionMapping::new(relations::UPDATE, ""))
            .action("folders:create", ActionMapping::new(relations::CREATE, ""))
            .action("folders:delete", ActionMapping::new(relations::DELETE, ""))
            .action(
                "folders.permissions:read",
                ActionMapping::new(relations::GET, PERMISSIONS),
            )
            .action(
                "folders.permissions:write",
                ActionMapping::new(relations::UPDATE, PERMISSIONS),
            )
            .action("dashboards:read", dashboards(relations::GET, ""))
            .action("dashboards:write", dashboards(relations::UPDATE, ""))
            .action("dashboards:create", dashboards(relations::CREATE, ""))
            .action("dashboards:delete", dashboards(relations::DELETE, ""))
            .action(
                "dashboards.permissions:read",
                dashboards(relations::GET, PERMISSIONS),
            )
            .action(
                "dashboards.permissions:write",
                dashboards(relations::UPDATE, PERMISSIONS),
            )
    }

    fn dashboards() -> KindTranslation {
        KindTranslation::new(types::RESOURCE, DASHBOARD_GROUP, DASHBOARD_RESOURCE)
            .action("dashboards:read", ActionMapping::new(relations::GET, ""))
            .action("dashboards:write", ActionMapping::new(relations::UPDATE, ""))
            .action("dashboards:delete", ActionMapping::new(relations::DELETE, ""))
            .action(
                "dashboards.permissions:read",
                ActionMapping::new(relations::GET, PERMISSIONS),
            )
            .action(
                "dashboards.permissions:write",
                ActionMapping::new(relations::UPDATE, PERMISSIONS),
            )
    }
}

impl Default for ResourceTranslator {
    fn default() -> Self {
        Self::empty()
            .with_kind(kinds::FOLDERS, Self::folders())
            .with_kind(kinds::DASHBOARDS, Self::dashboards())
    }
}

impl Translator for ResourceTranslator {
    fn translate(
        &self,
        subject: &str,
        action: &str,
        kind: &str,
        identifier: &str,
    ) -> Option<Tuple> {
        let translation = self.kinds.get(kind)?;
        let mapping = translation.actions.get(action)?;
        Some(translation.translate(subject, mapping, identifier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translate(action: &str, kind: &str, identifier: &str) -> Option<Tuple> {
        ResourceTranslator::default().translate("user:u1", action, kind, identifier)
    }

    #[test]
    fn test_folder_action() {
        let t = translate("folders:read", kinds::FOLDERS, "f1").unwrap();
        assert_eq!(t.key(), "folder:f1#get@user:u1");
        assert!(!t.is_folder_resource());
    }

    #[test]
    fn test_folder_subresource_action() {
        let t = translate("folders.permissions:write", kinds::FOLDERS, "f1").unwrap();
        assert_eq!(t.key(), "folder:f1#update_permissions@user:u1");
    }

    #[test]
    fn test_folder_resource_action() {
        let t = translate("dashboards:read", kinds::FOLDERS, "f1").unwrap();
        assert!(t.is_folder_resource());
        assert_eq!(
            t.key(),
            "folder:f1#resource_get@user:u1,subresource_filter[dashboard.grafana.app/dashboards]"
        );
    }

    #[test]
    fn test_folder_resource_subresource_shares_relation() {
        let read = translate("dashboards:read", kinds::FOLDERS, "f1").unwrap();
        let perms = translate("dashboards.permissions:read", kinds::FOLDERS, "f1").unwrap();
        assert_eq!(read.key_without_condition(), perms.key_without_condition());
        assert!(perms
            .condition
            .unwrap()
            .contains("dashboard.grafana.app/dashboards/permissions"));
    }

    #[test]
    fn test_dashboard_action() {
        let t = translate("dashboards:write", kinds::DASHBOARDS, "d1").unwrap();
        assert_eq!(
            t.key(),
            "resource:dashboard.grafana.app/dashboards/d1#update@user:u1"
        );
    }

    #[test]
    fn test_wildcard_identifier() {
        let t = translate("dashboards:read", kinds::DASHBOARDS, WILDCARD).unwrap();
        assert_eq!(
            t.key(),
            "group_resource:dashboard.grafana.app/dashboards#get@user:u1"
        );

        let t = translate("dashboards:read", kinds::FOLDERS, WILDCARD).unwrap();
        assert_eq!(
            t.key(),
            "group_resource:dashboard.grafana.app/dashboards#get@user:u1"
        );

        let t = translate("folders.permissions:write", kinds::FOLDERS, WILDCARD).unwrap();
        assert_eq!(
            t.key(),
            "group_resource:folder.grafana.app/folders/permissions#update@user:u1"
        );
    }

    #[test]
    fn test_unsupported_combinations() {
        assert!(translate("dashboards:create", kinds::DASHBOARDS, "d1").is_none());
        assert!(translate("alert.rules:read", kinds::FOLDERS, "f1").is_none());
        assert!(translate("folders:read", "datasources", "x").is_none());
    }

    #[test]
    fn test_team_subject_is_kept_verbatim() {
        let t = ResourceTranslator::default()
            .translate("team:t1#member", "folders:read", kinds::FOLDERS, "f1")
            .unwrap();
        assert_eq!(t.key(), "folder:f1#get@team:t1#member");
    }

    #[test]
    fn test_closure_translator() {
        let translator = |subject: &str, _: &str, _: &str, id: &str| {
            Some(Tuple {
                subject: subject.to_string(),
                relation: "get".to_string(),
                object: format!("folder:{id}"),
                condition: None,
            })
        };
        let t = translator.translate("user:u1", "any", "any", "f9").unwrap();
        assert_eq!(t.key(), "folder:f9#get@user:u1");
    }

    #[test]
    fn test_registered_kind() {
        let translator = ResourceTranslator::empty().with_kind(
            "datasources",
            KindTranslation::new(types::RESOURCE, "datasource.grafana.app", "datasources")
                .action("datasources:query", ActionMapping::new("query", "")),
        );
        let t = translator
            .translate("user:u1", "datasources:query", "datasources", "ds1")
            .unwrap();
        assert_eq!(
            t.key(),
            "resource:datasource.grafana.app/datasources/ds1#query@user:u1"
        );
    }
}
