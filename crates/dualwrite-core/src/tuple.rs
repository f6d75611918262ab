//! Relation tuples and their canonical keys.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::condition::Condition;
use crate::entry::{entry_type, relations, types, Entry};
use crate::error::{Result, TupleError};

/// A subject–relation–object grant.
///
/// `subject` and `object` hold encoded [`Entry`] strings. The string form
/// (`object#relation@subject[,condition]`) is the tuple's canonical key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tuple {
    pub subject: String,
    pub relation: String,
    pub object: String,
    pub condition: Option<Condition>,
}

impl Tuple {
    pub fn new(subject: &Entry, relation: impl Into<String>, object: &Entry) -> Self {
        Self {
            subject: subject.to_string(),
            relation: relation.into(),
            object: object.to_string(),
            condition: None,
        }
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// The canonical key: the full string form, condition included.
    pub fn key(&self) -> String {
        self.to_string()
    }

    /// The key with the condition left out.
    ///
    /// Two folder-resource grants that only differ in group resources share
    /// this key, which makes it the merge point for them.
    pub fn key_without_condition(&self) -> String {
        format!("{}#{}@{}", self.object, self.relation, self.subject)
    }

    /// The key a tuple is stored under in an [`ObjectTuples`](crate::ObjectTuples).
    pub fn merge_key(&self) -> String {
        if self.is_folder_resource() {
            self.key_without_condition()
        } else {
            self.key()
        }
    }

    /// Whether this is a grant on a folder for the resources inside it.
    pub fn is_folder_resource(&self) -> bool {
        entry_type(&self.object) == types::FOLDER
            && self.relation.starts_with(relations::FOLDER_RESOURCE_PREFIX)
    }

    /// Union another folder-resource grant's group resources into this one.
    ///
    /// If this tuple carries no condition yet it adopts the other's.
    pub fn merge_condition(&mut self, other: &Tuple) {
        match (&mut self.condition, &other.condition) {
            (Some(mine), Some(theirs)) => mine.merge(theirs),
            (None, Some(theirs)) => self.condition = Some(theirs.clone()),
            (_, None) => {}
        }
    }

    pub fn subject_entry(&self) -> Result<Entry> {
        Entry::parse(&self.subject)
    }

    pub fn object_entry(&self) -> Result<Entry> {
        Entry::parse(&self.object)
    }

    /// Parse a tuple from its canonical key.
    pub fn parse(s: &str) -> Result<Self> {
        let malformed = || TupleError::MalformedTuple(s.to_string());
        let (object, rest) = s.split_once('#').ok_or_else(malformed)?;
        let (relation, rest) = rest.split_once('@').ok_or_else(malformed)?;
        let (subject, condition) = match rest.split_once(',') {
            Some((subject, condition)) => (subject, Some(Condition::parse(condition)?)),
            None => (rest, None),
        };
        if relation.is_empty() {
            return Err(malformed());
        }
        Entry::parse(object)?;
        Entry::parse(subject)?;
        Ok(Self {
            subject: subject.to_string(),
            relation: relation.to_string(),
            object: object.to_string(),
            condition,
        })
    }
}

impl fmt::Display for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}@{}", self.object, self.relation, self.subject)?;
        if let Some(condition) = &self.condition {
            write!(f, ",{condition}")?;
        }
        Ok(())
    }
}

impl FromStr for Tuple {
    type Err = TupleError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn folder_grant(group_resource: &str) -> Tuple {
        Tuple::new(
            &Entry::user("u1"),
            relations::folder_resource(relations::GET),
            &Entry::folder("f1"),
        )
        .with_condition(Condition::subresource_filter([group_resource]))
    }

    #[test]
    fn test_team_admin_key() {
        let t = Tuple::new(&Entry::user("u1"), relations::TEAM_ADMIN, &Entry::team("t1"));
        assert_eq!(t.key(), "team:t1#team-admin@user:u1");
    }

    #[test]
    fn test_key_includes_condition() {
        let t = folder_grant("g1");
        assert_eq!(t.key(), "folder:f1#resource_get@user:u1,subresource_filter[g1]");
        assert_eq!(t.key_without_condition(), "folder:f1#resource_get@user:u1");
    }

    #[test]
    fn test_folder_resource_detection() {
        assert!(folder_grant("g1").is_folder_resource());

        let parent = Tuple::new(&Entry::folder("f1"), relations::PARENT, &Entry::folder("f2"));
        assert!(!parent.is_folder_resource());

        let resource = Tuple::new(
            &Entry::user("u1"),
            "resource_get",
            &Entry::new(types::RESOURCE, "g/r/x"),
        );
        assert!(!resource.is_folder_resource());
    }

    #[test]
    fn test_merge_key() {
        assert_eq!(folder_grant("g1").merge_key(), folder_grant("g2").merge_key());

        let t = Tuple::new(&Entry::user("u1"), relations::GET, &Entry::folder("f1"));
        assert_eq!(t.merge_key(), t.key());
    }

    #[test]
    fn test_merge_condition() {
        let mut a = folder_grant("g1");
        a.merge_condition(&folder_grant("g2"));
        let condition = a.condition.unwrap();
        assert!(condition.contains("g1"));
        assert!(condition.contains("g2"));
    }

    #[test]
    fn test_merge_condition_adopts_when_missing() {
        let mut a = folder_grant("g1");
        a.condition = None;
        a.merge_condition(&folder_grant("g2"));
        assert_eq!(a.condition, Some(Condition::subresource_filter(["g2"])));
    }

    #[test]
    fn test_parse_team_subject() {
        let t = Tuple::parse("folder:f1#get@team:t1#member").unwrap();
        assert_eq!(t.object, "folder:f1");
        assert_eq!(t.relation, "get");
        assert_eq!(t.subject, "team:t1#member");
        assert_eq!(t.subject_entry().unwrap(), Entry::team_members("t1"));
    }

    #[test]
    fn test_parse_with_condition() {
        let t = folder_grant("g1");
        assert_eq!(Tuple::parse(&t.key()).unwrap(), t);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(Tuple::parse("folder:f1").is_err());
        assert!(Tuple::parse("folder:f1#parent").is_err());
        assert!(Tuple::parse("folder:f1#@folder:f2").is_err());
        assert!(Tuple::parse("folder#parent@folder:f2").is_err());
        assert!(Tuple::parse("folder:f1#parent@folder:f2,bogus").is_err());
    }

    #[test]
    fn test_json_roundtrip() {
        let t = folder_grant("dashboard.grafana.app/dashboards");
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(serde_json::from_str::<Tuple>(&json).unwrap(), t);

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["object"], "folder:f1");
        assert_eq!(value["condition"]["name"], "subresource_filter");

        let entry = Entry::team_members("t1");
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(serde_json::from_str::<Entry>(&json).unwrap(), entry);
    }

    fn ident() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9_.-][a-zA-Z0-9_./-]{0,15}"
    }

    fn entry() -> impl Strategy<Value = Entry> {
        (
            "[a-z_]{1,8}",
            ident(),
            proptest::option::of("[a-z_-]{1,8}"),
        )
            .prop_map(|(kind, id, relation)| Entry {
                kind,
                id,
                relation,
            })
    }

    proptest! {
        #[test]
        fn tuple_key_roundtrips(
            subject in entry(),
            object in entry().prop_map(|e| Entry { relation: None, ..e }),
            relation in "[a-z_-]{1,12}",
            groups in proptest::option::of(proptest::collection::btree_set(ident(), 0..4)),
        ) {
            let mut tuple = Tuple::new(&subject, relation, &object);
            if let Some(groups) = groups {
                tuple = tuple.with_condition(Condition::subresource_filter(groups));
            }
            prop_assert_eq!(Tuple::parse(&tuple.key()).unwrap(), tuple);
        }

        #[test]
        fn merge_is_idempotent(groups in proptest::collection::btree_set(ident(), 1..5)) {
            let grant = folder_grant("seed").with_condition(Condition::subresource_filter(groups));
            let mut merged = grant.clone();
            merged.merge_condition(&grant);
            prop_assert_eq!(merged, grant);
        }
    }
}
