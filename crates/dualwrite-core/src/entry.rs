//! Subject and object references.
//!
//! Both sides of a tuple are encoded as `type:id`, optionally followed by a
//! `#relation` that turns the reference into a userset (e.g. `team:eng#member`,
//! "every member of team eng").

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, TupleError};

/// Entry type vocabulary.
pub mod types {
    pub const USER: &str = "user";
    pub const TEAM: &str = "team";
    pub const FOLDER: &str = "folder";
    pub const RESOURCE: &str = "resource";
    pub const GROUP_RESOURCE: &str = "group_resource";
}

/// Relation vocabulary.
pub mod relations {
    /// Team membership at admin level (legacy permission 4).
    pub const TEAM_ADMIN: &str = "team-admin";
    /// Team membership at any other level.
    pub const TEAM_MEMBER: &str = "team-member";
    /// Folder tree edge, child → parent.
    pub const PARENT: &str = "parent";
    /// Sub-relation embedded in team subjects.
    pub const MEMBER: &str = "member";

    pub const GET: &str = "get";
    pub const UPDATE: &str = "update";
    pub const CREATE: &str = "create";
    pub const DELETE: &str = "delete";

    /// Prefix of relations granted on a folder for the resources it contains.
    pub const FOLDER_RESOURCE_PREFIX: &str = "resource_";

    /// Relation for a grant on resources inside a folder, e.g. `resource_get`.
    pub fn folder_resource(relation: &str) -> String {
        format!("{FOLDER_RESOURCE_PREFIX}{relation}")
    }

    /// Relation for a grant on a subresource, e.g. `get_permissions`.
    pub fn subresource(relation: &str, subresource: &str) -> String {
        if subresource.is_empty() {
            relation.to_string()
        } else {
            format!("{relation}_{subresource}")
        }
    }
}

/// A typed reference: `type:id[#relation]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Entry {
    pub kind: String,
    pub id: String,
    pub relation: Option<String>,
}

impl Entry {
    /// Create a plain `type:id` entry.
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
            relation: None,
        }
    }

    /// Attach a sub-relation, producing a userset reference.
    pub fn with_relation(mut self, relation: impl Into<String>) -> Self {
        let relation = relation.into();
        self.relation = (!relation.is_empty()).then_some(relation);
        self
    }

    pub fn user(uid: impl Into<String>) -> Self {
        Self::new(types::USER, uid)
    }

    /// `team:<uid>#member`, the subject used for team role bindings.
    pub fn team_members(uid: impl Into<String>) -> Self {
        Self::new(types::TEAM, uid).with_relation(relations::MEMBER)
    }

    pub fn team(uid: impl Into<String>) -> Self {
        Self::new(types::TEAM, uid)
    }

    pub fn folder(uid: impl Into<String>) -> Self {
        Self::new(types::FOLDER, uid)
    }

    /// Parse an entry from its string form.
    pub fn parse(s: &str) -> Result<Self> {
        let (kind, rest) = s
            .split_once(':')
            .ok_or_else(|| TupleError::MalformedEntry(s.to_string()))?;
        let (id, relation) = match rest.rsplit_once('#') {
            Some((id, relation)) if !relation.is_empty() => (id, Some(relation)),
            Some(_) => return Err(TupleError::MalformedEntry(s.to_string())),
            None => (rest, None),
        };
        if kind.is_empty() || id.is_empty() {
            return Err(TupleError::MalformedEntry(s.to_string()));
        }
        Ok(Self {
            kind: kind.to_string(),
            id: id.to_string(),
            relation: relation.map(str::to_string),
        })
    }

    /// Whether this entry is of the given type.
    pub fn is(&self, kind: &str) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)?;
        if let Some(relation) = &self.relation {
            write!(f, "#{relation}")?;
        }
        Ok(())
    }
}

impl FromStr for Entry {
    type Err = TupleError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// The type part of an encoded entry, without allocating.
pub(crate) fn entry_type(encoded: &str) -> &str {
    encoded.split_once(':').map(|(kind, _)| kind).unwrap_or("")
}
