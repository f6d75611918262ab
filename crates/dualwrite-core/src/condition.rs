//! Tuple conditions.
//!
//! The only condition the migration produces restricts a folder grant to a set
//! of group resources (`<group>/<resource>[/<subresource>]`). The set is kept
//! sorted so the string form, and therefore the canonical key, is stable.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::error::{Result, TupleError};

/// Name of the condition attached to folder-resource grants.
pub const SUBRESOURCE_FILTER: &str = "subresource_filter";

/// A named predicate carrying the group resources a grant applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Condition {
    pub name: String,
    pub group_resources: BTreeSet<String>,
}

impl Condition {
    pub fn new<I, S>(name: impl Into<String>, group_resources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            group_resources: group_resources.into_iter().map(Into::into).collect(),
        }
    }

    /// A `subresource_filter` condition over the given group resources.
    pub fn subresource_filter<I, S>(group_resources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(SUBRESOURCE_FILTER, group_resources)
    }

    /// Union the other condition's group resources into this one.
    pub fn merge(&mut self, other: &Condition) {
        self.group_resources
            .extend(other.group_resources.iter().cloned());
    }

    pub fn is_empty(&self) -> bool {
        self.group_resources.is_empty()
    }

    pub fn contains(&self, group_resource: &str) -> bool {
        self.group_resources.contains(group_resource)
    }

    /// Parse `name[value,value,...]`.
    pub fn parse(s: &str) -> Result<Self> {
        let malformed = || TupleError::MalformedCondition(s.to_string());
        let (name, rest) = s.split_once('[').ok_or_else(malformed)?;
        let values = rest.strip_suffix(']').ok_or_else(malformed)?;
        if name.is_empty() || values.contains(['[', ']']) {
            return Err(malformed());
        }
        let group_resources = values
            .split(',')
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect();
        Ok(Self {
            name: name.to_string(),
            group_resources,
        })
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[", self.name)?;
        for (i, gr) in self.group_resources.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(gr)?;
        }
        f.write_str("]")
    }
}

/// Format a group resource identifier.
pub fn group_resource(group: &str, resource: &str, subresource: &str) -> String {
    if subresource.is_empty() {
        format!("{group}/{resource}")
    } else {
        format!("{group}/{resource}/{subresource}")
    }
}
