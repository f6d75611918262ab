//! Team memberships → `team-admin` / `team-member` tuples.

use async_trait::async_trait;
use dualwrite_core::{relations, Entry, Tuple, TupleCollection};
use dualwrite_store::{FromRow, LegacyStore, LegacyStoreExt, Row};

use crate::collector::LegacyCollector;
use crate::error::Result;

/// Legacy membership level that grants team admin.
pub const TEAM_ADMIN_PERMISSION: i64 = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Membership {
    team_uid: String,
    user_uid: String,
    permission: i64,
}

impl FromRow for Membership {
    fn from_row(row: &Row) -> dualwrite_store::Result<Self> {
        Ok(Self {
            team_uid: row.get_string("team_uid")?,
            user_uid: row.get_string("user_uid")?,
            permission: row.get_i64("permission")?,
        })
    }
}

impl Membership {
    fn into_tuple(self) -> Tuple {
        let relation = if self.permission == TEAM_ADMIN_PERMISSION {
            relations::TEAM_ADMIN
        } else {
            relations::TEAM_MEMBER
        };
        Tuple::new(
            &Entry::user(self.user_uid),
            relation,
            &Entry::team(self.team_uid),
        )
    }
}

/// One tuple per team membership: `team:<team>#team-admin|team-member@user:<user>`.
#[derive(Debug, Clone, Default)]
pub struct TeamMembershipCollector;

impl TeamMembershipCollector {
    pub fn new() -> Self {
        Self
    }

    fn query(store: &dyn LegacyStore) -> String {
        format!(
            "SELECT t.uid AS team_uid, u.uid AS user_uid, tm.permission
             FROM team_member tm
             INNER JOIN team t ON tm.team_id = t.id
             INNER JOIN {} u ON tm.user_id = u.id",
            store.quote("user")
        )
    }
}

#[async_trait]
impl LegacyCollector for TeamMembershipCollector {
    fn name(&self) -> &str {
        "team_membership"
    }

    #[tracing::instrument(name = "team_membership_collector", skip(self, store))]
    async fn collect(&self, store: &dyn LegacyStore, org_id: i64) -> Result<TupleCollection> {
        let memberships: Vec<Membership> = store.query_as(&Self::query(store), &[]).await?;

        let mut tuples = TupleCollection::new();
        let rows = memberships.len();
        for membership in memberships {
            tuples.insert(membership.into_tuple());
        }

        tracing::debug!(org_id, rows, objects = tuples.len(), "collected team memberships");
        Ok(tuples)
    }
}
