//! The legacy collector seam.

use async_trait::async_trait;
use dualwrite_core::TupleCollection;
use dualwrite_store::LegacyStore;

use crate::config::CollectorConfig;
use crate::error::Result;
use crate::folder::FolderTreeCollector;
use crate::managed::ManagedPermissionsCollector;
use crate::team::TeamMembershipCollector;

/// Reads one slice of legacy state and returns it as tuples.
///
/// Each call builds a fresh [`TupleCollection`]; collectors hold nothing but
/// configuration, so any number of calls may run concurrently.
#[async_trait]
pub trait LegacyCollector: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Collect tuples for an organization.
    ///
    /// A query failure fails the whole call; no partial collection is
    /// returned.
    async fn collect(&self, store: &dyn LegacyStore, org_id: i64) -> Result<TupleCollection>;
}

/// The standard collector set: team memberships, the folder tree, and one
/// managed-permissions collector per configured kind.
pub fn legacy_collectors(config: &CollectorConfig) -> Vec<Box<dyn LegacyCollector>> {
    let mut collectors: Vec<Box<dyn LegacyCollector>> = vec![
        Box::new(TeamMembershipCollector::new()),
        Box::new(FolderTreeCollector::new()),
    ];
    collectors.extend(config.managed_kinds.iter().map(|kind| {
        Box::new(
            ManagedPermissionsCollector::new(kind.as_str())
                .with_role_pattern(config.managed_role_pattern.as_str()),
        ) as Box<dyn LegacyCollector>
    }));
    collectors
}
