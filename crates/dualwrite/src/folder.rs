//! Folder hierarchy → `parent` tuples.

use async_trait::async_trait;
use dualwrite_core::{relations, Entry, Tuple, TupleCollection};
use dualwrite_store::{FromRow, LegacyStore, LegacyStoreExt, Row};

use crate::collector::LegacyCollector;
use crate::error::Result;

const QUERY: &str = "SELECT uid, parent_uid, org_id FROM folder";

#[derive(Debug, Clone, PartialEq, Eq)]
struct Folder {
    uid: String,
    /// Empty for root folders.
    parent_uid: String,
    org_id: i64,
}

impl FromRow for Folder {
    fn from_row(row: &Row) -> dualwrite_store::Result<Self> {
        Ok(Self {
            uid: row.get_string("uid")?,
            parent_uid: row.get_string("parent_uid")?,
            org_id: row.get_i64("org_id")?,
        })
    }
}

/// One `folder:<child>#parent@folder:<parent>` tuple per non-root folder.
///
/// A folder has at most one parent, so nothing ever merges here.
#[derive(Debug, Clone, Default)]
pub struct FolderTreeCollector;

impl FolderTreeCollector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LegacyCollector for FolderTreeCollector {
    fn name(&self) -> &str {
        "folder_tree"
    }

    #[tracing::instrument(name = "folder_tree_collector", skip(self, store))]
    async fn collect(&self, store: &dyn LegacyStore, org_id: i64) -> Result<TupleCollection> {
        let folders: Vec<Folder> = store.query_as(QUERY, &[]).await?;

        let mut tuples = TupleCollection::new();
        let mut roots = 0usize;
        for folder in &folders {
            if folder.parent_uid.is_empty() {
                tracing::trace!(uid = %folder.uid, org_id = folder.org_id, "root folder");
                roots += 1;
                continue;
            }

            tuples.insert(Tuple::new(
                &Entry::folder(folder.parent_uid.as_str()),
                relations::PARENT,
                &Entry::folder(folder.uid.as_str()),
            ));
        }

        tracing::debug!(
            org_id,
            folders = folders.len(),
            roots,
            edges = tuples.tuple_count(),
            "collected folder tree"
        );
        Ok(tuples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dualwrite_testkit::{FailingStore, LegacyFixture};

    #[tokio::test]
    async fn test_child_points_at_parent() {
        let fx = LegacyFixture::new();
        fx.add_folder("f1", None);
        fx.add_folder("f2", Some("f1"));

        let tuples = FolderTreeCollector::new().collect(&fx.store, 1).await.unwrap();

        assert_eq!(tuples.tuple_count(), 1);
        let f2 = tuples.get("folder:f2").unwrap();
        let tuple = f2.get("folder:f2#parent@folder:f1").unwrap();
        assert_eq!(tuple.subject, "folder:f1");
        assert_eq!(tuple.relation, "parent");
    }

    #[tokio::test]
    async fn test_roots_produce_nothing() {
        let fx = LegacyFixture::new();
        fx.add_folder("f1", None);
        fx.add_folder("f2", None);

        let tuples = FolderTreeCollector::new().collect(&fx.store, 1).await.unwrap();
        assert!(tuples.is_empty());
    }

    #[tokio::test]
    async fn test_empty_parent_is_root() {
        let fx = LegacyFixture::new();
        fx.add_folder("f1", Some(""));

        let tuples = FolderTreeCollector::new().collect(&fx.store, 1).await.unwrap();
        assert!(tuples.is_empty());
    }

    #[tokio::test]
    async fn test_nested_tree() {
        let fx = LegacyFixture::new();
        fx.add_folder("a", None);
        fx.add_folder("b", Some("a"));
        fx.add_folder("c", Some("b"));
        fx.add_folder("d", Some("a"));

        let tuples = FolderTreeCollector::new().collect(&fx.store, 1).await.unwrap();

        assert_eq!(tuples.len(), 3);
        assert!(tuples.get("folder:a").is_none());
        assert!(tuples
            .get("folder:c")
            .unwrap()
            .contains_key("folder:c#parent@folder:b"));
    }

    #[tokio::test]
    async fn test_query_error_propagates() {
        let result = FolderTreeCollector::new()
            .collect(&FailingStore::new("timeout"), 1)
            .await;
        assert!(result.is_err());
    }
}
