//! Reads back what the authorization engine stores for an object.

use dualwrite_core::{ObjectTuples, Tuple};
use dualwrite_engine::{AuthzClient, EngineError, MirrorConfig, ReadRequest};

use crate::error::Result;

/// Pagination state for one relation.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Page {
    More(String),
    Done,
}

impl Page {
    fn after(continuation_token: String) -> Self {
        if continuation_token.is_empty() {
            Page::Done
        } else {
            Page::More(continuation_token)
        }
    }
}

/// Collects the stored tuples on an object for a fixed set of relations.
///
/// The result is keyed the same way legacy collectors key theirs, so the two
/// can be compared directly. Stored folder-resource tuples are expected to be
/// unique per condition-stripped key; if the engine holds several, the one
/// read last wins.
#[derive(Debug, Clone)]
pub struct MirrorCollector {
    relations: Vec<String>,
    config: MirrorConfig,
}

impl MirrorCollector {
    pub fn new<I, S>(relations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            relations: relations.into_iter().map(Into::into).collect(),
            config: MirrorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: MirrorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn relations(&self) -> &[String] {
        &self.relations
    }

    /// Read every configured relation on `object` from `namespace`.
    ///
    /// Any failed read fails the whole call.
    #[tracing::instrument(name = "mirror_collector", skip(self, client))]
    pub async fn collect(
        &self,
        client: &dyn AuthzClient,
        object: &str,
        namespace: &str,
    ) -> Result<ObjectTuples> {
        let mut tuples = ObjectTuples::new();
        for relation in &self.relations {
            for tuple in self.list(client, namespace, object, relation).await? {
                tuples.insert_replacing(tuple);
            }
        }

        tracing::debug!(tuples = tuples.len(), "collected stored tuples");
        Ok(tuples)
    }

    async fn list(
        &self,
        client: &dyn AuthzClient,
        namespace: &str,
        object: &str,
        relation: &str,
    ) -> Result<Vec<Tuple>> {
        let request =
            ReadRequest::new(namespace, object, relation).with_page_size(self.config.page_size);

        // The first read always happens.
        let max_pages = self.config.max_pages.max(1);
        let response = client.read(request.clone()).await?;
        let mut tuples = response.tuples;
        let mut page = Page::after(response.continuation_token);
        let mut pages = 1usize;

        while let Page::More(token) = page {
            if pages >= max_pages {
                tracing::warn!(object, relation, pages, "pagination did not terminate");
                return Err(EngineError::PaginationLimit {
                    object: object.to_string(),
                    relation: relation.to_string(),
                    pages,
                }
                .into());
            }

            tracing::trace!(relation, page = pages + 1, "reading next page");
            let response = client
                .read(request.clone().with_continuation_token(token))
                .await?;
            pages += 1;
            tuples.extend(response.tuples);
            page = Page::after(response.continuation_token);
        }

        tracing::trace!(relation, pages, read = tuples.len(), "listed relation");
        Ok(tuples)
    }
}
