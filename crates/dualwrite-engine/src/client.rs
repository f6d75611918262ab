//! Client abstraction for the authorization engine's read API.

use std::sync::Arc;

use async_trait::async_trait;
use dualwrite_core::Tuple;

use crate::error::Result;

/// A single page read for `(namespace, object, relation)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadRequest {
    pub namespace: String,
    pub object: String,
    /// Relation to read. Empty reads every relation on the object.
    pub relation: String,
    pub page_size: Option<u32>,
    /// Token from the previous page; `None` for the first read.
    pub continuation_token: Option<String>,
}

impl ReadRequest {
    pub fn new(
        namespace: impl Into<String>,
        object: impl Into<String>,
        relation: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            object: object.into(),
            relation: relation.into(),
            page_size: None,
            continuation_token: None,
        }
    }

    pub fn with_page_size(mut self, page_size: Option<u32>) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_continuation_token(mut self, token: impl Into<String>) -> Self {
        self.continuation_token = Some(token.into());
        self
    }
}

/// One page of tuples.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadResponse {
    pub tuples: Vec<Tuple>,
    /// Empty when no further pages remain.
    pub continuation_token: String,
}

impl ReadResponse {
    pub fn has_more(&self) -> bool {
        !self.continuation_token.is_empty()
    }
}

/// Read seam onto the authorization engine.
///
/// Implementations must be thread-safe (Send + Sync). A read either returns a
/// whole page or an error; there are no partial pages.
#[async_trait]
pub trait AuthzClient: Send + Sync {
    async fn read(&self, request: ReadRequest) -> Result<ReadResponse>;
}

#[async_trait]
impl<C: AuthzClient + ?Sized> AuthzClient for Arc<C> {
    async fn read(&self, request: ReadRequest) -> Result<ReadResponse> {
        (**self).read(request).await
    }
}

/// A simple in-memory engine for testing.
///
/// Stores tuples per namespace in insertion order and pages through matches
/// with offset tokens.
pub mod memory {
    use super::*;
    use std::collections::HashMap;
    use tokio::sync::RwLock;

    use crate::error::EngineError;

    const DEFAULT_PAGE_SIZE: usize = 50;

    /// In-memory [`AuthzClient`].
    pub struct MemoryAuthzClient {
        namespaces: RwLock<HashMap<String, Vec<Tuple>>>,
        page_size: usize,
    }

    impl MemoryAuthzClient {
        pub fn new() -> Self {
            Self {
                namespaces: RwLock::new(HashMap::new()),
                page_size: DEFAULT_PAGE_SIZE,
            }
        }

        /// Page size used when a request does not set one.
        pub fn with_page_size(mut self, page_size: usize) -> Self {
            self.page_size = page_size.max(1);
            self
        }

        /// Store tuples. Tuples whose canonical key is already stored are skipped.
        pub async fn write(&self, namespace: &str, tuples: impl IntoIterator<Item = Tuple>) {
            let mut namespaces = self.namespaces.write().await;
            let stored = namespaces.entry(namespace.to_string()).or_default();
            for tuple in tuples {
                if !stored.contains(&tuple) {
                    stored.push(tuple);
                }
            }
        }

        /// Store tuples given as canonical keys.
        pub async fn write_keys(&self, namespace: &str, keys: &[&str]) -> Result<()> {
            let tuples = keys
                .iter()
                .map(|k| Tuple::parse(k))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            self.write(namespace, tuples).await;
            Ok(())
        }

        pub async fn len(&self, namespace: &str) -> usize {
            self.namespaces
                .read()
                .await
                .get(namespace)
                .map_or(0, Vec::len)
        }
    }

    impl Default for MemoryAuthzClient {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl AuthzClient for MemoryAuthzClient {
        async fn read(&self, request: ReadRequest) -> Result<ReadResponse> {
            let offset = match request.continuation_token.as_deref() {
                None | Some("") => 0,
                Some(token) => token
                    .parse::<usize>()
                    .map_err(|_| EngineError::InvalidToken(token.to_string()))?,
            };
            let page_size = request
                .page_size
                .map_or(self.page_size, |n| (n as usize).max(1));

            let namespaces = self.namespaces.read().await;
            let matching: Vec<&Tuple> = namespaces
                .get(&request.namespace)
                .into_iter()
                .flatten()
                .filter(|t| t.object == request.object)
                .filter(|t| request.relation.is_empty() || t.relation == request.relation)
                .collect();

            if offset > matching.len() {
                return Err(EngineError::InvalidToken(offset.to_string()));
            }

            let end = (offset + page_size).min(matching.len());
            let tuples = matching[offset..end].iter().map(|t| (*t).clone()).collect();
            let continuation_token = if end < matching.len() {
                end.to_string()
            } else {
                String::new()
            };

            Ok(ReadResponse {
                tuples,
                continuation_token,
            })
        }
    }
}
