//! Fake stores and engine clients.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use dualwrite_engine::{AuthzClient, EngineError, ReadRequest, ReadResponse};
use dualwrite_store::{Dialect, LegacyStore, Row, SqliteDialect, StoreError, Value};

/// A legacy store whose every query fails with the given message.
pub struct FailingStore {
    message: String,
}

impl FailingStore {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl LegacyStore for FailingStore {
    fn dialect(&self) -> &dyn Dialect {
        &SqliteDialect
    }

    async fn query(&self, _sql: &str, _params: &[Value]) -> dualwrite_store::Result<Vec<Row>> {
        Err(StoreError::Query(self.message.clone()))
    }
}

/// An engine client that answers reads from a fixed script of pages.
///
/// Every request is recorded. Once the script runs out, reads fail, unless
/// the client was built with [`endless`](Self::endless), in which case the
/// same page is returned forever.
pub struct ScriptedClient {
    pages: Mutex<VecDeque<ReadResponse>>,
    repeat: Option<ReadResponse>,
    requests: Mutex<Vec<ReadRequest>>,
}

impl ScriptedClient {
    pub fn new(pages: impl IntoIterator<Item = ReadResponse>) -> Self {
        Self {
            pages: Mutex::new(pages.into_iter().collect()),
            repeat: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A client that returns `page` for every read.
    pub fn endless(page: ReadResponse) -> Self {
        Self {
            pages: Mutex::new(VecDeque::new()),
            repeat: Some(page),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far, in order.
    pub fn requests(&self) -> Vec<ReadRequest> {
        lock(&self.requests).clone()
    }
}

#[async_trait]
impl AuthzClient for ScriptedClient {
    async fn read(&self, request: ReadRequest) -> dualwrite_engine::Result<ReadResponse> {
        lock(&self.requests).push(request);
        let next = lock(&self.pages).pop_front();
        next.or_else(|| self.repeat.clone())
            .ok_or_else(|| EngineError::Read("script exhausted".to_string()))
    }
}

/// An engine client whose every read fails with the given message.
pub struct FailingClient {
    message: String,
}

impl FailingClient {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl AuthzClient for FailingClient {
    async fn read(&self, _request: ReadRequest) -> dualwrite_engine::Result<ReadResponse> {
        Err(EngineError::Read(self.message.clone()))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_script_then_exhausted() {
        let client = ScriptedClient::new([ReadResponse::default()]);
        assert!(client.read(ReadRequest::default()).await.is_ok());
        assert!(client.read(ReadRequest::default()).await.is_err());
        assert_eq!(client.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_endless_repeats() {
        let page = ReadResponse {
            tuples: vec![],
            continuation_token: "t".to_string(),
        };
        let client = ScriptedClient::endless(page.clone());
        for _ in 0..3 {
            assert_eq!(client.read(ReadRequest::default()).await.unwrap(), page);
        }
    }

    #[tokio::test]
    async fn test_failing_store_message() {
        let err = FailingStore::new("boom").query("SELECT 1", &[]).await.unwrap_err();
        assert!(err.to_string().contains("boom"));
    }
}
